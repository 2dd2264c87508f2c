use super::UnionFind;

#[test]
fn singletons_start_apart() {
  let mut sets = UnionFind::new(3);
  assert_ne!(sets.find(0), sets.find(1));
  assert_ne!(sets.find(1), sets.find(2));
}

#[test]
fn unions_are_transitive() {
  let mut sets = UnionFind::new(4);
  sets.union(0, 1);
  sets.union(1, 2);
  assert_eq!(sets.find(0), sets.find(2));
  assert_ne!(sets.find(0), sets.find(3));
}
