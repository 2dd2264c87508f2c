use super::DemandTracker;

#[test]
fn zero_requests_are_rejected() {
  let mut tracker = DemandTracker::new();
  assert!(tracker.accumulate(0).is_err());
}

#[test]
fn demand_is_consumed_one_by_one() {
  let mut tracker = DemandTracker::new();
  tracker.accumulate(2).expect("accumulate");
  assert!(tracker.consume_one());
  assert!(tracker.consume_one());
  assert!(!tracker.consume_one());
  assert!(!tracker.has_demand());
}

#[test]
fn demand_saturates_to_unbounded() {
  let mut tracker = DemandTracker::new();
  tracker.accumulate(u64::MAX - 1).expect("accumulate");
  tracker.accumulate(2).expect("accumulate");
  assert!(tracker.demand().is_unbounded());
  assert!(tracker.consume_one());
  assert!(tracker.demand().is_unbounded());
}
