use core::fmt;

use portable_atomic::{AtomicU64, Ordering};

/// Stable identifier assigned to every node at construction.
///
/// Ids survive the node's whole lifecycle and appear in error reports, which
/// makes post-mortem diagnostics possible after the graph has torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

impl NodeId {
  /// Allocates a new node identifier.
  #[must_use]
  pub fn next() -> Self {
    Self(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  /// Returns the raw identifier value.
  #[must_use]
  pub const fn value(&self) -> u64 {
    self.0
  }

  /// Placeholder id used before a node has been sealed.
  pub(in crate::core) const fn unset() -> Self {
    Self(0)
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}
