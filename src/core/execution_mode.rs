use alloc::sync::Arc;

use super::RegionExecutor;

/// How a region's mailbox is drained.
pub(in crate::core) enum ExecutionMode {
  /// The thread that wakes the region drains it in place.
  Caller,
  /// Drain jobs are spawned on an external executor.
  External(Arc<dyn RegionExecutor>),
}
