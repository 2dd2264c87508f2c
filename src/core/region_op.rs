use alloc::{boxed::Box, sync::Arc};

use super::{CompletionCell, NodeBehavior, SignalEnvelope};

/// One entry of a region mailbox.
pub(in crate::core) enum RegionOp {
  /// Deliver a queued signal to a member node.
  Deliver(SignalEnvelope),
  /// Fire `Start` at every registered node, in registration order.
  StartRegion,
  /// Attach a drain behind a spawned tail sub-source.
  Attach {
    /// Region-local index of the tail node.
    upstream: usize,
    /// The drain to install.
    behavior: Box<dyn NodeBehavior>,
    /// Cell resolved with an error when the attach is rejected.
    cell:     Arc<CompletionCell>,
  },
}
