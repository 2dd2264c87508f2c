use alloc::{boxed::Box, sync::Weak, vec, vec::Vec};

use super::{InterceptBuffer, NodeBehavior, NodeId, NodeKind, RegionShared};

/// Where the far end of a bound port lives.
#[derive(Clone)]
pub(in crate::core) enum PeerRef {
  /// Peer node in the same region; signals are dispatched directly.
  Local {
    /// Region-local node index.
    node: usize,
    /// Port index on the peer.
    port: usize,
  },
  /// Peer node in another region; signals go through its mailbox.
  Remote {
    /// The peer's region.
    region: Weak<RegionShared>,
    /// Node index within that region.
    node:   usize,
    /// Port index on the peer.
    port:   usize,
  },
}

/// Per-region storage of one node.
///
/// The behavior is temporarily taken out of the slot while its state function
/// runs, which is what lets the dispatcher hold the region mutably at the
/// same time.
pub(in crate::core) struct NodeSlot {
  pub(in crate::core) id:           NodeId,
  pub(in crate::core) kind:         NodeKind,
  pub(in crate::core) behavior:     Option<Box<dyn NodeBehavior>>,
  pub(in crate::core) intercepting: bool,
  pub(in crate::core) dispatching:  bool,
  pub(in crate::core) sealed:       bool,
  pub(in crate::core) terminal:     bool,
  pub(in crate::core) intercept:    InterceptBuffer,
  pub(in crate::core) inlets:       Vec<Option<PeerRef>>,
  pub(in crate::core) outlets:      Vec<Option<PeerRef>>,
}

impl NodeSlot {
  pub(in crate::core) fn new(id: NodeId, behavior: Box<dyn NodeBehavior>, inlets: usize, outlets: usize) -> Self {
    let kind = behavior.kind();
    let intercepting = behavior.intercepts();
    Self {
      id,
      kind,
      behavior: Some(behavior),
      intercepting,
      dispatching: false,
      sealed: false,
      terminal: false,
      intercept: InterceptBuffer::new(),
      inlets: vec![None; inlets],
      outlets: vec![None; outlets],
    }
  }
}
