use alloc::sync::Weak;

use super::{NodeId, RegionShared};

/// Context handed to a node's seal-time hook.
///
/// Sealing happens exactly once per node, before its first state transition.
pub struct SealContext<'a> {
  pub(in crate::core) id:          NodeId,
  pub(in crate::core) index:       usize,
  pub(in crate::core) region:      &'a Weak<RegionShared>,
  pub(in crate::core) wants_start: &'a mut bool,
}

impl SealContext<'_> {
  /// Id of the node being sealed.
  #[must_use]
  pub const fn node_id(&self) -> NodeId {
    self.id
  }

  /// Registers the node for the region's `Start` dispatch.
  pub fn register_start(&mut self) {
    *self.wants_start = true;
  }

  pub(in crate::core) fn node_index(&self) -> usize {
    self.index
  }

  pub(in crate::core) fn region_handle(&self) -> Weak<RegionShared> {
    self.region.clone()
  }
}
