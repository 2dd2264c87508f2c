use alloc::{sync::Arc, vec::Vec};

use hashbrown::HashMap;

use super::{FlowError, NodeId, RegionShared};

/// Handle to a sealed, started graph.
///
/// Keeps every region alive; dropping the handle releases them (in-flight
/// cross-region signals to a released region are discarded).
pub struct RunningGraph {
  regions: Vec<Arc<RegionShared>>,
  index:   HashMap<NodeId, (usize, usize)>,
}

impl core::fmt::Debug for RunningGraph {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RunningGraph").field("regions", &self.regions.len()).finish()
  }
}

impl RunningGraph {
  pub(in crate::core) const fn new(regions: Vec<Arc<RegionShared>>, index: HashMap<NodeId, (usize, usize)>) -> Self {
    Self { regions, index }
  }

  /// First error any region recorded, if any.
  #[must_use]
  pub fn failure(&self) -> Option<FlowError> {
    self.regions.iter().find_map(|region| region.failure())
  }

  /// Whether every node in every region has reached its terminal state.
  #[must_use]
  pub fn is_terminated(&self) -> bool {
    self.regions.iter().all(|region| region.all_terminal())
  }

  /// Number of regions the graph was split into.
  #[must_use]
  pub fn region_count(&self) -> usize {
    self.regions.len()
  }

  /// Whether the graph contains a node with the given id.
  #[must_use]
  pub fn contains(&self, node: NodeId) -> bool {
    self.index.contains_key(&node)
  }
}
