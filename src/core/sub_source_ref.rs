use alloc::{
  boxed::Box,
  sync::{Arc, Weak},
  vec::Vec,
};
use core::{any::Any, fmt};

use super::{
  Completion, CompletionCell, FlowError, NodeId, NodeKind, RegionOp, RegionShared,
  node::{DrainAllNode, DrainHeadNode},
};

/// Handle to a spawned tail sub-source of a running graph.
///
/// The tail is a real node that inherits the remaining upstream demand; this
/// handle lets exactly one drain be attached to it after the fact. Carried
/// inside the element a prefix-and-tail gate emits.
#[derive(Clone)]
pub struct SubSourceRef {
  region: Weak<RegionShared>,
  node:   usize,
  id:     NodeId,
}

impl SubSourceRef {
  pub(in crate::core) fn new(region: Weak<RegionShared>, node: usize, id: NodeId) -> Self {
    Self { region, node, id }
  }

  /// Id of the tail node.
  #[must_use]
  pub const fn node_id(&self) -> NodeId {
    self.id
  }

  /// Attaches a drain collecting every remaining element.
  ///
  /// At most one drain may ever be attached; a second attach resolves with
  /// [`FlowError::TailAlreadyAttached`].
  #[must_use]
  pub fn drain_all<T>(&self) -> Completion<Vec<T>>
  where
    T: Any + Send + Sync + 'static,
  {
    let cell = Arc::new(CompletionCell::new());
    self.attach(Box::new(DrainAllNode::<T>::new(Arc::clone(&cell))), &cell);
    Completion::new(cell)
  }

  /// Attaches a drain resolving with the first remaining element.
  #[must_use]
  pub fn drain_head<T>(&self) -> Completion<T>
  where
    T: Any + Send + Sync + 'static,
  {
    let cell = Arc::new(CompletionCell::new());
    self.attach(Box::new(DrainHeadNode::<T>::new(Arc::clone(&cell))), &cell);
    Completion::new(cell)
  }

  fn attach(&self, behavior: Box<dyn super::NodeBehavior>, cell: &Arc<CompletionCell>) {
    match self.region.upgrade() {
      | Some(region) => {
        region.post(RegionOp::Attach { upstream: self.node, behavior, cell: Arc::clone(cell) });
      },
      | None => cell.fulfill(Err(FlowError::Resource {
        node:    self.id,
        kind:    NodeKind::TailSource,
        message: "owning region was released before the tail was drained".into(),
      })),
    }
  }
}

impl fmt::Debug for SubSourceRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SubSourceRef").field("node", &self.id).finish()
  }
}
