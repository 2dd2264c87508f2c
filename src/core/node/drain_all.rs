use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::any::Any;

use crate::core::{
  CompletionCell, DynElem, Effects, FlowError, NodeBehavior, NodeFailure, NodeId, NodeKind, PortRef, SealContext,
  Signal, SignalFrame,
};

/// Terminal sink collecting every element into a `Vec<T>`.
///
/// Requests unbounded demand at start and resolves its completion cell on
/// the upstream terminal.
pub(in crate::core) struct DrainAllNode<T> {
  cell:  Arc<CompletionCell>,
  items: Vec<T>,
  id:    NodeId,
}

impl<T> DrainAllNode<T> {
  pub(in crate::core) fn new(cell: Arc<CompletionCell>) -> Self {
    Self { cell, items: Vec::new(), id: NodeId::unset() }
  }
}

impl<T> NodeBehavior for DrainAllNode<T>
where
  T: Any + Send + Sync + 'static,
{
  fn kind(&self) -> NodeKind {
    NodeKind::DrainAll
  }

  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    self.id = ctx.node_id();
    ctx.register_start();
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Node, Signal::Start) => fx.request(0, u64::MAX),
      | (PortRef::Inlet(0), Signal::Next(elem)) => match elem.downcast::<T>() {
        | Ok(value) => self.items.push(*value),
        | Err(_) => {
          let error =
            FlowError::Protocol { node: self.id, kind: NodeKind::DrainAll, violation: "element type mismatch" };
          self.cell.fulfill(Err(error));
          fx.cancel(0);
          fx.terminate();
        },
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        let items = core::mem::take(&mut self.items);
        self.cell.fulfill(Ok(Box::new(items) as DynElem));
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        self.cell.fulfill(Err(error));
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
