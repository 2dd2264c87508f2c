use alloc::sync::Arc;
use core::{any::Any, marker::PhantomData};

use crate::core::{
  CompletionCell, Effects, FlowError, NodeBehavior, NodeFailure, NodeId, NodeKind, PortRef, SealContext, Signal,
  SignalFrame,
};

/// Terminal sink resolving with the first element, then cancelling.
pub(in crate::core) struct DrainHeadNode<T> {
  cell: Arc<CompletionCell>,
  id:   NodeId,
  done: bool,
  _pd:  PhantomData<fn() -> T>,
}

impl<T> DrainHeadNode<T> {
  pub(in crate::core) fn new(cell: Arc<CompletionCell>) -> Self {
    Self { cell, id: NodeId::unset(), done: false, _pd: PhantomData }
  }
}

impl<T> NodeBehavior for DrainHeadNode<T>
where
  T: Any + Send + Sync + 'static,
{
  fn kind(&self) -> NodeKind {
    NodeKind::DrainHead
  }

  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    self.id = ctx.node_id();
    ctx.register_start();
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Node, Signal::Start) => fx.request(0, 1),
      | (PortRef::Inlet(0), Signal::Next(elem)) => {
        self.done = true;
        self.cell.fulfill(Ok(elem));
        fx.cancel(0);
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        if !self.done {
          self.cell.fulfill(Err(FlowError::EmptyStream { node: self.id }));
        }
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
