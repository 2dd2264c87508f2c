use alloc::boxed::Box;

use crate::core::{DynElem, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, Signal, SignalFrame};

/// Linear one-to-one transformer.
///
/// Pure pass-through: demand and termination forward unchanged, elements go
/// through the user function. The single state never buffers, so the
/// intercept optimization applies.
pub(in crate::core) struct MapNode {
  transform: Box<dyn FnMut(DynElem) -> Result<DynElem, NodeFailure> + Send>,
}

impl MapNode {
  pub(in crate::core) fn new(transform: Box<dyn FnMut(DynElem) -> Result<DynElem, NodeFailure> + Send>) -> Self {
    Self { transform }
  }
}

impl NodeBehavior for MapNode {
  fn kind(&self) -> NodeKind {
    NodeKind::Map
  }

  fn intercepts(&self) -> bool {
    false
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Outlet(0), Signal::Request(amount)) => fx.request(0, amount),
      | (PortRef::Outlet(0), Signal::Cancel) => {
        fx.cancel(0);
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Next(elem)) => match (self.transform)(elem) {
        | Ok(mapped) => fx.push(0, mapped),
        | Err(failure) => return Err(failure),
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        fx.complete(0);
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        fx.error(0, error);
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
