use alloc::boxed::Box;
use core::iter::Peekable;

use crate::core::{DemandTracker, DynElem, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, Signal, SignalFrame};

/// Finite source emitting a boxed iterator, one element per unit of demand.
///
/// The iterator is peeked after every emission so completion travels in the
/// same activation as the last element; a downstream fan-in can retarget its
/// demand without waiting for an extra request round-trip.
pub(in crate::core) struct IterSourceNode {
  items:  Option<Peekable<Box<dyn Iterator<Item = DynElem> + Send>>>,
  demand: DemandTracker,
}

impl IterSourceNode {
  pub(in crate::core) fn new(items: Box<dyn Iterator<Item = DynElem> + Send>) -> Self {
    Self { items: Some(items.peekable()), demand: DemandTracker::new() }
  }

  fn emit(&mut self, fx: &mut Effects<'_>) {
    let Some(items) = &mut self.items else { return };
    while self.demand.has_demand() {
      match items.next() {
        | Some(elem) => {
          self.demand.consume_one();
          fx.push(0, elem);
        },
        | None => break,
      }
    }
    let exhausted = self.items.as_mut().is_some_and(|items| items.peek().is_none());
    if exhausted {
      self.items = None;
      fx.complete(0);
      fx.terminate();
    }
  }
}

impl NodeBehavior for IterSourceNode {
  fn kind(&self) -> NodeKind {
    NodeKind::IterSource
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Outlet(0), Signal::Request(amount)) => {
        self.demand.accumulate(amount)?;
        self.emit(fx);
      },
      | (PortRef::Outlet(0), Signal::Cancel) => {
        self.items = None;
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
