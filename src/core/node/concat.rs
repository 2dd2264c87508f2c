use alloc::{vec, vec::Vec};

use crate::core::{DemandTracker, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, Signal, SignalFrame};

/// Fan-in draining its inlets strictly in declaration order.
///
/// Demand only ever flows to the active inlet; when it completes, the
/// outstanding remainder retargets to the next not-yet-done inlet. This is
/// what lets a seed source run ahead of a coupling outlet on a cycle.
pub(in crate::core) struct ConcatNode {
  active:    usize,
  done:      Vec<bool>,
  remaining: DemandTracker,
}

impl ConcatNode {
  pub(in crate::core) fn new(inbounds: usize) -> Self {
    Self { active: 0, done: vec![false; inbounds], remaining: DemandTracker::new() }
  }

  fn advance(&mut self, fx: &mut Effects<'_>) {
    while self.active < self.done.len() && self.done[self.active] {
      self.active += 1;
    }
    if self.active == self.done.len() {
      fx.complete(0);
      fx.terminate();
    } else if self.remaining.has_demand() {
      fx.request(self.active, self.remaining.demand().forwardable());
    }
  }
}

impl NodeBehavior for ConcatNode {
  fn kind(&self) -> NodeKind {
    NodeKind::Concat
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Outlet(0), Signal::Request(amount)) => {
        self.remaining.accumulate(amount)?;
        if self.active < self.done.len() {
          fx.request(self.active, amount);
        }
      },
      | (PortRef::Outlet(0), Signal::Cancel) => {
        for (inlet, done) in self.done.iter().enumerate() {
          if !*done {
            fx.cancel(inlet);
          }
        }
        fx.terminate();
      },
      | (PortRef::Inlet(inlet), Signal::Next(elem)) => {
        if inlet != self.active {
          return Err(NodeFailure::Protocol("element from an inactive fan-in inlet"));
        }
        if !self.remaining.consume_one() {
          return Err(NodeFailure::Protocol("element delivered without demand"));
        }
        fx.push(0, elem);
      },
      | (PortRef::Inlet(inlet), Signal::Complete) => {
        if let Some(done) = self.done.get_mut(inlet) {
          *done = true;
        }
        if inlet == self.active {
          self.advance(fx);
        }
      },
      | (PortRef::Inlet(inlet), Signal::Error(error)) => {
        for (other, done) in self.done.iter().enumerate() {
          if !*done && other != inlet {
            fx.cancel(other);
          }
        }
        fx.error(0, error);
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
