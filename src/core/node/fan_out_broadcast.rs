use alloc::{boxed::Box, vec::Vec};

use crate::core::{DemandTracker, DynElem, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, Signal, SignalFrame};

struct Lane {
  demand: DemandTracker,
  alive:  bool,
}

/// Fan-out delivering a copy of every element to each alive outbound.
///
/// Elements are duplicated through a type-aware cloner captured at
/// construction. Upstream is pulled one element at a time while every alive
/// outbound has demand; with `eager_cancel` the first outbound cancel tears
/// the whole fan-out down, which is what lets a feedback cycle terminate.
pub(in crate::core) struct BroadcastFanOutNode {
  lanes:        Vec<Lane>,
  duplicate:    Box<dyn Fn(&DynElem) -> Option<DynElem> + Send>,
  in_flight:    bool,
  eager_cancel: bool,
}

impl BroadcastFanOutNode {
  pub(in crate::core) fn new(
    outbounds: usize,
    eager_cancel: bool,
    duplicate: Box<dyn Fn(&DynElem) -> Option<DynElem> + Send>,
  ) -> Self {
    let lanes = (0..outbounds).map(|_| Lane { demand: DemandTracker::new(), alive: true }).collect();
    Self { lanes, duplicate, in_flight: false, eager_cancel }
  }

  fn alive_count(&self) -> usize {
    self.lanes.iter().filter(|lane| lane.alive).count()
  }

  fn pull_if_ready(&mut self, fx: &mut Effects<'_>) {
    if self.in_flight || self.alive_count() == 0 {
      return;
    }
    if self.lanes.iter().any(|lane| lane.alive && !lane.demand.has_demand()) {
      return;
    }
    self.in_flight = true;
    fx.request(0, 1);
  }

  fn shut_down(&mut self, fx: &mut Effects<'_>) {
    fx.cancel(0);
    for (index, lane) in self.lanes.iter().enumerate() {
      if lane.alive {
        fx.complete(index);
      }
    }
    fx.terminate();
  }
}

impl NodeBehavior for BroadcastFanOutNode {
  fn kind(&self) -> NodeKind {
    NodeKind::BroadcastFanOut
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Outlet(lane), Signal::Request(amount)) => {
        let Some(entry) = self.lanes.get_mut(lane) else { return Ok(()) };
        entry.demand.accumulate(amount)?;
        self.pull_if_ready(fx);
      },
      | (PortRef::Outlet(lane), Signal::Cancel) => {
        let Some(entry) = self.lanes.get_mut(lane) else { return Ok(()) };
        entry.alive = false;
        if self.eager_cancel || self.alive_count() == 0 {
          self.shut_down(fx);
        } else {
          self.pull_if_ready(fx);
        }
      },
      | (PortRef::Inlet(0), Signal::Next(elem)) => {
        self.in_flight = false;
        for index in 0..self.lanes.len() {
          if !self.lanes[index].alive {
            continue;
          }
          let Some(copy) = (self.duplicate)(&elem) else {
            return Err(NodeFailure::Protocol("element type mismatch"));
          };
          if !self.lanes[index].demand.consume_one() {
            return Err(NodeFailure::Protocol("element delivered without demand"));
          }
          fx.push(index, copy);
        }
        self.pull_if_ready(fx);
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        for (index, lane) in self.lanes.iter().enumerate() {
          if lane.alive {
            fx.complete(index);
          }
        }
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        for (index, lane) in self.lanes.iter().enumerate() {
          if lane.alive {
            fx.error(index, error.clone());
          }
        }
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
