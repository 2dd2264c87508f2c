use alloc::vec::Vec;

use crate::core::{DemandTracker, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, Signal, SignalFrame};

struct Lane {
  demand: DemandTracker,
  alive:  bool,
}

/// Fan-out routing each element to the next alive outbound in ring order.
///
/// Upstream is asked for one element at a time, and only while every alive
/// outbound has demand, so no outbound is ever overrun. Ties break by
/// insertion order; dead outbounds are skipped.
pub(in crate::core) struct RoundRobinFanOutNode {
  lanes:        Vec<Lane>,
  cursor:       usize,
  in_flight:    bool,
  eager_cancel: bool,
}

impl RoundRobinFanOutNode {
  pub(in crate::core) fn new(outbounds: usize, eager_cancel: bool) -> Self {
    let lanes = (0..outbounds).map(|_| Lane { demand: DemandTracker::new(), alive: true }).collect();
    Self { lanes, cursor: outbounds.saturating_sub(1), in_flight: false, eager_cancel }
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

  fn next_alive(&self) -> Option<usize> {
    let len = self.lanes.len();
    (1..=len).map(|step| (self.cursor + step) % len).find(|lane| self.lanes[*lane].alive)
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

impl NodeBehavior for RoundRobinFanOutNode {
  fn kind(&self) -> NodeKind {
    NodeKind::RoundRobinFanOut
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
        let Some(target) = self.next_alive() else {
          return Err(NodeFailure::Protocol("element delivered with no alive outbound"));
        };
        if !self.lanes[target].demand.consume_one() {
          return Err(NodeFailure::Protocol("element delivered without demand"));
        }
        fx.push(target, elem);
        self.cursor = target;
        self.in_flight = false;
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
