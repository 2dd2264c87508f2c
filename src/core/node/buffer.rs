use alloc::collections::VecDeque;

use crate::core::{
  DemandTracker, DynElem, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, SealContext, Signal, SignalFrame,
};

/// Fixed-credit element buffer.
///
/// Requests its whole capacity at start and hands one replacement credit
/// upstream per element released downstream, so at most `capacity` elements
/// are ever in flight or parked here. On a feedback cycle this is the node
/// that absorbs the phase offset and issues the first demand.
pub(in crate::core) struct BufferNode {
  capacity:      usize,
  queued:        VecDeque<DynElem>,
  demand:        DemandTracker,
  upstream_done: bool,
}

impl BufferNode {
  pub(in crate::core) fn new(capacity: usize) -> Self {
    Self { capacity, queued: VecDeque::with_capacity(capacity), demand: DemandTracker::new(), upstream_done: false }
  }

  fn release(&mut self, fx: &mut Effects<'_>) {
    while self.demand.has_demand() {
      let Some(elem) = self.queued.pop_front() else { break };
      self.demand.consume_one();
      fx.push(0, elem);
      if !self.upstream_done {
        fx.request(0, 1);
      }
    }
    if self.upstream_done && self.queued.is_empty() {
      fx.complete(0);
      fx.terminate();
    }
  }
}

impl NodeBehavior for BufferNode {
  fn kind(&self) -> NodeKind {
    NodeKind::Buffer
  }

  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    ctx.register_start();
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Node, Signal::Start) => fx.request(0, self.capacity as u64),
      | (PortRef::Inlet(0), Signal::Next(elem)) => {
        self.queued.push_back(elem);
        if self.queued.len() > self.capacity {
          return Err(NodeFailure::Protocol("buffer overrun"));
        }
        self.release(fx);
      },
      | (PortRef::Outlet(0), Signal::Request(amount)) => {
        self.demand.accumulate(amount)?;
        self.release(fx);
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        self.upstream_done = true;
        if self.queued.is_empty() {
          fx.complete(0);
          fx.terminate();
        }
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        self.queued.clear();
        fx.error(0, error);
        fx.terminate();
      },
      | (PortRef::Outlet(0), Signal::Cancel) => {
        if !self.upstream_done {
          fx.cancel(0);
        }
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
