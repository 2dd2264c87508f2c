use alloc::{boxed::Box, collections::VecDeque, vec::Vec};
use core::any::Any;

use crate::core::{
  DemandTracker, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, SealContext, Signal, SignalFrame,
};

/// Sliding window of cloneable elements, advancing by one per input.
///
/// The warm-up (the first `window - 1` elements) is requested eagerly at
/// start: those inputs produce no output, so their demand cannot come from
/// downstream. That pre-pull is also what lets a feedback cycle through this
/// node bootstrap itself. Once warm, every input yields one window against
/// one unit of downstream demand; a partial window at completion is
/// discarded.
pub(in crate::core) struct SlidingNode<T> {
  window_size: usize,
  window:      VecDeque<T>,
  demand:      DemandTracker,
}

impl<T> SlidingNode<T>
where
  T: Clone + Any + Send + Sync + 'static,
{
  pub(in crate::core) fn new(window_size: usize) -> Self {
    Self { window_size, window: VecDeque::with_capacity(window_size), demand: DemandTracker::new() }
  }
}

impl<T> NodeBehavior for SlidingNode<T>
where
  T: Clone + Any + Send + Sync + 'static,
{
  fn kind(&self) -> NodeKind {
    NodeKind::Sliding
  }

  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    ctx.register_start();
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Node, Signal::Start) => {
        if self.window_size > 1 {
          fx.request(0, (self.window_size - 1) as u64);
        }
      },
      | (PortRef::Outlet(0), Signal::Request(amount)) => {
        self.demand.accumulate(amount)?;
        fx.request(0, amount);
      },
      | (PortRef::Inlet(0), Signal::Next(elem)) => {
        let value = match elem.downcast::<T>() {
          | Ok(value) => *value,
          | Err(_) => return Err(NodeFailure::Protocol("element type mismatch")),
        };
        self.window.push_back(value);
        if self.window.len() < self.window_size {
          return Ok(());
        }
        if !self.demand.consume_one() {
          return Err(NodeFailure::Protocol("element delivered without demand"));
        }
        let snapshot: Vec<T> = self.window.iter().cloned().collect();
        self.window.pop_front();
        fx.push(0, Box::new(snapshot));
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        fx.complete(0);
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        fx.error(0, error);
        fx.terminate();
      },
      | (PortRef::Outlet(0), Signal::Cancel) => {
        fx.cancel(0);
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
