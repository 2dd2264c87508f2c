use alloc::{boxed::Box, collections::VecDeque};

use crate::core::{
  DemandTracker, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, SealContext, Signal, SignalFrame,
};

/// Wrapper around a spawned inner source that announces itself.
///
/// Stream-of-streams operators pre-subscribe to future inner streams; the
/// announce wrapper emits `Subscribe` on the fresh edge when the spawned
/// node starts, then delegates every signal to the wrapped source.
pub(in crate::core) struct SubSourceAnnounce {
  inner: Box<dyn NodeBehavior>,
}

impl SubSourceAnnounce {
  pub(in crate::core) fn new(inner: Box<dyn NodeBehavior>) -> Self {
    Self { inner }
  }
}

impl NodeBehavior for SubSourceAnnounce {
  fn kind(&self) -> NodeKind {
    NodeKind::SubSource
  }

  fn intercepts(&self) -> bool {
    self.inner.intercepts()
  }

  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    ctx.register_start();
    self.inner.on_sealed(ctx);
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    if matches!((frame.port, &frame.signal), (PortRef::Node, Signal::Start)) {
      fx.subscribe(0);
    }
    self.inner.on_signal(frame, fx)
  }
}

/// Spawned tail standing in for the rest of an upstream.
///
/// Until a drain attaches, signals relayed by the owning gate are queued;
/// the first downstream request flushes the queue and forwards any surplus
/// demand upstream. Once the queue is empty the node is a plain relay.
pub(in crate::core) struct TailSourceNode {
  queued:        VecDeque<Signal>,
  demand:        DemandTracker,
  attached:      bool,
  upstream_done: bool,
}

impl TailSourceNode {
  pub(in crate::core) const fn new() -> Self {
    Self { queued: VecDeque::new(), demand: DemandTracker::new(), attached: false, upstream_done: false }
  }

  /// Emits queued signals against current demand; returns how many elements
  /// were served.
  fn flush(&mut self, fx: &mut Effects<'_>) -> u64 {
    let mut served = 0_u64;
    loop {
      match self.queued.front() {
        | Some(Signal::Next(_)) if self.demand.has_demand() => {
          let Some(Signal::Next(elem)) = self.queued.pop_front() else { break };
          self.demand.consume_one();
          fx.push(0, elem);
          served += 1;
        },
        | Some(Signal::Complete) => {
          self.queued.pop_front();
          fx.complete(0);
          fx.terminate();
          break;
        },
        | Some(Signal::Error(_)) => {
          let Some(Signal::Error(error)) = self.queued.pop_front() else { break };
          fx.error(0, error);
          fx.terminate();
          break;
        },
        | _ => break,
      }
    }
    served
  }
}

impl NodeBehavior for TailSourceNode {
  fn kind(&self) -> NodeKind {
    NodeKind::TailSource
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Inlet(0), Signal::Next(elem)) => {
        if self.attached && self.queued.is_empty() && self.demand.has_demand() {
          self.demand.consume_one();
          fx.push(0, elem);
        } else {
          self.queued.push_back(Signal::Next(elem));
        }
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        self.upstream_done = true;
        if self.attached && self.queued.is_empty() {
          fx.complete(0);
          fx.terminate();
        } else {
          self.queued.push_back(Signal::Complete);
        }
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        self.upstream_done = true;
        if self.attached && self.queued.is_empty() {
          fx.error(0, error);
          fx.terminate();
        } else {
          self.queued.push_back(Signal::Error(error));
        }
      },
      | (PortRef::Outlet(0), Signal::Request(amount)) => {
        self.attached = true;
        self.demand.accumulate(amount)?;
        let served = self.flush(fx);
        let surplus = amount.saturating_sub(served);
        if surplus > 0 && !self.upstream_done {
          fx.request(0, surplus);
        }
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
