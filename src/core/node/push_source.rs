use alloc::sync::Arc;

use crate::core::{
  DemandTracker, Effects, FlowError, NodeBehavior, NodeFailure, NodeId, NodeKind, PortRef, PushShared,
  PushTermination, SealContext, Signal, SignalFrame,
};

/// Source fed by external producer threads through a shared bounded queue.
///
/// The node is the queue's single consumer and only ever runs on its
/// region's driver. `NewAvailable` events coalesce to one outstanding event:
/// the pump disarms the flag when it runs dry and re-claims it if producers
/// raced the disarm, so no element is ever stranded.
pub(in crate::core) struct PushSourceNode {
  shared: Arc<PushShared>,
  demand: DemandTracker,
  id:     NodeId,
}

impl PushSourceNode {
  pub(in crate::core) fn new(shared: Arc<PushShared>) -> Self {
    Self { shared, demand: DemandTracker::new(), id: NodeId::unset() }
  }

  fn pump(&mut self, fx: &mut Effects<'_>) {
    let mut dequeued = 0_u64;
    loop {
      while self.demand.has_demand() {
        let Some(elem) = self.shared.pop() else { break };
        self.demand.consume_one();
        fx.push(0, elem);
        dequeued += 1;
      }
      self.shared.disarm();
      if self.demand.has_demand() && !self.shared.is_empty() && self.shared.rearm() {
        continue;
      }
      break;
    }
    self.shared.notify_dequeued(dequeued);
    match self.shared.termination() {
      | Some(PushTermination::Complete) if self.shared.is_empty() => {
        fx.complete(0);
        fx.terminate();
      },
      | Some(PushTermination::Error(message)) => {
        fx.error(0, FlowError::User { node: self.id, kind: NodeKind::PushSource, message: message.as_str().into() });
        fx.terminate();
      },
      | _ => {},
    }
  }
}

impl NodeBehavior for PushSourceNode {
  fn kind(&self) -> NodeKind {
    NodeKind::PushSource
  }

  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    self.id = ctx.node_id();
    ctx.register_start();
    self.shared.set_target(ctx.region_handle(), ctx.node_index());
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Node, Signal::Start | Signal::Event(_)) => self.pump(fx),
      | (PortRef::Outlet(0), Signal::Request(amount)) => {
        self.demand.accumulate(amount)?;
        self.pump(fx);
      },
      | (PortRef::Outlet(0), Signal::Cancel) => {
        self.shared.notify_cancelled();
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
