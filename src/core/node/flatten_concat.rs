use alloc::{boxed::Box, collections::VecDeque};

use super::SubSourceAnnounce;
use crate::core::{
  DemandTracker, DynElem, Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, SealContext, Signal, SignalFrame,
};

struct SubEntry {
  inlet:      usize,
  subscribed: bool,
}

/// Stream-of-streams flatten with bounded parallelism.
///
/// Each upstream element is turned into a sub-source by the adapter and
/// spawned onto a fresh inlet; `parallelism` bounds how far ahead the node
/// pre-subscribes, never the output order. Output is the concatenation of
/// the sub-streams in the order they were opened, never interleaved: demand
/// only ever flows to the head sub.
pub(in crate::core) struct FlattenConcatNode {
  parallelism:   u32,
  adapter:       Box<dyn FnMut(DynElem) -> Result<Box<dyn NodeBehavior>, NodeFailure> + Send>,
  subs:          VecDeque<SubEntry>,
  remaining:     DemandTracker,
  upstream_done: bool,
}

impl FlattenConcatNode {
  pub(in crate::core) fn new(
    parallelism: u32,
    adapter: Box<dyn FnMut(DynElem) -> Result<Box<dyn NodeBehavior>, NodeFailure> + Send>,
  ) -> Self {
    Self { parallelism, adapter, subs: VecDeque::new(), remaining: DemandTracker::new(), upstream_done: false }
  }

  fn head_position(&self, inlet: usize) -> Option<usize> {
    self.subs.iter().position(|entry| entry.inlet == inlet)
  }

  /// Forwards all outstanding demand to the head sub, if it is subscribed.
  fn feed_head(&mut self, fx: &mut Effects<'_>) {
    if !self.remaining.has_demand() {
      return;
    }
    if let Some(head) = self.subs.front()
      && head.subscribed
    {
      fx.request(head.inlet, self.remaining.demand().forwardable());
    }
  }

  fn finish_if_drained(&mut self, fx: &mut Effects<'_>) {
    if self.upstream_done && self.subs.is_empty() {
      fx.complete(0);
      fx.terminate();
    }
  }
}

impl NodeBehavior for FlattenConcatNode {
  fn kind(&self) -> NodeKind {
    NodeKind::FlattenConcat
  }

  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    ctx.register_start();
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Node, Signal::Start) => fx.request(0, u64::from(self.parallelism)),
      | (PortRef::Outlet(0), Signal::Request(amount)) => {
        self.remaining.accumulate(amount)?;
        // incremental grant: the rest of `remaining` was forwarded earlier
        if let Some(head) = self.subs.front()
          && head.subscribed
        {
          fx.request(head.inlet, amount);
        }
      },
      | (PortRef::Outlet(0), Signal::Cancel) => {
        if !self.upstream_done {
          fx.cancel(0);
        }
        for entry in &self.subs {
          fx.cancel(entry.inlet);
        }
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Next(elem)) => {
        let inner = (self.adapter)(elem)?;
        let inlet = fx.spawn_feeder(Box::new(SubSourceAnnounce::new(inner)));
        self.subs.push_back(SubEntry { inlet, subscribed: false });
      },
      | (PortRef::Inlet(inlet), Signal::Subscribe) => {
        let Some(position) = self.head_position(inlet) else { return Ok(()) };
        self.subs[position].subscribed = true;
        if position == 0 {
          self.feed_head(fx);
        }
      },
      | (PortRef::Inlet(inlet), Signal::Next(elem)) => {
        let is_head = self.subs.front().is_some_and(|head| head.inlet == inlet && head.subscribed);
        if !is_head {
          return Err(NodeFailure::Protocol("element from a non-head sub-source"));
        }
        if !self.remaining.consume_one() {
          return Err(NodeFailure::Protocol("element delivered without demand"));
        }
        fx.push(0, elem);
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        self.upstream_done = true;
        self.finish_if_drained(fx);
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        for entry in &self.subs {
          fx.cancel(entry.inlet);
        }
        fx.error(0, error);
        fx.terminate();
      },
      | (PortRef::Inlet(inlet), Signal::Complete) => {
        let Some(position) = self.head_position(inlet) else { return Ok(()) };
        self.subs.remove(position);
        if position == 0 {
          if !self.upstream_done {
            fx.request(0, 1);
          }
          self.feed_head(fx);
        }
        self.finish_if_drained(fx);
      },
      | (PortRef::Inlet(inlet), Signal::Error(error)) => {
        if !self.upstream_done {
          fx.cancel(0);
        }
        for entry in &self.subs {
          if entry.inlet != inlet {
            fx.cancel(entry.inlet);
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
