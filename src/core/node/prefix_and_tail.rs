use alloc::{boxed::Box, vec::Vec};
use core::any::Any;

use super::TailSourceNode;
use crate::core::{Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, SealContext, Signal, SignalFrame};

enum GateState {
  /// Waiting for the region to start.
  AwaitingStart,
  /// Collecting the prefix; `main_requested` records whether the main
  /// downstream has signaled any demand yet.
  Assembling { main_requested: bool },
  /// Prefix complete (or upstream finished early), waiting for the first
  /// downstream request before the pair may travel.
  AwaitingDemand { upstream_done: bool },
  /// Pair emitted; every further upstream signal is relayed to the tail.
  Draining,
}

/// Gate that collects a fixed prefix, then hands the rest of the upstream to
/// a spawned tail sub-source.
///
/// Emits exactly one element on its main outlet: the prefix paired with a
/// [`SubSourceRef`](crate::core::SubSourceRef), immediately followed by
/// completion. At most one tail is ever spawned per run; the prefix is
/// delivered in arrival order.
pub(in crate::core) struct PrefixAndTailNode<T> {
  prefix_size: u32,
  collected:   Vec<T>,
  state:       GateState,
}

impl<T> PrefixAndTailNode<T>
where
  T: Any + Send + Sync + 'static,
{
  pub(in crate::core) fn new(prefix_size: u32) -> Self {
    Self { prefix_size, collected: Vec::new(), state: GateState::AwaitingStart }
  }

  /// Spawns the tail, pushes the pair, and completes the main outlet.
  fn emit(&mut self, fx: &mut Effects<'_>, upstream_done: bool) -> Result<(), NodeFailure> {
    let Some((tail_outlet, tail)) = fx.spawn_tail(Box::new(TailSourceNode::new())) else {
      return Err(NodeFailure::Resource("owning region released while spawning the tail".into()));
    };
    let prefix = core::mem::take(&mut self.collected);
    fx.push(0, Box::new((prefix, tail)));
    fx.complete(0);
    if upstream_done {
      fx.complete(tail_outlet);
      fx.terminate();
    } else {
      self.state = GateState::Draining;
    }
    Ok(())
  }
}

impl<T> NodeBehavior for PrefixAndTailNode<T>
where
  T: Any + Send + Sync + 'static,
{
  fn kind(&self) -> NodeKind {
    NodeKind::PrefixAndTail
  }

  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    ctx.register_start();
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Node, Signal::Start) => {
        if matches!(self.state, GateState::AwaitingStart) {
          fx.request(0, u64::from(self.prefix_size));
          self.state = GateState::Assembling { main_requested: false };
        }
      },
      | (PortRef::Inlet(0), Signal::Next(elem)) => {
        if matches!(self.state, GateState::Draining) {
          fx.push(1, elem);
          return Ok(());
        }
        let GateState::Assembling { main_requested } = &self.state else {
          return Err(NodeFailure::Protocol("element delivered without demand"));
        };
        let main_requested = *main_requested;
        match elem.downcast::<T>() {
          | Ok(value) => self.collected.push(*value),
          | Err(_) => return Err(NodeFailure::Protocol("element type mismatch")),
        }
        if self.collected.len() == self.prefix_size as usize {
          if main_requested {
            self.emit(fx, false)?;
          } else {
            self.state = GateState::AwaitingDemand { upstream_done: false };
          }
        }
      },
      | (PortRef::Outlet(0), Signal::Request(_)) => {
        if matches!(self.state, GateState::Assembling { .. }) {
          self.state = GateState::Assembling { main_requested: true };
        } else if let GateState::AwaitingDemand { upstream_done } = &self.state {
          let upstream_done = *upstream_done;
          self.emit(fx, upstream_done)?;
        }
      },
      | (PortRef::Outlet(0), Signal::Cancel) => {
        if !matches!(self.state, GateState::Draining) {
          fx.cancel(0);
          fx.terminate();
        }
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        if matches!(self.state, GateState::Draining) {
          fx.complete(1);
          fx.terminate();
        } else if let GateState::Assembling { main_requested } = &self.state {
          if *main_requested {
            self.emit(fx, true)?;
          } else {
            self.state = GateState::AwaitingDemand { upstream_done: true };
          }
        } else if matches!(self.state, GateState::AwaitingDemand { .. }) {
          self.state = GateState::AwaitingDemand { upstream_done: true };
        } else {
          fx.complete(0);
          fx.terminate();
        }
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        if matches!(self.state, GateState::Draining) {
          fx.error(1, error);
        } else {
          fx.error(0, error);
        }
        fx.terminate();
      },
      | (PortRef::Outlet(1), Signal::Request(amount)) => {
        if matches!(self.state, GateState::Draining) {
          fx.request(0, amount);
        }
      },
      | (PortRef::Outlet(1), Signal::Cancel) => {
        if matches!(self.state, GateState::Draining) {
          fx.cancel(0);
          fx.terminate();
        }
      },
      | _ => {},
    }
    Ok(())
  }
}
