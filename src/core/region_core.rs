use alloc::{
  boxed::Box,
  sync::{Arc, Weak},
  vec::Vec,
};

use super::{
  CompletionCell, Effects, Emission, FlowError, NodeBehavior, NodeFailure, NodeId, NodeKind, NodeSlot, PeerRef,
  PortRef, RegionOp, RegionShared, SealContext, Signal, SignalEnvelope, SignalFrame,
};

/// The node arena and dispatch loop of one region.
///
/// All access happens under the owning [`RegionShared`]'s lock, from a single
/// driver at a time; nodes inside a region therefore never need locking
/// between each other.
pub(in crate::core) struct RegionCore {
  pub(in crate::core) self_ref:    Weak<RegionShared>,
  pub(in crate::core) nodes:       Vec<NodeSlot>,
  pub(in crate::core) start_queue: Vec<usize>,
  pub(in crate::core) started:     bool,
  pub(in crate::core) failure:     Option<FlowError>,
}

impl RegionCore {
  pub(in crate::core) const fn new() -> Self {
    Self { self_ref: Weak::new(), nodes: Vec::new(), start_queue: Vec::new(), started: false, failure: None }
  }

  pub(in crate::core) fn install(&mut self, slot: NodeSlot) -> usize {
    self.nodes.push(slot);
    self.nodes.len() - 1
  }

  /// Seals one node; idempotent. Returns whether the node registered for
  /// `Start`.
  pub(in crate::core) fn seal_node(&mut self, index: usize) -> bool {
    if self.nodes[index].sealed {
      return false;
    }
    self.nodes[index].sealed = true;
    let id = self.nodes[index].id;
    let Some(mut behavior) = self.nodes[index].behavior.take() else { return false };
    let mut wants_start = false;
    let self_ref = self.self_ref.clone();
    {
      let mut ctx = SealContext { id, index, region: &self_ref, wants_start: &mut wants_start };
      behavior.on_sealed(&mut ctx);
    }
    self.nodes[index].behavior = Some(behavior);
    if wants_start && !self.started {
      self.start_queue.push(index);
    }
    wants_start
  }

  pub(in crate::core) fn handle_op(&mut self, op: RegionOp) {
    match op {
      | RegionOp::Deliver(envelope) => self.deliver(envelope),
      | RegionOp::StartRegion => self.run_start(),
      | RegionOp::Attach { upstream, behavior, cell } => self.attach_drain(upstream, behavior, &cell),
    }
  }

  pub(in crate::core) fn all_terminal(&self) -> bool {
    self.nodes.iter().all(|slot| slot.terminal)
  }

  fn run_start(&mut self) {
    if self.started {
      return;
    }
    self.started = true;
    let queue = core::mem::take(&mut self.start_queue);
    for index in queue {
      self.deliver(SignalEnvelope { target: index, port: PortRef::Node, signal: Signal::Start });
    }
  }

  fn attach_drain(&mut self, upstream: usize, behavior: Box<dyn NodeBehavior>, cell: &Arc<CompletionCell>) {
    let Some(slot) = self.nodes.get(upstream) else {
      cell.fulfill(Err(FlowError::Resource {
        node:    NodeId::unset(),
        kind:    NodeKind::TailSource,
        message: "tail source not found in its region".into(),
      }));
      return;
    };
    if slot.terminal {
      cell.fulfill(Err(FlowError::Protocol {
        node:      slot.id,
        kind:      slot.kind,
        violation: "tail source already terminated",
      }));
      return;
    }
    if slot.outlets.first().is_some_and(Option::is_some) {
      cell.fulfill(Err(FlowError::TailAlreadyAttached { node: slot.id }));
      return;
    }
    let index = self.install(NodeSlot::new(NodeId::next(), behavior, 1, 0));
    self.nodes[upstream].outlets[0] = Some(PeerRef::Local { node: index, port: 0 });
    self.nodes[index].inlets[0] = Some(PeerRef::Local { node: upstream, port: 0 });
    if self.seal_node(index) {
      self.deliver(SignalEnvelope { target: index, port: PortRef::Node, signal: Signal::Start });
    }
  }

  /// Delivers one signal, honoring the intercept protocol.
  ///
  /// If the target is already dispatching, the signal is parked in its
  /// intercept buffer (unless the node's state is marked non-intercepting).
  /// Otherwise the state function runs and its emissions are dispatched
  /// depth-first, after which the intercept buffer drains in FIFO order
  /// against the possibly changed state.
  fn deliver(&mut self, envelope: SignalEnvelope) {
    let index = envelope.target;
    let Some(slot) = self.nodes.get_mut(index) else { return };
    if slot.terminal || !slot.sealed {
      return;
    }
    let arrived_open = match envelope.port {
      | PortRef::Inlet(port) => matches!(slot.inlets.get(port), Some(Some(_))),
      | PortRef::Outlet(port) => matches!(slot.outlets.get(port), Some(Some(_))),
      | PortRef::Node => true,
    };
    if !arrived_open {
      // the edge was released while the signal was in flight
      return;
    }
    if slot.dispatching && (slot.intercepting || slot.behavior.is_none()) {
      slot.intercept.push(SignalFrame { port: envelope.port, signal: envelope.signal });
      return;
    }
    let nested = slot.dispatching;
    slot.dispatching = true;
    let mut frame = SignalFrame { port: envelope.port, signal: envelope.signal };
    loop {
      self.release_on_receipt(index, &frame);
      let Some(mut behavior) = self.nodes[index].behavior.take() else { break };
      let mut fx = Effects::new(self, index);
      let outcome = behavior.on_signal(frame, &mut fx);
      let Effects { emissions, wants_terminal, .. } = fx;
      self.nodes[index].behavior = Some(behavior);
      for emission in emissions {
        self.route_emission(index, emission);
      }
      if let Err(failure) = outcome {
        self.fail_node(index, failure);
      }
      if wants_terminal {
        self.finish_node(index);
      }
      let slot = &mut self.nodes[index];
      if slot.terminal {
        slot.intercept.clear();
        break;
      }
      match slot.intercept.pop() {
        | Some(next) => frame = next,
        | None => break,
      }
    }
    if !nested && let Some(slot) = self.nodes.get_mut(index) {
      slot.dispatching = false;
    }
  }

  fn release_on_receipt(&mut self, index: usize, frame: &SignalFrame) {
    let slot = &mut self.nodes[index];
    match (frame.port, &frame.signal) {
      | (PortRef::Inlet(port), Signal::Complete | Signal::Error(_)) => {
        if let Some(binding) = slot.inlets.get_mut(port) {
          *binding = None;
        }
      },
      | (PortRef::Outlet(port), Signal::Cancel) => {
        if let Some(binding) = slot.outlets.get_mut(port) {
          *binding = None;
        }
      },
      | _ => {},
    }
  }

  fn route_emission(&mut self, origin: usize, emission: Emission) {
    match emission {
      | Emission::Outbound { outlet, signal } => {
        let Some(peer) = self.nodes[origin].outlets.get(outlet).cloned().flatten() else {
          self.fail_node(origin, NodeFailure::Protocol("signal emitted on a released outlet"));
          return;
        };
        if signal.is_terminal() {
          self.nodes[origin].outlets[outlet] = None;
        }
        self.forward(peer, true, signal);
      },
      | Emission::Inbound { inlet, signal } => {
        let Some(peer) = self.nodes[origin].inlets.get(inlet).cloned().flatten() else {
          self.fail_node(origin, NodeFailure::Protocol("signal emitted on a released inlet"));
          return;
        };
        if signal.is_terminal() {
          self.nodes[origin].inlets[inlet] = None;
        }
        self.forward(peer, false, signal);
      },
      | Emission::Direct(envelope) => self.deliver(envelope),
    }
  }

  fn forward(&mut self, peer: PeerRef, to_inlet: bool, signal: Signal) {
    match peer {
      | PeerRef::Local { node, port } => {
        let port = if to_inlet { PortRef::Inlet(port) } else { PortRef::Outlet(port) };
        self.deliver(SignalEnvelope { target: node, port, signal });
      },
      | PeerRef::Remote { region, node, port } => {
        let port = if to_inlet { PortRef::Inlet(port) } else { PortRef::Outlet(port) };
        if let Some(region) = region.upgrade() {
          region.post(RegionOp::Deliver(SignalEnvelope { target: node, port, signal }));
        }
      },
    }
  }

  /// Local failure recovery: cancel live upstreams, error live downstreams,
  /// become terminal.
  fn fail_node(&mut self, index: usize, failure: NodeFailure) {
    if self.nodes[index].terminal {
      return;
    }
    let id = self.nodes[index].id;
    let kind = self.nodes[index].kind;
    let error = FlowError::from_failure(id, kind, failure);
    if self.failure.is_none() {
      self.failure = Some(error.clone());
    }
    let inlets: Vec<PeerRef> = self.nodes[index].inlets.iter_mut().filter_map(|binding| binding.take()).collect();
    let outlets: Vec<PeerRef> = self.nodes[index].outlets.iter_mut().filter_map(|binding| binding.take()).collect();
    for peer in inlets {
      self.forward(peer, false, Signal::Cancel);
    }
    for peer in outlets {
      self.forward(peer, true, Signal::Error(error.clone()));
    }
    self.finish_node(index);
  }

  fn finish_node(&mut self, index: usize) {
    let slot = &mut self.nodes[index];
    slot.terminal = true;
    slot.behavior = None;
    slot.intercept.clear();
    for binding in &mut slot.inlets {
      *binding = None;
    }
    for binding in &mut slot.outlets {
      *binding = None;
    }
  }
}
