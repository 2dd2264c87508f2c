use alloc::{boxed::Box, vec::Vec};

use super::{
  DynElem, FlowError, NodeBehavior, NodeId, NodeSlot, PeerRef, PortRef, RegionCore, Signal, SignalEnvelope,
  SubSourceRef,
};

/// One deferred emission of a node activation.
pub(in crate::core) enum Emission {
  /// Signal leaving through an outbound port.
  Outbound {
    /// Outlet index on the emitting node.
    outlet: usize,
    /// The signal.
    signal: Signal,
  },
  /// Signal leaving through an inbound port, toward the upstream peer.
  Inbound {
    /// Inlet index on the emitting node.
    inlet:  usize,
    /// The signal.
    signal: Signal,
  },
  /// Pre-resolved envelope, used for `Start` of freshly spawned nodes.
  Direct(SignalEnvelope),
}

/// Collector of everything a node activation wants to happen.
///
/// Emissions are dispatched depth-first, in order, after the state function
/// returns; spawning inserts the new node immediately so the activation can
/// embed a reference to it in an element.
pub struct Effects<'a> {
  pub(in crate::core) region:         &'a mut RegionCore,
  pub(in crate::core) origin:         usize,
  pub(in crate::core) emissions:      Vec<Emission>,
  pub(in crate::core) wants_terminal: bool,
}

impl<'a> Effects<'a> {
  pub(in crate::core) fn new(region: &'a mut RegionCore, origin: usize) -> Self {
    Self { region, origin, emissions: Vec::new(), wants_terminal: false }
  }

  /// Emits one element downstream through the given outlet.
  pub fn push(&mut self, outlet: usize, elem: DynElem) {
    self.emissions.push(Emission::Outbound { outlet, signal: Signal::Next(elem) });
  }

  /// Completes the given outlet.
  pub fn complete(&mut self, outlet: usize) {
    self.emissions.push(Emission::Outbound { outlet, signal: Signal::Complete });
  }

  /// Fails the given outlet.
  pub fn error(&mut self, outlet: usize, error: FlowError) {
    self.emissions.push(Emission::Outbound { outlet, signal: Signal::Error(error) });
  }

  /// Announces a spawned sub-source on the given outlet.
  pub fn subscribe(&mut self, outlet: usize) {
    self.emissions.push(Emission::Outbound { outlet, signal: Signal::Subscribe });
  }

  /// Grants demand upstream through the given inlet.
  pub fn request(&mut self, inlet: usize, amount: u64) {
    self.emissions.push(Emission::Inbound { inlet, signal: Signal::Request(amount) });
  }

  /// Releases the given inlet.
  pub fn cancel(&mut self, inlet: usize) {
    self.emissions.push(Emission::Inbound { inlet, signal: Signal::Cancel });
  }

  /// Marks the node terminal once the activation finishes.
  pub fn terminate(&mut self) {
    self.wants_terminal = true;
  }

  /// Spawns a sub-source feeding a fresh inlet of the emitting node.
  ///
  /// The spawned node is sealed into the running region and receives `Start`
  /// right after the current activation's emissions; its announce wrapper
  /// then signals `Subscribe` on the new edge. Returns the new inlet index.
  pub(in crate::core) fn spawn_feeder(&mut self, behavior: Box<dyn NodeBehavior>) -> usize {
    let spawned = self.region.install(NodeSlot::new(NodeId::next(), behavior, 0, 1));
    let inlet = self.region.nodes[self.origin].inlets.len();
    self.region.nodes[self.origin].inlets.push(Some(PeerRef::Local { node: spawned, port: 0 }));
    self.region.nodes[spawned].outlets[0] = Some(PeerRef::Local { node: self.origin, port: inlet });
    self.seal_spawned(spawned);
    inlet
  }

  /// Spawns a tail sub-source fed from a fresh outlet of the emitting node.
  ///
  /// The tail's own outlet stays unbound until a drain is attached at
  /// runtime. Returns the new outlet index and the attachable handle, or
  /// `None` when the region is already gone.
  pub(in crate::core) fn spawn_tail(&mut self, behavior: Box<dyn NodeBehavior>) -> Option<(usize, SubSourceRef)> {
    let region = self.region.self_ref.clone();
    region.upgrade()?;
    let id = NodeId::next();
    let spawned = self.region.install(NodeSlot::new(id, behavior, 1, 1));
    let outlet = self.region.nodes[self.origin].outlets.len();
    self.region.nodes[self.origin].outlets.push(Some(PeerRef::Local { node: spawned, port: 0 }));
    self.region.nodes[spawned].inlets[0] = Some(PeerRef::Local { node: self.origin, port: outlet });
    self.seal_spawned(spawned);
    Some((outlet, SubSourceRef::new(region, spawned, id)))
  }

  fn seal_spawned(&mut self, index: usize) {
    let wants_start = self.region.seal_node(index);
    if wants_start && self.region.started {
      self
        .emissions
        .push(Emission::Direct(SignalEnvelope { target: index, port: PortRef::Node, signal: Signal::Start }));
    }
  }
}
