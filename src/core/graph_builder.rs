#[cfg(test)]
mod tests;

use alloc::{boxed::Box, string::String, sync::Arc, vec, vec::Vec};
use core::any::Any;

use hashbrown::HashMap;

use super::{
  Completion, CompletionCell, DynElem, ExecutionMode, GraphError, InletRef, NodeBehavior, NodeFailure, NodeHandle,
  NodeId, NodeKind, NodeSlot, OutletRef, PeerRef, PushShared, PushSourceConfig, PushSourceHandle, RegionExecutor,
  RegionOp, RegionShared, RunningGraph, UnionFind,
  graph_error::PortDirection,
  node::{
    BroadcastFanOutNode, BufferNode, ConcatNode, DrainAllNode, DrainHeadNode, FlattenConcatNode, IterSourceNode,
    MapNode, PrefixAndTailNode, PushSourceNode, RelayNode, RoundRobinFanOutNode, SlidingNode, TakeNode,
  },
};

struct BuiltNode {
  id:       NodeId,
  behavior: Box<dyn NodeBehavior>,
  inlets:   Vec<Option<(usize, usize)>>,
  outlets:  Vec<Option<(usize, usize)>>,
  executor: Option<Arc<dyn RegionExecutor>>,
}

/// Incremental constructor of a dataflow graph.
///
/// One method per node kind yields a [`NodeHandle`] bearing the node's port
/// arity; [`GraphBuilder::connect`] binds one outbound port to one inbound
/// port, exactly once each. [`GraphBuilder::run`] discovers regions, seals
/// every node, and starts the graph.
pub struct GraphBuilder {
  nodes: Vec<BuiltNode>,
}

impl GraphBuilder {
  /// Creates an empty builder.
  #[must_use]
  pub const fn new() -> Self {
    Self { nodes: Vec::new() }
  }

  fn install(&mut self, behavior: Box<dyn NodeBehavior>, inlets: u32, outlets: u32) -> NodeHandle {
    let id = NodeId::next();
    let index = self.nodes.len();
    self.nodes.push(BuiltNode {
      id,
      behavior,
      inlets: vec![None; inlets as usize],
      outlets: vec![None; outlets as usize],
      executor: None,
    });
    NodeHandle::new(index, id, inlets, outlets)
  }

  /// Source emitting the given items in order, then completing.
  pub fn iter_source<T, I>(&mut self, items: I) -> NodeHandle
  where
    T: Any + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
  {
    let items = items.into_iter().map(|item| Box::new(item) as DynElem);
    self.install(Box::new(IterSourceNode::new(Box::new(items))), 0, 1)
  }

  /// Linear transformer applying `transform` to every element.
  pub fn map<A, B, F>(&mut self, mut transform: F) -> NodeHandle
  where
    A: Any + Send + Sync + 'static,
    B: Any + Send + Sync + 'static,
    F: FnMut(A) -> B + Send + 'static,
  {
    self.try_map(move |value: A| Ok(transform(value)))
  }

  /// Linear transformer whose callback may fail; a failure cancels upstream
  /// and errors downstream.
  pub fn try_map<A, B, F>(&mut self, mut transform: F) -> NodeHandle
  where
    A: Any + Send + Sync + 'static,
    B: Any + Send + Sync + 'static,
    F: FnMut(A) -> Result<B, String> + Send + 'static,
  {
    let erased = move |elem: DynElem| -> Result<DynElem, NodeFailure> {
      match elem.downcast::<A>() {
        | Ok(value) => match transform(*value) {
          | Ok(mapped) => Ok(Box::new(mapped) as DynElem),
          | Err(message) => Err(NodeFailure::User(message)),
        },
        | Err(_) => Err(NodeFailure::Protocol("element type mismatch")),
      }
    };
    self.install(Box::new(MapNode::new(Box::new(erased))), 1, 1)
  }

  /// Gate collecting the first `prefix_size` elements, then emitting them
  /// paired with a tail sub-source.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `prefix_size` is zero.
  pub fn prefix_and_tail<T>(&mut self, prefix_size: u32) -> Result<NodeHandle, GraphError>
  where
    T: Any + Send + Sync + 'static,
  {
    if prefix_size == 0 {
      return Err(GraphError::InvalidArgument { what: "prefix size must be positive" });
    }
    Ok(self.install(Box::new(PrefixAndTailNode::<T>::new(prefix_size)), 1, 1))
  }

  /// Round-robin fan-out over `outbounds` outlets.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `outbounds` is zero.
  pub fn fan_out_round_robin(&mut self, outbounds: u32, eager_cancel: bool) -> Result<NodeHandle, GraphError> {
    if outbounds == 0 {
      return Err(GraphError::InvalidArgument { what: "fan-out needs at least one outbound" });
    }
    Ok(self.install(Box::new(RoundRobinFanOutNode::new(outbounds as usize, eager_cancel)), 1, outbounds))
  }

  /// Broadcast fan-out over `outbounds` outlets; elements must be `Clone`.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `outbounds` is zero.
  pub fn fan_out_broadcast<T>(&mut self, outbounds: u32, eager_cancel: bool) -> Result<NodeHandle, GraphError>
  where
    T: Clone + Any + Send + Sync + 'static,
  {
    if outbounds == 0 {
      return Err(GraphError::InvalidArgument { what: "fan-out needs at least one outbound" });
    }
    let duplicate =
      |elem: &DynElem| -> Option<DynElem> { elem.downcast_ref::<T>().map(|value| Box::new(value.clone()) as DynElem) };
    Ok(self.install(Box::new(BroadcastFanOutNode::new(outbounds as usize, eager_cancel, Box::new(duplicate))), 1, outbounds))
  }

  /// Flatten over elements that are themselves iterable collections.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `parallelism` is zero.
  pub fn flatten_concat<T, I>(&mut self, parallelism: u32) -> Result<NodeHandle, GraphError>
  where
    T: Any + Send + Sync + 'static,
    I: IntoIterator<Item = T> + Any + Send + Sync + 'static,
    I::IntoIter: Send + 'static,
  {
    let adapter = |elem: DynElem| -> Result<Box<dyn NodeBehavior>, NodeFailure> {
      match elem.downcast::<I>() {
        | Ok(inner) => {
          let items = (*inner).into_iter().map(|item| Box::new(item) as DynElem);
          Ok(Box::new(IterSourceNode::new(Box::new(items))))
        },
        | Err(_) => Err(NodeFailure::Protocol("element type mismatch")),
      }
    };
    self.flatten_concat_with(parallelism, Box::new(adapter))
  }

  /// Flatten with a custom element-to-sub-source adapter.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `parallelism` is zero.
  pub fn flatten_concat_with(
    &mut self,
    parallelism: u32,
    adapter: Box<dyn FnMut(DynElem) -> Result<Box<dyn NodeBehavior>, NodeFailure> + Send>,
  ) -> Result<NodeHandle, GraphError> {
    if parallelism == 0 {
      return Err(GraphError::InvalidArgument { what: "flatten parallelism must be positive" });
    }
    Ok(self.install(Box::new(FlattenConcatNode::new(parallelism, adapter)), 1, 1))
  }

  /// In-order fan-in over `inbounds` inlets.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `inbounds` is zero.
  pub fn concat(&mut self, inbounds: u32) -> Result<NodeHandle, GraphError> {
    if inbounds == 0 {
      return Err(GraphError::InvalidArgument { what: "fan-in needs at least one inbound" });
    }
    Ok(self.install(Box::new(ConcatNode::new(inbounds as usize)), inbounds, 1))
  }

  /// Twinned relay pair for closing cycles; returns `(inlet, outlet)`.
  ///
  /// The internal edge between the two halves is pre-bound. A cycle closed
  /// through a coupling needs a [`GraphBuilder::buffer`] on it to issue the
  /// first demand.
  pub fn coupling(&mut self) -> (NodeHandle, NodeHandle) {
    let inlet = self.install(Box::new(RelayNode::new(NodeKind::CouplingInlet)), 1, 1);
    let outlet = self.install(Box::new(RelayNode::new(NodeKind::CouplingOutlet)), 1, 1);
    self.nodes[inlet.index].outlets[0] = Some((outlet.index, 0));
    self.nodes[outlet.index].inlets[0] = Some((inlet.index, 0));
    (inlet, outlet)
  }

  /// Fixed-credit buffer of the given capacity.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `capacity` is zero.
  pub fn buffer(&mut self, capacity: usize) -> Result<NodeHandle, GraphError> {
    if capacity == 0 {
      return Err(GraphError::InvalidArgument { what: "buffer capacity must be positive" });
    }
    Ok(self.install(Box::new(BufferNode::new(capacity)), 1, 1))
  }

  /// Sliding windows of `window` cloneable elements, emitted as `Vec<T>`.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `window` is zero.
  pub fn sliding<T>(&mut self, window: usize) -> Result<NodeHandle, GraphError>
  where
    T: Clone + Any + Send + Sync + 'static,
  {
    if window == 0 {
      return Err(GraphError::InvalidArgument { what: "sliding window must be positive" });
    }
    Ok(self.install(Box::new(SlidingNode::<T>::new(window)), 1, 1))
  }

  /// Forwards `count` elements, then cancels upstream and completes.
  pub fn take(&mut self, count: u64) -> NodeHandle {
    self.install(Box::new(TakeNode::new(count)), 1, 1)
  }

  /// Externally pushed source; returns the node and its producer handle.
  pub fn push_source<T>(&mut self, config: PushSourceConfig) -> (NodeHandle, PushSourceHandle<T>)
  where
    T: Any + Send + Sync + 'static,
  {
    let shared = Arc::new(PushShared::new(config));
    let handle = self.install(Box::new(PushSourceNode::new(Arc::clone(&shared))), 0, 1);
    (handle, PushSourceHandle::new(shared))
  }

  /// Terminal sink collecting every element into a `Vec<T>`.
  pub fn drain_all<T>(&mut self) -> (NodeHandle, Completion<Vec<T>>)
  where
    T: Any + Send + Sync + 'static,
  {
    let cell = Arc::new(CompletionCell::new());
    let handle = self.install(Box::new(DrainAllNode::<T>::new(Arc::clone(&cell))), 1, 0);
    (handle, Completion::new(cell))
  }

  /// Terminal sink resolving with the first element, then cancelling.
  pub fn drain_head<T>(&mut self) -> (NodeHandle, Completion<T>)
  where
    T: Any + Send + Sync + 'static,
  {
    let cell = Arc::new(CompletionCell::new());
    let handle = self.install(Box::new(DrainHeadNode::<T>::new(Arc::clone(&cell))), 1, 0);
    (handle, Completion::new(cell))
  }

  /// Marks the node as an async-region entry: edges into it become mailbox
  /// edges and its region drains on `executor`.
  pub fn set_executor(&mut self, node: NodeHandle, executor: Arc<dyn RegionExecutor>) {
    if let Some(built) = self.nodes.get_mut(node.index) {
      built.executor = Some(executor);
    }
  }

  /// Binds an outbound port to an inbound port.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::PortOutOfRange`] for an invalid port reference
  /// and [`GraphError::PortAlreadyBound`] when either side is already bound.
  pub fn connect(&mut self, from: OutletRef, to: InletRef) -> Result<(), GraphError> {
    let from_slot = self
      .nodes
      .get(from.node)
      .filter(|node| (from.port as usize) < node.outlets.len())
      .ok_or(GraphError::PortOutOfRange { node: from.id, port: from.port, direction: PortDirection::Outbound })?;
    let to_slot = self
      .nodes
      .get(to.node)
      .filter(|node| (to.port as usize) < node.inlets.len())
      .ok_or(GraphError::PortOutOfRange { node: to.id, port: to.port, direction: PortDirection::Inbound })?;
    if from_slot.outlets[from.port as usize].is_some() {
      return Err(GraphError::PortAlreadyBound { node: from.id, port: from.port, direction: PortDirection::Outbound });
    }
    if to_slot.inlets[to.port as usize].is_some() {
      return Err(GraphError::PortAlreadyBound { node: to.id, port: to.port, direction: PortDirection::Inbound });
    }
    self.nodes[from.node].outlets[from.port as usize] = Some((to.node, to.port as usize));
    self.nodes[to.node].inlets[to.port as usize] = Some((from.node, from.port as usize));
    Ok(())
  }

  /// Discovers regions, seals every node, and starts the graph.
  ///
  /// Synchronous regions run to quiescence on the calling thread before this
  /// returns; asynchronous regions continue on their executors.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::EmptyGraph`], [`GraphError::UnboundPort`], or
  /// [`GraphError::ExecutorConflict`] when the graph cannot be sealed.
  pub fn run(self) -> Result<RunningGraph, GraphError> {
    if self.nodes.is_empty() {
      return Err(GraphError::EmptyGraph);
    }
    for node in &self.nodes {
      for (port, binding) in node.inlets.iter().enumerate() {
        if binding.is_none() {
          return Err(GraphError::UnboundPort { node: node.id, port: port as u32, direction: PortDirection::Inbound });
        }
      }
      for (port, binding) in node.outlets.iter().enumerate() {
        if binding.is_none() {
          return Err(GraphError::UnboundPort { node: node.id, port: port as u32, direction: PortDirection::Outbound });
        }
      }
    }

    // nodes connected without an async boundary share a region; an edge into
    // an executor-tagged node is a boundary
    let len = self.nodes.len();
    let mut sets = UnionFind::new(len);
    for (index, node) in self.nodes.iter().enumerate() {
      for binding in node.outlets.iter().flatten() {
        let (peer, _) = *binding;
        if self.nodes[peer].executor.is_none() {
          sets.union(index, peer);
        }
      }
    }

    let mut region_of_root: HashMap<usize, usize> = HashMap::new();
    let mut executors: Vec<Option<Arc<dyn RegionExecutor>>> = Vec::new();
    let mut region_of_node: Vec<usize> = Vec::with_capacity(len);
    for index in 0..len {
      let root = sets.find(index);
      let region = *region_of_root.entry(root).or_insert_with(|| {
        executors.push(None);
        executors.len() - 1
      });
      region_of_node.push(region);
      if let Some(executor) = &self.nodes[index].executor {
        match &executors[region] {
          | None => executors[region] = Some(Arc::clone(executor)),
          | Some(existing) => {
            if !Arc::ptr_eq(existing, executor) {
              return Err(GraphError::ExecutorConflict { node: self.nodes[index].id });
            }
          },
        }
      }
    }

    let regions: Vec<Arc<RegionShared>> = executors
      .iter()
      .map(|executor| {
        RegionShared::new(match executor {
          | None => ExecutionMode::Caller,
          | Some(executor) => ExecutionMode::External(Arc::clone(executor)),
        })
      })
      .collect();

    let mut locals: Vec<usize> = Vec::with_capacity(len);
    let mut counts: Vec<usize> = vec![0; regions.len()];
    for index in 0..len {
      let region = region_of_node[index];
      locals.push(counts[region]);
      counts[region] += 1;
    }

    let resolve = |home: usize, peer: usize, port: usize| -> PeerRef {
      let peer_region = region_of_node[peer];
      if peer_region == home {
        PeerRef::Local { node: locals[peer], port }
      } else {
        PeerRef::Remote { region: Arc::downgrade(&regions[peer_region]), node: locals[peer], port }
      }
    };

    let mut index = HashMap::with_capacity(len);
    for (builder_index, node) in self.nodes.into_iter().enumerate() {
      let region = region_of_node[builder_index];
      let inlet_count = node.inlets.len();
      let outlet_count = node.outlets.len();
      let mut slot = NodeSlot::new(node.id, node.behavior, inlet_count, outlet_count);
      for (port, binding) in node.inlets.iter().enumerate() {
        if let Some((peer, peer_port)) = binding {
          slot.inlets[port] = Some(resolve(region, *peer, *peer_port));
        }
      }
      for (port, binding) in node.outlets.iter().enumerate() {
        if let Some((peer, peer_port)) = binding {
          slot.outlets[port] = Some(resolve(region, *peer, *peer_port));
        }
      }
      regions[region].with_core(|core| core.install(slot));
      index.insert(node.id, (region, locals[builder_index]));
    }

    for region in &regions {
      region.with_core(|core| {
        for node in 0..core.nodes.len() {
          core.seal_node(node);
        }
      });
    }
    for region in &regions {
      region.post(RegionOp::StartRegion);
    }

    Ok(RunningGraph::new(regions, index))
  }
}

impl Default for GraphBuilder {
  fn default() -> Self {
    Self::new()
  }
}
