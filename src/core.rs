//! The runtime core: signals, nodes, regions, and the graph builder.

/// Poll-style completion handle.
mod completion;
/// Demand model type.
mod demand;
/// Demand accumulation helper.
mod demand_tracker;
/// Deferred-emission collector handed to node state machines.
mod effects;
/// Execution mode of a region.
mod execution_mode;
/// Region-to-node extension events.
mod ext_event;
/// Runtime error type.
mod flow_error;
/// Build-time error type.
mod graph_error;
/// Incremental graph construction.
mod graph_builder;
/// Inline executor.
mod immediate_executor;
/// Per-node FIFO of deferred signal frames.
mod intercept_buffer;
/// Node state machines.
mod node;
/// Node state-machine trait.
mod node_behavior;
/// Port handles carried by node handles.
mod node_handle;
/// Stable node identity.
mod node_id;
/// Node failure taxonomy.
mod node_failure;
/// Structural node tag.
mod node_kind;
/// Per-region node storage.
mod node_slot;
/// Port addressing on a node.
mod port_ref;
/// Push-source shared queue state.
mod push_queue;
/// Push-source capacity configuration.
mod push_source_config;
/// Push-source producer handle.
mod push_source_handle;
/// Region dispatch loop.
mod region_core;
/// Executor seam for asynchronous regions.
mod region_executor;
/// Region mailbox entries.
mod region_op;
/// Shared region state and the wake-once protocol.
mod region_shared;
/// Running graph handle.
mod running_graph;
/// Seal-time node context.
mod seal_context;
/// The signal universe.
mod signal;
/// Queued signal record.
mod signal_envelope;
/// Signal as delivered to a node.
mod signal_frame;
/// Region mailbox queue.
mod signal_queue;
/// Runtime handle to a spawned tail sub-source.
mod sub_source_ref;
/// Connected-component discovery over sync edges.
mod union_find;

use alloc::boxed::Box;
use core::any::Any;

pub use completion::Completion;
pub use demand::Demand;
pub use demand_tracker::DemandTracker;
pub use effects::Effects;
pub use ext_event::ExtEvent;
pub use flow_error::FlowError;
pub use graph_builder::GraphBuilder;
pub use graph_error::{GraphError, PortDirection};
pub use immediate_executor::ImmediateExecutor;
pub use node_behavior::NodeBehavior;
pub use node_failure::NodeFailure;
pub use node_handle::{InletRef, NodeHandle, OutletRef};
pub use node_id::NodeId;
pub use node_kind::NodeKind;
pub use port_ref::PortRef;
pub use push_source_config::PushSourceConfig;
pub use push_source_handle::PushSourceHandle;
pub use region_executor::{ExecutorJob, RegionExecutor};
pub use running_graph::RunningGraph;
pub use seal_context::SealContext;
pub use signal::Signal;
pub use signal_frame::SignalFrame;
pub use sub_source_ref::SubSourceRef;

pub(in crate::core) use completion::CompletionCell;
pub(in crate::core) use effects::Emission;
pub(in crate::core) use execution_mode::ExecutionMode;
pub(in crate::core) use intercept_buffer::InterceptBuffer;
pub(in crate::core) use node_slot::{NodeSlot, PeerRef};
pub(in crate::core) use push_queue::{PushShared, PushTermination};
pub(in crate::core) use region_core::RegionCore;
pub(in crate::core) use region_op::RegionOp;
pub(in crate::core) use region_shared::RegionShared;
pub(in crate::core) use signal_envelope::SignalEnvelope;
pub(in crate::core) use signal_queue::SignalQueue;
pub(in crate::core) use union_find::UnionFind;

/// Type-erased stream element.
pub type DynElem = Box<dyn Any + Send + Sync + 'static>;
