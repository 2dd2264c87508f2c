//! Node state machines.
//!
//! Every node is an explicit state struct driven one signal at a time; no
//! state machine here blocks, recurses into itself, or touches anything
//! outside its own region.

/// Fixed-credit element buffer.
mod buffer;
/// In-order fan-in.
mod concat;
/// Coupling relay halves.
mod coupling;
/// Collecting terminal sink.
mod drain_all;
/// First-element terminal sink.
mod drain_head;
/// Broadcast fan-out.
mod fan_out_broadcast;
/// Round-robin fan-out.
mod fan_out_round_robin;
/// Bounded-parallelism stream-of-streams flatten.
mod flatten_concat;
/// Finite iterator source.
mod iter_source;
/// Linear transformer.
mod map;
/// Prefix gate spawning a tail sub-source.
mod prefix_and_tail;
/// Externally pushed source.
mod push_source;
/// Spawned sub-source nodes.
mod sub_source;
/// Bounded forwarder.
mod take;
/// Sliding window.
mod sliding;

pub(in crate::core) use buffer::BufferNode;
pub(in crate::core) use concat::ConcatNode;
pub(in crate::core) use coupling::RelayNode;
pub(in crate::core) use drain_all::DrainAllNode;
pub(in crate::core) use drain_head::DrainHeadNode;
pub(in crate::core) use fan_out_broadcast::BroadcastFanOutNode;
pub(in crate::core) use fan_out_round_robin::RoundRobinFanOutNode;
pub(in crate::core) use flatten_concat::FlattenConcatNode;
pub(in crate::core) use iter_source::IterSourceNode;
pub(in crate::core) use map::MapNode;
pub(in crate::core) use prefix_and_tail::PrefixAndTailNode;
pub(in crate::core) use push_source::PushSourceNode;
pub(in crate::core) use sub_source::{SubSourceAnnounce, TailSourceNode};
pub(in crate::core) use take::TakeNode;
pub(in crate::core) use sliding::SlidingNode;
