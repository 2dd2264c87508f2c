use alloc::string::String;

/// Failure raised by a node state machine, before node identity is attached.
///
/// The region turns a failure into a [`FlowError`](super::FlowError) carrying
/// the failing node's id and kind, cancels the node's live upstreams, errors
/// its live downstreams, and marks it terminal.
#[derive(Debug)]
pub enum NodeFailure {
  /// A user-supplied callback failed.
  User(String),
  /// A protocol invariant was observed to fail.
  Protocol(&'static str),
  /// A downstream resource failed while handling a signal.
  Resource(String),
}
