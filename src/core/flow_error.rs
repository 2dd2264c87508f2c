use alloc::sync::Arc;
use core::fmt;

use super::{NodeFailure, NodeId, NodeKind};

/// Error surfaced by a running graph.
///
/// Every variant produced by a node carries the offending node's id and kind
/// so failures remain attributable after the graph has torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
  /// A user-supplied callback failed.
  User {
    /// Failing node.
    node:    NodeId,
    /// Kind of the failing node.
    kind:    NodeKind,
    /// Message produced by the callback.
    message: Arc<str>,
  },
  /// A streaming-protocol invariant was observed to fail.
  Protocol {
    /// Failing node.
    node:      NodeId,
    /// Kind of the failing node.
    kind:      NodeKind,
    /// Violated invariant.
    violation: &'static str,
  },
  /// A downstream resource failed while handling a signal.
  Resource {
    /// Failing node.
    node:    NodeId,
    /// Kind of the failing node.
    kind:    NodeKind,
    /// Failure description.
    message: Arc<str>,
  },
  /// The upstream completed before delivering a single element.
  EmptyStream {
    /// Node that observed the empty completion.
    node: NodeId,
  },
  /// A tail sub-source was drained more than once.
  TailAlreadyAttached {
    /// The tail node.
    node: NodeId,
  },
  /// A completion value could not be downcast to the requested type.
  TypeMismatch {
    /// Name of the requested type.
    expected: &'static str,
  },
}

impl FlowError {
  pub(in crate::core) fn from_failure(node: NodeId, kind: NodeKind, failure: NodeFailure) -> Self {
    match failure {
      | NodeFailure::User(message) => Self::User { node, kind, message: Arc::from(message.as_str()) },
      | NodeFailure::Protocol(violation) => Self::Protocol { node, kind, violation },
      | NodeFailure::Resource(message) => Self::Resource { node, kind, message: Arc::from(message.as_str()) },
    }
  }

  /// Returns the id of the node that produced this error, if any.
  #[must_use]
  pub const fn node(&self) -> Option<NodeId> {
    match self {
      | Self::User { node, .. }
      | Self::Protocol { node, .. }
      | Self::Resource { node, .. }
      | Self::EmptyStream { node }
      | Self::TailAlreadyAttached { node } => Some(*node),
      | Self::TypeMismatch { .. } => None,
    }
  }
}

impl fmt::Display for FlowError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::User { node, kind, message } => write!(f, "user callback failed in {kind} {node}: {message}"),
      | Self::Protocol { node, kind, violation } => write!(f, "protocol violation in {kind} {node}: {violation}"),
      | Self::Resource { node, kind, message } => write!(f, "resource failure in {kind} {node}: {message}"),
      | Self::EmptyStream { node } => write!(f, "upstream of {node} completed without an element"),
      | Self::TailAlreadyAttached { node } => write!(f, "tail source {node} was already drained"),
      | Self::TypeMismatch { expected } => write!(f, "completion value is not a {expected}"),
    }
  }
}
