use core::fmt;

use super::NodeId;

/// Direction of a port, seen from its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
  /// Inbound port.
  Inbound,
  /// Outbound port.
  Outbound,
}

impl fmt::Display for PortDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Inbound => f.write_str("inlet"),
      | Self::Outbound => f.write_str("outlet"),
    }
  }
}

/// Error raised while building or sealing a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
  /// A port was connected twice.
  PortAlreadyBound {
    /// Owning node.
    node:      NodeId,
    /// Port index on the node.
    port:      u32,
    /// Port direction.
    direction: PortDirection,
  },
  /// A port was still unbound when the graph was run.
  UnboundPort {
    /// Owning node.
    node:      NodeId,
    /// Port index on the node.
    port:      u32,
    /// Port direction.
    direction: PortDirection,
  },
  /// A port reference named a port the node does not have.
  PortOutOfRange {
    /// Owning node.
    node:      NodeId,
    /// Port index on the node.
    port:      u32,
    /// Port direction.
    direction: PortDirection,
  },
  /// A node parameter was outside its accepted range.
  InvalidArgument {
    /// Parameter description.
    what: &'static str,
  },
  /// Two async entry nodes with different executors ended up in one region.
  ExecutorConflict {
    /// The second async entry observed.
    node: NodeId,
  },
  /// The graph contains no nodes.
  EmptyGraph,
}

impl fmt::Display for GraphError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::PortAlreadyBound { node, port, direction } => {
        write!(f, "{direction} {port} of node {node} is already bound")
      },
      | Self::UnboundPort { node, port, direction } => write!(f, "{direction} {port} of node {node} is not bound"),
      | Self::PortOutOfRange { node, port, direction } => {
        write!(f, "node {node} has no {direction} {port}")
      },
      | Self::InvalidArgument { what } => write!(f, "invalid argument: {what}"),
      | Self::ExecutorConflict { node } => {
        write!(f, "node {node} requests an executor but its region already has a different one")
      },
      | Self::EmptyGraph => f.write_str("graph contains no nodes"),
    }
  }
}
