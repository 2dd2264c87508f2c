use core::fmt;

/// Structural tag describing what a node does.
///
/// Kinds have no runtime effect; they exist for graph analysis and for error
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
  /// Linear one-to-one transformer.
  Map,
  /// Finite iterator source.
  IterSource,
  /// Externally pushed source backed by a concurrent queue.
  PushSource,
  /// Prefix-collecting gate that spawns a tail sub-source.
  PrefixAndTail,
  /// Spawned tail standing in for the rest of an upstream.
  TailSource,
  /// Spawned inner source of a stream-of-streams operator.
  SubSource,
  /// Round-robin fan-out.
  RoundRobinFanOut,
  /// Broadcast fan-out.
  BroadcastFanOut,
  /// Stream-of-streams flatten with bounded parallelism.
  FlattenConcat,
  /// In-order fan-in.
  Concat,
  /// Inbound half of a coupling pair.
  CouplingInlet,
  /// Outbound half of a coupling pair.
  CouplingOutlet,
  /// Fixed-credit element buffer.
  Buffer,
  /// Sliding window over cloneable elements.
  Sliding,
  /// Forwards a bounded number of elements, then cancels.
  Take,
  /// Terminal sink collecting every element.
  DrainAll,
  /// Terminal sink resolving with the first element.
  DrainHead,
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      | Self::Map => "map",
      | Self::IterSource => "iter-source",
      | Self::PushSource => "push-source",
      | Self::PrefixAndTail => "prefix-and-tail",
      | Self::TailSource => "tail-source",
      | Self::SubSource => "sub-source",
      | Self::RoundRobinFanOut => "round-robin-fan-out",
      | Self::BroadcastFanOut => "broadcast-fan-out",
      | Self::FlattenConcat => "flatten-concat",
      | Self::Concat => "concat",
      | Self::CouplingInlet => "coupling-inlet",
      | Self::CouplingOutlet => "coupling-outlet",
      | Self::Buffer => "buffer",
      | Self::Sliding => "sliding",
      | Self::Take => "take",
      | Self::DrainAll => "drain-all",
      | Self::DrainHead => "drain-head",
    };
    f.write_str(name)
  }
}
