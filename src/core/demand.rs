/// Accumulated permission granted by a downstream to emit elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
  /// Finite demand with remaining count.
  Finite(u64),
  /// Demand saturated beyond `u64::MAX`; treated as unbounded.
  Unbounded,
}

impl Demand {
  /// Returns `true` if the demand is unbounded.
  #[must_use]
  pub const fn is_unbounded(&self) -> bool {
    matches!(self, Self::Unbounded)
  }

  /// Returns `true` if at least one element may be emitted.
  #[must_use]
  pub const fn has_demand(&self) -> bool {
    matches!(self, Self::Unbounded) || matches!(self, Self::Finite(remaining) if *remaining > 0)
  }

  /// Amount to forward when retargeting this demand to a new upstream.
  #[must_use]
  pub const fn forwardable(&self) -> u64 {
    match self {
      | Self::Finite(remaining) => *remaining,
      | Self::Unbounded => u64::MAX,
    }
  }
}
