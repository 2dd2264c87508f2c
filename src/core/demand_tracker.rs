#[cfg(test)]
mod tests;

use super::{Demand, NodeFailure};

/// Accumulates downstream demand for one edge.
///
/// Demand saturates to [`Demand::Unbounded`] instead of overflowing, which is
/// what makes `request(u64::MAX)` a usable "give me everything" grant.
#[derive(Debug, Clone)]
pub struct DemandTracker {
  current: Demand,
}

impl DemandTracker {
  /// Creates a tracker with zero demand.
  #[must_use]
  pub const fn new() -> Self {
    Self { current: Demand::Finite(0) }
  }

  /// Returns the current demand.
  #[must_use]
  pub const fn demand(&self) -> Demand {
    self.current
  }

  /// Returns `true` if at least one element may be emitted.
  #[must_use]
  pub const fn has_demand(&self) -> bool {
    self.current.has_demand()
  }

  /// Adds a received `Request(amount)` grant.
  ///
  /// # Errors
  ///
  /// Returns a protocol failure when `amount` is zero; the protocol requires
  /// strictly positive requests.
  pub const fn accumulate(&mut self, amount: u64) -> Result<(), NodeFailure> {
    if amount == 0 {
      return Err(NodeFailure::Protocol("request carried zero demand"));
    }
    self.current = match self.current {
      | Demand::Unbounded => Demand::Unbounded,
      | Demand::Finite(current) => match current.checked_add(amount) {
        | Some(total) => Demand::Finite(total),
        | None => Demand::Unbounded,
      },
    };
    Ok(())
  }

  /// Consumes one unit of demand; returns `false` when none is available.
  pub const fn consume_one(&mut self) -> bool {
    match self.current {
      | Demand::Unbounded => true,
      | Demand::Finite(remaining) if remaining > 0 => {
        self.current = Demand::Finite(remaining - 1);
        true
      },
      | Demand::Finite(_) => false,
    }
  }
}

impl Default for DemandTracker {
  fn default() -> Self {
    Self::new()
  }
}
