use super::GraphError;

/// Capacity configuration of a push-source queue.
///
/// The queue starts at `initial_capacity` and grows on demand up to a bounded
/// maximum: `max_capacity` rounded up to a power of two strictly greater than
/// `initial_capacity`. Offers against a full queue are rejected, never
/// dropped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushSourceConfig {
  initial_capacity: usize,
  max_capacity:     usize,
}

impl PushSourceConfig {
  /// Creates a validated configuration.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::InvalidArgument`] when `initial_capacity < 2` or
  /// `max_capacity < 4`.
  pub fn new(initial_capacity: usize, max_capacity: usize) -> Result<Self, GraphError> {
    if initial_capacity < 2 {
      return Err(GraphError::InvalidArgument { what: "push-source initial capacity must be at least 2" });
    }
    if max_capacity < 4 {
      return Err(GraphError::InvalidArgument { what: "push-source max capacity must be at least 4" });
    }
    let mut rounded = max_capacity.next_power_of_two();
    while rounded <= initial_capacity {
      rounded = rounded.saturating_mul(2);
    }
    Ok(Self { initial_capacity, max_capacity: rounded })
  }

  /// Capacity the queue starts with.
  #[must_use]
  pub const fn initial_capacity(&self) -> usize {
    self.initial_capacity
  }

  /// Upper bound the queue may grow to.
  #[must_use]
  pub const fn max_capacity(&self) -> usize {
    self.max_capacity
  }
}
