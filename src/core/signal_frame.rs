use super::{PortRef, Signal};

/// A signal paired with the port it arrived on, as handed to a node's state
/// machine.
#[derive(Debug)]
pub struct SignalFrame {
  /// Arrival port.
  pub port:   PortRef,
  /// The signal itself.
  pub signal: Signal,
}
