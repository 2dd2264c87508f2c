use crate::core::{Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, Signal, SignalFrame};

/// One half of a coupling pair: a pure relay between its inlet and outlet.
///
/// The two halves are pre-connected at build time, so a cycle closed through
/// them is just two forwarding hops. A pure cycle of demand edges cannot
/// generate its first request; a buffer node on the cycle supplies the phase
/// offset.
pub(in crate::core) struct RelayNode {
  role: NodeKind,
}

impl RelayNode {
  pub(in crate::core) const fn new(role: NodeKind) -> Self {
    Self { role }
  }
}

impl NodeBehavior for RelayNode {
  fn kind(&self) -> NodeKind {
    self.role
  }

  fn intercepts(&self) -> bool {
    false
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Inlet(0), Signal::Next(elem)) => fx.push(0, elem),
      | (PortRef::Inlet(0), Signal::Complete) => {
        fx.complete(0);
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        fx.error(0, error);
        fx.terminate();
      },
      | (PortRef::Outlet(0), Signal::Request(amount)) => fx.request(0, amount),
      | (PortRef::Outlet(0), Signal::Cancel) => {
        fx.cancel(0);
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
