use crate::core::{Effects, NodeBehavior, NodeFailure, NodeKind, PortRef, Signal, SignalFrame};

/// Forwards up to `count` elements, then cancels upstream and completes.
///
/// Upstream requests are capped so cumulative granted demand never exceeds
/// the take budget.
pub(in crate::core) struct TakeNode {
  remaining: u64,
  granted:   u64,
}

impl TakeNode {
  pub(in crate::core) const fn new(count: u64) -> Self {
    Self { remaining: count, granted: 0 }
  }
}

impl NodeBehavior for TakeNode {
  fn kind(&self) -> NodeKind {
    NodeKind::Take
  }

  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure> {
    match (frame.port, frame.signal) {
      | (PortRef::Outlet(0), Signal::Request(amount)) => {
        if self.remaining == 0 {
          fx.cancel(0);
          fx.complete(0);
          fx.terminate();
          return Ok(());
        }
        let grant = amount.min(self.remaining.saturating_sub(self.granted));
        if grant > 0 {
          self.granted = self.granted.saturating_add(grant);
          fx.request(0, grant);
        }
      },
      | (PortRef::Inlet(0), Signal::Next(elem)) => {
        if self.remaining == 0 {
          return Err(NodeFailure::Protocol("element delivered without demand"));
        }
        self.remaining -= 1;
        fx.push(0, elem);
        if self.remaining == 0 {
          fx.cancel(0);
          fx.complete(0);
          fx.terminate();
        }
      },
      | (PortRef::Inlet(0), Signal::Complete) => {
        fx.complete(0);
        fx.terminate();
      },
      | (PortRef::Inlet(0), Signal::Error(error)) => {
        fx.error(0, error);
        fx.terminate();
      },
      | (PortRef::Outlet(0), Signal::Cancel) => {
        fx.cancel(0);
        fx.terminate();
      },
      | _ => {},
    }
    Ok(())
  }
}
