use super::{Effects, NodeFailure, NodeKind, SealContext, SignalFrame};

/// State machine of a node.
///
/// A behavior owns the node's current state and is driven one signal at a
/// time by its region. Emissions requested through [`Effects`] are dispatched
/// depth-first after the call returns; signals that bounce back at the node
/// while its emissions are still in flight are parked in the intercept buffer
/// and replayed in order against the then-current state.
///
/// Returning an error recovers locally: the region cancels the node's live
/// upstreams, errors its live downstreams, and marks the node terminal.
pub trait NodeBehavior: Send {
  /// Structural tag of the node.
  fn kind(&self) -> NodeKind;

  /// Whether reentrant signals are parked in the intercept buffer.
  ///
  /// Provably pass-through states may return `false`, in which case the
  /// dispatcher skips the buffer and runs the state function directly.
  fn intercepts(&self) -> bool {
    true
  }

  /// Seal-time hook; commonly registers the node for `Start`.
  fn on_sealed(&mut self, ctx: &mut SealContext<'_>) {
    let _ = ctx;
  }

  /// Handles one signal.
  ///
  /// # Errors
  ///
  /// Returns a [`NodeFailure`] when a user callback or a protocol invariant
  /// failed; the region performs the recovery described above.
  fn on_signal(&mut self, frame: SignalFrame, fx: &mut Effects<'_>) -> Result<(), NodeFailure>;
}
