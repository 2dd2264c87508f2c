use super::{PortRef, Signal};

/// A signal queued for delivery to a node of the owning region.
///
/// Envelopes are what intercept buffers and region mailboxes hold; the target
/// is a region-local node index.
#[derive(Debug)]
pub(in crate::core) struct SignalEnvelope {
  pub(in crate::core) target: usize,
  pub(in crate::core) port:   PortRef,
  pub(in crate::core) signal: Signal,
}
