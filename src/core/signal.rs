use core::fmt;

use super::{DynElem, ExtEvent, FlowError};

/// One message of the streaming protocol.
///
/// `Request` and `Cancel` travel downstream-to-upstream, `Next`, `Complete`,
/// `Error`, and `Subscribe` travel upstream-to-downstream, and `Start` /
/// `Event` are delivered by the region to the node itself.
pub enum Signal {
  /// Grant of additional demand; the amount is strictly positive.
  Request(u64),
  /// Downstream releases the edge; terminal in the upstream direction.
  Cancel,
  /// One stream element.
  Next(DynElem),
  /// Upstream finished; terminal.
  Complete,
  /// Upstream failed; terminal.
  Error(FlowError),
  /// Fired once by the region when it starts.
  Start,
  /// Free-form region-to-node extension event.
  Event(ExtEvent),
  /// A freshly spawned sub-source announces itself on its outlet.
  Subscribe,
}

impl Signal {
  /// Short name for diagnostics.
  #[must_use]
  pub const fn describe(&self) -> &'static str {
    match self {
      | Self::Request(_) => "request",
      | Self::Cancel => "cancel",
      | Self::Next(_) => "next",
      | Self::Complete => "complete",
      | Self::Error(_) => "error",
      | Self::Start => "start",
      | Self::Event(_) => "event",
      | Self::Subscribe => "subscribe",
    }
  }

  /// Returns `true` for signals that close the edge they travel on.
  #[must_use]
  pub const fn is_terminal(&self) -> bool {
    matches!(self, Self::Cancel | Self::Complete | Self::Error(_))
  }
}

impl fmt::Debug for Signal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Request(n) => write!(f, "Request({n})"),
      | Self::Next(_) => f.write_str("Next(..)"),
      | Self::Error(error) => write!(f, "Error({error})"),
      | Self::Event(event) => write!(f, "Event({event:?})"),
      | other => f.write_str(other.describe()),
    }
  }
}
