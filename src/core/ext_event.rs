use alloc::string::String;
use core::fmt;

use super::DynElem;

/// Region-to-node extension event, outside the four-signal data protocol.
pub enum ExtEvent {
  /// A push-source producer enqueued at least one element.
  NewAvailable,
  /// A push-source producer requested completion.
  Complete,
  /// A push-source producer requested failure with the given message.
  ErrorComplete(String),
  /// Free-form payload for custom nodes.
  Custom(DynElem),
}

impl fmt::Debug for ExtEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::NewAvailable => f.write_str("NewAvailable"),
      | Self::Complete => f.write_str("Complete"),
      | Self::ErrorComplete(message) => write!(f, "ErrorComplete({message})"),
      | Self::Custom(_) => f.write_str("Custom(..)"),
    }
  }
}
