extern crate std;

use core::any::Any;
use core::time::Duration;
use std::time::Instant;

use crate::core::Completion;

/// Blocks until the completion is ready or the timeout elapses.
///
/// Returns whether the completion became ready. Polling with a short sleep
/// is deliberate: completions resolve from region executors, and the core
/// has no blocking primitive to park on.
pub fn wait_ready<T>(completion: &Completion<T>, timeout: Duration) -> bool
where
  T: Any + Send + Sync + 'static,
{
  let deadline = Instant::now() + timeout;
  while !completion.is_ready() {
    if Instant::now() >= deadline {
      return false;
    }
    std::thread::sleep(Duration::from_millis(1));
  }
  true
}
