extern crate std;

use alloc::string::{String, ToString};
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::core::{ExecutorJob, RegionExecutor};

/// Region executor spawning drain jobs on a Tokio runtime.
///
/// Jobs run inside `catch_unwind`: a panicking node is a fatal condition for
/// its region, but it must not take the runtime's worker threads down with
/// it. The panic is reported through `tracing` and the region stays torn
/// down (its wake flag is never cleared, so no further work is scheduled).
#[derive(Debug, Clone)]
pub struct TokioRegionExecutor {
  handle: tokio::runtime::Handle,
}

impl TokioRegionExecutor {
  /// Uses the given runtime handle.
  #[must_use]
  pub const fn new(handle: tokio::runtime::Handle) -> Self {
    Self { handle }
  }

  /// Uses the runtime the caller is currently inside of.
  ///
  /// # Panics
  ///
  /// Panics when called outside a Tokio runtime.
  #[must_use]
  pub fn current() -> Self {
    Self::new(tokio::runtime::Handle::current())
  }
}

impl RegionExecutor for TokioRegionExecutor {
  fn execute(&self, job: ExecutorJob) {
    self.handle.spawn(async move {
      if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
        let message = panic
          .downcast_ref::<&str>()
          .map(|text| (*text).to_string())
          .or_else(|| panic.downcast_ref::<String>().cloned())
          .unwrap_or_else(|| "non-string panic payload".to_string());
        tracing::error!(target: "sluice", %message, "region drain job panicked; region torn down");
      }
    });
  }
}
