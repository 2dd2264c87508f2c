//! Standard-library layer: Tokio-backed region execution and blocking
//! completion helpers.

/// Blocking waits on completion handles.
mod completion_wait;
/// Tokio-backed region executor.
mod tokio_region_executor;

pub use completion_wait::wait_ready;
pub use tokio_region_executor::TokioRegionExecutor;
