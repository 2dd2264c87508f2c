use alloc::boxed::Box;

/// A unit of region work handed to an executor.
pub type ExecutorJob = Box<dyn FnOnce() + Send + 'static>;

/// Executor seam for asynchronous regions.
///
/// An implementation only has to run the job somewhere, eventually, exactly
/// once; the region's wake-once flag guarantees that at most one job per
/// region is outstanding at any time.
pub trait RegionExecutor: Send + Sync {
  /// Schedules the job for execution.
  fn execute(&self, job: ExecutorJob);
}
