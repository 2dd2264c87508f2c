#[cfg(test)]
mod tests;

use alloc::sync::Arc;
use core::{any::Any, marker::PhantomData};

use portable_atomic::{AtomicBool, Ordering};
use spin::Mutex;

use super::{DynElem, FlowError};

/// Shared cell a drain node resolves exactly once.
pub(in crate::core) struct CompletionCell {
  ready: AtomicBool,
  value: Mutex<Option<Result<DynElem, FlowError>>>,
}

impl CompletionCell {
  pub(in crate::core) const fn new() -> Self {
    Self { ready: AtomicBool::new(false), value: Mutex::new(None) }
  }

  /// First fulfillment wins; later calls are ignored.
  pub(in crate::core) fn fulfill(&self, result: Result<DynElem, FlowError>) {
    let mut slot = self.value.lock();
    if slot.is_none() {
      *slot = Some(result);
      self.ready.store(true, Ordering::Release);
    }
  }

  pub(in crate::core) fn is_ready(&self) -> bool {
    self.ready.load(Ordering::Acquire)
  }

  pub(in crate::core) fn take(&self) -> Option<Result<DynElem, FlowError>> {
    if !self.is_ready() {
      return None;
    }
    self.value.lock().take()
  }
}

/// Poll-style handle to the result of a drain node.
///
/// Fully synchronous graphs are already resolved when `run` returns; graphs
/// with asynchronous regions resolve later, from the region's executor.
pub struct Completion<T> {
  cell: Arc<CompletionCell>,
  _pd:  PhantomData<fn() -> T>,
}

impl<T> Completion<T>
where
  T: Any + Send + Sync + 'static,
{
  pub(in crate::core) fn new(cell: Arc<CompletionCell>) -> Self {
    Self { cell, _pd: PhantomData }
  }

  /// Returns `true` once a result is available.
  #[must_use]
  pub fn is_ready(&self) -> bool {
    self.cell.is_ready()
  }

  /// Takes the result if one is available; subsequent calls return `None`.
  #[must_use]
  pub fn try_take(&self) -> Option<Result<T, FlowError>> {
    let result = self.cell.take()?;
    Some(match result {
      | Ok(value) => match value.downcast::<T>() {
        | Ok(value) => Ok(*value),
        | Err(_) => Err(FlowError::TypeMismatch { expected: core::any::type_name::<T>() }),
      },
      | Err(error) => Err(error),
    })
  }
}

impl<T> Clone for Completion<T> {
  fn clone(&self) -> Self {
    Self { cell: Arc::clone(&self.cell), _pd: PhantomData }
  }
}
