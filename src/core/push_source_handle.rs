use alloc::{boxed::Box, string::String, sync::Arc};
use core::{any::Any, fmt, marker::PhantomData};

use super::{PushShared, PushTermination};

/// Producer handle of a push-source node.
///
/// Clones may be offered to from arbitrary threads; the node's region is the
/// single consumer. Rejected offers return `false` so the producer can decide
/// what to do, the queue never drops silently.
pub struct PushSourceHandle<T> {
  shared: Arc<PushShared>,
  _pd:    PhantomData<fn(T)>,
}

impl<T> PushSourceHandle<T>
where
  T: Any + Send + Sync + 'static,
{
  pub(in crate::core) fn new(shared: Arc<PushShared>) -> Self {
    Self { shared, _pd: PhantomData }
  }

  /// Attempts to enqueue one element; `false` means the queue is full.
  #[must_use]
  pub fn offer(&self, elem: T) -> bool {
    if self.shared.offer(Box::new(elem)) {
      self.shared.announce_available();
      true
    } else {
      false
    }
  }

  /// Enqueues greedily up to the first rejection; returns the accepted count.
  pub fn offer_many<I>(&self, elems: I) -> u32
  where
    I: IntoIterator<Item = T>,
  {
    let mut accepted = 0_u32;
    for elem in elems {
      if !self.shared.offer(Box::new(elem)) {
        break;
      }
      accepted += 1;
    }
    if accepted > 0 {
      self.shared.announce_available();
    }
    accepted
  }

  /// Completes the stream once the queue has drained.
  pub fn complete(&self) {
    self.shared.request_termination(PushTermination::Complete);
  }

  /// Fails the stream after draining what current demand allows.
  pub fn error_complete(&self, message: impl Into<String>) {
    self.shared.request_termination(PushTermination::Error(message.into()));
  }

  /// Approximate number of queued elements; not synchronized.
  #[must_use]
  pub fn queue_size(&self) -> usize {
    self.shared.len()
  }

  /// Whether the next `offer` would currently be accepted; not synchronized.
  #[must_use]
  pub fn accepts_next(&self) -> bool {
    self.shared.accepts_next()
  }

  /// Registers the callback invoked with the count after elements were
  /// dequeued, possibly from the region's thread.
  pub fn on_dequeued(&self, callback: impl Fn(u64) + Send + Sync + 'static) {
    self.shared.set_on_dequeued(Box::new(callback));
  }

  /// Registers the callback invoked exactly once when downstream cancels.
  pub fn on_cancel(&self, callback: impl Fn() + Send + Sync + 'static) {
    self.shared.set_on_cancel(Box::new(callback));
  }
}

impl<T> Clone for PushSourceHandle<T> {
  fn clone(&self) -> Self {
    Self { shared: Arc::clone(&self.shared), _pd: PhantomData }
  }
}

impl<T> fmt::Debug for PushSourceHandle<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PushSourceHandle").field("queued", &self.shared.len()).finish()
  }
}
