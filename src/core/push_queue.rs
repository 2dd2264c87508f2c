#[cfg(test)]
mod tests;

use alloc::{boxed::Box, collections::VecDeque, sync::Weak};

use portable_atomic::{AtomicBool, AtomicUsize, Ordering};
use spin::Mutex;

use super::{DynElem, ExtEvent, PortRef, PushSourceConfig, RegionOp, RegionShared, Signal, SignalEnvelope};

/// Producer-requested end of stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(in crate::core) enum PushTermination {
  /// Drain the queue, then complete.
  Complete,
  /// Drain what current demand allows, then fail with the message.
  Error(alloc::string::String),
}

struct PushRing {
  entries:  VecDeque<DynElem>,
  capacity: usize,
}

/// State shared between a push-source node and its producer handles.
///
/// The ring is guarded by a spin lock with atomic observers, so enqueue and
/// the single-consumer dequeue are linearizable while `len` stays readable
/// without synchronization. `NewAvailable` events coalesce: at most one is
/// outstanding, re-armed by the node once it finishes a drain.
pub(in crate::core) struct PushShared {
  ring:         Mutex<PushRing>,
  len:          AtomicUsize,
  max_capacity: usize,
  event_armed:  AtomicBool,
  cancelled:    AtomicBool,
  termination:  Mutex<Option<PushTermination>>,
  target:       Mutex<Option<(Weak<RegionShared>, usize)>>,
  on_dequeued:  Mutex<Option<Box<dyn Fn(u64) + Send + Sync>>>,
  on_cancel:    Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl PushShared {
  pub(in crate::core) fn new(config: PushSourceConfig) -> Self {
    Self {
      ring:         Mutex::new(PushRing {
        entries:  VecDeque::with_capacity(config.initial_capacity()),
        capacity: config.initial_capacity(),
      }),
      len:          AtomicUsize::new(0),
      max_capacity: config.max_capacity(),
      event_armed:  AtomicBool::new(false),
      cancelled:    AtomicBool::new(false),
      termination:  Mutex::new(None),
      target:       Mutex::new(None),
      on_dequeued:  Mutex::new(None),
      on_cancel:    Mutex::new(None),
    }
  }

  /// Attempts to enqueue; grows the ring up to the bounded maximum and
  /// rejects the offer once full.
  pub(in crate::core) fn offer(&self, elem: DynElem) -> bool {
    let mut ring = self.ring.lock();
    if ring.entries.len() == ring.capacity {
      if ring.capacity >= self.max_capacity {
        return false;
      }
      ring.capacity = (ring.capacity * 2).min(self.max_capacity);
    }
    ring.entries.push_back(elem);
    self.len.store(ring.entries.len(), Ordering::Release);
    true
  }

  pub(in crate::core) fn pop(&self) -> Option<DynElem> {
    let mut ring = self.ring.lock();
    let elem = ring.entries.pop_front();
    self.len.store(ring.entries.len(), Ordering::Release);
    elem
  }

  pub(in crate::core) fn len(&self) -> usize {
    self.len.load(Ordering::Acquire)
  }

  pub(in crate::core) fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub(in crate::core) fn accepts_next(&self) -> bool {
    self.len() < self.max_capacity
  }

  /// Posts at most one outstanding `NewAvailable` event.
  pub(in crate::core) fn announce_available(&self) {
    if !self.event_armed.swap(true, Ordering::AcqRel) {
      self.post(Signal::Event(ExtEvent::NewAvailable));
    }
  }

  /// Clears the outstanding-event flag; the next offer posts again.
  pub(in crate::core) fn disarm(&self) {
    self.event_armed.store(false, Ordering::Release);
  }

  /// Re-claims the outstanding-event flag; `true` means the caller owns the
  /// drain and should continue it in place.
  pub(in crate::core) fn rearm(&self) -> bool {
    !self.event_armed.swap(true, Ordering::AcqRel)
  }

  pub(in crate::core) fn request_termination(&self, termination: PushTermination) {
    {
      let mut slot = self.termination.lock();
      if slot.is_some() {
        return;
      }
      *slot = Some(termination.clone());
    }
    let event = match termination {
      | PushTermination::Complete => ExtEvent::Complete,
      | PushTermination::Error(message) => ExtEvent::ErrorComplete(message),
    };
    self.post(Signal::Event(event));
  }

  pub(in crate::core) fn termination(&self) -> Option<PushTermination> {
    self.termination.lock().clone()
  }

  pub(in crate::core) fn set_target(&self, region: Weak<RegionShared>, node: usize) {
    *self.target.lock() = Some((region, node));
  }

  pub(in crate::core) fn set_on_dequeued(&self, callback: Box<dyn Fn(u64) + Send + Sync>) {
    *self.on_dequeued.lock() = Some(callback);
  }

  pub(in crate::core) fn set_on_cancel(&self, callback: Box<dyn Fn() + Send + Sync>) {
    *self.on_cancel.lock() = Some(callback);
  }

  pub(in crate::core) fn notify_dequeued(&self, count: u64) {
    if count == 0 {
      return;
    }
    if let Some(callback) = self.on_dequeued.lock().as_ref() {
      callback(count);
    }
  }

  /// Fires the cancel callback exactly once across the node's lifetime.
  pub(in crate::core) fn notify_cancelled(&self) {
    if self.cancelled.swap(true, Ordering::AcqRel) {
      return;
    }
    if let Some(callback) = self.on_cancel.lock().as_ref() {
      callback();
    }
  }

  fn post(&self, signal: Signal) {
    let target = self.target.lock().clone();
    if let Some((region, node)) = target
      && let Some(region) = region.upgrade()
    {
      region.post(RegionOp::Deliver(SignalEnvelope { target: node, port: PortRef::Node, signal }));
    }
  }
}
