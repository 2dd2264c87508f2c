use alloc::{boxed::Box, sync::Arc};

use portable_atomic::{AtomicBool, Ordering};
use spin::Mutex;

use super::{ExecutionMode, FlowError, RegionCore, RegionOp, SignalQueue};

/// Shared state of one region: its node arena, mailbox, and wake flag.
///
/// The wake-once protocol elects a single driver at a time: an enqueue that
/// flips the `scheduled` flag either drains the mailbox in place (caller
/// mode) or spawns one drain job on the region's executor. Everyone else just
/// queues. The flag is cleared only when the mailbox looks empty, with a
/// re-check to close the race against concurrent producers.
pub(in crate::core) struct RegionShared {
  core:      Mutex<RegionCore>,
  mailbox:   SignalQueue,
  scheduled: AtomicBool,
  mode:      ExecutionMode,
}

impl RegionShared {
  pub(in crate::core) fn new(mode: ExecutionMode) -> Arc<Self> {
    let region = Arc::new(Self {
      core: Mutex::new(RegionCore::new()),
      mailbox: SignalQueue::new(),
      scheduled: AtomicBool::new(false),
      mode,
    });
    region.core.lock().self_ref = Arc::downgrade(&region);
    region
  }

  /// Enqueues an op and wakes the region.
  pub(in crate::core) fn post(self: &Arc<Self>, op: RegionOp) {
    self.mailbox.push(op);
    self.wake();
  }

  /// Direct access to the core; used during graph assembly, before the
  /// region runs.
  pub(in crate::core) fn with_core<R>(&self, f: impl FnOnce(&mut RegionCore) -> R) -> R {
    f(&mut self.core.lock())
  }

  pub(in crate::core) fn failure(&self) -> Option<FlowError> {
    self.core.lock().failure.clone()
  }

  pub(in crate::core) fn all_terminal(&self) -> bool {
    self.core.lock().all_terminal()
  }

  fn wake(self: &Arc<Self>) {
    if self.scheduled.swap(true, Ordering::AcqRel) {
      return;
    }
    match &self.mode {
      | ExecutionMode::Caller => self.drain(),
      | ExecutionMode::External(executor) => {
        let region = Arc::clone(self);
        executor.execute(Box::new(move || region.drain()));
      },
    }
  }

  fn drain(&self) {
    loop {
      let Some(op) = self.mailbox.pop() else {
        self.scheduled.store(false, Ordering::Release);
        if self.mailbox.is_empty() {
          return;
        }
        // a producer raced the flag clear; reclaim or leave it to them
        if self.scheduled.swap(true, Ordering::AcqRel) {
          return;
        }
        continue;
      };
      self.core.lock().handle_op(op);
    }
  }
}
