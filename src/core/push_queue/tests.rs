use alloc::boxed::Box;

use super::{PushShared, PushTermination};
use crate::core::{DynElem, PushSourceConfig};

fn shared(initial: usize, max: usize) -> PushShared {
  PushShared::new(PushSourceConfig::new(initial, max).expect("config"))
}

fn elem(value: u32) -> DynElem {
  Box::new(value)
}

#[test]
fn grows_from_initial_to_max_and_rejects_when_full() {
  let queue = shared(2, 4);
  assert!(queue.offer(elem(1)));
  assert!(queue.offer(elem(2)));
  // third offer forces the ring to grow past the initial capacity
  assert!(queue.offer(elem(3)));
  assert!(queue.offer(elem(4)));
  assert!(!queue.offer(elem(5)));
  assert_eq!(queue.len(), 4);
  assert!(!queue.accepts_next());

  assert!(queue.pop().is_some());
  assert!(queue.accepts_next());
  assert!(queue.offer(elem(5)));
}

#[test]
fn pops_in_offer_order() {
  let queue = shared(2, 8);
  assert!(queue.offer(elem(10)));
  assert!(queue.offer(elem(20)));
  let first = queue.pop().expect("first");
  assert!(matches!(first.downcast::<u32>().map(|v| *v), Ok(10)));
  let second = queue.pop().expect("second");
  assert!(matches!(second.downcast::<u32>().map(|v| *v), Ok(20)));
  assert!(queue.pop().is_none());
  assert!(queue.is_empty());
}

#[test]
fn termination_is_first_wins() {
  let queue = shared(2, 4);
  queue.request_termination(PushTermination::Complete);
  queue.request_termination(PushTermination::Error("late".into()));
  assert_eq!(queue.termination(), Some(PushTermination::Complete));
}

#[test]
fn cancel_callback_fires_once() {
  let queue = shared(2, 4);
  let count = alloc::sync::Arc::new(portable_atomic::AtomicU64::new(0));
  let seen = alloc::sync::Arc::clone(&count);
  queue.set_on_cancel(Box::new(move || {
    seen.fetch_add(1, portable_atomic::Ordering::SeqCst);
  }));
  queue.notify_cancelled();
  queue.notify_cancelled();
  assert_eq!(count.load(portable_atomic::Ordering::SeqCst), 1);
}
