//! Push-source behavior: bounded offers, callbacks, and multi-producer use.

use std::sync::{
  Arc,
  atomic::{AtomicU64, Ordering},
};
use std::thread;
use std::vec::Vec;

use sluice_rs::core::{GraphBuilder, PushSourceConfig};

#[test]
fn offers_are_rejected_only_at_max_capacity() {
  let mut graph = GraphBuilder::new();
  let (source, producer) = graph.push_source::<u32>(PushSourceConfig::new(2, 4).expect("config"));
  let (drain, output) = graph.drain_all::<u32>();
  graph.connect(source.outlet(0), drain.inlet(0)).expect("connect");

  // before the graph runs nothing consumes, so the queue fills to its max
  for value in 0..4 {
    assert!(producer.offer(value), "offer {value} within capacity");
  }
  assert!(!producer.offer(99), "offer beyond max capacity");
  assert_eq!(producer.queue_size(), 4);
  assert!(!producer.accepts_next());

  let _running = graph.run().expect("run");
  assert!(producer.accepts_next(), "drained after start");
  producer.complete();
  assert_eq!(output.try_take(), Some(Ok(vec![0, 1, 2, 3])));
}

#[test]
fn dequeue_callback_reports_only_real_dequeues() {
  let dequeued = Arc::new(AtomicU64::new(0));
  let mut graph = GraphBuilder::new();
  let (source, producer) = graph.push_source::<u32>(PushSourceConfig::new(4, 8).expect("config"));
  let (drain, output) = graph.drain_all::<u32>();
  graph.connect(source.outlet(0), drain.inlet(0)).expect("connect");

  let counter = Arc::clone(&dequeued);
  producer.on_dequeued(move |count| {
    assert!(count > 0, "callback must only fire for real dequeues");
    counter.fetch_add(count, Ordering::SeqCst);
  });

  let _running = graph.run().expect("run");
  assert_eq!(producer.offer_many(0..5), 5);
  producer.complete();

  assert_eq!(output.try_take(), Some(Ok(vec![0, 1, 2, 3, 4])));
  assert_eq!(dequeued.load(Ordering::SeqCst), 5);
}

#[test]
fn cancel_after_complete_still_notifies_exactly_once() {
  let cancels = Arc::new(AtomicU64::new(0));
  let mut graph = GraphBuilder::new();
  let (source, producer) = graph.push_source::<u32>(PushSourceConfig::new(2, 4).expect("config"));
  let take = graph.take(1);
  let (drain, output) = graph.drain_all::<u32>();
  graph.connect(source.outlet(0), take.inlet(0)).expect("connect take");
  graph.connect(take.outlet(0), drain.inlet(0)).expect("connect drain");

  let counter = Arc::clone(&cancels);
  producer.on_cancel(move || {
    counter.fetch_add(1, Ordering::SeqCst);
  });

  let _running = graph.run().expect("run");
  assert!(producer.offer(7));
  // the element satisfied take(1), which cancelled upstream
  assert_eq!(cancels.load(Ordering::SeqCst), 1);
  // the queue still accepts, but nobody will consume
  assert!(producer.offer(8));
  producer.complete();
  assert_eq!(cancels.load(Ordering::SeqCst), 1);
  assert_eq!(output.try_take(), Some(Ok(vec![7])));
}

#[test]
fn concurrent_producers_lose_no_accepted_elements() {
  let mut graph = GraphBuilder::new();
  let (source, producer) = graph.push_source::<u64>(PushSourceConfig::new(16, 256).expect("config"));
  let sum = graph.map(|value: u64| value);
  let (drain, output) = graph.drain_all::<u64>();
  graph.connect(source.outlet(0), sum.inlet(0)).expect("connect map");
  graph.connect(sum.outlet(0), drain.inlet(0)).expect("connect drain");

  let _running = graph.run().expect("run");

  let accepted = Arc::new(AtomicU64::new(0));
  let mut workers = Vec::new();
  for worker in 0..4_u64 {
    let producer = producer.clone();
    let accepted = Arc::clone(&accepted);
    workers.push(thread::spawn(move || {
      for sequence in 0..100_u64 {
        let value = worker * 1_000 + sequence;
        // demand is unbounded, so the consumer keeps the queue short; retry
        // the rare rejection instead of dropping the element
        loop {
          if producer.offer(value) {
            accepted.fetch_add(1, Ordering::SeqCst);
            break;
          }
          thread::yield_now();
        }
      }
    }));
  }
  for worker in workers {
    worker.join().expect("producer thread");
  }
  producer.complete();

  let collected = output.try_take().expect("resolved").expect("completed");
  assert_eq!(collected.len() as u64, accepted.load(Ordering::SeqCst));

  let mut sorted = collected.clone();
  sorted.sort_unstable();
  sorted.dedup();
  assert_eq!(sorted.len(), collected.len(), "no element was duplicated");
}
