//! Property checks over the streaming protocol.

use std::sync::{Arc, Mutex, atomic::AtomicU64, atomic::Ordering};
use std::vec::Vec;

use proptest::prelude::*;
use sluice_rs::core::{Completion, FlowError, GraphBuilder, PushSourceConfig};

/// Builds `source -> map(identity) -> drain` and returns the drained output.
fn identity_run(input: Vec<i32>) -> Option<Result<Vec<i32>, FlowError>> {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(input);
  let map = graph.map(|value: i32| value);
  let (drain, output) = graph.drain_all::<i32>();
  graph.connect(source.outlet(0), map.inlet(0)).expect("connect source");
  graph.connect(map.outlet(0), drain.inlet(0)).expect("connect drain");
  let _running = graph.run().expect("run");
  output.try_take()
}

proptest! {
  // P1: identity map preserves the sequence and the terminal state
  #[test]
  fn identity_map_preserves_sequence(input in proptest::collection::vec(any::<i32>(), 0..64)) {
    let expected = input.clone();
    prop_assert_eq!(identity_run(input), Some(Ok(expected)));
  }

  // P2: a failing callback delivers the prefix, errors downstream, and
  // cancels upstream exactly once
  #[test]
  fn failing_map_cancels_upstream_once(
    input in proptest::collection::vec(any::<i32>(), 1..32),
    failure_at in 0_usize..32,
  ) {
    let failure_at = failure_at % input.len();
    let cancels = Arc::new(AtomicU64::new(0));
    let seen = Arc::new(Mutex::new(Vec::<i32>::new()));

    let mut graph = GraphBuilder::new();
    let (source, producer) =
      graph.push_source::<i32>(PushSourceConfig::new(16, 64).expect("config"));
    let observed = Arc::clone(&seen);
    let fail_index = failure_at;
    let counter = Arc::new(AtomicU64::new(0));
    let tap = Arc::clone(&counter);
    let map = graph.try_map(move |value: i32| {
      let position = tap.fetch_add(1, Ordering::SeqCst) as usize;
      if position == fail_index {
        Err("callback rejected element".into())
      } else {
        observed.lock().expect("lock").push(value);
        Ok(value)
      }
    });
    let (drain, output) = graph.drain_all::<i32>();
    graph.connect(source.outlet(0), map.inlet(0)).expect("connect source");
    graph.connect(map.outlet(0), drain.inlet(0)).expect("connect drain");

    let seen_cancels = Arc::clone(&cancels);
    producer.on_cancel(move || {
      seen_cancels.fetch_add(1, Ordering::SeqCst);
    });

    let _running = graph.run().expect("run");
    for value in &input {
      prop_assert!(producer.offer(*value));
    }
    producer.complete();

    let result = output.try_take().expect("resolved");
    prop_assert!(matches!(result, Err(FlowError::User { .. })), "expected FlowError::User");
    prop_assert_eq!(seen.lock().expect("lock").clone(), input[..failure_at].to_vec());
    prop_assert_eq!(cancels.load(Ordering::SeqCst), 1);
  }

  // P3: round-robin partitions the input by index modulo the outbound count
  #[test]
  fn round_robin_partitions_by_modulo(
    input in proptest::collection::vec(any::<i32>(), 0..48),
    outbounds in 1_u32..5,
  ) {
    let mut graph = GraphBuilder::new();
    let source = graph.iter_source::<i32, _>(input.clone());
    let fan_out = graph.fan_out_round_robin(outbounds, false).expect("fan-out");
    graph.connect(source.outlet(0), fan_out.inlet(0)).expect("connect source");
    let mut outputs: Vec<Completion<Vec<i32>>> = Vec::new();
    for lane in 0..outbounds {
      let (drain, output) = graph.drain_all::<i32>();
      graph.connect(fan_out.outlet(lane), drain.inlet(0)).expect("connect drain");
      outputs.push(output);
    }
    let _running = graph.run().expect("run");
    for (lane, output) in outputs.into_iter().enumerate() {
      let expected: Vec<i32> =
        input.iter().enumerate().filter(|(i, _)| i % outbounds as usize == lane).map(|(_, v)| *v).collect();
      prop_assert_eq!(output.try_take(), Some(Ok(expected)));
    }
  }

  // P4: flatten output is the in-order concatenation of the sub-streams
  #[test]
  fn flatten_concatenates_in_order(
    subs in proptest::collection::vec(proptest::collection::vec(any::<i32>(), 0..8), 0..8),
    parallelism in 1_u32..5,
  ) {
    let expected: Vec<i32> = subs.iter().flatten().copied().collect();
    let mut graph = GraphBuilder::new();
    let source = graph.iter_source::<Vec<i32>, _>(subs);
    let flatten = graph.flatten_concat::<i32, Vec<i32>>(parallelism).expect("flatten");
    let (drain, output) = graph.drain_all::<i32>();
    graph.connect(source.outlet(0), flatten.inlet(0)).expect("connect source");
    graph.connect(flatten.outlet(0), drain.inlet(0)).expect("connect drain");
    let _running = graph.run().expect("run");
    prop_assert_eq!(output.try_take(), Some(Ok(expected)));
  }

  // P5: the prefix pair splits the input at the gate size
  #[test]
  fn prefix_pair_splits_at_gate_size(
    input in proptest::collection::vec(any::<i32>(), 0..32),
    prefix_size in 1_u32..8,
  ) {
    let mut graph = GraphBuilder::new();
    let source = graph.iter_source::<i32, _>(input.clone());
    let gate = graph.prefix_and_tail::<i32>(prefix_size).expect("gate");
    let (drain, output) = graph.drain_head::<(Vec<i32>, sluice_rs::core::SubSourceRef)>();
    graph.connect(source.outlet(0), gate.inlet(0)).expect("connect source");
    graph.connect(gate.outlet(0), drain.inlet(0)).expect("connect drain");
    let _running = graph.run().expect("run");

    let (prefix, tail) = output.try_take().expect("ready").expect("pair");
    let cut = input.len().min(prefix_size as usize);
    prop_assert_eq!(prefix, input[..cut].to_vec());
    let rest = tail.drain_all::<i32>();
    prop_assert_eq!(rest.try_take(), Some(Ok(input[cut..].to_vec())));
  }

  // P7: cancel travels through a chain of maps to the source exactly once
  #[test]
  fn cancel_reaches_the_source_once(chain_len in 1_usize..6) {
    let cancels = Arc::new(AtomicU64::new(0));
    let mut graph = GraphBuilder::new();
    let (source, producer) =
      graph.push_source::<i32>(PushSourceConfig::new(4, 8).expect("config"));
    let seen_cancels = Arc::clone(&cancels);
    producer.on_cancel(move || {
      seen_cancels.fetch_add(1, Ordering::SeqCst);
    });

    let mut upstream = source.outlet(0);
    for _ in 0..chain_len {
      let map = graph.map(|value: i32| value);
      graph.connect(upstream, map.inlet(0)).expect("connect map");
      upstream = map.outlet(0);
    }
    let (drain, output) = graph.drain_head::<i32>();
    graph.connect(upstream, drain.inlet(0)).expect("connect drain");

    let _running = graph.run().expect("run");
    assert!(producer.offer(41));
    assert!(producer.offer(42));
    prop_assert_eq!(output.try_take(), Some(Ok(41)));
    prop_assert_eq!(cancels.load(Ordering::SeqCst), 1);
  }
}
