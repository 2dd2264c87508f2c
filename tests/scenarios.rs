//! End-to-end graph scenarios, all on synchronous regions.

use std::vec::Vec;

use sluice_rs::core::{Completion, GraphBuilder, GraphError, SubSourceRef};

type HeadPair = (Vec<i32>, SubSourceRef);

#[test]
fn map_pipeline_transforms_and_completes() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(vec![1, 2, 3]);
  let map = graph.map(|value: i32| value + 1);
  let (drain, output) = graph.drain_all::<i32>();
  graph.connect(source.outlet(0), map.inlet(0)).expect("connect source");
  graph.connect(map.outlet(0), drain.inlet(0)).expect("connect drain");

  let running = graph.run().expect("run");
  assert_eq!(output.try_take(), Some(Ok(vec![2, 3, 4])));
  assert!(running.is_terminated());
  assert!(running.failure().is_none());
}

#[test]
fn prefix_and_tail_on_empty_input_yields_empty_prefix_and_empty_tail() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(Vec::new());
  let gate = graph.prefix_and_tail::<i32>(3).expect("gate");
  let (drain, output) = graph.drain_head::<HeadPair>();
  graph.connect(source.outlet(0), gate.inlet(0)).expect("connect source");
  graph.connect(gate.outlet(0), drain.inlet(0)).expect("connect drain");

  let _running = graph.run().expect("run");
  let (prefix, tail) = output.try_take().expect("ready").expect("pair");
  assert_eq!(prefix, Vec::<i32>::new());

  let tail_output = tail.drain_all::<i32>();
  assert_eq!(tail_output.try_take(), Some(Ok(Vec::new())));
}

#[test]
fn prefix_and_tail_splits_the_stream() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(vec![10, 20, 30, 40, 50]);
  let gate = graph.prefix_and_tail::<i32>(2).expect("gate");
  let (drain, output) = graph.drain_head::<HeadPair>();
  graph.connect(source.outlet(0), gate.inlet(0)).expect("connect source");
  graph.connect(gate.outlet(0), drain.inlet(0)).expect("connect drain");

  let _running = graph.run().expect("run");
  let (prefix, tail) = output.try_take().expect("ready").expect("pair");
  assert_eq!(prefix, vec![10, 20]);

  let tail_output = tail.drain_all::<i32>();
  assert_eq!(tail_output.try_take(), Some(Ok(vec![30, 40, 50])));
}

#[test]
fn tail_source_rejects_a_second_drain() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(vec![1, 2, 3]);
  let gate = graph.prefix_and_tail::<i32>(1).expect("gate");
  let (drain, output) = graph.drain_head::<HeadPair>();
  graph.connect(source.outlet(0), gate.inlet(0)).expect("connect source");
  graph.connect(gate.outlet(0), drain.inlet(0)).expect("connect drain");

  let _running = graph.run().expect("run");
  let (_, tail) = output.try_take().expect("ready").expect("pair");
  let first = tail.drain_all::<i32>();
  assert_eq!(first.try_take(), Some(Ok(vec![2, 3])));

  let second = tail.drain_all::<i32>();
  assert!(second.try_take().expect("ready").is_err());
}

#[test]
fn round_robin_deals_elements_in_ring_order() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(1..=9);
  let fan_out = graph.fan_out_round_robin(3, false).expect("fan-out");
  let (drain_a, out_a) = graph.drain_all::<i32>();
  let (drain_b, out_b) = graph.drain_all::<i32>();
  let (drain_c, out_c) = graph.drain_all::<i32>();
  graph.connect(source.outlet(0), fan_out.inlet(0)).expect("connect source");
  graph.connect(fan_out.outlet(0), drain_a.inlet(0)).expect("connect a");
  graph.connect(fan_out.outlet(1), drain_b.inlet(0)).expect("connect b");
  graph.connect(fan_out.outlet(2), drain_c.inlet(0)).expect("connect c");

  let _running = graph.run().expect("run");
  assert_eq!(out_a.try_take(), Some(Ok(vec![1, 4, 7])));
  assert_eq!(out_b.try_take(), Some(Ok(vec![2, 5, 8])));
  assert_eq!(out_c.try_take(), Some(Ok(vec![3, 6, 9])));
}

#[test]
fn flatten_concat_preserves_sub_stream_order() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<Vec<i32>, _>(vec![vec![1, 2], vec![], vec![3], vec![4, 5, 6]]);
  let flatten = graph.flatten_concat::<i32, Vec<i32>>(2).expect("flatten");
  let (drain, output) = graph.drain_all::<i32>();
  graph.connect(source.outlet(0), flatten.inlet(0)).expect("connect source");
  graph.connect(flatten.outlet(0), drain.inlet(0)).expect("connect drain");

  let _running = graph.run().expect("run");
  assert_eq!(output.try_take(), Some(Ok(vec![1, 2, 3, 4, 5, 6])));
}

#[test]
fn fibonacci_through_a_coupled_cycle() {
  let mut graph = GraphBuilder::new();
  let seed = graph.iter_source::<i32, _>(vec![0, 1]);
  let concat = graph.concat(2).expect("concat");
  let (coupling_in, coupling_out) = graph.coupling();
  let broadcast = graph.fan_out_broadcast::<i32>(2, true).expect("broadcast");
  let take = graph.take(8);
  let (drain, output) = graph.drain_all::<i32>();
  let buffer = graph.buffer(2).expect("buffer");
  let sliding = graph.sliding::<i32>(2).expect("sliding");
  let sum = graph.map(|window: Vec<i32>| window.iter().sum::<i32>());

  graph.connect(seed.outlet(0), concat.inlet(0)).expect("seed");
  graph.connect(coupling_out.outlet(0), concat.inlet(1)).expect("loop in");
  graph.connect(concat.outlet(0), broadcast.inlet(0)).expect("broadcast in");
  graph.connect(broadcast.outlet(0), take.inlet(0)).expect("take branch");
  graph.connect(take.outlet(0), drain.inlet(0)).expect("drain");
  graph.connect(broadcast.outlet(1), buffer.inlet(0)).expect("cycle branch");
  graph.connect(buffer.outlet(0), sliding.inlet(0)).expect("sliding");
  graph.connect(sliding.outlet(0), sum.inlet(0)).expect("sum");
  graph.connect(sum.outlet(0), coupling_in.inlet(0)).expect("loop out");

  let running = graph.run().expect("run");
  assert_eq!(output.try_take(), Some(Ok(vec![0, 1, 1, 2, 3, 5, 8, 13])));
  assert!(running.failure().is_none());
}

#[test]
fn connect_rejects_double_binding() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(vec![1]);
  let map_a = graph.map(|value: i32| value);
  let map_b = graph.map(|value: i32| value);
  graph.connect(source.outlet(0), map_a.inlet(0)).expect("first bind");
  let error = graph.connect(source.outlet(0), map_b.inlet(0)).expect_err("double bind");
  assert!(matches!(error, GraphError::PortAlreadyBound { .. }));
}

#[test]
fn run_rejects_unbound_ports() {
  let mut graph = GraphBuilder::new();
  let _source = graph.iter_source::<i32, _>(vec![1]);
  let error = graph.run().expect_err("unbound");
  assert!(matches!(error, GraphError::UnboundPort { .. }));
}

#[test]
fn completion_is_pending_until_the_graph_resolves_it() {
  let graph = GraphBuilder::new();
  let error = graph.run().expect_err("empty graph");
  assert!(matches!(error, GraphError::EmptyGraph));

  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(vec![7]);
  let (drain, output) = graph.drain_all::<i32>();
  let pending: Completion<Vec<i32>> = output.clone();
  assert!(!pending.is_ready());
  graph.connect(source.outlet(0), drain.inlet(0)).expect("connect");
  let _running = graph.run().expect("run");
  assert_eq!(output.try_take(), Some(Ok(vec![7])));
}
