use alloc::{sync::Arc, vec};

use super::GraphBuilder;
use crate::core::{GraphError, ImmediateExecutor, PushSourceConfig, RegionExecutor};

#[test]
fn invalid_arguments_are_rejected() {
  let mut graph = GraphBuilder::new();
  assert!(matches!(graph.prefix_and_tail::<u32>(0), Err(GraphError::InvalidArgument { .. })));
  assert!(matches!(graph.fan_out_round_robin(0, false), Err(GraphError::InvalidArgument { .. })));
  assert!(matches!(graph.buffer(0), Err(GraphError::InvalidArgument { .. })));
  assert!(matches!(graph.sliding::<u32>(0), Err(GraphError::InvalidArgument { .. })));
  assert!(matches!(graph.flatten_concat::<u32, vec::Vec<u32>>(0), Err(GraphError::InvalidArgument { .. })));
  assert!(matches!(PushSourceConfig::new(1, 4), Err(GraphError::InvalidArgument { .. })));
  assert!(matches!(PushSourceConfig::new(2, 3), Err(GraphError::InvalidArgument { .. })));
}

#[test]
fn out_of_range_ports_are_rejected() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<u32, _>(vec![1]);
  let (drain, _output) = graph.drain_all::<u32>();
  let error = graph.connect(source.outlet(1), drain.inlet(0)).expect_err("bad outlet");
  assert!(matches!(error, GraphError::PortOutOfRange { .. }));
}

#[test]
fn coupling_halves_are_pre_connected() {
  let mut graph = GraphBuilder::new();
  let (coupling_in, coupling_out) = graph.coupling();
  let source = graph.iter_source::<u32, _>(vec![1]);
  // the internal edge is taken; only the outer ports remain bindable
  let error = graph.connect(coupling_in.outlet(0), coupling_out.inlet(0)).expect_err("internal edge");
  assert!(matches!(error, GraphError::PortAlreadyBound { .. }));
  graph.connect(source.outlet(0), coupling_in.inlet(0)).expect("outer inlet is free");
}

#[test]
fn conflicting_executors_in_one_region_fail_the_build() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<u32, _>(vec![1, 2]);
  let first = graph.map(|value: u32| value);
  let second = graph.map(|value: u32| value);
  let merge = graph.concat(2).expect("concat");
  let (drain, _output) = graph.drain_all::<u32>();
  let split = graph.fan_out_round_robin(2, false).expect("fan-out");
  graph.connect(source.outlet(0), split.inlet(0)).expect("split");
  graph.connect(split.outlet(0), first.inlet(0)).expect("first");
  graph.connect(split.outlet(1), second.inlet(0)).expect("second");
  graph.connect(first.outlet(0), merge.inlet(0)).expect("merge first");
  graph.connect(second.outlet(0), merge.inlet(1)).expect("merge second");
  graph.connect(merge.outlet(0), drain.inlet(0)).expect("drain");

  let executor_a: Arc<dyn RegionExecutor> = Arc::new(ImmediateExecutor);
  let executor_b: Arc<dyn RegionExecutor> = Arc::new(ImmediateExecutor);
  graph.set_executor(first, executor_a);
  graph.set_executor(second, executor_b);
  // both async entries merge through the shared fan-in downstream
  let error = graph.run().expect_err("conflict");
  assert!(matches!(error, GraphError::ExecutorConflict { .. }));
}
