//! Region splitting and asynchronous execution.

use std::sync::Arc;
use std::time::Duration;
use std::vec::Vec;

use sluice_rs::core::{GraphBuilder, ImmediateExecutor, PushSourceConfig};
use sluice_rs::std::{TokioRegionExecutor, wait_ready};

#[test]
fn immediate_executor_splits_regions_but_keeps_results() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(vec![1, 2, 3]);
  let map = graph.map(|value: i32| value * 10);
  let (drain, output) = graph.drain_all::<i32>();
  graph.connect(source.outlet(0), map.inlet(0)).expect("connect source");
  graph.connect(map.outlet(0), drain.inlet(0)).expect("connect drain");
  graph.set_executor(map, Arc::new(ImmediateExecutor));

  let running = graph.run().expect("run");
  assert_eq!(running.region_count(), 2);
  assert_eq!(output.try_take(), Some(Ok(vec![10, 20, 30])));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tokio_region_drains_across_the_boundary() {
  let mut graph = GraphBuilder::new();
  let source = graph.iter_source::<i32, _>(vec![1, 2, 3, 4]);
  let map = graph.map(|value: i32| value + 100);
  let (drain, output) = graph.drain_all::<i32>();
  graph.connect(source.outlet(0), map.inlet(0)).expect("connect source");
  graph.connect(map.outlet(0), drain.inlet(0)).expect("connect drain");
  graph.set_executor(map, Arc::new(TokioRegionExecutor::current()));

  let running = graph.run().expect("run");
  assert_eq!(running.region_count(), 2);
  assert!(wait_ready(&output, Duration::from_secs(5)), "completion within the timeout");
  assert_eq!(output.try_take(), Some(Ok(vec![101, 102, 103, 104])));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn push_source_feeds_an_async_region() {
  let mut graph = GraphBuilder::new();
  let (source, producer) = graph.push_source::<u32>(PushSourceConfig::new(8, 32).expect("config"));
  let (drain, output) = graph.drain_all::<u32>();
  graph.connect(source.outlet(0), drain.inlet(0)).expect("connect drain");
  graph.set_executor(drain, Arc::new(TokioRegionExecutor::current()));

  let _running = graph.run().expect("run");
  let expected: Vec<u32> = (0..20).collect();
  for value in &expected {
    while !producer.offer(*value) {
      tokio::task::yield_now().await;
    }
  }
  producer.complete();

  assert!(wait_ready(&output, Duration::from_secs(5)), "completion within the timeout");
  assert_eq!(output.try_take(), Some(Ok(expected)));
}
