use super::SignalQueue;
use crate::core::{PortRef, RegionOp, Signal, SignalEnvelope};

fn deliver(target: usize) -> RegionOp {
  RegionOp::Deliver(SignalEnvelope { target, port: PortRef::Node, signal: Signal::Start })
}

#[test]
fn pops_in_push_order() {
  let queue = SignalQueue::new();
  queue.push(deliver(1));
  queue.push(deliver(2));

  let Some(RegionOp::Deliver(first)) = queue.pop() else { panic!("expected deliver op") };
  assert_eq!(first.target, 1);
  let Some(RegionOp::Deliver(second)) = queue.pop() else { panic!("expected deliver op") };
  assert_eq!(second.target, 2);
  assert!(queue.is_empty());
}
