use super::InterceptBuffer;
use crate::core::{PortRef, Signal, SignalFrame};

#[test]
fn frames_replay_in_fifo_order() {
  let mut buffer = InterceptBuffer::new();
  buffer.push(SignalFrame { port: PortRef::Outlet(0), signal: Signal::Request(1) });
  buffer.push(SignalFrame { port: PortRef::Outlet(0), signal: Signal::Cancel });
  assert_eq!(buffer.len(), 2);

  let first = buffer.pop().expect("first frame");
  assert!(matches!(first.signal, Signal::Request(1)));
  let second = buffer.pop().expect("second frame");
  assert!(matches!(second.signal, Signal::Cancel));
  assert!(buffer.pop().is_none());
}

#[test]
fn clear_discards_pending_frames() {
  let mut buffer = InterceptBuffer::new();
  buffer.push(SignalFrame { port: PortRef::Node, signal: Signal::Start });
  buffer.clear();
  assert_eq!(buffer.len(), 0);
  assert!(buffer.pop().is_none());
}
