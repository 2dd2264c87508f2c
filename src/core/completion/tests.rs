use alloc::{boxed::Box, sync::Arc, vec};

use super::{Completion, CompletionCell};
use crate::core::{DynElem, FlowError};

#[test]
fn pending_until_fulfilled() {
  let cell = Arc::new(CompletionCell::new());
  let completion: Completion<u32> = Completion::new(cell.clone());
  assert!(!completion.is_ready());
  assert!(completion.try_take().is_none());

  cell.fulfill(Ok(Box::new(7_u32) as DynElem));
  assert!(completion.is_ready());
  assert_eq!(completion.try_take(), Some(Ok(7)));
  assert!(completion.try_take().is_none());
}

#[test]
fn first_fulfillment_wins() {
  let cell = Arc::new(CompletionCell::new());
  cell.fulfill(Ok(Box::new(vec![1_u32]) as DynElem));
  cell.fulfill(Ok(Box::new(vec![2_u32]) as DynElem));
  let completion: Completion<alloc::vec::Vec<u32>> = Completion::new(cell);
  assert_eq!(completion.try_take(), Some(Ok(vec![1])));
}

#[test]
fn wrong_type_surfaces_as_mismatch() {
  let cell = Arc::new(CompletionCell::new());
  cell.fulfill(Ok(Box::new(7_u32) as DynElem));
  let completion: Completion<alloc::string::String> = Completion::new(cell);
  assert!(matches!(completion.try_take(), Some(Err(FlowError::TypeMismatch { .. }))));
}
