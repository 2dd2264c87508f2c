#![deny(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone))]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::print_stdout)]
#![deny(clippy::dbg_macro)]
#![deny(unreachable_pub)]
#![no_std]

//! A demand-driven dataflow runtime.
//!
//! Graphs are built from nodes that communicate through a four-signal
//! pull/push protocol (`Request`, `Cancel`, `Next`, `Complete`/`Error`) with
//! bounded memory and cooperative cancellation. Connected nodes that share an
//! execution form a region: synchronous regions run as chains of direct
//! dispatch on the caller thread, asynchronous regions drain a mailbox on an
//! external executor. The [`core`] module contains the whole runtime; the
//! [`std`] module adds a Tokio-backed region executor.

extern crate alloc;

pub mod core;
#[cfg(feature = "std")]
pub mod std;
