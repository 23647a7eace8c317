//! Observable state containers.
//!
//! # Responsibility
//! - `RecordStore` owns the record collection and the selection flags.
//! - `ViewState` owns map center/zoom and the derived marker set.
//!
//! # Invariants
//! - Each store is single-writer per operation; callers hold `&mut`.
//! - Subscribers are notified after a mutation completes, never midway.
//! - At most one record is selected at any observable point.

pub mod listeners;
pub mod record_store;
pub mod view_state;
