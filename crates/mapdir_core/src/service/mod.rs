//! Use-case services around the record store.
//!
//! # Responsibility
//! - Orchestrate source fetches and edit validation for UI/FFI callers.
//! - Queue user-facing notifications for outcomes worth showing.

pub mod directory_service;
pub mod notifications;
