//! Core types and trait definitions for the Hush anonymous feed.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the API layer both depend on it.

pub mod entity;
pub mod error;
pub mod nickname;
pub mod store;
pub mod validate;
pub mod view;

pub use error::{Error, Result};
