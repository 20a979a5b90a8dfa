//! Core domain types
//!
//! This module contains the domain structures shared by the client library and
//! the CLI. They are independent of the wire format spoken by the remote
//! services; see [`crate::dto`] for that.

pub mod catalog;
pub mod job;
pub mod project;
pub mod storage;
pub mod transfer;
