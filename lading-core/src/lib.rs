//! Lading Core
//!
//! Core types for the Lading warehouse transfer tool.
//!
//! This crate contains:
//! - Domain types: jobs, transfer requests, catalog entries and storage objects
//! - DTOs: wire representations of the warehouse, storage and resource manager APIs

pub mod domain;
pub mod dto;
