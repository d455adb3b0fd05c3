//! core
//!
//! Core domain types and local state for dwiki.
//!
//! # Modules
//!
//! - [`types`] - Strong types: PageId and link syntax
//! - [`path`] - Resolution of raw link text to page identifiers
//! - [`cache`] - The page list cache
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid identifiers from reaching the wire
//! - Path resolution is pure and deterministic
//! - The page cache is an owned value, replaced wholesale

pub mod cache;
pub mod config;
pub mod path;
pub mod types;
