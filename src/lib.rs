#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

//! # SOME/IP-SD-config
//!
//! This crate encodes and decodes the SOME/IP Service Discovery
//! Configuration Option: a set of ASCII key/value pairs carried as
//! length-prefixed records inside an SD option. It is a `no_std` crate that
//! needs `alloc` for the owned key/value set.
//!
//! ## Features
//!
//! - `no_std` compatible (`alloc` only)
//! - Canonical, sorted encoding independent of insertion order
//! - Defensive decoding of untrusted payloads: every length prefix is checked
//!   against the declared option length, every byte against printable ASCII
//! - Option LENGTH maintained incrementally as entries are added and removed
//! - Closed enum over the sibling option kinds for header-based dispatch
//!
//! ## Architecture
//!
//! - `wire` - Byte sink and cursor primitives
//! - `header` - Option header shared by all option kinds
//! - `config` - Configuration Option entry set and record codec
//! - `options` - Tagged option family with per-kind payloads
//! - `field` - Field offset definitions
//!
//! Decode diagnostics are reported through the `log` facade.

extern crate alloc;

/// Configuration Option entry set and its nested record codec.
pub mod config;

/// Error types for parsing and validation failures.
pub mod error;

/// Field offset definitions for all option wire format structures.
pub mod field;

/// Option header type, flag and codec.
pub mod header;

/// SOME/IP-SD option kinds (Configuration, LoadBalancing, endpoints).
pub mod options;

/// Prelude module for convenient imports.
pub mod prelude;

/// Byte sink and cursor primitives.
pub mod wire;
