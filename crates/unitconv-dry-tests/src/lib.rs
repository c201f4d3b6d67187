// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for unitconv crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`store`] - In-memory key-value store fake for testing without a browser or filesystem
//! - [`fixtures`] - Record and favorite builders

pub mod fixtures;
pub mod store;

pub use fixtures::{favorite, history_record};
pub use store::InMemoryKvStore;
