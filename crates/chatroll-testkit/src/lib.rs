//! # Chatroll Testkit
//!
//! Testing utilities for Chatroll.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: explicit construction of the sample messenger data and
//!   helpers for building users, chats, and stores in tests
//! - **Generators**: Proptest strategies for phone spellings and stores
//!
//! ## Test Fixtures
//!
//! ```rust
//! use chatroll_testkit::fixtures::sample_store;
//!
//! let store = sample_store();
//! assert_eq!(store.identity_count(), 3);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use chatroll_testkit::generators::{phone_spellings, PhoneFormat};
//!
//! proptest! {
//!     #[test]
//!     fn spellings_agree((national, spellings) in phone_spellings()) {
//!         // every spelling normalizes to the same identity
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{sample_json, sample_records, sample_store, TestFixture};
pub use generators::{format_phone, phone_spellings, store_from_params, PhoneFormat, StoreParams};
