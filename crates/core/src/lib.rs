//! Domain rules for the YaMDb review service.
//!
//! Everything in this crate is pure logic with no database or HTTP
//! dependencies, so the rules can be unit-tested in isolation and reused by
//! the repository and API layers.

pub mod account;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod review;
pub mod roles;
pub mod search;
pub mod title;
pub mod types;
