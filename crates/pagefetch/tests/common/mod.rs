//! Shared test utilities for pagefetch integration tests.
//!
//! This module provides:
//! - `TestHarness` with an in-memory job store and a temp content root
//! - Builders for seeding products and page jobs
//! - Scripted stand-ins for the renderer, pacing and progress reporting

pub mod builders;
pub mod fakes;
pub mod harness;

pub use builders::*;
pub use fakes::*;
pub use harness::TestHarness;
