//! Community Comprehensive Test Suite
//!
//! End-to-end tests for the community primitives working together over one
//! database: denormalized counters, channel aggregates, the tag index,
//! page history and snapshot persistence.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Invariants** (fast, must pass)
//!   Counters, uniqueness and normalization rules.
//!
//! - **Tier 2: Behavioral Scenarios**
//!   Complete workflows across several facades.
//!
//! - **Tier 3: Stress** (opt-in with #[ignore], slow)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test community_comprehensive
//!
//! # Stress tests (opt-in)
//! cargo test --test community_comprehensive stress -- --ignored
//! ```

// Test utilities
mod test_utils;

// Tier 1: Invariants
mod invariant_tests;
mod page_history_tests;

// Tier 2: Behavioral Scenarios
mod authorization_tests;
mod persistence_tests;
mod workflow_tests;

// Tier 3: Stress (use #[ignore])
mod concurrent_stress_tests;
