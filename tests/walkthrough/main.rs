//! Walkthrough Integration Tests
//!
//! Runs the walkthrough against the in-process backend, step by step and
//! end to end, and with faults injected into individual client calls.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test walkthrough
//! cargo test --test walkthrough failures::
//! ```

mod common;

mod failures;
mod script;
mod steps;
