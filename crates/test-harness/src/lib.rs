//! Test harness for the box and holster pipelines.
//!
//! Runs builds against `MockKernel` and checks the results through the same
//! bounding-box queries the pipelines use.
//!
//! # Key Components
//!
//! - [`helpers`]: error type, canned parameter sets, build runners
//! - [`assertions`]: rich assertion helpers with diagnostics
//! - [`faults`]: kernel wrapper that injects selection and operation failures

pub mod assertions;
pub mod faults;
pub mod helpers;

pub use faults::{Fault, FaultyKernel};
pub use helpers::{HarnessError, MockBuild};
