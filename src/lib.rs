// src/lib.rs

//! Flags source comments that have likely gone stale relative to the code
//! below them, using `git blame` author times as the signal.
//!
//! The pipeline runs strictly downstream: [`blame`] reads per-line authorship,
//! [`segment`] groups lines into blank, comment and code blocks using the
//! predicates in [`classify`], and [`matcher`] pairs comment blocks with the
//! code that follows them.

pub mod analyzer;
pub mod blame;
pub mod classify;
pub mod cli;
pub mod error;
pub mod matcher;
pub mod model;
pub mod report;
pub mod segment;

pub use error::{GitrotError, Result};
