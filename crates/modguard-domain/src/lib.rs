//! Pure boundary evaluation (no IO).
//!
//! Input: module descriptors and a component inventory constructed elsewhere.
//! Output: violations + verdict + summary data.

#![forbid(unsafe_code)]

pub mod classify;
pub mod inspect;
pub mod model;
pub mod policy;
pub mod report;
pub mod template;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use classify::classify;
pub use engine::{evaluate, summarize};
pub use inspect::snapshot;
