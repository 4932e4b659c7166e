//! Randomized parts of a search round.
//!
//! - `placement`: hides the target once per session.
//! - `effectiveness`: draws per-area search effectiveness every round.
//! - `executor`: scans an effectiveness-sized share of an area's cells.

pub mod effectiveness;
pub mod executor;
pub mod placement;
