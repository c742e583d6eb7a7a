//! Temporal domain: situations, i.e. time-bounded semantic events.
//!
//! # Invariants
//! - At most one situation per id; updating an id replaces the situation.
//! - Situations are independent; no ordering is enforced between them.

mod situation;
mod timeline;

pub use situation::{Situation, SituationKind};
pub use timeline::Timeline;
