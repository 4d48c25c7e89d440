//! Discard evaluation for Riichi Mahjong.
//!
//! Built on `tenpai-engine`'s shanten and win checks. Provides tile
//! acceptance, safety reading, push/fold discard policies, and parallel
//! batch evaluation.

pub mod batch;
pub mod config;
pub mod policy;
pub mod safety;
pub mod seeding;
pub mod ukeire;

pub use config::EvaluatorConfig;
pub use policy::{rank_discards, DiscardMode, DiscardPolicy, FoldPolicy, PushPolicy};
pub use safety::{SafetyInfo, SafetyTier};
pub use ukeire::{ukeire, Acceptance, DiscardCandidate};
