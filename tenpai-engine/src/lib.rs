pub mod agari;
pub mod errors;
pub mod hand_evaluator;
pub mod parser;
pub mod rule;
pub mod score;
pub mod shanten;
pub mod tile;
pub mod types;
pub mod yaku;

pub use agari::{enumerate_winning_shapes, HandShape, Wait};
pub use errors::{RiichiError, RiichiResult};
pub use hand_evaluator::{score, HandEvaluator, ScoreResult};
pub use rule::GameRule;
pub use shanten::{shanten, ShantenCache};
pub use tile::{Counts34, Tile, TileType};
pub use types::{Conditions, Meld, MeldType, Wind};
