pub mod actions;
pub mod engine;
mod events;
mod machine;
pub mod randomizer;
pub mod snapshot;
pub mod store;

pub use actions::GameApplyStatus;
pub use engine::{GameApplyResult, GameEngine};
pub use randomizer::{
    default_randomizer, CommandRandomizer, DefaultRandomizer, ExcludePreviousRandomizer,
    ScriptedRandomizer, UniformRandomizer,
};
pub use snapshot::{GamePhase, GameState};
pub use store::{FlashHighScoreStore, HighScoreStore, MemoryHighScoreStore, StoreError};
