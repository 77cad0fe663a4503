#![cfg_attr(not(feature = "std"), no_std)]

pub mod config;
pub mod game;
pub mod gesture;
pub mod runtime;
pub mod telemetry;

pub use game::{GameEngine, GameState};
pub use gesture::{GestureClassifier, GestureCommand, MotionSample};
pub use runtime::GameOrchestrator;
