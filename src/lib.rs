//! Core of a quiz-gated side-scrolling platformer.
//!
//! Everything here is pure frame-stepped logic with no terminal I/O: the
//! collision resolver, the actors built on it, combat, gates and the level
//! session that composes them. The binary in `main.rs` is one front end.

pub mod actor;
pub mod avatar;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod events;
pub mod gate;
pub mod geometry;
pub mod input;
pub mod items;
pub mod level;
pub mod logging;
pub mod quiz;
pub mod session;

pub use avatar::{Avatar, AvatarState, DamageOutcome};
pub use config::GameConfig;
pub use enemy::{Enemy, EnemyKind};
pub use entities::{BarrierOwner, GameStatus, GateId, Obstacle, ObstacleKind, PowerUpKind};
pub use error::{BankError, ConfigError, LayoutError};
pub use events::GameEvent;
pub use gate::{Gate, GateKind, KeyWallet};
pub use geometry::Rect;
pub use input::FrameInput;
pub use level::{Level, LevelLayout};
pub use quiz::{BankQuiz, Challenge, Quiz, QuizResult};
pub use session::LevelSession;
