//! Errors raised at the fallible edges of the crate: configuration files,
//! level layouts and question banks. Per-frame logic never fails.

use std::path::PathBuf;

use thiserror::Error;

use crate::entities::GateId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("barrier references gate {0:?} which does not exist")]
    UnknownGate(GateId),
    #[error("gate {0:?} is optional and cannot own blocking barriers")]
    OptionalGateBarrier(GateId),
    #[error("boss barrier present but the level has no boss")]
    BossBarrierWithoutBoss,
    #[error("gate ids must match their position: expected {expected:?}, found {found:?}")]
    GateIdMismatch { expected: GateId, found: GateId },
}

#[derive(Debug, Error, PartialEq)]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,
    #[error("question {index} has {options} options, expected {expected}")]
    WrongOptionCount {
        index: usize,
        options: usize,
        expected: usize,
    },
    #[error("question {index} has answer index {answer} but only {options} options")]
    AnswerOutOfRange {
        index: usize,
        answer: usize,
        options: usize,
    },
    #[error("failed to parse question bank: {0}")]
    Parse(String),
}
