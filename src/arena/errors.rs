use thiserror::Error;

use crate::core::CoreError;

/// Session settings that can't produce a playable game.
/// These are rejected before any hand starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Player count must be between 2 and 9, got {0}")]
    PlayerCount(usize),
    #[error("The initial stack must be positive")]
    NonPositiveStack,
    #[error("Blinds must be positive")]
    NonPositiveBlind,
    #[error("The big blind {big_blind} is smaller than the small blind {small_blind}")]
    BigBlindBelowSmallBlind { small_blind: u64, big_blind: u64 },
    #[error("Hand count must be between 1 and 100, got {0}")]
    HandCount(usize),
    #[error("Expected {expected} agents, got {found}")]
    AgentCount { expected: usize, found: usize },
}

/// Errors from applying a single action to a betting round.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameStateError {
    #[error("The betting round is not accepting actions")]
    RoundNotActive,
    #[error("Seat {found} acted but seat {expected:?} is next to act")]
    NotPlayersTurn {
        expected: Option<usize>,
        found: usize,
    },
    #[error("Seat {0} has folded, is all in, or is eliminated")]
    PlayerCannotAct(usize),
    #[error("Seat {seat} needs {required} to call but only has {available}")]
    InsufficientStack {
        seat: usize,
        required: u64,
        available: u64,
    },
    #[error("Raise to {to} is below the minimum raise to {min_to}")]
    RaiseSizeTooSmall { to: u64, min_to: u64 },
    #[error("Seat {0} already acted and betting wasn't reopened by a full raise")]
    BettingNotReopened(usize),
}

/// Something that broke one of the engine's own invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Chip total is {found} but the session started with {expected}")]
    ChipSumMismatch { expected: u64, found: u64 },
    #[error("Pot {pot_idx} has an eligible set that is not part of the main pot")]
    PotEligibility { pot_idx: usize },
    #[error("Pot total {pots} doesn't match contributions {contributions}")]
    PotTotalMismatch { pots: u64, contributions: u64 },
    #[error("Pot {pot_idx} has no eligible player to award it to")]
    UnawardablePot { pot_idx: usize },
}

/// Errors that a driver invocation can surface.
/// `Configuration` is returned before any hand is played,
/// everything else aborts the current hand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoldemSimulationError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Deck error: {0}")]
    Deck(#[from] CoreError),
    #[error("Invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolation),
    #[error("Game state error: {0}")]
    GameState(#[from] GameStateError),
}
