//! A deterministic Texas Hold'em simulation engine.
//!
//! `holdem_sim` plays seeded multi hand sessions for 2 to 9 synthetic
//! players. Blinds, deals, actions and settlements are all recorded in
//! an append-only event ledger that can be replayed later.
//!
//! The crate is split the same way the game is:
//!
//! - [`core`] has cards, the deck and the hand evaluator.
//! - [`arena`] has the table: positions, betting rounds, pots, agents
//!   and the session that drives hands.
//! - [`utils`] has small shared helpers.

/// Cards, the deck and hand ranking.
pub mod core;

/// Small shared helpers.
pub mod utils;

/// The engine that plays hands between agents.
pub mod arena;
