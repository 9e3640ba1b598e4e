//! This is the core module. It exports the card, deck and
//! hand ranking code that the simulation is built on.

/// card.rs has value and suit.
mod card;
/// Re-export Card, Value, and Suit
pub use self::card::{Card, Suit, Value, cards_from_str};

/// Deck is the normal 52 card deck with a dealing cursor.
mod deck;
/// Export `Deck`
pub use self::deck::Deck;

/// Best five card hand ranking code.
mod rank;
/// Export the trait and the results.
pub use self::rank::{Rank, Rankable, STRAIGHTS};

mod error;
pub use self::error::CoreError;
