//! The session's append-only record of everything that happened.
//!
//! Each event carries enough to rebuild the table state without
//! looking at the engine: hand number, seats, amounts and any cards
//! that were shown.
use std::collections::BTreeMap;

use crate::core::{Card, Rank};

use super::action::AppliedAction;
use super::betting::Street;
use super::position::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    HandStarted(HandStartedEvent),
    BlindsPosted(BlindsPostedEvent),
    CardsDealt(CardsDealtEvent),
    ActionTaken(ActionTakenEvent),
    StreetAdvanced(StreetAdvancedEvent),
    ShowdownResult(ShowdownResultEvent),
    HandEnded(HandEndedEvent),
    PlayerEliminated(PlayerEliminatedEvent),
}

impl Event {
    pub fn hand_number(&self) -> u64 {
        match self {
            Event::HandStarted(e) => e.hand_number,
            Event::BlindsPosted(e) => e.hand_number,
            Event::CardsDealt(e) => e.hand_number,
            Event::ActionTaken(e) => e.hand_number,
            Event::StreetAdvanced(e) => e.hand_number,
            Event::ShowdownResult(e) => e.hand_number,
            Event::HandEnded(e) => e.hand_number,
            Event::PlayerEliminated(e) => e.hand_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandStartedEvent {
    pub hand_number: u64,
    pub button: usize,
    pub positions: BTreeMap<usize, Position>,
    /// Every seat's stack before blinds, eliminated seats included.
    pub stacks: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlindsPostedEvent {
    pub hand_number: u64,
    pub small_blind_seat: usize,
    /// What was actually posted. Short stacks post less.
    pub small_blind: u64,
    pub big_blind_seat: usize,
    pub big_blind: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Deal {
    /// Hole cards for one seat. `None` when they are hidden.
    Hole {
        seat: usize,
        cards: Option<[Card; 2]>,
    },
    Board { street: Street, cards: Vec<Card> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardsDealtEvent {
    pub hand_number: u64,
    pub deal: Deal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionTakenEvent {
    pub hand_number: u64,
    pub street: Street,
    pub action: AppliedAction,
    /// Total chips in the middle after the action.
    pub pot_after: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetAdvancedEvent {
    pub hand_number: u64,
    pub street: Street,
    pub board: Vec<Card>,
    pub pot_sizes: Vec<u64>,
}

/// A seat's hand as shown at showdown.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShownHand {
    pub seat: usize,
    /// Hidden when the pot was won without a showdown.
    pub hole_cards: Option<[Card; 2]>,
    pub rank: Option<Rank>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShowdownResultEvent {
    pub hand_number: u64,
    pub pot_index: usize,
    pub amount: u64,
    pub winners: Vec<(usize, u64)>,
    pub hands: Vec<ShownHand>,
    /// Only the winner's own unmatched bet was in this pot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub uncalled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandEndedEvent {
    pub hand_number: u64,
    pub stacks: Vec<u64>,
    /// Chips won minus chips put in this hand, for every seat.
    pub net: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerEliminatedEvent {
    pub hand_number: u64,
    pub seat: usize,
}

/// Append-only event storage. Readers hold a cursor (a ledger length
/// they already saw) and ask for everything after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventLedger {
    events: Vec<Event>,
}

impl EventLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events recorded after `cursor`. A cursor past the end gives
    /// an empty slice.
    pub fn since(&self, cursor: usize) -> &[Event] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ended(hand_number: u64) -> Event {
        Event::HandEnded(HandEndedEvent {
            hand_number,
            stacks: vec![100, 100],
            net: vec![0, 0],
        })
    }

    #[test]
    fn test_since_cursor() {
        let mut ledger = EventLedger::new();
        assert!(ledger.is_empty());
        ledger.push(ended(1));
        ledger.push(ended(2));
        ledger.push(ended(3));

        assert_eq!(3, ledger.since(0).len());
        assert_eq!(2, ledger.since(1)[0].hand_number());
        assert!(ledger.since(3).is_empty());
        assert!(ledger.since(10).is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes() {
        let mut ledger = EventLedger::new();
        ledger.push(Event::PlayerEliminated(PlayerEliminatedEvent {
            hand_number: 4,
            seat: 2,
        }));
        let json = serde_json::to_string(&ledger).unwrap();
        let back: EventLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(ledger, back);
    }
}
