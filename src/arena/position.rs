//! Seat rotation and blind assignment.
//!
//! Every hand the button moves to the next seat clockwise that still
//! has chips. The blinds and the remaining labels follow from there.
use std::collections::BTreeMap;
use std::fmt;

use super::player::Player;

/// Table position labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    UnderTheGunPlusOne,
    MiddlePosition,
    Lojack,
    Hijack,
    Cutoff,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::UnderTheGun => "UTG",
            Position::UnderTheGunPlusOne => "UTG+1",
            Position::MiddlePosition => "MP",
            Position::Lojack => "LJ",
            Position::Hijack => "HJ",
            Position::Cutoff => "CO",
        }
    }

    /// The button and the seat right before it.
    pub fn is_late(&self) -> bool {
        matches!(self, Position::Button | Position::Cutoff)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Labels for the seats between the big blind and the button,
/// given how many of those seats there are.
fn labels_after_big_blind(k: usize) -> &'static [Position] {
    use Position::*;
    match k {
        0 => &[],
        1 => &[UnderTheGun],
        2 => &[UnderTheGun, Cutoff],
        3 => &[UnderTheGun, MiddlePosition, Cutoff],
        4 => &[UnderTheGun, MiddlePosition, Hijack, Cutoff],
        5 => &[UnderTheGun, UnderTheGunPlusOne, MiddlePosition, Hijack, Cutoff],
        _ => &[
            UnderTheGun,
            UnderTheGunPlusOne,
            MiddlePosition,
            Lojack,
            Hijack,
            Cutoff,
        ],
    }
}

/// Find the next seat clockwise from `start` that isn't eliminated.
pub fn next_seated(players: &[Player], start: usize, include_start: bool) -> Option<usize> {
    let n = players.len();
    if n == 0 {
        return None;
    }
    let offset = if include_start { 0 } else { 1 };
    (0..n)
        .map(|i| (start + offset + i) % n)
        .find(|idx| !players[*idx].is_eliminated())
}

/// Who sits where for one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionAssignment {
    pub button: usize,
    pub small_blind: usize,
    pub big_blind: usize,
    pub roles: BTreeMap<usize, Position>,
    /// Seated players clockwise starting with the button.
    seats: Vec<usize>,
}

impl PositionAssignment {
    /// Rotate the button and derive every role.
    ///
    /// The first hand puts the button on the first seated player
    /// starting at seat 0. Returns `None` when fewer than two
    /// players still have chips.
    pub fn assign(players: &[Player], previous_button: Option<usize>) -> Option<Self> {
        let button = match previous_button {
            Some(b) => next_seated(players, b, false)?,
            None => next_seated(players, 0, true)?,
        };

        let n = players.len();
        let seats: Vec<usize> = (0..n)
            .map(|i| (button + i) % n)
            .filter(|idx| !players[*idx].is_eliminated())
            .collect();

        if seats.len() < 2 {
            return None;
        }

        let mut roles = BTreeMap::new();
        roles.insert(button, Position::Button);

        if seats.len() == 2 {
            // Heads up the button posts the small blind.
            let big_blind = seats[1];
            roles.insert(big_blind, Position::BigBlind);
            return Some(Self {
                button,
                small_blind: button,
                big_blind,
                roles,
                seats,
            });
        }

        let small_blind = seats[1];
        let big_blind = seats[2];
        roles.insert(small_blind, Position::SmallBlind);
        roles.insert(big_blind, Position::BigBlind);

        let rest = &seats[3..];
        for (seat, label) in rest.iter().zip(labels_after_big_blind(rest.len())) {
            roles.insert(*seat, *label);
        }

        Some(Self {
            button,
            small_blind,
            big_blind,
            roles,
            seats,
        })
    }

    pub fn position_of(&self, seat: usize) -> Option<Position> {
        self.roles.get(&seat).copied()
    }

    pub fn num_seated(&self) -> usize {
        self.seats.len()
    }

    /// Seated players clockwise starting with the button.
    pub fn seats(&self) -> &[usize] {
        &self.seats
    }

    /// Preflop action starts left of the big blind
    /// and the big blind closes it.
    pub fn preflop_order(&self) -> Vec<usize> {
        let start = if self.seats.len() == 2 { 0 } else { 3 };
        self.rotated(start)
    }

    /// Postflop action starts with the first seat after the button.
    pub fn postflop_order(&self) -> Vec<usize> {
        self.rotated(1)
    }

    fn rotated(&self, start: usize) -> Vec<usize> {
        let n = self.seats.len();
        (0..n).map(|i| self.seats[(start + i) % n]).collect()
    }

    /// Seated players clockwise starting left of the button.
    /// This is the order odd chips are handed out in.
    pub fn odd_chip_order(&self) -> Vec<usize> {
        self.rotated(1)
    }
}
