use crate::core::Card;

/// Where a player stands in the current hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerStatus {
    /// Still in the hand and able to act.
    Active,
    /// Gave up this hand.
    Folded,
    /// Has no chips behind, but is still in the hand.
    AllIn,
    /// Lost every chip. Never dealt in again.
    Eliminated,
}

/// A synthetic player sitting at the table for the whole session.
///
/// The stack only changes through blinds, bets and pot awards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub name: String,
    pub seat: usize,
    pub stack: u64,
    /// Chips put in on the current street that haven't been
    /// collected into the pots yet.
    pub current_bet: u64,
    /// Chips collected into the pots this hand.
    pub contributed: u64,
    pub status: PlayerStatus,
    pub hole_cards: Option<[Card; 2]>,
    /// Lifetime chips won minus chips contributed.
    pub profit: i64,
}

impl Player {
    pub fn new(seat: usize, stack: u64) -> Self {
        Self {
            name: format!("Player {}", seat + 1),
            seat,
            stack,
            current_bet: 0,
            contributed: 0,
            status: PlayerStatus::Active,
            hole_cards: None,
            profit: 0,
        }
    }

    /// Can this player still be asked for an action?
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Is this player still contesting the pot?
    pub fn in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    pub fn is_eliminated(&self) -> bool {
        self.status == PlayerStatus::Eliminated
    }

    /// Everything this player has put in this hand,
    /// collected or not.
    pub fn total_committed(&self) -> u64 {
        self.contributed + self.current_bet
    }

    /// Move up to `amount` chips from the stack into the current bet.
    /// Returns how much actually moved. A player that runs out of
    /// chips is all in.
    pub fn commit(&mut self, amount: u64) -> u64 {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.current_bet += moved;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        moved
    }

    /// Get ready for a new hand. Eliminated players stay out.
    pub fn reset_for_hand(&mut self) {
        self.current_bet = 0;
        self.contributed = 0;
        self.hole_cards = None;
        if self.status != PlayerStatus::Eliminated {
            self.status = PlayerStatus::Active;
        }
    }
}
