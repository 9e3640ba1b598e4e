//! `Agent`s are the synthetic players at the table. Each one is asked
//! for a decision when its seat is next to act and answers right away.
//!
//! A few policies are provided. Anything else can be plugged in by
//! implementing [`Agent`] and handing it to the session builder.
mod human_proxy;
mod random;
mod threshold;

pub use human_proxy::{ActionQueue, HumanProxyAgent};
pub use random::RandomAgent;
pub use threshold::ThresholdAgent;

use crate::core::Card;

use super::action::AgentAction;
use super::betting::Street;
use super::position::Position;

/// Everything a seat is allowed to see when deciding.
///
/// Other players' hole cards are never part of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub hand_number: u64,
    pub seat: usize,
    pub street: Street,
    pub position: Option<Position>,
    pub hole_cards: Option<[Card; 2]>,
    pub board: Vec<Card>,
    pub stack: u64,
    /// This seat's bet on the current street.
    pub player_bet: u64,
    pub current_bet: u64,
    pub to_call: u64,
    pub min_raise_to: u64,
    /// Raises so far this street.
    pub raise_count: usize,
    /// Every chip in the middle, collected or not.
    pub pot_total: u64,
    pub big_blind: u64,
    /// Players that haven't folded.
    pub num_in_hand: usize,
    /// Seats that can still put more chips in.
    pub num_can_act: usize,
    pub can_raise: bool,
}

impl PlayerView {
    /// The largest total bet this seat could make.
    pub fn all_in_to(&self) -> u64 {
        self.player_bet + self.stack
    }

    /// A raise that adds `amount` on top of the current bet,
    /// kept between the minimum raise and all in.
    pub fn raise_by(&self, amount: u64) -> AgentAction {
        let to = (self.current_bet + amount)
            .max(self.min_raise_to)
            .min(self.all_in_to());
        AgentAction::Raise(to)
    }
}

/// This is the trait to implement for a new strategy.
/// The agent owns whatever state it needs between decisions.
pub trait Agent {
    /// Called when it's this agent's turn.
    fn act(&mut self, view: &PlayerView) -> AgentAction;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn act(&mut self, view: &PlayerView) -> AgentAction {
        (**self).act(view)
    }
}

/// Which built in policy every seat gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PolicyKind {
    #[default]
    Random,
    Threshold,
    HumanProxy,
}

/// The built in policies.
#[derive(Debug, Clone)]
pub enum Policy {
    Random(RandomAgent),
    Threshold(ThresholdAgent),
    HumanProxy(HumanProxyAgent),
}

impl Policy {
    /// Build the policy for one seat. Random policies get their own
    /// stream derived from the session seed so that seats don't
    /// influence each other.
    pub fn for_seat(kind: PolicyKind, seed: u64, seat: usize) -> Self {
        match kind {
            PolicyKind::Random => Policy::Random(RandomAgent::seeded(
                seed.wrapping_add(1 + seat as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
            )),
            PolicyKind::Threshold => Policy::Threshold(ThresholdAgent::default()),
            PolicyKind::HumanProxy => Policy::HumanProxy(HumanProxyAgent::default()),
        }
    }
}

impl Agent for Policy {
    fn act(&mut self, view: &PlayerView) -> AgentAction {
        match self {
            Policy::Random(agent) => agent.act(view),
            Policy::Threshold(agent) => agent.act(view),
            Policy::HumanProxy(agent) => agent.act(view),
        }
    }
}
