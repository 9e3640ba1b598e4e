use crate::arena::action::AgentAction;
use crate::core::{Card, Rank, Rankable, Value};

use super::{Agent, PlayerView};

/// A simple rule based player.
///
/// Preflop it plays pocket pairs anywhere and big cards from late
/// position. After the flop it bets trips or better, plays a pair from
/// late position and otherwise only takes cheap looks. How much it will
/// call is a fraction of its stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdAgent {
    /// Preflop call limit with a pocket pair.
    pub pair_call_limit: f64,
    /// Preflop call limit with a big card in late position.
    pub high_card_call_limit: f64,
    /// Postflop call limit with trips or better.
    pub strong_call_limit: f64,
    /// Postflop call limit with a pair in late position.
    pub pair_postflop_call_limit: f64,
    /// Postflop call limit with anything else.
    pub weak_call_limit: f64,
}

impl Default for ThresholdAgent {
    fn default() -> Self {
        Self {
            pair_call_limit: 0.1,
            high_card_call_limit: 0.05,
            strong_call_limit: 0.3,
            pair_postflop_call_limit: 0.1,
            weak_call_limit: 0.05,
        }
    }
}

fn within(to_call: u64, stack: u64, fraction: f64) -> bool {
    to_call as f64 <= stack as f64 * fraction
}

impl ThresholdAgent {
    fn is_late(view: &PlayerView) -> bool {
        view.position.is_some_and(|p| p.is_late())
    }

    fn bet_or(&self, view: &PlayerView, pot_fraction: f64, call_limit: f64) -> AgentAction {
        if view.to_call == 0 {
            let amount = ((view.pot_total as f64 * pot_fraction) as u64).max(view.big_blind);
            if view.can_raise {
                view.raise_by(amount)
            } else {
                AgentAction::Call
            }
        } else if within(view.to_call, view.stack, call_limit) {
            AgentAction::Call
        } else {
            AgentAction::Fold
        }
    }

    fn check_or_fold(view: &PlayerView) -> AgentAction {
        if view.to_call == 0 {
            AgentAction::Call
        } else {
            AgentAction::Fold
        }
    }

    fn preflop(&self, view: &PlayerView, hole: [Card; 2]) -> AgentAction {
        let pair = hole[0].value == hole[1].value;
        let high_card = hole.iter().any(|c| c.value >= Value::Queen);

        if pair {
            self.bet_or(view, 0.75, self.pair_call_limit)
        } else if high_card && Self::is_late(view) {
            self.bet_or(view, 0.5, self.high_card_call_limit)
        } else {
            Self::check_or_fold(view)
        }
    }

    fn postflop(&self, view: &PlayerView, hole: [Card; 2]) -> AgentAction {
        let mut cards = view.board.clone();
        cards.extend_from_slice(&hole);
        let rank = cards.rank();

        if rank >= Rank::ThreeOfAKind(0) {
            self.bet_or(view, 1.0, self.strong_call_limit)
        } else if rank >= Rank::OnePair(0) && Self::is_late(view) {
            self.bet_or(view, 0.5, self.pair_postflop_call_limit)
        } else if view.to_call == 0 || within(view.to_call, view.stack, self.weak_call_limit) {
            AgentAction::Call
        } else {
            AgentAction::Fold
        }
    }
}

impl Agent for ThresholdAgent {
    fn act(&mut self, view: &PlayerView) -> AgentAction {
        let Some(hole) = view.hole_cards else {
            return Self::check_or_fold(view);
        };
        if view.board.is_empty() {
            self.preflop(view, hole)
        } else {
            self.postflop(view, hole)
        }
    }
}
