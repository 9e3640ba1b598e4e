use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::arena::action::AgentAction;

use super::{Agent, PlayerView};

/// An agent that picks actions at random.
///
/// The fold and call chances are looked up by how many raises there
/// have been this street, so later raises can be met more cautiously.
/// It never folds when checking is free.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
    percent_fold: Vec<f64>,
    percent_call: Vec<f64>,
}

impl RandomAgent {
    pub fn new(seed: u64, percent_fold: Vec<f64>, percent_call: Vec<f64>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            percent_fold,
            percent_call,
        }
    }

    /// The default percentages with a seeded generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(seed, vec![0.25, 0.30, 0.50], vec![0.5, 0.6, 0.45])
    }

    fn percent(values: &[f64], raise_count: usize) -> f64 {
        values
            .get(raise_count.min(values.len().saturating_sub(1)))
            .map_or(1.0, |v| v.clamp(0.0, 1.0))
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, view: &PlayerView) -> AgentAction {
        let can_fold = view.to_call > 0;
        let percent_fold = Self::percent(&self.percent_fold, view.raise_count);
        let percent_call = Self::percent(&self.percent_call, view.raise_count);

        if can_fold && self.rng.random_bool(percent_fold) {
            return AgentAction::Fold;
        }
        if !view.can_raise || self.rng.random_bool(percent_call) {
            return AgentAction::Call;
        }

        // Don't overbet too early. Cap at roughly what everyone left
        // could put in by calling a pot sized bet.
        let min = view.min_raise_to.min(view.all_in_to());
        let pot_value = (view.num_can_act as u64 + 1) * view.pot_total;
        let max = view.all_in_to().min(view.current_bet + pot_value).max(min);

        if max > min {
            AgentAction::Raise(self.rng.random_range(min..=max))
        } else {
            AgentAction::Raise(max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::agent::tests::facing_bet;

    #[test]
    fn test_never_folds_when_checking_is_free() {
        let mut agent = RandomAgent::new(7, vec![1.0], vec![0.5]);
        let mut view = facing_bet("2c7d", "");
        view.to_call = 0;
        view.current_bet = 0;
        view.min_raise_to = 10;
        for _ in 0..100 {
            assert_ne!(AgentAction::Fold, agent.act(&view));
        }
    }

    #[test]
    fn test_always_folds() {
        let mut agent = RandomAgent::new(7, vec![1.0], vec![0.0]);
        let view = facing_bet("2c7d", "");
        assert_eq!(AgentAction::Fold, agent.act(&view));
    }

    #[test]
    fn test_raises_are_legal() {
        let mut agent = RandomAgent::new(11, vec![0.0], vec![0.0]);
        let view = facing_bet("AcKd", "");
        for _ in 0..100 {
            match agent.act(&view) {
                AgentAction::Raise(to) => {
                    assert!(to >= view.min_raise_to);
                    assert!(to <= view.all_in_to());
                }
                other => panic!("expected a raise, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_calls_when_raising_is_closed() {
        let mut agent = RandomAgent::new(3, vec![0.0], vec![0.0]);
        let mut view = facing_bet("AcKd", "");
        view.can_raise = false;
        assert_eq!(AgentAction::Call, agent.act(&view));
    }

    #[test]
    fn test_same_seed_same_actions() {
        let view = facing_bet("9c9d", "");
        let mut a = RandomAgent::seeded(99);
        let mut b = RandomAgent::seeded(99);
        for _ in 0..50 {
            assert_eq!(a.act(&view), b.act(&view));
        }
    }
}
