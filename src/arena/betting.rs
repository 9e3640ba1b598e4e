use std::collections::VecDeque;
use std::fmt;

use tracing::{Level, event};

use crate::utils::PlayerBitSet;

use super::action::{ActionKind, AgentAction, AppliedAction};
use super::errors::GameStateError;
use super::player::{Player, PlayerStatus};

/// One betting phase of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn next(&self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// How many community cards get dealt going into this street.
    pub fn cards_to_deal(&self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundState {
    NotStarted,
    Active,
    Closed,
}

/// Drives one street of action to completion.
///
/// The round owns the queue of seats that still owe an action. Players
/// are passed in on every call so the session stays the single owner
/// of stacks and statuses.
#[derive(Debug, Clone)]
pub struct BettingRound {
    street: Street,
    state: RoundState,
    /// The amount everyone has to match.
    current_bet: u64,
    /// The smallest legal raise increment.
    min_raise: u64,
    /// Action order for this street. Every seated player.
    order: Vec<usize>,
    to_act: VecDeque<usize>,
    acted: PlayerBitSet,
    /// How many times the bet went up this street.
    raise_count: usize,
    /// The bet level right after each seat last acted.
    bet_after_action: Vec<Option<u64>>,
}

impl BettingRound {
    pub fn new(street: Street, current_bet: u64, min_raise: u64) -> Self {
        Self {
            street,
            state: RoundState::NotStarted,
            current_bet,
            min_raise,
            order: vec![],
            to_act: VecDeque::new(),
            acted: PlayerBitSet::default(),
            raise_count: 0,
            bet_after_action: vec![],
        }
    }

    /// Put a forced bet in before the round starts.
    /// Returns how many chips moved, which is less than `amount`
    /// for a short stack.
    pub fn post_blind(&mut self, player: &mut Player, amount: u64) -> u64 {
        player.commit(amount)
    }

    /// Open the round for action. `order` is every seated player in
    /// the order they act on this street.
    pub fn start(&mut self, players: &[Player], order: &[usize]) {
        self.order = order.to_vec();
        self.bet_after_action = vec![None; players.len()];
        self.to_act = order
            .iter()
            .copied()
            .filter(|s| players[*s].can_act())
            .collect();
        self.state = RoundState::Active;
        self.update_state(players);
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == RoundState::Closed
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn min_raise(&self) -> u64 {
        self.min_raise
    }

    /// The smallest total bet that counts as a full raise.
    pub fn min_raise_to(&self) -> u64 {
        self.current_bet + self.min_raise
    }

    pub fn next_to_act(&self) -> Option<usize> {
        if self.state == RoundState::Active {
            self.to_act.front().copied()
        } else {
            None
        }
    }

    /// Seats that still owe an action, in order.
    pub fn to_act(&self) -> impl Iterator<Item = usize> + '_ {
        self.to_act.iter().copied()
    }

    pub fn raise_count(&self) -> usize {
        self.raise_count
    }

    /// Seats that have acted at least once this street.
    pub fn acted(&self) -> PlayerBitSet {
        self.acted
    }

    pub fn to_call(&self, player: &Player) -> u64 {
        self.current_bet.saturating_sub(player.current_bet)
    }

    /// Can this player put in a raise right now?
    ///
    /// They need chips beyond the call, and if they already acted the
    /// bet must have gone up by a full raise since then.
    pub fn can_raise(&self, player: &Player) -> bool {
        player.can_act() && player.stack > self.to_call(player) && self.reopened_for(player.seat)
    }

    fn reopened_for(&self, seat: usize) -> bool {
        match self.bet_after_action.get(seat).copied().flatten() {
            Some(level) => self.current_bet >= level + self.min_raise,
            None => true,
        }
    }

    /// Apply one action from the seat that is next to act.
    ///
    /// Nothing is changed when an error is returned.
    pub fn apply_action(
        &mut self,
        players: &mut [Player],
        seat: usize,
        action: AgentAction,
    ) -> Result<AppliedAction, GameStateError> {
        if self.state != RoundState::Active {
            return Err(GameStateError::RoundNotActive);
        }
        let expected = self.to_act.front().copied();
        if expected != Some(seat) {
            return Err(GameStateError::NotPlayersTurn {
                expected,
                found: seat,
            });
        }
        if !players[seat].can_act() {
            return Err(GameStateError::PlayerCannotAct(seat));
        }

        let applied = match action {
            AgentAction::Fold => self.fold(&mut players[seat]),
            AgentAction::Call => match self.call(&mut players[seat]) {
                Ok(applied) => applied,
                Err(GameStateError::InsufficientStack {
                    required,
                    available,
                    ..
                }) => {
                    event!(
                        Level::WARN,
                        seat,
                        required,
                        available,
                        "Call is short, converting to all in"
                    );
                    self.all_in_call(&mut players[seat])
                }
                Err(e) => return Err(e),
            },
            AgentAction::Raise(to) => self.raise(players, seat, to)?,
        };

        self.acted.enable(seat);
        self.bet_after_action[seat] = Some(self.current_bet);
        self.update_state(players);

        event!(
            Level::DEBUG,
            street = %self.street,
            seat,
            kind = %applied.kind,
            amount = applied.amount,
            total_bet = applied.total_bet,
            "Applied action"
        );

        Ok(applied)
    }

    fn fold(&mut self, player: &mut Player) -> AppliedAction {
        self.to_act.pop_front();
        player.status = PlayerStatus::Folded;
        AppliedAction {
            seat: player.seat,
            kind: ActionKind::Fold,
            amount: 0,
            total_bet: player.current_bet,
            stack_after: player.stack,
            reopened: false,
        }
    }

    fn call(&mut self, player: &mut Player) -> Result<AppliedAction, GameStateError> {
        let required = self.to_call(player);
        if required > player.stack {
            return Err(GameStateError::InsufficientStack {
                seat: player.seat,
                required,
                available: player.stack,
            });
        }

        self.to_act.pop_front();
        let moved = player.commit(required);
        let kind = if moved == 0 {
            ActionKind::Check
        } else if player.stack == 0 {
            ActionKind::AllIn
        } else {
            ActionKind::Call
        };

        Ok(AppliedAction {
            seat: player.seat,
            kind,
            amount: moved,
            total_bet: player.current_bet,
            stack_after: player.stack,
            reopened: false,
        })
    }

    /// A call for less than the full amount. This never raises the bet.
    fn all_in_call(&mut self, player: &mut Player) -> AppliedAction {
        self.to_act.pop_front();
        let moved = player.commit(player.stack);
        AppliedAction {
            seat: player.seat,
            kind: ActionKind::AllIn,
            amount: moved,
            total_bet: player.current_bet,
            stack_after: player.stack,
            reopened: false,
        }
    }

    fn raise(
        &mut self,
        players: &mut [Player],
        seat: usize,
        to: u64,
    ) -> Result<AppliedAction, GameStateError> {
        let player = &players[seat];
        let all_in_to = player.current_bet + player.stack;
        // Asking for more than the stack is going all in.
        let target = to.min(all_in_to);

        if target <= self.current_bet {
            // Nothing left over the call. That is only a raise
            // request in name, play it as a call.
            return match self.call(&mut players[seat]) {
                Ok(applied) => Ok(applied),
                Err(GameStateError::InsufficientStack { .. }) => {
                    Ok(self.all_in_call(&mut players[seat]))
                }
                Err(e) => Err(e),
            };
        }
        if target < all_in_to && target < self.min_raise_to() {
            return Err(GameStateError::RaiseSizeTooSmall {
                to,
                min_to: self.min_raise_to(),
            });
        }
        if !self.reopened_for(seat) {
            return Err(GameStateError::BettingNotReopened(seat));
        }

        self.to_act.pop_front();
        let player = &mut players[seat];
        let moved = player.commit(target - player.current_bet);
        let total_bet = player.current_bet;
        let stack_after = player.stack;
        let kind = if stack_after == 0 {
            ActionKind::AllIn
        } else {
            ActionKind::Raise
        };

        let raise_size = total_bet - self.current_bet;
        let reopened = raise_size >= self.min_raise;
        if reopened {
            self.min_raise = raise_size;
        }
        self.current_bet = total_bet;
        self.raise_count += 1;
        self.requeue_after(players, seat);

        Ok(AppliedAction {
            seat,
            kind,
            amount: moved,
            total_bet,
            stack_after,
            reopened,
        })
    }

    /// After the bet goes up everyone else who can still act and
    /// hasn't matched it owes an action, starting left of the raiser.
    fn requeue_after(&mut self, players: &[Player], seat: usize) {
        let n = self.order.len();
        let start = self.order.iter().position(|s| *s == seat).unwrap_or(0);
        self.to_act = (1..n)
            .map(|i| self.order[(start + i) % n])
            .filter(|s| players[*s].can_act() && players[*s].current_bet < self.current_bet)
            .collect();
    }

    fn update_state(&mut self, players: &[Player]) {
        self.to_act.retain(|s| players[*s].can_act());

        let in_hand = players.iter().filter(|p| p.in_hand()).count();
        let can_act: Vec<&Player> = players.iter().filter(|p| p.can_act()).collect();
        // One player with chips behind and nothing to call has
        // nobody left to bet against.
        let nobody_to_bet_against =
            can_act.len() <= 1 && can_act.iter().all(|p| p.current_bet >= self.current_bet);

        if in_hand <= 1 || self.to_act.is_empty() || nobody_to_bet_against {
            self.state = RoundState::Closed;
            self.to_act.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(stacks: &[u64]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, s)| Player::new(i, *s))
            .collect()
    }

    /// Seat 0 button, 1 small blind, 2 big blind, the rest after.
    fn preflop(players: &mut [Player], sb: u64, bb: u64) -> BettingRound {
        let mut round = BettingRound::new(Street::Preflop, bb, bb);
        round.post_blind(&mut players[1], sb);
        round.post_blind(&mut players[2], bb);
        let n = players.len();
        let order: Vec<usize> = (0..n).map(|i| (3 + i) % n).collect();
        round.start(players, &order);
        round
    }

    #[test]
    fn test_three_call_one_folds_closes() {
        let mut players = table(&[100; 4]);
        let mut round = preflop(&mut players, 5, 10);

        assert_eq!(Some(3), round.next_to_act());
        round.apply_action(&mut players, 3, AgentAction::Fold).unwrap();
        round.apply_action(&mut players, 0, AgentAction::Call).unwrap();
        round.apply_action(&mut players, 1, AgentAction::Call).unwrap();
        assert!(!round.is_closed());
        // Big blind has the option and checks it.
        let applied = round.apply_action(&mut players, 2, AgentAction::Call).unwrap();
        assert_eq!(ActionKind::Check, applied.kind);

        assert!(round.is_closed());
        let remaining: Vec<&Player> = players.iter().filter(|p| p.in_hand()).collect();
        assert_eq!(3, remaining.len());
        assert!(remaining.iter().all(|p| p.current_bet == round.current_bet()));
    }

    #[test]
    fn test_out_of_turn() {
        let mut players = table(&[100; 4]);
        let mut round = preflop(&mut players, 5, 10);
        assert_eq!(
            Err(GameStateError::NotPlayersTurn {
                expected: Some(3),
                found: 0
            }),
            round.apply_action(&mut players, 0, AgentAction::Call)
        );
    }

    #[test]
    fn test_raise_reopens_action() {
        let mut players = table(&[100; 4]);
        let mut round = preflop(&mut players, 5, 10);

        round.apply_action(&mut players, 3, AgentAction::Call).unwrap();
        round.apply_action(&mut players, 0, AgentAction::Call).unwrap();
        let applied = round
            .apply_action(&mut players, 1, AgentAction::Raise(30))
            .unwrap();
        assert!(applied.reopened);
        assert_eq!(30, round.current_bet());
        assert_eq!(20, round.min_raise());
        assert_eq!(vec![2, 3, 0], round.to_act().collect::<Vec<_>>());
        assert_eq!(1, round.raise_count());
    }

    #[test]
    fn test_raise_too_small() {
        let mut players = table(&[100; 4]);
        let mut round = preflop(&mut players, 5, 10);
        assert_eq!(
            Err(GameStateError::RaiseSizeTooSmall { to: 15, min_to: 20 }),
            round.apply_action(&mut players, 3, AgentAction::Raise(15))
        );
        // Nothing changed
        assert_eq!(Some(3), round.next_to_act());
        assert_eq!(100, players[3].stack);
    }

    #[test]
    fn test_short_call_becomes_all_in() {
        let mut players = table(&[100, 100, 100, 6]);
        let mut round = preflop(&mut players, 5, 10);
        let applied = round.apply_action(&mut players, 3, AgentAction::Call).unwrap();
        assert_eq!(ActionKind::AllIn, applied.kind);
        assert_eq!(6, applied.amount);
        assert_eq!(PlayerStatus::AllIn, players[3].status);
        assert_eq!(10, round.current_bet());
    }

    #[test]
    fn test_short_all_in_raise_doesnt_reopen() {
        let mut players = table(&[100, 100, 100, 100, 25]);
        // Order: 3, 4, 0, 1, 2
        let mut round = preflop(&mut players, 5, 10);

        round.apply_action(&mut players, 3, AgentAction::Raise(20)).unwrap();
        // Seat 4 goes all in for 25, five short of a full raise.
        let applied = round.apply_action(&mut players, 4, AgentAction::Raise(100)).unwrap();
        assert_eq!(ActionKind::AllIn, applied.kind);
        assert!(!applied.reopened);
        assert_eq!(25, round.current_bet());
        assert_eq!(10, round.min_raise());

        round.apply_action(&mut players, 0, AgentAction::Fold).unwrap();
        round.apply_action(&mut players, 1, AgentAction::Fold).unwrap();
        round.apply_action(&mut players, 2, AgentAction::Fold).unwrap();

        // Seat 3 owes five more but can't raise again.
        assert_eq!(Some(3), round.next_to_act());
        assert!(!round.can_raise(&players[3]));
        assert_eq!(
            Err(GameStateError::BettingNotReopened(3)),
            round.apply_action(&mut players, 3, AgentAction::Raise(60))
        );
        round.apply_action(&mut players, 3, AgentAction::Call).unwrap();
        assert!(round.is_closed());
    }

    #[test]
    fn test_everyone_folds_to_big_blind() {
        let mut players = table(&[100; 3]);
        let mut round = preflop(&mut players, 5, 10);
        // Order is 0, 1, 2
        round.apply_action(&mut players, 0, AgentAction::Fold).unwrap();
        round.apply_action(&mut players, 1, AgentAction::Fold).unwrap();
        assert!(round.is_closed());
        assert_eq!(None, round.next_to_act());
        assert_eq!(
            Err(GameStateError::RoundNotActive),
            round.apply_action(&mut players, 2, AgentAction::Call)
        );
    }

    #[test]
    fn test_postflop_checks_around() {
        let mut players = table(&[100; 3]);
        let mut round = BettingRound::new(Street::Flop, 0, 10);
        round.start(&players, &[1, 2, 0]);
        for seat in [1, 2, 0] {
            let applied = round.apply_action(&mut players, seat, AgentAction::Call).unwrap();
            assert_eq!(ActionKind::Check, applied.kind);
        }
        assert!(round.is_closed());
    }

    #[test]
    fn test_all_in_players_skip_the_round() {
        let mut players = table(&[0, 100, 0]);
        players[0].status = PlayerStatus::AllIn;
        players[2].status = PlayerStatus::AllIn;
        let mut round = BettingRound::new(Street::Turn, 0, 10);
        round.start(&players, &[1, 2, 0]);
        assert!(round.is_closed());
    }
}
