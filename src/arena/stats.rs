//! Per seat statistics rebuilt from the event ledger alone.
//!
//! Replaying is cheap and restartable: feed it any prefix of the
//! ledger and it reports the state as of that point.
use crate::core::Rank;

use super::action::ActionKind;
use super::event::Event;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatStats {
    pub hands_played: usize,
    /// Hands where this seat won at least one pot. Getting back an
    /// unmatched bet doesn't count.
    pub hands_won: usize,
    pub total_profit: i64,
    /// Net result of each hand the seat was dealt into.
    pub profit_by_hand: Vec<(u64, i64)>,
    /// Best rank shown at a showdown.
    pub best_hand: Option<Rank>,
    pub folds: usize,
    pub checks: usize,
    pub calls: usize,
    pub raises: usize,
    pub all_ins: usize,
}

impl SeatStats {
    pub fn actions(&self) -> usize {
        self.folds + self.checks + self.calls + self.raises + self.all_ins
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionStats {
    pub hands: usize,
    pub seats: Vec<SeatStats>,
}

impl SessionStats {
    pub fn replay<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut stats = SessionStats::default();
        // Seats that were dealt in to the hand being replayed.
        let mut dealt: Vec<usize> = vec![];
        // Seats that have already been credited a win this hand.
        let mut won_this_hand: Vec<usize> = vec![];

        for event in events {
            match event {
                Event::HandStarted(started) => {
                    stats.ensure_seats(started.stacks.len());
                    stats.hands += 1;
                    dealt = started.positions.keys().copied().collect();
                    won_this_hand.clear();
                    for seat in &dealt {
                        stats.seats[*seat].hands_played += 1;
                    }
                }
                Event::ActionTaken(taken) => {
                    let action = &taken.action;
                    stats.ensure_seats(action.seat + 1);
                    let seat = &mut stats.seats[action.seat];
                    match action.kind {
                        ActionKind::Fold => seat.folds += 1,
                        ActionKind::Check => seat.checks += 1,
                        ActionKind::Call => seat.calls += 1,
                        ActionKind::Raise => seat.raises += 1,
                        ActionKind::AllIn => seat.all_ins += 1,
                    }
                }
                Event::ShowdownResult(result) => {
                    for hand in &result.hands {
                        stats.ensure_seats(hand.seat + 1);
                        let seat = &mut stats.seats[hand.seat];
                        if hand.rank > seat.best_hand {
                            seat.best_hand = hand.rank;
                        }
                    }
                    if result.uncalled {
                        continue;
                    }
                    for (seat, amount) in &result.winners {
                        if *amount > 0 && !won_this_hand.contains(seat) {
                            stats.ensure_seats(seat + 1);
                            stats.seats[*seat].hands_won += 1;
                            won_this_hand.push(*seat);
                        }
                    }
                }
                Event::HandEnded(ended) => {
                    stats.ensure_seats(ended.net.len());
                    for seat in &dealt {
                        let net = ended.net.get(*seat).copied().unwrap_or_default();
                        let s = &mut stats.seats[*seat];
                        s.total_profit += net;
                        s.profit_by_hand.push((ended.hand_number, net));
                    }
                }
                Event::BlindsPosted(_)
                | Event::CardsDealt(_)
                | Event::StreetAdvanced(_)
                | Event::PlayerEliminated(_) => {}
            }
        }
        stats
    }

    fn ensure_seats(&mut self, n: usize) {
        if self.seats.len() < n {
            self.seats.resize_with(n, SeatStats::default);
        }
    }

    pub fn seat(&self, seat: usize) -> Option<&SeatStats> {
        self.seats.get(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::action::AgentAction;
    use crate::arena::agent::{Agent, HumanProxyAgent, PolicyKind};
    use crate::arena::event::EventLedger;
    use crate::arena::player::Player;
    use crate::arena::position::PositionAssignment;
    use crate::arena::session::SessionBuilder;
    use crate::arena::simulation::{HandSettings, HandSimulation};
    use crate::core::{Deck, cards_from_str};

    #[test_log::test]
    fn test_replay_matches_session() {
        let mut session = SessionBuilder::default()
            .player_count(4)
            .initial_stack(300)
            .blinds(2, 4)
            .seed(12)
            .policy(PolicyKind::Threshold)
            .build()
            .unwrap();
        let outcome = session.play_hands(25).unwrap();

        let stats = SessionStats::replay(session.ledger().iter());
        assert_eq!(outcome.hands_played, stats.hands);
        for player in session.players() {
            let seat = stats.seat(player.seat).unwrap();
            assert_eq!(player.profit, seat.total_profit);
            assert_eq!(
                seat.total_profit,
                seat.profit_by_hand.iter().map(|(_, n)| n).sum::<i64>()
            );
            assert!(seat.hands_won <= seat.hands_played);
        }
        assert_eq!(0, stats.seats.iter().map(|s| s.total_profit).sum::<i64>());
    }

    #[test]
    fn test_prefix_replay() {
        let mut session = SessionBuilder::default()
            .player_count(3)
            .seed(5)
            .build()
            .unwrap();
        let first = session.play_hands(3).unwrap();
        session.play_hands(3).unwrap();

        let prefix = SessionStats::replay(session.events(0)[..first.snapshot.ledger_len].iter());
        assert_eq!(first.hands_played, prefix.hands);
        for p in &first.snapshot.players {
            assert_eq!(p.profit, prefix.seat(p.seat).unwrap().total_profit);
        }
    }

    #[test_log::test]
    fn test_returned_bet_is_not_a_win() {
        // Seat 1 shoves over seat 0's limp and loses to the short call.
        let mut players = vec![Player::new(0, 90), Player::new(1, 110)];
        let positions = PositionAssignment::assign(&players, None).unwrap();
        let seat_0 = HumanProxyAgent::default();
        seat_0.push(AgentAction::Call);
        seat_0.push(AgentAction::Call);
        let seat_1 = HumanProxyAgent::default();
        seat_1.push(AgentAction::Raise(110));
        let mut agents: Vec<Box<dyn Agent>> = vec![Box::new(seat_0), Box::new(seat_1)];
        let mut ledger = EventLedger::new();

        let settings = HandSettings {
            small_blind: 5,
            big_blind: 10,
            reveal_hole_cards: false,
        };
        let deck = Deck::from(cards_from_str("2c3d AsAh 7s8c9dJh4c").unwrap());
        HandSimulation::new(
            1,
            settings,
            positions,
            &mut players,
            &mut agents,
            &mut ledger,
            deck,
        )
        .run()
        .unwrap();
        assert_eq!(vec![180, 20], players.iter().map(|p| p.stack).collect::<Vec<_>>());

        let stats = SessionStats::replay(ledger.iter());
        assert_eq!(1, stats.seat(0).unwrap().hands_won);
        assert_eq!(0, stats.seat(1).unwrap().hands_won);
        assert_eq!(-90, stats.seat(1).unwrap().total_profit);
    }

    #[test]
    fn test_empty_ledger() {
        let events: Vec<Event> = vec![];
        let stats = SessionStats::replay(&events);
        assert_eq!(0, stats.hands);
        assert!(stats.seats.is_empty());
    }
}
