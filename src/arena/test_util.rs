use super::event::Event;
use super::player::Player;
use super::pot::{self, Pot};
use super::session::Session;

/// The chips at the table never change. Checks the live stacks and
/// the stacks recorded at the end of every hand in the ledger.
pub fn assert_chip_conservation(session: &Session) {
    let total = session.chip_total();
    let live: u64 = session
        .players()
        .iter()
        .map(|p| p.stack + p.total_committed())
        .sum();
    assert_eq!(total, live);

    for event in session.ledger().iter() {
        if let Event::HandEnded(ended) = event {
            assert_eq!(
                total,
                ended.stacks.iter().sum::<u64>(),
                "hand {} ended with the wrong chip total",
                ended.hand_number
            );
            assert_eq!(0, ended.net.iter().sum::<i64>());
        }
    }

    assert_eq!(0, session.players().iter().map(|p| p.profit).sum::<i64>());
}

pub fn assert_valid_pots(pots: &[Pot], players: &[Player]) {
    assert_eq!(Ok(()), pot::validate_pots(pots, players));

    // Each later pot is contested by a subset of the one before.
    for pair in pots.windows(2) {
        assert!(pair[1].eligible.is_subset(&pair[0].eligible));
    }
    assert!(pots.iter().all(|p| p.amount > 0));
    assert!(pots.iter().all(|p| !p.eligible.empty()));
}
