#[macro_use]
extern crate criterion;

use holdem_sim::core::Deck;
use rand::rng;

fn deal_all_deck(c: &mut criterion::Criterion) {
    let mut rng = rng();

    c.bench_function("deal all from Deck", |b| {
        b.iter(|| {
            let mut deck = Deck::shuffled(&mut rng);
            while !deck.is_empty() {
                let _card = deck.deal_one().unwrap();
            }
        });
    });
}

fn deal_table(c: &mut criterion::Criterion) {
    let mut rng = rng();

    c.bench_function("deal 9 handed with a full board", |b| {
        b.iter(|| {
            let mut deck = Deck::shuffled(&mut rng);
            let _hole = deck.deal(18).unwrap();
            let _board = deck.deal(5).unwrap();
        });
    });
}

criterion_group!(benches, deal_all_deck, deal_table);
criterion_main!(benches);
