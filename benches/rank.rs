#[macro_use]
extern crate criterion;

use criterion::Criterion;
use holdem_sim::core::{Deck, Rankable};
use rand::{SeedableRng, rngs::StdRng};

fn rank_one(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(420);
    let hand = Deck::shuffled(&mut rng).deal(5).unwrap();
    c.bench_function("Rank one 5 card hand", move |b| b.iter(|| hand.rank()));
}

fn rank_best_seven(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(420);
    let hand = Deck::shuffled(&mut rng).deal(7).unwrap();
    c.bench_function("Rank best 5card hand from 7", move |b| {
        b.iter(|| hand.rank())
    });
}

criterion_group!(benches, rank_one, rank_best_seven);
criterion_main!(benches);
