//! Notation Benchmarks
//!
//! Performance benchmarks for import, export and SAN resolution using Criterion.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use xfchess_pgn::game::components::PieceColor;
use xfchess_pgn::game::rules::{RulesEngine, StandardRules};
use xfchess_pgn::notation::{import_game, parse_game, resolve, serialize, GameOutcome};

const RUY_LOPEZ: &str = "1. e4 e5 2. Nf3 (2. Bc4 Nf6 (2... Bc5 3. c3) 3. d3) 2... Nc6 \
3. Bb5 (3. Bc4 Bc5 4. c3) 3... a6 4. Ba4 Nf6 5. O-O Be7 (5... b5 6. Bb3) 6. Re1 b5 \
7. Bb3 d6 8. c3 O-O 9. h3 Nb8 10. d4 Nbd7 (1. d4 d5 2. c4) *";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_game", |b| {
        b.iter(|| black_box(parse_game(black_box(RUY_LOPEZ))))
    });
}

fn bench_import(c: &mut Criterion) {
    let rules = StandardRules::new();

    c.bench_function("import_game_with_variations", |b| {
        b.iter(|| black_box(import_game(black_box(RUY_LOPEZ), &rules)))
    });
}

fn bench_serialize(c: &mut Criterion) {
    let rules = StandardRules::new();
    let game = match import_game(RUY_LOPEZ, &rules) {
        Ok(game) => game,
        Err(e) => panic!("benchmark game should import: {e}"),
    };

    c.bench_function("serialize_tree", |b| {
        b.iter(|| black_box(serialize(&game.tree, GameOutcome::Unknown)))
    });
}

fn bench_resolve_starting(c: &mut Criterion) {
    let rules = StandardRules::new();
    let board = rules.starting_position();

    c.bench_function("resolve_nf3_starting_position", |b| {
        b.iter(|| black_box(resolve(black_box("Nf3"), PieceColor::White, &board, &rules)))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_import,
    bench_serialize,
    bench_resolve_starting
);
criterion_main!(benches);
