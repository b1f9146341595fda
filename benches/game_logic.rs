use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_target::core::generator::solutions;
use tui_target::core::{
    evaluate, tutorial_board, GameMachine, RandomRoundGenerator, RoundGenerator,
    ScriptedRoundGenerator, Wake,
};
use tui_target::core::Effect;
use tui_target::types::{Command, PlayerId};

fn bench_evaluate(c: &mut Criterion) {
    let board = tutorial_board();
    let tiles = [board.tiles[0], board.tiles[8], board.tiles[9]];

    c.bench_function("evaluate_triple", |b| {
        b.iter(|| evaluate(black_box(&tiles)))
    });
}

fn bench_solutions(c: &mut Criterion) {
    let board = tutorial_board();

    c.bench_function("solutions_720_triples", |b| {
        b.iter(|| solutions(black_box(&board.tiles)))
    });
}

fn bench_generate(c: &mut Criterion) {
    let mut generator = RandomRoundGenerator::new(12345);

    c.bench_function("generate_round", |b| b.iter(|| generator.generate()));
}

fn bench_submit(c: &mut Criterion) {
    let mut machine = GameMachine::new(ScriptedRoundGenerator::repeat(tutorial_board()));
    machine.apply(Command::Start);
    machine.apply(Command::StartGame);

    // Wrong answer then resolve, so the round never completes.
    c.bench_function("guess_submit_resolve", |b| {
        b.iter(|| {
            machine.apply(Command::StartGuessing(PlayerId::new(1)));
            machine.apply(Command::SelectTile(0));
            machine.apply(Command::SelectTile(1));
            let fx = machine.apply(Command::SelectTile(2));
            for effect in &fx {
                if let Effect::Defer { token, .. } = *effect {
                    machine.wake(Wake::Deferred { token });
                }
            }
        })
    });
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_solutions,
    bench_generate,
    bench_submit
);
criterion_main!(benches);
