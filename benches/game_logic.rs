use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{ghost, Board, GameState, Piece};
use blockfall::types::{Intent, PieceKind, RunState};

fn bench_tick(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start_game();

    c.bench_function("gravity_tick", |b| {
        b.iter(|| {
            if state.state() != RunState::Playing {
                state.start_game();
            }
            black_box(state.tick());
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            board.clear_full_rows();
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start_game();

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            if state.state() != RunState::Playing {
                state.start_game();
            }
            black_box(state.apply(Intent::HardDrop));
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start_game();

    c.bench_function("move_piece", |b| {
        b.iter(|| {
            state.move_piece(black_box(1), 0);
            state.move_piece(black_box(-1), 0);
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start_game();

    c.bench_function("rotate", |b| {
        b.iter(|| {
            state.rotate();
        })
    });
}

fn bench_ghost(c: &mut Criterion) {
    let board = Board::from_rows(&["##.#######", "#.########"]);
    let piece = Piece::spawn(PieceKind::T);

    c.bench_function("ghost_projection", |b| {
        b.iter(|| ghost(black_box(&piece), black_box(&board)))
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_hard_drop,
    bench_move,
    bench_rotate,
    bench_ghost
);
criterion_main!(benches);
