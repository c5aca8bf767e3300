use criterion::{criterion_group, criterion_main, Criterion};
use std::time::Duration;
use slytherin_common::games::SessionRng;
use slytherin_common::games::snake::{
    Direction, GameSession, InputEvent, SessionStatus, SnakeSessionSettings,
};
use slytherin_common::storage::MemoryKeyValueStore;

const TURNS: [Direction; 4] = [Direction::Down, Direction::Right, Direction::Up, Direction::Right];

fn create_session(store: &MemoryKeyValueStore, level: u8) -> GameSession<&MemoryKeyValueStore> {
    let mut session = GameSession::new(
        SnakeSessionSettings::default(),
        level,
        store,
        SessionRng::new(42),
    )
    .unwrap();
    session.start_new_game();
    session
}

fn run_ticks(store: &MemoryKeyValueStore, level: u8, ticks: usize) {
    let mut session = create_session(store, level);
    let mut rng = SessionRng::new(7);

    for i in 0..ticks {
        if i % 5 == 0
            && let Some(turn) = rng.choose(&TURNS)
        {
            session.handle_input(InputEvent::SetDirection(*turn));
        }
        session.tick();
        if session.status() == SessionStatus::Over {
            session.start_new_game();
        }
    }
}

fn run_countdown(store: &MemoryKeyValueStore) {
    let mut session = create_session(store, 1);
    for _ in 0..200 {
        session.advance(Duration::from_millis(50));
        if session.status() == SessionStatus::Over {
            session.start_new_game();
        }
    }
}

fn tick_bench(c: &mut Criterion) {
    let store = MemoryKeyValueStore::new();
    let mut group = c.benchmark_group("snake");

    group.bench_function("1000_ticks_open_field", |b| {
        b.iter(|| run_ticks(&store, 1, 1000))
    });

    group.bench_function("1000_ticks_level_5", |b| {
        b.iter(|| run_ticks(&store, 5, 1000))
    });

    group.bench_function("advance_10s_wall_time", |b| {
        b.iter(|| run_countdown(&store))
    });

    group.finish();
}

criterion_group!(benches, tick_bench);
criterion_main!(benches);
