use std::time::Duration;

use crate::config::Validate;
use crate::log;
use crate::games::SessionRng;
use crate::storage::KeyValueStore;
use super::clock::SimulationClock;
use super::food::FoodSpawner;
use super::game_state::{CountdownOutcome, SnakeGameState, TickOutcome};
use super::leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardUpdate, LEADERBOARD_DISPLAY_SIZE};
use super::levels::{is_valid_level, level_hurdles};
use super::settings::SnakeSessionSettings;
use super::snake::Snake;
use super::types::{DeathReason, Direction, Food, FoodType, Point, SessionStatus};

pub const START_POSITION: Point = Point { x: 0, y: 0 };
pub const START_DIRECTION: Direction = Direction::Right;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    SetDirection(Direction),
    TogglePause,
    StartNewGame,
    SetLevel(u8),
    SetPlayerName(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub reason: DeathReason,
    pub player_name: String,
    pub score: u32,
    pub leaderboard: LeaderboardUpdate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    FoodEaten { food_type: FoodType, score: u32 },
    FoodExpired { expired: FoodType, next: FoodType },
    GameOver(GameOverSummary),
}

/// Read-only view handed to renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub field_width: usize,
    pub field_height: usize,
    pub snake: Vec<Point>,
    pub direction: Direction,
    pub food: Option<Food>,
    pub hurdles: Vec<Point>,
    pub score: u32,
    pub status: SessionStatus,
    pub special_time_left: Option<Duration>,
    pub food_blinking: bool,
    pub level: u8,
    pub player_name: String,
    pub highest_score: u32,
    pub top_entries: Vec<LeaderboardEntry>,
}

/// Single-player game lifecycle: `NotStarted -> Running <-> Paused -> Over`,
/// with `Over -> Running` only through [`GameSession::start_new_game`].
///
/// All mutation goes through `&mut self`, so tick, countdown and input events
/// are processed one at a time and each runs to completion.
pub struct GameSession<S: KeyValueStore> {
    settings: SnakeSessionSettings,
    state: SnakeGameState,
    status: SessionStatus,
    level: u8,
    player_name: String,
    clock: SimulationClock,
    leaderboard: Leaderboard,
    store: S,
    rng: SessionRng,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn new(
        settings: SnakeSessionSettings,
        level: u8,
        store: S,
        rng: SessionRng,
    ) -> Result<Self, String> {
        settings.validate()?;
        if !is_valid_level(level) {
            return Err(format!("Unknown level {}", level));
        }

        let leaderboard = Leaderboard::load(&store);
        let clock = SimulationClock::new(settings.tick_interval());
        let mut session = Self {
            state: fresh_state(&settings, level),
            settings,
            status: SessionStatus::NotStarted,
            level,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            clock,
            leaderboard,
            store,
            rng,
        };

        if let Err(reason) = session.state.respawn_food(FoodType::Normal, &mut session.rng) {
            return Err(format!("Cannot place food on level {}: {:?}", level, reason));
        }

        log!(
            "Session ready: level {}, seed {}, {} leaderboard entries",
            level,
            session.rng.seed(),
            session.leaderboard.entries().len()
        );
        Ok(session)
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<SessionEvent> {
        match event {
            InputEvent::SetDirection(direction) => {
                self.set_direction(direction);
                Vec::new()
            }
            InputEvent::TogglePause => {
                self.toggle_pause();
                Vec::new()
            }
            InputEvent::StartNewGame => self.start_new_game(),
            InputEvent::SetLevel(level) => self.set_level(level),
            InputEvent::SetPlayerName(name) => {
                self.set_player_name(&name);
                Vec::new()
            }
        }
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        self.state.set_snake_direction(direction)
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            SessionStatus::Running => {
                self.status = SessionStatus::Paused;
                self.clock.stop();
                log!("Paused at score {}", self.state.score);
                true
            }
            SessionStatus::Paused => {
                self.status = SessionStatus::Running;
                self.clock.resume();
                log!("Resumed");
                true
            }
            SessionStatus::NotStarted | SessionStatus::Over => false,
        }
    }

    /// Full reset onto the current level. Valid from any state.
    pub fn start_new_game(&mut self) -> Vec<SessionEvent> {
        self.state = fresh_state(&self.settings, self.level);
        self.status = SessionStatus::Running;
        self.clock.start();
        log!("New game for {} on level {}", self.player_name, self.level);

        match self.state.respawn_food(FoodType::Normal, &mut self.rng) {
            Ok(_) => Vec::new(),
            Err(reason) => vec![self.end_game(reason)],
        }
    }

    /// Swaps the hurdle set without touching the snake or the score.
    pub fn set_level(&mut self, level: u8) -> Vec<SessionEvent> {
        let Some(hurdles) = level_hurdles(level, &self.state.field_size) else {
            log!("Ignoring unknown level {}", level);
            return Vec::new();
        };

        self.level = level;
        match self.state.replace_hurdles(hurdles, &mut self.rng) {
            Ok(overlap) => {
                if !overlap.is_empty() {
                    log!(
                        "Level {} hurdles overlap {} snake segment(s)",
                        level,
                        overlap.len()
                    );
                }
                log!("Switched to level {}", level);
                Vec::new()
            }
            Err(reason) if self.is_live() => vec![self.end_game(reason)],
            Err(_) => Vec::new(),
        }
    }

    /// Trims `name`; a blank name is ignored.
    pub fn set_player_name(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == self.player_name {
            return false;
        }
        self.player_name = trimmed.to_string();
        log!("Player name set to {}", self.player_name);
        true
    }

    /// Feeds wall time into the session. Countdown steps and ticks that fall
    /// inside `elapsed` run in chronological order; a countdown step due at
    /// the same instant as a tick runs first. Time is dropped unless running.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let mut remaining = elapsed;

        while self.status == SessionStatus::Running {
            let Some(to_tick) = self.clock.time_to_next_tick() else {
                break;
            };
            let step = match self.state.time_to_next_countdown_step() {
                Some(to_countdown) => to_tick.min(to_countdown),
                None => to_tick,
            };

            if step > remaining {
                self.clock.elapse(remaining);
                self.state.elapse_special_timer(remaining);
                break;
            }

            self.clock.elapse(step);
            self.state.elapse_special_timer(step);
            remaining -= step;

            if let Some(event) = self.run_countdown() {
                events.push(event);
            }
            if self.status == SessionStatus::Running && self.clock.take_due_tick() {
                events.extend(self.tick());
            }
        }

        events
    }

    /// Advances the snake by one cell. No effect unless running.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        if self.status != SessionStatus::Running {
            return None;
        }

        match self.state.update(&mut self.rng) {
            TickOutcome::Moved => None,
            TickOutcome::Ate { food_type, score } => {
                Some(SessionEvent::FoodEaten { food_type, score })
            }
            TickOutcome::GameOver(reason) => Some(self.end_game(reason)),
        }
    }

    fn run_countdown(&mut self) -> Option<SessionEvent> {
        match self.state.run_due_countdown_step(&mut self.rng) {
            CountdownOutcome::Idle | CountdownOutcome::Counting { .. } => None,
            CountdownOutcome::Expired { expired, next } => {
                log!("{:?} expired, spawned {:?}", expired, next.food_type);
                Some(SessionEvent::FoodExpired {
                    expired,
                    next: next.food_type,
                })
            }
            CountdownOutcome::BoardFull => Some(self.end_game(DeathReason::BoardFull)),
        }
    }

    fn end_game(&mut self, reason: DeathReason) -> SessionEvent {
        self.status = SessionStatus::Over;
        self.clock.stop();
        self.state.special_timer = None;

        let score = self.state.score;
        let update = self.leaderboard.record_game(&self.player_name, score);
        if let Err(e) = self.leaderboard.save(&self.store, update.new_high_score) {
            log!("Failed to save leaderboard: {}", e);
        }

        log!(
            "Game over ({:?}) for {} with score {}",
            reason,
            self.player_name,
            score
        );
        if update.new_high_score {
            log!("New high score: {}", update.highest_score);
        }

        SessionEvent::GameOver(GameOverSummary {
            reason,
            player_name: self.player_name.clone(),
            score,
            leaderboard: update,
        })
    }

    fn is_live(&self) -> bool {
        matches!(self.status, SessionStatus::Running | SessionStatus::Paused)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut hurdles: Vec<Point> = self.state.hurdles.iter().copied().collect();
        hurdles.sort_by_key(|p| (p.y, p.x));

        SessionSnapshot {
            field_width: self.state.field_size.width,
            field_height: self.state.field_size.height,
            snake: self.state.snake.segments(),
            direction: self.state.snake.heading(),
            food: self.state.food,
            hurdles,
            score: self.state.score,
            status: self.status,
            special_time_left: self.state.special_timer.as_ref().map(|t| t.remaining()),
            food_blinking: self.state.is_blinking(),
            level: self.level,
            player_name: self.player_name.clone(),
            highest_score: self.leaderboard.highest_score(),
            top_entries: self.leaderboard.top(LEADERBOARD_DISPLAY_SIZE).to_vec(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn direction(&self) -> Direction {
        self.state.snake.heading()
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn state(&self) -> &SnakeGameState {
        &self.state
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn settings(&self) -> &SnakeSessionSettings {
        &self.settings
    }
}

fn fresh_state(settings: &SnakeSessionSettings, level: u8) -> SnakeGameState {
    let field_size = settings.field_size();
    let hurdles = level_hurdles(level, &field_size).unwrap_or_default();
    let spawner = FoodSpawner::new(settings.food_weights, settings.special_food_timing());
    SnakeGameState::new(
        field_size,
        Snake::new(START_POSITION, START_DIRECTION),
        hurdles,
        spawner,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::food::SpecialFoodTimer;
    use crate::games::snake::leaderboard::{HIGHEST_SCORE_KEY, LEADERBOARD_KEY};
    use crate::storage::MemoryKeyValueStore;

    const TICK: Duration = Duration::from_millis(200);

    fn create_session(store: &MemoryKeyValueStore) -> GameSession<&MemoryKeyValueStore> {
        GameSession::new(SnakeSessionSettings::default(), 1, store, SessionRng::new(42)).unwrap()
    }

    fn place_food(session: &mut GameSession<&MemoryKeyValueStore>, x: i32, y: i32, food_type: FoodType) {
        session.state.food = Some(Food {
            position: Point::new(x, y),
            food_type,
        });
        session.state.special_timer = food_type
            .is_special()
            .then(|| SpecialFoodTimer::new(food_type, &session.settings.special_food_timing()));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let store = MemoryKeyValueStore::new();
        let settings = SnakeSessionSettings {
            countdown_resolution_ms: 0,
            ..SnakeSessionSettings::default()
        };
        let result = GameSession::new(settings, 1, &store, SessionRng::new(42));
        assert!(result.is_err());

        let settings = SnakeSessionSettings {
            special_food_lifetime_ms: 5050,
            ..SnakeSessionSettings::default()
        };
        assert!(GameSession::new(settings, 1, &store, SessionRng::new(42)).is_err());
    }

    #[test]
    fn test_new_session_is_not_started() {
        let store = MemoryKeyValueStore::new();
        let session = create_session(&store);
        assert_eq!(session.status(), SessionStatus::NotStarted);
        assert_eq!(session.player_name(), DEFAULT_PLAYER_NAME);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.snake, vec![START_POSITION]);
        assert_eq!(snapshot.food.map(|f| f.food_type), Some(FoodType::Normal));
    }

    #[test]
    fn test_rejects_unknown_level() {
        let store = MemoryKeyValueStore::new();
        let result = GameSession::new(SnakeSessionSettings::default(), 9, &store, SessionRng::new(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_not_started_session_does_not_tick() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        assert!(session.advance(Duration::from_secs(5)).is_empty());
        assert!(session.tick().is_none());
        assert_eq!(session.snapshot().snake, vec![START_POSITION]);
    }

    #[test]
    fn test_eat_normal_food_on_first_tick() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.start_new_game();
        place_food(&mut session, 1, 0, FoodType::Normal);

        let events = session.advance(TICK);

        assert_eq!(
            events,
            vec![SessionEvent::FoodEaten {
                food_type: FoodType::Normal,
                score: 1
            }]
        );
        let snapshot = session.snapshot();
        assert_eq!(snapshot.snake, vec![Point::new(1, 0), Point::new(0, 0)]);
        let food = snapshot.food.unwrap();
        assert!(!snapshot.snake.contains(&food.position));
    }

    #[test]
    fn test_wall_collision_ends_game_and_records_score() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.start_new_game();
        session.state.score = 4;
        place_food(&mut session, 10, 10, FoodType::Normal);
        assert!(session.set_direction(Direction::Up));

        let events = session.advance(TICK);

        assert_eq!(session.status(), SessionStatus::Over);
        assert_eq!(session.score(), 4);
        match events.as_slice() {
            [SessionEvent::GameOver(summary)] => {
                assert_eq!(summary.reason, DeathReason::WallCollision);
                assert_eq!(summary.score, 4);
                assert!(summary.leaderboard.new_high_score);
            }
            other => panic!("unexpected events {:?}", other),
        }
        assert_eq!(
            session.leaderboard().entries(),
            &[LeaderboardEntry {
                name: DEFAULT_PLAYER_NAME.to_string(),
                score: 4
            }]
        );
        assert!(store.get(LEADERBOARD_KEY).unwrap().is_some());
        assert_eq!(store.get(HIGHEST_SCORE_KEY).unwrap(), Some("4\n".to_string()));
    }

    #[test]
    fn test_over_session_ignores_time_and_pause() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.start_new_game();
        session.set_direction(Direction::Up);
        session.advance(TICK);
        assert_eq!(session.status(), SessionStatus::Over);

        assert!(!session.toggle_pause());
        assert!(session.advance(Duration::from_secs(3)).is_empty());
        assert_eq!(session.leaderboard().entries().len(), 1);
    }

    #[test]
    fn test_bomb_halves_score() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.start_new_game();
        session.state.score = 7;
        place_food(&mut session, 1, 0, FoodType::Bomb);

        session.advance(TICK);

        assert_eq!(session.score(), 3);
    }

    #[test]
    fn test_reverse_direction_is_ignored() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.start_new_game();

        assert!(!session.set_direction(Direction::Left));
        assert_eq!(session.direction(), Direction::Right);
    }

    #[test]
    fn test_pause_toggle_only_between_running_and_paused() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        assert!(!session.toggle_pause());
        assert_eq!(session.status(), SessionStatus::NotStarted);

        session.start_new_game();
        assert!(session.toggle_pause());
        assert_eq!(session.status(), SessionStatus::Paused);
        assert!(session.toggle_pause());
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_pause_freezes_ticks_and_countdown() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.start_new_game();
        place_food(&mut session, 10, 10, FoodType::Bonus);

        session.advance(Duration::from_millis(150));
        session.toggle_pause();
        session.advance(Duration::from_secs(10));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.snake, vec![START_POSITION]);
        assert_eq!(snapshot.special_time_left, Some(Duration::from_millis(4900)));

        session.toggle_pause();
        session.advance(Duration::from_millis(50));
        assert_eq!(session.snapshot().snake, vec![Point::new(1, 0)]);
    }

    #[test]
    fn test_special_food_expires_after_lifetime() {
        let store = MemoryKeyValueStore::new();
        // Ticks at 300ms never coincide with the 5000ms expiry.
        let settings = SnakeSessionSettings {
            tick_interval_ms: 300,
            ..Default::default()
        };
        let mut session = GameSession::new(settings, 1, &store, SessionRng::new(42)).unwrap();
        session.start_new_game();
        place_food(&mut session, 19, 19, FoodType::Bonus);
        session.set_direction(Direction::Down);

        let events = session.advance(Duration::from_millis(4900));
        assert!(events.is_empty());
        assert!(session.snapshot().food_blinking);

        let events = session.advance(Duration::from_millis(100));
        assert_eq!(
            events,
            vec![SessionEvent::FoodExpired {
                expired: FoodType::Bonus,
                next: FoodType::Normal
            }]
        );
        assert_eq!(session.snapshot().snake, vec![Point::new(0, 16)]);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.food.map(|f| f.food_type), Some(FoodType::Normal));
        assert_eq!(snapshot.special_time_left, None);
        assert!(!snapshot.food_blinking);
    }

    #[test]
    fn test_start_new_game_resets_everything_but_level() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.set_level(3);
        session.start_new_game();
        session.state.score = 9;
        session.set_direction(Direction::Down);
        session.advance(TICK * 3);

        session.start_new_game();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Running);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.snake, vec![START_POSITION]);
        assert_eq!(snapshot.direction, START_DIRECTION);
        assert_eq!(snapshot.level, 3);
        assert_eq!(snapshot.hurdles.len(), 6);
        assert_eq!(snapshot.food.map(|f| f.food_type), Some(FoodType::Normal));
    }

    #[test]
    fn test_level_change_keeps_snake_and_score() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.start_new_game();
        session.state.score = 6;
        place_food(&mut session, 15, 15, FoodType::Normal);
        session.advance(TICK * 2);

        session.handle_input(InputEvent::SetLevel(2));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.level, 2);
        assert_eq!(snapshot.score, 6);
        assert_eq!(snapshot.snake, vec![Point::new(2, 0)]);
        assert_eq!(
            snapshot.hurdles,
            vec![Point::new(10, 10), Point::new(10, 11), Point::new(10, 12)]
        );
        assert!(!snapshot.hurdles.contains(&snapshot.food.unwrap().position));
    }

    #[test]
    fn test_unknown_level_is_ignored() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        session.set_level(7);
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_player_name_is_trimmed() {
        let store = MemoryKeyValueStore::new();
        let mut session = create_session(&store);
        assert!(session.set_player_name("  Nagini "));
        assert_eq!(session.player_name(), "Nagini");
        assert!(!session.set_player_name("   "));
        assert_eq!(session.player_name(), "Nagini");
    }

    #[test]
    fn test_leaderboard_persists_across_sessions() {
        let store = MemoryKeyValueStore::new();
        {
            let mut session = create_session(&store);
            session.set_player_name("ana");
            session.start_new_game();
            session.state.score = 8;
            session.set_direction(Direction::Up);
            session.advance(TICK);
        }

        let mut session = create_session(&store);
        assert_eq!(session.leaderboard().highest_score(), 8);
        session.set_player_name("bo");
        session.start_new_game();
        session.set_direction(Direction::Up);
        let events = session.advance(TICK);

        match events.as_slice() {
            [SessionEvent::GameOver(summary)] => {
                assert!(!summary.leaderboard.new_high_score);
                assert_eq!(summary.leaderboard.highest_score, 8);
            }
            other => panic!("unexpected events {:?}", other),
        }
        let scores: Vec<u32> = session.leaderboard().entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![8, 0]);
    }

    #[test]
    fn test_running_head_stays_in_bounds() {
        let store = MemoryKeyValueStore::new();
        let mut session =
            GameSession::new(SnakeSessionSettings::default(), 5, &store, SessionRng::new(7)).unwrap();
        let turns = [Direction::Down, Direction::Right, Direction::Up, Direction::Left];

        for round in 0..20 {
            session.start_new_game();
            for step in 0..200 {
                if step % 7 == 0 {
                    session.set_direction(turns[(round + step / 7) % turns.len()]);
                }
                let before = session.snapshot().snake.len();
                let event = session.tick();
                if session.status() != SessionStatus::Running {
                    break;
                }
                let snapshot = session.snapshot();
                let head = snapshot.snake[0];
                assert!(session.state().field_size.contains(head));
                assert!(!snapshot.hurdles.contains(&head));
                match event {
                    Some(SessionEvent::FoodEaten { .. }) => assert_eq!(snapshot.snake.len(), before + 1),
                    _ => assert_eq!(snapshot.snake.len(), before),
                }
            }
        }

        let entries = session.leaderboard().entries();
        assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
