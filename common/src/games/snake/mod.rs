mod clock;
mod food;
mod game_state;
mod leaderboard;
mod levels;
mod session;
mod settings;
mod snake;
mod types;

pub use clock::SimulationClock;
pub use food::{FoodSpawner, SpecialFoodTimer, free_cells};
pub use game_state::{CountdownOutcome, SnakeGameState, TickOutcome};
pub use leaderboard::{
    HIGHEST_SCORE_KEY, LEADERBOARD_DISPLAY_SIZE, LEADERBOARD_KEY, Leaderboard, LeaderboardEntry,
    LeaderboardUpdate, display_name, ordinal_label,
};
pub use levels::{MAX_LEVEL, MIN_LEVEL, is_valid_level, level_hurdles};
pub use session::{
    DEFAULT_PLAYER_NAME, GameOverSummary, GameSession, InputEvent, START_DIRECTION,
    START_POSITION, SessionEvent, SessionSnapshot,
};
pub use settings::{FoodWeights, SnakeSessionSettings, SpecialFoodTiming};
pub use snake::Snake;
pub use types::{DeathReason, Direction, FieldSize, Food, FoodType, Point, SessionStatus};
