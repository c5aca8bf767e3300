use std::collections::HashSet;
use std::time::Duration;

use crate::log;
use crate::games::SessionRng;
use super::food::{FoodSpawner, SpecialFoodTimer};
use super::snake::Snake;
use super::types::{DeathReason, Direction, FieldSize, Food, FoodType, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate { food_type: FoodType, score: u32 },
    GameOver(DeathReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownOutcome {
    Idle,
    Counting { remaining: Duration },
    Expired { expired: FoodType, next: Food },
    BoardFull,
}

#[derive(Clone, Debug)]
pub struct SnakeGameState {
    pub field_size: FieldSize,
    pub snake: Snake,
    pub food: Option<Food>,
    pub special_timer: Option<SpecialFoodTimer>,
    pub hurdles: HashSet<Point>,
    pub score: u32,
    spawner: FoodSpawner,
}

impl SnakeGameState {
    /// A board without food. Callers place the first item with
    /// [`SnakeGameState::respawn_food`].
    pub fn new(
        field_size: FieldSize,
        snake: Snake,
        hurdles: HashSet<Point>,
        spawner: FoodSpawner,
    ) -> Self {
        Self {
            field_size,
            snake,
            food: None,
            special_timer: None,
            hurdles,
            score: 0,
            spawner,
        }
    }

    pub fn set_snake_direction(&mut self, direction: Direction) -> bool {
        self.snake.steer(direction)
    }

    /// Replaces the current item (cancelling any countdown) with a new one of
    /// `food_type`.
    pub fn respawn_food(
        &mut self,
        food_type: FoodType,
        rng: &mut SessionRng,
    ) -> Result<Food, DeathReason> {
        self.special_timer = None;
        self.food = None;

        let (food, timer) = self
            .spawner
            .spawn(food_type, &self.field_size, &self.snake, &self.hurdles, rng)
            .ok_or(DeathReason::BoardFull)?;

        self.food = Some(food);
        self.special_timer = timer;
        Ok(food)
    }

    pub fn update(&mut self, rng: &mut SessionRng) -> TickOutcome {
        self.snake.apply_pending_direction();

        let next_head = match self.check_next_head() {
            Ok(next_head) => next_head,
            Err(reason) => return TickOutcome::GameOver(reason),
        };

        self.snake.push_head(next_head);

        let eaten = self.food.filter(|food| food.position == next_head);
        let Some(food) = eaten else {
            self.snake.pop_tail();
            return TickOutcome::Moved;
        };

        self.score = food.food_type.apply_to_score(self.score);
        log!(
            "Ate {:?} at ({}, {}). Score: {}",
            food.food_type,
            next_head.x,
            next_head.y,
            self.score
        );

        let next_type = self.spawner.pick_weighted_type(rng);
        if let Err(reason) = self.respawn_food(next_type, rng) {
            return TickOutcome::GameOver(reason);
        }

        TickOutcome::Ate {
            food_type: food.food_type,
            score: self.score,
        }
    }

    fn check_next_head(&self) -> Result<Point, DeathReason> {
        let next_head = self.snake.head().moved(self.snake.direction);

        if !self.field_size.contains(next_head) {
            return Err(DeathReason::WallCollision);
        }
        if self.hurdles.contains(&next_head) {
            return Err(DeathReason::HurdleCollision);
        }
        // The tail has not moved yet, so it still counts as occupied.
        if self.snake.contains(next_head) {
            return Err(DeathReason::SelfCollision);
        }

        Ok(next_head)
    }

    pub fn time_to_next_countdown_step(&self) -> Option<Duration> {
        self.special_timer.as_ref().map(SpecialFoodTimer::time_to_next_step)
    }

    pub fn elapse_special_timer(&mut self, elapsed: Duration) {
        if let Some(timer) = self.special_timer.as_mut() {
            timer.elapse(elapsed);
        }
    }

    /// Runs the countdown step if one is due, respawning the item on expiry.
    pub fn run_due_countdown_step(&mut self, rng: &mut SessionRng) -> CountdownOutcome {
        let Some(timer) = self.special_timer.as_mut() else {
            return CountdownOutcome::Idle;
        };
        if !timer.is_step_due() {
            return CountdownOutcome::Idle;
        }
        if !timer.step() {
            return CountdownOutcome::Counting {
                remaining: timer.remaining(),
            };
        }

        let expired = timer.food_type();
        let next_type = self.spawner.next_type_after_expiry(expired, rng);
        match self.respawn_food(next_type, rng) {
            Ok(next) => CountdownOutcome::Expired { expired, next },
            Err(_) => CountdownOutcome::BoardFull,
        }
    }

    /// Swaps in a new hurdle set. Returns the snake cells that now overlap a
    /// hurdle; the snake itself is left where it is.
    pub fn replace_hurdles(
        &mut self,
        hurdles: HashSet<Point>,
        rng: &mut SessionRng,
    ) -> Result<Vec<Point>, DeathReason> {
        self.hurdles = hurdles;

        if let Some(food) = self.food
            && self.hurdles.contains(&food.position)
        {
            log!(
                "Food at ({}, {}) is under a hurdle, respawning",
                food.position.x,
                food.position.y
            );
            self.respawn_food(FoodType::Normal, rng)?;
        }

        let mut overlap: Vec<Point> = self
            .snake
            .body
            .iter()
            .copied()
            .filter(|p| self.hurdles.contains(p))
            .collect();
        overlap.sort_by_key(|p| (p.y, p.x));
        Ok(overlap)
    }

    pub fn is_blinking(&self) -> bool {
        self.special_timer
            .as_ref()
            .is_some_and(SpecialFoodTimer::is_blinking)
    }
}
