use std::collections::HashSet;
use std::time::Duration;

use crate::games::SessionRng;
use super::settings::{FoodWeights, SpecialFoodTiming};
use super::snake::Snake;
use super::types::{FieldSize, Food, FoodType, Point};

/// Countdown attached to a bonus or bomb item. It steps at a fixed resolution
/// and expires when the remaining time reaches zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialFoodTimer {
    food_type: FoodType,
    remaining: Duration,
    since_last_step: Duration,
    resolution: Duration,
    blink_threshold: Duration,
}

impl SpecialFoodTimer {
    pub fn new(food_type: FoodType, timing: &SpecialFoodTiming) -> Self {
        Self {
            food_type,
            remaining: timing.lifetime,
            since_last_step: Duration::ZERO,
            resolution: timing.resolution,
            blink_threshold: timing.blink_threshold,
        }
    }

    pub fn food_type(&self) -> FoodType {
        self.food_type
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_blinking(&self) -> bool {
        self.remaining <= self.blink_threshold
    }

    pub fn time_to_next_step(&self) -> Duration {
        self.resolution.saturating_sub(self.since_last_step)
    }

    pub fn elapse(&mut self, elapsed: Duration) {
        self.since_last_step = (self.since_last_step + elapsed).min(self.resolution);
    }

    pub fn is_step_due(&self) -> bool {
        self.since_last_step >= self.resolution
    }

    /// Consumes one countdown step. Returns true once the item has expired.
    pub fn step(&mut self) -> bool {
        self.since_last_step = Duration::ZERO;
        self.remaining = self.remaining.saturating_sub(self.resolution);
        self.remaining.is_zero()
    }
}

#[derive(Clone, Debug)]
pub struct FoodSpawner {
    weights: FoodWeights,
    timing: SpecialFoodTiming,
}

impl FoodSpawner {
    pub fn new(weights: FoodWeights, timing: SpecialFoodTiming) -> Self {
        Self { weights, timing }
    }

    pub fn pick_weighted_type(&self, rng: &mut SessionRng) -> FoodType {
        let total = match self.weights.total() {
            Some(total) if total > 0 => total,
            _ => return FoodType::Normal,
        };

        let roll = rng.random_range(0..total);
        if roll < self.weights.normal {
            FoodType::Normal
        } else if roll < self.weights.normal + self.weights.bonus {
            FoodType::Bonus
        } else {
            FoodType::Bomb
        }
    }

    /// A special item that timed out is always followed by a normal one.
    pub fn next_type_after_expiry(&self, expired: FoodType, rng: &mut SessionRng) -> FoodType {
        match expired {
            FoodType::Bonus | FoodType::Bomb => FoodType::Normal,
            FoodType::Normal => self.pick_weighted_type(rng),
        }
    }

    /// Places `food_type` on a uniformly chosen free cell. Returns `None` when
    /// the snake and hurdles cover the whole field.
    pub fn spawn(
        &self,
        food_type: FoodType,
        field_size: &FieldSize,
        snake: &Snake,
        hurdles: &HashSet<Point>,
        rng: &mut SessionRng,
    ) -> Option<(Food, Option<SpecialFoodTimer>)> {
        let candidates = free_cells(field_size, snake, hurdles);
        let position = *rng.choose(&candidates)?;

        let timer = food_type
            .is_special()
            .then(|| SpecialFoodTimer::new(food_type, &self.timing));

        Some((Food { position, food_type }, timer))
    }
}

pub fn free_cells(field_size: &FieldSize, snake: &Snake, hurdles: &HashSet<Point>) -> Vec<Point> {
    field_size
        .cells()
        .filter(|cell| !snake.contains(*cell) && !hurdles.contains(cell))
        .collect()
}
