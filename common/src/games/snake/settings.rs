use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::types::FieldSize;

/// Relative odds of each food type when the next item is drawn at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodWeights {
    pub normal: u32,
    pub bonus: u32,
    pub bomb: u32,
}

impl FoodWeights {
    /// `None` when the weights do not fit in a `u32` sum.
    pub fn total(&self) -> Option<u32> {
        self.normal.checked_add(self.bonus)?.checked_add(self.bomb)
    }
}

impl Default for FoodWeights {
    fn default() -> Self {
        Self {
            normal: 70,
            bonus: 15,
            bomb: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialFoodTiming {
    pub lifetime: Duration,
    pub resolution: Duration,
    pub blink_threshold: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSessionSettings {
    pub field_width: usize,
    pub field_height: usize,
    pub tick_interval_ms: u64,
    pub special_food_lifetime_ms: u64,
    pub countdown_resolution_ms: u64,
    pub blink_threshold_ms: u64,
    pub food_weights: FoodWeights,
}

impl SnakeSessionSettings {
    pub fn field_size(&self) -> FieldSize {
        FieldSize::new(self.field_width, self.field_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn countdown_resolution(&self) -> Duration {
        Duration::from_millis(self.countdown_resolution_ms)
    }

    pub fn special_food_timing(&self) -> SpecialFoodTiming {
        SpecialFoodTiming {
            lifetime: Duration::from_millis(self.special_food_lifetime_ms),
            resolution: self.countdown_resolution(),
            blink_threshold: Duration::from_millis(self.blink_threshold_ms),
        }
    }
}

impl Default for SnakeSessionSettings {
    fn default() -> Self {
        Self {
            field_width: 20,
            field_height: 20,
            tick_interval_ms: 200,
            special_food_lifetime_ms: 5000,
            countdown_resolution_ms: 100,
            blink_threshold_ms: 800,
            food_weights: FoodWeights::default(),
        }
    }
}

impl Validate for SnakeSessionSettings {
    fn validate(&self) -> Result<(), String> {
        if self.field_width < 10 || self.field_width > 100 {
            return Err("Field width must be between 10 and 100".to_string());
        }
        if self.field_height < 10 || self.field_height > 100 {
            return Err("Field height must be between 10 and 100".to_string());
        }
        if self.tick_interval_ms < 50 || self.tick_interval_ms > 5000 {
            return Err("Tick interval must be between 50ms and 5000ms".to_string());
        }
        if self.countdown_resolution_ms < 10 || self.countdown_resolution_ms > 1000 {
            return Err("Countdown resolution must be between 10ms and 1000ms".to_string());
        }
        if self.special_food_lifetime_ms < self.countdown_resolution_ms
            || self.special_food_lifetime_ms > 60_000
        {
            return Err(
                "Special food lifetime must be between the countdown resolution and 60000ms"
                    .to_string(),
            );
        }
        if self.special_food_lifetime_ms % self.countdown_resolution_ms != 0 {
            return Err(
                "Special food lifetime must be a multiple of the countdown resolution".to_string(),
            );
        }
        if self.blink_threshold_ms > self.special_food_lifetime_ms {
            return Err("Blink threshold cannot exceed the special food lifetime".to_string());
        }
        match self.food_weights.total() {
            None => return Err("Food weights are too large".to_string()),
            Some(0) => return Err("At least one food weight must be positive".to_string()),
            Some(_) => {}
        }
        Ok(())
    }
}
