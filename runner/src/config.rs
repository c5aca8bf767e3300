use serde::{Deserialize, Serialize};
use slytherin_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use slytherin_common::games::snake::{
    is_valid_level, SnakeSessionSettings, DEFAULT_PLAYER_NAME, MAX_LEVEL, MIN_LEVEL,
};

pub const DEFAULT_CONFIG_FILE: &str = "slytherin.yaml";

pub fn get_config_manager(
    file_path: &str,
) -> ConfigManager<FileContentConfigProvider, RunnerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(file_path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerConfig {
    pub player_name: String,
    pub level: u8,
    /// Directory holding the leaderboard and highest score files.
    pub data_dir: String,
    pub snake: SnakeSessionSettings,
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.player_name.trim().is_empty() {
            return Err("player_name must not be blank".to_string());
        }
        if !is_valid_level(self.level) {
            return Err(format!(
                "level must be between {} and {}",
                MIN_LEVEL, MAX_LEVEL
            ));
        }
        if self.data_dir.trim().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }
        self.snake.validate()?;
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            level: MIN_LEVEL,
            data_dir: "slytherin_data".to_string(),
            snake: SnakeSessionSettings::default(),
        }
    }
}
