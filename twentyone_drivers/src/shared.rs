use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: ConfigGame,
    pub simulator: ConfigSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigGame {
    pub starting_cash: u32,
}

impl Default for ConfigGame {
    fn default() -> Self {
        ConfigGame {
            starting_cash: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSimulator {
    pub trial_count: u32,
}

impl Default for ConfigSimulator {
    fn default() -> Self {
        ConfigSimulator { trial_count: 5000 }
    }
}

pub fn parse_config(contents: &str) -> Result<Config, serde_yaml::Error> {
    serde_yaml::from_str(contents)
}

/// Reads the content of a given config file and parses it to a Config.
///
/// Panics if any error occurs.
pub fn parse_config_from_file(filename: &str) -> Config {
    let file_content = fs::read_to_string(filename).unwrap();
    parse_config(&file_content).unwrap()
}
