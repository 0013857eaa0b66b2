use rocket::serde::json::serde_json;
use rocket::serde::{Deserialize, Serialize};
use std::fs;

/// Application configuration, extracted from Rocket's figment so every
/// field can be overridden through Rocket.toml or `ROCKET_*` variables.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_store_location")]
    pub store_location: String,
    #[serde(default = "default_username")]
    pub api_username: String,
    #[serde(default = "default_password")]
    pub api_password: String,
}

fn default_store_location() -> String {
    "tasks.json".to_string()
}

fn default_username() -> String {
    "miguel".to_string()
}

fn default_password() -> String {
    "python".to_string()
}

pub async fn read_file<T>(loc: &str) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(loc).ok()?;

    serde_json::from_str(&content).ok()
}
