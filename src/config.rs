//! Server configuration from environment variables

use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND: ([u8; 4], u16) = ([0, 0, 0, 0], 4287);
const DEFAULT_TICK_MS: u64 = 1000;
const DEFAULT_DISPLAY_COUNT: usize = 2;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Period of the turn clock driver; one tick is one game second
    pub tick_interval: Duration,
    /// Default for games that do not say whether to shuffle
    pub shuffle_hat: bool,
    /// Phrases shown to the guessing player at once
    pub display_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(DEFAULT_BIND),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            shuffle_hat: true,
            display_count: DEFAULT_DISPLAY_COUNT,
        }
    }
}

impl ServerConfig {
    /// Load from HATGAME_* variables, falling back to defaults on bad values
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match read_var("HATGAME_BIND") {
            Some(raw) => raw.parse::<SocketAddr>().unwrap_or_else(|e| {
                tracing::warn!(
                    "Invalid HATGAME_BIND '{}': {}, using {}",
                    raw,
                    e,
                    defaults.bind_addr
                );
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let tick_interval = match read_var("HATGAME_TICK_MS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    tracing::warn!(
                        "Invalid HATGAME_TICK_MS '{}', using {}ms",
                        raw,
                        DEFAULT_TICK_MS
                    );
                    defaults.tick_interval
                }
            },
            None => defaults.tick_interval,
        };

        let shuffle_hat = match read_var("HATGAME_SHUFFLE_HAT") {
            Some(raw) => match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    tracing::warn!("Invalid HATGAME_SHUFFLE_HAT '{}', shuffling", raw);
                    defaults.shuffle_hat
                }
            },
            None => defaults.shuffle_hat,
        };

        let display_count = match read_var("HATGAME_DISPLAY_COUNT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        "Invalid HATGAME_DISPLAY_COUNT '{}', using {}",
                        raw,
                        DEFAULT_DISPLAY_COUNT
                    );
                    defaults.display_count
                }
            },
            None => defaults.display_count,
        };

        Self {
            bind_addr,
            tick_interval,
            shuffle_hat,
            display_count,
        }
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
