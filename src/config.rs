use std::net::IpAddr;

pub const DEFAULT_AI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub mock: MockConfig,
    pub ai: AiConfig,
}

/// Size and seed of the in-memory population created at startup.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub seed: Option<u64>,
    pub webhooks: usize,
    pub events: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            seed: None,
            webhooks: 15,
            events: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("HOOKBOARD_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid HOOKBOARD_HOST: {e}"))?;

        let port: u16 = env_or("HOOKBOARD_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid HOOKBOARD_PORT: {e}"))?;

        let log_level = env_or("HOOKBOARD_LOG_LEVEL", "info");

        let seed = match std::env::var("HOOKBOARD_SEED").ok() {
            Some(s) => Some(
                s.parse()
                    .map_err(|e| format!("Invalid HOOKBOARD_SEED: {e}"))?,
            ),
            None => None,
        };

        let webhooks: usize = env_or("HOOKBOARD_MOCK_WEBHOOKS", "15")
            .parse()
            .map_err(|e| format!("Invalid HOOKBOARD_MOCK_WEBHOOKS: {e}"))?;

        let events: usize = env_or("HOOKBOARD_MOCK_EVENTS", "50")
            .parse()
            .map_err(|e| format!("Invalid HOOKBOARD_MOCK_EVENTS: {e}"))?;

        let api_key = std::env::var("HOOKBOARD_AI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.is_empty());

        Ok(Config {
            host,
            port,
            log_level,
            mock: MockConfig {
                seed,
                webhooks,
                events,
            },
            ai: AiConfig {
                api_key,
                model: env_or("HOOKBOARD_AI_MODEL", DEFAULT_AI_MODEL),
                base_url: env_or("HOOKBOARD_AI_BASE_URL", DEFAULT_AI_BASE_URL),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
