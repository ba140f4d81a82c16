use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::session::DemoTiming;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AgentConfig {
    pub llm: Option<LLMConfig>,
    pub demo: Option<DemoConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LLMConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DemoConfig {
    pub splash_delay_ms: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub completion_delay_ms: Option<u64>,
    pub max_ticks: Option<u32>,
}

impl DemoConfig {
    /// Overlay configured values on the default timings.
    pub fn timing(&self) -> DemoTiming {
        let defaults = DemoTiming::default();
        DemoTiming {
            splash_delay: self.splash_delay_ms.map(Duration::from_millis).unwrap_or(defaults.splash_delay),
            tick_interval: self.tick_interval_ms.map(Duration::from_millis).unwrap_or(defaults.tick_interval),
            completion_delay: self.completion_delay_ms.map(Duration::from_millis).unwrap_or(defaults.completion_delay),
            max_ticks: self.max_ticks.unwrap_or(defaults.max_ticks),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
    pub max_sessions: Option<usize>,
    pub api_token: Option<String>,
    /// Sessions with no API access for this long are discarded.
    pub session_idle_ttl_secs: Option<u64>,
}

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 30 * 60;

impl AgentConfig {
    pub fn timing(&self) -> DemoTiming {
        self.demo.as_ref().map(DemoConfig::timing).unwrap_or_default()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.as_ref()
            .and_then(|s| s.max_upload_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn session_idle_ttl(&self) -> Duration {
        let secs = self.server.as_ref()
            .and_then(|s| s.session_idle_ttl_secs)
            .unwrap_or(DEFAULT_SESSION_IDLE_TTL_SECS);
        Duration::from_secs(secs)
    }
}
