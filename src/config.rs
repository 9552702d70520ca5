use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where new rules take their default settings from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateProvider {
    /// Process-wide defaults from [`TemplateConfig`].
    #[default]
    Internal,
    /// Template rules stored on the backend, matched by category.
    Backend,
}

impl FromStr for TemplateProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "internal" => Ok(TemplateProvider::Internal),
            "backend" | "mythtv" => Ok(TemplateProvider::Backend),
            other => Err(format!("unknown template provider: {other}")),
        }
    }
}

/// Defaults applied by `new_from_template` when no backend template is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub provider: TemplateProvider,
    pub auto_commflag: bool,
    pub auto_metadata: bool,
    pub auto_transcode: bool,
    pub user_jobs: [bool; 4],
    pub transcoder: u32,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            provider: TemplateProvider::Internal,
            auto_commflag: true,
            auto_metadata: true,
            auto_transcode: false,
            user_jobs: [false; 4],
            transcoder: 0,
        }
    }
}

/// Channel substituted into rules that would otherwise carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DummyChannel {
    pub chan_id: u32,
    pub callsign: String,
}

impl Default for DummyChannel {
    fn default() -> Self {
        Self { chan_id: 1000, callsign: "DUMMY".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub template: TemplateConfig,
    /// Also list instances superseded by another showing.
    pub show_not_recording: bool,
    /// Non-repeating rules with no activity newer than this are hidden.
    pub stale_rule_window_secs: i64,
    pub dummy_channel: DummyChannel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template: TemplateConfig::default(),
            show_not_recording: false,
            stale_rule_window_secs: 24 * 3600,
            dummy_channel: DummyChannel::default(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    /// Read `DVRSYNC_*` variables, falling back to defaults for anything
    /// missing or unparsable.
    pub fn from_env() -> Self {
        let d = EngineConfig::default();
        let template = TemplateConfig {
            provider: env_or("DVRSYNC_TEMPLATE_PROVIDER", d.template.provider),
            auto_commflag: env_or("DVRSYNC_AUTO_COMMFLAG", d.template.auto_commflag),
            auto_metadata: env_or("DVRSYNC_AUTO_METADATA", d.template.auto_metadata),
            auto_transcode: env_or("DVRSYNC_AUTO_TRANSCODE", d.template.auto_transcode),
            user_jobs: [
                env_or("DVRSYNC_USER_JOB1", d.template.user_jobs[0]),
                env_or("DVRSYNC_USER_JOB2", d.template.user_jobs[1]),
                env_or("DVRSYNC_USER_JOB3", d.template.user_jobs[2]),
                env_or("DVRSYNC_USER_JOB4", d.template.user_jobs[3]),
            ],
            transcoder: env_or("DVRSYNC_TRANSCODER", d.template.transcoder),
        };
        let stale_hours: i64 = env_or("DVRSYNC_STALE_RULE_HOURS", d.stale_rule_window_secs / 3600);
        Self {
            template,
            show_not_recording: env_or("DVRSYNC_SHOW_NOT_RECORDING", d.show_not_recording),
            stale_rule_window_secs: stale_hours * 3600,
            dummy_channel: DummyChannel {
                chan_id: env_or("DVRSYNC_DUMMY_CHANNEL_ID", d.dummy_channel.chan_id),
                callsign: std::env::var("DVRSYNC_DUMMY_CALLSIGN").unwrap_or(d.dummy_channel.callsign),
            },
        }
    }
}
