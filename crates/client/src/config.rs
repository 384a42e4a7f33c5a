//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use fight_core::MatchMode;

/// Everything the client needs to assemble and run one match.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Content directory holding `config.toml` and `characters/`. The
    /// built-in roster and default rules are used when unset.
    pub data_dir: Option<PathBuf>,
    /// Rules file overriding `config.toml` from the data directory.
    pub rules_path: Option<PathBuf>,
    pub p1: String,
    pub p2: String,
    pub mode: MatchMode,
    /// Hard stop for matches that never end on their own (training mode).
    pub max_ticks: u64,
    /// Tick on the wall clock instead of stepping as fast as possible.
    pub realtime: bool,
    /// CPU reaction delay for each side, in ticks.
    pub patience: [u64; 2],
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            rules_path: None,
            p1: "mia".to_owned(),
            p2: "mia".to_owned(),
            mode: MatchMode::Versus,
            max_ticks: 60 * 60 * 10,
            realtime: false,
            patience: [12, 17],
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `FIGHT_DATA_DIR` - Content directory (default: built-in roster)
    /// - `FIGHT_CONFIG` - Match rules TOML file (default: data dir or built-in)
    /// - `FIGHT_P1` / `FIGHT_P2` - Character ids (default: mia)
    /// - `FIGHT_MODE` - `versus` or `training` (default: versus)
    /// - `FIGHT_MAX_TICKS` - Tick limit (default: 36000)
    /// - `FIGHT_REALTIME` - Run at the configured tick rate (default: false)
    /// - `FIGHT_P1_PATIENCE` / `FIGHT_P2_PATIENCE` - CPU strike interval
    /// - `FIGHT_LOG_DIR` - Also write logs to `<dir>/fight.log`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.data_dir = env::var("FIGHT_DATA_DIR").ok().map(PathBuf::from);
        config.rules_path = env::var("FIGHT_CONFIG").ok().map(PathBuf::from);

        if let Ok(id) = env::var("FIGHT_P1") {
            config.p1 = id;
        }
        if let Ok(id) = env::var("FIGHT_P2") {
            config.p2 = id;
        }

        if let Some(mode) = read_env::<MatchMode>("FIGHT_MODE") {
            config.mode = mode;
        }

        if let Some(max_ticks) = read_env::<u64>("FIGHT_MAX_TICKS") {
            config.max_ticks = max_ticks.max(1);
        }

        if let Some(realtime) = read_env::<bool>("FIGHT_REALTIME") {
            config.realtime = realtime;
        } else if env::var("FIGHT_REALTIME").is_ok() {
            // Bare `FIGHT_REALTIME=` counts as enabled.
            config.realtime = true;
        }

        if let Some(patience) = read_env::<u64>("FIGHT_P1_PATIENCE") {
            config.patience[0] = patience.max(1);
        }
        if let Some(patience) = read_env::<u64>("FIGHT_P2_PATIENCE") {
            config.patience[1] = patience.max(1);
        }

        config.log_dir = env::var("FIGHT_LOG_DIR").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
