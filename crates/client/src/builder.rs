//! Client builder: content loading and runtime assembly.

use anyhow::{Context, Result};
use fight_content::{ConfigLoader, ContentFactory, Roster};
use fight_core::{GameConfig, PlayerId};
use runtime::{CpuProvider, Runtime, RuntimeConfig, match_setup};

use crate::{Client, ClientConfig};

/// Builder for constructing a [`Client`] from a [`ClientConfig`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    roster: Option<Roster>,
    rules: Option<GameConfig>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this roster instead of loading one.
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Use these rules instead of loading them.
    pub fn rules(mut self, rules: GameConfig) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Load content, spawn the runtime and attach a CPU to each side.
    pub async fn build(self) -> Result<Client> {
        let config = self.config;
        let (roster, rules) = load_content(&config, self.roster, self.rules)?;
        tracing::info!(
            characters = roster.len(),
            round_ticks = rules.round_ticks,
            rounds_to_win = rules.rounds_to_win,
            "Content loaded"
        );

        let setup = match_setup(&roster, rules, &config.p1, &config.p2, config.mode)
            .with_context(|| format!("Cannot set up {} vs {}", config.p1, config.p2))?;

        let runtime_config = RuntimeConfig {
            tick_rate: setup.config.tick_rate,
            realtime: config.realtime,
            ..RuntimeConfig::default()
        };

        let mut builder = Runtime::builder().config(runtime_config).setup(setup.clone());
        for player in PlayerId::ALL {
            let character = setup.characters[player.index()].clone();
            let cpu = CpuProvider::new(character).with_patience(config.patience[player.index()]);
            builder = builder.provider(player, cpu);
        }
        let runtime = builder.build().await.context("Failed to start the runtime")?;

        tracing::info!(
            p1 = %config.p1,
            p2 = %config.p2,
            mode = %config.mode,
            realtime = config.realtime,
            "Runtime built"
        );

        Ok(Client {
            runtime,
            max_ticks: config.max_ticks,
        })
    }
}

fn load_content(
    config: &ClientConfig,
    roster: Option<Roster>,
    rules: Option<GameConfig>,
) -> Result<(Roster, GameConfig)> {
    let factory = config.data_dir.as_deref().map(ContentFactory::new);

    let roster = match (roster, &factory) {
        (Some(roster), _) => roster,
        (None, Some(factory)) => factory.load_roster().with_context(|| {
            format!("Failed to load characters from {}", factory.data_dir().display())
        })?,
        (None, None) => Roster::builtin().context("Built-in roster is invalid")?,
    };

    let rules = match (rules, &config.rules_path, &factory) {
        (Some(rules), _, _) => rules,
        (None, Some(path), _) => ConfigLoader::load(path)?,
        (None, None, Some(factory)) => factory.load_config().with_context(|| {
            format!("Failed to load rules from {}", factory.data_dir().display())
        })?,
        (None, None, None) => GameConfig::default(),
    };

    Ok((roster, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fight_core::MatchMode;

    fn quick_config() -> ClientConfig {
        ClientConfig {
            max_ticks: 5_000,
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn builtin_cpu_match_runs_and_verifies() {
        let client = Client::builder()
            .config(quick_config())
            .rules(GameConfig::default().with_round_ticks(600))
            .build()
            .await
            .unwrap();

        let summary = client.run().await.unwrap();

        assert_eq!(summary.mode, MatchMode::Versus);
        assert!(summary.ticks <= 600);
        assert!(summary.inputs > 0);
        assert!(summary.result.is_some());
        assert_eq!(summary.digest.len(), 64);
    }

    #[tokio::test]
    async fn training_stops_at_the_tick_limit() {
        let config = ClientConfig {
            mode: MatchMode::Training,
            max_ticks: 120,
            ..ClientConfig::default()
        };
        let client = Client::builder().config(config).build().await.unwrap();

        let summary = client.run().await.unwrap();

        assert_eq!(summary.ticks, 120);
        assert_eq!(summary.result, None);
    }

    #[tokio::test]
    async fn unknown_character_fails_to_build() {
        let config = ClientConfig {
            p2: "zara".to_owned(),
            ..quick_config()
        };
        let err = Client::builder().config(config).build().await.err().unwrap();
        assert!(format!("{err:#}").contains("zara"));
    }

    #[tokio::test]
    async fn data_dir_without_characters_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..quick_config()
        };
        assert!(Client::builder().config(config).build().await.is_err());
    }

    #[tokio::test]
    async fn rules_file_overrides_the_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "round_ticks = 90\n").unwrap();
        let config = ClientConfig {
            rules_path: Some(path),
            ..quick_config()
        };

        let summary = Client::builder().config(config).build().await.unwrap().run().await.unwrap();

        assert!(summary.ticks <= 90);
        assert!(summary.result.is_some());
    }

    #[tokio::test]
    async fn realtime_summary_matches_its_replay() {
        let mut rules = GameConfig::default();
        rules.tick_rate = 1000;
        let config = ClientConfig {
            mode: MatchMode::Training,
            max_ticks: 200,
            realtime: true,
            ..ClientConfig::default()
        };
        let client = Client::builder().config(config).rules(rules).build().await.unwrap();

        let summary = tokio::time::timeout(std::time::Duration::from_secs(10), client.run())
            .await
            .expect("realtime match finishes")
            .unwrap();

        assert!(summary.ticks >= 200);
        assert_eq!(summary.result, None);
        assert_eq!(summary.digest.len(), 64);
    }
}
