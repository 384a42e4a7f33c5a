use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use fight_content::Roster;
use fight_core::{
    ActionKind, GameConfig, InputEvent, MatchEvent, MatchListener, MatchMode, MatchResult,
    MatchSetup, MatchState, MovementState, PlayerId, Tick,
};
use runtime::{
    ActionProvider, CpuProvider, Runtime, RuntimeConfig, RuntimeError, ScriptedProvider, Topic,
    match_setup, verify_replay,
};

/// Fails the test instead of hanging it.
async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(10), future)
        .await
        .expect("runtime call timed out")
}

fn setup_with(config: GameConfig) -> MatchSetup {
    let roster = Roster::builtin().expect("builtin roster loads");
    match_setup(&roster, config, "mia", "mia", MatchMode::Versus).expect("mia is in the roster")
}

fn close_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.spawn_x = [400.0, 480.0];
    config
}

async fn headless(setup: MatchSetup) -> Runtime {
    Runtime::builder()
        .config(RuntimeConfig::headless())
        .setup(setup)
        .build()
        .await
        .expect("runtime builds")
}

#[tokio::test]
async fn light_punch_is_published_on_the_combat_topic() {
    within(async {
        let runtime = headless(setup_with(close_config())).await;
        let handle = runtime.handle();
        let mut hits = handle.subscribe(Topic::Combat);
        let mut animation = handle.subscribe(Topic::Animation);

        handle.perform(PlayerId::One, "light_punch").await.unwrap();
        let reports = handle.step_n(5).await.unwrap();
        assert_eq!(reports.len(), 5);

        let hit = hits.recv().await.unwrap();
        assert_eq!(hit.tick, Tick(3));
        match hit.event {
            MatchEvent::Hit(outcome) => {
                assert_eq!(outcome.move_name, "light_punch");
                assert_eq!(outcome.damage_dealt, 5);
                assert!(!outcome.was_blocked);
            }
            other => panic!("unexpected event {other:?}"),
        }

        let first = animation.recv().await.unwrap();
        assert_eq!(
            first.event,
            MatchEvent::StateChanged {
                player: PlayerId::One,
                from: MovementState::Idle,
                to: MovementState::Attacking,
            }
        );

        let state = handle.snapshot().await.unwrap();
        assert_eq!(state.combatant(PlayerId::Two).health, 95);
        runtime.shutdown().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn rejected_commands_go_to_the_input_topic() {
    within(async {
        let runtime = headless(setup_with(GameConfig::default())).await;
        let handle = runtime.handle();
        let mut input = handle.subscribe(Topic::Input);

        handle.perform(PlayerId::Two, "shoryuken").await.unwrap();
        handle.step().await.unwrap();

        let event = input.recv().await.unwrap();
        assert!(matches!(
            event.event,
            MatchEvent::CommandRejected { player: PlayerId::Two, .. }
        ));
        runtime.shutdown().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn pause_freezes_the_clock() {
    within(async {
        let runtime = headless(setup_with(GameConfig::default())).await;
        let handle = runtime.handle();
        let mut flow = handle.subscribe(Topic::Match);

        handle.step_n(3).await.unwrap();
        assert!(handle.pause().await.unwrap());
        assert!(!handle.pause().await.unwrap());
        assert_eq!(flow.recv().await.unwrap().event, MatchEvent::Paused);

        let before = handle.snapshot().await.unwrap();
        let report = handle.step().await.unwrap();
        assert!(!report.advanced);
        assert_eq!(handle.snapshot().await.unwrap(), before);

        assert!(handle.resume().await.unwrap());
        assert_eq!(flow.recv().await.unwrap().event, MatchEvent::Resumed);
        handle.step().await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().tick, Tick(4));
        runtime.shutdown().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn scripted_special_costs_meter_in_training() {
    within(async {
        let roster = Roster::builtin().unwrap();
        let setup = match_setup(&roster, close_config(), "mia", "mia", MatchMode::Training).unwrap();
        let script = ScriptedProvider::new().motion(
            2u64,
            PlayerId::One,
            &[
                ActionKind::Down,
                ActionKind::DownForward,
                ActionKind::Forward,
                ActionKind::Punch,
            ],
        );
        let mut runtime = Runtime::builder()
            .config(RuntimeConfig::headless())
            .setup(setup)
            .provider(PlayerId::One, script)
            .build()
            .await
            .unwrap();
        let mut input = runtime.subscribe(Topic::Input);

        for _ in 0..3 {
            runtime.step().await.unwrap();
        }

        let recognized = input.recv().await.unwrap();
        assert_eq!(recognized.tick, Tick(2));
        assert_eq!(
            recognized.event,
            MatchEvent::SpecialRecognized {
                player: PlayerId::One,
                name: "tide_wave".to_owned(),
            }
        );
        let state = runtime.handle().snapshot().await.unwrap();
        assert_eq!(
            state.combatant(PlayerId::One).movement,
            MovementState::SpecialAttacking
        );
        runtime.shutdown().await.unwrap();
    })
    .await;
}

#[derive(Clone, Default)]
struct ResultSink(Arc<Mutex<Option<MatchResult>>>);

impl MatchListener for ResultSink {
    fn on_match_end(&mut self, result: MatchResult) {
        *self.0.lock().unwrap() = Some(result);
    }
}

#[tokio::test]
async fn cpu_match_finishes_and_replays() {
    within(async {
        let setup = setup_with(GameConfig::default().with_round_ticks(1200));
        let mia = setup.characters[0].clone();
        let sink = ResultSink::default();
        let mut runtime = Runtime::builder()
            .config(RuntimeConfig::headless())
            .setup(setup)
            .provider(PlayerId::One, CpuProvider::new(mia.clone()))
            .provider(PlayerId::Two, CpuProvider::new(mia).with_patience(17))
            .listener(sink.clone())
            .build()
            .await
            .unwrap();

        let state = runtime.run(10_000).await.unwrap();

        assert!(state.is_over());
        assert!(state.tick.0 <= 1200);
        assert_eq!(*sink.0.lock().unwrap(), state.result);
        assert!(!runtime.handle().input_log().await.unwrap().is_empty());

        let digest = runtime.verify_replay().await.unwrap();
        assert_eq!(digest, state.digest());
        runtime.shutdown().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn tampered_log_is_detected() {
    within(async {
        let setup = setup_with(close_config());
        let runtime = headless(setup.clone()).await;
        let handle = runtime.handle();
        handle.perform(PlayerId::One, "heavy_kick").await.unwrap();
        handle.step_n(30).await.unwrap();

        let state = handle.snapshot().await.unwrap();
        let empty = fight_core::InputLog::new();
        let err = verify_replay(&setup, &empty, &state).unwrap_err();
        assert!(matches!(err, RuntimeError::ReplayDiverged { tick: 30, .. }));
        runtime.shutdown().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn realtime_clock_ticks_by_itself() {
    within(async {
        let runtime = Runtime::builder()
            .config(RuntimeConfig {
                tick_rate: 500,
                ..RuntimeConfig::default()
            })
            .setup(setup_with(GameConfig::default()))
            .build()
            .await
            .unwrap();
        let handle = runtime.handle();

        tokio::time::sleep(Duration::from_millis(100)).await;

        let tick = handle.snapshot().await.unwrap().tick;
        assert!(tick.0 > 0);
        runtime.shutdown().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn builder_requires_setup_and_valid_config() {
    within(async {
        let missing = Runtime::builder().build().await;
        assert!(matches!(missing, Err(RuntimeError::MissingSetup)));

        let invalid = Runtime::builder()
            .config(RuntimeConfig {
                tick_rate: 0,
                ..RuntimeConfig::default()
            })
            .setup(setup_with(GameConfig::default()))
            .build()
            .await;
        assert!(matches!(invalid, Err(RuntimeError::InvalidConfig(_))));
    })
    .await;
}

#[tokio::test]
async fn unknown_character_is_a_content_error() {
    within(async {
        let roster = Roster::builtin().unwrap();
        let err = match_setup(&roster, GameConfig::default(), "mia", "zara", MatchMode::Versus)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Content(_)));
    })
    .await;
}

#[tokio::test]
async fn shutdown_stops_the_worker_while_handles_live() {
    within(async {
        let runtime = headless(setup_with(GameConfig::default())).await;
        let handle = runtime.handle();
        let spare = handle.clone();
        handle.step_n(2).await.unwrap();

        runtime.shutdown().await.unwrap();

        assert!(matches!(
            spare.snapshot().await,
            Err(RuntimeError::CommandChannelClosed)
        ));
        assert!(matches!(
            handle.perform(PlayerId::One, "light_punch").await,
            Err(RuntimeError::CommandChannelClosed)
        ));
    })
    .await;
}

#[tokio::test]
async fn realtime_match_verifies_while_the_clock_runs() {
    within(async {
        let mut config = GameConfig::default();
        config.tick_rate = 1000;
        let setup = setup_with(config);
        let mia = setup.characters[0].clone();
        let mut runtime = Runtime::builder()
            .config(RuntimeConfig {
                tick_rate: 1000,
                realtime: true,
                ..RuntimeConfig::default()
            })
            .setup(setup)
            .provider(PlayerId::One, CpuProvider::new(mia.clone()).with_patience(5))
            .provider(PlayerId::Two, CpuProvider::new(mia).with_patience(7))
            .build()
            .await
            .unwrap();

        let state = runtime.run(150).await.unwrap();
        assert!(state.is_over() || state.tick.0 >= 150);

        // The worker keeps ticking; every check sees a consistent pair.
        for _ in 0..5 {
            let (log, state) = runtime.handle().record().await.unwrap();
            let digest = verify_replay(runtime.setup(), &log, &state).unwrap();
            assert_eq!(digest, state.digest());
            runtime.verify_replay().await.unwrap();
            tokio::time::sleep(Duration::from_millis(3)).await;
        }
        runtime.shutdown().await.unwrap();
    })
    .await;
}

struct BrokenPad;

#[async_trait]
impl ActionProvider for BrokenPad {
    async fn provide_inputs(
        &self,
        _player: PlayerId,
        _state: &MatchState,
    ) -> runtime::Result<Vec<InputEvent>> {
        Err(RuntimeError::InvalidConfig("pad unplugged"))
    }
}

#[tokio::test]
async fn provider_errors_name_the_player() {
    within(async {
        let mut runtime = Runtime::builder()
            .config(RuntimeConfig::headless())
            .setup(setup_with(GameConfig::default()))
            .provider(PlayerId::Two, BrokenPad)
            .build()
            .await
            .unwrap();

        let err = runtime.step().await.unwrap_err();
        match err {
            RuntimeError::ProviderFailed { player, reason } => {
                assert_eq!(player, PlayerId::Two);
                assert!(reason.contains("pad unplugged"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        runtime.shutdown().await.unwrap();
    })
    .await;
}
