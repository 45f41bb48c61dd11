//! End-to-end session tests: load a run file, time attempts, persist the result.

use speedrun_timer::{
    Intent, MachineState, ManualClock, Run, Session, Split, TimeMachine, TimeSpan, TimerConfig,
    TimingEvent,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ms(millis: i64) -> TimeSpan {
    TimeSpan::from_millis(millis)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("speedrun-timer-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn two_splits() -> Vec<Split> {
    vec![
        Split::with_times("Fake Split 1", ms(154_500), ms(153_983)),
        Split::with_times("Fake Split 2", ms(400_000), ms(398_000)),
    ]
}

#[test]
fn test_three_splits_walk_to_finished() {
    init_logging();
    let clock = ManualClock::new();
    let mut machine = TimeMachine::new(two_splits(), clock.shared());

    machine.apply(Intent::Split);
    assert!(machine.timer().is_running());
    assert_eq!(machine.current_split_index(), 0);

    clock.advance_millis(120_000);
    machine.apply(Intent::Split);
    assert!(machine.timer().is_running());
    assert_eq!(machine.current_split_index(), 1);
    assert_eq!(machine.splits()[0].active_run_time, ms(120_000));

    clock.advance_millis(200_000);
    machine.apply(Intent::Split);
    assert!(machine.timer().is_stopped());
    assert_eq!(machine.current_split_index(), 2);
    assert_eq!(machine.state(), MachineState::Finished);
}

#[test]
fn test_double_pause_banks_paused_interval() {
    init_logging();
    let clock = ManualClock::new();
    let mut machine = TimeMachine::new(two_splits(), clock.shared());

    machine.apply(Intent::Split);
    clock.advance_millis(3_000);
    assert_eq!(machine.apply(Intent::Pause), TimingEvent::Paused);
    clock.advance_millis(60_000);
    assert_eq!(machine.apply(Intent::Pause), TimingEvent::Resumed);

    assert!(machine.timer().is_running());
    assert_eq!(machine.timer().ballast(), Duration::from_millis(3_000));
    assert_eq!(machine.timer().milliseconds(), 3_000);

    clock.advance_millis(500);
    assert_eq!(machine.timer().milliseconds(), 3_500);
}

#[test]
fn test_stop_after_finish_resets_regardless_of_pb() {
    init_logging();
    for final_split in [300_000, 500_000] {
        let clock = ManualClock::new();
        let mut machine = TimeMachine::new(two_splits(), clock.shared());
        machine.apply(Intent::Split);
        clock.advance_millis(100_000);
        machine.apply(Intent::Split);
        clock.advance_millis(final_split - 100_000);
        machine.apply(Intent::Split);
        assert_eq!(machine.state(), MachineState::Finished);

        let event = machine.apply(Intent::Stop);
        assert_eq!(
            event,
            TimingEvent::Reset {
                personal_best: final_split < 400_000
            }
        );
        assert!(machine.timer().is_idle());
        assert_eq!(machine.current_split_index(), 0);
        assert_eq!(machine.state(), MachineState::Idle);
    }
}

#[test]
fn test_best_segment_updates_exactly_once() {
    init_logging();
    let clock = ManualClock::new();
    let mut machine = TimeMachine::new(two_splits(), clock.shared());

    machine.apply(Intent::Split);
    clock.advance_millis(150_000);
    machine.apply(Intent::Split);
    assert_eq!(machine.splits()[0].best_segment, ms(150_000));

    // Slow second segment: best segment unchanged, and the reset keeps it
    clock.advance_millis(450_000);
    machine.apply(Intent::Split);
    machine.apply(Intent::Stop);

    assert_eq!(machine.splits()[0].best_segment, ms(150_000));
    assert_eq!(machine.splits()[1].best_segment, ms(398_000));
    assert_eq!(machine.splits()[0].pb_time, ms(154_500));
}

#[test]
fn test_session_persists_pb_across_reload() {
    init_logging();
    let dir = scratch_dir("session");
    let run_path = dir.join("ds1.json");
    let config_path = dir.join("config.toml");

    Run::new("Dark Souls", "Any%", two_splits())
        .save(&run_path)
        .unwrap();

    let mut config = TimerConfig::load_or_create(&config_path).unwrap();
    config.last_split_file = Some(run_path.clone());
    config.save(&config_path).unwrap();

    let config = TimerConfig::load(&config_path).unwrap();
    let run = Run::load(config.last_split_file.as_deref().unwrap()).unwrap();

    let clock = ManualClock::new();
    let session = Session::new(run, clock.shared()).unwrap();
    let keys = &config.keys;

    // A cancelled attempt
    session.handle_key(keys, "Return");
    clock.advance_millis(10_000);
    assert_eq!(session.handle_key(keys, "BackSpace"), Some(TimingEvent::Cancelled));
    session.handle_key(keys, "BackSpace");

    // A PB attempt with a pause in the middle
    session.handle_key(keys, "Return");
    clock.advance_millis(140_000);
    session.handle_key(keys, "Return");
    session.handle_key(keys, "Space");
    clock.advance_millis(30_000);
    session.handle_key(keys, "Space");
    clock.advance_millis(200_000);
    assert_eq!(
        session.handle_key(keys, "Return"),
        Some(TimingEvent::Finished {
            index: Some(1),
            time: ms(340_000)
        })
    );
    assert_eq!(session.snapshot().clock, "05:40.000");
    assert_eq!(
        session.handle_key(keys, "BackSpace"),
        Some(TimingEvent::Reset { personal_best: true })
    );

    session.save_run(&run_path).unwrap();
    let reloaded = Run::load(&run_path).unwrap();

    assert_eq!(reloaded.attempts, 2);
    assert_eq!(reloaded.segments[0].pb_time, ms(140_000));
    assert_eq!(reloaded.segments[1].pb_time, ms(340_000));
    assert_eq!(reloaded.segments[0].best_segment, ms(140_000));
    assert_eq!(reloaded.segments[1].best_segment, ms(200_000));
    assert_eq!(reloaded.personal_best(), ms(340_000));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_toml_run_file_loads_into_session() {
    init_logging();
    let dir = scratch_dir("toml");
    let path = dir.join("sekiro.toml");
    fs::write(
        &path,
        r#"
game_name = "Sekiro"
category = "Shura"

[[segments]]
name = "Gyoubu"
pb_time = 300000000000
best_segment = 290000000000

[[segments]]
name = "Genichiro"
pb_time = 900000000000
best_segment = 500000000000
"#,
    )
    .unwrap();

    let session = Session::with_system_clock(Run::load(&path).unwrap()).unwrap();
    let snapshot = session.snapshot();

    assert_eq!(snapshot.game_name, "Sekiro");
    assert_eq!(snapshot.splits.len(), 2);
    assert_eq!(snapshot.splits[1].time, "15:00.000");
    assert_eq!(snapshot.state, MachineState::Idle);

    let _ = fs::remove_dir_all(&dir);
}
