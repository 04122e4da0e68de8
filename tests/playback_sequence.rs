use std::cell::RefCell;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;
use playmusic::{
    Clock, CliArgs, ManualClock, PlaybackEngine, PlaybackRequest, Player, PlayerConfig,
    PlayerError, PlayerState, TrackList,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Load(String),
    Stop { at: Duration },
}

/// Engine that decides per file name whether a track plays, and for how long
struct ScriptedEngine {
    clock: ManualClock,
    calls: Rc<RefCell<Vec<Call>>>,
    track_length: Duration,
    current: Option<Instant>,
}

impl ScriptedEngine {
    fn new(clock: &ManualClock, track_length: Duration) -> (Self, Rc<RefCell<Vec<Call>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let engine = Self {
            clock: clock.clone(),
            calls: Rc::clone(&calls),
            track_length,
            current: None,
        };
        (engine, calls)
    }
}

impl PlaybackEngine for ScriptedEngine {
    fn load_and_play(&mut self, path: &Path) -> playmusic::Result<()> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        self.calls.borrow_mut().push(Call::Load(name.clone()));

        if name.contains("broken") {
            return Err(PlayerError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "unrecognized format".into(),
            });
        }
        if !path.exists() {
            return Err(PlayerError::FileNotFound(path.to_path_buf()));
        }
        self.current = Some(self.clock.now());
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.current
            .map(|start| self.clock.now() - start < self.track_length)
            .unwrap_or(false)
    }

    fn stop(&mut self) {
        if self.current.take().is_some() {
            self.calls.borrow_mut().push(Call::Stop {
                at: self.clock.elapsed(),
            });
        }
    }
}

fn fixture(names: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in names {
        File::create(dir.path().join(name)).expect("create fixture");
    }
    dir
}

fn loads(calls: &[Call]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|c| match c {
            Call::Load(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

fn file_names(tracks: &TrackList) -> Vec<String> {
    tracks
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn directory_run_plays_audio_files_in_name_order() {
    let dir = fixture(&["b.wav", "c.txt", "a.mp3"]);
    let request = PlaybackRequest::Directory {
        path: dir.path().to_path_buf(),
        recursive: false,
    };
    let tracks = TrackList::resolve(&request).unwrap();
    assert_eq!(file_names(&tracks), vec!["a.mp3", "b.wav"]);

    let clock = ManualClock::new();
    let (engine, calls) = ScriptedEngine::new(&clock, Duration::from_secs(1));
    let mut player = Player::new(engine, clock.clone(), PlayerConfig::default());

    let summary = player.run(&tracks).unwrap();

    assert_eq!(summary.finished, 2);
    assert!(summary.skipped.is_empty());
    assert_eq!(loads(&calls.borrow()), vec!["a.mp3", "b.wav"]);
    assert_eq!(player.state(), PlayerState::Terminated);
}

#[test]
fn unsupported_track_between_valid_ones_is_skipped() {
    let dir = fixture(&["a.mp3", "b_broken.ogg", "c.wav"]);
    let tracks = TrackList::scan_directory(dir.path(), false).unwrap();
    assert_eq!(file_names(&tracks), vec!["a.mp3", "b_broken.ogg", "c.wav"]);

    let clock = ManualClock::new();
    let (engine, calls) = ScriptedEngine::new(&clock, Duration::from_millis(300));
    let mut player = Player::new(engine, clock, PlayerConfig::default());

    let summary = player.run(&tracks).unwrap();

    assert_eq!(summary.finished, 2);
    assert_eq!(summary.skipped.len(), 1);
    let (path, reason) = &summary.skipped[0];
    assert_eq!(path.file_name().unwrap(), "b_broken.ogg");
    assert!(reason.contains("unrecognized format"));
    assert_eq!(loads(&calls.borrow()), vec!["a.mp3", "b_broken.ogg", "c.wav"]);
}

#[test]
fn file_removed_after_resolution_is_skipped() {
    let dir = fixture(&["a.mp3", "b.mp3"]);
    let tracks = TrackList::scan_directory(dir.path(), false).unwrap();
    std::fs::remove_file(dir.path().join("a.mp3")).unwrap();

    let clock = ManualClock::new();
    let (engine, _calls) = ScriptedEngine::new(&clock, Duration::from_millis(100));
    let mut player = Player::new(engine, clock, PlayerConfig::default());

    let summary = player.run(&tracks).unwrap();

    assert_eq!(summary.finished, 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].1, "file not found");
}

#[test]
fn wait_timeout_stops_long_track_and_starts_next() {
    let dir = fixture(&["a.mp3", "b.mp3"]);
    let tracks = TrackList::scan_directory(dir.path(), false).unwrap();

    let args = CliArgs::try_parse_from([
        "playmusic",
        "--dir",
        dir.path().to_str().unwrap(),
        "--wait-timeout",
        "2",
    ])
    .unwrap();
    let (_, config) = args.into_parts().unwrap();
    let poll = config.poll_interval;

    let clock = ManualClock::new();
    let (engine, calls) = ScriptedEngine::new(&clock, Duration::from_secs(600));
    let mut player = Player::new(engine, clock.clone(), config);

    let summary = player.run(&tracks).unwrap();
    assert_eq!(summary.timed_out, 2);

    let calls = calls.borrow();
    let stops: Vec<Duration> = calls
        .iter()
        .filter_map(|c| match c {
            Call::Stop { at } => Some(*at),
            _ => None,
        })
        .collect();
    assert_eq!(stops.len(), 2);

    let limit = Duration::from_secs(2);
    assert!(stops[0] >= limit);
    assert!(stops[0] <= limit + poll);
    // Second track starts right after the first stop
    assert!(stops[1] - stops[0] >= limit);
    assert!(stops[1] - stops[0] <= limit + poll);
    assert_eq!(calls[1], Call::Stop { at: stops[0] });
    assert_eq!(calls[2], Call::Load("b.mp3".into()));
}

#[test]
fn short_track_finishes_before_timeout() {
    let dir = fixture(&["a.wav"]);
    let tracks = TrackList::scan_directory(dir.path(), false).unwrap();

    let clock = ManualClock::new();
    let (engine, calls) = ScriptedEngine::new(&clock, Duration::from_millis(700));
    let config = PlayerConfig::default().with_wait_timeout(Some(Duration::from_secs(5)));
    let mut player = Player::new(engine, clock.clone(), config);

    let summary = player.run(&tracks).unwrap();

    assert_eq!(summary.finished, 1);
    assert_eq!(summary.timed_out, 0);
    assert_eq!(clock.elapsed(), Duration::from_millis(700));
    // Only the end-of-run drain stops the engine
    assert_eq!(
        calls.borrow().last(),
        Some(&Call::Stop {
            at: Duration::from_millis(700)
        })
    );
}

#[test]
fn missing_file_fails_before_any_engine_exists() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mp3");
    let args = CliArgs::try_parse_from(["playmusic", "--file", missing.to_str().unwrap()]).unwrap();
    let (request, _) = args.into_parts().unwrap();

    let err = TrackList::resolve(&request).unwrap_err();

    assert!(matches!(err, PlayerError::FileNotFound(ref p) if p == &missing));
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn conflicting_targets_never_reach_playback() {
    let args = CliArgs::try_parse_from(["playmusic", "-f", "a.mp3", "-d", "/audio"]).unwrap();
    let err = args.into_parts().unwrap_err();

    assert!(matches!(err, PlayerError::InvalidArguments(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn empty_directory_is_a_no_op_run() {
    let dir = fixture(&["readme.txt", "cover.jpg"]);
    let tracks = TrackList::scan_directory(dir.path(), false).unwrap();
    assert!(tracks.is_empty());

    let clock = ManualClock::new();
    let (engine, calls) = ScriptedEngine::new(&clock, Duration::from_secs(1));
    let mut player = Player::new(engine, clock, PlayerConfig::default());

    let summary = player.run(&tracks).unwrap();

    assert_eq!(summary.attempted(), 0);
    assert!(calls.borrow().is_empty());
}

#[test]
fn recursive_scan_orders_by_path() {
    let dir = fixture(&["z.mp3"]);
    let disc1: PathBuf = dir.path().join("disc1");
    std::fs::create_dir(&disc1).unwrap();
    File::create(disc1.join("01.FLAC")).unwrap();
    File::create(disc1.join("02.flac")).unwrap();

    let request = PlaybackRequest::Directory {
        path: dir.path().to_path_buf(),
        recursive: true,
    };
    let tracks = TrackList::resolve(&request).unwrap();

    assert_eq!(file_names(&tracks), vec!["01.FLAC", "02.flac", "z.mp3"]);
}
