#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms, missing_debug_implementations)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use std::{io::Write, path::PathBuf};

use log::info;
use rand::Rng;

use config::Settings;
use countdown::{Tick, Ticker};
use error::AlarmError;
use playback::Player;

pub mod background;
pub mod cli;
pub mod config;
pub mod countdown;
pub mod error;
pub mod playback;
pub mod selector;
pub mod validate;

/// where the alarm file comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmSource {
    ExplicitPath(PathBuf),
    /// a random song below this directory
    Library(PathBuf),
    /// `ALARM_MUSIC_FILE` from [`Settings`]
    EnvironmentDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    ForegroundDisplay,
    #[default]
    ForegroundSilent,
    Background,
}

impl RunMode {
    #[must_use]
    pub const fn displays_timer(self) -> bool {
        matches!(self, Self::ForegroundDisplay)
    }
}

/// a single invocation of the alarm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRequest {
    pub duration_seconds: u64,
    pub source: AlarmSource,
    pub run_mode: RunMode,
    /// filled in once the file is selected and validated
    pub resolved_file: Option<PathBuf>,
}

impl AlarmRequest {
    #[must_use]
    pub const fn new(duration_seconds: u64, source: AlarmSource, run_mode: RunMode) -> Self {
        Self {
            duration_seconds,
            source,
            run_mode,
            resolved_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Played,
    Interrupted,
}

/// Runs a foreground alarm: select, validate, count down, play.
#[derive(Debug)]
pub struct Alarm<T, P, W> {
    ticker: T,
    player: P,
    out: W,
}

impl<T: Ticker, P: Player, W: Write> Alarm<T, P, W> {
    #[must_use]
    pub const fn new(ticker: T, player: P, out: W) -> Self {
        Self {
            ticker,
            player,
            out,
        }
    }

    /// The ticker is dropped as soon as the countdown ends, which closes the
    /// interrupt channel before playback starts.
    pub fn ring<R: Rng + ?Sized>(
        self,
        request: &mut AlarmRequest,
        settings: &Settings,
        rng: &mut R,
    ) -> Result<Outcome, AlarmError> {
        let Self {
            mut ticker,
            mut player,
            mut out,
        } = self;

        let path = selector::select(&request.source, settings, rng)?;
        validate::validate(&path)?;
        info!("alarm file {}", path.display());
        request.resolved_file = Some(path.clone());

        let display = request.run_mode.displays_timer();
        let tick = countdown::run(request.duration_seconds, display, &mut ticker, &mut out)?;
        // a zero second countdown never ticks, so look for an early Ctrl-C too
        let interrupted = tick == Tick::Interrupted || ticker.pending_interrupt();
        drop(ticker);
        if interrupted {
            return Ok(Outcome::Interrupted);
        }

        player.play(&path)?;
        Ok(Outcome::Played)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs::File,
        path::{Path, PathBuf},
    };

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::error::{AlarmFileError, PlaybackError};

    #[derive(Default)]
    struct Recorder {
        played: Vec<PathBuf>,
    }

    impl Player for &mut Recorder {
        fn play(&mut self, path: &Path) -> Result<(), PlaybackError> {
            self.played.push(path.to_path_buf());
            Ok(())
        }
    }

    struct Steps<'a> {
        count: &'a mut u64,
        interrupt_after: Option<u64>,
        pending: bool,
    }

    impl Ticker for Steps<'_> {
        fn tick(&mut self) -> Tick {
            *self.count += 1;
            if self.interrupt_after == Some(*self.count) {
                Tick::Interrupted
            } else {
                Tick::Elapsed
            }
        }

        fn pending_interrupt(&mut self) -> bool {
            std::mem::take(&mut self.pending)
        }
    }

    fn ring(
        request: &mut AlarmRequest,
        settings: &Settings,
        interrupt_after: Option<u64>,
    ) -> (Result<Outcome, AlarmError>, u64, Vec<PathBuf>) {
        ring_with(request, settings, interrupt_after, false)
    }

    fn ring_with(
        request: &mut AlarmRequest,
        settings: &Settings,
        interrupt_after: Option<u64>,
        pending: bool,
    ) -> (Result<Outcome, AlarmError>, u64, Vec<PathBuf>) {
        let mut count = 0;
        let mut recorder = Recorder::default();
        let ticker = Steps {
            count: &mut count,
            interrupt_after,
            pending,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let result =
            Alarm::new(ticker, &mut recorder, Vec::<u8>::new()).ring(request, settings, &mut rng);
        (result, count, recorder.played)
    }

    fn song(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn plays_after_the_full_countdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = song(dir.path(), "wake.mp3");
        let mut request = AlarmRequest::new(
            5,
            AlarmSource::ExplicitPath(path.clone()),
            RunMode::ForegroundDisplay,
        );

        let (result, ticks, played) = ring(&mut request, &Settings::default(), None);
        assert_eq!(result.unwrap(), Outcome::Played);
        assert_eq!(ticks, 5);
        assert_eq!(played, vec![path.clone()]);
        assert_eq!(request.resolved_file, Some(path));
    }

    #[test]
    fn zero_seconds_plays_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = song(dir.path(), "wake.mp4");
        let settings = Settings::with_alarm_music_file(&path);
        let mut request =
            AlarmRequest::new(0, AlarmSource::EnvironmentDefault, RunMode::ForegroundSilent);

        let (result, ticks, played) = ring(&mut request, &settings, None);
        assert_eq!(result.unwrap(), Outcome::Played);
        assert_eq!(ticks, 0);
        assert_eq!(played, vec![path]);
    }

    #[test]
    fn interrupt_skips_playback() {
        let dir = tempfile::tempdir().unwrap();
        let path = song(dir.path(), "wake.mp3");
        let mut request =
            AlarmRequest::new(60, AlarmSource::ExplicitPath(path), RunMode::ForegroundSilent);

        let (result, ticks, played) = ring(&mut request, &Settings::default(), Some(3));
        assert_eq!(result.unwrap(), Outcome::Interrupted);
        assert_eq!(ticks, 3);
        assert!(played.is_empty());
    }

    #[test]
    fn early_interrupt_stops_a_zero_second_alarm() {
        let dir = tempfile::tempdir().unwrap();
        let path = song(dir.path(), "wake.mp3");
        let mut request =
            AlarmRequest::new(0, AlarmSource::ExplicitPath(path), RunMode::ForegroundSilent);

        let (result, ticks, played) = ring_with(&mut request, &Settings::default(), None, true);
        assert_eq!(result.unwrap(), Outcome::Interrupted);
        assert_eq!(ticks, 0);
        assert!(played.is_empty());
    }

    #[test]
    fn empty_library_never_counts_down_or_plays() {
        let dir = tempfile::tempdir().unwrap();
        song(dir.path(), "readme.txt");
        let mut request = AlarmRequest::new(
            10,
            AlarmSource::Library(dir.path().to_path_buf()),
            RunMode::ForegroundSilent,
        );

        let (result, ticks, played) = ring(&mut request, &Settings::default(), None);
        assert!(matches!(
            result,
            Err(AlarmError::AlarmFile(AlarmFileError::EmptyLibrary(_)))
        ));
        assert_eq!(ticks, 0);
        assert!(played.is_empty());
        assert!(request.resolved_file.is_none());
    }

    #[test]
    fn unsupported_file_is_rejected_before_the_countdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = song(dir.path(), "wake.wav");
        let mut request =
            AlarmRequest::new(10, AlarmSource::ExplicitPath(path), RunMode::ForegroundSilent);

        let (result, ticks, played) = ring(&mut request, &Settings::default(), None);
        assert!(matches!(
            result,
            Err(AlarmError::AlarmFile(AlarmFileError::Unsupported(_)))
        ));
        assert_eq!(ticks, 0);
        assert!(played.is_empty());
    }

    #[test]
    fn library_song_is_played() {
        let dir = tempfile::tempdir().unwrap();
        let path = song(dir.path(), "only.mp3");
        let mut request = AlarmRequest::new(
            1,
            AlarmSource::Library(dir.path().to_path_buf()),
            RunMode::ForegroundSilent,
        );

        let (result, _, played) = ring(&mut request, &Settings::default(), None);
        assert_eq!(result.unwrap(), Outcome::Played);
        assert_eq!(played, vec![path]);
    }
}
