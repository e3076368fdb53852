use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::{AlarmRequest, AlarmSource, RunMode};

#[derive(Debug, Parser)]
#[command(author, version, about = "Play an alarm after N minutes", long_about = None)]
#[command(group(ArgGroup::new("duration").required(true).args(["seconds", "minutes"])))]
#[command(group(ArgGroup::new("run_mode").args(["background", "display_timer"])))]
#[command(group(ArgGroup::new("alarm_file").args(["song_library", "file"])))]
pub struct Args {
    /// Number of seconds before playing alarm
    #[arg(short, long)]
    pub seconds: Option<u64>,

    /// Number of minutes before playing alarm
    #[arg(short, long)]
    pub minutes: Option<u64>,

    /// Run timer in the background
    #[arg(short, long)]
    pub background: bool,

    /// Show timer in console
    #[arg(short, long = "display_timer")]
    pub display_timer: bool,

    /// Take a random song from a song library directory
    #[arg(short = 'l', long = "song_library", value_name = "DIR")]
    pub song_library: Option<PathBuf>,

    /// File path to song to play as alarm
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl Args {
    /// total wait in seconds, whichever unit was given
    #[must_use]
    pub fn duration_seconds(&self) -> u64 {
        match (self.seconds, self.minutes) {
            (Some(seconds), _) => seconds,
            (None, Some(minutes)) => minutes.saturating_mul(60),
            // clap enforces one of the two
            (None, None) => 0,
        }
    }

    #[must_use]
    pub const fn run_mode(&self) -> RunMode {
        if self.background {
            RunMode::Background
        } else if self.display_timer {
            RunMode::ForegroundDisplay
        } else {
            RunMode::ForegroundSilent
        }
    }

    #[must_use]
    pub fn source(&self) -> AlarmSource {
        if let Some(dir) = &self.song_library {
            AlarmSource::Library(dir.clone())
        } else if let Some(file) = &self.file {
            AlarmSource::ExplicitPath(file.clone())
        } else {
            AlarmSource::EnvironmentDefault
        }
    }
}

impl From<Args> for AlarmRequest {
    fn from(args: Args) -> Self {
        Self::new(args.duration_seconds(), args.source(), args.run_mode())
    }
}
