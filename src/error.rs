use std::{io, path::PathBuf};

use thiserror::Error;

/// the alarm file couldn't be resolved or isn't playable
#[derive(Debug, Error)]
pub enum AlarmFileError {
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("{} is not supported (mp3, mp4 files are)", .0.display())]
    Unsupported(PathBuf),

    #[error("No music files found in {}", .0.display())]
    EmptyLibrary(PathBuf),

    #[error("couldn't read song library {}: {source}", .dir.display())]
    UnreadableLibrary {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0} is not set (pass --file or --song_library, or set it in .env)")]
    UnsetVariable(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("couldn't open audio output: {0}")]
    Output(#[from] rodio::StreamError),

    #[error("couldn't open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// everything that can end a run with a non-zero exit code
#[derive(Debug, Error)]
pub enum AlarmError {
    #[error(transparent)]
    AlarmFile(#[from] AlarmFileError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("couldn't write countdown: {0}")]
    Display(#[from] io::Error),

    #[error("couldn't start background alarm: {0}")]
    Spawn(#[source] io::Error),

    #[error("couldn't install interrupt handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}
