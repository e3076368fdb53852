use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use rand::{seq::IndexedRandom, Rng};

use crate::{
    config::Settings, error::AlarmFileError, validate::has_allowed_extension, AlarmSource,
};

/// Picks the file to ring with. Explicit paths are returned as given, the
/// validator decides whether they are usable.
pub fn select<R: Rng + ?Sized>(
    source: &AlarmSource,
    settings: &Settings,
    rng: &mut R,
) -> Result<PathBuf, AlarmFileError> {
    match source {
        AlarmSource::ExplicitPath(path) => Ok(path.clone()),
        AlarmSource::Library(dir) => pick_from_library(dir, rng),
        AlarmSource::EnvironmentDefault => settings.alarm_music_file().map(Path::to_path_buf),
    }
}

pub fn pick_from_library<R: Rng + ?Sized>(
    dir: &Path,
    rng: &mut R,
) -> Result<PathBuf, AlarmFileError> {
    let songs = scan_library(dir)?;
    info!("found {} songs in {}", songs.len(), dir.display());
    songs
        .choose(rng)
        .cloned()
        .ok_or_else(|| AlarmFileError::EmptyLibrary(dir.to_path_buf()))
}

/// every `*.mp3`/`*.mp4` file below `dir`, sorted
///
/// Only `dir` itself has to be readable; nested directories or entries that
/// can't be read are logged and skipped.
pub fn scan_library(dir: &Path) -> Result<Vec<PathBuf>, AlarmFileError> {
    let entries = fs::read_dir(dir).map_err(|source| AlarmFileError::UnreadableLibrary {
        dir: dir.to_path_buf(),
        source,
    })?;
    let mut songs = Vec::new();
    scan_entries(entries, &mut songs);
    songs.sort();
    Ok(songs)
}

fn scan_entries(entries: fs::ReadDir, songs: &mut Vec<PathBuf>) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping library entry: {err}");
                continue;
            }
        };
        let path = entry.path();
        // file_type doesn't follow symlinks, so linked dirs can't loop us
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                continue;
            }
        };
        if is_dir {
            match fs::read_dir(&path) {
                Ok(nested) => scan_entries(nested, songs),
                Err(err) => warn!("skipping {}: {err}", path.display()),
            }
        } else if path.is_file() && has_allowed_extension(&path) {
            debug!("library candidate {}", path.display());
            songs.push(path);
        }
    }
}
