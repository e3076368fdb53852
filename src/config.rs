use std::{
    collections::HashMap,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{AlarmFileError, ConfigError};

/// variable naming the default alarm file
pub const ALARM_MUSIC_FILE: &str = "ALARM_MUSIC_FILE";

/// dotenv style file looked up from the working directory upwards
pub const ENV_FILE: &str = ".env";

/// per user `config.toml`
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub alarm_music_file: Option<PathBuf>,
}

impl FileConfig {
    /// a missing file is an empty config
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(config) = read_optional(path)? else {
            return Ok(Self::default());
        };
        toml::from_str(&config).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        let mut path = directories::ProjectDirs::from("", "", "roosty_alarm")?
            .config_dir()
            .to_path_buf();
        path.push("config.toml");
        Some(path)
    }
}

/// Configuration recognised by the alarm, resolved once and then only read.
///
/// The process environment wins over `.env`, which wins over `config.toml`.
/// `.env` is the nearest one in the working directory or its ancestors.
/// Loading never writes back into the process environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    alarm_music_file: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let env_file = std::env::current_dir()
            .ok()
            .and_then(|cwd| find_env_file(&cwd));
        Self::load_from(
            env_file.as_deref(),
            FileConfig::config_path().as_deref(),
            std::env::var_os(ALARM_MUSIC_FILE),
        )
    }

    pub fn load_from(
        env_file: Option<&Path>,
        config_file: Option<&Path>,
        process_value: Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let dotenv = match env_file {
            Some(path) => read_optional(path)?
                .map(|contents| parse_env(&contents))
                .unwrap_or_default(),
            None => HashMap::new(),
        };
        let file_config = match config_file {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::from_sources(process_value, &dotenv, file_config))
    }

    #[must_use]
    pub fn from_sources(
        process_value: Option<OsString>,
        dotenv: &HashMap<String, String>,
        file_config: FileConfig,
    ) -> Self {
        let alarm_music_file = process_value
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                dotenv
                    .get(ALARM_MUSIC_FILE)
                    .filter(|value| !value.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| {
                file_config
                    .alarm_music_file
                    .filter(|path| !path.as_os_str().is_empty())
            });
        Self { alarm_music_file }
    }

    #[cfg(test)]
    pub(crate) fn with_alarm_music_file(path: impl Into<PathBuf>) -> Self {
        Self {
            alarm_music_file: Some(path.into()),
        }
    }

    pub fn alarm_music_file(&self) -> Result<&Path, AlarmFileError> {
        self.alarm_music_file
            .as_deref()
            .ok_or(AlarmFileError::UnsetVariable(ALARM_MUSIC_FILE))
    }
}

/// nearest `.env` walking up from `start`
#[must_use]
pub fn find_env_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(ENV_FILE))
        .find(|path| path.is_file())
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            debug!("read {}", path.display());
            Ok(Some(contents))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parses `KEY=VALUE` lines. Comments, blank lines and an `export ` prefix are
/// allowed; lines without a key are skipped. Double quoted values understand
/// the `\n`, `\t`, `\r`, `\"` and `\\` escapes.
#[must_use]
pub fn parse_env(contents: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map_or(line, str::trim_start);
        let Some((key, value)) = line.split_once('=') else {
            warn!("{ENV_FILE}:{}: expected KEY=VALUE, skipping", number + 1);
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            warn!("{ENV_FILE}:{}: invalid key {key:?}, skipping", number + 1);
            continue;
        }
        vars.insert(key.to_string(), unquote(value.trim()));
    }
    vars
}

fn unquote(value: &str) -> String {
    if let Some(rest) = value.strip_prefix('"') {
        if let Some(unescaped) = unescape_double_quoted(rest) {
            return unescaped;
        }
    }
    if let Some(rest) = value.strip_prefix('\'') {
        if let Some(end) = rest.find('\'') {
            return rest[..end].to_string();
        }
    }
    // unquoted values may carry a trailing comment
    value
        .split_once(" #")
        .map_or(value, |(value, _)| value.trim_end())
        .to_string()
}

/// `None` when the closing quote is missing
fn unescape_double_quoted(rest: &str) -> Option<String> {
    let mut unescaped = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Some(unescaped),
            '\\' => match chars.next()? {
                'n' => unescaped.push('\n'),
                't' => unescaped.push('\t'),
                'r' => unescaped.push('\r'),
                escaped @ ('"' | '\\') => unescaped.push(escaped),
                other => {
                    unescaped.push('\\');
                    unescaped.push(other);
                }
            },
            c => unescaped.push(c),
        }
    }
    None
}
