use std::{
    ffi::OsString,
    process::{Command, Stdio},
};

use log::info;

use crate::{error::AlarmError, AlarmRequest, AlarmSource};

/// whole minutes, anything under a minute is dropped
#[must_use]
pub const fn relaunch_minutes(duration_seconds: u64) -> u64 {
    duration_seconds / 60
}

#[must_use]
pub fn confirmation(minutes: u64) -> String {
    format!(
        "Playing alarm in {minutes} minute{}",
        if minutes == 1 { "" } else { "s" }
    )
}

/// arguments for the detached child, it always runs in the foreground
#[must_use]
pub fn relaunch_args(request: &AlarmRequest) -> Vec<OsString> {
    let mut args = vec![
        OsString::from("-m"),
        relaunch_minutes(request.duration_seconds).to_string().into(),
    ];
    match &request.source {
        AlarmSource::ExplicitPath(path) => {
            args.push("-f".into());
            args.push(path.into());
        }
        AlarmSource::Library(dir) => {
            args.push("-l".into());
            args.push(dir.into());
        }
        AlarmSource::EnvironmentDefault => {}
    }
    args
}

/// Relaunches this executable with `relaunch_args` and forgets about it.
/// Returns the minutes the child will wait.
pub fn spawn_detached(request: &AlarmRequest) -> Result<u64, AlarmError> {
    let exe = std::env::current_exe().map_err(AlarmError::Spawn)?;
    let args = relaunch_args(request);

    let mut command = Command::new(exe);
    command
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // keep terminal Ctrl-C away from the child
        command.process_group(0);
    }
    let child = command.spawn().map_err(AlarmError::Spawn)?;
    info!("background alarm started as pid {} with {args:?}", child.id());
    Ok(relaunch_minutes(request.duration_seconds))
}
