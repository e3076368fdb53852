use std::{io, process::ExitCode, sync::mpsc};

use clap::Parser;
use log::{error, info};
use roosty_alarm::{
    background,
    cli::Args,
    config::Settings,
    countdown::SignalTicker,
    error::AlarmError,
    playback::RodioPlayer,
    Alarm, AlarmRequest, AlarmSource, Outcome, RunMode,
};

fn main() -> ExitCode {
    // initialize the logger, the console is kept for the countdown
    if let Err(err) = simple_file_logger::init_logger!("roosty_alarm") {
        eprintln!("couldn't initialize logger: {err:?}");
    }

    let mut request = AlarmRequest::from(Args::parse());
    info!("alarm requested: {request:?}");

    let result = if request.run_mode == RunMode::Background {
        detach(&request)
    } else {
        ring(&mut request).map(|outcome| {
            info!("alarm finished: {outcome:?}");
        })
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn detach(request: &AlarmRequest) -> Result<(), AlarmError> {
    let minutes = background::spawn_detached(request)?;
    println!("{}", background::confirmation(minutes));
    Ok(())
}

fn ring(request: &mut AlarmRequest) -> Result<Outcome, AlarmError> {
    let (tx, rx) = mpsc::channel();
    // once the countdown is over nobody listens, so just leave
    ctrlc::set_handler(move || {
        if tx.send(()).is_err() {
            std::process::exit(0);
        }
    })?;

    let settings = match request.source {
        AlarmSource::EnvironmentDefault => Settings::load()?,
        _ => Settings::default(),
    };
    log_ring_time(request.duration_seconds);

    Alarm::new(SignalTicker::new(rx), RodioPlayer, io::stdout()).ring(
        request,
        &settings,
        &mut rand::rng(),
    )
}

fn log_ring_time(seconds: u64) {
    let rings_at = i64::try_from(seconds)
        .ok()
        .and_then(chrono::TimeDelta::try_seconds)
        .and_then(|delta| chrono::Local::now().checked_add_signed(delta));
    if let Some(at) = rings_at {
        info!("alarm rings at {}", at.format("%H:%M:%S"));
    }
}
