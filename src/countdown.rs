use std::{
    io::Write,
    sync::mpsc::{Receiver, RecvTimeoutError},
    thread,
    time::Duration,
};

use log::info;

const STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Elapsed,
    Interrupted,
}

/// one second of waiting
pub trait Ticker {
    fn tick(&mut self) -> Tick;

    /// an interrupt arrived that no tick has consumed
    fn pending_interrupt(&mut self) -> bool {
        false
    }
}

/// Waits on the interrupt channel fed by the Ctrl-C handler, so an interrupt
/// ends the current second early.
#[derive(Debug)]
pub struct SignalTicker {
    interrupts: Receiver<()>,
}

impl SignalTicker {
    #[must_use]
    pub const fn new(interrupts: Receiver<()>) -> Self {
        Self { interrupts }
    }
}

impl Ticker for SignalTicker {
    fn tick(&mut self) -> Tick {
        match self.interrupts.recv_timeout(STEP) {
            Ok(()) => Tick::Interrupted,
            Err(RecvTimeoutError::Timeout) => Tick::Elapsed,
            // no handler left to interrupt us
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(STEP);
                Tick::Elapsed
            }
        }
    }

    fn pending_interrupt(&mut self) -> bool {
        self.interrupts.try_recv().is_ok()
    }
}

/// `MM:SS`, minutes are not wrapped into hours
#[must_use]
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Counts `seconds` ticks down to zero, drawing the remaining time on a single
/// line of `out` when `display` is set.
pub fn run<T: Ticker + ?Sized, W: Write + ?Sized>(
    seconds: u64,
    display: bool,
    ticker: &mut T,
    out: &mut W,
) -> std::io::Result<Tick> {
    let mut remaining = seconds;
    while remaining > 0 {
        if display {
            write!(out, "{}\r", format_remaining(remaining))?;
            out.flush()?;
        }
        if ticker.tick() == Tick::Interrupted {
            info!("countdown interrupted with {remaining}s left");
            if display {
                writeln!(out)?;
            }
            return Ok(Tick::Interrupted);
        }
        remaining -= 1;
    }
    if display {
        write!(out, "{}\r", format_remaining(0))?;
        out.flush()?;
    }
    Ok(Tick::Elapsed)
}
