use std::{fs::File, io::BufReader, path::Path};

use log::info;
use rodio::{Decoder, OutputStreamBuilder, Sink};

use crate::error::PlaybackError;

/// something that can play an alarm file to the end
pub trait Player {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError>;
}

/// plays through the default output device
#[derive(Debug, Default)]
pub struct RodioPlayer;

impl Player for RodioPlayer {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let input = Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let mut stream_handle = OutputStreamBuilder::open_default_stream()?;
        stream_handle.log_on_drop(false);
        let sink = Sink::connect_new(stream_handle.mixer());
        sink.append(input);
        sink.play();
        info!("playing {}", path.display());
        sink.sleep_until_end();
        info!("finished playing {}", path.display());
        Ok(())
    }
}
