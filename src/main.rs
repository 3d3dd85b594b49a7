use crate::output::OutputWriter;
use crate::reader::DumpReader;
use clap::Parser;
use notechart::{ChartError as LibChartError, SongConverter};
use std::io;
use std::path::PathBuf;

mod output;
mod reader;

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("notechart=info"))
        .init();

    // args
    let args = CliArgs::parse();
    let input_dir = PathBuf::from(args.input);
    let output_dir = PathBuf::from(args.output);

    if !input_dir.is_dir() {
        let err = AppError::ConfigError(format!("Input directory not found {input_dir:?}"));
        return Err(err);
    }

    let reader = DumpReader::new(input_dir);
    let writer = OutputWriter::new(output_dir, args.convert_audio);
    let converter = SongConverter::new(&reader);

    let outputs = converter.convert_all(|label| {
        log::info!("converting {label}");
        true
    })?;

    let mut written = 0;
    for output in &outputs {
        if !output.skipped.is_empty() {
            log::warn!(
                "{}: {} arrangement(s) skipped",
                output.song_key,
                output.skipped.len()
            );
        }
        // one corrupt song must not abort the whole batch
        match writer.write_song(output, &reader) {
            Ok(()) => written += 1,
            Err(err) => log::warn!("failed to write {}: {err}", output.song_key),
        }
    }
    log::info!("wrote {written}/{} songs", outputs.len());
    Ok(())
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Directory holding the decoded chart record dump.
    #[arg(long)]
    input: String,
    /// Destination directory for the normalized song files.
    #[arg(long)]
    output: String,
    /// Rewrite the audio file even when it already exists.
    #[arg(long, default_value_t = false)]
    convert_audio: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("conversion error: {0}")]
    ConversionError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<LibChartError> for AppError {
    fn from(error: LibChartError) -> Self {
        match error {
            LibChartError::MalformedArrangement(s) | LibChartError::ValueOutOfRange(s) => {
                Self::ConversionError(s)
            }
            LibChartError::ReaderError(s) | LibChartError::IoError(s) => Self::OtherError(s),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}
