use crate::error::{CliError, Result};
use crate::ui::UiEvent;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::{filter::LevelFilter, fmt, fmt::MakeWriter, prelude::*};

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Routes console log lines through the UI so they print above progress bars.
#[derive(Clone)]
pub struct UiLogSink {
    sender: mpsc::Sender<UiEvent>,
}

impl UiLogSink {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }
}

impl<'a> MakeWriter<'a> for UiLogSink {
    type Writer = UiLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        UiLogWriter {
            sender: self.sender.clone(),
            buffer: Vec::new(),
        }
    }
}

/// Buffers one formatted event and hands it to the UI when dropped.
pub struct UiLogWriter {
    sender: mpsc::Sender<UiEvent>,
    buffer: Vec<u8>,
}

impl io::Write for UiLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        if let Err(err) = self.sender.try_send(UiEvent::Log(line)) {
            // The UI is gone or saturated; write straight to the terminal.
            if let UiEvent::Log(line) = err.into_inner() {
                eprint!("{}", line);
            }
        }
        Ok(())
    }
}

impl Drop for UiLogWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

pub fn setup_logging(
    verbosity: u8,
    quiet: bool,
    log_file: Option<&Path>,
    ui_sender: mpsc::Sender<UiEvent>,
) -> Result<()> {
    let console_layer = fmt::layer()
        .with_writer(UiLogSink::new(ui_sender))
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(console_layer);

    if let Some(path) = log_file {
        let file = File::create(path).map_err(CliError::Io)?;
        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);
        subscriber
            .with(file_layer)
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))?;
    }
    Ok(())
}
