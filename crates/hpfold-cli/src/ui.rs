use hpfold::core::scoring::BondScore;
use hpfold::engine::progress::{Progress, ProgressCallback};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::warn;

const EVENT_BUFFER: usize = 1024;
const SPINNER_TICK_MS: u64 = 80;

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
    Log(String),
}

/// Owns the terminal while a command runs: one line per fold run, a spinner
/// that turns into a bar once the run knows how many steps it has, and log
/// lines printed above it.
pub struct UiManager {
    mp: MultiProgress,
    run: Option<RunLine>,
    event_receiver: mpsc::Receiver<UiEvent>,
    shutdown_receiver: watch::Receiver<bool>,
}

/// The progress line of the fold run in flight.
struct RunLine {
    bar: ProgressBar,
    label: String,
}

impl RunLine {
    fn start(mp: &MultiProgress, algorithm: &str, restarts: usize) -> Self {
        let label = match restarts {
            1 => format!("Folding with {}", algorithm),
            n => format!("Folding with {} ({} restarts)", algorithm, n),
        };
        let bar = mp.add(ProgressBar::new_spinner());
        bar.set_style(spinner_style());
        bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        bar.set_message(label.clone());
        Self { bar, label }
    }

    fn plan(&self, total: u64) {
        self.bar.disable_steady_tick();
        self.bar.set_style(bar_style());
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn complete(&self) {
        if let Some(total) = self.bar.length() {
            self.bar.set_position(total);
        }
    }

    fn summary(&self, best: Option<BondScore>) -> String {
        match best {
            Some(score) => format!("✓ {}: best score {}", self.label, score),
            None => format!("✗ {}: no fold found", self.label),
        }
    }
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, event_receiver) = mpsc::channel(EVENT_BUFFER);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let mp = MultiProgress::new();
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        let manager = Self {
            mp,
            run: None,
            event_receiver,
            shutdown_receiver,
        };
        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.event_receiver.recv() => {
                    self.handle_event(event);
                }
                result = self.shutdown_receiver.changed() => {
                    if result.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }
        // Log lines sent just before shutdown still belong on screen.
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
        if let Some(run) = self.run.take() {
            run.bar.finish_and_clear();
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(line) => {
                self.mp.println(line.trim_end()).ok();
            }
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::RunStart {
                algorithm,
                restarts,
            } => {
                if let Some(previous) = self.run.take() {
                    previous.bar.finish_and_clear();
                }
                self.run = Some(RunLine::start(&self.mp, algorithm, restarts));
            }
            Progress::StepsPlanned { total } => {
                if let Some(run) = &self.run {
                    run.plan(total);
                }
            }
            Progress::StepsDone { amount } => {
                if let Some(run) = &self.run {
                    run.bar.inc(amount);
                }
            }
            Progress::StepsFinished => {
                if let Some(run) = &self.run {
                    run.complete();
                }
            }
            Progress::Reset { count, best } => {
                if let Some(run) = &self.run {
                    run.bar
                        .set_message(format!("{} (reset #{}, best {})", run.label, count, best));
                }
            }
            Progress::RunFinish { best } => {
                if let Some(run) = self.run.take() {
                    run.bar.finish_and_clear();
                    self.mp.println(run.summary(best)).ok();
                }
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<40} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            write!(w, "{:.1}s", state.eta().as_secs_f64()).ok();
        })
        .progress_chars("━╸ ")
}

/// Forwards engine progress events to the [`UiManager`].
#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let sender = self.sender.clone();
        Box::new(move |progress: Progress| {
            if let Err(e) = sender.try_send(UiEvent::Progress(progress)) {
                warn!("Failed to send progress update to UI channel: {}", e);
            }
        })
    }
}
