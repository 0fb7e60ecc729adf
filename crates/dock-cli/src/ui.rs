use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use naturadock::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::warn;

const EVENT_CHANNEL_CAPACITY: usize = 1024;
const DRAW_RATE_HZ: u8 = 12;
const SPINNER_TICK: Duration = Duration::from_millis(80);

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
    Log(String),
}

/// Name and failure tally of the phase currently on screen.
#[derive(Debug, Default)]
struct PhaseTracker {
    name: String,
    failed: u64,
}

impl PhaseTracker {
    fn begin(&mut self, name: String) {
        self.name = name;
        self.failed = 0;
    }

    fn record_failure(&mut self) {
        self.failed += 1;
    }

    fn label(&self) -> String {
        match self.failed {
            0 => self.name.clone(),
            n => format!("{} ({n} failed)", self.name),
        }
    }

    fn with_status(&self, text: &str) -> String {
        format!("{}: {text}", self.label())
    }

    /// Returns the line printed once the phase is over and forgets the phase.
    fn close(&mut self) -> String {
        let line = format!("✓ {}", self.label());
        *self = Self::default();
        line
    }
}

/// Renders progress and log lines on stderr while a command runs.
///
/// Both kinds of output share one channel, so a log line is always printed above the bar
/// instead of through it.
pub struct UiManager {
    mp: MultiProgress,
    bar: Option<ProgressBar>,
    phase: PhaseTracker,
    events: mpsc::Receiver<UiEvent>,
    shutdown: watch::Receiver<bool>,
    // Keeps the MultiProgress alive between phases.
    _anchor: ProgressBar,
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown) = watch::channel(false);
        let mp = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(DRAW_RATE_HZ));
        let _anchor = mp.add(ProgressBar::hidden());

        let manager = Self {
            mp,
            bar: None,
            phase: PhaseTracker::default(),
            events,
            shutdown,
            _anchor,
        };
        (manager, event_tx, shutdown_tx)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.events.recv() => self.handle_event(event),
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        // Events queued before the shutdown signal are still shown.
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
        self.clear_bar();
        self._anchor.finish_and_clear();
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(line) => self.print(line),
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                self.clear_bar();
                let spinner = self.mp.add(ProgressBar::new_spinner());
                spinner.set_style(spinner_style());
                spinner.enable_steady_tick(SPINNER_TICK);
                spinner.set_message(name.clone());
                self.phase.begin(name);
                self.bar = Some(spinner);
            }
            Progress::PhaseFinish => {
                self.clear_bar();
                let line = self.phase.close();
                self.print(line);
            }
            Progress::TaskStart { total } => {
                if let Some(bar) = &self.bar {
                    bar.disable_steady_tick();
                    bar.set_style(docking_bar_style());
                    bar.set_length(total);
                    bar.set_position(0);
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(bar) = &self.bar {
                    bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(bar) = &self.bar {
                    bar.finish();
                }
            }
            Progress::StatusUpdate { text } => {
                if let Some(bar) = &self.bar {
                    bar.set_message(self.phase.with_status(&text));
                }
            }
            Progress::Message(text) => self.print(format!("  {text}")),
            Progress::JobFailed { ligand, reason } => {
                self.phase.record_failure();
                if let Some(bar) = &self.bar {
                    bar.set_message(self.phase.label());
                }
                self.print(format!("  ✗ {}: {reason}", ligand.display()));
            }
        }
    }

    fn clear_bar(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn print(&self, line: String) {
        if let Err(e) = self.mp.println(&line) {
            eprintln!("{line} ({e})");
        }
    }
}

fn template(pattern: &str) -> ProgressStyle {
    ProgressStyle::with_template(pattern).unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    template("{spinner:.green} {msg}")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
}

fn docking_bar_style() -> ProgressStyle {
    template("{msg:<30} [{bar:40.cyan/blue}] {pos}/{len} ligands ({elapsed_precise}, eta {eta})")
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.0}s", state.eta().as_secs_f64());
        })
        .progress_chars("━╸ ")
}

/// Bridges core progress reporting onto the UI channel.
#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    /// Called from rayon workers, so a full channel drops the event rather than blocking.
    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let sender = self.sender.clone();
        Box::new(move |progress| {
            if let Err(e) = sender.try_send(UiEvent::Progress(progress)) {
                warn!("Dropped progress update: {}", e);
            }
        })
    }
}
