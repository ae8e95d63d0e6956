pub mod config;
pub mod runtime;
pub mod session;
pub mod source;
pub mod timer;
pub mod ui;
pub mod util;

use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::runtime::AppEvent;
use crate::session::{Session, SessionEvent};
use crate::source::{RemoteTextSource, RemoteTipSource, StaticTextSource, TextSource, TipSource};
use crate::timer::Countdown;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc::{self, Receiver, Sender},
    sync::Arc,
    time::Duration,
};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Discrete passage sizes offered by the word-count selector.
pub const WORD_COUNT_OPTIONS: [usize; 9] = [5, 10, 20, 30, 50, 80, 100, 200, 500];
/// Discrete countdown lengths (minutes) offered by the timer selector.
pub const TIME_LIMIT_OPTIONS_MINS: [u64; 4] = [2, 5, 10, 15];

/// terminal typing speed test with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing speed test. Fetches a passage from a text provider, measures your words per minute and accuracy as you type, and shows an on-screen keyboard and progress bar."
)]
pub struct Cli {
    /// number of words in the passage
    #[clap(short = 'w', long)]
    words: Option<usize>,

    /// countdown length in minutes
    #[clap(short = 'm', long)]
    minutes: Option<u64>,

    /// custom passage to type (skips the text provider)
    #[clap(short = 'p', long)]
    passage: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

/// Owns the session, the countdown resource and everything the renderer
/// needs. All mutation happens through the event handlers below, one event
/// at a time.
pub struct App {
    pub session: Session,
    pub state: AppState,
    pub settings: Config,
    /// Typing tip shown next to the test; `None` until its fetch lands.
    pub tip: Option<String>,
    /// Most recently pressed character key, for the on-screen keyboard.
    pub active_key: Option<char>,
    timer: Option<Countdown>,
    /// Session generation; fetch completions from older generations are stale.
    epoch: u64,
    tx: Sender<AppEvent>,
    text_source: Arc<dyn TextSource>,
    config_store: Option<FileConfigStore>,
}

impl App {
    pub fn new(
        settings: Config,
        text_source: Arc<dyn TextSource>,
        tip_source: Arc<dyn TipSource>,
        tx: Sender<AppEvent>,
        config_store: Option<FileConfigStore>,
    ) -> Self {
        let app = Self {
            session: Session::new(settings.word_count, settings.limit_secs),
            state: AppState::Typing,
            settings,
            tip: None,
            active_key: None,
            timer: None,
            epoch: 0,
            tx,
            text_source,
            config_store,
        };
        source::spawn_passage_fetch(
            app.tx.clone(),
            Arc::clone(&app.text_source),
            app.settings.word_count,
            app.epoch,
        );
        source::spawn_tip_fetch(app.tx.clone(), tip_source);
        app
    }

    /// Handles one key event. Returns false when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        match self.state {
            AppState::Typing => match key.code {
                KeyCode::Esc => return false,
                KeyCode::Backspace => {
                    self.active_key = None;
                    self.step(SessionEvent::Backspace);
                }
                KeyCode::Enter => self.submit(),
                KeyCode::Left => self.restart(),
                KeyCode::Char(c) => {
                    self.active_key = Some(c.to_ascii_lowercase());
                    self.step(SessionEvent::Type(c));
                }
                _ => {
                    self.active_key = None;
                }
            },
            AppState::Results => match key.code {
                KeyCode::Esc => return false,
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('w') => self.cycle_word_count(),
                KeyCode::Char('t') => self.cycle_time_limit(),
                _ => {}
            },
        }

        true
    }

    pub fn on_tick(&mut self) {
        self.step(SessionEvent::Tick);
    }

    pub fn on_text_loaded(&mut self, epoch: u64, text: String) {
        // A fetch started for a session that has since been restarted
        if epoch != self.epoch {
            return;
        }
        self.step(SessionEvent::TextLoaded(text));
    }

    pub fn on_tip_loaded(&mut self, tip: String) {
        self.tip = Some(tip);
    }

    fn step(&mut self, event: SessionEvent) {
        self.session = self.session.apply(&event);
        if self.session.finished {
            self.state = AppState::Results;
        }
        self.sync_timer();
    }

    /// End the attempt and surface the summary; dismissing it restarts.
    fn submit(&mut self) {
        self.step(SessionEvent::Submit);
    }

    /// Full reset: fresh session, timer released, new passage fetch.
    fn restart(&mut self) {
        self.epoch += 1;
        self.session = Session::new(self.settings.word_count, self.settings.limit_secs);
        self.state = AppState::Typing;
        self.active_key = None;
        self.sync_timer();
        source::spawn_passage_fetch(
            self.tx.clone(),
            Arc::clone(&self.text_source),
            self.settings.word_count,
            self.epoch,
        );
    }

    fn cycle_word_count(&mut self) {
        self.settings.word_count = next_option(&WORD_COUNT_OPTIONS, self.settings.word_count);
        self.persist_settings();
        self.restart();
    }

    fn cycle_time_limit(&mut self) {
        let mins = next_option(&TIME_LIMIT_OPTIONS_MINS, self.settings.limit_secs / 60);
        self.settings.limit_secs = mins * 60;
        self.persist_settings();
        self.restart();
    }

    fn persist_settings(&self) {
        if let Some(store) = &self.config_store {
            if let Err(err) = store.save(&self.settings) {
                log::warn!("failed to persist settings: {err}");
            }
        }
    }

    /// Reconciles the countdown resource with the running flag: acquire when
    /// running and none is held, release otherwise. At most one handle lives
    /// at any time.
    fn sync_timer(&mut self) {
        if self.session.running {
            if self.timer.is_none() {
                self.timer = Some(Countdown::start(self.tx.clone(), TICK_INTERVAL));
            }
        } else {
            self.timer = None;
        }
    }
}

/// Next value in `options` after `current`, wrapping to the first.
fn next_option<T: Copy + PartialOrd>(options: &[T], current: T) -> T {
    options
        .iter()
        .copied()
        .find(|&option| option > current)
        .unwrap_or(options[0])
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }
    if cli.words == Some(0) || cli.minutes == Some(0) {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::InvalidValue,
            "word count and minutes must be positive",
        )
        .exit();
    }

    let store = FileConfigStore::new();
    let mut settings = store.load();
    if let Some(words) = cli.words {
        settings.word_count = words;
    }
    if let Some(minutes) = cli.minutes {
        settings.limit_secs = minutes * 60;
    }

    let text_source: Arc<dyn TextSource> = match cli.passage {
        Some(ref passage) => Arc::new(StaticTextSource(passage.clone())),
        None => Arc::new(RemoteTextSource::new()),
    };
    let tip_source: Arc<dyn TipSource> = Arc::new(RemoteTipSource::new());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    runtime::spawn_input_reader(tx.clone());

    let mut app = App::new(settings, text_source, tip_source, tx, Some(store));
    let res = run(&mut terminal, &mut app, &rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &Receiver<AppEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match rx.recv()? {
            AppEvent::Key(key) => {
                if !app.on_key(key) {
                    break;
                }
            }
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Text { epoch, text } => app.on_text_loaded(epoch, text),
            AppEvent::Tip(tip) => app.on_tip_loaded(tip),
        }
    }

    Ok(())
}
