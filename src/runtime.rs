use std::sync::mpsc::Sender;
use std::thread;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event stream consumed by the app loop. Keys and resizes come from
/// the terminal, ticks from the countdown, the rest from fetch threads.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// Passage fetch completed. `epoch` identifies the session generation the
    /// fetch was started for; stale completions are dropped by the receiver.
    Text { epoch: u64, text: String },
    Tip(String),
}

/// Spawns the crossterm reader thread feeding terminal events into `tx`.
/// The thread exits once the receiving end hangs up.
pub fn spawn_input_reader(tx: Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(CtEvent::Key(key)) => {
                if tx.send(AppEvent::Key(key)).is_err() {
                    break;
                }
            }
            Ok(CtEvent::Resize(_, _)) => {
                if tx.send(AppEvent::Resize).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}
