use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::runtime::AppEvent;

/// The one countdown resource. Owns a background thread that posts a
/// [`AppEvent::Tick`] every `interval`; dropping the handle stops the thread
/// through its shutdown channel, so acquisition and release stay tied to the
/// session's running flag at the call site. Ticks already queued when the
/// handle is dropped are ignored by the reducer.
pub struct Countdown {
    _shutdown: Sender<()>,
}

impl Countdown {
    pub fn start(events: Sender<AppEvent>, interval: Duration) -> Self {
        let (shutdown, stopped) = mpsc::channel::<()>();

        thread::spawn(move || loop {
            match stopped.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if events.send(AppEvent::Tick).is_err() {
                        break;
                    }
                }
                // Explicit stop or the handle was dropped
                _ => break,
            }
        });

        Self { _shutdown: shutdown }
    }
}
