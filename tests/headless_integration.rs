use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use typerate::runtime::AppEvent;
use typerate::session::{Session, SessionEvent};
use typerate::source::{
    self, SourceError, StaticTextSource, StaticTipSource, TextSource, FALLBACK_PASSAGE,
    FALLBACK_TIP,
};
use typerate::timer::Countdown;

// Headless integration without a TTY: drive the session reducer with the
// same events the app loop would dispatch.

fn recv(rx: &mpsc::Receiver<AppEvent>) -> AppEvent {
    rx.recv_timeout(Duration::from_secs(5)).expect("event")
}

#[test]
fn headless_typing_flow_completes() {
    let (tx, rx) = mpsc::channel();
    let passage: Arc<dyn TextSource> = Arc::new(StaticTextSource("hi there".to_string()));
    source::spawn_passage_fetch(tx.clone(), passage, 2, 0);
    source::spawn_tip_fetch(tx, Arc::new(StaticTipSource("sit up straight".to_string())));

    let mut session = Session::new(2, 120);
    let mut tip = None;

    // Two fetch completions arrive in whatever order the threads finish
    for _ in 0..2 {
        match recv(&rx) {
            AppEvent::Text { epoch, text } => {
                assert_eq!(epoch, 0);
                session = session.apply(&SessionEvent::TextLoaded(text));
            }
            AppEvent::Tip(text) => tip = Some(text),
            other => panic!("unexpected event {other:?}"),
        }
    }

    assert!(session.loaded);
    assert_eq!(tip.as_deref(), Some("sit up straight"));

    for c in "hi there".chars() {
        session = session.apply(&SessionEvent::Type(c));
    }

    assert!(session.finished, "session should have finished typing");
    assert!(!session.running);
    assert_eq!(session.accuracy(), 100);
    assert_eq!(session.progress(), 100);
}

#[test]
fn headless_timed_session_finishes_by_countdown() {
    let (tx, rx) = mpsc::channel();
    let mut session = Session::new(5, 2)
        .apply(&SessionEvent::TextLoaded("a passage nobody finishes".into()))
        .apply(&SessionEvent::Type('a'));
    assert!(session.running);

    // Real countdown resource at a fast test interval
    let countdown = Countdown::start(tx, Duration::from_millis(5));
    while !session.finished {
        match recv(&rx) {
            AppEvent::Tick => session = session.apply(&SessionEvent::Tick),
            other => panic!("unexpected event {other:?}"),
        }
    }
    drop(countdown);

    assert_eq!(session.elapsed_secs, 2);
    assert!(!session.running);

    // Frozen: a queued tick and further keystrokes change nothing
    let after = session
        .apply(&SessionEvent::Tick)
        .apply(&SessionEvent::Type('x'));
    assert_eq!(after, session);
}

#[test]
fn headless_provider_outage_falls_back() {
    struct DownSource;
    impl TextSource for DownSource {
        fn passage(&self, _: usize) -> Result<String, SourceError> {
            Err(SourceError::Malformed("service down"))
        }
    }
    struct DownTip;
    impl typerate::source::TipSource for DownTip {
        fn tip(&self) -> Result<String, SourceError> {
            Err(SourceError::Malformed("service down"))
        }
    }

    let (tx, rx) = mpsc::channel();
    source::spawn_passage_fetch(tx.clone(), Arc::new(DownSource), 30, 0);
    source::spawn_tip_fetch(tx, Arc::new(DownTip));

    let mut session = Session::new(30, 120);
    let mut tip = None;
    for _ in 0..2 {
        match recv(&rx) {
            AppEvent::Text { text, .. } => {
                session = session.apply(&SessionEvent::TextLoaded(text));
            }
            AppEvent::Tip(text) => tip = Some(text),
            other => panic!("unexpected event {other:?}"),
        }
    }

    assert_eq!(session.target, FALLBACK_PASSAGE);
    assert!(session.loaded);
    assert_eq!(tip.as_deref(), Some(FALLBACK_TIP));

    // Typing proceeds against the fallback
    let session = session.apply(&SessionEvent::Type('S'));
    assert!(session.running);
    assert_eq!(session.accuracy(), 100);
}
