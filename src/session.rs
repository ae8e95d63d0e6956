use crate::util::{matching_chars, word_count};

/// One typing attempt against a target passage under a countdown.
///
/// The struct is a plain value; every transition goes through [`Session::apply`],
/// which returns the next state and leaves the old one untouched. Metrics are
/// derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Passage the user is asked to type. Empty until a fetch completes.
    pub target: String,
    /// Raw input, verbatim. No trimming.
    pub input: String,
    pub elapsed_secs: u64,
    pub limit_secs: u64,
    pub word_count: usize,
    /// Countdown is live. Never true together with `finished`.
    pub running: bool,
    /// Attempt is over (passage matched, time expired, or submitted).
    pub finished: bool,
    /// Target text has arrived (from the provider or the fallback).
    pub loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A passage fetch completed; the payload is already truncated to size.
    TextLoaded(String),
    Type(char),
    Backspace,
    /// One whole second of countdown elapsed.
    Tick,
    /// The user gave up on matching the passage and asked for the summary.
    Submit,
}

impl Session {
    pub fn new(word_count: usize, limit_secs: u64) -> Self {
        Self {
            target: String::new(),
            input: String::new(),
            elapsed_secs: 0,
            limit_secs,
            word_count,
            running: false,
            finished: false,
            loaded: false,
        }
    }

    /// Pure transition function: `(state, event) -> state`.
    pub fn apply(&self, event: &SessionEvent) -> Session {
        let mut next = self.clone();
        match event {
            SessionEvent::TextLoaded(text) => {
                next.target = text.clone();
                next.loaded = true;
            }
            SessionEvent::Type(c) => {
                if next.finished || !next.loaded {
                    return next;
                }
                next.input.push(*c);
                if !next.running && !next.input.is_empty() {
                    next.running = true;
                }
                if next.input == next.target {
                    next.running = false;
                    next.finished = true;
                }
            }
            SessionEvent::Backspace => {
                if next.finished || !next.loaded {
                    return next;
                }
                next.input.pop();
            }
            SessionEvent::Tick => {
                if !next.running {
                    return next;
                }
                next.elapsed_secs += 1;
                if next.elapsed_secs >= next.limit_secs {
                    next.elapsed_secs = next.limit_secs;
                    next.running = false;
                    next.finished = true;
                }
            }
            SessionEvent::Submit => {
                if !next.loaded {
                    return next;
                }
                next.running = false;
                next.finished = true;
            }
        }
        next
    }

    /// Words per minute over the whole target passage. Undefined until the
    /// first second has elapsed.
    pub fn wpm(&self) -> Option<u32> {
        if self.elapsed_secs == 0 {
            return None;
        }
        let words = word_count(&self.target) as f64;
        let minutes = self.elapsed_secs as f64 / 60.0;
        Some((words / minutes).round() as u32)
    }

    /// Percentage of input characters matching the target at the same
    /// position, over the input length. 0 for empty input.
    pub fn accuracy(&self) -> u32 {
        let len = self.input.chars().count();
        if len == 0 {
            return 0;
        }
        let matching = matching_chars(&self.input, &self.target);
        ((matching as f64 / len as f64) * 100.0).round() as u32
    }

    /// How far through the passage the input reaches, capped at 100.
    pub fn progress(&self) -> u16 {
        let target_len = self.target.chars().count();
        if target_len == 0 {
            return 0;
        }
        let pct = self.input.chars().count() as f64 * 100.0 / target_len as f64;
        pct.min(100.0) as u16
    }

    pub fn remaining_secs(&self) -> u64 {
        self.limit_secs.saturating_sub(self.elapsed_secs)
    }
}
