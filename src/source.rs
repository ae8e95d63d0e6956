use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::runtime::AppEvent;
use crate::util::truncate_words;

pub const TEXT_ENDPOINT: &str = "https://baconipsum.com/api/?type=all-meat&paras=1";
pub const TIP_ENDPOINT: &str = "https://api.typingtips.com/getTip";

/// Substituted whenever the text provider is unreachable or returns garbage.
pub const FALLBACK_PASSAGE: &str = "Sample text for testing purposes.";
/// Substituted whenever the tip provider is unreachable or returns garbage.
pub const FALLBACK_TIP: &str = "Practice regularly and focus on accuracy before speed.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] Box<ureq::Error>),
    #[error("malformed response: {0}")]
    Malformed(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supplies the passage the user will type.
pub trait TextSource: Send + Sync {
    fn passage(&self, word_count: usize) -> Result<String, SourceError>;
}

/// Supplies the one-off typing tip shown next to the test.
pub trait TipSource: Send + Sync {
    fn tip(&self) -> Result<String, SourceError>;
}

fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build()
}

/// Text provider backed by the lorem-ipsum HTTP service. The response is a
/// JSON array of paragraph strings; the first one is truncated to exactly the
/// requested number of words.
pub struct RemoteTextSource {
    agent: ureq::Agent,
    endpoint: String,
}

impl RemoteTextSource {
    pub fn new() -> Self {
        Self::with_endpoint(TEXT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            agent: agent(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for RemoteTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for RemoteTextSource {
    fn passage(&self, word_count: usize) -> Result<String, SourceError> {
        // Ten words per sentence is what the provider averages
        let sentences = word_count.div_ceil(10);
        let url = format!("{}&sentences={}", self.endpoint, sentences);

        let paragraphs: Vec<String> = self.agent.get(&url).call().map_err(Box::new)?.into_json()?;
        let first = paragraphs
            .first()
            .ok_or(SourceError::Malformed("empty paragraph list"))?;

        Ok(truncate_words(first, word_count))
    }
}

#[derive(Debug, Deserialize)]
struct TipPayload {
    tip: String,
}

pub struct RemoteTipSource {
    agent: ureq::Agent,
    endpoint: String,
}

impl RemoteTipSource {
    pub fn new() -> Self {
        Self::with_endpoint(TIP_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            agent: agent(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for RemoteTipSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TipSource for RemoteTipSource {
    fn tip(&self) -> Result<String, SourceError> {
        let payload: TipPayload = self
            .agent
            .get(&self.endpoint)
            .call()
            .map_err(Box::new)?
            .into_json()?;
        Ok(payload.tip)
    }
}

/// Fixed passage, returned verbatim. Backs the `--passage` flag and tests.
pub struct StaticTextSource(pub String);

impl TextSource for StaticTextSource {
    fn passage(&self, _word_count: usize) -> Result<String, SourceError> {
        Ok(self.0.clone())
    }
}

/// Fixed tip, for tests.
pub struct StaticTipSource(pub String);

impl TipSource for StaticTipSource {
    fn tip(&self) -> Result<String, SourceError> {
        Ok(self.0.clone())
    }
}

/// Fire-and-forget passage fetch. Posts [`AppEvent::Text`] tagged with
/// `epoch` once the source resolves; a failure is logged and replaced by the
/// fallback sentence so the session always ends up loaded.
pub fn spawn_passage_fetch(
    tx: Sender<AppEvent>,
    source: Arc<dyn TextSource>,
    word_count: usize,
    epoch: u64,
) {
    thread::spawn(move || {
        let text = match source.passage(word_count) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("text provider unavailable, using fallback: {err}");
                FALLBACK_PASSAGE.to_string()
            }
        };
        let _ = tx.send(AppEvent::Text { epoch, text });
    });
}

/// Fire-and-forget tip fetch, run once at startup. No retry.
pub fn spawn_tip_fetch(tx: Sender<AppEvent>, source: Arc<dyn TipSource>) {
    thread::spawn(move || {
        let tip = match source.tip() {
            Ok(tip) => tip,
            Err(err) => {
                log::warn!("tip provider unavailable, using fallback: {err}");
                FALLBACK_TIP.to_string()
            }
        };
        let _ = tx.send(AppEvent::Tip(tip));
    });
}
