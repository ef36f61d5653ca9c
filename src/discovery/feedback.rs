//! Progress narration for discovery.

use std::fmt;

/// Optional sink for human-readable progress messages.
///
/// Messages are informational only; nothing in discovery depends on whether
/// anyone listens. Every message is also logged at `debug`.
#[derive(Clone, Copy, Default)]
pub struct Feedback<'a> {
    sink: Option<&'a (dyn Fn(&str) + Sync)>,
}

impl<'a> Feedback<'a> {
    /// Forward messages to `sink`.
    pub fn new(sink: &'a (dyn Fn(&str) + Sync)) -> Self {
        Feedback { sink: Some(sink) }
    }

    /// Discard messages (they are still logged).
    pub fn none() -> Self {
        Feedback { sink: None }
    }

    pub fn say(&self, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        tracing::debug!("{}", msg);
        if let Some(sink) = self.sink {
            sink(msg);
        }
    }
}

impl fmt::Debug for Feedback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feedback")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
