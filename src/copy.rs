//! Copying a citation element to the clipboard.
//!
//! One invocation is a straight line: look the element up, write its text to
//! the clipboard, and only once that write has completed show the
//! confirmation. A missing element stops the invocation before the clipboard
//! is touched.

use crate::clipboard::{ClipboardError, ClipboardService};
use crate::document::{Document, Lookup};
use crate::notify::Notifier;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const COPY_CONFIRMATION: &str = "BibTeX copied to clipboard!";

/// What to do when the clipboard write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Return the failure to the caller.
    #[default]
    Report,
    /// Drop it: no notification, nothing in the result, a debug log line.
    Silent,
}

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("no element with id '{id}'")]
    NotFound { id: String },
    #[error(transparent)]
    ClipboardWriteFailed(#[from] ClipboardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The write failed and the failure was swallowed under
    /// [`ErrorPolicy::Silent`].
    Dropped,
}

pub struct CopyHandler<D, C, N> {
    document: D,
    clipboard: C,
    notifier: N,
    on_error: ErrorPolicy,
}

impl<D, C, N> CopyHandler<D, C, N>
where
    D: Document,
    C: ClipboardService,
    N: Notifier,
{
    pub fn new(document: D, clipboard: C, notifier: N) -> Self {
        Self {
            document,
            clipboard,
            notifier,
            on_error: ErrorPolicy::default(),
        }
    }

    pub fn with_error_policy(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }

    pub async fn copy_to_clipboard(&self, element_id: &str) -> Result<CopyOutcome, CopyError> {
        let text = match self.document.lookup(element_id) {
            Lookup::Found(text) => text,
            Lookup::NotFound => {
                warn!(id = %element_id, "element not found");
                return Err(CopyError::NotFound {
                    id: element_id.to_string(),
                });
            }
        };

        debug!(id = %element_id, bytes = text.len(), "writing element text to clipboard");

        match self.clipboard.write_text(&text).await {
            Ok(()) => {
                info!(id = %element_id, "copied to clipboard");
                self.notifier.notify(COPY_CONFIRMATION);
                Ok(CopyOutcome::Copied)
            }
            Err(e) => match self.on_error {
                ErrorPolicy::Report => Err(e.into()),
                ErrorPolicy::Silent => {
                    debug!(id = %element_id, error = %e, "clipboard write failed, dropped");
                    Ok(CopyOutcome::Dropped)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        WriteStarted(String),
        WriteFinished(String),
        Notified(String),
    }

    type Log = Arc<Mutex<Vec<Event>>>;

    struct FakeDocument(HashMap<String, String>);

    impl FakeDocument {
        fn with(id: &str, text: &str) -> Self {
            Self(HashMap::from([(id.to_string(), text.to_string())]))
        }
    }

    impl Document for FakeDocument {
        fn lookup(&self, id: &str) -> Lookup {
            match self.0.get(id) {
                Some(text) => Lookup::Found(text.clone()),
                None => Lookup::NotFound,
            }
        }
    }

    struct FakeClipboard {
        log: Log,
        contents: Arc<Mutex<Option<String>>>,
        fail: bool,
        delay: Duration,
        // When set, only writes of this text are delayed.
        slow_text: Option<String>,
    }

    #[async_trait]
    impl ClipboardService for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.log.lock().unwrap().push(Event::WriteStarted(text.to_string()));
            let delayed = self.slow_text.as_deref().is_none_or(|slow| slow == text);
            if delayed && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(ClipboardError::Rejected("permission denied".to_string()));
            }
            *self.contents.lock().unwrap() = Some(text.to_string());
            self.log.lock().unwrap().push(Event::WriteFinished(text.to_string()));
            Ok(())
        }
    }

    struct FakeNotifier {
        log: Log,
    }

    impl Notifier for FakeNotifier {
        fn notify(&self, message: &str) {
            self.log.lock().unwrap().push(Event::Notified(message.to_string()));
        }
    }

    struct Harness {
        log: Log,
        contents: Arc<Mutex<Option<String>>>,
        handler: CopyHandler<FakeDocument, FakeClipboard, FakeNotifier>,
    }

    fn harness(document: FakeDocument, fail: bool, delay: Duration) -> Harness {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let contents = Arc::new(Mutex::new(None));
        let clipboard = FakeClipboard {
            log: log.clone(),
            contents: contents.clone(),
            fail,
            delay,
            slow_text: None,
        };
        let notifier = FakeNotifier { log: log.clone() };
        Harness {
            log,
            contents,
            handler: CopyHandler::new(document, clipboard, notifier),
        }
    }

    fn writes(log: &Log) -> usize {
        log.lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Event::WriteStarted(_)))
            .count()
    }

    fn notifications(log: &Log) -> Vec<String> {
        log.lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Notified(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_copies_text_and_notifies() {
        let h = harness(
            FakeDocument::with("ref1", "@article{smith2020, ...}"),
            false,
            Duration::ZERO,
        );

        let outcome = h.handler.copy_to_clipboard("ref1").await.unwrap();

        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(
            h.contents.lock().unwrap().as_deref(),
            Some("@article{smith2020, ...}")
        );
        assert_eq!(writes(&h.log), 1);
        assert_eq!(notifications(&h.log), vec![COPY_CONFIRMATION.to_string()]);
    }

    #[tokio::test]
    async fn test_notification_follows_write_completion() {
        let h = harness(
            FakeDocument::with("ref1", "text"),
            false,
            Duration::from_millis(20),
        );

        h.handler.copy_to_clipboard("ref1").await.unwrap();

        assert_eq!(
            *h.log.lock().unwrap(),
            vec![
                Event::WriteStarted("text".to_string()),
                Event::WriteFinished("text".to_string()),
                Event::Notified(COPY_CONFIRMATION.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_element_never_touches_clipboard() {
        let h = harness(FakeDocument::with("ref1", "text"), false, Duration::ZERO);

        let err = h.handler.copy_to_clipboard("missing").await.unwrap_err();

        assert!(matches!(err, CopyError::NotFound { ref id } if id == "missing"));
        assert_eq!(err.to_string(), "no element with id 'missing'");
        assert_eq!(writes(&h.log), 0);
        assert!(notifications(&h.log).is_empty());
        assert!(h.contents.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_element_reported_even_when_silent() {
        let h = harness(FakeDocument::with("ref1", "text"), false, Duration::ZERO);
        let handler = h.handler.with_error_policy(ErrorPolicy::Silent);

        let err = handler.copy_to_clipboard("missing").await.unwrap_err();
        assert!(matches!(err, CopyError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_write_failure_reported() {
        let h = harness(FakeDocument::with("ref1", "text"), true, Duration::ZERO);

        let err = h.handler.copy_to_clipboard("ref1").await.unwrap_err();

        assert!(matches!(err, CopyError::ClipboardWriteFailed(_)));
        assert_eq!(err.to_string(), "failed to copy text to clipboard: permission denied");
        assert!(notifications(&h.log).is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_silent() {
        let h = harness(FakeDocument::with("ref1", "text"), true, Duration::ZERO);
        let log = h.log.clone();
        let handler = h.handler.with_error_policy(ErrorPolicy::Silent);

        let outcome = handler.copy_to_clipboard("ref1").await.unwrap();

        assert_eq!(outcome, CopyOutcome::Dropped);
        assert_eq!(writes(&log), 1);
        assert!(notifications(&log).is_empty());
    }

    #[tokio::test]
    async fn test_repeated_copies_notify_each_time() {
        let h = harness(FakeDocument::with("ref1", "same"), false, Duration::ZERO);

        h.handler.copy_to_clipboard("ref1").await.unwrap();
        h.handler.copy_to_clipboard("ref1").await.unwrap();

        assert_eq!(writes(&h.log), 2);
        assert_eq!(notifications(&h.log).len(), 2);
        assert_eq!(h.contents.lock().unwrap().as_deref(), Some("same"));
    }

    #[tokio::test]
    async fn test_concurrent_copies_last_writer_wins() {
        let document = FakeDocument(HashMap::from([
            ("slow".to_string(), "first".to_string()),
            ("fast".to_string(), "second".to_string()),
        ]));
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let contents = Arc::new(Mutex::new(None));
        let clipboard = FakeClipboard {
            log: log.clone(),
            contents: contents.clone(),
            fail: false,
            delay: Duration::from_millis(50),
            slow_text: Some("first".to_string()),
        };
        let handler = CopyHandler::new(document, clipboard, FakeNotifier { log: log.clone() });

        let (a, b) = tokio::join!(
            handler.copy_to_clipboard("slow"),
            handler.copy_to_clipboard("fast")
        );
        assert_eq!(a.unwrap(), CopyOutcome::Copied);
        assert_eq!(b.unwrap(), CopyOutcome::Copied);

        // The first write started first but completed last, so its text stays.
        let writes: Vec<Event> = log
            .lock()
            .unwrap()
            .iter()
            .filter(|e| !matches!(e, Event::Notified(_)))
            .cloned()
            .collect();
        assert_eq!(
            writes,
            vec![
                Event::WriteStarted("first".to_string()),
                Event::WriteStarted("second".to_string()),
                Event::WriteFinished("second".to_string()),
                Event::WriteFinished("first".to_string()),
            ]
        );
        assert_eq!(contents.lock().unwrap().as_deref(), Some("first"));
        assert_eq!(notifications(&log).len(), 2);
    }

    #[tokio::test]
    async fn test_works_with_boxed_collaborators() {
        let document: Box<dyn Document> = Box::new(FakeDocument::with("k", "v"));
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let notifier: Box<dyn Notifier> = Box::new(FakeNotifier { log: log.clone() });
        let clipboard = FakeClipboard {
            log: log.clone(),
            contents: Arc::new(Mutex::new(None)),
            fail: false,
            delay: Duration::ZERO,
            slow_text: None,
        };

        let handler = CopyHandler::new(document, clipboard, notifier);
        assert_eq!(handler.copy_to_clipboard("k").await.unwrap(), CopyOutcome::Copied);
        assert_eq!(notifications(&log), vec![COPY_CONFIRMATION.to_string()]);
    }
}
