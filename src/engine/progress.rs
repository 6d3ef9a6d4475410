//! Progress normalisation for UI integration
//!
//! Raw signals arrive from the remote-fetch engine as byte counters or
//! percentage strings, and not at all from the local clip path. The
//! [`ProgressNormalizer`] turns them into one stream of [`ProgressEvent`]s
//! whose displayed percent never goes backwards and whose last event is 100.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::domain::model::ProgressEvent;
use crate::ports::ProgressSink;

/// Percent used for the indeterminate "processing" state
pub const PROCESSING_PERCENT: f64 = 50.0;

/// Ceiling for engine-reported progress; only [`ProgressNormalizer::finish`] reaches 100
pub const ENGINE_CEILING_PERCENT: f64 = 99.9;

/// Smallest change worth re-emitting, matching the one-decimal display
const MIN_STEP: f64 = 0.1;

/// Status tag the engine uses while bytes are flowing
pub const STATUS_DOWNLOADING: &str = "downloading";

static ANSI_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("ansi escape regex"));

/// Raw progress signal payload
#[derive(Debug, Clone, PartialEq)]
pub enum RawSignal {
    /// Cumulative byte counter
    Bytes { downloaded: u64, total: u64 },
    /// Percentage string such as `" 42.0%"`
    PercentText(String),
}

/// One raw progress report from the remote-fetch engine
#[derive(Debug, Clone, PartialEq)]
pub struct RawProgress {
    pub status: String,
    pub signal: RawSignal,
}

impl RawProgress {
    pub fn bytes(downloaded: u64, total: u64) -> Self {
        Self {
            status: STATUS_DOWNLOADING.to_string(),
            signal: RawSignal::Bytes { downloaded, total },
        }
    }

    pub fn percent_text(text: impl Into<String>) -> Self {
        Self {
            status: STATUS_DOWNLOADING.to_string(),
            signal: RawSignal::PercentText(text.into()),
        }
    }

    /// Percent carried by this signal, `None` when it cannot be interpreted
    pub fn percent(&self) -> Option<f64> {
        match &self.signal {
            RawSignal::Bytes { downloaded, total } => {
                if *total == 0 {
                    return None;
                }
                Some(*downloaded as f64 / *total as f64 * 100.0)
            }
            RawSignal::PercentText(text) => parse_percent_text(text),
        }
    }
}

/// Parse `" 42.0%"`, tolerating colour escapes; `None` on anything else
pub fn parse_percent_text(text: &str) -> Option<f64> {
    let cleaned = ANSI_ESCAPE_RE.replace_all(text, "");
    let number = cleaned.replace('%', "");
    number.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Sink that forwards events over an unbounded channel to the foreground task
impl ProgressSink for UnboundedSender<ProgressEvent> {
    fn emit(&self, event: ProgressEvent) {
        // A closed receiver means nobody is watching any more.
        let _ = self.send(event);
    }
}

/// Turns raw signals into a non-regressing event stream
pub struct ProgressNormalizer {
    sink: Arc<dyn ProgressSink>,
    last_percent: Option<f64>,
    finished: bool,
}

impl ProgressNormalizer {
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            sink,
            last_percent: None,
            finished: false,
        }
    }

    /// Highest percent emitted so far
    pub fn last_percent(&self) -> Option<f64> {
        self.last_percent
    }

    /// Handle one raw signal; returns the event if one was emitted
    pub fn observe(&mut self, raw: &RawProgress) -> Option<ProgressEvent> {
        if raw.status != STATUS_DOWNLOADING {
            return None;
        }
        let Some(percent) = raw.percent() else {
            trace!("Ignoring uninterpretable progress signal: {:?}", raw.signal);
            return None;
        };
        let shown = self.displayed(percent.min(ENGINE_CEILING_PERCENT));
        self.emit(shown, format!("Downloading... {:.1}%", shown), false)
    }

    /// Synthetic mid-operation event for paths without granular progress
    pub fn processing(&mut self, status_text: impl Into<String>) -> Option<ProgressEvent> {
        let shown = self.displayed(PROCESSING_PERCENT);
        self.emit(shown, status_text.into(), true)
    }

    /// Terminal 100% event; only the first call emits
    pub fn finish(&mut self, status_text: impl Into<String>) -> Option<ProgressEvent> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.emit(100.0, status_text.into(), true)
    }

    fn displayed(&self, percent: f64) -> f64 {
        let clamped = percent.clamp(0.0, 100.0);
        match self.last_percent {
            Some(last) => clamped.max(last),
            None => clamped,
        }
    }

    fn emit(&mut self, percent: f64, status_text: String, force: bool) -> Option<ProgressEvent> {
        if self.finished && !force {
            return None;
        }
        if let Some(last) = self.last_percent {
            if !force && percent - last < MIN_STEP {
                return None;
            }
        }
        self.last_percent = Some(percent);
        let event = ProgressEvent::new(percent, status_text);
        self.sink.emit(event.clone());
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn normalizer() -> (ProgressNormalizer, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ProgressNormalizer::new(Arc::new(tx)), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_bytes_signal() {
        let (mut n, mut rx) = normalizer();
        let event = n.observe(&RawProgress::bytes(250, 1000)).unwrap();
        assert_eq!(event.percent, 25.0);
        assert_eq!(event.status_text, "Downloading... 25.0%");
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_zero_total_is_ignored() {
        let (mut n, mut rx) = normalizer();
        assert!(n.observe(&RawProgress::bytes(10, 0)).is_none());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_percent_text_signal() {
        let (mut n, _rx) = normalizer();
        assert_eq!(n.observe(&RawProgress::percent_text(" 42.5%")).unwrap().percent, 42.5);
        assert_eq!(
            n.observe(&RawProgress::percent_text("\u{1b}[0;94m 60.0%\u{1b}[0m")).unwrap().percent,
            60.0
        );
    }

    #[test]
    fn test_unparseable_percent_is_swallowed() {
        let (mut n, mut rx) = normalizer();
        assert!(n.observe(&RawProgress::percent_text("N/A")).is_none());
        assert!(n.observe(&RawProgress::percent_text("")).is_none());
        assert!(drain(&mut rx).is_empty());
        assert_eq!(n.last_percent(), None);
    }

    #[test]
    fn test_non_downloading_status_ignored() {
        let (mut n, _rx) = normalizer();
        let raw = RawProgress {
            status: "finished".to_string(),
            signal: RawSignal::Bytes {
                downloaded: 10,
                total: 10,
            },
        };
        assert!(n.observe(&raw).is_none());
    }

    #[test]
    fn test_displayed_percent_never_regresses() {
        let (mut n, mut rx) = normalizer();
        n.observe(&RawProgress::bytes(80, 100));
        // second stream of a merged download restarts its own counter
        n.observe(&RawProgress::bytes(10, 100));
        n.observe(&RawProgress::bytes(90, 100));
        n.finish("Download completed!");

        let events = drain(&mut rx);
        let percents: Vec<f64> = events.iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![80.0, 90.0, 100.0]);
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(events.last().unwrap().status_text, "Download completed!");
    }

    #[test]
    fn test_tiny_changes_not_reemitted() {
        let (mut n, mut rx) = normalizer();
        n.observe(&RawProgress::bytes(500, 1000));
        n.observe(&RawProgress::bytes(5001, 10000));
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let (mut n, _rx) = normalizer();
        assert_eq!(
            n.observe(&RawProgress::percent_text("150%")).unwrap().percent,
            ENGINE_CEILING_PERCENT
        );
    }

    #[test]
    fn test_engine_signal_never_reports_complete() {
        let (mut n, mut rx) = normalizer();
        let event = n.observe(&RawProgress::bytes(100, 100)).unwrap();
        assert_eq!(event.percent, ENGINE_CEILING_PERCENT);
        assert!(!event.is_complete());

        n.finish("Download completed!");
        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(events[1].is_complete());
    }

    #[test]
    fn test_local_path_sequence() {
        let (mut n, mut rx) = normalizer();
        n.processing("Processing clip (10s to 20s)...");
        n.finish("Clip created successfully!");
        n.finish("again");

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].percent, PROCESSING_PERCENT);
        assert_eq!(events[1].percent, 100.0);
    }

    #[test]
    fn test_closed_receiver_does_not_panic() {
        let (mut n, rx) = normalizer();
        drop(rx);
        assert!(n.observe(&RawProgress::bytes(1, 2)).is_some());
    }
}
