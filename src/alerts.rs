// Alert hook: how failures reach the user
//
// The view layer renders alerts; the core only reports them.

use log::warn;
use std::sync::{Arc, Mutex};

pub trait AlertSink {
    fn show_alert(&self, header: &str, message: &str);
}

/// Writes alerts to the log. Used when no view is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlerts;

impl AlertSink for LogAlerts {
    fn show_alert(&self, header: &str, message: &str) {
        warn!("{}: {}", header, message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub header: String,
    pub message: String,
}

/// Keeps every alert so a caller (or a test) can inspect them later.
/// Clones share the same list.
#[derive(Debug, Default, Clone)]
pub struct RecordingAlerts {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        match self.alerts.lock() {
            Ok(alerts) => alerts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.alerts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Alert> {
        self.alerts().pop()
    }

    pub fn clear(&self) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.clear();
        }
    }
}

impl AlertSink for RecordingAlerts {
    fn show_alert(&self, header: &str, message: &str) {
        let alert = Alert {
            header: header.to_string(),
            message: message.to_string(),
        };
        match self.alerts.lock() {
            Ok(mut alerts) => alerts.push(alert),
            Err(poisoned) => poisoned.into_inner().push(alert),
        }
    }
}
