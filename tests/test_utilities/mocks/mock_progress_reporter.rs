use bom_convert::prelude::*;
use std::sync::{Arc, Mutex};

/// A message captured by [`MockProgressReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported {
    Status(String),
    Step {
        current: usize,
        total: usize,
        message: Option<String>,
    },
    Error(String),
    Completion(String),
}

/// Mock ProgressReporter for testing that captures every report in order
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    pub reports: Arc<Mutex<Vec<Reported>>>,
}

#[allow(dead_code)]
impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Reported> {
        self.reports.lock().unwrap().clone()
    }

    /// Downgrade step labels, in the order they were reported
    pub fn step_labels(&self) -> Vec<String> {
        self.reports()
            .into_iter()
            .filter_map(|r| match r {
                Reported::Step { message, .. } => message,
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<String> {
        self.reports()
            .into_iter()
            .filter_map(|r| match r {
                Reported::Completion(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, report: Reported) {
        self.reports.lock().unwrap().push(report);
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.push(Reported::Status(message.to_string()));
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.push(Reported::Step {
            current,
            total,
            message: message.map(str::to_string),
        });
    }

    fn report_error(&self, message: &str) {
        self.push(Reported::Error(message.to_string()));
    }

    fn report_completion(&self, message: &str) {
        self.push(Reported::Completion(message.to_string()));
    }
}
