// src/report/mod.rs

//! Task-failure reporting.
//!
//! Every failure is logged with a bordered header; when desktop
//! notifications are enabled the configured notifier command is spawned
//! fire-and-forget with the same header/detail. The reporter never raises
//! errors itself: a broken notifier cannot undo the console log or crash
//! the reporting path.

use tracing::error;

use crate::exec::shell::{fill_template, spawn_fire_and_forget};
use crate::task::TaskName;

/// Reporter behaviour, fixed at startup.
///
/// Pipelines that must silence notifications (e.g. `deploy`) get different
/// options constructed up front; nothing toggles these at run time.
#[derive(Debug, Clone, Default)]
pub struct ReporterOptions {
    /// Whether failures also raise a desktop notification.
    pub desktop_notifications: bool,

    /// Notifier command template with `{title}` and `{message}` slots.
    pub notify_command: Option<String>,
}

/// A single task failure at the moment it happened. Transient: built by the
/// scheduler and consumed immediately by [`ErrorReporter::report_record`].
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub task: TaskName,
    pub header: String,
    pub detail: String,
}

impl ErrorRecord {
    pub fn new(
        task: impl Into<TaskName>,
        header: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            task: task.into(),
            header: header.into(),
            detail: detail.into(),
        }
    }
}

/// Formats and surfaces task failures without halting unrelated tasks.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    options: ReporterOptions,
}

impl ErrorReporter {
    pub fn new(options: ReporterOptions) -> Self {
        Self { options }
    }

    /// Log the failure with a bordered header, then (optionally) notify.
    ///
    /// The border is `header.len() + 4` dashes on the line above and below.
    pub fn report(&self, task: &str, header: &str, detail: &str) {
        let border = "-".repeat(header.len() + 4);
        error!(task = %task, "\n{border}\n  {header}\n{border}\n{detail}");

        if self.options.desktop_notifications {
            if let Some(template) = &self.options.notify_command {
                let command =
                    fill_template(template, &[("title", header), ("message", detail)]);
                spawn_fire_and_forget(&command);
            }
        }
    }

    pub fn report_record(&self, record: &ErrorRecord) {
        self.report(&record.task, &record.header, &record.detail);
    }
}
