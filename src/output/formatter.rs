use colored::*;
use std::fmt;

use crate::constants::SAVED_LABEL;
use crate::model::{ExtractionResult, FailureKind};

/// Format an extraction result for display.
///
/// Success is the save path followed by a blank line and the content.
/// Failure is the classified message on its own.
pub fn format_result(result: &ExtractionResult, colored: bool) -> String {
    match result {
        ExtractionResult::Success {
            saved_path,
            content,
        } => {
            let path = saved_path.display().to_string();
            if colored {
                format!("{}{}\n\n{}", SAVED_LABEL.green(), path.cyan(), content)
            } else {
                format!("{}{}\n\n{}", SAVED_LABEL, path, content)
            }
        }
        ExtractionResult::Failure(failure) => {
            if colored {
                let label = match failure.kind {
                    FailureKind::Timeout | FailureKind::ConnectionError => {
                        failure.kind.label().yellow()
                    }
                    FailureKind::ApplicationError | FailureKind::UnknownError => {
                        failure.kind.label().red()
                    }
                };
                format!("[{}] {}", label, failure.message)
            } else {
                failure.message.clone()
            }
        }
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_result(self, false))
    }
}
