//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{DashboardView, WorkflowView};

pub enum UiEvent {
    Info(String),
    Workflow(WorkflowView),
    Dashboard(DashboardView),
    Health { healthy: bool, detail: String },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Server,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("failed to connect")
            || message_lower.contains("connection")
            || message_lower.contains("request failed")
            || message_lower.contains("timed out")
            || message_lower.contains("dns")
            || message_lower.contains("disconnected")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("required")
            || message_lower.contains("please")
            || message_lower.contains("missing")
            || message_lower.contains("invalid")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("error:")
            || message_lower.contains("unknown error")
        {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Validation => "Check your input",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Unknown => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_unreachable_backend_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Error: request failed: error sending request for url (http://127.0.0.1:8080/api/v1/register)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn classifies_local_checks_as_validation() {
        let err = UiError::from_message(UiErrorContext::General, "Please describe your idea.");
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::General);
    }

    #[test]
    fn classifies_prefixed_server_messages() {
        let err = UiError::from_message(UiErrorContext::General, "Ledger error: Unknown error");
        assert_eq!(err.category(), UiErrorCategory::Server);
        assert_eq!(err_label(err.category()), "Server");
    }
}
