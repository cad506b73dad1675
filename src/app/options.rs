use std::time::Duration;

use crate::io::DocumentFormat;

/// Session-wide settings, built with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// When false, navigation requests from panels are ignored and only the root is edited.
    pub allow_deep_navigation: bool,
    /// Quiet period after the last text keystroke before the draft is parsed.
    pub debounce: Duration,
    pub text_format: DocumentFormat,
    pub test_timeout: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            allow_deep_navigation: false,
            debounce: Duration::from_millis(500),
            text_format: DocumentFormat::Json,
            test_timeout: Duration::from_secs(60),
        }
    }
}

impl EditorOptions {
    pub fn with_deep_navigation(mut self, enabled: bool) -> Self {
        self.allow_deep_navigation = enabled;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_text_format(mut self, format: DocumentFormat) -> Self {
        self.text_format = format;
        self
    }

    pub fn with_test_timeout(mut self, timeout: Duration) -> Self {
        self.test_timeout = timeout;
        self
    }
}
