#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn value_updated(&mut self) {
        self.message = "Value updated".to_string();
    }

    pub fn draft_rejected(&mut self) {
        self.message = "Text draft is invalid; last good version kept".to_string();
    }

    pub fn testing(&mut self, label: &str) {
        self.message = format!("Testing {label}...");
    }

    pub fn test_passed(&mut self) {
        self.message = "Component test passed".to_string();
    }

    pub fn test_failed(&mut self, message: Option<&str>) {
        self.message = match message {
            Some(message) => format!("Component test failed: {message}"),
            None => "Component test failed".to_string(),
        };
    }

    pub fn saved(&mut self) {
        self.message = "Changes saved".to_string();
    }

    pub fn discarded(&mut self) {
        self.message = "Changes discarded".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
