//! Validation result for decrypted snapshots

/// Errors block an import; warnings are reported and never block it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff there are no errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Get a summary of the problems found
    pub fn summary(&self) -> String {
        match (self.errors.len(), self.warnings.len()) {
            (0, 0) => "Valid".to_string(),
            (0, w) => format!("Valid with {} warning(s)", w),
            (e, w) => format!("Invalid: {} error(s), {} warning(s)", e, w),
        }
    }
}
