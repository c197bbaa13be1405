use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure classes surfaced to callers; each one owns a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecfitErrorCategory {
    /// Malformed arrays, settings or request documents.
    InputValidationError,
    /// Unreadable or unwritable files.
    IoSystemError,
    /// Well-formed input the model cannot evaluate, e.g. a fit window off the grid.
    ComputationError,
    /// A result that violates the model's own guarantees.
    InternalError,
}

impl SpecfitErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InputValidationError => "input",
            Self::IoSystemError => "io",
            Self::ComputationError => "computation",
            Self::InternalError => "internal",
        }
    }
}

/// Categorised evaluation failure with a stable placeholder such as `RUN.INDEX_NOT_FOUND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecfitError {
    category: SpecfitErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl SpecfitError {
    pub fn new(
        category: SpecfitErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            SpecfitErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SpecfitErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SpecfitErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SpecfitErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> SpecfitErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for SpecfitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error [{}] {}",
            self.category.label(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for SpecfitError {}
