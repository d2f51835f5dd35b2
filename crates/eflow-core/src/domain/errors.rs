pub type EflowResult<T> = Result<T, EflowError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EflowErrorCategory {
    InputValidationError,
    IoSystemError,
    SubmissionError,
    InternalError,
}

impl EflowErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::SubmissionError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::SubmissionError => "SubmissionError",
            Self::InternalError => "InternalError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} [{placeholder}] {message}", .category.as_str())]
pub struct EflowError {
    category: EflowErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl EflowError {
    pub fn new(
        category: EflowErrorCategory,
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
            EflowErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EflowErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn submission(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EflowErrorCategory::SubmissionError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EflowErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> EflowErrorCategory {
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
