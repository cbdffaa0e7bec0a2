use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to fetch data: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to fetch data from {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {record}: '{field}' {message}")]
    Validation {
        record: String,
        field: String,
        message: String,
    },

    #[error("Duplicate identifier '{id}' in {collection}")]
    DuplicateId { collection: String, id: String },

    #[error("{kind} {id} not found (referenced by authority {authority})")]
    Reference {
        kind: ReferenceKind,
        id: String,
        authority: String,
    },

    #[error("Entity {entity_id} has more than one authority in charge")]
    InvariantViolation { entity_id: String },
}

/// Target table of an unresolved authority reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Person,
    Entity,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Person => write!(f, "Person"),
            ReferenceKind::Entity => write!(f, "Entity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DirectoryError {
    pub fn validation(
        record: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        DirectoryError::Validation {
            record: record.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DirectoryError::Fetch(_) | DirectoryError::HttpStatus { .. } => ErrorCategory::Network,
            DirectoryError::Validation { .. }
            | DirectoryError::DuplicateId { .. }
            | DirectoryError::Reference { .. }
            | DirectoryError::InvariantViolation { .. }
            | DirectoryError::Serialization(_) => ErrorCategory::Data,
            DirectoryError::Config { .. } | DirectoryError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            DirectoryError::Io(_) | DirectoryError::Csv(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DirectoryError::Fetch(_) | DirectoryError::HttpStatus { .. } => {
                format!("Could not download the authorities dataset: {}", self)
            }
            DirectoryError::InvariantViolation { entity_id } => format!(
                "The dataset lists more than one current authority for entity {}",
                entity_id
            ),
            DirectoryError::Reference { .. }
            | DirectoryError::Validation { .. }
            | DirectoryError::DuplicateId { .. }
            | DirectoryError::Serialization(_) => {
                format!("The authorities dataset is malformed: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check the network connection and the --source-url value, then try again"
            }
            ErrorCategory::Data => {
                "Report the offending record upstream or use --input with a corrected snapshot"
            }
            ErrorCategory::Configuration => "Review the command-line flags and the TOML config file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
