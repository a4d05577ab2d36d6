use thiserror::Error;

/// Result type alias using DeltaError
pub type Result<T> = std::result::Result<T, DeltaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised while parsing and diffing service descriptions. Each kind maps to a
/// stable error code that can be used for programmatic error handling, testing,
/// and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Schema parsing
    /// A shape definition has no `type` key
    MissingTypeTag,
    /// A member/key/value/operation reference names an undefined shape
    UnknownShapeReference,
    /// The document root or one of its sections has the wrong JSON type
    InvalidDocument,

    // Release processing
    /// A release-note file could not be parsed
    InvalidChangeLog,
    /// Processing of one model file within a release failed
    ReleaseFailed,
    /// Processor configuration could not be loaded
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MissingTypeTag => "ERR_MISSING_TYPE_TAG",
            ExErrorKind::UnknownShapeReference => "ERR_UNKNOWN_SHAPE_REFERENCE",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::InvalidChangeLog => "ERR_INVALID_CHANGE_LOG",
            ExErrorKind::ReleaseFailed => "ERR_RELEASE_FAILED",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a stable kind plus whatever context the failing layer knows
/// about: the service and shape from the core, the commit and path from the
/// release processor.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    service: Option<String>,
    shape: Option<String>,
    commit_id: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            service: None,
            shape: None,
            commit_id: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add service context
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Add shape name context
    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    /// Add commit context
    pub fn with_commit_id(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = Some(commit_id.into());
        self
    }

    /// Add model file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the service context, if any
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Get the shape context, if any
    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    /// Get the commit context, if any
    pub fn commit_id(&self) -> Option<&str> {
        self.commit_id.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Walk to the innermost error of the source chain
    pub fn root_cause(&self) -> &ExError {
        let mut current = self;
        while let Some(next) = current.source_error() {
            current = next;
        }
        current
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(service) = &self.service {
            write!(f, " (service: {})", service)?;
        }
        if let Some(shape) = &self.shape {
            write!(f, " (shape: {})", shape)?;
        }
        if let Some(commit_id) = &self.commit_id {
            write!(f, " (commit: {})", commit_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for schema parsing and diffing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeltaError {
    /// A shape definition lacks its `type` key
    #[error("Shape is missing required key 'type': {shape}")]
    MissingTypeTag { shape: String },

    /// A reference names a shape absent from the shape map
    #[error("Unknown shape reference {shape} (from {referenced_by})")]
    UnknownShapeReference {
        shape: String,
        referenced_by: String,
    },

    /// The document (or a section of it) does not have the expected JSON type
    #[error("Invalid service description: {reason}")]
    InvalidDocument { reason: String },

    /// A release-note file does not have the expected layout
    #[error("Invalid change log: {reason}")]
    InvalidChangeLog { reason: String },

    /// JSON decoding or encoding failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from DeltaError to ExError
impl From<DeltaError> for ExError {
    fn from(err: DeltaError) -> Self {
        match err {
            DeltaError::MissingTypeTag { shape } => ExError::new(ExErrorKind::MissingTypeTag)
                .with_shape(shape)
                .with_op("resolve_shape")
                .with_message("Shape is missing required key 'type'"),

            DeltaError::UnknownShapeReference {
                shape,
                referenced_by,
            } => ExError::new(ExErrorKind::UnknownShapeReference)
                .with_shape(shape)
                .with_op("resolve_shape")
                .with_message(format!("referenced by {}", referenced_by)),

            DeltaError::InvalidDocument { reason } => {
                ExError::new(ExErrorKind::InvalidDocument).with_message(reason)
            }

            DeltaError::InvalidChangeLog { reason } => ExError::new(ExErrorKind::InvalidChangeLog)
                .with_op("load_change_log")
                .with_message(reason),

            DeltaError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to DeltaError
impl From<serde_json::Error> for DeltaError {
    fn from(err: serde_json::Error) -> Self {
        DeltaError::Serialization {
            message: err.to_string(),
        }
    }
}
