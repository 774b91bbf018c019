use thiserror::Error;

/// The main error type for vSphere provisioning operations.
///
/// This enum represents all possible errors that can occur while talking
/// to the management endpoint, including connection, certificate,
/// authentication, validation and remote task failures.
#[derive(Error, Debug)]
pub enum VsphereError {
    /// Represents errors that occur during connection attempts
    ///
    /// # Fields
    /// * `0` - A description of what went wrong during the connection attempt
    #[error("Connection error: {0}")]
    Connection(String),

    /// The endpoint presented a certificate that could not be verified.
    ///
    /// This is the only error that triggers a retry (once, without
    /// certificate verification).
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// Represents authentication failures
    ///
    /// # Fields
    /// * `0` - A description of the authentication failure
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Represents validation failures with detailed context
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    #[error("Validation error: {source}")]
    Validation { source: ValidationError },

    /// The endpoint answered a request with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A remote task finished in the `error` state.
    #[error("Task {task} failed: {message}")]
    Task { task: String, message: String },

    /// A remote task did not reach a terminal state in time.
    #[error("Task {task} did not complete within {seconds}s")]
    TaskTimeout { task: String, seconds: u64 },

    /// An inventory object the pipeline depends on is missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The VM exists but its disk could not be attached. Nothing is rolled back.
    #[error("VM '{vm}' was created without its disk: {source}")]
    DiskAttach {
        vm: String,
        source: Box<VsphereError>,
    },

    /// Missing or malformed runtime configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<ValidationError> for VsphereError {
    fn from(error: ValidationError) -> Self {
        VsphereError::Validation { source: error }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors, format violations and
/// requests that exceed the capacity reported by the cluster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),

    /// The request does not fit into what the cluster currently reports.
    ///
    /// # Fields
    /// * `resource` - Which capacity was exceeded (cpu, memory, datastore)
    /// * `requested` - Requested amount, in the unit the endpoint reports
    /// * `available` - Reported amount, in the same unit
    #[error("Insufficient {resource} in cluster: requested {requested}, available {available}")]
    InsufficientCapacity {
        resource: String,
        requested: u64,
        available: u64,
    },
}

impl VsphereError {
    /// Returns `true` for errors raised before any remote mutation was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(self, VsphereError::Validation { .. })
    }

    /// Returns `true` for failures to reach or log into the endpoint.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            VsphereError::Connection(_)
                | VsphereError::Certificate(_)
                | VsphereError::Authentication(_)
        )
    }
}

/// Type alias for Results that may fail with a VsphereError
pub type VsphereResult<T> = Result<T, VsphereError>;
