use thiserror::Error;

use crate::model::{GuestId, TableId};

/// Result type alias using SeatingError
pub type Result<T> = std::result::Result<T, SeatingError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the CLI, an HTTP
/// layer, tests) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidName,
    InvalidCapacity,

    // Lookup
    NotFound,

    // Seating rules
    NoAvailableSeats,
    AlreadySeated,
    /// Record is referenced by a seating and cannot be changed that way
    Occupied,

    // Schema integrity
    ConstraintViolation,

    // Persistence
    Persistence,
    Timeout,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::InvalidCapacity => "ERR_INVALID_CAPACITY",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NoAvailableSeats => "ERR_NO_AVAILABLE_SEATS",
            ExErrorKind::AlreadySeated => "ERR_ALREADY_SEATED",
            ExErrorKind::Occupied => "ERR_OCCUPIED",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context for diagnostics. Store adapters return this type directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
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

    /// Get the operation name, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for seating and record-management operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeatingError {
    // ===== Seating Errors =====
    /// Requested guest id does not exist
    #[error("Guest not found: {guest_id}")]
    GuestNotFound { guest_id: GuestId },

    /// No free table has enough seats for the party
    #[error("No available table with at least {seats_required} seats")]
    NoAvailableSeats { seats_required: u64 },

    /// Guest has already been assigned a table
    #[error("Guest {guest_id} is already seated")]
    AlreadySeated { guest_id: GuestId },

    /// Underlying persistence failed. The cause is kept for diagnostics and
    /// deliberately left out of the display text.
    #[error("Store failure")]
    StoreFailure {
        #[source]
        cause: ExError,
    },

    // ===== Record Management Errors =====
    /// Guest name is empty or whitespace-only
    #[error("Invalid guest name: {reason}")]
    InvalidName { reason: String },

    /// Table capacity must be at least one seat
    #[error("Invalid table capacity: {capacity}")]
    InvalidCapacity { capacity: u32 },

    /// Requested table id does not exist
    #[error("Table not found: {table_id}")]
    TableNotFound { table_id: TableId },

    /// Guest is seated at a table and cannot be deleted
    #[error("Guest {guest_id} is seated at table {table_id}")]
    GuestSeated { guest_id: GuestId, table_id: TableId },

    /// Table holds a seated party that the change would invalidate
    #[error("Table {table_id} is occupied by guest {guest_id}")]
    TableOccupied { table_id: TableId, guest_id: GuestId },
}

impl SeatingError {
    /// True for rejected requests, false for infrastructure problems
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, SeatingError::StoreFailure { .. })
    }

    /// Stable error kind for this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            SeatingError::GuestNotFound { .. } | SeatingError::TableNotFound { .. } => {
                ExErrorKind::NotFound
            }
            SeatingError::NoAvailableSeats { .. } => ExErrorKind::NoAvailableSeats,
            SeatingError::AlreadySeated { .. } => ExErrorKind::AlreadySeated,
            SeatingError::StoreFailure { cause } => cause.kind(),
            SeatingError::InvalidName { .. } => ExErrorKind::InvalidName,
            SeatingError::InvalidCapacity { .. } => ExErrorKind::InvalidCapacity,
            SeatingError::GuestSeated { .. } | SeatingError::TableOccupied { .. } => {
                ExErrorKind::Occupied
            }
        }
    }

    /// Stable error code for this error
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

/// Any error coming out of a store adapter is a store failure
impl From<ExError> for SeatingError {
    fn from(cause: ExError) -> Self {
        SeatingError::StoreFailure { cause }
    }
}

/// Conversion from SeatingError to the canonical facility
impl From<SeatingError> for ExError {
    fn from(err: SeatingError) -> Self {
        let kind = err.kind();
        match err {
            SeatingError::GuestNotFound { guest_id } => ExError::new(kind)
                .with_entity_id(guest_id)
                .with_message("Guest not found"),

            SeatingError::NoAvailableSeats { seats_required } => ExError::new(kind)
                .with_op("assign_seat")
                .with_message(format!(
                    "No free table with at least {} seats",
                    seats_required
                )),

            SeatingError::AlreadySeated { guest_id } => ExError::new(kind)
                .with_op("assign_seat")
                .with_entity_id(guest_id)
                .with_message("Guest is already seated"),

            SeatingError::StoreFailure { cause } => ExError::new(kind)
                .with_message("Store failure")
                .with_source(cause),

            SeatingError::InvalidName { reason } => ExError::new(kind).with_message(reason),

            SeatingError::InvalidCapacity { capacity } => ExError::new(kind)
                .with_message(format!("Capacity must be positive, got {}", capacity)),

            SeatingError::TableNotFound { table_id } => ExError::new(kind)
                .with_entity_id(table_id)
                .with_message("Table not found"),

            SeatingError::GuestSeated { guest_id, table_id } => ExError::new(kind)
                .with_entity_id(guest_id)
                .with_message(format!("Guest is seated at table {}", table_id)),

            SeatingError::TableOccupied { table_id, guest_id } => ExError::new(kind)
                .with_entity_id(table_id)
                .with_message(format!("Table is occupied by guest {}", guest_id)),
        }
    }
}
