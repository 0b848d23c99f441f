//! Error types for the ecscache system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for ecscache operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a key range error.
    #[must_use]
    pub fn key_range(dimension: KeyDimension, index: u64, limit: u64) -> Self {
        Self::new(ErrorKind::KeyRange {
            dimension,
            index,
            limit,
        })
    }

    /// Creates a storage unavailable error.
    #[must_use]
    pub fn storage_unavailable(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageUnavailable(reason.into()))
    }

    /// Creates a corrupt snapshot error.
    #[must_use]
    pub fn corrupt_snapshot(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptSnapshot(reason.into()))
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName(name.into()))
    }

    /// Returns true if the caller may recover by retrying or by
    /// falling back to an empty store.
    ///
    /// Key range violations are contract violations and never recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::StorageUnavailable(_) | ErrorKind::CorruptSnapshot(_)
        )
    }

    /// Returns true if this error reports an unreadable snapshot.
    #[must_use]
    pub fn is_corrupt_snapshot(&self) -> bool {
        matches!(self.kind, ErrorKind::CorruptSnapshot(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A packed key input exceeded the supported index space.
    #[error("key range exceeded: {dimension} index {index} is not below {limit}")]
    KeyRange {
        /// Which half of the key overflowed.
        dimension: KeyDimension,
        /// The offending index.
        index: u64,
        /// The exclusive upper bound for that dimension.
        limit: u64,
    },

    /// The durable backend could not be reached or initialized.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A stored snapshot could not be parsed back into a cache store.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// An interning table was rebuilt from a list that repeats a name.
    #[error("duplicate interned name: {0}")]
    DuplicateName(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// The two halves of a packed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDimension {
    /// The component index (high bits).
    Component,
    /// The entity index (low bits).
    Entity,
}

impl fmt::Display for KeyDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => write!(f, "component"),
            Self::Entity => write!(f, "entity"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that failed (e.g. `save`, `load`).
    pub operation: Option<String>,
    /// The cache namespace the operation targeted.
    pub namespace: Option<String>,
    /// Additional detail frames, outermost last.
    pub frames: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the cache namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds a detail frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.frames.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "during {operation}")?;
        }
        if let Some(namespace) = &self.namespace {
            if self.operation.is_some() {
                write!(f, " ")?;
            }
            write!(f, "of {namespace}")?;
        }
        for frame in &self.frames {
            write!(f, "\n  in {frame}")?;
        }
        Ok(())
    }
}

/// Result type alias for ecscache operations.
pub type Result<T> = std::result::Result<T, Error>;
