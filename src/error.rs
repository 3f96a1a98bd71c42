//! Error types returned by [`ArrayDeque`](crate::ArrayDeque) operations.

use std::alloc::Layout;
use std::fmt;

// =============================================================================
// Allocation errors
// =============================================================================

/// The reason a buffer growth could not be satisfied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TryReserveErrorKind {
    /// The requested slot count does not fit in a valid [`Layout`].
    CapacityOverflow,
    /// The allocator returned null for this layout.
    AllocError { layout: Layout },
}

/// Returned by the `try_*` methods when the buffer cannot grow.
/// The deque is left exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryReserveError {
    kind: TryReserveErrorKind,
}

impl TryReserveError {
    pub fn kind(&self) -> TryReserveErrorKind {
        self.kind.clone()
    }

    // Diverges the same way `Vec` does for the infallible API.
    pub(crate) fn handle(self) -> ! {
        match self.kind {
            TryReserveErrorKind::CapacityOverflow => panic!("capacity overflow"),
            TryReserveErrorKind::AllocError { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

impl From<TryReserveErrorKind> for TryReserveError {
    fn from(kind: TryReserveErrorKind) -> Self {
        TryReserveError { kind }
    }
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")?;
        match &self.kind {
            TryReserveErrorKind::CapacityOverflow => {
                f.write_str(" because the computed capacity exceeded the collection's maximum")
            }
            TryReserveErrorKind::AllocError { layout } => {
                write!(f, " for a buffer of {} bytes", layout.size())
            }
        }
    }
}

impl std::error::Error for TryReserveError {}

// =============================================================================
// Deque errors
// =============================================================================

/// Errors surfaced by deque operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DequeError {
    /// `pop`/`popleft` on an empty deque.
    Underflow,

    /// An index that is still outside `0..len` after negative indices are normalized.
    OutOfRange { index: isize, len: usize },

    /// `remove` found no element equal to the value.
    NotFound,

    /// A construction argument was rejected, e.g. a negative maxlen.
    InvalidArgument { message: String },

    /// The buffer could not grow. The deque keeps its previous contents.
    AllocationFailure(TryReserveError),
}

impl fmt::Display for DequeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underflow => write!(f, "pop from an empty deque"),
            Self::OutOfRange { index, len } => {
                write!(f, "deque index {} out of range for length {}", index, len)
            }
            Self::NotFound => write!(f, "deque.remove(x): x not in deque"),
            Self::InvalidArgument { message } => write!(f, "invalid argument: {}", message),
            Self::AllocationFailure(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DequeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AllocationFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl DequeError {
    pub(crate) fn negative_maxlen(maxlen: impl fmt::Display) -> Self {
        DequeError::InvalidArgument {
            message: format!("maxlen must be non-negative, got {}", maxlen),
        }
    }
}

impl From<TryReserveError> for DequeError {
    fn from(err: TryReserveError) -> Self {
        DequeError::AllocationFailure(err)
    }
}

/// Result type for deque operations.
pub type DequeResult<T> = Result<T, DequeError>;
