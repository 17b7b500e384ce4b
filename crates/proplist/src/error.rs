#![forbid(unsafe_code)]

//! Errors raised by lists and their descriptors.

use std::fmt;

/// Result alias for list and descriptor operations.
pub type ListResult<T> = Result<T, ListError>;

/// Errors that can occur when reading or writing list slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// Index outside the valid bounds for the operation.
    OutOfRange { index: usize, len: usize },
    /// The operation is not supported by this object.
    NotSupported(&'static str),
    /// The list changed shape after the descriptor was handed out.
    StaleDescriptor { captured: u64, current: u64 },
    /// The list backing a descriptor has been dropped.
    ListDropped,
    /// A type-erased value was not of the expected element type.
    TypeMismatch { expected: &'static str },
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {} out of range (length {})", index, len)
            }
            Self::NotSupported(op) => write!(f, "operation '{}' is not supported", op),
            Self::StaleDescriptor { captured, current } => write!(
                f,
                "stale descriptor: captured at epoch {}, list is at epoch {}",
                captured, current
            ),
            Self::ListDropped => write!(f, "owning list has been dropped"),
            Self::TypeMismatch { expected } => {
                write!(f, "type mismatch: expected a value of type {}", expected)
            }
        }
    }
}

impl std::error::Error for ListError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ListError::OutOfRange { index: 4, len: 2 }.to_string(),
            "index 4 out of range (length 2)"
        );
        assert_eq!(
            ListError::NotSupported("reset").to_string(),
            "operation 'reset' is not supported"
        );
        assert!(
            ListError::StaleDescriptor {
                captured: 1,
                current: 3
            }
            .to_string()
            .contains("epoch 3")
        );
        assert!(
            ListError::TypeMismatch { expected: "i32" }
                .to_string()
                .contains("i32")
        );
    }
}
