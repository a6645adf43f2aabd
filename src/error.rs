//! Error types for fallible string operations.
//!
//! Every operation on [`OwnedStr`](crate::OwnedStr) that may allocate
//! returns a [`Result`] with [`AllocError`] instead of aborting, so callers
//! can recover from allocator exhaustion. Failed operations leave the string
//! in its prior state.

use core::error::Error as CoreError;
use core::fmt;

/// Error returned by operations that reserve or grow string storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AllocError {
  /// The requested capacity cannot be represented. The length word of the
  /// large representation reserves one bit, so capacities are limited to
  /// [`MAX_LEN`](crate::large_repr::MAX_LEN) bytes.
  CapacityOverflow,
  /// The allocator could not satisfy the request.
  OutOfMemory {
    /// Size of the failed request in bytes, including the terminator.
    requested: usize,
  },
}

impl fmt::Display for AllocError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::CapacityOverflow => f.write_str("capacity overflow"),
      Self::OutOfMemory { requested } => {
        write!(f, "allocation of {requested} bytes failed")
      }
    }
  }
}

impl CoreError for AllocError {}

#[cfg(test)]
mod tests {
  use super::*;

  fn as_core_error(e: &dyn CoreError) -> alloc::string::String {
    use alloc::string::ToString;
    e.to_string()
  }

  #[test]
  fn display_messages() {
    let s = as_core_error(&AllocError::CapacityOverflow);
    assert_eq!(s, "capacity overflow");
    let s = as_core_error(&AllocError::OutOfMemory { requested: 64 });
    assert_eq!(s, "allocation of 64 bytes failed");
  }

  #[test]
  fn is_copy_and_comparable() {
    let a = AllocError::OutOfMemory { requested: 8 };
    let b = a;
    assert_eq!(a, b);
    assert_ne!(a, AllocError::CapacityOverflow);
  }
}
