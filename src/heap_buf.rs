//! A single-owner heap buffer with an explicit allocate/grow/free lifecycle.
//!
//! [`HeapBuf`] is the allocator capability consumed by the large string
//! representation. It owns exactly one allocation at a time: `allocate`
//! produces a zero-initialized buffer, `resize` reallocates in place where
//! the allocator permits, and `Drop` frees exactly once. Because ownership
//! is exclusive, moving a `HeapBuf` (or the string containing it) can never
//! alias or double-free the allocation.

use alloc::alloc::alloc_zeroed;
use alloc::alloc::dealloc;
use alloc::alloc::realloc;
use core::alloc::Layout;
use core::mem::ManuallyDrop;
use core::ptr::NonNull;

use crate::error::AllocError;

/// An exclusively owned, byte-aligned heap allocation.
///
/// The buffer is zero-initialized on allocation. Bytes written past what a
/// `resize` preserves are unspecified until the owner writes them; callers
/// that need a zeroed region after growth use [`HeapBuf::zero`].
#[derive(Debug)]
pub struct HeapBuf {
  ptr:  NonNull<u8>,
  size: usize,
}

// SAFETY: HeapBuf exclusively owns its allocation; there is no shared
// mutability, so transferring or referencing it across threads is sound.
unsafe impl Send for HeapBuf {}
unsafe impl Sync for HeapBuf {}

impl HeapBuf {
  fn layout(size: usize) -> Result<Layout, AllocError> {
    Layout::array::<u8>(size).map_err(|_| AllocError::CapacityOverflow)
  }

  /// Allocates a zero-initialized buffer of `size` bytes. `size` must be
  /// non-zero; string buffers always include at least the terminator byte.
  pub fn allocate(size: usize) -> Result<Self, AllocError> {
    debug_assert!(size > 0, "zero-sized heap buffer");
    let layout = Self::layout(size)?;
    // SAFETY: `layout` has non-zero size, checked above.
    let ptr = unsafe { alloc_zeroed(layout) };
    match NonNull::new(ptr) {
      Some(ptr) => Ok(Self { ptr, size }),
      None => Err(AllocError::OutOfMemory { requested: size }),
    }
  }

  /// Returns the allocation size in bytes.
  pub const fn size(&self) -> usize {
    self.size
  }

  /// Reallocates to `new_size` bytes, preserving the first
  /// `min(size, new_size)` bytes. On failure the existing allocation is
  /// untouched and remains owned, so the caller's state is unchanged.
  pub fn resize(&mut self, new_size: usize) -> Result<(), AllocError> {
    debug_assert!(new_size > 0, "zero-sized heap buffer");
    if new_size == self.size {
      return Ok(());
    }
    let old_layout = Self::layout(self.size)?;
    Self::layout(new_size)?;
    // SAFETY: `ptr` was allocated with `old_layout` and `new_size` is a
    // valid non-zero layout size for u8.
    let ptr = unsafe { realloc(self.ptr.as_ptr(), old_layout, new_size) };
    match NonNull::new(ptr) {
      Some(ptr) => {
        self.ptr = ptr;
        self.size = new_size;
        Ok(())
      }
      None => Err(AllocError::OutOfMemory { requested: new_size }),
    }
  }

  /// Zero-fills the entire buffer.
  pub fn zero(&mut self) {
    // SAFETY: the buffer is valid for `size` writable bytes.
    unsafe { core::ptr::write_bytes(self.ptr.as_ptr(), 0, self.size) };
  }

  pub const fn as_ptr(&self) -> *const u8 {
    self.ptr.as_ptr()
  }

  pub const fn as_mut_ptr(&mut self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  /// Releases ownership of the allocation without freeing it, returning the
  /// pointer and allocation size. The caller becomes responsible for
  /// freeing it with the same layout (`Layout::array::<u8>(size)`).
  pub(crate) fn into_raw(self) -> (NonNull<u8>, usize) {
    let buf = ManuallyDrop::new(self);
    (buf.ptr, buf.size)
  }
}

impl Drop for HeapBuf {
  fn drop(&mut self) {
    // The layout was validated at allocation time, so this cannot fail.
    if let Ok(layout) = Self::layout(self.size) {
      // SAFETY: `ptr` owns an allocation of exactly `layout`, and Drop
      // runs at most once per owner.
      unsafe { dealloc(self.ptr.as_ptr(), layout) };
    }
  }
}
