//! The inline (stack-allocated) string representation.
//!
//! [`SmallRepr`] is a fixed-capacity buffer sized so that it occupies the
//! exact same footprint as the heap-backed
//! [`LargeRepr`](crate::large_repr::LargeRepr). It performs no allocation
//! and no bounds enforcement of its own: detecting overflow and migrating
//! to the large representation is the job of [`OwnedStr`](crate::OwnedStr).

use core::mem::size_of;

/// Number of content bytes that fit inline. Derived from the footprint of
/// the large representation (pointer + capacity + packed length word), less
/// one byte for the tracked length and one for the null terminator.
///
/// On 64-bit targets this is 22 bytes; on 32-bit targets, 10 bytes.
pub const INLINE_CAP: usize = 3 * size_of::<usize>() - 2;

/// A fixed-capacity inline character buffer.
///
/// # Invariant
///
/// Every byte in `buf[len..]` is zero. Together with `len <= INLINE_CAP`
/// this keeps `buf` null-terminated at all times, so [`SmallRepr::as_ptr`]
/// is always a valid C string pointer. The `index` feature derives raw
/// `Index`/`IndexMut` over the whole buffer, including the tail; writing
/// a non-zero byte past `len` through it voids the terminator guarantee
/// until the next `clear` or `truncate`.
#[derive(Clone, Copy)]
#[cfg_attr(
  feature = "index",
  derive(derive_more::Index, derive_more::IndexMut)
)]
pub struct SmallRepr {
  #[cfg_attr(feature = "index", index)]
  #[cfg_attr(feature = "index", index_mut)]
  buf: [u8; INLINE_CAP + 1],
  len: u8,
}

impl SmallRepr {
  /// Creates an empty, zeroed inline buffer.
  pub const fn new() -> Self {
    Self {
      buf: [0u8; INLINE_CAP + 1],
      len: 0,
    }
  }

  /// Returns the tracked length in bytes.
  pub const fn len(&self) -> usize {
    self.len as usize
  }

  /// Returns `true` if no content is stored.
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns the stored content, excluding the terminator.
  pub fn as_bytes(&self) -> &[u8] {
    &self.buf[..self.len as usize]
  }

  /// Returns the stored content mutably, excluding the terminator.
  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    &mut self.buf[..self.len as usize]
  }

  /// Returns a pointer to the start of the buffer, valid for `len() + 1`
  /// bytes and null-terminated.
  pub const fn as_ptr(&self) -> *const u8 {
    self.buf.as_ptr()
  }

  /// Zero-fills the buffer and resets the length to zero.
  pub fn clear(&mut self) {
    self.buf = [0u8; INLINE_CAP + 1];
    self.len = 0;
  }

  /// Appends `bytes` after the current content. The caller must have
  /// verified that the result fits within [`INLINE_CAP`].
  pub fn append(&mut self, bytes: &[u8]) {
    let len = self.len as usize;
    debug_assert!(
      len + bytes.len() <= INLINE_CAP,
      "inline buffer overflow"
    );
    self.buf[len..len + bytes.len()].copy_from_slice(bytes);
    self.len = (len + bytes.len()) as u8;
  }

  /// Shortens the content to `new_len` bytes, zero-filling the removed
  /// tail to uphold the terminator invariant. Longer lengths are ignored.
  pub fn truncate(&mut self, new_len: usize) {
    let len = self.len as usize;
    if new_len >= len {
      return;
    }
    self.buf[new_len..len].fill(0);
    self.len = new_len as u8;
  }
}

impl Default for SmallRepr {
  fn default() -> Self {
    Self::new()
  }
}
