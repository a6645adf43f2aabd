//! The heap-backed string representation.
//!
//! [`LargeRepr`] owns a [`HeapBuf`] and a packed length word. The word's
//! bit layout is an explicit, tested contract:
//!
//! ```text
//! bit (usize::BITS - 1)  ──  "large" marker, always set
//! bits 0..(usize::BITS - 1)  ──  content length in bytes
//! ```
//!
//! The marker mirrors the discriminant of [`Repr`](crate::owned_str::Repr);
//! the enum is authoritative for dispatch, while the bit keeps the two
//! representations' footprints identical and is validated by the masked
//! accessors below.
//!
//! The buffer always holds `capacity() + 1` bytes so that the terminator at
//! `data[len]` stays addressable at full capacity.

use core::ptr;

use crate::error::AllocError;
use crate::heap_buf::HeapBuf;

/// The "is large" marker bit, stored in the highest bit of the length word.
pub(crate) const LARGE_BIT: usize = 1 << (usize::BITS - 1);

/// Maximum representable content length in bytes. One bit of the length
/// word is reserved for the large marker.
pub const MAX_LEN: usize = LARGE_BIT - 1;

/// A heap-backed buffer with capacity, packed length, and exclusive
/// ownership of its allocation.
#[derive(Debug)]
pub struct LargeRepr {
  buf:  HeapBuf,
  word: usize,
}

impl LargeRepr {
  /// Allocates a zeroed buffer able to hold `capacity` content bytes plus
  /// the terminator.
  pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
    if capacity > MAX_LEN {
      return Err(AllocError::CapacityOverflow);
    }
    let buf = HeapBuf::allocate(capacity + 1)?;
    Ok(Self {
      buf,
      word: LARGE_BIT,
    })
  }

  /// Allocates a buffer sized exactly to `bytes` and copies them in.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, AllocError> {
    let mut repr = Self::with_capacity(bytes.len())?;
    repr.append(bytes);
    Ok(repr)
  }

  /// Returns the content length, masked out of the packed word.
  pub const fn len(&self) -> usize {
    self.word & MAX_LEN
  }

  /// Returns the large marker bit. Holds by construction; exposed so the
  /// packed layout is a checkable contract.
  pub const fn is_large(&self) -> bool {
    self.word & LARGE_BIT != 0
  }

  pub const fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the usable content capacity, excluding the terminator byte.
  pub const fn capacity(&self) -> usize {
    self.buf.size() - 1
  }

  fn set_len(&mut self, len: usize) {
    debug_assert!(len <= self.capacity());
    self.word = LARGE_BIT | len;
  }

  pub const fn as_ptr(&self) -> *const u8 {
    self.buf.as_ptr()
  }

  pub const fn as_mut_ptr(&mut self) -> *mut u8 {
    self.buf.as_mut_ptr()
  }

  pub fn as_bytes(&self) -> &[u8] {
    // SAFETY: the first `len` bytes are initialized content.
    unsafe { core::slice::from_raw_parts(self.as_ptr(), self.len()) }
  }

  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    let len = self.len();
    // SAFETY: the first `len` bytes are initialized content, and we hold
    // the only reference to the buffer.
    unsafe { core::slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
  }

  /// Ensures `capacity() >= new_capacity`, preserving content and
  /// terminator.
  ///
  /// Growth reallocates to `max(new_capacity, 2 * capacity)` to amortize
  /// repeated growth. With `collapse`, a smaller request shrinks the buffer
  /// to exactly fit (never below the current length). On failure the
  /// representation is unchanged.
  pub fn reserve(
    &mut self,
    new_capacity: usize,
    collapse: bool,
  ) -> Result<(), AllocError> {
    let capacity = self.capacity();
    if new_capacity > capacity {
      if new_capacity > MAX_LEN {
        return Err(AllocError::CapacityOverflow);
      }
      let target = new_capacity.max(capacity.saturating_mul(2)).min(MAX_LEN);
      self.buf.resize(target + 1)
    } else if collapse && new_capacity < capacity {
      let target = new_capacity.max(self.len());
      self.buf.resize(target + 1)
    } else {
      Ok(())
    }
  }

  /// Trims the capacity to exactly fit the current content.
  pub fn compact(&mut self) -> Result<(), AllocError> {
    self.reserve(self.len(), true)
  }

  /// Appends `bytes` after the current content and re-terminates. The
  /// caller must have reserved enough capacity beforehand.
  pub fn append(&mut self, bytes: &[u8]) {
    let len = self.len();
    debug_assert!(len + bytes.len() <= self.capacity(), "buffer overflow");
    // SAFETY: capacity was reserved by the caller, so `len + bytes.len()`
    // content bytes plus the terminator fit in the allocation.
    unsafe {
      let dst = self.as_mut_ptr().add(len);
      ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
      *dst.add(bytes.len()) = 0;
    }
    self.set_len(len + bytes.len());
  }

  /// Shortens the content to `new_len` bytes, zero-filling the removed
  /// tail. Longer lengths are ignored. Capacity is unchanged.
  pub fn truncate(&mut self, new_len: usize) {
    let len = self.len();
    if new_len >= len {
      return;
    }
    // SAFETY: `new_len < len <= capacity`, and `len + 1` bytes are within
    // the allocation.
    unsafe {
      ptr::write_bytes(self.as_mut_ptr().add(new_len), 0, len - new_len + 1);
    }
    self.set_len(new_len);
  }

  /// Zero-fills the entire buffer and resets the length. Capacity is
  /// unchanged.
  pub fn clear(&mut self) {
    self.buf.zero();
    self.set_len(0);
  }

  /// Converts into a `Vec<u8>` without copying, transferring ownership of
  /// the allocation.
  pub(crate) fn into_vec(self) -> alloc::vec::Vec<u8> {
    let len = self.len();
    let (ptr, size) = self.buf.into_raw();
    // SAFETY: the allocation was made with `Layout::array::<u8>(size)`,
    // which is exactly the layout `Vec<u8>` with capacity `size` frees;
    // the first `len` bytes are initialized.
    unsafe { alloc::vec::Vec::from_raw_parts(ptr.as_ptr(), len, size) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn packed_word_layout() {
    assert_eq!(LARGE_BIT, 1usize << (usize::BITS - 1));
    assert_eq!(MAX_LEN, usize::MAX >> 1);
    assert_eq!(LARGE_BIT & MAX_LEN, 0);

    let mut repr = LargeRepr::with_capacity(64).unwrap();
    assert!(repr.is_large());
    assert_eq!(repr.len(), 0);
    repr.append(b"abc");
    assert!(repr.is_large());
    assert_eq!(repr.len(), 3);
    assert_eq!(repr.word, LARGE_BIT | 3);
  }

  #[test]
  #[cfg(target_pointer_width = "64")]
  fn marker_bit_value() {
    assert_eq!(LARGE_BIT, 0x8000_0000_0000_0000);
  }

  #[test]
  fn from_bytes_sizes_exactly() {
    let repr = LargeRepr::from_bytes(b"hello world, hello moon").unwrap();
    assert_eq!(repr.len(), 23);
    assert_eq!(repr.capacity(), 23);
    assert_eq!(repr.as_bytes(), b"hello world, hello moon");
    assert_eq!(unsafe { *repr.as_ptr().add(23) }, 0);
  }

  #[test]
  fn reserve_grows_amortized() {
    let mut repr = LargeRepr::from_bytes(b"0123456789").unwrap();
    repr.reserve(11, false).unwrap();
    // One past the current capacity doubles rather than reallocating for
    // every byte.
    assert_eq!(repr.capacity(), 20);
    assert_eq!(repr.as_bytes(), b"0123456789");

    repr.reserve(100, false).unwrap();
    assert_eq!(repr.capacity(), 100);
    assert_eq!(repr.as_bytes(), b"0123456789");
  }

  #[test]
  fn reserve_is_idempotent() {
    let mut repr = LargeRepr::from_bytes(b"abc").unwrap();
    repr.reserve(50, false).unwrap();
    let capacity = repr.capacity();
    repr.reserve(50, false).unwrap();
    assert_eq!(repr.capacity(), capacity);
    assert_eq!(repr.as_bytes(), b"abc");
  }

  #[test]
  fn reserve_collapse_shrinks_to_fit() {
    let mut repr = LargeRepr::with_capacity(128).unwrap();
    repr.append(b"short");
    repr.reserve(5, true).unwrap();
    assert_eq!(repr.capacity(), 5);
    assert_eq!(repr.as_bytes(), b"short");
    assert_eq!(unsafe { *repr.as_ptr().add(5) }, 0);
  }

  #[test]
  fn collapse_never_drops_below_len() {
    let mut repr = LargeRepr::with_capacity(32).unwrap();
    repr.append(b"0123456789");
    repr.reserve(2, true).unwrap();
    assert_eq!(repr.capacity(), 10);
    assert_eq!(repr.as_bytes(), b"0123456789");
  }

  #[test]
  fn compact_trims_exactly() {
    let mut repr = LargeRepr::with_capacity(64).unwrap();
    repr.append(b"content");
    repr.compact().unwrap();
    assert_eq!(repr.capacity(), 7);
    assert_eq!(repr.as_bytes(), b"content");
  }

  #[test]
  fn truncate_reterminates() {
    let mut repr = LargeRepr::from_bytes(b"abcdef").unwrap();
    repr.truncate(2);
    assert_eq!(repr.as_bytes(), b"ab");
    assert_eq!(repr.capacity(), 6);
    for i in 2..7 {
      assert_eq!(unsafe { *repr.as_ptr().add(i) }, 0);
    }
  }

  #[test]
  fn clear_keeps_capacity() {
    let mut repr = LargeRepr::from_bytes(b"some content here").unwrap();
    let capacity = repr.capacity();
    repr.clear();
    assert!(repr.is_empty());
    assert_eq!(repr.capacity(), capacity);
    for i in 0..=capacity {
      assert_eq!(unsafe { *repr.as_ptr().add(i) }, 0);
    }
  }

  #[test]
  fn into_vec_transfers_ownership() {
    let repr = LargeRepr::from_bytes(b"move me out").unwrap();
    let vec = repr.into_vec();
    assert_eq!(vec.as_slice(), b"move me out");
    assert_eq!(vec.capacity(), 12);
  }

  #[test]
  fn oversized_capacity_is_rejected() {
    assert_eq!(
      LargeRepr::with_capacity(MAX_LEN + 1).unwrap_err(),
      AllocError::CapacityOverflow
    );
  }
}
