//! A non-owning view over a contiguous run of bytes.
//!
//! [`StrView`] is the slice capability consumed and produced by
//! [`OwnedStr`](crate::OwnedStr): a pointer-and-length pair that never owns
//! its backing buffer and stays valid only as long as that buffer does,
//! which the borrow checker enforces through its lifetime parameter. Any
//! contiguous byte source qualifies; `&str` and `&[u8]` convert directly.

use core::fmt;
use core::hash::Hash;
use core::hash::Hasher;

use crate::error::AllocError;
use crate::owned_str::OwnedStr;

/// A read-only `{data, length}` view over contiguous bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "constructors", derive(derive_more::Constructor))]
pub struct StrView<'a> {
  data: &'a [u8],
}

impl<'a> StrView<'a> {
  /// Creates a view over `data`.
  #[cfg(not(feature = "constructors"))]
  pub const fn new(data: &'a [u8]) -> Self {
    Self { data }
  }

  /// Creates a view over a byte slice.
  pub const fn from_bytes(data: &'a [u8]) -> Self {
    Self { data }
  }

  /// Creates a view over the bytes of a string slice.
  pub const fn from_str(s: &'a str) -> Self {
    Self { data: s.as_bytes() }
  }

  /// Returns the viewed bytes.
  pub const fn as_bytes(&self) -> &'a [u8] {
    self.data
  }

  /// Returns a pointer to the first viewed byte. Unlike
  /// [`OwnedStr::as_c_ptr`], the pointee is not null-terminated.
  pub const fn as_ptr(&self) -> *const u8 {
    self.data.as_ptr()
  }

  /// Returns the length of the view in bytes.
  pub const fn len(&self) -> usize {
    self.data.len()
  }

  /// Returns `true` if the view covers no bytes.
  pub const fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Returns the byte at `index`, or `None` if out of bounds.
  pub fn get(&self, index: usize) -> Option<u8> {
    self.data.get(index).copied()
  }

  /// Copies the viewed bytes into an owning string. The representation is
  /// chosen by length: views up to
  /// [`INLINE_CAP`](crate::small_repr::INLINE_CAP) bytes stay inline and
  /// allocate nothing.
  pub fn to_owned_str(&self) -> Result<OwnedStr, AllocError> {
    OwnedStr::from_view(*self)
  }
}

impl<'a> From<&'a [u8]> for StrView<'a> {
  fn from(data: &'a [u8]) -> Self {
    Self::from_bytes(data)
  }
}

impl<'a> From<&'a str> for StrView<'a> {
  fn from(s: &'a str) -> Self {
    Self::from_str(s)
  }
}

impl fmt::Debug for StrView<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "\"{}\"", self.data.escape_ascii())
  }
}

impl fmt::Display for StrView<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&alloc::string::String::from_utf8_lossy(self.data), f)
  }
}

impl PartialEq<[u8]> for StrView<'_> {
  fn eq(&self, other: &[u8]) -> bool {
    self.data == other
  }
}

impl PartialEq<&[u8]> for StrView<'_> {
  fn eq(&self, other: &&[u8]) -> bool {
    self.data == *other
  }
}

impl PartialEq<str> for StrView<'_> {
  fn eq(&self, other: &str) -> bool {
    self.data == other.as_bytes()
  }
}

impl PartialEq<&str> for StrView<'_> {
  fn eq(&self, other: &&str) -> bool {
    self.data == other.as_bytes()
  }
}

impl Hash for StrView<'_> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.data.hash(state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::small_repr::INLINE_CAP;

  #[test]
  fn views_without_owning() {
    let backing = *b"view me";
    let view = StrView::from_bytes(&backing);
    assert_eq!(view.len(), 7);
    assert!(!view.is_empty());
    assert_eq!(view.as_bytes(), b"view me");
    assert_eq!(view.as_ptr(), backing.as_ptr());
  }

  #[test]
  fn get_is_bounds_checked() {
    let view = StrView::from_str("ab");
    assert_eq!(view.get(0), Some(b'a'));
    assert_eq!(view.get(1), Some(b'b'));
    assert_eq!(view.get(2), None);
  }

  #[test]
  fn to_owned_str_copies_bytes() {
    let view = StrView::from_str("hello");
    let owned = view.to_owned_str().unwrap();
    assert_eq!(owned.len(), 5);
    assert_eq!(owned.as_bytes(), view.as_bytes());
    // The copy must not alias the view's backing buffer.
    assert_ne!(owned.as_ptr(), view.as_ptr());
  }

  #[test]
  fn short_views_stay_inline() {
    let view = StrView::from_str("short");
    assert!(view.to_owned_str().unwrap().is_inline());

    let long = [b'x'; INLINE_CAP + 1];
    let view = StrView::from_bytes(&long);
    assert!(view.to_owned_str().unwrap().is_large());
  }

  #[test]
  fn equality_and_display() {
    let view = StrView::from_str("abc");
    assert_eq!(view, "abc");
    assert_eq!(view, b"abc".as_slice());
    assert_eq!(alloc::format!("{view}"), "abc");
    assert_eq!(alloc::format!("{view:?}"), "\"abc\"");
  }
}
