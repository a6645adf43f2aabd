//! An owning byte string with small-string optimization.
//!
//! [`OwnedStr`] stores short contents inline in the value itself and spills
//! to an exclusively-owned heap buffer for longer ones. The two layouts
//! share a single fixed footprint; a tagged [`Repr`] selects the active one
//! and every operation dispatches on it with an exhaustive match.
//!
//! Content is raw bytes. A null terminator is maintained at `data[len]` in
//! both representations, so [`OwnedStr::as_c_ptr`] is always valid for
//! `len() + 1` bytes and usable across a C API boundary.
//!
//! ## Examples
//!
//! ```
//! use ownstr::OwnedStr;
//!
//! let mut s = OwnedStr::from("hello");
//! assert_eq!(s.len(), 5);
//! assert!(s.is_inline());
//!
//! s.push_str(", this string will not fit inline anymore").unwrap();
//! assert!(s.is_large());
//! assert_eq!(&s[..5], b"hello");
//! ```
//!
//! Moving an `OwnedStr` transfers heap ownership like any Rust move; the
//! explicit move-out is [`core::mem::take`], which leaves the source as an
//! empty inline string:
//!
//! ```
//! use ownstr::OwnedStr;
//!
//! let mut src = OwnedStr::from("a string long enough to live on the heap");
//! let dst = core::mem::take(&mut src);
//! assert!(src.is_empty());
//! assert!(src.is_inline());
//! assert!(dst.is_large());
//! ```

use alloc::string::FromUtf8Error;
use alloc::string::String;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::ffi::CStr;
use core::fmt;
use core::hash::Hash;
use core::hash::Hasher;
use core::mem::size_of;
use core::ops::Deref;
use core::ops::DerefMut;
use core::str::FromStr;
use core::str::Utf8Error;

use crate::error::AllocError;
use crate::large_repr::LargeRepr;
use crate::small_repr::INLINE_CAP;
use crate::small_repr::SmallRepr;
use crate::str_view::StrView;

// The union trick from which the inline capacity is derived: both
// representations must occupy the same footprint.
const _: () = assert!(size_of::<SmallRepr>() == size_of::<LargeRepr>());

/// The active storage strategy of an [`OwnedStr`].
///
/// Exactly one variant is live at any time; the enum discriminant is
/// authoritative and every dispatch point matches exhaustively. The large
/// variant additionally carries a marker bit in its packed length word
/// (see [`crate::large_repr`]) as a layout contract.
#[cfg_attr(feature = "is_variant", derive(derive_more::IsVariant))]
pub enum Repr {
  /// Content lives inline in the value; no allocation.
  Small(SmallRepr),
  /// Content lives in an exclusively owned heap buffer.
  Large(LargeRepr),
}

/// An owning byte string that keeps up to [`INLINE_CAP`] bytes inline.
///
/// Construction from a [`StrView`] chooses the representation by length.
/// Mutations that would overflow the inline capacity migrate to the heap;
/// the reverse transition happens only through [`OwnedStr::compact`],
/// which returns to inline storage when the content fits (part of the
/// public contract, not an automatic behavior).
///
/// All allocating operations are fallible and leave the string unchanged
/// on failure. The infallible trait impls ([`Clone`], [`From`],
/// [`Extend`]) abort via [`alloc::alloc::handle_alloc_error`] when the
/// allocator is exhausted, matching `Vec` semantics.
pub struct OwnedStr {
  repr: Repr,
}

/// Resolves a fallible allocation result for the infallible trait impls.
fn unwrap_alloc<T>(result: Result<T, AllocError>) -> T {
  match result {
    Ok(value) => value,
    Err(AllocError::CapacityOverflow) => panic!("capacity overflow"),
    Err(AllocError::OutOfMemory { requested }) => {
      let layout = Layout::from_size_align(requested, 1)
        .unwrap_or(Layout::new::<u8>());
      alloc::alloc::handle_alloc_error(layout)
    }
  }
}

impl OwnedStr {
  /// Creates an empty string in the inline representation.
  pub const fn new() -> Self {
    Self {
      repr: Repr::Small(SmallRepr::new()),
    }
  }

  /// Copies the bytes of `view` into a new string. Views up to
  /// [`INLINE_CAP`] bytes stay inline; longer ones allocate a heap buffer
  /// with capacity equal to the view's length.
  pub fn from_view(view: StrView<'_>) -> Result<Self, AllocError> {
    let bytes = view.as_bytes();
    let repr = if bytes.len() <= INLINE_CAP {
      let mut small = SmallRepr::new();
      small.append(bytes);
      Repr::Small(small)
    } else {
      Repr::Large(LargeRepr::from_bytes(bytes)?)
    };
    Ok(Self { repr })
  }

  /// Returns the active representation.
  pub const fn repr(&self) -> &Repr {
    &self.repr
  }

  /// Returns `true` if the content is stored inline.
  pub const fn is_inline(&self) -> bool {
    matches!(self.repr, Repr::Small(_))
  }

  /// Returns `true` if the content is stored in a heap buffer.
  pub const fn is_large(&self) -> bool {
    matches!(self.repr, Repr::Large(_))
  }

  /// Returns the content length in bytes.
  pub const fn len(&self) -> usize {
    match &self.repr {
      Repr::Small(small) => small.len(),
      Repr::Large(large) => large.len(),
    }
  }

  /// Returns `true` if the string holds no content.
  pub const fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the current capacity in bytes: [`INLINE_CAP`] while inline,
  /// the heap buffer's usable size otherwise.
  pub const fn capacity(&self) -> usize {
    match &self.repr {
      Repr::Small(_) => INLINE_CAP,
      Repr::Large(large) => large.capacity(),
    }
  }

  /// Returns the content bytes, excluding the terminator.
  pub fn as_bytes(&self) -> &[u8] {
    match &self.repr {
      Repr::Small(small) => small.as_bytes(),
      Repr::Large(large) => large.as_bytes(),
    }
  }

  /// Returns the content bytes mutably, excluding the terminator.
  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    match &mut self.repr {
      Repr::Small(small) => small.as_bytes_mut(),
      Repr::Large(large) => large.as_bytes_mut(),
    }
  }

  /// Returns a pointer to the first content byte.
  pub const fn as_ptr(&self) -> *const u8 {
    match &self.repr {
      Repr::Small(small) => small.as_ptr(),
      Repr::Large(large) => large.as_ptr(),
    }
  }

  /// Returns a C-string-compatible pointer, guaranteed valid for
  /// `len() + 1` bytes with `ptr[len()] == 0`. The pointer is invalidated
  /// by any mutation or move of `self`. Content containing interior null
  /// bytes will appear truncated to C consumers; see
  /// [`OwnedStr::as_c_str`] for a checked conversion.
  pub const fn as_c_ptr(&self) -> *const u8 {
    self.as_ptr()
  }

  /// Returns the content and terminator as one slice of `len() + 1`
  /// bytes.
  pub fn as_bytes_with_nul(&self) -> &[u8] {
    // SAFETY: both representations keep `len + 1` initialized bytes
    // addressable, with a terminator at index `len`.
    unsafe { core::slice::from_raw_parts(self.as_ptr(), self.len() + 1) }
  }

  /// Returns the content as a [`CStr`], or `None` if it contains interior
  /// null bytes.
  pub fn as_c_str(&self) -> Option<&CStr> {
    CStr::from_bytes_with_nul(self.as_bytes_with_nul()).ok()
  }

  /// Returns the content as a `&str` if it is valid UTF-8.
  pub fn as_str(&self) -> Result<&str, Utf8Error> {
    core::str::from_utf8(self.as_bytes())
  }

  /// Returns the content as a `&str` without checking UTF-8 validity.
  ///
  /// # Safety
  ///
  /// The caller must ensure the content is valid UTF-8.
  pub unsafe fn as_str_unchecked(&self) -> &str {
    unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
  }

  /// Returns a non-owning view over the content.
  pub fn as_view(&self) -> StrView<'_> {
    StrView::from_bytes(self.as_bytes())
  }

  /// Returns the byte at `index`, or `None` if out of bounds.
  pub fn get(&self, index: usize) -> Option<u8> {
    self.as_bytes().get(index).copied()
  }

  /// Returns a mutable reference to the byte at `index`, or `None` if out
  /// of bounds.
  pub fn get_mut(&mut self, index: usize) -> Option<&mut u8> {
    self.as_bytes_mut().get_mut(index)
  }

  /// Returns the byte at `index` without a bounds check. This is the
  /// caller-verified fast path; the checked paths are [`OwnedStr::get`]
  /// and indexing, which panics on out-of-bounds access.
  ///
  /// # Safety
  ///
  /// `index` must be less than [`OwnedStr::len`].
  pub unsafe fn get_unchecked(&self, index: usize) -> u8 {
    debug_assert!(index < self.len());
    unsafe { *self.as_bytes().get_unchecked(index) }
  }

  /// Returns a mutable reference to the byte at `index` without a bounds
  /// check, the mutable counterpart of [`OwnedStr::get_unchecked`].
  ///
  /// # Safety
  ///
  /// `index` must be less than [`OwnedStr::len`].
  pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut u8 {
    debug_assert!(index < self.len());
    unsafe { self.as_bytes_mut().get_unchecked_mut(index) }
  }

  /// Returns an iterator over the content bytes.
  pub fn iter(&self) -> core::slice::Iter<'_, u8> {
    self.as_bytes().iter()
  }

  /// Ensures `capacity() >= new_capacity`, migrating to the heap if the
  /// request exceeds [`INLINE_CAP`]. Requests already within capacity are
  /// no-ops, so repeated calls with the same argument are idempotent. On
  /// failure the string is unchanged.
  pub fn reserve(&mut self, new_capacity: usize) -> Result<(), AllocError> {
    match &mut self.repr {
      Repr::Large(large) => return large.reserve(new_capacity, false),
      Repr::Small(_) if new_capacity <= INLINE_CAP => return Ok(()),
      Repr::Small(_) => {}
    }
    self.spill(new_capacity)
  }

  /// Migrates inline content into a fresh heap buffer of at least
  /// `new_capacity` bytes. The existing representation is only replaced
  /// once the allocation has succeeded.
  fn spill(&mut self, new_capacity: usize) -> Result<(), AllocError> {
    let Repr::Small(small) = &self.repr else {
      return Ok(());
    };
    let capacity = new_capacity.max(2 * INLINE_CAP);
    let mut large = LargeRepr::with_capacity(capacity)?;
    large.append(small.as_bytes());
    self.repr = Repr::Large(large);
    Ok(())
  }

  /// Appends a single byte.
  pub fn push(&mut self, byte: u8) -> Result<(), AllocError> {
    self.push_bytes(&[byte])
  }

  /// Appends the bytes of a string slice.
  pub fn push_str(&mut self, s: &str) -> Result<(), AllocError> {
    self.push_bytes(s.as_bytes())
  }

  /// Appends `bytes`, growing the capacity as needed. Growth is amortized
  /// (factor 2). All-or-nothing: on failure nothing has been appended.
  pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
    let required = self
      .len()
      .checked_add(bytes.len())
      .ok_or(AllocError::CapacityOverflow)?;
    if required > self.capacity() {
      self.reserve(required)?;
    }
    match &mut self.repr {
      Repr::Small(small) => small.append(bytes),
      Repr::Large(large) => large.append(bytes),
    }
    Ok(())
  }

  /// Resets the length to zero and zero-fills the buffer up to the
  /// current capacity. The capacity and representation are unchanged.
  pub fn clear(&mut self) {
    match &mut self.repr {
      Repr::Small(small) => small.clear(),
      Repr::Large(large) => large.clear(),
    }
  }

  /// Shortens the content to `new_len` bytes, zero-filling the removed
  /// tail. Longer lengths are ignored. The capacity and representation
  /// are unchanged; a heap-backed string stays heap-backed even when the
  /// remaining content would fit inline.
  pub fn truncate(&mut self, new_len: usize) {
    match &mut self.repr {
      Repr::Small(small) => small.truncate(new_len),
      Repr::Large(large) => large.truncate(new_len),
    }
  }

  /// Trims the capacity to fit the content. A heap-backed string whose
  /// content fits inline reverts to the inline representation and frees
  /// its buffer; otherwise the buffer shrinks to exactly `len()`. Never
  /// increases capacity.
  pub fn compact(&mut self) -> Result<(), AllocError> {
    match &mut self.repr {
      Repr::Small(_) => return Ok(()),
      Repr::Large(large) if large.len() > INLINE_CAP => {
        return large.compact();
      }
      Repr::Large(_) => {}
    }
    let Repr::Large(large) = &self.repr else {
      return Ok(());
    };
    let mut small = SmallRepr::new();
    small.append(large.as_bytes());
    self.repr = Repr::Small(small);
    Ok(())
  }

  /// Deep-copies the content into a new string. The representation is
  /// re-evaluated against [`INLINE_CAP`], so cloning a heap-backed string
  /// whose content has shrunk may legitimately produce an inline clone.
  pub fn try_clone(&self) -> Result<Self, AllocError> {
    Self::from_view(self.as_view())
  }

  /// Converts into a `Vec<u8>` of the content bytes. Heap-backed strings
  /// transfer their allocation without copying.
  pub fn into_bytes(self) -> Vec<u8> {
    match self.repr {
      Repr::Small(small) => small.as_bytes().to_vec(),
      Repr::Large(large) => large.into_vec(),
    }
  }

  /// Converts into a `String` if the content is valid UTF-8.
  pub fn into_string(self) -> Result<String, FromUtf8Error> {
    String::from_utf8(self.into_bytes())
  }
}

impl Default for OwnedStr {
  fn default() -> Self {
    Self::new()
  }
}

impl Clone for OwnedStr {
  fn clone(&self) -> Self {
    unwrap_alloc(self.try_clone())
  }
}

impl Deref for OwnedStr {
  type Target = [u8];

  fn deref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl DerefMut for OwnedStr {
  fn deref_mut(&mut self) -> &mut [u8] {
    self.as_bytes_mut()
  }
}

impl fmt::Debug for OwnedStr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "\"{}\"", self.as_bytes().escape_ascii())
  }
}

impl fmt::Display for OwnedStr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&String::from_utf8_lossy(self.as_bytes()), f)
  }
}

impl Hash for OwnedStr {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.as_bytes().hash(state);
  }
}

impl PartialEq for OwnedStr {
  /// Byte-wise equality over `[0, len)`, independent of which
  /// representation backs either operand.
  fn eq(&self, other: &Self) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl Eq for OwnedStr {}

impl PartialEq<[u8]> for OwnedStr {
  fn eq(&self, other: &[u8]) -> bool {
    self.as_bytes() == other
  }
}

impl PartialEq<&[u8]> for OwnedStr {
  fn eq(&self, other: &&[u8]) -> bool {
    self.as_bytes() == *other
  }
}

impl PartialEq<str> for OwnedStr {
  fn eq(&self, other: &str) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<&str> for OwnedStr {
  fn eq(&self, other: &&str) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<OwnedStr> for str {
  fn eq(&self, other: &OwnedStr) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<OwnedStr> for &str {
  fn eq(&self, other: &OwnedStr) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<OwnedStr> for [u8] {
  fn eq(&self, other: &OwnedStr) -> bool {
    self == other.as_bytes()
  }
}

impl PartialEq<StrView<'_>> for OwnedStr {
  fn eq(&self, other: &StrView<'_>) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<OwnedStr> for StrView<'_> {
  fn eq(&self, other: &OwnedStr) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl From<StrView<'_>> for OwnedStr {
  fn from(view: StrView<'_>) -> Self {
    unwrap_alloc(Self::from_view(view))
  }
}

impl From<&str> for OwnedStr {
  fn from(s: &str) -> Self {
    Self::from(StrView::from_str(s))
  }
}

impl From<&[u8]> for OwnedStr {
  fn from(bytes: &[u8]) -> Self {
    Self::from(StrView::from_bytes(bytes))
  }
}

impl From<String> for OwnedStr {
  fn from(s: String) -> Self {
    Self::from(s.as_str())
  }
}

impl From<OwnedStr> for Vec<u8> {
  fn from(s: OwnedStr) -> Self {
    s.into_bytes()
  }
}

impl FromStr for OwnedStr {
  type Err = AllocError;

  fn from_str(s: &str) -> Result<Self, AllocError> {
    Self::from_view(StrView::from_str(s))
  }
}

impl Extend<u8> for OwnedStr {
  fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
    for byte in iter {
      unwrap_alloc(self.push(byte));
    }
  }
}

impl<'a> IntoIterator for &'a OwnedStr {
  type Item = &'a u8;
  type IntoIter = core::slice::Iter<'a, u8>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a> IntoIterator for &'a mut OwnedStr {
  type Item = &'a mut u8;
  type IntoIter = core::slice::IterMut<'a, u8>;

  fn into_iter(self) -> Self::IntoIter {
    self.as_bytes_mut().iter_mut()
  }
}

#[cfg(feature = "serde")]
mod serde_impl {
  use super::*;

  impl serde::Serialize for OwnedStr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
      S: serde::Serializer,
    {
      match self.as_str() {
        Ok(s) => serializer.serialize_str(s),
        Err(_) => serializer.serialize_bytes(self.as_bytes()),
      }
    }
  }

  impl<'de> serde::Deserialize<'de> for OwnedStr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
      D: serde::Deserializer<'de>,
    {
      use serde::de::Error;
      use serde::de::SeqAccess;
      use serde::de::Visitor;

      struct OwnedStrVisitor;

      impl<'de> Visitor<'de> for OwnedStrVisitor {
        type Value = OwnedStr;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
          f.write_str("a string or byte sequence")
        }

        fn visit_str<E: Error>(self, v: &str) -> Result<OwnedStr, E> {
          OwnedStr::from_view(StrView::from_str(v)).map_err(E::custom)
        }

        fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<OwnedStr, E> {
          OwnedStr::from_view(StrView::from_bytes(v)).map_err(E::custom)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<OwnedStr, A::Error>
        where
          A: SeqAccess<'de>,
        {
          let mut s = OwnedStr::new();
          while let Some(byte) = seq.next_element::<u8>()? {
            s.push(byte).map_err(Error::custom)?;
          }
          Ok(s)
        }
      }

      deserializer.deserialize_bytes(OwnedStrVisitor)
    }
  }
}
