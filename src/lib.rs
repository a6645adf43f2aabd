//! # ownstr
//!
//! ### An owning byte string with small-string optimization
//!
//! This crate provides [`OwnedStr`], a single-owner string value that
//! stores short contents inline on the stack and transparently falls back
//! to an exclusively owned heap buffer for longer ones. Both layouts share
//! one fixed-size footprint; a tagged representation selects the active
//! one. A null terminator is maintained at all times, so the content can be
//! handed to C APIs through [`OwnedStr::as_c_ptr`] without copying.
//!
//! ---
//!
//! ## [`OwnedStr`]
//!
//! The owning string. Contents up to [`INLINE_CAP`] bytes (22 on 64-bit
//! targets, 10 on 32-bit) live inline and never allocate.
//!
//! ### Example
//!
//! ```rust
//! use ownstr::OwnedStr;
//!
//! let mut s = OwnedStr::from("small");
//! assert!(s.is_inline());
//!
//! s.push_str(" strings stay on the stack until they outgrow it")?;
//! assert!(s.is_large());
//! # Ok::<(), ownstr::AllocError>(())
//! ```
//!
//! ## [`StrView`]
//!
//! A non-owning `{pointer, length}` view over contiguous bytes, the input
//! side of every construction. Any `&str` or `&[u8]` converts into one, and
//! [`StrView::to_owned_str`] produces an owning copy with the
//! representation chosen by length.
//!
//! ## Representations
//!
//! The [`small_repr`] and [`large_repr`] modules expose the two storage
//! strategies. [`SmallRepr`] is a fixed inline buffer; [`LargeRepr`] owns a
//! heap buffer through [`HeapBuf`] and packs its length together with a
//! marker bit into a single word whose layout is a tested contract.
//!
//! ---
//!
//! ## Error handling
//!
//! Every operation that may allocate returns `Result<_, `[`AllocError`]`>`
//! and leaves the string untouched on failure. Checked indexing panics on
//! out-of-bounds access; the `unsafe` unchecked accessors are the
//! caller-verified fast path.
//!
//! ## `no_std` Support
//!
//! The crate is `no_std` (with `alloc`) unless the `std` feature is
//! enabled, making it suitable for embedded and other resource-constrained
//! targets.
//!
//! ## Features
//!
//! - `std`: Enables integration with the Rust standard library. When
//!   disabled, which is the default, the crate operates in `no_std` mode.
//! - `serde`†: Enables serialization and deserialization support via Serde.
//! - `is_variant`†, `constructors`†, `index`†: derived convenience APIs via
//!   `derive_more`.
//!
//! > † enabled by default

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;
extern crate core;

pub mod error;
pub mod heap_buf;
pub mod large_repr;
pub mod owned_str;
pub mod small_repr;
pub mod str_view;

pub use error::AllocError;
pub use heap_buf::HeapBuf;
pub use large_repr::LargeRepr;
pub use large_repr::MAX_LEN;
pub use owned_str::OwnedStr;
pub use owned_str::Repr;
pub use small_repr::INLINE_CAP;
pub use small_repr::SmallRepr;
pub use str_view::StrView;
