//! Allocation accounting for [`OwnedStr`].
//!
//! Wraps the system allocator with allocation/free counters to verify that
//! inline strings never allocate, that every heap buffer is freed exactly
//! once, and that moving a string out never double-frees. Everything runs
//! in a single test function so no other test's allocations can skew the
//! counters.

use std::alloc::GlobalAlloc;
use std::alloc::Layout;
use std::alloc::System;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use ownstr::INLINE_CAP;
use ownstr::OwnedStr;

static ALLOCS: AtomicUsize = AtomicUsize::new(0);
static FREES: AtomicUsize = AtomicUsize::new(0);

struct CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    ALLOCS.fetch_add(1, Ordering::SeqCst);
    unsafe { System.alloc(layout) }
  }

  unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
    ALLOCS.fetch_add(1, Ordering::SeqCst);
    unsafe { System.alloc_zeroed(layout) }
  }

  unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
    FREES.fetch_add(1, Ordering::SeqCst);
    unsafe { System.dealloc(ptr, layout) }
  }

  unsafe fn realloc(
    &self,
    ptr: *mut u8,
    layout: Layout,
    new_size: usize,
  ) -> *mut u8 {
    // A realloc neither creates nor destroys an allocation, so the
    // alloc/free balance is unaffected.
    unsafe { System.realloc(ptr, layout, new_size) }
  }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn snapshot() -> (usize, usize) {
  (ALLOCS.load(Ordering::SeqCst), FREES.load(Ordering::SeqCst))
}

#[test]
fn allocation_accounting() {
  let long = "a string that is definitely longer than the inline capacity";
  assert!(long.len() > INLINE_CAP);

  // Inline strings never touch the allocator.
  let (allocs, frees) = snapshot();
  {
    let mut s = OwnedStr::from("inline");
    s.push_str(" ok").unwrap();
    s.clear();
  }
  assert_eq!(snapshot(), (allocs, frees));

  // A heap-backed string allocates once and frees exactly once.
  let (allocs, frees) = snapshot();
  {
    let s = OwnedStr::from(long);
    assert!(s.is_large());
  }
  let (allocs_after, frees_after) = snapshot();
  assert_eq!(allocs_after, allocs + 1);
  assert_eq!(frees_after, frees + 1);

  // Moving out via mem::take transfers the buffer; dropping both the
  // source and the destination must free it exactly once.
  let (allocs, frees) = snapshot();
  {
    let mut src = OwnedStr::from(long);
    let dst = core::mem::take(&mut src);
    assert!(src.is_empty());
    assert!(src.is_inline());
    drop(src);
    drop(dst);
  }
  let (allocs_after, frees_after) = snapshot();
  assert_eq!(allocs_after, allocs + 1);
  assert_eq!(frees_after, frees + 1);

  // Cloning deep-copies; the clone owns its own buffer.
  let (allocs, frees) = snapshot();
  {
    let original = OwnedStr::from(long);
    let copy = original.clone();
    assert_eq!(copy, original);
    assert_ne!(copy.as_ptr(), original.as_ptr());
  }
  let (allocs_after, frees_after) = snapshot();
  assert_eq!(allocs_after, allocs + 2);
  assert_eq!(frees_after, frees + 2);

  // Compacting back under the inline threshold releases the heap buffer
  // immediately, not at drop time.
  let (allocs, frees) = snapshot();
  {
    let mut s = OwnedStr::from(long);
    s.truncate(4);
    assert!(s.is_large());
    s.compact().unwrap();
    assert!(s.is_inline());
    assert_eq!(snapshot(), (allocs + 1, frees + 1));
  }
  assert_eq!(snapshot(), (allocs + 1, frees + 1));

  // Zero-copy conversion hands the buffer to the Vec, which frees it.
  let (allocs, frees) = snapshot();
  {
    let s = OwnedStr::from(long);
    let bytes: Vec<u8> = s.into_bytes();
    assert_eq!(bytes.len(), long.len());
  }
  let (allocs_after, frees_after) = snapshot();
  assert_eq!(allocs_after, allocs + 1);
  assert_eq!(frees_after, frees + 1);
}
