//! Routes script heap allocations through the Rust global allocator.
//!
//! The engine owns every block it requests; this allocator only records each
//! block's size in a small header, because `std::alloc` needs the layout back
//! at free time. A failed allocation raises the context's [`FatalSignal`].

use std::alloc::{self, Layout};
use std::ptr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rquickjs::allocator::Allocator;

/// Engine-visible block pointer.
type RawMemPtr = *mut u8;

/// Header in front of every block. Also the block alignment.
const HEADER_SIZE: usize = 16;

/// Flag raised when the host allocator cannot satisfy a request.
///
/// Atomic because the allocator may outlive the context handle on another
/// thread's stack during teardown.
#[derive(Debug, Clone, Default)]
pub(crate) struct FatalSignal(Arc<AtomicBool>);

impl FatalSignal {
    pub(crate) fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) struct HostAllocator {
    fatal: FatalSignal,
}

impl HostAllocator {
    pub(crate) fn new(fatal: FatalSignal) -> Self {
        Self { fatal }
    }

    fn layout(size: usize) -> Option<Layout> {
        let total = size.max(1).checked_add(HEADER_SIZE)?;
        Layout::from_size_align(total, HEADER_SIZE).ok()
    }

    /// Stamp the header on a fresh block and return the engine-visible pointer.
    fn finish(&self, base: *mut u8, size: usize) -> RawMemPtr {
        if base.is_null() {
            self.fatal.raise();
            tracing::warn!(size, "host allocator exhausted");
            return ptr::null_mut();
        }
        // SAFETY: `base` points to at least HEADER_SIZE + size bytes aligned to HEADER_SIZE.
        unsafe {
            base.cast::<usize>().write(size);
            base.add(HEADER_SIZE)
        }
    }
}

unsafe impl Allocator for HostAllocator {
    fn alloc(&mut self, size: usize) -> RawMemPtr {
        let Some(layout) = Self::layout(size) else {
            return ptr::null_mut();
        };
        // SAFETY: the layout is never zero-sized.
        let base = unsafe { alloc::alloc(layout) };
        self.finish(base, size)
    }

    fn calloc(&mut self, count: usize, size: usize) -> RawMemPtr {
        let Some(layout) = count.checked_mul(size).and_then(Self::layout) else {
            return ptr::null_mut();
        };
        // SAFETY: the layout is never zero-sized.
        let base = unsafe { alloc::alloc_zeroed(layout) };
        self.finish(base, layout.size() - HEADER_SIZE)
    }

    unsafe fn dealloc(&mut self, ptr: RawMemPtr) {
        if ptr.is_null() {
            return;
        }
        // SAFETY: `ptr` came from this allocator, so a header precedes it.
        unsafe {
            let base = ptr.sub(HEADER_SIZE);
            let size = base.cast::<usize>().read();
            if let Some(layout) = Self::layout(size) {
                alloc::dealloc(base, layout);
            }
        }
    }

    unsafe fn realloc(&mut self, ptr: RawMemPtr, new_size: usize) -> RawMemPtr {
        if ptr.is_null() {
            return self.alloc(new_size);
        }
        if new_size == 0 {
            // SAFETY: forwarded caller contract.
            unsafe { self.dealloc(ptr) };
            return ptr::null_mut();
        }
        let Some(new_layout) = Self::layout(new_size) else {
            return ptr::null_mut();
        };
        // SAFETY: `ptr` came from this allocator, so a header precedes it and
        // the old layout is reconstructible from it.
        unsafe {
            let base = ptr.sub(HEADER_SIZE);
            let old_size = base.cast::<usize>().read();
            let Some(old_layout) = Self::layout(old_size) else {
                return ptr::null_mut();
            };
            let grown = alloc::realloc(base, old_layout, new_layout.size());
            self.finish(grown, new_size)
        }
    }

    unsafe fn usable_size(ptr: RawMemPtr) -> usize {
        if ptr.is_null() {
            return 0;
        }
        // SAFETY: `ptr` came from this allocator, so a header precedes it.
        unsafe { ptr.sub(HEADER_SIZE).cast::<usize>().read() }
    }
}
