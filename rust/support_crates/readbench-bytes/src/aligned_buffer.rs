//! Heap buffers with a guaranteed start address and size alignment.
//!
//! Ordinary `Vec<u8>` allocations only guarantee the alignment of `u8`, which
//! is not enough for `O_DIRECT` reads. [`AlignedBuffer`] allocates through
//! [`std::alloc`] with an explicit [`Layout`] and releases the memory in `Drop`,
//! so every exit path of the owning scope frees it exactly once.

use std::{
    alloc::{Layout, alloc_zeroed, dealloc},
    ptr::NonNull,
};

use readbench_common::{Result, error::Error};

use crate::align::{checked_align_up, is_ptr_aligned};

/// A zero-initialized, fixed-size byte buffer aligned for direct I/O.
///
/// Both the address of the first byte and the length are multiples of
/// `alignment`. The buffer owns its memory exclusively and can be moved to
/// another thread, which is how parallel chunk reads get one buffer each.
pub struct AlignedBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: the buffer exclusively owns its allocation; no aliasing pointers exist.
unsafe impl Send for AlignedBuffer {}
// SAFETY: shared access only hands out `&[u8]`.
unsafe impl Sync for AlignedBuffer {}

impl AlignedBuffer {
    /// Allocates a buffer of at least `size` bytes aligned to `alignment`.
    ///
    /// `size` is rounded up to a multiple of `alignment`.
    ///
    /// # Errors
    ///
    /// Returns an `Allocation` error if `alignment` is not a power of two, if
    /// `size` is zero, if the rounded size overflows the allocator's layout
    /// limits, or if the allocator is out of memory.
    pub fn allocate(size: usize, alignment: usize) -> Result<AlignedBuffer> {
        if !alignment.is_power_of_two() {
            return Err(Error::allocation(
                size,
                alignment,
                "alignment is not a power of two",
            ));
        }
        if size == 0 {
            return Err(Error::allocation(size, alignment, "size is zero"));
        }
        let capacity = checked_align_up(size, alignment)
            .ok_or_else(|| Error::allocation(size, alignment, "size overflow"))?;
        let layout = Layout::from_size_align(capacity, alignment)
            .map_err(|e| Error::allocation(size, alignment, e.to_string()))?;

        // SAFETY: the layout has a non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr)
            .ok_or_else(|| Error::allocation(size, alignment, "out of memory"))?;
        debug_assert!(is_ptr_aligned(ptr.as_ptr(), alignment));
        Ok(AlignedBuffer { ptr, layout })
    }

    /// Length of the buffer in bytes (always a multiple of [`alignment`](Self::alignment)).
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// Always `false`: zero-sized buffers are rejected at allocation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    #[inline]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `len` initialized (zeroed) bytes for the
        // lifetime of `self`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }

    /// Checks whether the buffer start is aligned to `alignment`.
    pub fn is_aligned(&self, alignment: usize) -> bool {
        is_ptr_aligned(self.as_ptr(), alignment)
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc_zeroed` with this exact layout
        // and is freed only here.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl std::ops::Deref for AlignedBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::ops::DerefMut for AlignedBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl std::fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len())
            .field("alignment", &self.alignment())
            .finish()
    }
}
