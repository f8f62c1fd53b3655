//! Allocator interface used by the vectors of this crate.
//!
//! The standard `Allocator` trait is still unstable, so this module provides
//! its own minimal version. Besides allocation and deallocation it exposes
//! [`Allocator::remap`], which lets an allocator extend (or shrink) a block
//! without the vector having to copy its contents by itself.
use core::{
	alloc::Layout,
	ptr::NonNull
};

/// The allocator could not provide the requested memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("memory allocation failed")]
pub struct AllocError;

/// A memory allocator.
///
/// # Safety
///
/// Blocks returned by [`allocate`](Allocator::allocate) and
/// [`remap`](Allocator::remap) must be valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and must stay valid
/// until they are passed to `remap` or `deallocate`.
pub unsafe trait Allocator {
	/// Allocates a block of memory fitting `layout`.
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

	/// Tries to resize the block at `ptr` to `new_size` bytes, keeping its
	/// alignment and its first `min(layout.size(), new_size)` bytes.
	///
	/// The returned pointer may differ from `ptr`.
	/// On `None` the original block is untouched and still owned by the caller,
	/// which is expected to fall back to allocate, copy and deallocate.
	/// Allocators without a resize primitive simply always return `None`.
	///
	/// # Safety
	///
	/// `ptr` must denote a block currently allocated by this allocator with
	/// the given `layout`, and `new_size` must be non-zero and, when rounded
	/// up to `layout.align()`, must not overflow `isize`.
	unsafe fn remap(&self, ptr: NonNull<u8>, layout: Layout, new_size: usize) -> Option<NonNull<u8>>;

	/// Releases the block at `ptr`.
	///
	/// # Safety
	///
	/// `ptr` must denote a block currently allocated by this allocator with
	/// the given `layout`.
	unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<'a, A: Allocator + ?Sized> Allocator for &'a A {
	#[inline]
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
		(**self).allocate(layout)
	}

	#[inline]
	unsafe fn remap(&self, ptr: NonNull<u8>, layout: Layout, new_size: usize) -> Option<NonNull<u8>> {
		(**self).remap(ptr, layout, new_size)
	}

	#[inline]
	unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
		(**self).deallocate(ptr, layout)
	}
}

/// The global memory allocator, as registered with `#[global_allocator]`.
///
/// `remap` is implemented with `realloc`, which may move the block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Global;

unsafe impl Allocator for Global {
	#[inline]
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
		if layout.size() == 0 {
			// SAFETY: the alignment of a layout is never zero.
			return Ok(unsafe { NonNull::new_unchecked(layout.align() as *mut u8) })
		}

		// SAFETY: the layout has a non-zero size.
		let ptr = unsafe { std::alloc::alloc(layout) };
		NonNull::new(ptr).ok_or(AllocError)
	}

	#[inline]
	unsafe fn remap(&self, ptr: NonNull<u8>, layout: Layout, new_size: usize) -> Option<NonNull<u8>> {
		if layout.size() == 0 {
			return None
		}

		NonNull::new(std::alloc::realloc(ptr.as_ptr(), layout, new_size))
	}

	#[inline]
	unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
		if layout.size() != 0 {
			std::alloc::dealloc(ptr.as_ptr(), layout)
		}
	}
}
