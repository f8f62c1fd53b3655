//! Low-level storage of a [`TagVec`](crate::generic::TagVec).
//!
//! [`RawTagVec`] knows where the elements live, how many of them fit there,
//! and whether that memory belongs to the vector or to the caller.
//! It is responsible for every interaction with the allocator, and in
//! particular for the growth algorithm.
//! It never inspects, drops or counts the elements it stores: callers pass
//! the current length whenever data has to be moved.
use core::{
	alloc::Layout,
	cmp,
	marker::PhantomData,
	mem::{
		self,
		MaybeUninit
	},
	ptr::{
		self,
		NonNull
	}
};
use crate::{
	alloc::Allocator,
	error::TryReserveError
};

/// Assumed size of a cache line, in bytes.
///
/// Every growth step adds at least a cache line worth of elements
/// (and at least one element).
pub const CACHE_LINE: usize = 64;

/// Capacity and ownership tag of a buffer.
///
/// This crate provides two implementations of this trait:
/// [`lean::Meta`](crate::lean::Meta) packs the ownership flag in the top bit of
/// the capacity word, and [`wide::Meta`](crate::wide::Meta) stores it in a
/// separate `bool`.
///
/// # Safety
///
/// `capacity` and `is_owned` must return exactly the values last given to
/// `new` or `set`. [`RawTagVec`] relies on this to compute the layout of the
/// memory it deallocates.
pub unsafe trait Meta: Copy {
	/// Maximum capacity representable with this metadata format.
	const MAX_CAPACITY: usize;

	/// Creates a new tag.
	///
	/// # Panics
	///
	/// Panics if `capacity` exceeds [`Self::MAX_CAPACITY`].
	fn new(capacity: usize, owned: bool) -> Self;

	/// Number of elements the buffer can hold.
	fn capacity(&self) -> usize;

	/// Returns `true` if the buffer was allocated by the vector itself.
	fn is_owned(&self) -> bool;

	/// Replaces the capacity and ownership flag.
	///
	/// # Panics
	///
	/// Panics if `capacity` exceeds [`Self::MAX_CAPACITY`].
	fn set(&mut self, capacity: usize, owned: bool);
}

/// Computes the capacity to grow to, given the `current` capacity and the
/// `minimum` capacity required.
///
/// Starting from `current`, the capacity is repeatedly increased by half of
/// itself plus a cache line worth of elements until it reaches `minimum`.
/// The computation saturates at `usize::MAX`.
pub fn grow_capacity<T>(current: usize, minimum: usize) -> usize {
	let base = cmp::max(1, CACHE_LINE / cmp::max(1, mem::size_of::<T>()));
	let mut capacity = current;
	loop {
		capacity = capacity.saturating_add(capacity / 2 + base);
		if capacity >= minimum {
			return capacity
		}
	}
}

/// A pointer, its capacity/ownership tag and the allocator to use with it.
///
/// This type does not in anyway inspect the memory that it manages. When dropped it
/// frees its memory if it owns it, but it *won't* try to drop its contents.
pub struct RawTagVec<M: Meta, T, A: Allocator, const ALIGN: usize> {
	/// Pointer to the data, either borrowed or owned.
	///
	/// Dangling (but aligned for `T`) when the capacity is zero.
	ptr: NonNull<T>,

	/// Capacity and ownership flag.
	meta: M,

	/// Allocator.
	alloc: A,

	marker: PhantomData<T>
}

unsafe impl<M: Meta + Send, T: Send, A: Allocator + Send, const ALIGN: usize> Send for RawTagVec<M, T, A, ALIGN> {}
unsafe impl<M: Meta + Sync, T: Sync, A: Allocator + Sync, const ALIGN: usize> Sync for RawTagVec<M, T, A, ALIGN> {}

impl<M: Meta, T, A: Allocator, const ALIGN: usize> Drop for RawTagVec<M, T, A, ALIGN> {
	fn drop(&mut self) {
		if let Some((ptr, layout)) = self.current_memory() {
			unsafe {
				self.alloc.deallocate(ptr, layout)
			}
		}
	}
}

impl<M: Meta, T, A: Allocator, const ALIGN: usize> RawTagVec<M, T, A, ALIGN> {
	/// Alignment of the memory blocks allocated by this buffer.
	///
	/// This is `align_of::<T>()` unless `ALIGN` asks for more.
	///
	/// # Panics
	///
	/// Panics if `ALIGN` is neither zero nor a power of two.
	#[inline]
	pub fn alignment() -> usize {
		assert!(ALIGN == 0 || ALIGN.is_power_of_two(), "alignment override (is {}) must be zero or a power of two", ALIGN);
		cmp::max(ALIGN, mem::align_of::<T>())
	}

	/// Creates an empty buffer, without allocating.
	#[inline]
	pub fn new_in(alloc: A) -> Self {
		Self::alignment();

		RawTagVec {
			ptr: NonNull::dangling(),
			meta: M::new(0, false),
			alloc,
			marker: PhantomData
		}
	}

	/// Creates a buffer over caller-owned memory.
	///
	/// The memory is never resized nor deallocated by the returned buffer.
	/// An empty `buffer` gives the same result as [`new_in`](Self::new_in).
	///
	/// # Safety
	///
	/// `buffer` must outlive the returned value, and must not be accessed
	/// through any other path while the returned value uses it.
	///
	/// # Panics
	///
	/// Panics if `buffer` is longer than `M::MAX_CAPACITY` or if a non-empty
	/// `buffer` is not aligned on [`Self::alignment`].
	#[inline]
	pub unsafe fn from_buffer_in(buffer: &mut [MaybeUninit<T>], alloc: A) -> Self {
		let align = Self::alignment();
		assert!(buffer.len() <= M::MAX_CAPACITY, "buffer length (is {}) exceeds the maximum capacity (which is {})", buffer.len(), M::MAX_CAPACITY);

		if buffer.is_empty() {
			return Self::new_in(alloc)
		}

		let ptr = buffer.as_mut_ptr().cast::<T>();
		assert!(ptr as usize % align == 0, "buffer is not aligned on {} bytes", align);

		RawTagVec {
			// SAFETY: slices are never null.
			ptr: NonNull::new_unchecked(ptr),
			meta: M::new(buffer.len(), false),
			alloc,
			marker: PhantomData
		}
	}

	/// Creates an owned buffer with exactly the given capacity.
	///
	/// A zero capacity does not allocate.
	///
	/// # Panics
	///
	/// Panics if `capacity` exceeds `M::MAX_CAPACITY`.
	#[inline]
	pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
		let mut raw = Self::new_in(alloc);
		// SAFETY: there is no element to move.
		unsafe { raw.grow_exact(0, capacity)? };
		Ok(raw)
	}

	/// Returns a pointer to the first slot of the buffer.
	#[inline]
	pub fn ptr(&self) -> *mut T {
		self.ptr.as_ptr()
	}

	/// Returns a reference to the underlying allocator.
	#[inline]
	pub fn allocator(&self) -> &A {
		&self.alloc
	}

	/// Number of slots in the buffer.
	///
	/// Zero-sized types never need any memory: their capacity is always `M::MAX_CAPACITY`.
	#[inline]
	pub fn capacity(&self) -> usize {
		if mem::size_of::<T>() == 0 {
			M::MAX_CAPACITY
		} else {
			self.meta.capacity()
		}
	}

	/// Returns `true` if the memory was allocated by this buffer.
	#[inline]
	pub fn is_owned(&self) -> bool {
		self.meta.is_owned()
	}

	fn layout(capacity: usize) -> Result<Layout, TryReserveError> {
		let size = mem::size_of::<T>().checked_mul(capacity).ok_or(TryReserveError::CapacityOverflow)?;
		Layout::from_size_align(size, Self::alignment()).map_err(|_| TryReserveError::CapacityOverflow)
	}

	/// Returns the memory allocated by this buffer and its layout.
	///
	/// Returns `None` if the memory is borrowed, if there is none,
	/// or if the size of `T` is 0.
	fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
		if mem::size_of::<T>() == 0 || !self.meta.is_owned() {
			None
		} else {
			// We have an allocated chunk of memory, so we can bypass runtime
			// checks to get our current layout.
			unsafe {
				let size = mem::size_of::<T>() * self.meta.capacity();
				let layout = Layout::from_size_align_unchecked(size, Self::alignment());
				Some((self.ptr.cast(), layout))
			}
		}
	}

	fn set_owned(&mut self, ptr: NonNull<u8>, capacity: usize) {
		self.ptr = ptr.cast();
		self.meta.set(capacity, true);
	}

	/// Capacity an amortized growth from `capacity` to at least `minimum` ends up with.
	///
	/// This is [`grow_capacity`] clamped to `M::MAX_CAPACITY`.
	fn amortized_capacity(capacity: usize, minimum: usize) -> usize {
		cmp::min(grow_capacity::<T>(capacity, minimum), M::MAX_CAPACITY)
	}

	/// Makes sure the buffer can hold at least `minimum` elements,
	/// growing it according to [`grow_capacity`] if it cannot.
	///
	/// The first `len` elements are preserved.
	///
	/// # Safety
	///
	/// The first `len` slots of the buffer must be initialized and the buffer
	/// must still be valid (a borrowed buffer must not have been freed).
	///
	/// # Panics
	///
	/// Panics if `minimum` exceeds `M::MAX_CAPACITY` or if `len` exceeds the current capacity.
	pub unsafe fn grow_amortized(&mut self, len: usize, minimum: usize) -> Result<(), TryReserveError> {
		let capacity = self.capacity();
		if capacity >= minimum {
			return Ok(())
		}

		assert!(minimum <= M::MAX_CAPACITY, "requested capacity (is {}) exceeds the maximum capacity (which is {})", minimum, M::MAX_CAPACITY);
		self.grow_exact(len, Self::amortized_capacity(capacity, minimum))
	}

	/// Makes sure the buffer can hold at least `minimum` elements,
	/// growing it to exactly `minimum` if it cannot.
	///
	/// Owned memory is first remapped through the allocator. If that fails, or if
	/// the memory is borrowed, a new block is allocated, the first `len` elements
	/// are moved into it and the old block is released if it was owned.
	/// The new block is always owned.
	///
	/// On error the buffer is left untouched.
	///
	/// # Safety
	///
	/// The first `len` slots of the buffer must be initialized and the buffer
	/// must still be valid (a borrowed buffer must not have been freed).
	///
	/// # Panics
	///
	/// Panics if `minimum` exceeds `M::MAX_CAPACITY` or if `len` exceeds the current capacity.
	pub unsafe fn grow_exact(&mut self, len: usize, minimum: usize) -> Result<(), TryReserveError> {
		let capacity = self.capacity();
		if capacity >= minimum {
			return Ok(())
		}

		assert!(minimum <= M::MAX_CAPACITY, "requested capacity (is {}) exceeds the maximum capacity (which is {})", minimum, M::MAX_CAPACITY);
		assert!(len <= capacity, "length (is {}) exceeds the capacity (which is {})", len, capacity);

		let new_layout = Self::layout(minimum)?;
		let current_memory = self.current_memory();

		match current_memory {
			Some((ptr, layout)) => {
				if let Some(new_ptr) = self.alloc.remap(ptr, layout, new_layout.size()) {
					self.set_owned(new_ptr, minimum);
					return Ok(())
				}

				log::trace!("remap from {} to {} bytes failed, moving {} elements", layout.size(), new_layout.size(), len);
			},
			None => {
				if capacity > 0 {
					log::trace!("moving {} elements out of a borrowed buffer of capacity {}", len, capacity);
				}
			}
		}

		let new_ptr = self.alloc.allocate(new_layout).map_err(|_| TryReserveError::AllocError { layout: new_layout })?;
		ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr().cast::<T>(), len);

		if let Some((ptr, layout)) = current_memory {
			self.alloc.deallocate(ptr, layout)
		}

		self.set_owned(new_ptr, minimum);
		Ok(())
	}

	/// Gives back owned memory beyond `capacity` slots, keeping the first `len` elements.
	///
	/// The memory is remapped if the allocator allows it, and moved to a smaller
	/// block otherwise. If no smaller block can be allocated, the buffer is left as is.
	/// Has no effect on borrowed memory.
	///
	/// # Safety
	///
	/// The first `len` slots of the buffer must be initialized.
	///
	/// # Panics
	///
	/// Panics if `len` exceeds `capacity`.
	pub unsafe fn shrink(&mut self, len: usize, capacity: usize) {
		assert!(len <= capacity, "length (is {}) exceeds the requested capacity (which is {})", len, capacity);

		let (ptr, layout) = match self.current_memory() {
			Some(memory) => memory,
			None => return
		};

		if capacity >= self.meta.capacity() {
			return
		}

		if capacity == 0 {
			self.reset();
			return
		}

		let new_layout = match Self::layout(capacity) {
			Ok(layout) => layout,
			Err(_) => return
		};

		if let Some(new_ptr) = self.alloc.remap(ptr, layout, new_layout.size()) {
			self.set_owned(new_ptr, capacity);
			return
		}

		match self.alloc.allocate(new_layout) {
			Ok(new_ptr) => {
				ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr().cast::<T>(), len);
				self.alloc.deallocate(ptr, layout);
				self.set_owned(new_ptr, capacity);
			},
			Err(_) => {
				log::trace!("could not shrink {} bytes to {} bytes, keeping the current block", layout.size(), new_layout.size());
			}
		}
	}

	/// Releases owned memory (if any) and goes back to the empty state.
	///
	/// Borrowed memory is simply forgotten.
	pub fn reset(&mut self) {
		if let Some((ptr, layout)) = self.current_memory() {
			unsafe {
				self.alloc.deallocate(ptr, layout)
			}
		}

		self.ptr = NonNull::dangling();
		self.meta.set(0, false);
	}
}
