use core::{
	cmp,
	fmt,
	marker::PhantomData,
	mem::MaybeUninit,
	ops::{
		Deref,
		DerefMut
	},
	ptr,
	slice
};
use std::alloc::handle_alloc_error;
use crate::{
	alloc::{
		Allocator,
		Global
	},
	error::TryReserveError,
	raw::{
		Meta,
		RawTagVec
	}
};

/// Contiguous growable array type that starts in borrowed memory and moves to
/// owned memory only when it has to.
///
/// A `TagVec` can be created over a caller-supplied buffer
/// (see [`from_buffer`](TagVec::from_buffer)).
/// Elements are written in this buffer as long as they fit.
/// When the buffer is full, the next growing operation allocates a new block
/// with the vector's allocator, moves the elements there, and from then on
/// behaves like a regular `Vec`.
/// The borrowed buffer is never resized nor deallocated by the vector.
///
/// The capacity and ownership flag are stored together in a metadata value of
/// type `M` implementing [`Meta`], which also defines the maximum capacity.
/// `ALIGN` overrides the alignment of the allocated blocks when it is greater
/// than the alignment of `T` (`0` means no override).
///
/// Every operation that may allocate returns a [`TryReserveError`] on failure,
/// in which case the vector is left unchanged.
/// Precondition violations (out of bounds indexes, insufficient capacity in the
/// `_assume_capacity` variants, capacity requests above `M::MAX_CAPACITY`) panic.
///
/// # Examples
///
/// ```
/// # use core::mem::MaybeUninit;
/// # use tag_vec::TagVec;
/// let mut buffer = [MaybeUninit::uninit(); 2];
/// let mut vec: TagVec<'_, u32> = TagVec::from_buffer(&mut buffer);
/// vec.push(1)?;
/// vec.push(2)?;
/// assert!(vec.is_borrowed());
///
/// vec.push(3)?; // the buffer is full, elements are moved to the heap.
/// assert!(vec.is_owned());
/// assert_eq!(vec, [1, 2, 3]);
/// # Ok::<(), tag_vec::TryReserveError>(())
/// ```
pub struct TagVec<'a, M: Meta, T, A: Allocator, const ALIGN: usize> {
	/// Storage.
	buf: RawTagVec<M, T, A, ALIGN>,

	/// Number of initialized elements at the front of `buf`.
	len: usize,

	/// Remembers the lifetime of the buffer if it is borrowed.
	lifetime: PhantomData<&'a mut [T]>
}

impl<'a, M: Meta, T, A: Allocator, const ALIGN: usize> Drop for TagVec<'a, M, T, A, ALIGN> {
	fn drop(&mut self) {
		unsafe {
			// `buf` frees the memory afterward, if owned.
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.ptr(), self.len))
		}
	}
}

impl<'a, M: Meta, T, const ALIGN: usize> TagVec<'a, M, T, Global, ALIGN> {
	/// Creates a new empty `TagVec`.
	///
	/// The vector will not allocate until elements are pushed onto it.
	#[inline]
	pub fn new() -> Self {
		Self::new_in(Global)
	}

	/// Creates a new empty `TagVec` writing into the given buffer.
	///
	/// See [`from_buffer_in`](TagVec::from_buffer_in).
	#[inline]
	pub fn from_buffer(buffer: &'a mut [MaybeUninit<T>]) -> Self {
		Self::from_buffer_in(buffer, Global)
	}

	/// Creates a new empty `TagVec` owning exactly `capacity` slots.
	///
	/// See [`with_capacity_in`](TagVec::with_capacity_in).
	#[inline]
	pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
		Self::with_capacity_in(capacity, Global)
	}
}

impl<'a, M: Meta, T, A: Allocator, const ALIGN: usize> TagVec<'a, M, T, A, ALIGN> {
	/// Constructs a new, empty `TagVec<M, T, A, ALIGN>`.
	///
	/// Nothing is allocated: the capacity is 0 and the vector owns nothing.
	#[inline]
	pub fn new_in(alloc: A) -> Self {
		TagVec {
			buf: RawTagVec::new_in(alloc),
			len: 0,
			lifetime: PhantomData
		}
	}

	/// Constructs a new, empty `TagVec` using `buffer` as initial storage.
	///
	/// The capacity is the length of `buffer`.
	/// Nothing is allocated until more than `buffer.len()` elements are needed,
	/// and `buffer` is never deallocated by the vector.
	///
	/// # Panics
	///
	/// Panics if `buffer` is longer than `M::MAX_CAPACITY`,
	/// or if it is not empty and not aligned on `ALIGN` bytes.
	#[inline]
	pub fn from_buffer_in(buffer: &'a mut [MaybeUninit<T>], alloc: A) -> Self {
		TagVec {
			// SAFETY: `buffer` is borrowed for `'a`, as long as the vector.
			buf: unsafe { RawTagVec::from_buffer_in(buffer, alloc) },
			len: 0,
			lifetime: PhantomData
		}
	}

	/// Constructs a new, empty `TagVec` owning exactly `capacity` slots.
	///
	/// A zero capacity does not allocate.
	///
	/// # Panics
	///
	/// Panics if `capacity` exceeds `M::MAX_CAPACITY`.
	#[inline]
	pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
		Ok(TagVec {
			buf: RawTagVec::with_capacity_in(capacity, alloc)?,
			len: 0,
			lifetime: PhantomData
		})
	}

	/// Returns a reference to the underlying allocator.
	#[inline]
	pub fn allocator(&self) -> &A {
		self.buf.allocator()
	}

	/// Returns the length of the array.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Forces the length of the vector to `len`.
	///
	/// # Safety
	///
	/// `len` must not exceed the capacity and the first `len` elements must be initialized.
	#[inline]
	pub unsafe fn set_len(&mut self, len: usize) {
		debug_assert!(len <= self.capacity());
		self.len = len
	}

	/// Returns the number of elements the vector can hold without growing.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.buf.capacity()
	}

	/// Returns `true` if the storage was allocated by the vector.
	#[inline]
	pub fn is_owned(&self) -> bool {
		self.buf.is_owned()
	}

	/// Returns `true` if the storage is not owned by the vector:
	/// either a borrowed buffer, or no storage at all.
	#[inline]
	pub fn is_borrowed(&self) -> bool {
		!self.buf.is_owned()
	}

	/// Returns a raw pointer to the vector's buffer.
	///
	/// Any operation that grows the vector may move its elements,
	/// invalidating the pointer.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.buf.ptr()
	}

	/// Returns an unsafe mutable pointer to the vector's buffer.
	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.buf.ptr()
	}

	/// Extracts a slice containing the entire vector.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		unsafe {
			slice::from_raw_parts(self.as_ptr(), self.len)
		}
	}

	/// Extracts a mutable slice of the entire vector.
	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		unsafe {
			slice::from_raw_parts_mut(self.as_mut_ptr(), self.len)
		}
	}

	/// Returns the remaining spare capacity of the vector as a slice of
	/// `MaybeUninit<T>`.
	///
	/// The returned slice can be used to fill the vector with data before
	/// marking the data as initialized using the [`set_len`](TagVec::set_len) method.
	#[inline]
	pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
		let len = self.len;
		let spare = self.capacity() - len;
		unsafe {
			slice::from_raw_parts_mut(self.as_mut_ptr().add(len).cast::<MaybeUninit<T>>(), spare)
		}
	}

	fn required_capacity(&self, additional: usize) -> Result<usize, TryReserveError> {
		match self.len.checked_add(additional) {
			Some(required) if required <= M::MAX_CAPACITY => Ok(required),
			_ => Err(TryReserveError::CapacityOverflow)
		}
	}

	fn assert_spare_capacity(&self, additional: usize) {
		let spare = self.capacity() - self.len;
		if additional > spare {
			panic!("not enough spare capacity (need {}, have {})", additional, spare)
		}
	}

	fn check_range(&self, start: usize, count: usize) -> usize {
		match start.checked_add(count) {
			Some(end) if end <= self.len => end,
			_ => panic!("range of {} elements starting at {} is out of bounds (len is {})", count, start, self.len)
		}
	}

	/// Makes sure the capacity is at least `minimum`.
	///
	/// If the vector has to grow, its new capacity is computed by
	/// [`grow_capacity`](crate::raw::grow_capacity) so that successive calls
	/// have an amortized O(1) cost.
	///
	/// # Panics
	///
	/// Panics if `minimum` exceeds `M::MAX_CAPACITY`.
	#[inline]
	pub fn ensure_total_capacity(&mut self, minimum: usize) -> Result<(), TryReserveError> {
		unsafe {
			self.buf.grow_amortized(self.len, minimum)
		}
	}

	/// Makes sure the capacity is at least `minimum`, growing to exactly
	/// `minimum` if needed.
	///
	/// # Panics
	///
	/// Panics if `minimum` exceeds `M::MAX_CAPACITY`.
	#[inline]
	pub fn ensure_total_capacity_precise(&mut self, minimum: usize) -> Result<(), TryReserveError> {
		unsafe {
			self.buf.grow_exact(self.len, minimum)
		}
	}

	/// Reserves capacity for at least `additional` more elements.
	///
	/// Unlike [`ensure_total_capacity`](TagVec::ensure_total_capacity),
	/// a request that cannot be represented is reported as
	/// [`TryReserveError::CapacityOverflow`] instead of panicking.
	#[inline]
	pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
		let required = self.required_capacity(additional)?;
		self.ensure_total_capacity(required)
	}

	/// Reserves capacity for exactly `additional` more elements, if the vector
	/// needs to grow at all.
	#[inline]
	pub fn reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
		let required = self.required_capacity(additional)?;
		self.ensure_total_capacity_precise(required)
	}

	/// Appends an element to the back of the vector.
	#[inline]
	pub fn push(&mut self, value: T) -> Result<(), TryReserveError> {
		if self.len == self.capacity() {
			self.reserve(1)?;
		}

		self.push_assume_capacity(value);
		Ok(())
	}

	/// Appends an element to the back of the vector, which must not be full.
	///
	/// # Panics
	///
	/// Panics if the vector is full.
	#[inline]
	pub fn push_assume_capacity(&mut self, value: T) {
		let len = self.len;
		if len == self.capacity() {
			panic!("vector is full (capacity is {})", len)
		}

		unsafe {
			ptr::write(self.as_mut_ptr().add(len), value);
		}
		self.len = len + 1;
	}

	/// Removes the last element from a vector and returns it, or [`None`] if it
	/// is empty.
	#[inline]
	pub fn pop(&mut self) -> Option<T> {
		if self.len == 0 {
			None
		} else {
			self.len -= 1;
			unsafe {
				Some(ptr::read(self.as_ptr().add(self.len)))
			}
		}
	}

	/// Shortens the vector, keeping the first `len` elements and dropping
	/// the rest.
	///
	/// If `len` is greater than the vector's current length, this has no
	/// effect. The capacity is unchanged.
	pub fn truncate(&mut self, len: usize) {
		if len >= self.len {
			return
		}

		unsafe {
			let tail = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(len), self.len - len);
			self.len = len;
			ptr::drop_in_place(tail);
		}
	}

	/// Clears the vector, removing all values.
	///
	/// The capacity is unchanged.
	#[inline]
	pub fn clear(&mut self) {
		self.truncate(0)
	}

	/// Clears the vector and releases its storage.
	///
	/// Owned memory is deallocated, a borrowed buffer is forgotten.
	/// The vector is back to the state of [`new_in`](TagVec::new_in).
	pub fn clear_and_free(&mut self) {
		self.truncate(0);
		self.buf.reset();
	}

	/// Truncates the vector to `len` elements and gives back the unused owned memory.
	///
	/// This never fails: if no smaller block can be obtained the capacity is kept.
	/// The capacity of a borrowed buffer is never changed.
	pub fn shrink_and_free(&mut self, len: usize) {
		self.truncate(len);
		unsafe {
			self.buf.shrink(self.len, self.len)
		}
	}

	/// Drops the elements and releases owned storage.
	///
	/// This is what dropping the vector does. A borrowed buffer is left untouched.
	#[inline]
	pub fn release(self) {
		drop(self)
	}

	/// Moves the elements at `[index, len)` `count` slots to the right and
	/// hides them by setting the length to `index`.
	///
	/// Returns a pointer to the gap.
	/// If the caller does not restore the length, the hidden elements are leaked.
	///
	/// # Safety
	///
	/// `index` must not exceed the length and there must be room for `count` more elements.
	unsafe fn open_gap(&mut self, index: usize, count: usize) -> *mut T {
		let len = self.len;
		debug_assert!(index <= len && count <= self.capacity() - len);

		let p = self.as_mut_ptr().add(index);
		ptr::copy(p, p.add(count), len - index);
		self.len = index;
		p
	}

	/// Opens `count` uninitialized slots at `index`, moving the following elements
	/// to the right, and returns them. The vector must already have room for them.
	///
	/// # Safety
	///
	/// Every returned slot must be initialized before the vector is used again
	/// (including being dropped).
	///
	/// # Panics
	///
	/// Panics if `index > len` or if there are less than `count` spare slots.
	pub unsafe fn add_many_at_assume_capacity(&mut self, index: usize, count: usize) -> &mut [MaybeUninit<T>] {
		let len = self.len;
		if index > len {
			panic!("insertion index (is {}) should be <= len (which is {})", index, len);
		}
		self.assert_spare_capacity(count);

		let gap = self.open_gap(index, count);
		self.len = len + count;
		slice::from_raw_parts_mut(gap.cast::<MaybeUninit<T>>(), count)
	}

	/// Opens `count` uninitialized slots at `index`, growing the vector if needed
	/// and moving the following elements to the right, and returns them.
	///
	/// # Safety
	///
	/// Every returned slot must be initialized before the vector is used again
	/// (including being dropped).
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	pub unsafe fn add_many_at(&mut self, index: usize, count: usize) -> Result<&mut [MaybeUninit<T>], TryReserveError> {
		let len = self.len;
		if index > len {
			panic!("insertion index (is {}) should be <= len (which is {})", index, len);
		}

		self.reserve(count)?;
		Ok(self.add_many_at_assume_capacity(index, count))
	}

	/// Inserts an element at position `index` within the vector, shifting all
	/// elements after it to the right.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	pub fn insert(&mut self, index: usize, element: T) -> Result<(), TryReserveError> {
		let len = self.len;
		if index > len {
			panic!("insertion index (is {}) should be <= len (which is {})", index, len);
		}

		self.reserve(1)?;

		unsafe {
			let p = self.open_gap(index, 1);
			ptr::write(p, element);
		}
		self.len = len + 1;
		Ok(())
	}

	/// Removes and returns the element at position `index` within the vector,
	/// shifting all elements after it to the left.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	pub fn remove(&mut self, index: usize) -> T {
		let len = self.len;
		if index >= len {
			panic!("removal index (is {}) should be < len (is {})", index, len);
		}

		unsafe {
			// the place we are taking from.
			let p = self.as_mut_ptr().add(index);
			let ret = ptr::read(p);

			// Shift everything down to fill in that spot.
			ptr::copy(p.add(1), p, len - index - 1);
			self.len = len - 1;
			ret
		}
	}

	/// Removes an element from the vector and returns it.
	///
	/// The removed element is replaced by the last element of the vector.
	/// This does not preserve ordering, but is O(1).
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	pub fn swap_remove(&mut self, index: usize) -> T {
		let len = self.len;
		if index >= len {
			panic!("swap_remove index (is {}) should be < len (is {})", index, len);
		}

		unsafe {
			let base = self.as_mut_ptr();
			let ret = ptr::read(base.add(index));
			let last = len - 1;
			if index != last {
				ptr::copy_nonoverlapping(base.add(last), base.add(index), 1);
			}
			self.len = last;
			ret
		}
	}
}

impl<'a, M: Meta, T, A: Allocator, const ALIGN: usize> TagVec<'a, M, T, A, ALIGN> where T: Clone {
	/// Clones `items` into the gap opened at `index`.
	///
	/// If a clone panics, the elements after the gap are leaked.
	///
	/// # Safety
	///
	/// `index` must not exceed the length and there must be room for `items.len()` more elements.
	unsafe fn fill_gap(&mut self, index: usize, items: &[T]) {
		let len = self.len;
		let gap = self.open_gap(index, items.len());

		{
			let mut local_len = SetLenOnDrop::new(&mut self.len);
			for (i, item) in items.iter().enumerate() {
				ptr::write(gap.add(i), item.clone());
				local_len.increment_len(1);
			}
		}

		self.len = len + items.len();
	}

	/// Clones and appends all elements in a slice to the vector.
	///
	/// The vector grows at most once.
	pub fn extend_from_slice(&mut self, other: &[T]) -> Result<(), TryReserveError> {
		self.reserve(other.len())?;
		self.extend_from_slice_assume_capacity(other);
		Ok(())
	}

	/// Clones and appends all elements in a slice to the vector, which must already
	/// have room for them.
	///
	/// # Panics
	///
	/// Panics if there are less than `other.len()` spare slots.
	pub fn extend_from_slice_assume_capacity(&mut self, other: &[T]) {
		self.assert_spare_capacity(other.len());
		unsafe {
			self.fill_gap(self.len, other)
		}
	}

	/// Inserts clones of `items` at position `index`, shifting all elements after
	/// it to the right.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	pub fn insert_slice(&mut self, index: usize, items: &[T]) -> Result<(), TryReserveError> {
		let len = self.len;
		if index > len {
			panic!("insertion index (is {}) should be <= len (which is {})", index, len);
		}

		self.reserve(items.len())?;
		unsafe {
			self.fill_gap(index, items)
		}
		Ok(())
	}

	/// Replaces the `count` elements starting at `start` with clones of `items`.
	///
	/// `items` may be longer or shorter than `count`: the following elements are
	/// shifted accordingly. The vector only grows if `items` is longer than `count`,
	/// and is left unchanged if that fails.
	///
	/// # Panics
	///
	/// Panics if `start + count > len`.
	pub fn replace_range(&mut self, start: usize, count: usize, items: &[T]) -> Result<(), TryReserveError> {
		self.check_range(start, count);
		if items.len() > count {
			self.reserve(items.len() - count)?;
		}

		self.replace_range_assume_capacity(start, count, items);
		Ok(())
	}

	/// Replaces the `count` elements starting at `start` with clones of `items`,
	/// without growing.
	///
	/// # Panics
	///
	/// Panics if `start + count > len`, or if `items` is longer than `count` by more
	/// than the number of spare slots.
	pub fn replace_range_assume_capacity(&mut self, start: usize, count: usize, items: &[T]) {
		let len = self.len;
		let end = self.check_range(start, count);
		if items.len() > count {
			self.assert_spare_capacity(items.len() - count);
		}

		let overlap = cmp::min(count, items.len());
		self.as_mut_slice()[start..(start + overlap)].clone_from_slice(&items[..overlap]);

		if items.len() > count {
			unsafe {
				self.fill_gap(end, &items[count..])
			}
		} else if items.len() < count {
			let new_end = start + items.len();
			unsafe {
				let base = self.as_mut_ptr();
				// the tail is leaked if a destructor panics.
				self.len = new_end;
				ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(new_end), end - new_end));
				ptr::copy(base.add(end), base.add(new_end), len - end);
				self.len = len - (end - new_end);
			}
		}
	}

	/// Resizes the vector in-place so that `len` is equal to `new_len`.
	///
	/// If `new_len` is greater than `len`, the vector is extended by the
	/// difference, with each additional slot filled with `value`.
	/// If `new_len` is less than `len`, the vector is simply truncated.
	pub fn resize(&mut self, new_len: usize, value: T) -> Result<(), TryReserveError> {
		let len = self.len;
		if new_len > len {
			let additional = new_len - len;
			self.reserve(additional)?;
			for _ in 1..additional {
				self.push_assume_capacity(value.clone());
			}
			self.push_assume_capacity(value);
		} else {
			self.truncate(new_len);
		}

		Ok(())
	}
}

// Set the length of the vec when the `SetLenOnDrop` value goes out of scope.
//
// The idea is: The length field in SetLenOnDrop is a local variable
// that the optimizer will see does not alias with any stores through the Vec's data
// pointer. This is a workaround for alias analysis issue #32155
struct SetLenOnDrop<'a> {
	len: &'a mut usize,
	local_len: usize
}

impl<'a> SetLenOnDrop<'a> {
	#[inline]
	fn new(len: &'a mut usize) -> Self {
		SetLenOnDrop { local_len: *len, len }
	}

	#[inline]
	fn increment_len(&mut self, increment: usize) {
		self.local_len += increment;
	}
}

impl Drop for SetLenOnDrop<'_> {
	#[inline]
	fn drop(&mut self) {
		*self.len = self.local_len;
	}
}

impl<'a, M: Meta, T, const ALIGN: usize> Default for TagVec<'a, M, T, Global, ALIGN> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<'a, M: Meta, T: Clone, A: Allocator + Clone, const ALIGN: usize> Clone for TagVec<'a, M, T, A, ALIGN> {
	/// Clones the elements into owned storage of exactly `len` slots.
	fn clone(&self) -> Self {
		let mut vec = handle_reserve(Self::with_capacity_in(self.len, self.allocator().clone()));
		vec.extend_from_slice_assume_capacity(self);
		vec
	}
}

impl<'a, M: Meta, T, A: Allocator, const ALIGN: usize> Deref for TagVec<'a, M, T, A, ALIGN> {
	type Target = [T];

	#[inline]
	fn deref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<'a, M: Meta, T, A: Allocator, const ALIGN: usize> DerefMut for TagVec<'a, M, T, A, ALIGN> {
	#[inline]
	fn deref_mut(&mut self) -> &mut [T] {
		self.as_mut_slice()
	}
}

impl<'v, 'a, M: Meta, T, A: Allocator, const ALIGN: usize> IntoIterator for &'v TagVec<'a, M, T, A, ALIGN> {
	type Item = &'v T;
	type IntoIter = slice::Iter<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<'v, 'a, M: Meta, T, A: Allocator, const ALIGN: usize> IntoIterator for &'v mut TagVec<'a, M, T, A, ALIGN> {
	type Item = &'v mut T;
	type IntoIter = slice::IterMut<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter_mut()
	}
}

/// Extends the vector with the content of an iterator.
///
/// # Panics
///
/// Like `Vec`, panics on capacity overflow and aborts through
/// [`handle_alloc_error`] if the allocator fails.
impl<'a, M: Meta, T, A: Allocator, const ALIGN: usize> Extend<T> for TagVec<'a, M, T, A, ALIGN> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iterator: I) {
		let iterator = iterator.into_iter();
		let (lower, _) = iterator.size_hint();
		handle_reserve(self.reserve(lower));

		for item in iterator {
			handle_reserve(self.push(item))
		}
	}
}

impl<'a, M: Meta, T: fmt::Debug, A: Allocator, const ALIGN: usize> fmt::Debug for TagVec<'a, M, T, A, ALIGN> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl<'a, M: Meta, T, A: Allocator, const ALIGN: usize> AsRef<[T]> for TagVec<'a, M, T, A, ALIGN> {
	#[inline]
	fn as_ref(&self) -> &[T] {
		self
	}
}

impl<'a, M: Meta, T, A: Allocator, const ALIGN: usize> AsMut<[T]> for TagVec<'a, M, T, A, ALIGN> {
	#[inline]
	fn as_mut(&mut self) -> &mut [T] {
		self
	}
}

macro_rules! impl_slice_eq {
	([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
		impl<$($vars)*> PartialEq<$rhs> for $lhs where T: PartialEq<U> {
			#[inline]
			fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
		}
	}
}

impl_slice_eq! { ['a, 'b, T, U, O: Meta, P: Meta, A: Allocator, B: Allocator, const X: usize, const Y: usize] TagVec<'a, O, T, A, X>, TagVec<'b, P, U, B, Y> }
impl_slice_eq! { ['a, T, U, M: Meta, A: Allocator, const X: usize] TagVec<'a, M, T, A, X>, Vec<U> }
impl_slice_eq! { ['b, T, U, M: Meta, A: Allocator, const X: usize] Vec<T>, TagVec<'b, M, U, A, X> }
impl_slice_eq! { ['a, T, U, M: Meta, A: Allocator, const X: usize] TagVec<'a, M, T, A, X>, [U] }
impl_slice_eq! { ['a, T, U, M: Meta, A: Allocator, const X: usize] TagVec<'a, M, T, A, X>, &[U] }
impl_slice_eq! { ['a, T, U, M: Meta, A: Allocator, const X: usize] TagVec<'a, M, T, A, X>, &mut [U] }
impl_slice_eq! { ['b, T, U, M: Meta, A: Allocator, const X: usize] &[T], TagVec<'b, M, U, A, X> }
impl_slice_eq! { ['a, T, U, M: Meta, A: Allocator, const X: usize, const N: usize] TagVec<'a, M, T, A, X>, [U; N] }
impl_slice_eq! { ['a, T, U, M: Meta, A: Allocator, const X: usize, const N: usize] TagVec<'a, M, T, A, X>, &[U; N] }
impl_slice_eq! { ['b, T, U, M: Meta, A: Allocator, const X: usize, const N: usize] [T; N], TagVec<'b, M, U, A, X> }

impl<'a, M: Meta, T: Eq, A: Allocator, const ALIGN: usize> Eq for TagVec<'a, M, T, A, ALIGN> {}

// Central function for reserve error handling in infallible interfaces.
#[inline]
fn handle_reserve<T>(result: Result<T, TryReserveError>) -> T {
	match result {
		Err(TryReserveError::CapacityOverflow) => capacity_overflow(),
		Err(TryReserveError::AllocError { layout }) => handle_alloc_error(layout),
		Ok(t) => t
	}
}

// One central function responsible for reporting capacity overflows. This'll
// ensure that the code generation related to these panics is minimal as there's
// only one location which panics rather than a bunch throughout the module.
fn capacity_overflow() -> ! {
	panic!("capacity overflow");
}
