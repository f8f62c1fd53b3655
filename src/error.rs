use core::alloc::Layout;

/// Error returned by every operation that may need to allocate.
///
/// This is the only recoverable error of the crate. When it is returned the
/// vector is left exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryReserveError {
	/// The requested capacity cannot be represented, either because
	/// `len + additional` overflowed, because it exceeds the maximum capacity of
	/// the metadata format, or because its size in bytes does not fit a [`Layout`].
	#[error("capacity overflow")]
	CapacityOverflow,

	/// The allocator failed to provide a block for the given layout.
	#[error("memory allocation of {} bytes failed", layout.size())]
	AllocError {
		layout: Layout
	}
}
