mod common;

use common::Counting;
use std::{
	mem::MaybeUninit,
	rc::Rc
};
use tag_vec::{
	AlignedTagVec,
	TagVec,
	TryReserveError
};

#[test]
fn spills_on_the_third_push_and_frees_one_block() {
	let alloc = Counting::new();
	let mut buffer = [MaybeUninit::uninit(); 2];
	let mut vec: TagVec<'_, i32, &Counting> = TagVec::from_buffer_in(&mut buffer, &alloc);
	assert_eq!(vec.capacity(), 2);
	assert!(vec.is_borrowed());

	vec.push(1).unwrap();
	vec.push(2).unwrap();
	assert!(vec.is_borrowed());
	assert_eq!(alloc.allocations(), 0);

	vec.push(3).unwrap();
	assert!(vec.is_owned());
	assert_eq!(vec, [1, 2, 3]);
	assert_eq!(alloc.allocations(), 1);
	assert_eq!(alloc.remaps(), 0);
	assert_eq!(alloc.refused_remaps(), 0);

	vec.release();
	assert_eq!(alloc.deallocations(), 1);
	assert_eq!(alloc.live_blocks(), 0);
}

#[test]
fn staying_within_the_buffer_never_allocates() {
	let alloc = Counting::new();
	let mut buffer = [MaybeUninit::uninit(); 8];

	{
		let mut vec: TagVec<'_, u64, &Counting> = TagVec::from_buffer_in(&mut buffer, &alloc);
		vec.extend_from_slice(&[1, 2, 3, 4]).unwrap();
		vec.insert(0, 0).unwrap();
		vec.insert_slice(2, &[10, 11]).unwrap();
		assert_eq!(vec.remove(1), 1);
		vec.replace_range(0, 2, &[7, 7, 7]).unwrap();
		vec.swap_remove(0);
		vec.ensure_total_capacity(8).unwrap();
		vec.reserve(vec.capacity() - vec.len()).unwrap();
		vec.resize(8, 5).unwrap();
		assert_eq!(vec.len(), 8);
		assert!(vec.is_borrowed());
	}

	assert_eq!(alloc.allocations(), 0);
	assert_eq!(alloc.deallocations(), 0);
}

#[test]
fn elements_survive_the_move_and_are_dropped_once() {
	let alloc = Counting::new();
	let token = Rc::new(());
	let mut buffer = [MaybeUninit::uninit(), MaybeUninit::uninit(), MaybeUninit::uninit()];

	{
		let mut vec: TagVec<'_, Rc<()>, &Counting> = TagVec::from_buffer_in(&mut buffer, &alloc);
		for _ in 0..10 {
			vec.push(token.clone()).unwrap();
		}
		assert!(vec.is_owned());
		assert_eq!(Rc::strong_count(&token), 11);
	}

	assert_eq!(Rc::strong_count(&token), 1);
	assert_eq!(alloc.live_blocks(), 0);
}

#[test]
fn dropping_a_borrowed_vector_drops_its_elements_in_place() {
	let alloc = Counting::new();
	let token = Rc::new(());
	let mut buffer = [MaybeUninit::uninit(), MaybeUninit::uninit()];

	{
		let mut vec: TagVec<'_, Rc<()>, &Counting> = TagVec::from_buffer_in(&mut buffer, &alloc);
		vec.push(token.clone()).unwrap();
		vec.push(token.clone()).unwrap();
		assert_eq!(Rc::strong_count(&token), 3);
	}

	assert_eq!(Rc::strong_count(&token), 1);
	assert_eq!(alloc.deallocations(), 0);
}

#[test]
fn failed_spill_leaves_the_vector_borrowed() {
	let alloc = Counting::new();
	alloc.set_budget(0);
	let mut buffer = [MaybeUninit::uninit(); 2];
	let mut vec: TagVec<'_, i32, &Counting> = TagVec::from_buffer_in(&mut buffer, &alloc);
	vec.push(1).unwrap();
	vec.push(2).unwrap();

	match vec.push(3) {
		Err(TryReserveError::AllocError { layout }) => assert_eq!(layout.align(), 4),
		other => panic!("unexpected result: {:?}", other)
	}

	assert!(vec.is_borrowed());
	assert_eq!(vec.capacity(), 2);
	assert_eq!(vec, [1, 2]);
}

#[test]
fn clear_and_free_forgets_the_buffer() {
	let alloc = Counting::new();
	let mut buffer = [MaybeUninit::uninit(); 4];
	let mut vec: TagVec<'_, i32, &Counting> = TagVec::from_buffer_in(&mut buffer, &alloc);
	vec.extend_from_slice(&[1, 2]).unwrap();

	vec.clear_and_free();
	assert!(vec.is_empty());
	assert_eq!(vec.capacity(), 0);
	assert!(!vec.is_owned());
	assert_eq!(alloc.deallocations(), 0);

	vec.push(3).unwrap();
	assert!(vec.is_owned());
	assert_eq!(alloc.allocations(), 1);
}

#[test]
fn shrinking_keeps_the_buffer_capacity() {
	let alloc = Counting::new();
	let mut buffer = [MaybeUninit::uninit(); 16];
	let mut vec: TagVec<'_, i32, &Counting> = TagVec::from_buffer_in(&mut buffer, &alloc);
	vec.extend_from_slice(&[1, 2, 3, 4]).unwrap();

	vec.shrink_and_free(2);
	assert_eq!(vec, [1, 2]);
	assert_eq!(vec.capacity(), 16);
	assert!(vec.is_borrowed());
	assert_eq!(alloc.allocations() + alloc.deallocations(), 0);
}

#[test]
fn empty_buffer_behaves_like_new() {
	let alloc = Counting::new();
	let mut buffer: [MaybeUninit<i32>; 0] = [];
	let mut vec: TagVec<'_, i32, &Counting> = TagVec::from_buffer_in(&mut buffer, &alloc);
	assert_eq!(vec.capacity(), 0);
	vec.push(1).unwrap();
	assert_eq!(alloc.allocations(), 1);
}

#[test]
fn empty_buffer_ignores_the_alignment_override() {
	let alloc = Counting::new();
	let mut buffer: [MaybeUninit<u8>; 0] = [];
	let mut vec: AlignedTagVec<'_, u8, 64, &Counting> = AlignedTagVec::from_buffer_in(&mut buffer, &alloc);
	assert_eq!(vec.capacity(), 0);
	assert!(vec.is_borrowed());

	vec.push(1).unwrap();
	assert!(vec.is_owned());
	assert_eq!(vec, [1]);
	assert_eq!(vec.as_ptr() as usize % 64, 0);
	assert_eq!(alloc.allocations(), 1);
}

fn offset_with_alignment(buffer: &[MaybeUninit<u8>], align: usize, remainder: usize) -> usize {
	let addr = buffer.as_ptr() as usize;
	(0..align).find(|i| (addr + i) % align == remainder).unwrap()
}

#[test]
fn aligned_buffer_is_accepted() {
	let mut buffer = [MaybeUninit::uninit(); 256];
	let offset = offset_with_alignment(&buffer, 64, 0);
	let mut vec: AlignedTagVec<'_, u8, 64> = AlignedTagVec::from_buffer(&mut buffer[offset..(offset + 64)]);
	vec.extend_from_slice(&[1; 64]).unwrap();
	assert!(vec.is_borrowed());

	vec.push(2).unwrap();
	assert!(vec.is_owned());
	assert_eq!(vec.as_ptr() as usize % 64, 0);
}

#[test]
#[should_panic]
fn misaligned_buffer_is_rejected() {
	let mut buffer = [MaybeUninit::uninit(); 256];
	let offset = offset_with_alignment(&buffer, 64, 1);
	let _vec: AlignedTagVec<'_, u8, 64> = AlignedTagVec::from_buffer(&mut buffer[offset..]);
}
