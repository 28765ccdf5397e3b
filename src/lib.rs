#![cfg_attr(all(feature = "no-std", not(test)), no_std)]

#[cfg(feature = "no-std")]
extern crate alloc;

pub mod collections;

pub use collections::linked_list::{
    LinkedList, LinkedListError, LinkedListNode, LinkedListResult, EMPTY_LIST_RENDERING,
};
