use core::fmt;

use thiserror::Error;

cfg_if::cfg_if! {
    if #[cfg(feature = "no-std")] {
        use alloc::boxed::Box;
    } else {
        use std::boxed::Box;
    }
}

/// rendering of a list with no nodes
pub const EMPTY_LIST_RENDERING: &str = "This linked list is empty!";

pub type LinkedListResult<T> = Result<T, LinkedListError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LinkedListError {
    #[error("index {index} is out of range for a linked list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("operation requires a non-empty linked list")]
    EmptyList,
}

type Link<T> = Option<Box<LinkedListNode<T>>>;

/// a singly-linked list that owns its nodes. each node exclusively owns its
/// successor, so the chain can never alias or form a cycle.
pub struct LinkedList<T> {
    /// the first node, or None if the list is empty
    head: Link<T>,
    /// the number of nodes reachable from `head`
    len: usize,
}

impl<T> LinkedList<T> {
    /// create a new, empty LinkedList
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// get the number of nodes in the list
    pub fn size(&self) -> usize {
        self.len
    }

    /// returns true if the length of the list is 0
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// borrow the first node of the list, or None if the list is empty
    pub fn head(&self) -> Option<&LinkedListNode<T>> {
        self.head.as_deref()
    }

    /// borrow the last node of the list. there is no tail pointer so this
    /// walks the whole chain.
    pub fn tail(&self) -> LinkedListResult<&LinkedListNode<T>> {
        let Some(mut curr) = self.head.as_deref() else {
            log::debug!("tail() called on an empty linked list");
            return Err(LinkedListError::EmptyList);
        };

        while let Some(next) = curr.next.as_deref() {
            curr = next;
        }

        Ok(curr)
    }

    /// borrow the node at the 0-based `index`
    pub fn at(&self, index: usize) -> LinkedListResult<&LinkedListNode<T>> {
        if index >= self.len {
            return Err(self.out_of_range("at", index));
        }

        self.nodes()
            .nth(index)
            .ok_or(LinkedListError::IndexOutOfRange {
                index,
                len: self.len,
            })
    }

    /// link a new node holding `value` after the current tail
    pub fn append(&mut self, value: T) {
        let slot = self.slot_at(self.len);
        *slot = Some(Box::new(LinkedListNode::new(value)));
        self.len += 1;
    }

    /// make a new node holding `value` the head of the list
    pub fn prepend(&mut self, value: T) {
        let old_head = self.head.take();
        self.head = Some(Box::new(LinkedListNode::with_next(value, old_head)));
        self.len += 1;
    }

    /// insert `value` so that it becomes the node at `index`, shifting every
    /// later node back by one. `index == size()` appends.
    pub fn insert_at(&mut self, value: T, index: usize) -> LinkedListResult<()> {
        if index > self.len {
            return Err(self.out_of_range("insert_at", index));
        }

        // Before: (index - 1) -> (index)
        // After: (index - 1) -> (new) -> (index)
        let slot = self.slot_at(index);
        let successor = slot.take();
        *slot = Some(Box::new(LinkedListNode::with_next(value, successor)));
        self.len += 1;

        Ok(())
    }

    /// unlink the last node of the list and return its value
    pub fn pop(&mut self) -> LinkedListResult<T> {
        if self.len == 0 {
            log::debug!("pop() called on an empty linked list");
            return Err(LinkedListError::EmptyList);
        }

        let slot = self.slot_at(self.len - 1);
        let last = slot.take().ok_or(LinkedListError::EmptyList)?;
        self.len -= 1;

        Ok(last.value)
    }

    /// walk the chain to the link that holds (or would hold) the node at
    /// `index`. callers must ensure `index <= self.len`.
    fn slot_at(&mut self, index: usize) -> &mut Link<T> {
        let mut slot = &mut self.head;
        for _ in 0..index {
            match slot {
                Some(node) => slot = &mut node.next,
                None => break,
            }
        }
        slot
    }

    fn nodes(&self) -> Nodes<'_, T> {
        Nodes {
            curr: self.head.as_deref(),
        }
    }

    fn out_of_range(&self, op: &str, index: usize) -> LinkedListError {
        log::debug!(
            "{}() index {} is out of range for a linked list of length {}",
            op,
            index,
            self.len
        );
        LinkedListError::IndexOutOfRange {
            index,
            len: self.len,
        }
    }
}

impl<T: PartialEq> LinkedList<T> {
    /// returns true if any node holds a value equal to `value`
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// the index of the first node holding a value equal to `value`, or None
    /// if no node matches
    pub fn find(&self, value: &T) -> Option<usize> {
        if self.is_empty() {
            log::debug!("searching an empty linked list");
            return None;
        }

        self.nodes().position(|node| node.value == *value)
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LinkedList<T> {
    // unlink node by node, dropping the boxes recursively would use stack
    // proportional to the length of the list
    fn drop(&mut self) {
        let mut curr = self.head.take();
        while let Some(mut node) = curr {
            curr = node.next.take();
        }
    }
}

impl<T: fmt::Display> fmt::Display for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(EMPTY_LIST_RENDERING);
        }

        for node in self.nodes() {
            write!(f, "( {} ) -> ", node.value)?;
        }
        f.write_str("null")
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.nodes().map(|node| &node.value))
            .finish()
    }
}

/// a node in the linked list. nodes only store data, all linking is done by
/// the owning LinkedList
pub struct LinkedListNode<T> {
    value: T,
    next: Link<T>,
}

impl<T> LinkedListNode<T> {
    /// constructs a new node with no successor
    pub const fn new(value: T) -> Self {
        Self { value, next: None }
    }

    /// constructs a new node that owns `next` as its successor
    pub const fn with_next(value: T, next: Option<Box<LinkedListNode<T>>>) -> Self {
        Self { value, next }
    }

    /// immutably borrow the value of the node
    pub fn value(&self) -> &T {
        &self.value
    }

    /// mutably borrow the value of the node
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// borrow the successor of this node, None if this is the last node
    pub fn next(&self) -> Option<&LinkedListNode<T>> {
        self.next.as_deref()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedListNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("next", &self.next().map(|next| &next.value))
            .finish()
    }
}

struct Nodes<'a, T> {
    curr: Option<&'a LinkedListNode<T>>,
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a LinkedListNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let to_return = self.curr?;
        self.curr = to_return.next.as_deref();
        Some(to_return)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect<T: Clone>(ll: &LinkedList<T>) -> Vec<T> {
        ll.nodes().map(|node| node.value().clone()).collect()
    }

    #[test]
    fn linked_list_nodes_are_sendable() {
        fn send<S: Send>(_: S) {}
        send(LinkedListNode::new(42));
    }

    #[test]
    fn linked_lists_are_sendable() {
        fn send<S: Send>(_: S) {}
        send(LinkedList::<u32>::new());
    }

    #[test]
    fn new_list_is_empty() {
        let ll = LinkedList::<u32>::new();
        assert_eq!(ll.size(), 0);
        assert!(ll.is_empty());
    }

    #[test]
    fn head_on_empty_list_returns_none() {
        let ll = LinkedList::<u32>::new();
        assert!(ll.head().is_none());
    }

    #[test]
    fn tail_on_empty_list_returns_err() {
        let ll = LinkedList::<u32>::new();
        assert_eq!(ll.tail().err(), Some(LinkedListError::EmptyList));
    }

    #[test]
    fn can_append() {
        let mut ll = LinkedList::new();
        ll.append(73);
        assert_eq!(ll.size(), 1);
        ll.append(42);
        assert_eq!(ll.size(), 2);
        assert_eq!(collect(&ll), [73, 42]);
    }

    #[test]
    fn can_prepend() {
        let mut ll = LinkedList::new();
        ll.prepend(73);
        assert_eq!(ll.size(), 1);
        ll.prepend(42);
        assert_eq!(ll.size(), 2);
        assert_eq!(collect(&ll), [42, 73]);
    }

    #[test]
    fn head_after_prepend_is_most_recent_value() {
        let mut ll = LinkedList::new();
        for i in 0..5 {
            ll.prepend(i);
            assert_eq!(ll.head().map(|node| *node.value()), Some(i));
        }
    }

    #[test]
    fn tail_after_append_is_most_recent_value() {
        let mut ll = LinkedList::new();
        for i in 0..5 {
            ll.append(i);
            assert_eq!(ll.tail().map(|node| *node.value()), Ok(i));
        }
    }

    #[test]
    fn single_node_is_both_head_and_tail() {
        let mut ll = LinkedList::new();
        ll.append(73);
        let head = ll.head().expect("list should have a head");
        let tail = ll.tail().expect("list should have a tail");
        assert!(core::ptr::eq(head, tail));
        assert!(tail.next().is_none());
    }

    #[test]
    fn at_returns_node_at_index() {
        let mut ll = LinkedList::new();
        for i in 10..15 {
            ll.append(i);
        }
        for i in 0..5 {
            assert_eq!(*ll.at(i).expect("index should be in range").value(), i + 10);
        }
    }

    #[test]
    fn at_out_of_range_returns_err_without_mutating() {
        let mut ll = LinkedList::new();
        ll.append(1);
        ll.append(2);
        assert_eq!(
            ll.at(2).err(),
            Some(LinkedListError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(ll.at(usize::MAX).is_err());
        assert_eq!(ll.size(), 2);
        assert_eq!(collect(&ll), [1, 2]);
    }

    #[test]
    fn at_on_empty_list_returns_err() {
        let ll = LinkedList::<u32>::new();
        assert!(ll.at(0).is_err());
    }

    #[test]
    fn pop_on_empty_list_returns_err() {
        let mut ll = LinkedList::<u32>::new();
        assert_eq!(ll.pop(), Err(LinkedListError::EmptyList));
        assert_eq!(ll.size(), 0);
    }

    #[test]
    fn pop_on_single_node_empties_list() {
        let mut ll = LinkedList::new();
        ll.append(73);
        assert_eq!(ll.pop(), Ok(73));
        assert!(ll.is_empty());
        assert!(ll.head().is_none());
        assert_eq!(ll.to_string(), EMPTY_LIST_RENDERING);
    }

    #[test]
    fn pop_removes_last_node() {
        let mut ll = LinkedList::new();
        ll.append(1);
        ll.append(2);
        ll.append(3);
        assert_eq!(ll.pop(), Ok(3));
        assert_eq!(ll.size(), 2);
        assert_eq!(ll.tail().map(|node| *node.value()), Ok(2));
        assert_eq!(ll.to_string(), "( 1 ) -> ( 2 ) -> null");
    }

    #[test]
    fn pop_past_empty_keeps_reporting_err() {
        let mut ll = LinkedList::new();
        ll.append(1);
        ll.append(2);
        assert!(ll.pop().is_ok());
        assert!(ll.pop().is_ok());
        for _ in 0..3 {
            assert_eq!(ll.pop(), Err(LinkedListError::EmptyList));
            assert_eq!(ll.size(), 0);
        }
    }

    #[test]
    fn find_returns_first_matching_index() {
        let mut ll = LinkedList::new();
        for v in [5, 7, 5, 9] {
            ll.append(v);
        }
        assert_eq!(ll.find(&5), Some(0));
        assert_eq!(ll.find(&9), Some(3));
        assert_eq!(ll.find(&8), None);
    }

    #[test]
    fn find_and_contains_on_empty_list() {
        let ll = LinkedList::<u32>::new();
        assert_eq!(ll.find(&1), None);
        assert!(!ll.contains(&1));
    }

    #[test]
    fn contains_agrees_with_find() {
        let mut ll = LinkedList::new();
        for v in ["peter", "paul", "mary"] {
            ll.append(v);
        }
        for v in ["peter", "paul", "mary", "john"] {
            assert_eq!(ll.contains(&v), ll.find(&v).is_some());
        }
        assert!(!ll.contains(&"john"));
    }

    #[test]
    fn insert_at_zero_behaves_like_prepend() {
        let mut inserted = LinkedList::new();
        let mut prepended = LinkedList::new();
        for i in 0..4 {
            inserted.insert_at(i, 0).expect("index 0 is always valid");
            prepended.prepend(i);
        }
        assert_eq!(collect(&inserted), collect(&prepended));
        assert_eq!(inserted.size(), prepended.size());
    }

    #[test]
    fn insert_at_size_behaves_like_append() {
        let mut inserted = LinkedList::new();
        let mut appended = LinkedList::new();
        for i in 0..4 {
            let size = inserted.size();
            inserted.insert_at(i, size).expect("size is always valid");
            appended.append(i);
        }
        assert_eq!(collect(&inserted), collect(&appended));
    }

    #[test]
    fn insert_at_shifts_later_nodes() {
        let mut ll = LinkedList::new();
        for v in [1, 2, 4, 5] {
            ll.append(v);
        }
        ll.insert_at(3, 2).expect("index should be in range");
        assert_eq!(ll.size(), 5);
        assert_eq!(*ll.at(2).expect("index should be in range").value(), 3);
        assert_eq!(collect(&ll), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn insert_at_out_of_range_returns_err_without_mutating() {
        let mut ll = LinkedList::new();
        ll.append(1);
        assert_eq!(
            ll.insert_at(9, 2),
            Err(LinkedListError::IndexOutOfRange { index: 2, len: 1 })
        );
        assert_eq!(ll.size(), 1);
        assert_eq!(collect(&ll), [1]);
    }

    #[test]
    fn empty_list_renders_sentinel() {
        let ll = LinkedList::<i32>::new();
        assert_eq!(ll.to_string(), "This linked list is empty!");
    }

    #[test]
    fn node_value_can_be_mutated() {
        let mut node = LinkedListNode::new(1);
        *node.value_mut() += 1;
        assert_eq!(*node.value(), 2);
    }

    #[test]
    fn node_with_next_links_successor() {
        let tail = Box::new(LinkedListNode::new(2));
        let node = LinkedListNode::with_next(1, Some(tail));
        assert_eq!(node.next().map(|next| *next.value()), Some(2));
        assert_eq!(format!("{:?}", node), "Node { value: 1, next: Some(2) }");
    }

    #[test]
    fn debug_lists_values() {
        let mut ll = LinkedList::new();
        ll.append(1);
        ll.append(2);
        assert_eq!(format!("{:?}", ll), "[1, 2]");
    }

    #[test]
    fn dropping_long_list_does_not_overflow_stack() {
        let mut ll = LinkedList::new();
        for i in 0..200_000u32 {
            ll.prepend(i);
        }
        drop(ll);
    }

    #[test]
    fn smoke_test() {
        let mut ll = LinkedList::new();
        assert_eq!(ll.to_string(), "This linked list is empty!");

        for v in [1, 2, 3, -4, 5, 6] {
            ll.append(v);
        }
        assert_eq!(
            ll.to_string(),
            "( 1 ) -> ( 2 ) -> ( 3 ) -> ( -4 ) -> ( 5 ) -> ( 6 ) -> null"
        );

        ll.prepend(55);
        ll.prepend(44);
        assert_eq!(ll.head().map(|node| *node.value()), Some(44));
        assert_eq!(ll.size(), 8);
        assert_eq!(ll.tail().map(|node| *node.value()), Ok(6));

        assert_eq!(*ll.at(2).expect("index should be in range").value(), 1);
        assert!(ll.at(125).is_err());
        assert_eq!(ll.find(&-4), Some(5));
        assert!(ll.contains(&55));

        for expected in [6, 5, -4, 3, 2, 1, 55, 44] {
            assert_eq!(ll.pop(), Ok(expected));
        }
        assert_eq!(ll.pop(), Err(LinkedListError::EmptyList));
        assert_eq!(ll.pop(), Err(LinkedListError::EmptyList));
        assert_eq!(ll.size(), 0);
        assert_eq!(ll.to_string(), EMPTY_LIST_RENDERING);
    }

    #[test]
    fn appended_scenario_finds_and_indexes() {
        let mut ll = LinkedList::new();
        for v in [1, 2, 3, -4, 5, 6] {
            ll.append(v);
        }
        assert_eq!(*ll.at(2).expect("index should be in range").value(), 3);
        assert_eq!(ll.find(&-4), Some(3));
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use proptest_derive::Arbitrary;
    use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};
    use rand::Rng;

    use super::*;

    fn render(reference: &[u32]) -> String {
        if reference.is_empty() {
            return EMPTY_LIST_RENDERING.to_string();
        }
        let mut rendered: String = reference
            .iter()
            .map(|v| format!("( {} ) -> ", v))
            .collect();
        rendered.push_str("null");
        rendered
    }

    proptest_state_machine::prop_state_machine! {
        #![proptest_config(Config {
            failure_persistence: None,
            .. Config::default()
        })]

        #[test]
        fn linked_list_state_machine_test(
            sequential
            1..200
            =>
            LinkedList<u32>
        );
    }

    #[derive(Clone, Debug)]
    pub enum Transition {
        Append(u32),
        Prepend(u32),
        Pop,
        InsertAt(u32, usize),
    }

    pub struct LinkedListStateMachine;

    impl ReferenceStateMachine for LinkedListStateMachine {
        type State = Vec<u32>;
        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(Vec::new()).boxed()
        }

        fn transitions(state: &Self::State) -> BoxedStrategy<Self::Transition> {
            // one past the end is generated on purpose to cover the
            // out of range path
            let max_index = state.len() + 1;
            prop_oneof![
                2 => any::<u32>().prop_map(Transition::Append),
                2 => any::<u32>().prop_map(Transition::Prepend),
                2 => Just(Transition::Pop),
                2 => (any::<u32>(), 0..=max_index)
                    .prop_map(|(value, index)| Transition::InsertAt(value, index)),
            ]
            .boxed()
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            match transition {
                Transition::Append(value) => state.push(*value),
                Transition::Prepend(value) => state.insert(0, *value),
                Transition::Pop => {
                    state.pop();
                }
                Transition::InsertAt(value, index) => {
                    if *index <= state.len() {
                        state.insert(*index, *value);
                    }
                }
            }
            state
        }
    }

    impl StateMachineTest for LinkedList<u32> {
        type SystemUnderTest = Self;
        type Reference = LinkedListStateMachine;

        fn init_test(
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            Self::new()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            transition: Transition,
        ) -> Self::SystemUnderTest {
            let len_before = state.size();
            match transition {
                Transition::Append(value) => {
                    state.append(value);
                    assert_eq!(state.tail().map(|node| *node.value()), Ok(value));
                }
                Transition::Prepend(value) => {
                    state.prepend(value);
                    assert_eq!(state.head().map(|node| *node.value()), Some(value));
                }
                Transition::Pop => {
                    let res = state.pop();
                    assert_eq!(res.is_err(), len_before == 0);
                }
                Transition::InsertAt(value, index) => {
                    let res = state.insert_at(value, index);
                    if index <= len_before {
                        assert!(res.is_ok());
                        assert_eq!(state.at(index).map(|node| *node.value()), Ok(value));
                    } else {
                        assert_eq!(
                            res,
                            Err(LinkedListError::IndexOutOfRange {
                                index,
                                len: len_before
                            })
                        );
                    }
                }
            }
            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            assert_eq!(state.size(), ref_state.len());
            assert_eq!(state.is_empty(), state.head().is_none());
            assert_eq!(state.nodes().count(), state.size());

            for (ll_node, ref_value) in state.nodes().zip(ref_state.iter()) {
                assert_eq!(ll_node.value(), ref_value);
            }

            assert_eq!(state.to_string(), render(ref_state));
        }
    }

    #[derive(Arbitrary, Debug)]
    enum Operation {
        Append(u32),
        Prepend(u32),
        InsertAt(u32),
        Pop,
        At,
        Find,
    }

    proptest! {
        #[test]
        fn at_matches_reference(values in vec(any::<i64>(), 0..64), index in 0usize..80) {
            let mut ll = LinkedList::new();
            for v in values.iter() {
                ll.append(*v);
            }

            match values.get(index) {
                Some(v) => prop_assert_eq!(ll.at(index).map(|node| *node.value()), Ok(*v)),
                None => prop_assert!(ll.at(index).is_err()),
            }
            prop_assert_eq!(ll.size(), values.len());
        }

        #[test]
        fn find_returns_smallest_matching_index(values in vec(0u8..8, 0..64), needle in 0u8..8) {
            let mut ll = LinkedList::new();
            for v in values.iter() {
                ll.append(*v);
            }

            let expected = values.iter().position(|v| *v == needle);
            prop_assert_eq!(ll.find(&needle), expected);
            prop_assert_eq!(ll.contains(&needle), expected.is_some());
        }

        #[test]
        #[ignore]
        fn longform(ops in vec(any::<Operation>(), 2048)) {
            let mut reference: Vec<u32> = Vec::new();
            let mut ll = LinkedList::new();

            fn random_index(len: usize) -> usize {
                rand::thread_rng().gen_range(0..=len)
            }

            for op in ops.iter() {
                match op {
                    Operation::Append(v) => {
                        reference.push(*v);
                        ll.append(*v);
                    }
                    Operation::Prepend(v) => {
                        reference.insert(0, *v);
                        ll.prepend(*v);
                    }
                    Operation::InsertAt(v) => {
                        let index = random_index(reference.len());
                        reference.insert(index, *v);
                        ll.insert_at(*v, index).unwrap();
                    }
                    Operation::Pop => {
                        assert_eq!(ll.pop().ok(), reference.pop());
                    }
                    Operation::At => {
                        let index = random_index(reference.len());
                        assert_eq!(
                            ll.at(index).ok().map(|node| *node.value()),
                            reference.get(index).copied()
                        );
                    }
                    Operation::Find => {
                        if !reference.is_empty() {
                            let index = random_index(reference.len() - 1);
                            let needle = reference[index];
                            assert_eq!(ll.find(&needle), reference.iter().position(|v| *v == needle));
                        }
                    }
                }
                assert_eq!(ll.size(), reference.len());
            }
        }
    }
}
