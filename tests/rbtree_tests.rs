//! Unit tests for RbTree.
//!
//! Covers insertion, hinted insertion, erasure, bound queries, teardown,
//! cloning and the pluggable node storage.

use ordtree::map::TreeMap;
use ordtree::pair::Pair;
use ordtree::tree::{
    ByFn, First, Identity, Less, Node, NodeId, NodeStorage, Position, RbTree, SlabStorage,
};
use rstest::rstest;
use std::cell::Cell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

fn letters() -> RbTree<Pair<i32, &'static str>, First, Less> {
    let mut tree = RbTree::from_parts(First, Less, SlabStorage::new());
    tree.insert(Pair::new(10, "a"));
    tree.insert(Pair::new(20, "b"));
    tree.insert(Pair::new(5, "c"));
    tree
}

fn pairs(tree: &RbTree<Pair<i32, &'static str>, First, Less>) -> Vec<(i32, &'static str)> {
    tree.iter().map(|pair| (*pair.key(), *pair.value())).collect()
}

// =============================================================================
// Worked Examples
// =============================================================================

#[rstest]
fn test_iteration_is_sorted_by_key() {
    let tree = letters();
    assert_eq!(pairs(&tree), vec![(5, "c"), (10, "a"), (20, "b")]);
}

#[rstest]
fn test_bounds_on_letters() {
    let tree = letters();
    assert_eq!(tree.get(tree.lower_bound(&10)).map(Pair::key), Some(&10));
    assert_eq!(tree.get(tree.upper_bound(&10)).map(Pair::key), Some(&20));

    let (lower, upper) = tree.equal_range(&15);
    assert_eq!(lower, upper);
    assert_eq!(tree.get(lower).map(Pair::value), Some(&"b"));
}

#[rstest]
fn test_erase_minimum_moves_begin() {
    let mut tree = letters();
    assert_eq!(tree.erase_key(&5), 1);
    assert_eq!(pairs(&tree), vec![(10, "a"), (20, "b")]);
    assert_eq!(tree.get(tree.begin()).map(Pair::value), Some(&"a"));
    assert!(tree.validate().is_ok());
}

#[rstest]
fn test_erase_middle_of_thousand_increasing_keys() {
    let mut tree: RbTree<u32> = (0..1000).collect();
    let first = tree.find(&480);
    let last = tree.find(&520);
    assert_eq!(tree.erase_range(first, last), 40);

    assert_eq!(tree.len(), 960);
    assert!(tree.iter().zip(tree.iter().skip(1)).all(|(a, b)| a < b));
    assert!(!tree.contains(&480));
    assert!(!tree.contains(&519));
    assert!(tree.contains(&479));
    assert!(tree.contains(&520));
    assert!(tree.validate().is_ok());
}

// =============================================================================
// Insertion
// =============================================================================

#[rstest]
fn test_duplicate_insert_is_noop() {
    let mut tree = letters();
    let (position, inserted) = tree.insert(Pair::new(10, "z"));
    assert!(!inserted);
    assert_eq!(tree.get(position).map(Pair::value), Some(&"a"));
    assert_eq!(tree.len(), 3);
}

#[rstest]
fn test_insert_then_find() {
    let mut tree: RbTree<i32> = (0..50).map(|value| value * 2).collect();
    let (position, inserted) = tree.insert(31);
    assert!(inserted);
    assert_eq!(tree.find(&31), position);
}

#[rstest]
fn test_extend_first_duplicate_wins() {
    let mut tree = RbTree::from_parts(First, Less, SlabStorage::new());
    tree.extend([Pair::new(1, "first"), Pair::new(1, "second"), Pair::new(2, "two")]);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get(tree.find(&1)).map(Pair::value), Some(&"first"));
}

#[rstest]
#[case::ascending((0..200).collect::<Vec<i32>>())]
#[case::descending((0..200).rev().collect::<Vec<i32>>())]
#[case::interleaved((0..100).flat_map(|value| [value, 199 - value]).collect::<Vec<i32>>())]
fn test_insert_orders_stay_balanced(#[case] values: Vec<i32>) {
    let mut tree = RbTree::new();
    for value in &values {
        tree.insert(*value);
        assert!(tree.validate().is_ok());
    }
    let black_height = tree.validate().unwrap();
    // A tree of black height h holds at least 2^h - 1 nodes.
    assert!(black_height <= 8);
    assert_eq!(tree.len(), 200);
}

// =============================================================================
// Hinted Insertion
// =============================================================================

#[rstest]
fn test_hint_before_position() {
    let mut tree: RbTree<i32> = [10, 20, 30].into_iter().collect();
    let hint = tree.find(&20);
    let position = tree.insert_hint(hint, 15);
    assert_eq!(tree.get(position), Some(&15));
    assert_eq!(tree.next_position(position), hint);
    assert!(tree.validate().is_ok());
}

#[rstest]
fn test_hint_after_position() {
    let mut tree: RbTree<i32> = [10, 20, 30].into_iter().collect();
    let hint = tree.find(&20);
    let position = tree.insert_hint(hint, 25);
    assert_eq!(tree.prev_position(position), hint);
    assert!(tree.validate().is_ok());
}

#[rstest]
fn test_hint_at_begin() {
    let mut tree: RbTree<i32> = [10, 20, 30].into_iter().collect();
    let position = tree.insert_hint(tree.begin(), 1);
    assert_eq!(tree.begin(), position);
    assert!(tree.validate().is_ok());
}

#[rstest]
#[case::far_too_low(0, 100)]
#[case::far_too_high(99, -5)]
#[case::end_but_small(-1, 3)]
fn test_wrong_hint_falls_back(#[case] hint_key: i32, #[case] value: i32) {
    let mut tree: RbTree<i32> = (0..100).collect();
    let hint = if hint_key < 0 {
        tree.end()
    } else {
        tree.find(&hint_key)
    };
    let position = tree.insert_hint(hint, value);
    assert_eq!(tree.get(position), Some(&value));
    assert_eq!(tree.find(&value), position);
    assert!(tree.validate().is_ok());
}

#[rstest]
fn test_hint_on_equivalent_key_returns_existing() {
    let mut tree: RbTree<i32> = (0..10).collect();
    let existing = tree.find(&4);
    assert_eq!(tree.insert_hint(existing, 4), existing);
    assert_eq!(tree.len(), 10);
}

#[rstest]
fn test_hint_into_empty_tree() {
    let mut tree: RbTree<i32> = RbTree::new();
    let position = tree.insert_hint(tree.end(), 7);
    assert_eq!(tree.get(position), Some(&7));
    assert_eq!(tree.validate(), Ok(1));
}

// =============================================================================
// Erasure
// =============================================================================

#[rstest]
fn test_erase_keeps_other_positions() {
    let mut tree: RbTree<i32> = (0..64).collect();
    let kept: Vec<(i32, Position)> = (0..64)
        .filter(|value| value % 3 != 0)
        .map(|value| (value, tree.find(&value)))
        .collect();
    for value in (0..64).step_by(3) {
        assert_eq!(tree.erase_key(&value), 1);
    }
    for (value, position) in kept {
        assert_eq!(tree.get(position), Some(&value));
    }
    assert!(tree.validate().is_ok());
}

#[rstest]
fn test_erase_key_reports_count() {
    let mut tree: RbTree<i32> = (0..5).collect();
    assert_eq!(tree.erase_key(&3), 1);
    assert_eq!(tree.erase_key(&3), 0);
    assert_eq!(tree.find(&3), tree.end());
}

#[rstest]
fn test_erase_whole_range_clears() {
    let mut tree: RbTree<i32> = (0..30).collect();
    assert_eq!(tree.erase_range(tree.begin(), tree.end()), 30);
    assert!(tree.is_empty());
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.validate(), Ok(0));
}

#[rstest]
fn test_erase_empty_range() {
    let mut tree: RbTree<i32> = (0..30).collect();
    let position = tree.find(&10);
    assert_eq!(tree.erase_range(position, position), 0);
    assert_eq!(tree.len(), 30);
}

#[rstest]
fn test_erase_everything_one_by_one() {
    let mut tree: RbTree<i32> = (0..257).collect();
    while !tree.is_empty() {
        let root_side = tree.len() / 2;
        let position = tree.find(&i32::try_from(root_side).unwrap());
        let target = if position.is_end() {
            tree.begin()
        } else {
            position
        };
        assert!(tree.erase(target).is_some());
        assert!(tree.validate().is_ok());
    }
    assert_eq!(tree.first(), None);
}

// =============================================================================
// Bounds
// =============================================================================

#[rstest]
#[case(-1, Some(0), Some(0))]
#[case(0, Some(0), Some(2))]
#[case(1, Some(2), Some(2))]
#[case(98, Some(98), None)]
#[case(99, None, None)]
fn test_bounds_on_even_numbers(
    #[case] key: i32,
    #[case] lower: Option<i32>,
    #[case] upper: Option<i32>,
) {
    let tree: RbTree<i32> = (0..50).map(|value| value * 2).collect();
    assert_eq!(tree.get(tree.lower_bound(&key)).copied(), lower);
    assert_eq!(tree.get(tree.upper_bound(&key)).copied(), upper);
    assert_eq!(tree.count(&key), usize::from(key >= 0 && key < 99 && key % 2 == 0));
}

// =============================================================================
// Copy, Swap and Comparison
// =============================================================================

#[rstest]
fn test_clone_is_independent() {
    let original: RbTree<i32> = (0..20).collect();
    let mut copy = original.clone();
    copy.erase_key(&3);
    copy.insert(100);
    assert_eq!(original.len(), 20);
    assert!(original.contains(&3));
    assert!(!original.contains(&100));
    assert_ne!(copy, original);
}

#[rstest]
fn test_swap_then_swap_back() {
    let mut left: RbTree<i32> = (0..10).collect();
    let mut right: RbTree<i32> = (100..103).collect();
    left.swap(&mut right);
    assert_eq!(left.len(), 3);
    assert_eq!(right.len(), 10);
    assert_eq!(left.first(), Some(&100));
    right.swap(&mut left);
    assert_eq!(left.first(), Some(&0));
    assert!(left.validate().is_ok());
    assert!(right.validate().is_ok());
}

#[rstest]
fn test_equality_ignores_shape() {
    let ascending: RbTree<i32> = (0..32).collect();
    let descending: RbTree<i32> = (0..32).rev().collect();
    assert_eq!(ascending, descending);
}

#[rstest]
#[case(vec![1, 2, 3], vec![1, 2, 4], std::cmp::Ordering::Less)]
#[case(vec![1, 2], vec![1, 2, 3], std::cmp::Ordering::Less)]
#[case(vec![5], vec![1, 2, 3], std::cmp::Ordering::Greater)]
#[case(vec![1, 2], vec![2, 1], std::cmp::Ordering::Equal)]
fn test_lexicographic_ordering(
    #[case] left: Vec<i32>,
    #[case] right: Vec<i32>,
    #[case] expected: std::cmp::Ordering,
) {
    let left: RbTree<i32> = left.into_iter().collect();
    let right: RbTree<i32> = right.into_iter().collect();
    assert_eq!(left.cmp(&right), expected);
}

#[rstest]
fn test_debug_format() {
    let tree: RbTree<i32> = [3, 1, 2].into_iter().collect();
    assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
}

// =============================================================================
// Node Storage
// =============================================================================

/// Slab storage that counts live nodes through a shared counter.
#[derive(Default)]
struct CountingStorage {
    slots: SlabStorage<Node<i32>>,
    live: Rc<Cell<usize>>,
}

impl NodeStorage<Node<i32>> for CountingStorage {
    fn allocate(&mut self, value: Node<i32>) -> NodeId {
        self.live.set(self.live.get() + 1);
        self.slots.allocate(value)
    }

    fn release(&mut self, id: NodeId) -> Node<i32> {
        self.live.set(self.live.get() - 1);
        self.slots.release(id)
    }

    fn get(&self, id: NodeId) -> &Node<i32> {
        self.slots.get(id)
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node<i32> {
        self.slots.get_mut(id)
    }

    fn max_size(&self) -> usize {
        1_000
    }
}

#[rstest]
fn test_custom_storage_sees_every_release() {
    let live = Rc::new(Cell::new(0));
    let storage = CountingStorage {
        slots: SlabStorage::new(),
        live: Rc::clone(&live),
    };
    let mut tree = RbTree::with_storage(storage);
    tree.extend(0..100);
    assert_eq!(live.get(), 100);
    assert_eq!(tree.max_size(), 1_000);

    tree.erase_key(&50);
    tree.insert(50);
    tree.insert(50);
    assert_eq!(live.get(), 100);

    let first = tree.find(&10);
    let last = tree.find(&20);
    tree.erase_range(first, last);
    assert_eq!(live.get(), 90);

    tree.clear();
    assert_eq!(live.get(), 0);
    assert!(tree.validate().is_ok());
}

#[rstest]
fn test_clone_with_custom_storage() {
    let mut tree = RbTree::with_storage(CountingStorage::default());
    tree.extend([5, 1, 9]);
    let copy = tree.clone();
    assert_eq!(copy, tree);
    assert_eq!(copy.storage().live.get(), 3);
}

#[rstest]
fn test_into_iter_releases_nodes() {
    let live = Rc::new(Cell::new(0));
    let mut tree = RbTree::with_storage(CountingStorage {
        slots: SlabStorage::new(),
        live: Rc::clone(&live),
    });
    tree.extend([3, 1, 2]);
    let drained: Vec<i32> = tree.into_iter().collect();
    assert_eq!(drained, vec![1, 2, 3]);
    assert_eq!(live.get(), 0);
}

#[rstest]
fn test_map_and_tree_share_ordering() {
    let map: TreeMap<i32, &str> = [(10, "a"), (20, "b"), (5, "c")].into_iter().collect();
    assert_eq!(map.as_tree().len(), 3);
    assert_eq!(map.as_tree().first().map(Pair::key), Some(&5));
}

// =============================================================================
// Panic Safety
// =============================================================================

type Fragile = RbTree<i32, Identity, ByFn<fn(&i32, &i32) -> bool>>;

fn less_refusing_thirteen(left: &i32, right: &i32) -> bool {
    assert!(*left != 13 && *right != 13, "thirteen is not comparable");
    left < right
}

fn fragile_tree() -> Fragile {
    let mut tree: Fragile =
        RbTree::with_comparator(ByFn::new(less_refusing_thirteen as fn(&i32, &i32) -> bool));
    tree.extend([10, 20, 30, 5, 15, 25, 35]);
    tree
}

fn snapshot(tree: &Fragile) -> Vec<i32> {
    tree.iter().copied().collect()
}

#[rstest]
fn test_panicking_insert_leaves_tree_unchanged() {
    let mut tree = fragile_tree();
    let before = snapshot(&tree);
    let black_height = tree.validate();

    let result = catch_unwind(AssertUnwindSafe(|| tree.insert(13)));

    assert!(result.is_err());
    assert_eq!(tree.len(), before.len());
    assert_eq!(snapshot(&tree), before);
    assert_eq!(tree.validate(), black_height);
}

#[rstest]
#[case(15)]
#[case(20)]
#[case(5)]
fn test_panicking_hinted_insert_leaves_tree_unchanged(#[case] hint_key: i32) {
    let mut tree = fragile_tree();
    let before = snapshot(&tree);
    let hint = tree.find(&hint_key);

    let result = catch_unwind(AssertUnwindSafe(|| tree.insert_hint(hint, 13)));

    assert!(result.is_err());
    assert_eq!(tree.len(), before.len());
    assert_eq!(snapshot(&tree), before);
    assert!(tree.validate().is_ok());
    assert_eq!(tree.get(hint), Some(&hint_key));
}

#[rstest]
fn test_panicking_erase_key_leaves_tree_unchanged() {
    let mut tree = fragile_tree();
    let before = snapshot(&tree);

    let result = catch_unwind(AssertUnwindSafe(|| tree.erase_key(&13)));

    assert!(result.is_err());
    assert_eq!(snapshot(&tree), before);
    assert!(tree.validate().is_ok());
}

#[rstest]
fn test_erase_by_position_needs_no_comparison() {
    let mut tree = fragile_tree();
    let position = tree.find(&20);
    assert_eq!(tree.erase(position), Some(20));
    assert_eq!(snapshot(&tree), vec![5, 10, 15, 25, 30, 35]);
    assert!(tree.validate().is_ok());
}
