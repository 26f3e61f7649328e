use ordered_tree::{Error, Tree};

use std::collections::BTreeSet;

use quickcheck_macros::quickcheck;

/// Height of a perfectly split tree holding `n` items: `ceil(log2(n + 1)) - 1`.
fn minimal_height(n: usize) -> isize {
    (usize::BITS - n.leading_zeros()) as isize - 1
}

fn sorted(xs: &[i8]) -> Vec<i8> {
    let mut xs = xs.to_vec();
    xs.sort_unstable();
    xs
}

#[quickcheck]
fn inorder_is_sorted(xs: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    tree.len() == xs.len() && tree.inorder().copied().eq(sorted(&xs))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();
    let added: BTreeSet<_> = xs.into_iter().collect();

    nots.iter()
        .filter(|x| !added.contains(*x))
        .all(|x| tree.find(x).is_none())
}

#[quickcheck]
fn remove_takes_exactly_one_copy(xs: Vec<i8>, x: i8) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    tree.insert(x);
    let copies = xs.iter().filter(|y| **y == x).count();

    let removed = tree.remove(&x);

    removed == Ok(Some(x)) && tree.len() == xs.len() && tree.contains(&x) == (copies > 0)
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    for delete in &deletes {
        // Remove every copy so the item is gone for good.
        while tree.contains(delete) {
            assert_eq!(tree.remove(delete), Ok(Some(*delete)));
        }
    }

    let mut still_present = xs;
    still_present.retain(|x| !deletes.contains(x));

    deletes.iter().all(|x| tree.find(x).is_none())
        && still_present.iter().all(|x| tree.find(x).is_some())
        && tree.len() == still_present.len()
}

#[quickcheck]
fn removing_missing_items(xs: Vec<i8>, x: i8) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().filter(|y| *y != x).collect();
    let len = tree.len();

    let expected = if tree.is_empty() {
        Ok(None)
    } else {
        Err(Error::NotFound)
    };
    tree.remove(&x) == expected && tree.len() == len
}

#[quickcheck]
fn removing_everything_empties_the_tree(xs: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();

    let all_removed = xs.iter().all(|x| tree.remove(x) == Ok(Some(*x)));

    all_removed && tree.is_empty() && tree.height() == -1 && tree.remove(&0) == Ok(None)
}

#[quickcheck]
fn rebalance_keeps_items(xs: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    let before: Vec<_> = tree.inorder().copied().collect();

    tree.rebalance();

    tree.len() == xs.len() && tree.inorder().copied().eq(before)
}

#[quickcheck]
fn rebalance_gives_minimal_height(xs: Vec<i16>) -> bool {
    let distinct: BTreeSet<_> = xs.into_iter().collect();
    // Sorted input is the worst case: a single right spine.
    let mut tree: Tree<i16> = distinct.iter().copied().collect();

    tree.rebalance();

    tree.height() == minimal_height(distinct.len()) && tree.is_balanced()
}

#[quickcheck]
fn successor_matches_brute_force(xs: Vec<i8>, probes: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    xs.iter().chain(&probes).all(|p| {
        let expected = xs.iter().filter(|x| *x > p).min();
        tree.successor(p) == expected
    })
}

#[quickcheck]
fn predecessor_matches_brute_force(xs: Vec<i8>, probes: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    xs.iter().chain(&probes).all(|p| {
        let expected = xs.iter().filter(|x| *x < p).max();
        tree.predecessor(p) == expected
    })
}

#[quickcheck]
fn range_find_matches_brute_force(xs: Vec<i8>, low: i8, high: i8) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();
    let expected: Vec<_> = sorted(&xs)
        .into_iter()
        .filter(|x| low <= *x && *x <= high)
        .collect();

    tree.range_find(&low, &high).into_iter().copied().eq(expected)
}

#[quickcheck]
fn clear_then_refill(xs: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    let before: Vec<_> = tree.inorder().copied().collect();

    tree.clear();
    let cleared = tree.is_empty() && tree.iter().next().is_none();
    tree.extend(xs.iter().copied());

    cleared && tree.inorder().copied().eq(before)
}

#[quickcheck]
fn traversals_visit_every_item(xs: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();
    let expected = sorted(&xs);
    let visit = |items: Vec<&i8>| sorted(&items.into_iter().copied().collect::<Vec<_>>());

    visit(tree.iter().collect()) == expected
        && visit(tree.postorder().collect()) == expected
        && visit(tree.levelorder().collect()) == expected
}

#[test]
fn monotonic_run_unbalances_a_rebalanced_tree() {
    let mut tree: Tree<i32> = (0..100).collect();
    tree.rebalance();
    assert!(tree.is_balanced());
    assert_eq!(tree.height(), minimal_height(100));

    let mut next = 100;
    while tree.is_balanced() {
        tree.insert(next);
        next += 1;
    }
    // The bound for ~110 items is under 9 levels, so a short run is enough.
    assert!(next < 120);
    assert!(!tree.is_balanced());
}
