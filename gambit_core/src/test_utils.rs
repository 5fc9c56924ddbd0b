use std::fmt::Debug;

use pretty_assertions::assert_eq;

/// Asserts that two collections hold the same items, ignoring order.
pub fn assert_in_any_order<T: Ord + Debug>(
    actual: impl IntoIterator<Item = T>,
    expected: impl IntoIterator<Item = T>,
) {
    let sorted = |items: Vec<T>| {
        let mut items = items;
        items.sort_unstable();
        items
    };
    assert_eq!(
        sorted(actual.into_iter().collect()),
        sorted(expected.into_iter().collect())
    );
}
