//! Name orderings: collation and classification-based distributions.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Case- and accent-insensitive comparison key.
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two names by collation key, falling back to the raw strings.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Sort names alphabetically.
pub fn sort_alphabetical(names: &mut [String]) {
    names.sort_by(|a, b| collate(a, b));
}

/// `count` slot indices out of `slot_count`, taken alternately from the left and right edges.
pub fn symmetric_positions(slot_count: usize, count: usize) -> Vec<usize> {
    if count == 0 || slot_count == 0 {
        return Vec::new();
    }
    if count >= slot_count {
        return (0..slot_count).collect();
    }

    let mut positions = Vec::with_capacity(count);
    let (mut left, mut right) = (0, slot_count - 1);
    while positions.len() < count {
        positions.push(left);
        left += 1;
        if positions.len() < count {
            positions.push(right);
            right -= 1;
        }
    }
    positions
}

/// Spread two groups over rows so the smaller one sits symmetrically at the row edges.
///
/// Each row takes its share of the smaller group in proportion to the slots left; the larger group
/// fills the inner slots. Slots that neither group can fill stay `None`. Both inputs should already
/// be sorted.
pub fn distribute_symmetric(first: &[String], second: &[String], row_sizes: &[usize]) -> Vec<Option<String>> {
    let (minority, majority) = if first.len() <= second.len() {
        (first, second)
    } else {
        (second, first)
    };
    let mut minority = minority.iter();
    let mut majority = majority.iter();

    let mut result = Vec::with_capacity(row_sizes.iter().sum());
    for (ri, &row_size) in row_sizes.iter().enumerate() {
        let remaining_slots: usize = row_sizes[ri..].iter().sum();
        let remaining_min = minority.len();
        let remaining_maj = majority.len();

        let share = if remaining_slots == 0 {
            0
        } else {
            (remaining_min as f64 / remaining_slots as f64 * row_size as f64).round() as usize
        };
        let min_in_row = share.min(row_size).min(remaining_min);
        let shortfall = row_size.saturating_sub(min_in_row + remaining_maj);
        let actual_min = (min_in_row + shortfall).min(remaining_min);

        let mut row: Vec<Option<String>> = vec![None; row_size];
        for pos in symmetric_positions(row_size, actual_min) {
            row[pos] = minority.next().cloned();
        }
        for slot in row.iter_mut().filter(|s| s.is_none()) {
            *slot = majority.next().cloned();
        }
        for slot in row.iter_mut().filter(|s| s.is_none()) {
            *slot = minority.next().or_else(|| majority.next()).cloned();
        }
        result.extend(row);
    }
    result
}

/// One group fully before the other.
pub fn group_order(first: &[String], second: &[String]) -> Vec<Option<String>> {
    first.iter().chain(second).cloned().map(Some).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i:02}")).collect()
    }

    #[test]
    fn test_collation_ignores_case_and_accents() {
        assert_eq!(collation_key("Ébner Ádám"), "ebner adam");
        assert_eq!(collate("ábel", "Abel"), Ordering::Greater);
        assert_eq!(collate("Éva", "Ferenc"), Ordering::Less);
        assert_eq!(collate("anna", "anna"), Ordering::Equal);

        let mut list = vec!["Zoltán".to_string(), "Ödön".into(), "ádám".into(), "Béla".into()];
        sort_alphabetical(&mut list);
        assert_eq!(list, vec!["ádám", "Béla", "Ödön", "Zoltán"]);
    }

    #[test]
    fn test_symmetric_positions() {
        assert_eq!(symmetric_positions(8, 0), Vec::<usize>::new());
        assert_eq!(symmetric_positions(8, 3), vec![0, 7, 1]);
        assert_eq!(symmetric_positions(8, 4), vec![0, 7, 1, 6]);
        assert_eq!(symmetric_positions(3, 5), vec![0, 1, 2]);
        assert_eq!(symmetric_positions(1, 1), vec![0]);
    }

    #[test]
    fn test_distribute_single_row() {
        let girls = names("g", 5);
        let boys = names("b", 9);
        let result = distribute_symmetric(&boys, &girls, &[14]);
        let flat: Vec<String> = result.into_iter().map(|s| s.unwrap()).collect();
        assert_eq!(flat.len(), 14);
        assert_eq!(&flat[..3], &["g00", "g02", "g04"]);
        assert_eq!(&flat[3..12], boys.as_slice());
        assert_eq!(&flat[12..], &["g03", "g01"]);
    }

    #[test]
    fn test_distribute_rows_proportional() {
        let boys = names("b", 6);
        let girls = names("g", 2);
        let result = distribute_symmetric(&boys, &girls, &[4, 4]);
        let flat: Vec<&str> = result.iter().map(|s| s.as_deref().unwrap()).collect();
        assert_eq!(flat, vec!["g00", "b00", "b01", "b02", "g01", "b03", "b04", "b05"]);
    }

    #[test]
    fn test_distribute_majority_runs_out() {
        let boys = names("b", 1);
        let girls = names("g", 4);
        // Minority is the boys; girls fill the rest, last slot has no one left.
        let result = distribute_symmetric(&boys, &girls, &[3, 3]);
        assert_eq!(result.iter().filter(|s| s.is_some()).count(), 5);
        assert_eq!(result[5], None);
    }

    #[test]
    fn test_group_order() {
        let order = group_order(&names("b", 2), &names("g", 1));
        assert_eq!(order, vec![Some("b00".into()), Some("b01".into()), Some("g00".into())]);
    }
}
