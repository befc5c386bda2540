use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::trace::{event, EventKind, EventLog, Traced};
use crate::Value;

use super::is_sorted;

/// Result of a binary search over `searched`, the array actually probed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BinarySearchOutcome {
    pub index: Option<usize>,
    pub searched: Vec<Value>,
}

/// Scans left to right and stops at the first match.
pub fn linear_search(values: &[Value], target: Value, animate: bool) -> Traced<Option<usize>> {
    let mut log = EventLog::new(animate);

    for (index, &value) in values.iter().enumerate() {
        log.emit(|| {
            event(
                EventKind::Compare {
                    indices: vec![index],
                    values: vec![value],
                },
                format!("Checking if {value} equals {target}..."),
            )
        });
        if value == target {
            log.emit(|| {
                event(
                    EventKind::Found { index, value },
                    format!("Found {target} at index {index}!"),
                )
            });
            tracing::debug!(wanted = target, index, "linear search hit");
            return Traced::new(Some(index), log);
        }
    }

    not_found(&mut log, target);
    tracing::debug!(wanted = target, len = values.len(), "linear search miss");
    Traced::new(None, log)
}

/// Halves the search range each step. Unsorted input is sorted first and the
/// returned index refers to that sorted copy.
pub fn binary_search(values: &[Value], target: Value, animate: bool) -> Traced<BinarySearchOutcome> {
    let mut log = EventLog::new(animate);

    let searched = if is_sorted(values) {
        values.to_vec()
    } else {
        let mut sorted = values.to_vec();
        sorted.sort();
        log.emit(|| {
            event(
                EventKind::PreSorted {
                    array: sorted.clone(),
                },
                format!("Array was not sorted, sorted it first: {sorted:?}"),
            )
        });
        sorted
    };

    // Half-open internally; events report the inclusive range.
    let (mut low, mut high) = (0, searched.len());
    let mut index = None;

    while low < high {
        let mid = (low + high - 1) / 2;
        let probe = searched[mid];
        log.emit(|| {
            event(
                EventKind::Range {
                    left: low,
                    right: high - 1,
                    mid,
                },
                format!("Searching in range [{low}...{}], middle is {mid}", high - 1),
            )
        });
        log.emit(|| {
            event(
                EventKind::Compare {
                    indices: vec![mid],
                    values: vec![probe],
                },
                format!("Comparing {probe} with {target}"),
            )
        });

        match probe.cmp(&target) {
            Ordering::Equal => {
                log.emit(|| {
                    event(
                        EventKind::Found { index: mid, value: probe },
                        format!("Found {target} at index {mid}!"),
                    )
                });
                index = Some(mid);
                break;
            }
            Ordering::Less => {
                low = mid + 1;
                log.emit(|| {
                    event(
                        EventKind::MoveRight { mid },
                        format!("{probe} < {target}, searching right half"),
                    )
                });
            }
            Ordering::Greater => {
                high = mid;
                log.emit(|| {
                    event(
                        EventKind::MoveLeft { mid },
                        format!("{probe} > {target}, searching left half"),
                    )
                });
            }
        }
    }

    if index.is_none() {
        not_found(&mut log, target);
    }
    tracing::debug!(wanted = target, ?index, len = searched.len(), "binary search");
    Traced::new(BinarySearchOutcome { index, searched }, log)
}

fn not_found(log: &mut EventLog, target: Value) {
    log.emit(|| {
        event(
            EventKind::NotFound { target },
            format!("{target} not found in the array"),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_search_stops_at_first_match() {
        let traced = linear_search(&[4, 7, 7, 1], 7, true);
        assert_eq!(traced.output, Some(1));
        let types: Vec<_> = traced.events.iter().map(|e| e.type_name()).collect();
        assert_eq!(types, ["compare", "compare", "found"]);
    }

    #[test]
    fn linear_search_miss_checks_every_index() {
        let traced = linear_search(&[4, 7, 1], 9, true);
        assert_eq!(traced.output, None);
        assert_eq!(traced.events.len(), 4);
        assert_eq!(traced.events[3].message, "9 not found in the array");
    }

    #[test]
    fn binary_search_narrows_range() {
        let values = [17, 21, 28, 33, 42, 53, 65, 77, 89, 91];
        let traced = binary_search(&values, 65, true);
        assert_eq!(traced.output.index, Some(6));
        assert_eq!(traced.output.searched, values);

        let ranges: Vec<_> = traced
            .events
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::Range { left, right, mid } => Some((left, right, mid)),
                _ => None,
            })
            .collect();
        assert_eq!(ranges, vec![(0, 9, 4), (5, 9, 7), (5, 6, 5), (6, 6, 6)]);
    }

    #[test]
    fn binary_search_sorts_unsorted_input_first() {
        let traced = binary_search(&[9, 3, 5], 9, true);
        assert_eq!(traced.output.searched, vec![3, 5, 9]);
        assert_eq!(traced.output.index, Some(2));
        assert_eq!(traced.events[0].type_name(), "preSorted");
    }

    #[test]
    fn binary_search_miss_and_empty() {
        let traced = binary_search(&[1, 3, 5], 4, true);
        assert_eq!(traced.output.index, None);
        assert_eq!(traced.events.last().unwrap().type_name(), "notFound");

        assert_eq!(binary_search(&[], 4, false).output.index, None);
    }
}
