//! Merge sort and quicksort, with their recursion recorded as stack frames.
//!
//! Frame bounds are inclusive and signed: quicksort recurses into empty
//! partitions such as `[0...-1]`, and the frame trace shows them.

use crate::trace::{event, EventKind, EventLog, StackFrame, Traced};
use crate::Value;

use super::{Entries, SortOutcome};

pub fn merge_sort(values: &[Value], animate: bool) -> Traced<SortOutcome> {
    let mut log = EventLog::new(animate);
    let mut entries = Entries::new(values);

    log.emit(|| {
        event(
            EventKind::Message,
            "Merge sort uses divide and conquer to sort the array",
        )
    });
    log.emit(|| event(EventKind::ResetStack, "Starting recursion for merge sort"));

    let last = entries.len() as isize - 1;
    merge_sort_range(&mut entries, 0, last, 0, &mut log);

    log.emit(|| event(EventKind::Complete, "Merge sort complete!"));
    Traced::new(entries.into_outcome(), log)
}

pub fn quick_sort(values: &[Value], animate: bool) -> Traced<SortOutcome> {
    let mut log = EventLog::new(animate);
    let mut entries = Entries::new(values);

    log.emit(|| {
        event(
            EventKind::Message,
            "Quicksort uses divide and conquer with a pivot element",
        )
    });
    log.emit(|| event(EventKind::ResetStack, "Starting recursion for quicksort"));

    let last = entries.len() as isize - 1;
    quick_sort_range(&mut entries, 0, last, 0, &mut log);

    log.emit(|| event(EventKind::Complete, "Quicksort complete!"));
    Traced::new(entries.into_outcome(), log)
}

/// Lomuto partition of `values[low..=high]` around `values[high]`.
///
/// Everything `<=` the pivot ends up left of the returned index, everything
/// greater to its right.
///
/// # Panics
///
/// Panics if `low > high` or `high` is out of bounds.
pub fn partition(
    values: &mut [Value],
    low: usize,
    high: usize,
    depth: usize,
    log: &mut EventLog,
) -> usize {
    assert!(low <= high && high < values.len(), "partition range out of bounds");
    let mut entries = Entries::new(values);
    let index = lomuto(&mut entries, low, high, depth, log);
    values.copy_from_slice(&entries.values);
    index
}

fn merge_sort_range(
    entries: &mut Entries,
    left: isize,
    right: isize,
    depth: usize,
    log: &mut EventLog,
) {
    push_frame(entries, left, right, depth, "Dividing subarray", log);

    let (Ok(low), Ok(high)) = (usize::try_from(left), usize::try_from(right)) else {
        merge_base_case(left, right, depth, log);
        return;
    };
    if low >= high {
        merge_base_case(left, right, depth, log);
        return;
    }

    let mid = low + (high - low) / 2;
    log.emit(|| {
        event(
            EventKind::Divide {
                left: low,
                mid,
                right: high,
            },
            format!(
                "Dividing array into [{low}...{mid}] and [{}...{high}]",
                mid + 1
            ),
        )
    });
    update_frame(depth, format!("Dividing at midpoint {mid}"), None, log);

    call_frame(
        depth,
        format!("Calling recursively on left half [{low}...{mid}]"),
        format!(
            "Going to recursion level {} for left half [{low}...{mid}]",
            depth + 1
        ),
        log,
    );
    merge_sort_range(entries, left, mid as isize, depth + 1, log);

    call_frame(
        depth,
        format!("Calling recursively on right half [{}...{high}]", mid + 1),
        format!(
            "Going to recursion level {} for right half [{}...{high}]",
            depth + 1,
            mid + 1
        ),
        log,
    );
    merge_sort_range(entries, mid as isize + 1, right, depth + 1, log);

    log.emit(|| {
        event(
            EventKind::MergeStart {
                left: low,
                mid,
                right: high,
            },
            format!(
                "Merging subarrays [{low}...{mid}] and [{}...{high}]",
                mid + 1
            ),
        )
    });
    update_frame(
        depth,
        format!(
            "Merging left [{low}...{mid}] and right [{}...{high}]",
            mid + 1
        ),
        None,
        log,
    );

    merge(entries, low, mid, high, log);

    log.emit(|| {
        event(
            EventKind::MergeComplete {
                left: low,
                right: high,
                array: entries.snapshot(),
            },
            format!("Merged subarray [{low}...{high}]"),
        )
    });
    update_frame(
        depth,
        "Merged successfully".to_string(),
        Some(entries.window(left, right)),
        log,
    );

    pop_frame(depth, log);
}

fn merge_base_case(left: isize, right: isize, depth: usize, log: &mut EventLog) {
    log.emit(|| {
        event(
            EventKind::UpdateFrame {
                frame_index: depth,
                action: "Base case: Single element or empty array".to_string(),
                values: None,
            },
            format!("Base case reached: subarray [{left}...{right}] has 1 or 0 elements"),
        )
    });
    pop_frame(depth, log);
}

/// Two-pointer merge of `[low, mid]` and `[mid + 1, high]`. Ties take the
/// left element, which keeps the sort stable.
fn merge(entries: &mut Entries, low: usize, mid: usize, high: usize, log: &mut EventLog) {
    let mut merged_values = Vec::with_capacity(high - low + 1);
    let mut merged_origin = Vec::with_capacity(high - low + 1);
    let (mut i, mut j) = (low, mid + 1);

    let mut copy = |source: usize, remaining: bool, log: &mut EventLog| {
        let destination = low + merged_values.len();
        let value = entries.values[source];
        log.emit(|| {
            let message = if remaining {
                format!("Copying remaining element {value} to position {destination}")
            } else {
                format!("Copying {value} to position {destination}")
            };
            event(
                EventKind::Copy {
                    source,
                    destination,
                    value,
                },
                message,
            )
        });
        merged_values.push(value);
        merged_origin.push(entries.origin[source]);
    };

    while i <= mid && j <= high {
        let (a, b) = (entries.values[i], entries.values[j]);
        log.emit(|| {
            event(
                EventKind::Compare {
                    indices: vec![i, j],
                    values: vec![a, b],
                },
                format!("Comparing {a} and {b}"),
            )
        });
        if a <= b {
            copy(i, false, log);
            i += 1;
        } else {
            copy(j, false, log);
            j += 1;
        }
    }
    for source in i..=mid {
        copy(source, true, log);
    }
    for source in j..=high {
        copy(source, true, log);
    }

    entries.values[low..=high].copy_from_slice(&merged_values);
    entries.origin[low..=high].copy_from_slice(&merged_origin);
}

fn quick_sort_range(
    entries: &mut Entries,
    low: isize,
    high: isize,
    depth: usize,
    log: &mut EventLog,
) {
    push_frame(entries, low, high, depth, "Sorting subarray", log);

    if low < high {
        // low >= 0 always holds, so both bounds are valid indices here.
        let (lo, hi) = (low as usize, high as usize);
        log.emit(|| {
            event(
                EventKind::Subarray { low: lo, high: hi },
                format!("Sorting subarray [{low}...{high}]"),
            )
        });

        let pivot_index = lomuto(entries, lo, hi, depth, log) as isize;

        call_frame(
            depth,
            format!("Recursing on left: [{low}...{}]", pivot_index - 1),
            format!(
                "Going to recursion level {} for left portion [{low}...{}]",
                depth + 1,
                pivot_index - 1
            ),
            log,
        );
        quick_sort_range(entries, low, pivot_index - 1, depth + 1, log);

        call_frame(
            depth,
            format!("Recursing on right: [{}...{high}]", pivot_index + 1),
            format!(
                "Going to recursion level {} for right portion [{}...{high}]",
                depth + 1,
                pivot_index + 1
            ),
            log,
        );
        quick_sort_range(entries, pivot_index + 1, high, depth + 1, log);

        log.emit(|| {
            event(
                EventKind::UpdateFrame {
                    frame_index: depth,
                    action: "Subarray sorted successfully".to_string(),
                    values: Some(entries.window(low, high)),
                },
                format!("Recursion level {depth}: Completed sorting subarray [{low}...{high}]"),
            )
        });
    } else if low == high {
        let index = low as usize;
        log.emit(|| {
            event(
                EventKind::Sorted {
                    indices: vec![index],
                },
                format!("Subarray of size 1 at index {index} is already sorted"),
            )
        });
        update_frame(
            depth,
            "Base case: single element is already sorted".to_string(),
            None,
            log,
        );
    } else {
        log.emit(|| {
            event(
                EventKind::UpdateFrame {
                    frame_index: depth,
                    action: "Base case: empty subarray, nothing to do".to_string(),
                    values: None,
                },
                format!("Base case: empty subarray [{low}...{high}]"),
            )
        });
    }

    pop_frame(depth, log);
}

fn lomuto(entries: &mut Entries, low: usize, high: usize, depth: usize, log: &mut EventLog) -> usize {
    let pivot = entries.values[high];
    log.emit(|| {
        event(
            EventKind::Pivot {
                index: high,
                value: pivot,
            },
            format!("Selected pivot: {pivot} at index {high}"),
        )
    });
    update_frame(
        depth,
        format!("Selected pivot: {pivot} at index {high}"),
        None,
        log,
    );

    // Next slot of the `<= pivot` region.
    let mut store = low;
    for j in low..high {
        let value = entries.values[j];
        log.emit(|| {
            event(
                EventKind::Compare {
                    indices: vec![j, high],
                    values: vec![value, pivot],
                },
                format!("Comparing {value} with pivot {pivot}"),
            )
        });

        if value <= pivot {
            if store != j {
                let displaced = entries.values[store];
                log.emit(|| {
                    event(
                        EventKind::ArraySwap {
                            indices: [store, j],
                            values: [displaced, value],
                        },
                        format!("{value} <= {pivot}, swapping {displaced} and {value}"),
                    )
                });
                entries.swap(store, j);
                log.emit(|| {
                    event(
                        EventKind::Update {
                            array: entries.snapshot(),
                        },
                        "Updated array after swap",
                    )
                });
            } else {
                log.emit(|| {
                    event(
                        EventKind::NoSwap { index: Some(store) },
                        format!("{value} <= {pivot}, but no swap needed (same position)"),
                    )
                });
            }
            store += 1;
        } else {
            log.emit(|| {
                event(
                    EventKind::NoSwap { index: None },
                    format!("{value} > {pivot}, no swap needed"),
                )
            });
        }
    }

    if store != high {
        let displaced = entries.values[store];
        log.emit(|| {
            event(
                EventKind::ArraySwap {
                    indices: [store, high],
                    values: [displaced, pivot],
                },
                format!("Placing pivot {pivot} in its correct position at index {store}"),
            )
        });
        entries.swap(store, high);
        log.emit(|| {
            event(
                EventKind::Update {
                    array: entries.snapshot(),
                },
                "Updated array after placing pivot",
            )
        });
    }

    log.emit(|| {
        event(
            EventKind::PartitionComplete {
                index: store,
                pivot,
            },
            format!("Partition complete, pivot {pivot} is now at index {store}"),
        )
    });
    update_frame(
        depth,
        format!("Partition complete: elements <= {pivot} on the left, > {pivot} on the right"),
        None,
        log,
    );

    tracing::trace!(low, high, pivot, index = store, "partitioned");
    store
}

fn push_frame(
    entries: &Entries,
    left: isize,
    right: isize,
    depth: usize,
    action: &str,
    log: &mut EventLog,
) {
    log.emit(|| {
        event(
            EventKind::PushFrame {
                frame: StackFrame {
                    depth,
                    left,
                    right,
                    values: entries.window(left, right),
                    action: action.to_string(),
                },
                active_frame: depth,
            },
            format!("Recursion level {depth}: Processing subarray [{left}...{right}]"),
        )
    });
}

/// Frame update announcing a recursive call.
fn call_frame(depth: usize, action: String, message: String, log: &mut EventLog) {
    log.emit(|| {
        event(
            EventKind::UpdateFrame {
                frame_index: depth,
                action,
                values: None,
            },
            message,
        )
    });
}

/// Frame update that follows a step event; the action doubles as the message.
fn update_frame(depth: usize, action: String, values: Option<Vec<Value>>, log: &mut EventLog) {
    log.emit(|| {
        event(
            EventKind::UpdateFrame {
                frame_index: depth,
                action: action.clone(),
                values,
            },
            action,
        )
    });
}

fn pop_frame(depth: usize, log: &mut EventLog) {
    log.emit(|| {
        event(
            EventKind::PopFrame {
                frame_index: depth,
                active_frame: depth.saturating_sub(1),
            },
            format!("Returning from recursion level {depth}"),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays push/pop events and checks they nest; returns the deepest depth seen.
    fn check_frames(traced: &Traced<SortOutcome>) -> usize {
        let mut stack = Vec::new();
        let mut deepest = 0;
        for ev in &traced.events {
            match &ev.kind {
                EventKind::ResetStack => stack.clear(),
                EventKind::PushFrame { frame, .. } => {
                    assert_eq!(frame.depth, stack.len());
                    stack.push(frame.depth);
                    deepest = deepest.max(frame.depth);
                }
                EventKind::UpdateFrame { frame_index, .. } => {
                    assert_eq!(Some(frame_index), stack.last());
                }
                EventKind::PopFrame { frame_index, .. } => {
                    assert_eq!(stack.pop().as_ref(), Some(frame_index));
                }
                _ => {}
            }
        }
        assert!(stack.is_empty());
        deepest
    }

    #[test]
    fn partition_places_pivot_between_smaller_and_larger() {
        let mut values = [3, 6, 2, 8, 5];
        let mut log = EventLog::new(true);
        let index = partition(&mut values, 0, 4, 0, &mut log);

        assert_eq!(index, 2);
        assert_eq!(values[2], 5);
        assert!(values[..2].iter().all(|&v| v <= 5));
        assert!(values[3..].iter().all(|&v| v > 5));
        assert_eq!(values, [3, 2, 5, 8, 6]);
        assert_eq!(log.events()[0].type_name(), "pivot");
    }

    #[test]
    fn merge_sort_frames_nest() {
        let traced = merge_sort(&[28, 77, 21, 42, 89, 33, 17, 65, 91, 53], true);
        assert_eq!(traced.output.values, vec![17, 21, 28, 33, 42, 53, 65, 77, 89, 91]);
        assert_eq!(check_frames(&traced), 4);
    }

    #[test]
    fn merge_sort_prefers_left_on_ties() {
        let outcome = merge_sort(&[1, 0, 1, 0], false).output;
        assert_eq!(outcome.values, vec![0, 0, 1, 1]);
        assert_eq!(outcome.origin, vec![1, 3, 0, 2]);
    }

    #[test]
    fn quick_sort_visits_empty_partitions() {
        let traced = quick_sort(&[1, 2, 3], true);
        assert_eq!(traced.output.values, vec![1, 2, 3]);
        check_frames(&traced);

        let empty_frame = traced.events.iter().any(|ev| {
            matches!(&ev.kind, EventKind::PushFrame { frame, .. } if frame.right < frame.left)
        });
        assert!(empty_frame);
    }

    #[test]
    fn divide_and_merge_are_followed_by_frame_updates() {
        let traced = merge_sort(&[2, 1], true);
        for (ev, next) in traced.events.iter().zip(traced.events.iter().skip(1)) {
            if matches!(
                ev.kind,
                EventKind::Divide { .. } | EventKind::MergeStart { .. } | EventKind::MergeComplete { .. }
            ) {
                assert_eq!(next.type_name(), "updateFrame");
            }
        }
    }

    #[test]
    fn empty_input_pushes_a_single_base_case_frame() {
        let traced = quick_sort(&[], true);
        let pushes: Vec<_> = traced
            .events
            .iter()
            .filter_map(|ev| match &ev.kind {
                EventKind::PushFrame { frame, .. } => Some((frame.left, frame.right)),
                _ => None,
            })
            .collect();
        assert_eq!(pushes, vec![(0, -1)]);
    }
}
