use crate::trace::{event, EventKind, EventLog, Traced};
use crate::Value;

use super::{Entries, SortOutcome};

/// Adjacent compare-and-swap passes, stopping after the first pass without a swap.
pub fn bubble_sort(values: &[Value], animate: bool) -> Traced<SortOutcome> {
    let mut log = EventLog::new(animate);
    let mut entries = Entries::new(values);
    let n = entries.len();

    log.emit(|| {
        event(
            EventKind::Message,
            "Bubble sort repeatedly compares adjacent elements and swaps them if they are in the wrong order",
        )
    });

    for pass in 0..n {
        let mut swapped = false;

        for j in 0..n - pass - 1 {
            let (a, b) = (entries.values[j], entries.values[j + 1]);
            log.emit(|| {
                event(
                    EventKind::Compare {
                        indices: vec![j, j + 1],
                        values: vec![a, b],
                    },
                    format!("Comparing {a} and {b}"),
                )
            });

            if a > b {
                swap_and_update(&mut entries, j, j + 1, &mut log);
                swapped = true;
            }
        }

        let settled = n - pass - 1;
        let value = entries.values[settled];
        log.emit(|| {
            event(
                EventKind::Sorted {
                    indices: vec![settled],
                },
                format!("Element {value} is now in its sorted position"),
            )
        });

        if !swapped {
            log.emit(|| {
                event(
                    EventKind::EarlyExit { pass },
                    "No swaps in this pass, array is sorted",
                )
            });
            break;
        }
    }

    log.emit(|| event(EventKind::Complete, "Bubble sort complete!"));
    Traced::new(entries.into_outcome(), log)
}

/// Grows a sorted prefix, shifting larger predecessors right one slot at a time.
pub fn insertion_sort(values: &[Value], animate: bool) -> Traced<SortOutcome> {
    let mut log = EventLog::new(animate);
    let mut entries = Entries::new(values);
    let n = entries.len();

    log.emit(|| {
        event(
            EventKind::Message,
            "Insertion sort builds the sorted array one item at a time",
        )
    });
    if n > 0 {
        log.emit(|| {
            event(
                EventKind::Sorted { indices: vec![0] },
                "First element is considered sorted",
            )
        });
    }

    for i in 1..n {
        let current = entries.values[i];
        let current_origin = entries.origin[i];
        log.emit(|| {
            event(
                EventKind::Highlight { indices: vec![i] },
                format!("Considering element {current} at index {i}"),
            )
        });

        let mut j = i;
        while j > 0 && entries.values[j - 1] > current {
            let shifted = entries.values[j - 1];
            log.emit(|| {
                event(
                    EventKind::Compare {
                        indices: vec![j - 1, j],
                        values: vec![shifted, current],
                    },
                    format!("{shifted} > {current}, shifting {shifted} to the right"),
                )
            });

            entries.values[j] = shifted;
            entries.origin[j] = entries.origin[j - 1];
            log.emit(|| {
                event(
                    EventKind::Shift {
                        from: j - 1,
                        to: j,
                        value: shifted,
                        array: entries.snapshot(),
                    },
                    format!("Shifted {shifted} to position {j}"),
                )
            });
            j -= 1;
        }

        entries.values[j] = current;
        entries.origin[j] = current_origin;
        log.emit(|| {
            event(
                EventKind::InsertAt {
                    index: j,
                    value: current,
                    array: entries.snapshot(),
                },
                format!("Insert {current} at position {j}"),
            )
        });
        log.emit(|| {
            event(
                EventKind::Sorted {
                    indices: (0..=i).collect(),
                },
                format!("Elements 0 through {i} are now sorted"),
            )
        });
    }

    log.emit(|| event(EventKind::Complete, "Insertion sort complete!"));
    Traced::new(entries.into_outcome(), log)
}

/// Picks the minimum of the unsorted suffix and swaps it into place once per pass.
pub fn selection_sort(values: &[Value], animate: bool) -> Traced<SortOutcome> {
    let mut log = EventLog::new(animate);
    let mut entries = Entries::new(values);
    let n = entries.len();

    log.emit(|| {
        event(
            EventKind::Message,
            "Selection sort finds the minimum element and places it at the beginning",
        )
    });

    for i in 0..n.saturating_sub(1) {
        let mut min_index = i;
        log.emit(|| {
            event(
                EventKind::Highlight { indices: vec![i] },
                format!("Finding minimum element to place at position {i}"),
            )
        });

        for j in i + 1..n {
            let (min, candidate) = (entries.values[min_index], entries.values[j]);
            log.emit(|| {
                event(
                    EventKind::Compare {
                        indices: vec![min_index, j],
                        values: vec![min, candidate],
                    },
                    format!("Comparing current minimum {min} with {candidate}"),
                )
            });

            if candidate < min {
                log.emit(|| {
                    event(
                        EventKind::NewMin {
                            old_index: min_index,
                            new_index: j,
                            value: candidate,
                        },
                        format!("New minimum found: {candidate} < {min}"),
                    )
                });
                min_index = j;
            }
        }

        if min_index != i {
            swap_and_update(&mut entries, i, min_index, &mut log);
        } else {
            let value = entries.values[i];
            log.emit(|| {
                event(
                    EventKind::NoSwap { index: Some(i) },
                    format!("{value} is already the minimum"),
                )
            });
        }

        log.emit(|| {
            event(
                EventKind::Sorted {
                    indices: (0..=i).collect(),
                },
                format!("Elements 0 through {i} are now sorted"),
            )
        });
    }

    log.emit(|| event(EventKind::Complete, "Selection sort complete!"));
    Traced::new(entries.into_outcome(), log)
}

/// Swap event, the swap itself, then a snapshot of the whole array.
pub(super) fn swap_and_update(entries: &mut Entries, i: usize, j: usize, log: &mut EventLog) {
    let values = [entries.values[i], entries.values[j]];
    log.emit(|| {
        event(
            EventKind::ArraySwap {
                indices: [i, j],
                values,
            },
            format!("Swapping {} and {}", values[0], values[1]),
        )
    });
    entries.swap(i, j);
    log.emit(|| {
        event(
            EventKind::Update {
                array: entries.snapshot(),
            },
            "Updated array after swap",
        )
    });
}
