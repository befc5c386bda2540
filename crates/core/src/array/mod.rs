//! Searching and sorting over plain integer arrays.
//!
//! Every algorithm runs to completion on an owned copy of its input and
//! returns the result together with the trace that produced it. The
//! divide-and-conquer sorts also record a synthetic call stack so the
//! recursion itself can be replayed.

mod recursive;
mod search;
mod sort;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::trace::Traced;
use crate::{AlgoVizError, Result, Value};

pub use recursive::{merge_sort, partition, quick_sort};
pub use search::{binary_search, linear_search, BinarySearchOutcome};
pub use sort::{bubble_sort, insertion_sort, selection_sort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    Bubble,
    Insertion,
    Selection,
    Merge,
    Quick,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 5] = [
        Self::Bubble,
        Self::Insertion,
        Self::Selection,
        Self::Merge,
        Self::Quick,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Insertion => "insertion",
            Self::Selection => "selection",
            Self::Merge => "merge",
            Self::Quick => "quick",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Insertion => "Insertion Sort",
            Self::Selection => "Selection Sort",
            Self::Merge => "Merge Sort",
            Self::Quick => "Quicksort",
        }
    }

    /// Complexity and stability facts shown alongside each sort.
    pub fn properties(self) -> SortProperties {
        let (stable, in_place, best, average, worst, space) = match self {
            Self::Bubble => (true, true, "O(n)", "O(n²)", "O(n²)", "O(1)"),
            Self::Insertion => (true, true, "O(n)", "O(n²)", "O(n²)", "O(1)"),
            Self::Selection => (false, true, "O(n²)", "O(n²)", "O(n²)", "O(1)"),
            Self::Merge => (true, false, "O(n log n)", "O(n log n)", "O(n log n)", "O(n)"),
            Self::Quick => (false, true, "O(n log n)", "O(n log n)", "O(n²)", "O(log n)"),
        };
        SortProperties {
            stable,
            in_place,
            best,
            average,
            worst,
            space,
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortAlgorithm {
    type Err = AlgoVizError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = wanted
            .strip_suffix("sort")
            .unwrap_or(wanted.as_str())
            .trim_end();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == wanted)
            .ok_or_else(|| AlgoVizError::invalid_input(format!("unknown sort algorithm `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchAlgorithm {
    Linear,
    Binary,
}

impl FromStr for SearchAlgorithm {
    type Err = AlgoVizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "binary" => Ok(Self::Binary),
            other => Err(AlgoVizError::invalid_input(format!(
                "unknown search algorithm `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortProperties {
    pub stable: bool,
    pub in_place: bool,
    pub best: &'static str,
    pub average: &'static str,
    pub worst: &'static str,
    pub space: &'static str,
}

/// Sorted values plus, for each output position, the input index the value
/// came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOutcome {
    pub values: Vec<Value>,
    pub origin: Vec<usize>,
}

impl SortOutcome {
    /// Whether equal values kept their input order.
    pub fn preserves_order_of_equals(&self) -> bool {
        self.values
            .windows(2)
            .zip(self.origin.windows(2))
            .all(|(v, o)| v[0] != v[1] || o[0] < o[1])
    }
}

pub fn sort(values: &[Value], algorithm: SortAlgorithm, animate: bool) -> Traced<SortOutcome> {
    let traced = match algorithm {
        SortAlgorithm::Bubble => bubble_sort(values, animate),
        SortAlgorithm::Insertion => insertion_sort(values, animate),
        SortAlgorithm::Selection => selection_sort(values, animate),
        SortAlgorithm::Merge => merge_sort(values, animate),
        SortAlgorithm::Quick => quick_sort(values, animate),
    };
    tracing::debug!(
        algorithm = algorithm.as_str(),
        len = values.len(),
        events = traced.events.len(),
        "sorted"
    );
    traced
}

pub fn is_sorted(values: &[Value]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Working buffer shared by the sorts: values and their input positions move together.
#[derive(Debug, Clone)]
struct Entries {
    values: Vec<Value>,
    origin: Vec<usize>,
}

impl Entries {
    fn new(values: &[Value]) -> Self {
        Self {
            values: values.to_vec(),
            origin: (0..values.len()).collect(),
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.values.swap(i, j);
        self.origin.swap(i, j);
    }

    fn snapshot(&self) -> Vec<Value> {
        self.values.clone()
    }

    /// Inclusive slice; empty when `right < left`.
    fn window(&self, left: isize, right: isize) -> Vec<Value> {
        match (usize::try_from(left), usize::try_from(right)) {
            (Ok(left), Ok(right)) if left <= right && right < self.len() => {
                self.values[left..=right].to_vec()
            }
            _ => Vec::new(),
        }
    }

    fn into_outcome(self) -> SortOutcome {
        SortOutcome {
            values: self.values,
            origin: self.origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [Value; 10] = [28, 77, 21, 42, 89, 33, 17, 65, 91, 53];
    const SORTED: [Value; 10] = [17, 21, 28, 33, 42, 53, 65, 77, 89, 91];

    #[test]
    fn every_algorithm_sorts_the_sample() {
        for algorithm in SortAlgorithm::ALL {
            let traced = sort(&SAMPLE, algorithm, true);
            assert_eq!(traced.output.values, SORTED, "{algorithm}");
            assert_eq!(traced.events.last().unwrap().type_name(), "complete");
        }
    }

    #[test]
    fn origin_is_a_permutation_pointing_back_to_input() {
        for algorithm in SortAlgorithm::ALL {
            let outcome = sort(&SAMPLE, algorithm, false).output;
            for (value, origin) in outcome.values.iter().zip(&outcome.origin) {
                assert_eq!(SAMPLE[*origin], *value);
            }
        }
    }

    #[test]
    fn stable_algorithms_keep_equal_values_in_order() {
        let input = [3, 1, 3, 2, 1, 3];
        for algorithm in SortAlgorithm::ALL {
            if algorithm.properties().stable {
                let outcome = sort(&input, algorithm, false).output;
                assert!(outcome.preserves_order_of_equals(), "{algorithm}");
            }
        }
    }

    #[test]
    fn empty_and_single_inputs() {
        for algorithm in SortAlgorithm::ALL {
            assert!(sort(&[], algorithm, true).output.values.is_empty());
            assert_eq!(sort(&[7], algorithm, true).output.values, vec![7]);
        }
    }

    #[test]
    fn silent_sorts_record_nothing() {
        for algorithm in SortAlgorithm::ALL {
            assert!(sort(&SAMPLE, algorithm, false).events.is_empty());
        }
    }

    #[test]
    fn properties_table() {
        let merge = SortAlgorithm::Merge.properties();
        assert!(merge.stable);
        assert!(!merge.in_place);
        assert_eq!(merge.space, "O(n)");
        assert_eq!(SortAlgorithm::Quick.properties().worst, "O(n²)");
        assert!(!SortAlgorithm::Selection.properties().stable);
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("Merge".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Merge);
        assert_eq!("quicksort".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Quick);
        assert!("bogo".parse::<SortAlgorithm>().is_err());
        assert_eq!("binary".parse::<SearchAlgorithm>().unwrap(), SearchAlgorithm::Binary);
    }

    #[test]
    fn sortedness_check() {
        assert!(is_sorted(&[]));
        assert!(is_sorted(&[1, 1, 2]));
        assert!(!is_sorted(&[2, 1]));
    }
}
