use std::collections::HashSet;

use rand::Rng;

use crate::{AlgoVizError, Result, Value};

/// Draws `count` distinct integers uniformly from `[min, max]` by rejection
/// sampling, in the order they were drawn.
pub fn distinct_values<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    min: Value,
    max: Value,
) -> Result<Vec<Value>> {
    if min > max {
        return Err(AlgoVizError::invalid_input(format!(
            "empty range: min {min} is greater than max {max}"
        )));
    }
    let available = u128::try_from(i128::from(max) - i128::from(min) + 1).unwrap_or(u128::MAX);
    if count as u128 > available {
        return Err(AlgoVizError::invalid_input(format!(
            "cannot draw {count} distinct values from [{min}, {max}]"
        )));
    }

    let mut seen = HashSet::with_capacity(count);
    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        let value = rng.gen_range(min..=max);
        if seen.insert(value) {
            values.push(value);
        }
    }
    Ok(values)
}
