use std::collections::HashMap;

/// Rank of each item among earlier items with the same directed
/// `(origin, dest)` pair.
///
/// Ranks start at 0 and follow input order, so every pair that appears
/// `n` times receives exactly `0..n`. `(A, B)` and `(B, A)` are separate pairs.
#[must_use]
pub fn dup_indices<'a, I>(pairs: I) -> Vec<usize>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen: HashMap<(&'a str, &'a str), usize> = HashMap::new();
    pairs
        .into_iter()
        .map(|pair| {
            let count = seen.entry(pair).or_insert(0);
            let index = *count;
            *count += 1;
            index
        })
        .collect()
}
