// 🎲 Randomness Heuristic
// Cheap triage score separating clearly patterned batches from plausibly random ones.
// Not a statistical randomness test suite.

use crate::stats::{as_f64, coefficient_of_variation};
use std::collections::HashSet;

/// Below this many values no judgement is made
pub const MIN_RANDOMNESS_SAMPLES: usize = 5;

/// Composite uniformity score, or None when the sample is too small.
///
/// Average of three signals, each roughly in [0, 1]:
/// - uniqueness ratio of the values
/// - `1 - CV` of the frequencies of the decimal digits that occur
/// - `1 - CV` of the absolute gaps between consecutive values
pub fn randomness_score(values: &[i64]) -> Option<f64> {
    if values.len() < MIN_RANDOMNESS_SAMPLES {
        return None;
    }

    let unique_ratio = uniqueness_ratio(values);
    let digit_uniformity = 1.0 - coefficient_of_variation(&digit_frequencies(values));
    let gap_uniformity = 1.0 - coefficient_of_variation(&as_f64(&absolute_gaps(values)));

    Some((unique_ratio + digit_uniformity + gap_uniformity) / 3.0)
}

/// True when the composite score exceeds `threshold`
pub fn looks_random(values: &[i64], threshold: f64) -> bool {
    randomness_score(values).is_some_and(|score| score > threshold)
}

fn uniqueness_ratio(values: &[i64]) -> f64 {
    let distinct: HashSet<i64> = values.iter().copied().collect();
    distinct.len() as f64 / values.len() as f64
}

/// Counts of each digit 0-9 present in the concatenated decimal renderings.
/// Digits that never occur are left out.
fn digit_frequencies(values: &[i64]) -> Vec<f64> {
    let mut counts = [0usize; 10];
    for value in values {
        for b in value.to_string().bytes().filter(u8::is_ascii_digit) {
            counts[usize::from(b - b'0')] += 1;
        }
    }

    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| c as f64)
        .collect()
}

fn absolute_gaps(values: &[i64]) -> Vec<i64> {
    values.windows(2).map(|w| (w[1] - w[0]).abs()).collect()
}
