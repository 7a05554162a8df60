// 📈 Incremental Detector
// Tests whether the random codes grow by a constant or near-constant step

use crate::pattern::IncrementalDetails;
use crate::stats::{as_f64, differences, mean, sample_std_dev};

/// Detect a constant step, or positive steps whose variation (sample standard
/// deviation over the rounded mean step) stays below `variation_threshold`.
/// Needs at least two values.
pub fn detect_incremental(values: &[i64], variation_threshold: f64) -> Option<IncrementalDetails> {
    if values.len() < 2 {
        return None;
    }

    let diffs = differences(values);
    let first = diffs[0];

    if diffs.iter().all(|&d| d == first) {
        return Some(IncrementalDetails::Constant { increment: first });
    }

    if diffs.iter().all(|&d| d > 0) {
        let diffs_f = as_f64(&diffs);
        // half-to-even
        let average_increment = mean(&diffs_f).round_ties_even() as i64;
        let variation = if average_increment == 0 {
            0.0
        } else {
            sample_std_dev(&diffs_f) / average_increment as f64
        };

        if variation < variation_threshold {
            return Some(IncrementalDetails::VariableButConsistent {
                average_increment,
                increment_variation: variation,
            });
        }
    }

    None
}
