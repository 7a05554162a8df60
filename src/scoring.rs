// 🎯 Confidence & Severity Scorer
// Static per-pattern tables plus the numeric confidence model

use crate::config::AnalyzerConfig;
use crate::pattern::{Pattern, VulnerabilityLevel};
use crate::randomness::looks_random;
use crate::stats::{as_f64, coefficient_of_variation, differences, mean};

/// Sample count at which the size bonus of a random verdict saturates
pub const RANDOM_CONFIDENCE_SATURATION: usize = 20;

// ============================================================================
// STATIC TABLES
// ============================================================================

impl Pattern {
    /// Severity label and 0-100 score
    pub fn severity(&self) -> (VulnerabilityLevel, u8) {
        match self {
            Pattern::Fixed => (VulnerabilityLevel::High, 100),
            Pattern::Mirror => (VulnerabilityLevel::High, 90),
            Pattern::MirrorConstant => (VulnerabilityLevel::High, 85),
            Pattern::Incremental => (VulnerabilityLevel::Medium, 60),
            Pattern::Random => (VulnerabilityLevel::Low, 10),
            Pattern::Indeterminate | Pattern::Unclassified => (VulnerabilityLevel::Unknown, 50),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Pattern::Fixed => "The numeric code (cNF) is fixed across all documents",
            Pattern::Mirror => "The numeric code (cNF) equals the document number (nNF)",
            Pattern::MirrorConstant => {
                "The numeric code (cNF) equals the document number (nNF) plus a constant"
            }
            Pattern::Incremental => "The numeric code (cNF) follows an incremental pattern",
            Pattern::Random => "The numeric code (cNF) appears to be randomly generated",
            Pattern::Indeterminate => "The pattern cannot be determined from a single key",
            Pattern::Unclassified => "Complex pattern not identified by the current tests",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Pattern::Fixed => "CRITICAL: switch immediately to a secure random generator",
            Pattern::Mirror => "CRITICAL: implement a secure random generator",
            Pattern::MirrorConstant => {
                "CRITICAL: the pattern is still predictable, implement random generation"
            }
            Pattern::Incremental => "Improve the issuing system to use true random generation",
            Pattern::Random => "Configuration is adequate, keep the current scheme",
            Pattern::Indeterminate => "Collect more samples for an accurate analysis",
            Pattern::Unclassified => "Deeper analysis required",
        }
    }
}

// ============================================================================
// CONFIDENCE
// ============================================================================

/// Confidence in [0, 1] that `pattern` describes the given sequences
pub fn confidence(
    pattern: Pattern,
    random_codes: &[i64],
    _sequence_numbers: &[i64],
    config: &AnalyzerConfig,
) -> f64 {
    let n = random_codes.len();
    if pattern == Pattern::Indeterminate || n < 2 {
        return 0.0;
    }

    match pattern {
        // Exact matches on only two keys are less conclusive
        Pattern::Fixed | Pattern::Mirror | Pattern::MirrorConstant => {
            if n >= 3 {
                1.0
            } else {
                0.8
            }
        }
        Pattern::Incremental => incremental_confidence(random_codes),
        Pattern::Random => {
            let verdict = if looks_random(random_codes, config.randomness_threshold) {
                1.0
            } else {
                0.0
            };
            let size_term = (n as f64 / RANDOM_CONFIDENCE_SATURATION as f64).min(1.0);
            verdict * 0.8 + size_term * 0.2
        }
        _ => 0.5,
    }
}

/// `(1 - CV(steps)) * (1 + ln(n) / 10)`, clamped to [0, 1]
fn incremental_confidence(random_codes: &[i64]) -> f64 {
    let steps = as_f64(&differences(random_codes));
    let consistency = if mean(&steps) == 0.0 {
        0.0
    } else {
        1.0 - coefficient_of_variation(&steps)
    };

    let n = random_codes.len() as f64;
    (consistency * (1.0 + n.ln() / 10.0)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(pattern: Pattern, codes: &[i64]) -> f64 {
        let seq: Vec<i64> = (1..=codes.len() as i64).collect();
        confidence(pattern, codes, &seq, &AnalyzerConfig::default())
    }

    #[test]
    fn test_severity_table() {
        assert_eq!(Pattern::Fixed.severity(), (VulnerabilityLevel::High, 100));
        assert_eq!(Pattern::Mirror.severity(), (VulnerabilityLevel::High, 90));
        assert_eq!(Pattern::MirrorConstant.severity(), (VulnerabilityLevel::High, 85));
        assert_eq!(Pattern::Incremental.severity(), (VulnerabilityLevel::Medium, 60));
        assert_eq!(Pattern::Random.severity(), (VulnerabilityLevel::Low, 10));
        assert_eq!(Pattern::Indeterminate.severity(), (VulnerabilityLevel::Unknown, 50));
        assert_eq!(Pattern::Unclassified.severity(), (VulnerabilityLevel::Unknown, 50));
    }

    #[test]
    fn test_every_pattern_has_text() {
        for pattern in Pattern::ALL {
            assert!(!pattern.description().is_empty());
            assert!(!pattern.recommendation().is_empty());
        }
        assert!(Pattern::Fixed.recommendation().starts_with("CRITICAL"));
        assert!(Pattern::MirrorConstant.recommendation().starts_with("CRITICAL"));
    }

    #[test]
    fn test_indeterminate_and_tiny_batches_have_zero_confidence() {
        assert_eq!(conf(Pattern::Indeterminate, &[1, 2, 3]), 0.0);
        assert_eq!(conf(Pattern::Fixed, &[5]), 0.0);
        assert_eq!(conf(Pattern::Incremental, &[5]), 0.0);
    }

    #[test]
    fn test_exact_patterns() {
        assert_eq!(conf(Pattern::Fixed, &[5, 5, 5, 5]), 1.0);
        assert_eq!(conf(Pattern::Mirror, &[1, 2, 3]), 1.0);
        assert_eq!(conf(Pattern::MirrorConstant, &[8, 9]), 0.8);
    }

    #[test]
    fn test_incremental_constant_step_saturates() {
        assert_eq!(conf(Pattern::Incremental, &[100, 110, 120, 130]), 1.0);
    }

    #[test]
    fn test_incremental_variable_step() {
        // Steps 10, 13, 10: cv = sqrt(3) / 11, n = 4
        let expected = (1.0 - 3f64.sqrt() / 11.0) * (1.0 + 4f64.ln() / 10.0);
        let actual = conf(Pattern::Incremental, &[0, 10, 23, 33]);

        assert!((actual - expected).abs() < 1e-9);
        assert!(actual > 0.0 && actual < 1.0);
    }

    #[test]
    fn test_incremental_zero_mean_step() {
        assert_eq!(conf(Pattern::Incremental, &[10, 20, 10]), 0.0);
    }

    #[test]
    fn test_random_confidence() {
        let codes = [48213907, 15678234, 93046512, 27659801, 60384179, 84127365];
        let actual = conf(Pattern::Random, &codes);
        assert!((actual - (0.8 + 0.2 * 6.0 / 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_random_size_term_is_clamped() {
        // Distinct, evenly spread values well past the saturation point
        let codes: Vec<i64> = (0..40)
            .map(|i| (i * 7_919_113 + 12_345_678) % 100_000_000)
            .collect();
        let actual = conf(Pattern::Random, &codes);
        assert!(actual <= 1.0, "confidence was {}", actual);
    }

    #[test]
    fn test_unclassified_is_neutral() {
        assert_eq!(conf(Pattern::Unclassified, &[3, 1, 2]), 0.5);
    }
}
