// 🏷️ Pattern tags and their associated details
// A closed set of generation patterns for the random code field

use serde::Serialize;
use std::fmt;

// ============================================================================
// PATTERN TAG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pattern {
    /// Same random code on every key
    #[serde(rename = "F")]
    Fixed,

    /// Random code equals the sequence number
    #[serde(rename = "E")]
    Mirror,

    /// Random code equals the sequence number plus a constant
    #[serde(rename = "E+K")]
    MirrorConstant,

    /// Random code grows by a constant or near-constant step
    #[serde(rename = "I")]
    Incremental,

    /// Random code looks unpredictable
    #[serde(rename = "A")]
    Random,

    /// A single key carries no sequence information
    #[serde(rename = "INDETERMINADO")]
    Indeterminate,

    /// No heuristic fired
    #[serde(rename = "?")]
    Unclassified,
}

impl Pattern {
    pub const ALL: [Pattern; 7] = [
        Pattern::Fixed,
        Pattern::Mirror,
        Pattern::MirrorConstant,
        Pattern::Incremental,
        Pattern::Random,
        Pattern::Indeterminate,
        Pattern::Unclassified,
    ];

    /// Wire tag, identical to the serialized form
    pub fn tag(&self) -> &'static str {
        match self {
            Pattern::Fixed => "F",
            Pattern::Mirror => "E",
            Pattern::MirrorConstant => "E+K",
            Pattern::Incremental => "I",
            Pattern::Random => "A",
            Pattern::Indeterminate => "INDETERMINADO",
            Pattern::Unclassified => "?",
        }
    }

    /// Patterns that are an exact arithmetic match on every key
    pub fn is_exact(&self) -> bool {
        matches!(
            self,
            Pattern::Fixed | Pattern::Mirror | Pattern::MirrorConstant
        )
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// VULNERABILITY LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VulnerabilityLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl fmt::Display for VulnerabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VulnerabilityLevel::Low => "LOW",
            VulnerabilityLevel::Medium => "MEDIUM",
            VulnerabilityLevel::High => "HIGH",
            VulnerabilityLevel::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

// ============================================================================
// PATTERN DETAILS
// ============================================================================

/// Outcome string reported when the randomness heuristic fires
pub const RANDOMNESS_TEST_PASSED: &str = "passed";

/// Pattern-specific auxiliary data, serialized as a flat JSON object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PatternDetails {
    Fixed { fixed_value: i64 },
    Mirror { mirrored: bool },
    MirrorConstant { constant: i64 },
    Incremental(IncrementalDetails),
    Random { randomness_test: &'static str },
    Reason { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncrementalDetails {
    /// Every step is identical
    Constant { increment: i64 },

    /// Steps vary but stay positive with a low coefficient of variation
    VariableButConsistent {
        average_increment: i64,
        increment_variation: f64,
    },
}

impl PatternDetails {
    pub fn reason(reason: &str) -> Self {
        PatternDetails::Reason {
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pattern_serializes_to_tag() {
        for pattern in Pattern::ALL {
            let value = serde_json::to_value(pattern).unwrap();
            assert_eq!(value, json!(pattern.tag()));
        }
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(
            serde_json::to_value(VulnerabilityLevel::Medium).unwrap(),
            json!("MEDIUM")
        );
    }

    #[test]
    fn test_details_are_flat_objects() {
        let fixed = PatternDetails::Fixed { fixed_value: 5 };
        assert_eq!(serde_json::to_value(&fixed).unwrap(), json!({"fixed_value": 5}));

        let random = PatternDetails::Random {
            randomness_test: RANDOMNESS_TEST_PASSED,
        };
        assert_eq!(
            serde_json::to_value(&random).unwrap(),
            json!({"randomness_test": "passed"})
        );
    }

    #[test]
    fn test_incremental_details_carry_type() {
        let constant = PatternDetails::Incremental(IncrementalDetails::Constant { increment: 10 });
        assert_eq!(
            serde_json::to_value(&constant).unwrap(),
            json!({"type": "constant", "increment": 10})
        );

        let variable = PatternDetails::Incremental(IncrementalDetails::VariableButConsistent {
            average_increment: 12,
            increment_variation: 0.125,
        });
        assert_eq!(
            serde_json::to_value(&variable).unwrap(),
            json!({
                "type": "variable_but_consistent",
                "average_increment": 12,
                "increment_variation": 0.125
            })
        );
    }

    #[test]
    fn test_exact_patterns() {
        assert!(Pattern::Fixed.is_exact());
        assert!(Pattern::MirrorConstant.is_exact());
        assert!(!Pattern::Incremental.is_exact());
        assert!(!Pattern::Indeterminate.is_exact());
    }
}
