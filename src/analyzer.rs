// Key Analyzer - validates a batch, classifies it and scores the verdict
// Immutable after construction; safe to share across threads behind an Arc

use crate::classifier::{classify_sequences, KeyBatch};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisResult;
use crate::pattern::{Pattern, PatternDetails, VulnerabilityLevel};
use crate::scoring::confidence;
use serde::Serialize;
use sha2::{Digest, Sha256};

// ============================================================================
// PATTERN RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternResult {
    pub pattern: Pattern,
    pub vulnerability_level: VulnerabilityLevel,

    /// 0-100, higher is worse
    pub vulnerability_score: u8,

    pub description: String,

    /// 0.0 - 1.0
    pub confidence: f64,

    /// May contain values derived from the keys; keep out of logs
    pub details: PatternDetails,

    pub recommendation: String,
}

impl PatternResult {
    pub fn summary(&self) -> String {
        format!(
            "Pattern {} | {} ({}/100) | confidence {:.1}%",
            self.pattern,
            self.vulnerability_level,
            self.vulnerability_score,
            self.confidence * 100.0
        )
    }

    pub fn is_vulnerable(&self) -> bool {
        self.vulnerability_level == VulnerabilityLevel::High
            || self.vulnerability_level == VulnerabilityLevel::Medium
    }
}

// ============================================================================
// KEY ANALYZER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct KeyAnalyzer {
    config: AnalyzerConfig,
}

impl KeyAnalyzer {
    /// Analyzer with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        KeyAnalyzer { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze raw keys from one issuer
    pub fn analyze<S: AsRef<str>>(&self, keys: &[S]) -> AnalysisResult<PatternResult> {
        let batch = KeyBatch::from_keys(keys)?;
        Ok(self.analyze_batch(&batch))
    }

    /// Analyze an already validated batch
    pub fn analyze_batch(&self, batch: &KeyBatch) -> PatternResult {
        let random_codes = batch.random_codes();
        let sequence_numbers = batch.sequence_numbers();

        let (pattern, details) = classify_sequences(&random_codes, &sequence_numbers, &self.config);
        let (level, score) = pattern.severity();

        PatternResult {
            pattern,
            vulnerability_level: level,
            vulnerability_score: score,
            description: pattern.description().to_string(),
            confidence: confidence(pattern, &random_codes, &sequence_numbers, &self.config),
            details,
            recommendation: pattern.recommendation().to_string(),
        }
    }
}

/// Short SHA-256 digest of a taxpayer ID, for correlating logs without the ID itself
pub fn issuer_fingerprint(taxpayer_id: &str) -> String {
    let digest = Sha256::digest(taxpayer_id.as_bytes());
    format!("{:x}", digest)[..12].to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_key::check_digit_of;
    use crate::error::AnalysisError;
    use serde_json::json;

    fn key(sequence_number: i64, random_code: i64) -> String {
        let prefix = format!(
            "41240199888777000166550020{:08}1{:08}",
            sequence_number, random_code
        );
        format!("{}{}", prefix, check_digit_of(&prefix))
    }

    #[test]
    fn test_key_helper_builds_valid_keys() {
        let k = key(123, 45_678_901);
        assert_eq!(k.len(), 44);

        let components = crate::AccessKeyComponents::extract(&k).unwrap();
        assert_eq!(components.sequence_number_value(), 123);
        assert_eq!(components.random_code_value(), 45_678_901);
        assert!(components.check_digit_matches());
    }

    #[test]
    fn test_fixed_result() {
        let analyzer = KeyAnalyzer::new();
        let keys: Vec<String> = (1..=4).map(|n| key(n, 5)).collect();

        let result = analyzer.analyze(&keys).unwrap();

        assert_eq!(result.pattern, Pattern::Fixed);
        assert_eq!(result.vulnerability_level, VulnerabilityLevel::High);
        assert_eq!(result.vulnerability_score, 100);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.details, PatternDetails::Fixed { fixed_value: 5 });
        assert!(result.is_vulnerable());
    }

    #[test]
    fn test_single_key_result() {
        let result = KeyAnalyzer::new().analyze(&[key(9, 12_345_678)]).unwrap();

        assert_eq!(result.pattern, Pattern::Indeterminate);
        assert_eq!(result.vulnerability_level, VulnerabilityLevel::Unknown);
        assert_eq!(result.vulnerability_score, 50);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.is_vulnerable());
    }

    #[test]
    fn test_errors_propagate() {
        let analyzer = KeyAnalyzer::new();
        let empty: [&str; 0] = [];

        assert_eq!(analyzer.analyze(&empty).unwrap_err(), AnalysisError::EmptyBatch);
        assert!(matches!(
            analyzer.analyze(&["123"]).unwrap_err(),
            AnalysisError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let keys: Vec<String> = [(10, 10), (11, 11), (12, 12)]
            .iter()
            .map(|&(n, c)| key(n, c))
            .collect();
        let result = KeyAnalyzer::new().analyze(&keys).unwrap();
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["pattern"], json!("E"));
        assert_eq!(value["vulnerability_level"], json!("HIGH"));
        assert_eq!(value["vulnerability_score"], json!(90));
        assert_eq!(value["confidence"], json!(1.0));
        assert_eq!(value["details"], json!({"mirrored": true}));
        assert!(value["description"].is_string());
        assert!(value["recommendation"].is_string());
        assert_eq!(value.as_object().unwrap().len(), 7);
    }

    #[test]
    fn test_repeated_analysis_is_byte_identical() {
        let analyzer = KeyAnalyzer::new();
        let keys: Vec<String> = [48213907, 15678234, 93046512, 27659801, 60384179, 84127365]
            .iter()
            .enumerate()
            .map(|(i, &c)| key(i as i64 + 1, c))
            .collect();

        let first = serde_json::to_string(&analyzer.analyze(&keys).unwrap()).unwrap();
        let second = serde_json::to_string(&analyzer.analyze(&keys).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_thresholds() {
        let codes = [48213907, 15678234, 93046512, 27659801, 60384179, 84127365];
        let keys: Vec<String> = codes
            .iter()
            .enumerate()
            .map(|(i, &c)| key(i as i64 + 1, c))
            .collect();

        let strict = KeyAnalyzer::with_config(AnalyzerConfig {
            randomness_threshold: 0.9,
            ..AnalyzerConfig::default()
        });

        assert_eq!(KeyAnalyzer::new().analyze(&keys).unwrap().pattern, Pattern::Random);
        assert_eq!(strict.analyze(&keys).unwrap().pattern, Pattern::Unclassified);
    }

    #[test]
    fn test_issuer_fingerprint() {
        let a = issuer_fingerprint("11222333000181");
        let b = issuer_fingerprint("99888777000166");

        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
        assert_eq!(a, issuer_fingerprint("11222333000181"));
        assert!(!a.contains("11222333000181"));
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KeyAnalyzer>();
    }
}
