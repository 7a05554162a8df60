// 🔍 Pattern Classifier
// Ordered checks over the random codes of a single-issuer batch; first match wins:
//   single key -> fixed -> mirror -> mirror+constant -> incremental -> random -> unclassified

use crate::access_key::AccessKeyComponents;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::incremental::detect_incremental;
use crate::pattern::{Pattern, PatternDetails, RANDOMNESS_TEST_PASSED};
use crate::randomness::looks_random;
use tracing::debug;

pub const SINGLE_KEY_REASON: &str = "Only one key provided";
pub const NO_MATCH_REASON: &str = "Complex pattern not identified by the current heuristics";

// ============================================================================
// KEY BATCH
// ============================================================================

/// Validated, non-empty batch of keys sharing one taxpayer ID, in input order
#[derive(Debug, Clone)]
pub struct KeyBatch {
    components: Vec<AccessKeyComponents>,
}

impl KeyBatch {
    /// Extract and validate every key. The whole batch fails on the first
    /// malformed key or on a taxpayer ID mismatch.
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> AnalysisResult<Self> {
        if keys.is_empty() {
            return Err(AnalysisError::EmptyBatch);
        }

        let components = keys
            .iter()
            .map(|key| AccessKeyComponents::extract(key.as_ref()))
            .collect::<AnalysisResult<Vec<_>>>()?;

        Self::from_components(components)
    }

    pub fn from_components(components: Vec<AccessKeyComponents>) -> AnalysisResult<Self> {
        let first = components.first().ok_or(AnalysisError::EmptyBatch)?;

        if let Some((index, other)) = components
            .iter()
            .enumerate()
            .find(|(_, c)| c.taxpayer_id != first.taxpayer_id)
        {
            return Err(AnalysisError::MixedIssuer {
                expected: first.taxpayer_id.clone(),
                found: other.taxpayer_id.clone(),
                index,
            });
        }

        Ok(KeyBatch { components })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always false for a constructed batch
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn taxpayer_id(&self) -> &str {
        &self.components[0].taxpayer_id
    }

    pub fn components(&self) -> &[AccessKeyComponents] {
        &self.components
    }

    /// cNF values in batch order
    pub fn random_codes(&self) -> Vec<i64> {
        self.components
            .iter()
            .map(AccessKeyComponents::random_code_value)
            .collect()
    }

    /// nNF values in batch order
    pub fn sequence_numbers(&self) -> Vec<i64> {
        self.components
            .iter()
            .map(AccessKeyComponents::sequence_number_value)
            .collect()
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Classify the random-code generation pattern of a validated batch
pub fn classify(batch: &KeyBatch, config: &AnalyzerConfig) -> (Pattern, PatternDetails) {
    classify_sequences(&batch.random_codes(), &batch.sequence_numbers(), config)
}

/// Validate raw keys and classify them
pub fn classify_keys<S: AsRef<str>>(
    keys: &[S],
    config: &AnalyzerConfig,
) -> AnalysisResult<(Pattern, PatternDetails)> {
    let batch = KeyBatch::from_keys(keys)?;
    Ok(classify(&batch, config))
}

/// Apply the ordered checks to paired random-code / sequence-number values.
///
/// Both slices must have the batch length; pairs are matched by index.
pub fn classify_sequences(
    random_codes: &[i64],
    sequence_numbers: &[i64],
    config: &AnalyzerConfig,
) -> (Pattern, PatternDetails) {
    debug_assert_eq!(
        random_codes.len(),
        sequence_numbers.len(),
        "random codes and sequence numbers must be paired"
    );

    // A single key trivially matches fixed and mirror, so it is settled first
    if random_codes.len() <= 1 {
        debug!("single key, pattern indeterminate");
        return (
            Pattern::Indeterminate,
            PatternDetails::reason(SINGLE_KEY_REASON),
        );
    }

    let first = random_codes[0];
    if random_codes.iter().all(|&v| v == first) {
        debug!("all random codes equal");
        return (Pattern::Fixed, PatternDetails::Fixed { fixed_value: first });
    }

    let pairs = || random_codes.iter().zip(sequence_numbers.iter());

    if pairs().all(|(c, n)| c == n) {
        debug!("random codes mirror sequence numbers");
        return (Pattern::Mirror, PatternDetails::Mirror { mirrored: true });
    }

    let offset = random_codes[0] - sequence_numbers[0];
    if pairs().all(|(c, n)| c - n == offset) {
        debug!(offset, "random codes are sequence numbers plus a constant");
        return (
            Pattern::MirrorConstant,
            PatternDetails::MirrorConstant { constant: offset },
        );
    }

    if let Some(details) = detect_incremental(random_codes, config.increment_variation_threshold) {
        debug!("random codes are incremental");
        return (Pattern::Incremental, PatternDetails::Incremental(details));
    }

    if looks_random(random_codes, config.randomness_threshold) {
        debug!("random codes passed the randomness heuristic");
        return (
            Pattern::Random,
            PatternDetails::Random {
                randomness_test: RANDOMNESS_TEST_PASSED,
            },
        );
    }

    debug!("no heuristic matched");
    (Pattern::Unclassified, PatternDetails::reason(NO_MATCH_REASON))
}

// ============================================================================
// TESTS
// ============================================================================
