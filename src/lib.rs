// Key Audit - Core Library
// Infers how issuing systems generate the random code of 44-digit access keys.
// Exposes all modules for use in the CLI, API server, and tests

pub mod access_key;  // Component Extractor
pub mod analyzer;    // Engine - batch in, PatternResult out
pub mod classifier;  // Ordered pattern checks
pub mod config;      // Thresholds + server settings
pub mod error;
pub mod incremental; // Incremental Detector
pub mod keys_file;   // Key lists from text/CSV files
pub mod pattern;     // Pattern tags + details
pub mod randomness;  // Randomness Heuristic
pub mod scoring;     // Confidence & Severity Scorer
pub mod stats;

#[cfg(feature = "server")]
pub mod api;         // HTTP boundary (axum)

// Re-export commonly used types
pub use access_key::{AccessKeyComponents, ACCESS_KEY_LENGTH};
pub use analyzer::{issuer_fingerprint, KeyAnalyzer, PatternResult};
pub use classifier::{classify, classify_keys, classify_sequences, KeyBatch};
pub use config::{AnalyzerConfig, ServerConfig};
pub use error::{AnalysisError, AnalysisResult};
pub use incremental::detect_incremental;
pub use keys_file::load_keys;
pub use pattern::{IncrementalDetails, Pattern, PatternDetails, VulnerabilityLevel};
pub use randomness::{looks_random, randomness_score};
pub use scoring::confidence;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
