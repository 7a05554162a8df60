// 🔑 Access Key - Component Extractor
// Splits a 44-digit electronic invoice access key into its fixed-width fields
//
// Layout (byte offsets):
//   [0..2)   cUF    issuer region code
//   [2..6)   AAMM   year-month of issue
//   [6..20)  CNPJ   taxpayer ID of the issuer
//   [20..22) mod    document model
//   [22..25) serie  series
//   [25..34) nNF    sequence number
//   [34..35) tpEmis emission type
//   [35..43) cNF    random code (the field under test)
//   [43..44) cDV    check digit

use crate::error::{AnalysisError, AnalysisResult};
use chrono::NaiveDate;
use serde::Serialize;

/// Number of digits in a well-formed access key
pub const ACCESS_KEY_LENGTH: usize = 44;

// ============================================================================
// ACCESS KEY COMPONENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessKeyComponents {
    /// cUF - 2 digit issuer region code
    pub region_code: String,

    /// AAMM - 4 digit year-month of issue
    pub year_month: String,

    /// CNPJ - 14 digit taxpayer ID; all keys in a batch must share it
    pub taxpayer_id: String,

    /// mod - 2 digit document model (55 = NF-e, 65 = NFC-e)
    pub model: String,

    /// serie - 3 digits
    pub series: String,

    /// nNF - 9 digit sequence counter
    pub sequence_number: String,

    /// tpEmis - 1 digit emission type
    pub emission_type: String,

    /// cNF - 8 digit code meant to be unpredictable
    pub random_code: String,

    /// cDV - 1 digit modulo-11 check digit
    pub check_digit: String,
}

impl AccessKeyComponents {
    /// Extract all fields from a raw key.
    ///
    /// Fails with `InvalidFormat` unless the key is exactly 44 ASCII digits.
    /// Either every field is sliced or nothing is returned.
    pub fn extract(key: &str) -> AnalysisResult<Self> {
        validate_key(key)?;

        Ok(AccessKeyComponents {
            region_code: key[0..2].to_string(),
            year_month: key[2..6].to_string(),
            taxpayer_id: key[6..20].to_string(),
            model: key[20..22].to_string(),
            series: key[22..25].to_string(),
            sequence_number: key[25..34].to_string(),
            emission_type: key[34..35].to_string(),
            random_code: key[35..43].to_string(),
            check_digit: key[43..44].to_string(),
        })
    }

    /// Concatenate the fields back into the original key
    pub fn reassemble(&self) -> String {
        [
            self.region_code.as_str(),
            self.year_month.as_str(),
            self.taxpayer_id.as_str(),
            self.model.as_str(),
            self.series.as_str(),
            self.sequence_number.as_str(),
            self.emission_type.as_str(),
            self.random_code.as_str(),
            self.check_digit.as_str(),
        ]
        .concat()
    }

    /// Numeric value of cNF
    pub fn random_code_value(&self) -> i64 {
        digits_value(&self.random_code)
    }

    /// Numeric value of nNF
    pub fn sequence_number_value(&self) -> i64 {
        digits_value(&self.sequence_number)
    }

    /// First day of the AAMM month, or None when the month is out of range
    pub fn issue_month(&self) -> Option<NaiveDate> {
        let year = 2000 + digits_value(&self.year_month[0..2]) as i32;
        let month = digits_value(&self.year_month[2..4]) as u32;
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    /// Modulo-11 check digit computed over the first 43 digits
    pub fn expected_check_digit(&self) -> u32 {
        let reassembled = self.reassemble();
        check_digit_of(&reassembled[..ACCESS_KEY_LENGTH - 1])
    }

    pub fn check_digit_matches(&self) -> bool {
        self.expected_check_digit() == digits_value(&self.check_digit) as u32
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn validate_key(key: &str) -> AnalysisResult<()> {
    if key.is_empty() {
        return Err(AnalysisError::invalid_format(key, "key is empty"));
    }

    if let Some((position, ch)) = key.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(AnalysisError::invalid_format(
            key,
            format!("non-digit character {:?} at position {}", ch, position),
        ));
    }

    if key.len() != ACCESS_KEY_LENGTH {
        return Err(AnalysisError::invalid_format(
            key,
            format!("expected {} digits, got {}", ACCESS_KEY_LENGTH, key.len()),
        ));
    }

    Ok(())
}

/// Fields are pre-validated as ASCII digits, so folding cannot fail
fn digits_value(digits: &str) -> i64 {
    digits
        .bytes()
        .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'))
}

/// Weights 2..=9 cycle from the rightmost digit; remainders 0 and 1 map to 0
pub fn check_digit_of(digits: &str) -> u32 {
    let sum: u32 = digits
        .bytes()
        .rev()
        .zip((2..=9).cycle())
        .map(|(b, weight)| u32::from(b - b'0') * weight)
        .sum();

    match sum % 11 {
        0 | 1 => 0,
        remainder => 11 - remainder,
    }
}

// ============================================================================
// TESTS
// ============================================================================
