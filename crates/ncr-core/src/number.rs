//! NCR number generation
//!
//! Numbers look like `NCR-2026-011`. The sequence is seeded so the first
//! generated number of a fresh store is 11, and it never goes backwards
//! within a year.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Lowest sequence the generator hands out is `SEQUENCE_FLOOR + 1`
pub const SEQUENCE_FLOOR: u32 = 10;

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^NCR-(\d{4})-(\d{3,})$").expect("NCR number pattern is valid"));

/// Parsed NCR number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NcrNumber {
    /// Four digit year
    pub year: i32,
    /// Sequence within the year
    pub sequence: u32,
}

impl NcrNumber {
    /// Create from parts
    #[inline]
    #[must_use]
    pub fn new(year: i32, sequence: u32) -> Self {
        Self { year, sequence }
    }
}

impl fmt::Display for NcrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NCR-{:04}-{:03}", self.year, self.sequence)
    }
}

impl FromStr for NcrNumber {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseError::MalformedNumber(s.to_string());
        let caps = NUMBER_PATTERN.captures(s.trim()).ok_or_else(malformed)?;
        let year = caps[1].parse().map_err(|_| malformed())?;
        let sequence = caps[2].parse().map_err(|_| malformed())?;
        Ok(Self { year, sequence })
    }
}

/// Next number for `year` given the numbers already in the store
///
/// The sequence is `max(existing count, highest sequence used in year, 10) + 1`.
/// Unparseable numbers still count toward the total.
pub fn generate_ncr_number<'a, I>(existing: I, year: i32) -> NcrNumber
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut count: u32 = 0;
    let mut highest: u32 = 0;
    for number in existing {
        count = count.saturating_add(1);
        if let Some(parsed) = number.and_then(|n| n.parse::<NcrNumber>().ok()) {
            if parsed.year == year {
                highest = highest.max(parsed.sequence);
            }
        }
    }

    let sequence = count.max(highest).max(SEQUENCE_FLOOR).saturating_add(1);
    NcrNumber::new(year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_store_starts_at_eleven() {
        let number = generate_ncr_number(std::iter::empty(), 2026);
        assert_eq!(number.to_string(), "NCR-2026-011");
    }

    #[test]
    fn count_above_floor_drives_sequence() {
        let existing: Vec<Option<&str>> = vec![None; 14];
        assert_eq!(generate_ncr_number(existing, 2026).sequence, 15);
    }

    #[test]
    fn highest_used_sequence_wins_over_count() {
        let existing = vec![Some("NCR-2026-040"), Some("NCR-2025-099")];
        assert_eq!(generate_ncr_number(existing, 2026).to_string(), "NCR-2026-041");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("NCR-26-1".parse::<NcrNumber>().is_err());
        assert_eq!(
            "NCR-2026-1234".parse::<NcrNumber>().unwrap(),
            NcrNumber::new(2026, 1234)
        );
    }

    proptest! {
        #[test]
        fn prop_generated_numbers_strictly_increase(steps in 1usize..40, year in 2000i32..2100) {
            let mut issued: Vec<String> = Vec::new();
            let mut last = 0;
            for _ in 0..steps {
                let next = generate_ncr_number(issued.iter().map(|n| Some(n.as_str())), year);
                prop_assert!(next.sequence > last);
                prop_assert!(next.sequence > SEQUENCE_FLOOR);
                prop_assert_eq!(next.to_string().parse::<NcrNumber>().unwrap(), next);
                last = next.sequence;
                issued.push(next.to_string());
            }
        }
    }
}
