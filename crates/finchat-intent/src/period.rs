//! Time-period extraction from natural-language phrases

use crate::record::TimePeriod;
use regex::Regex;
use std::sync::OnceLock;

/// Ordered phrase patterns; first match wins
///
/// Order matters: the 7d/30d/90d/1y patterns are checked before 1d so that
/// "7 days" is not shadowed by looser day phrasings.
fn patterns() -> &'static [(Regex, TimePeriod)] {
    static PATTERNS: OnceLock<Vec<(Regex, TimePeriod)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"\b(?:7d|7\s*days?|one\s*week|1\s*week|week)\b", TimePeriod::D7),
            (r"\b(?:30d|30\s*days?|one\s*month|1\s*month|month)\b", TimePeriod::D30),
            (r"\b(?:90d|90\s*days?|3\s*months?|three\s*months?)\b", TimePeriod::D90),
            (r"\b(?:1y|1\s*year|one\s*year|year)\b", TimePeriod::Y1),
            (r"\b(?:1d|1\s*day|today|daily)\b", TimePeriod::D1),
        ]
        .into_iter()
        .map(|(src, period)| (Regex::new(src).expect("valid regex"), period))
        .collect()
    })
}

/// Extract the canonical time period from a lower-cased utterance
///
/// Absence of any time phrase yields the 30d default.
pub fn extract_time_period(utterance_lower: &str) -> TimePeriod {
    patterns()
        .iter()
        .find(|(re, _)| re.is_match(utterance_lower))
        .map_or(TimePeriod::DEFAULT, |(_, period)| *period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_phrasings() {
        assert_eq!(extract_time_period("today"), TimePeriod::D1);
        assert_eq!(extract_time_period("1d"), TimePeriod::D1);
        assert_eq!(extract_time_period("1 week"), TimePeriod::D7);
        assert_eq!(extract_time_period("7d"), TimePeriod::D7);
        assert_eq!(extract_time_period("1 month"), TimePeriod::D30);
        assert_eq!(extract_time_period("30d"), TimePeriod::D30);
        assert_eq!(extract_time_period("3 months"), TimePeriod::D90);
        assert_eq!(extract_time_period("90d"), TimePeriod::D90);
        assert_eq!(extract_time_period("1 year"), TimePeriod::Y1);
        assert_eq!(extract_time_period("1y"), TimePeriod::Y1);
    }

    #[test]
    fn test_embedded_phrases() {
        assert_eq!(extract_time_period("btc chart last 7 days"), TimePeriod::D7);
        assert_eq!(extract_time_period("apple graph past month"), TimePeriod::D30);
        assert_eq!(extract_time_period("show tesla for three months"), TimePeriod::D90);
    }

    #[test]
    fn test_default_when_absent() {
        assert_eq!(extract_time_period("bitcoin chart"), TimePeriod::D30);
        assert_eq!(extract_time_period(""), TimePeriod::D30);
    }
}
