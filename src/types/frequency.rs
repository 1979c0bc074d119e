use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::error::NoteError;

/// Frequency used when no value is given (A4)
pub const DEFAULT_HZ: f64 = 440.0;
/// Lowest accepted frequency in Hz
pub const MIN_HZ: f64 = 10.0;
/// Highest accepted frequency in Hz
pub const MAX_HZ: f64 = 20_000.0;

/// Frequency text grammar: grouped number, optional "k" multiplier, optional "hz"
/// Letters are ASCII only, so the Kelvin sign is not a "k".
const FREQUENCY_PATTERN: &str = r"^([0-9,]+[.]?[0-9]*)\s*([kK]?)\s*(?:[hH][zZ])?$";

static FREQUENCY_REGEX: OnceLock<Regex> = OnceLock::new();

fn frequency_regex() -> &'static Regex {
    FREQUENCY_REGEX.get_or_init(|| Regex::new(FREQUENCY_PATTERN).expect("invalid regex pattern"))
}

/// An audible frequency in Hertz
///
/// Always within `[MIN_HZ, MAX_HZ]`: construction is the only place the
/// bound is checked and there is no way to mutate a value afterwards.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Frequency {
    hz: f64,
}

impl Frequency {
    /// Create a frequency, rejecting values outside the audible range
    pub fn new(hz: f64) -> Result<Self, NoteError> {
        // NaN fails `contains` as well
        if !(MIN_HZ..=MAX_HZ).contains(&hz) {
            return Err(NoteError::Range { value: hz });
        }
        Ok(Self { hz })
    }

    /// Parse user text such as `"440"`, `"1.5 kHz"` or `"1,200 Hz"`
    ///
    /// Empty (or all-whitespace) text yields the default frequency.
    pub fn parse(text: &str) -> Result<Self, NoteError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        let captures = frequency_regex()
            .captures(text)
            .ok_or_else(|| NoteError::Parse(text.to_string()))?;

        let digits = captures[1].replace(',', "");
        let mut hz: f64 = digits
            .trim_end_matches('.')
            .parse()
            .map_err(|_| NoteError::Parse(text.to_string()))?;

        if !captures[2].is_empty() {
            hz *= 1000.0;
        }

        Self::new(hz)
    }

    /// Value in Hertz
    pub fn hz(&self) -> f64 {
        self.hz
    }

    pub fn min_audible() -> Self {
        Self { hz: MIN_HZ }
    }

    pub fn max_audible() -> Self {
        Self { hz: MAX_HZ }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self { hz: DEFAULT_HZ }
    }
}

impl TryFrom<f64> for Frequency {
    type Error = NoteError;

    fn try_from(hz: f64) -> Result<Self, Self::Error> {
        Self::new(hz)
    }
}

impl TryFrom<Option<f64>> for Frequency {
    type Error = NoteError;

    fn try_from(hz: Option<f64>) -> Result<Self, Self::Error> {
        Self::new(hz.unwrap_or(DEFAULT_HZ))
    }
}

impl From<Frequency> for f64 {
    fn from(freq: Frequency) -> Self {
        freq.hz
    }
}

impl FromStr for Frequency {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", format_grouped(self.hz))
    }
}

/// en-US style number: comma thousands separators, at most two fraction digits
///
/// Only called with in-range (positive) values.
fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts frequency text or a bare number of Hz
struct FrequencyVisitor;

impl<'de> Visitor<'de> for FrequencyVisitor {
    type Value = Frequency;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a frequency such as 440, \"440 Hz\" or \"1.5 kHz\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Frequency, E> {
        Frequency::parse(v).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Frequency, E> {
        Frequency::new(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Frequency, E> {
        self.visit_f64(v as f64)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Frequency, E> {
        self.visit_f64(v as f64)
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FrequencyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_a4() {
        assert_eq!(Frequency::default().hz(), 440.0);
        assert_eq!(Frequency::try_from(None::<f64>).unwrap(), Frequency::default());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(Frequency::new(10.0).unwrap().hz(), 10.0);
        assert_eq!(Frequency::new(20_000.0).unwrap().hz(), 20_000.0);
        assert_eq!(Frequency::new(10.0).unwrap(), Frequency::min_audible());
        assert_eq!(Frequency::new(20_000.0).unwrap(), Frequency::max_audible());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Frequency::new(9.999).unwrap_err().is_range());
        assert!(Frequency::new(20_000.01).unwrap_err().is_range());
        assert!(Frequency::new(-440.0).unwrap_err().is_range());
        assert!(Frequency::new(f64::NAN).unwrap_err().is_range());
        assert!(Frequency::new(f64::INFINITY).unwrap_err().is_range());
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(Frequency::parse("").unwrap(), Frequency::default());
        assert_eq!(Frequency::parse("   ").unwrap(), Frequency::default());
    }

    #[test]
    fn test_parse_suffix_and_case() {
        let plain = Frequency::parse("440").unwrap();
        assert_eq!(Frequency::parse("440hz").unwrap(), plain);
        assert_eq!(Frequency::parse("440 Hz").unwrap(), plain);
        assert_eq!(Frequency::parse("  440HZ  ").unwrap(), plain);
    }

    #[test]
    fn test_parse_kilo() {
        assert_eq!(Frequency::parse("1.5khz").unwrap().hz(), 1500.0);
        assert_eq!(Frequency::parse("2 K").unwrap().hz(), 2000.0);
        assert_eq!(Frequency::parse("1 kHz").unwrap().hz(), 1000.0);
    }

    #[test]
    fn test_parse_kilo_is_ascii_only() {
        assert!(Frequency::parse("1\u{212A}hz").unwrap_err().is_parse());
        assert!(Frequency::parse("1k\u{212A}").unwrap_err().is_parse());
    }

    #[test]
    fn test_parse_grouping_commas() {
        assert_eq!(Frequency::parse("1,200 Hz").unwrap().hz(), 1200.0);
        assert_eq!(Frequency::parse("12,000").unwrap().hz(), 12_000.0);
    }

    #[test]
    fn test_parse_trailing_dot() {
        assert_eq!(Frequency::parse("440.").unwrap().hz(), 440.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Frequency::parse("abc").unwrap_err();
        assert_eq!(err, NoteError::Parse("abc".to_string()));

        assert!(Frequency::parse("hz").unwrap_err().is_parse());
        assert!(Frequency::parse(",").unwrap_err().is_parse());
        assert!(Frequency::parse("440 MHz").unwrap_err().is_parse());
        assert!(Frequency::parse("-440").unwrap_err().is_parse());
        assert!(Frequency::parse("440 hz extra").unwrap_err().is_parse());
    }

    #[test]
    fn test_parse_error_echoes_trimmed_input() {
        let err = Frequency::parse("  loud  ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Must be a number ending in Hz or KHz. Got \"loud\"."
        );
    }

    #[test]
    fn test_parse_range_errors() {
        assert!(Frequency::parse("5hz").unwrap_err().is_range());
        assert!(Frequency::parse("21k").unwrap_err().is_range());
    }

    #[test]
    fn test_from_str() {
        let freq: Frequency = "880 Hz".parse().unwrap();
        assert_eq!(freq.hz(), 880.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Frequency::default().to_string(), "440 Hz");
        assert_eq!(Frequency::new(1234.5).unwrap().to_string(), "1,234.5 Hz");
        assert_eq!(Frequency::new(20_000.0).unwrap().to_string(), "20,000 Hz");
        assert_eq!(Frequency::new(261.625565).unwrap().to_string(), "261.63 Hz");
        assert_eq!(Frequency::new(99.999).unwrap().to_string(), "100 Hz");
        assert_eq!(Frequency::new(12_345.0).unwrap().to_string(), "12,345 Hz");
    }

    #[test]
    fn test_display_parses_back() {
        let freq = Frequency::new(15_432.25).unwrap();
        assert_eq!(Frequency::parse(&freq.to_string()).unwrap(), freq);
    }

    #[test]
    fn test_serde_uses_text_grammar() {
        let freq: Frequency = serde_yaml::from_str("\"1.5 kHz\"").unwrap();
        assert_eq!(freq.hz(), 1500.0);

        let yaml = serde_yaml::to_string(&freq).unwrap();
        assert!(yaml.contains("1,500 Hz"));
        assert_eq!(serde_yaml::from_str::<Frequency>(&yaml).unwrap(), freq);

        assert!(serde_yaml::from_str::<Frequency>("\"5 Hz\"").is_err());
        assert_eq!(serde_yaml::from_str::<Frequency>("880").unwrap().hz(), 880.0);
        assert_eq!(serde_yaml::from_str::<Frequency>("27.5").unwrap().hz(), 27.5);
    }
}
