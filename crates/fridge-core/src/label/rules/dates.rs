//! Expiration date extraction for food labels.
//!
//! Two stages: find the first raw date-shaped substring (lines in order,
//! patterns in table order), then normalize it against the ordered
//! calendar formats. A raw match that no format accepts yields `None`;
//! later lines are not consulted.

use chrono::NaiveDate;
use regex::Captures;
use tracing::{debug, trace};

use super::patterns::{CALENDAR_FORMATS, DATE_PATTERNS, DatePatternKind};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::DEFAULT_YEAR_PIVOT;

/// A raw date-shaped substring found on a label line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// The matched substring, as it appeared on the line.
    pub raw: String,
    /// Index of the classified line that contained it.
    pub line_index: usize,
    /// Pattern-table entry that matched.
    pub pattern: DatePatternKind,
}

/// Expiration date field extractor.
#[derive(Debug, Clone)]
pub struct DateExtractor {
    year_pivot: u8,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            year_pivot: DEFAULT_YEAR_PIVOT,
        }
    }

    /// Set the two-digit year pivot: `yy < pivot` is 20yy, else 19yy.
    pub fn with_year_pivot(mut self, pivot: u8) -> Self {
        self.year_pivot = pivot.min(100);
        self
    }

    /// Stage 1: the first raw match in (line, pattern) priority order.
    pub fn find_raw<S: AsRef<str>>(&self, lines: &[S]) -> Option<DateMatch> {
        for (line_index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            for pattern in DATE_PATTERNS.iter() {
                if let Some(raw) = pattern.raw_match(line) {
                    debug!(
                        "Line {} matched {} pattern: {:?}",
                        line_index,
                        pattern.kind.convention(),
                        raw
                    );
                    return Some(DateMatch {
                        raw: raw.to_string(),
                        line_index,
                        pattern: pattern.kind,
                    });
                }
            }
        }
        None
    }

    /// Stage 2: parse a raw match with the first calendar format that fits.
    pub fn normalize(&self, raw: &str) -> Option<NaiveDate> {
        let upper = raw.to_uppercase();

        for format in CALENDAR_FORMATS.iter() {
            let Some(caps) = format.regex.captures(&upper) else {
                continue;
            };

            match self.date_from_captures(&caps) {
                Some(date) => {
                    debug!("Normalized {:?} with {} to {}", raw, format.name, date);
                    return Some(date);
                }
                None => trace!("{} rejected {:?}", format.name, raw),
            }
        }

        debug!("Date-shaped {:?} matched no calendar format", raw);
        None
    }

    fn date_from_captures(&self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let day: u32 = caps.name("d")?.as_str().parse().ok()?;
        let month = match (caps.name("m"), caps.name("mon")) {
            (Some(m), _) => m.as_str().parse().ok()?,
            (None, Some(mon)) => month_abbrev_to_number(mon.as_str())?,
            (None, None) => return None,
        };

        let year_text = caps.name("y")?.as_str();
        let year: i32 = year_text.parse().ok()?;
        let year = if year_text.len() == 2 {
            expand_two_digit_year(year, self.year_pivot)
        } else {
            year
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Option<Self::Output> {
        let found = self.find_raw(lines)?;
        let date = self.normalize(&found.raw)?;
        Some(ExtractionMatch::new(date, found.raw).with_line(found.line_index))
    }
}

/// Find and normalize the expiration date, as `YYYY-MM-DD`.
pub fn find_expiration_date<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    DateExtractor::new()
        .extract(lines)
        .map(|m| format_iso(m.value))
}

/// Stage 1 only: the first date-shaped substring.
pub fn find_raw_date<S: AsRef<str>>(lines: &[S]) -> Option<DateMatch> {
    DateExtractor::new().find_raw(lines)
}

/// Stage 2 only: normalize a date-shaped substring to `YYYY-MM-DD`.
pub fn normalize_date(raw: &str) -> Option<String> {
    DateExtractor::new().normalize(raw).map(format_iso)
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn expand_two_digit_year(yy: i32, pivot: u8) -> i32 {
    if yy < i32::from(pivot) {
        2000 + yy
    } else {
        1900 + yy
    }
}

fn month_abbrev_to_number(month: &str) -> Option<u32> {
    let number = match month {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_line_after_header() {
        let lines = ["Best Before", "EXP: 08/15/2025"];
        assert_eq!(find_expiration_date(&lines), Some("2025-08-15".to_string()));
    }

    #[test]
    fn test_day_month_name_two_digit_year() {
        assert_eq!(find_expiration_date(&["18 JUN 14"]), Some("2014-06-18".to_string()));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(find_expiration_date(&["no date here"]), None);
        assert_eq!(find_expiration_date::<&str>(&[]), None);
    }

    #[test]
    fn test_impossible_date_is_not_normalized() {
        let lines = ["02/30/2025"];

        let raw = find_raw_date(&lines).unwrap();
        assert_eq!(raw.raw, "02/30/2025");
        assert_eq!(raw.pattern, DatePatternKind::MonthDayYear);

        assert_eq!(find_expiration_date(&lines), None);
    }

    #[test]
    fn test_ambiguous_prefers_month_first() {
        assert_eq!(find_expiration_date(&["03/04/2025"]), Some("2025-03-04".to_string()));
    }

    #[test]
    fn test_day_first_when_month_out_of_range() {
        let lines = ["25/12/2025"];
        assert_eq!(find_raw_date(&lines).unwrap().pattern, DatePatternKind::DayMonthYear);
        assert_eq!(find_expiration_date(&lines), Some("2025-12-25".to_string()));
    }

    #[test]
    fn test_year_first() {
        assert_eq!(find_expiration_date(&["BB 2026-01-09"]), Some("2026-01-09".to_string()));
    }

    #[test]
    fn test_line_order_beats_pattern_order() {
        // Line 0 only matches the last pattern; line 1 would match the first.
        let lines = ["18JUN25", "08/15/2025"];
        let raw = find_raw_date(&lines).unwrap();
        assert_eq!(raw.line_index, 0);
        assert_eq!(raw.pattern, DatePatternKind::MonthNameSecond);
        assert_eq!(find_expiration_date(&lines), Some("2025-06-18".to_string()));
    }

    #[test]
    fn test_first_raw_match_is_final_even_if_unparsable() {
        // "JUN 2025" is date-shaped but fits no calendar format.
        let lines = ["JUN 2025", "08/15/2025"];
        assert_eq!(find_raw_date(&lines).unwrap().raw, "JUN 2025");
        assert_eq!(find_expiration_date(&lines), None);
    }

    #[test]
    fn test_labeled_two_digit_year() {
        assert_eq!(find_expiration_date(&["EXP 08/15/25"]), Some("2025-08-15".to_string()));
        assert_eq!(find_expiration_date(&["EXPIRY 15-08-25"]), Some("2025-08-15".to_string()));

        // No word boundary before the digits, so only the label form applies.
        let raw = find_raw_date(&["EXP08/15/25"]).unwrap();
        assert_eq!(raw.pattern, DatePatternKind::Labeled);
        assert_eq!(find_expiration_date(&["EXP08/15/25"]), Some("2025-08-15".to_string()));
    }

    #[test]
    fn test_labeled_dotted_date_is_skipped() {
        assert_eq!(find_raw_date(&["EXP 15.08.25"]), None);
        assert_eq!(
            find_expiration_date(&["EXP 15.08.25", "08/15/2025"]),
            Some("2025-08-15".to_string())
        );
    }

    #[test]
    fn test_numeric_two_digit_years_without_label() {
        assert_eq!(find_expiration_date(&["BEST BY 08/15/25"]), Some("2025-08-15".to_string()));
        assert_eq!(find_expiration_date(&["15/08/25"]), Some("2025-08-15".to_string()));

        let raw = find_raw_date(&["99/12/31"]).unwrap();
        assert_eq!(raw.pattern, DatePatternKind::YearMonthDay);
        assert_eq!(find_expiration_date(&["99/12/31"]), Some("1999-12-31".to_string()));
    }

    #[test]
    fn test_month_name_first_variants() {
        assert_eq!(find_expiration_date(&["best by jun 18 2025"]), Some("2025-06-18".to_string()));
        assert_eq!(find_expiration_date(&["Dec0526"]), Some("2026-12-05".to_string()));
        assert_eq!(find_expiration_date(&["SEP 5 99"]), Some("1999-09-05".to_string()));
    }

    #[test]
    fn test_year_pivot() {
        assert_eq!(normalize_date("01 JAN 68"), Some("2068-01-01".to_string()));
        assert_eq!(normalize_date("01 JAN 69"), Some("1969-01-01".to_string()));

        let extractor = DateExtractor::new().with_year_pivot(80);
        assert_eq!(
            extractor.normalize("01 JAN 75"),
            NaiveDate::from_ymd_opt(2075, 1, 1)
        );
        let all_2000s = DateExtractor::new().with_year_pivot(255);
        assert_eq!(
            all_2000s.normalize("01 JAN 99"),
            NaiveDate::from_ymd_opt(2099, 1, 1)
        );
    }

    #[test]
    fn test_normalize_rejects_unknown_month_and_mixed_spacing() {
        assert_eq!(normalize_date("18 JUX 14"), None);
        assert_eq!(normalize_date("18JUN 14"), None);
        assert_eq!(normalize_date("2025/02/29"), None);
        assert_eq!(normalize_date("2024/02/29"), Some("2024-02-29".to_string()));
    }

    #[test]
    fn test_extract_reports_source_and_line() {
        let lines = vec!["LOT 42".to_string(), "exp 08/15/2025".to_string()];
        let m = DateExtractor::new().extract(&lines).unwrap();
        assert_eq!(m.value, NaiveDate::from_ymd_opt(2025, 8, 15).unwrap());
        assert_eq!(m.source, "08/15/2025");
        assert_eq!(m.line, Some(1));
    }
}
