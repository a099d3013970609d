//! Regex tables for label date extraction.
//!
//! Both tables are compiled once per process and shared read-only.

use lazy_static::lazy_static;
use regex::Regex;

/// Calendar convention a raw date pattern stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePatternKind {
    /// `MM/DD/YYYY`, `MM/DD/YY`
    MonthDayYear,
    /// `DD/MM/YYYY`, `DD/MM/YY`
    DayMonthYear,
    /// `YYYY/MM/DD`, `YY/MM/DD`
    YearMonthDay,
    /// `EXP: 08/15/25`, `EXPIRY 15-08-2025`, `EXPIRES08/15/2025`
    Labeled,
    /// `JUN 18 2025`, `JUN1825`
    MonthNameFirst,
    /// `18 JUN 14`, `18JUN2025`
    MonthNameSecond,
}

impl DatePatternKind {
    pub fn convention(&self) -> &'static str {
        match self {
            DatePatternKind::MonthDayYear => "MM/DD/YYYY",
            DatePatternKind::DayMonthYear => "DD/MM/YYYY",
            DatePatternKind::YearMonthDay => "YYYY/MM/DD",
            DatePatternKind::Labeled => "EXP: date",
            DatePatternKind::MonthNameFirst => "MON DD YYYY",
            DatePatternKind::MonthNameSecond => "DD MON YYYY",
        }
    }
}

/// One entry of the raw-match table.
///
/// The `date` capture group is the raw match handed to normalization.
#[derive(Debug)]
pub struct DatePattern {
    pub kind: DatePatternKind,
    pub regex: Regex,
}

impl DatePattern {
    /// Raw date substring in `line`, if this pattern matches.
    pub fn raw_match<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.name("date"))
            .map(|m| m.as_str())
    }
}

/// One entry of the normalization table.
///
/// Patterns are anchored and run against the upper-cased raw match. They
/// capture `y` and `d`, plus either a numeric `m` or a month name `mon`.
#[derive(Debug)]
pub struct CalendarFormat {
    pub name: &'static str,
    pub regex: Regex,
}

fn date_pattern(kind: DatePatternKind, pattern: &str) -> DatePattern {
    DatePattern {
        kind,
        regex: Regex::new(pattern).unwrap(),
    }
}

fn calendar_format(name: &'static str, pattern: &str) -> CalendarFormat {
    CalendarFormat {
        name,
        regex: Regex::new(pattern).unwrap(),
    }
}

lazy_static! {
    /// Raw-match table, in priority order.
    pub static ref DATE_PATTERNS: Vec<DatePattern> = vec![
        date_pattern(
            DatePatternKind::MonthDayYear,
            r"(?i)\b(?P<date>(?:0?[1-9]|1[0-2])[/\-](?:0?[1-9]|[12]\d|3[01])[/\-]\d{2,4})\b",
        ),
        date_pattern(
            DatePatternKind::DayMonthYear,
            r"(?i)\b(?P<date>(?:0?[1-9]|[12]\d|3[01])[/\-](?:0?[1-9]|1[0-2])[/\-]\d{2,4})\b",
        ),
        date_pattern(
            DatePatternKind::YearMonthDay,
            r"(?i)\b(?P<date>\d{2,4}[/\-](?:0?[1-9]|1[0-2])[/\-](?:0?[1-9]|[12]\d|3[01]))\b",
        ),
        date_pattern(
            DatePatternKind::Labeled,
            r"(?i)\bEXP(?:IRY|IRES)?[:\s]*(?P<date>\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})\b",
        ),
        date_pattern(
            DatePatternKind::MonthNameFirst,
            r"(?i)\b(?P<date>(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\s?\d{1,2}\s?\d{2,4})\b",
        ),
        date_pattern(
            DatePatternKind::MonthNameSecond,
            r"(?i)\b(?P<date>\d{1,2}\s?(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\s?\d{2,4})\b",
        ),
    ];

    /// Normalization table, in priority order. Four-digit years before
    /// two-digit years within each family.
    pub static ref CALENDAR_FORMATS: Vec<CalendarFormat> = vec![
        calendar_format("MM/DD/YYYY", r"^(?P<m>\d{1,2})[/\-](?P<d>\d{1,2})[/\-](?P<y>\d{4})$"),
        calendar_format("MM/DD/YY", r"^(?P<m>\d{1,2})[/\-](?P<d>\d{1,2})[/\-](?P<y>\d{2})$"),
        calendar_format("DD/MM/YYYY", r"^(?P<d>\d{1,2})[/\-](?P<m>\d{1,2})[/\-](?P<y>\d{4})$"),
        calendar_format("DD/MM/YY", r"^(?P<d>\d{1,2})[/\-](?P<m>\d{1,2})[/\-](?P<y>\d{2})$"),
        calendar_format("YYYY/MM/DD", r"^(?P<y>\d{4})[/\-](?P<m>\d{1,2})[/\-](?P<d>\d{1,2})$"),
        calendar_format("YY/MM/DD", r"^(?P<y>\d{2})[/\-](?P<m>\d{1,2})[/\-](?P<d>\d{1,2})$"),
        calendar_format("MON DD YYYY", r"^(?P<mon>[A-Z]{3}) (?P<d>\d{1,2}) (?P<y>\d{4})$"),
        calendar_format("MONDDYYYY", r"^(?P<mon>[A-Z]{3})(?P<d>\d{1,2})(?P<y>\d{4})$"),
        calendar_format("DD MON YYYY", r"^(?P<d>\d{1,2}) (?P<mon>[A-Z]{3}) (?P<y>\d{4})$"),
        calendar_format("DDMONYYYY", r"^(?P<d>\d{1,2})(?P<mon>[A-Z]{3})(?P<y>\d{4})$"),
        calendar_format("MON DD YY", r"^(?P<mon>[A-Z]{3}) (?P<d>\d{1,2}) (?P<y>\d{2})$"),
        calendar_format("MONDDYY", r"^(?P<mon>[A-Z]{3})(?P<d>\d{1,2})(?P<y>\d{2})$"),
        calendar_format("DD MON YY", r"^(?P<d>\d{1,2}) (?P<mon>[A-Z]{3}) (?P<y>\d{2})$"),
        calendar_format("DDMONYY", r"^(?P<d>\d{1,2})(?P<mon>[A-Z]{3})(?P<y>\d{2})$"),
    ];
}
