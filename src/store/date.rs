use chrono::NaiveDate;
use serde::Deserialize;

/// A genealogical date: the recorded text plus, when the text is well-formed
/// enough to pin down, a resolved calendar date.
///
/// Source data carries dates in GEDCOM style ("12 JAN 1900", "ABT 1850",
/// "BET 1850 AND 1860") as well as plain ISO. Range and qualified forms
/// resolve to their earliest day; anything else resolves to nothing and the
/// API emits `null` for the field.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "String")]
pub struct GedcomDate {
    text: String,
    resolved: Option<NaiveDate>,
}

impl GedcomDate {
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            resolved: resolve(text),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the recorded text pins down a calendar date.
    pub fn is_resolvable(&self) -> bool {
        self.resolved.is_some()
    }

    /// ISO `YYYY-MM-DD` for well-formed dates, `None` otherwise.
    pub fn to_iso(&self) -> Option<String> {
        self.resolved.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

impl From<String> for GedcomDate {
    fn from(text: String) -> Self {
        GedcomDate::parse(&text)
    }
}

const QUALIFIERS: &[&str] = &["ABT", "CAL", "EST", "AFT", "BEF", "FROM", "TO"];

fn resolve(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Plain ISO dates pass straight through.
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }

    let upper = text.to_ascii_uppercase();
    let mut tokens: Vec<&str> = upper.split_whitespace().collect();

    // "BET 1850 AND 1860" resolves to its earliest bound.
    if tokens.first() == Some(&"BET") {
        let and = tokens.iter().position(|t| *t == "AND")?;
        tokens = tokens[1..and].to_vec();
    } else if tokens.len() > 1 && QUALIFIERS.contains(&tokens[0]) {
        tokens = tokens[1..].to_vec();
    }

    match tokens.as_slice() {
        [year] => from_ymd(year, 1, 1),
        [month, year] => from_ymd(year, month_number(month)?, 1),
        [day, month, year] => from_ymd(year, month_number(month)?, day.parse().ok()?),
        _ => None,
    }
}

fn from_ymd(year: &str, month: u32, day: u32) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(token: &str) -> Option<u32> {
    let month = match token {
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
    Some(month)
}
