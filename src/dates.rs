// Calendar helpers and the filename date heuristic.
//
// Every instant produced here is pinned to 12:00:00 UTC so that a date
// rendered in any browser timezone still lands on the intended calendar day.
use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t|tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static YEAR_SPAN_HYPHEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(20\d{2})\s*-\s*(20\d{2})").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._()\-]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(\d{{1,2}})\s+{MONTH}\.?\s+(\d{{4}})\b")).unwrap()
});
static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b{MONTH}\.?\s+(\d{{1,2}}),?\s+(\d{{4}})\b")).unwrap()
});
static MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b{MONTH}\.?\s+(20\d{{2}})\b")).unwrap());
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b(20\d{{2}})\s+{MONTH}\b")).unwrap());
static NUMERIC_YMD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})[/\s.\-](\d{1,2})[/\s.\-](\d{1,2})\b").unwrap()
});
static NUMERIC_DMY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[/\s.\-](\d{1,2})[/\s.\-](\d{4})\b").unwrap()
});
static QUARTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bQ([1-4])\s*(\d{4})\b").unwrap());
static HALF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bH([12])\s*(\d{4})\b").unwrap());
static FY_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFY\s*(20\d{2})\b").unwrap());
static FY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(20\d{2})\s*FY\b").unwrap());
static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(20\d{2})\s*[–\-]\s*(20\d{2})\b").unwrap());
static ANNUAL_REPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bannual report\b").unwrap());
static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

static OVERRIDE_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static OVERRIDE_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").unwrap());
static OVERRIDE_QUARTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d{4})-Q([1-4])$").unwrap());
static OVERRIDE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());

/// Build the anchored instant for a calendar day. `month` is 1-based.
///
/// Returns `None` when the numbers do not form a real date (Feb 30, month 13).
pub fn at_noon_utc(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0)?))
}

pub fn end_of_month(year: i32, month: u32) -> Option<DateTime<Utc>> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    at_noon_utc(last.year(), last.month(), last.day())
}

pub fn end_of_quarter(year: i32, quarter: u32) -> Option<DateTime<Utc>> {
    let (month, day) = match quarter {
        1 => (3, 31),
        2 => (6, 30),
        3 => (9, 30),
        4 => (12, 31),
        _ => return None,
    };
    at_noon_utc(year, month, day)
}

pub fn end_of_half(year: i32, half: u32) -> Option<DateTime<Utc>> {
    match half {
        1 => at_noon_utc(year, 6, 30),
        2 => at_noon_utc(year, 12, 31),
        _ => None,
    }
}

pub fn end_of_year(year: i32) -> Option<DateTime<Utc>> {
    at_noon_utc(year, 12, 31)
}

/// Render an instant the way browsers print `Date#toISOString`
/// (`2025-06-30T12:00:00.000Z`).
pub fn to_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Map an English month name or abbreviation to its 1-based number.
fn month_number(name: &str) -> Option<u32> {
    let lowered = name.to_ascii_lowercase();
    let prefix = lowered.get(..3)?;
    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn num<T: std::str::FromStr>(caps: &regex::Captures<'_>, idx: usize) -> Option<T> {
    caps.get(idx)?.as_str().parse().ok()
}

// A rule matches at its first occurrence that is a real calendar date.
fn first_valid<F>(re: &Regex, s: &str, build: F) -> Option<DateTime<Utc>>
where
    F: Fn(&regex::Captures<'_>) -> Option<DateTime<Utc>>,
{
    re.captures_iter(s).find_map(|c| build(&c))
}

/// Collapse filename punctuation into single spaces.
///
/// A hyphen between two `20xx` years is turned into an en dash first so the
/// year-range rule still sees it once the other hyphens are gone.
pub fn normalize_text(text: &str) -> String {
    let spans = YEAR_SPAN_HYPHEN.replace_all(text, "${1}–${2}");
    let spaced = SEPARATORS.replace_all(&spans, " ");
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}

/// Infer the most specific publication date a title or path encodes.
///
/// Rules are tried from most to least specific and the first one that yields
/// a real calendar date wins:
/// - `12 March 2024`, `March 12, 2024`: that day
/// - `March 2024`, `2024 March`: last day of the month
/// - `2024-03-12`, `2024/03/12`, `12/03/2024`: that day
/// - `Q3 2025`: quarter end
/// - `H1 2025`: half-year end
/// - `FY 2024`, `2024 FY`: year end
/// - `2023–2024`: end of the second year
/// - `annual report` with a year, then any bare `20xx`: year end
pub fn infer_date(text: &str) -> Option<DateTime<Utc>> {
    if text.trim().is_empty() {
        return None;
    }
    let s = normalize_text(text);

    first_valid(&DAY_MONTH_YEAR, &s, |c| {
        at_noon_utc(num(c, 3)?, month_number(c.get(2)?.as_str())?, num(c, 1)?)
    })
    .or_else(|| {
        first_valid(&MONTH_DAY_YEAR, &s, |c| {
            at_noon_utc(num(c, 3)?, month_number(c.get(1)?.as_str())?, num(c, 2)?)
        })
    })
    .or_else(|| {
        first_valid(&MONTH_YEAR, &s, |c| {
            end_of_month(num(c, 2)?, month_number(c.get(1)?.as_str())?)
        })
    })
    .or_else(|| {
        first_valid(&YEAR_MONTH, &s, |c| {
            end_of_month(num(c, 1)?, month_number(c.get(2)?.as_str())?)
        })
    })
    .or_else(|| first_valid(&NUMERIC_YMD, &s, |c| at_noon_utc(num(c, 1)?, num(c, 2)?, num(c, 3)?)))
    .or_else(|| first_valid(&NUMERIC_DMY, &s, |c| at_noon_utc(num(c, 3)?, num(c, 2)?, num(c, 1)?)))
    .or_else(|| first_valid(&QUARTER, &s, |c| end_of_quarter(num(c, 2)?, num(c, 1)?)))
    .or_else(|| first_valid(&HALF, &s, |c| end_of_half(num(c, 2)?, num(c, 1)?)))
    .or_else(|| first_valid(&FY_PREFIX, &s, |c| end_of_year(num(c, 1)?)))
    .or_else(|| first_valid(&FY_SUFFIX, &s, |c| end_of_year(num(c, 1)?)))
    .or_else(|| first_valid(&YEAR_RANGE, &s, |c| end_of_year(num(c, 2)?)))
    .or_else(|| {
        ANNUAL_REPORT
            .is_match(&s)
            .then(|| first_valid(&BARE_YEAR, &s, |c| end_of_year(num(c, 1)?)))
            .flatten()
    })
    .or_else(|| first_valid(&BARE_YEAR, &s, |c| end_of_year(num(c, 1)?)))
}

/// Parse the date grammar accepted in the overrides file:
/// `YYYY-MM-DD`, `YYYY-MM`, `YYYY-Q#` and `YYYY`.
pub fn parse_override_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Some(c) = OVERRIDE_DAY.captures(s) {
        return at_noon_utc(num(&c, 1)?, num(&c, 2)?, num(&c, 3)?);
    }
    if let Some(c) = OVERRIDE_MONTH.captures(s) {
        return end_of_month(num(&c, 1)?, num(&c, 2)?);
    }
    if let Some(c) = OVERRIDE_QUARTER.captures(s) {
        return end_of_quarter(num(&c, 1)?, num(&c, 2)?);
    }
    if let Some(c) = OVERRIDE_YEAR.captures(s) {
        return end_of_year(num(&c, 1)?);
    }
    None
}

/// Serde adapter writing instants as `to_iso` strings.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::to_iso(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_str(&super::super::to_iso(dt)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            raw.map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
        at_noon_utc(y, m, d)
    }

    #[test]
    fn full_dates_resolve_to_that_day() {
        assert_eq!(infer_date("Results 12 March 2024"), day(2024, 3, 12));
        assert_eq!(infer_date("AGM notice 3 Sept. 2023"), day(2023, 9, 3));
        assert_eq!(infer_date("Update March 12, 2024"), day(2024, 3, 12));
        assert_eq!(infer_date("Letter December 5 2022"), day(2022, 12, 5));
    }

    #[test]
    fn month_and_year_resolve_to_month_end() {
        assert_eq!(infer_date("Investor presentation February 2024"), day(2024, 2, 29));
        assert_eq!(infer_date("Pareto_Sep_2025"), day(2025, 9, 30));
        assert_eq!(infer_date("2025 November bond update"), day(2025, 11, 30));
    }

    #[test]
    fn numeric_dates() {
        assert_eq!(infer_date("release 2024-05-17"), day(2024, 5, 17));
        assert_eq!(infer_date("release 2024/05/17"), day(2024, 5, 17));
        assert_eq!(infer_date("release 17/05/2024"), day(2024, 5, 17));
    }

    #[test]
    fn impossible_numeric_date_falls_through() {
        // 31/02 is not a day, so the bare year rule answers instead.
        assert_eq!(infer_date("memo 31/02/2024"), day(2024, 12, 31));
    }

    #[test]
    fn later_occurrence_of_same_rule_is_used() {
        assert_eq!(infer_date("memo 31/02/2024 revised 15/03/2024"), day(2024, 3, 15));
        assert_eq!(infer_date("30 February 2024 or 2 March 2024"), day(2024, 3, 2));
    }

    #[test]
    fn quarter_half_and_fiscal_year() {
        assert_eq!(infer_date("Q3 2025"), day(2025, 9, 30));
        assert_eq!(infer_date("BlueNord q1-2024 report"), day(2024, 3, 31));
        assert_eq!(infer_date("H1 2025 interim"), day(2025, 6, 30));
        assert_eq!(infer_date("h2_2023"), day(2023, 12, 31));
        assert_eq!(infer_date("FY2022 statements"), day(2022, 12, 31));
        assert_eq!(infer_date("2021 FY statements"), day(2021, 12, 31));
    }

    #[test]
    fn year_range_takes_second_year() {
        assert_eq!(infer_date("Sustainability 2023–2024"), day(2024, 12, 31));
        assert_eq!(infer_date("Sustainability_2023-2024"), day(2024, 12, 31));
    }

    #[test]
    fn annual_report_and_bare_year() {
        assert_eq!(infer_date("Annual Report 2020"), day(2020, 12, 31));
        assert_eq!(infer_date("2021"), day(2021, 12, 31));
        assert_eq!(infer_date("/reports/2019/board.pdf"), day(2019, 12, 31));
    }

    #[test]
    fn nothing_to_infer() {
        assert_eq!(infer_date(""), None);
        assert_eq!(infer_date("Corporate governance policy"), None);
        assert_eq!(infer_date("Archive 1998"), None);
    }

    #[test]
    fn more_specific_rule_wins() {
        assert_eq!(infer_date("Q2 2025 results 15 August 2025"), day(2025, 8, 15));
        assert_eq!(infer_date("FY 2024 presentation March 2025"), day(2025, 3, 31));
    }

    #[test]
    fn override_grammar() {
        assert_eq!(parse_override_date("2024-03-12"), day(2024, 3, 12));
        assert_eq!(parse_override_date(" 2024-02 "), day(2024, 2, 29));
        assert_eq!(parse_override_date("2025-q2"), day(2025, 6, 30));
        assert_eq!(parse_override_date("2023"), day(2023, 12, 31));
        assert_eq!(parse_override_date("2024-13"), None);
        assert_eq!(parse_override_date("March 2024"), None);
        assert_eq!(parse_override_date(""), None);
    }

    #[test]
    fn iso_rendering_has_millis_and_z() {
        let dt = day(2025, 6, 30).unwrap();
        assert_eq!(to_iso(&dt), "2025-06-30T12:00:00.000Z");
    }

    #[test]
    fn month_end_rolls_over_december() {
        assert_eq!(end_of_month(2024, 12), day(2024, 12, 31));
        assert_eq!(end_of_month(2024, 0), None);
    }
}
