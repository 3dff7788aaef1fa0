#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Gregorian to Hebrew calendar year conversion.
//!
//! Converts signed Gregorian years (negative for BCE) to Anno Mundi years
//! and renders those as Hebrew letter numerals for the timeline labels.
//!
//! Letter numerals follow the usual print convention: the thousands digit
//! is written as a single letter followed by a geresh (`'`), the remainder
//! below one thousand gets a gershayim (`"`) before its last letter when it
//! spells two or more letters, and a trailing geresh when it is a single
//! letter. 15 and 16 are written ט״ו and ט״ז.

/// Offset between CE years and Anno Mundi years.
const CE_OFFSET: i32 = 3760;

/// Largest value [`to_letter_numeral`] can render.
pub const MAX_NUMERAL: i32 = 9999;

const GERESH: char = '\'';
const GERSHAYIM: char = '"';

const ONES: [&str; 10] = ["", "א", "ב", "ג", "ד", "ה", "ו", "ז", "ח", "ט"];
const TENS: [&str; 10] = ["", "י", "כ", "ל", "מ", "נ", "ס", "ע", "פ", "צ"];
const HUNDREDS: [&str; 10] = ["", "ק", "ר", "ש", "ת", "תק", "תר", "תש", "תת", "תתק"];

/// Errors from numeral rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NumeralError {
    /// The value has no letter-numeral form.
    #[error("cannot render {0} as a letter numeral: expected 1-{MAX_NUMERAL}")]
    OutOfRange(i32),
}

/// Converts a Gregorian year to a Hebrew (Anno Mundi) year.
///
/// There is no year zero: `0` and negative years are both treated as BCE,
/// so `0` maps to the same year as `1 CE` minus one. Years beyond the `i32`
/// range saturate.
#[must_use]
pub const fn to_hebrew_year(gregorian_year: i32) -> i32 {
    if gregorian_year > 0 {
        gregorian_year.saturating_add(CE_OFFSET)
    } else {
        // Cannot overflow for non-positive years.
        gregorian_year + (CE_OFFSET + 1)
    }
}

/// Renders a positive integer as a Hebrew letter numeral.
///
/// # Errors
///
/// Returns [`NumeralError::OutOfRange`] for values outside `1..=9999`.
pub fn to_letter_numeral(value: i32) -> Result<String, NumeralError> {
    if !(1..=MAX_NUMERAL).contains(&value) {
        return Err(NumeralError::OutOfRange(value));
    }
    #[allow(clippy::cast_sign_loss)]
    let value = value as usize;

    let mut result = String::new();

    let thousands = value / 1000;
    if thousands > 0 {
        result.push_str(ONES[thousands]);
        result.push(GERESH);
    }

    let remainder = spell_below_thousand(value % 1000);
    let letters: Vec<char> = remainder.chars().collect();
    match letters.as_slice() {
        [] => {}
        [single] => {
            result.push(*single);
            result.push(GERESH);
        }
        [init @ .., last] => {
            result.extend(init);
            result.push(GERSHAYIM);
            result.push(*last);
        }
    }

    Ok(result)
}

/// Spells `0..1000` without separators.
fn spell_below_thousand(value: usize) -> String {
    let mut letters = String::from(HUNDREDS[value / 100]);
    match value % 100 {
        15 => letters.push_str("טו"),
        16 => letters.push_str("טז"),
        rest => {
            letters.push_str(TENS[rest / 10]);
            letters.push_str(ONES[rest % 10]);
        }
    }
    letters
}

/// Formats a Gregorian year with its era, e.g. `"586 BCE"` or `"70 CE"`.
#[must_use]
pub fn era_label(year: i32) -> String {
    if year < 0 {
        format!("{} BCE", year.unsigned_abs())
    } else {
        format!("{year} CE")
    }
}

/// Formats a Gregorian year alongside its Hebrew year numeral, e.g.
/// `"1948 CE / ה'תש"ח"`. Falls back to the era label alone when the Hebrew
/// year has no numeral form.
#[must_use]
pub fn dual_year_label(year: i32) -> String {
    let era = era_label(year);
    match to_letter_numeral(to_hebrew_year(year)) {
        Ok(numeral) => format!("{era} / {numeral}"),
        Err(_) => era,
    }
}
