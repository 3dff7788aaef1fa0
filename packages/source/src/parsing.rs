//! Line-oriented CSV tokenizing and typed field access.
//!
//! The data tables use a simplified CSV dialect: a double quote toggles
//! quoted mode, commas inside quotes are literal, and the quote characters
//! themselves are dropped. A literal quote can therefore never appear in a
//! field. Tokenizing never fails; malformed quoting yields best-effort
//! fields.

/// Splits one line into its fields.
///
/// Empty trailing fields are kept so that column indexes stay stable.
#[must_use]
pub fn parse_line(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

/// Tokenizes a whole table, discarding the header row and blank lines.
#[must_use]
pub fn parse_table(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Typed, index-based access to a tokenized row.
///
/// Missing columns read as empty, so short rows behave as if padded.
#[derive(Debug, Clone, Copy)]
pub struct FieldRow<'a> {
    fields: &'a [String],
}

impl<'a> FieldRow<'a> {
    /// Wraps a tokenized row.
    #[must_use]
    pub const fn new(fields: &'a [String]) -> Self {
        Self { fields }
    }

    /// Trimmed text at `index`, empty when the column is missing.
    #[must_use]
    pub fn text(&self, index: usize) -> &'a str {
        self.fields.get(index).map_or("", |f| f.trim())
    }

    /// Owned text at `index`, `None` when empty.
    #[must_use]
    pub fn optional_text(&self, index: usize) -> Option<String> {
        let value = self.text(index);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Integer year at `index`.
    #[must_use]
    pub fn year(&self, index: usize) -> Option<i32> {
        parse_year(self.text(index))
    }

    /// Non-negative count at `index`.
    #[must_use]
    pub fn count(&self, index: usize) -> Option<u64> {
        parse_count(self.text(index))
    }

    /// Floating point value at `index`.
    #[must_use]
    pub fn number(&self, index: usize) -> Option<f64> {
        parse_number(self.text(index))
    }
}

/// Parses an integer year. Empty or unparsable input is absent, not zero.
/// Whole-valued float spellings such as `"1200.0"` are accepted.
#[must_use]
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let value = parse_number(s)?;
    if value.fract() != 0.0 || value.abs() > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let year = value as i32;
    Some(year)
}

/// Parses a non-negative integer count. Fractional values are truncated.
#[must_use]
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(count) = s.parse::<u64>() {
        return Some(count);
    }
    let value = parse_number(s)?;
    if value < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value.trunc() as u64;
    Some(count)
}

/// Parses a finite float.
#[must_use]
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Removes every double quote from free text.
#[must_use]
pub fn strip_quotes(s: &str) -> String {
    s.replace('"', "").trim().to_string()
}
