//! Minimal CSV row formatting
//!
//! Rows are written by hand because the logs are append-only and never
//! parsed back by this crate. Text fields are quoted per RFC 4180 only
//! when they contain a delimiter, a quote or a line break, so plain
//! names stay bare.

use std::borrow::Cow;

/// Quote a single field if it needs quoting
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Join already-rendered fields into one row, without the trailing newline
pub fn join_row<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = Cow<'a, str>>,
{
    let mut row = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            row.push(',');
        }
        row.push_str(&field);
    }
    row
}
