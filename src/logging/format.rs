//! Line formatting for disk log entries
//!
//! Pure text assembly: turns optional fields into a single tab-delimited line.
//! Nothing here touches the filesystem or can fail.

use super::category::LogCategory;

/// Marker written at the start of diagnostic error lines
pub const ERROR_MARKER: &str = "  ERROR";

/// Marker written at the start of diagnostic non-error lines
pub const MESSAGE_MARKER: &str = "Message";

/// A single optional field of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    /// `\tLabel: value`
    Labeled(&'static str, &'a str),
    /// `\tLabel: "value"`
    LabeledQuoted(&'static str, &'a str),
    /// `\t"value"`
    Quoted(&'a str),
}

impl Field<'_> {
    /// The raw value carried by this field
    pub fn value(&self) -> &str {
        match self {
            Field::Labeled(_, v) | Field::LabeledQuoted(_, v) | Field::Quoted(v) => v,
        }
    }

    fn push_to(&self, out: &mut String) {
        out.push('\t');
        match self {
            Field::Labeled(label, value) => {
                out.push_str(label);
                out.push_str(": ");
                out.push_str(&single_line(value));
            }
            Field::LabeledQuoted(label, value) => {
                out.push_str(label);
                out.push_str(": \"");
                out.push_str(&single_line(value));
                out.push('"');
            }
            Field::Quoted(value) => {
                out.push('"');
                out.push_str(&single_line(value));
                out.push('"');
            }
        }
    }
}

/// Replace characters that would break the one-line, tab-delimited layout
pub fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\t' | '\r' | '\n' => ' ',
            other => other,
        })
        .collect()
}

/// Render fields in the given order, skipping empty ones
///
/// Every present field is prefixed with a tab; absent fields leave no trace.
pub fn render_fields(fields: &[Field<'_>]) -> String {
    let mut out = String::new();
    for field in fields.iter().filter(|f| !f.value().is_empty()) {
        field.push_to(&mut out);
    }
    out
}

/// Shape (a): a plain message line
pub fn message_line(text: &str) -> String {
    single_line(text)
}

/// Fields of a diagnostic line, in the order they are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticFields<'a> {
    pub page: &'a str,
    pub method: &'a str,
    pub error_line: &'a str,
    pub friendly_message: &'a str,
    pub technical_message: &'a str,
}

impl<'a> DiagnosticFields<'a> {
    fn as_fields(&self) -> [Field<'a>; 5] {
        [
            Field::Labeled("Page", self.page),
            Field::Labeled("Method", self.method),
            Field::Labeled("Error Line", self.error_line),
            Field::Quoted(self.friendly_message),
            Field::LabeledQuoted("Error Message", self.technical_message),
        ]
    }
}

/// Shape (b): a diagnostic line
///
/// `<marker> : <exception><fields...>`
pub fn diagnostic_line(is_error: bool, exception: &str, fields: &DiagnosticFields<'_>) -> String {
    let marker = if is_error { ERROR_MARKER } else { MESSAGE_MARKER };
    format!(
        "{} : {}{}",
        marker,
        single_line(exception),
        render_fields(&fields.as_fields())
    )
}

/// A categorized error line
///
/// Unlike the diagnostic shape, all five fields are always present.
pub fn categorized_error_line(
    category: LogCategory,
    page: &str,
    method: &str,
    technical_error: &str,
    friendly_message: &str,
) -> String {
    format!(
        "Page: {}\tMethod: {}\tError: {}\t\t({})\t\"{}\"",
        single_line(page),
        single_line(method),
        single_line(technical_error),
        category.label().to_uppercase(),
        single_line(friendly_message)
    )
}
