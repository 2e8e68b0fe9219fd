//! Display helpers shared by the report and the CLI.

/// Text of `number` cut to one fractional digit.
///
/// This truncates the decimal text rather than rounding: `19.96` gives `"19.9"`.
/// Whole numbers get a `.0` suffix.
pub fn to_one_decimal_place(number: f64) -> String {
    let text = number.to_string();
    match text.find('.') {
        None => format!("{text}.0"),
        Some(point) => text[..point + 2].to_string(),
    }
}

/// Temperatures are shown with [`to_one_decimal_place`].
pub fn round_temperature(celsius: f64) -> String {
    to_one_decimal_place(celsius)
}

/// Upper-cases the first character and leaves the rest untouched.
/// Returns `None` for an empty string.
pub fn capitalize_first_letter(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
