//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a money value with a dollar sign and two decimals.
///
/// Usage in templates: `{{ quote.tax_total|usd }}`
#[askama::filter_fn]
pub fn usd(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("${value}"))
}
