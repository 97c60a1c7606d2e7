//! Locale-aware number, currency, percent and date formatting for rendering
//! statement views.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Full month names in Brazilian Portuguese, January first.
pub const MONTH_NAMES_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Three-letter month labels used by the entry groupings.
pub const MONTH_ABBREVIATIONS_PT: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    /// `09/03/2025`
    DayFirst,
    /// `03/09/2025`
    MonthFirst,
}

/// Separators and date layout for a locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl LocaleConfig {
    pub fn pt_br() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
            date_format: DateFormatStyle::DayFirst,
        }
    }

    pub fn en_us() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::MonthFirst,
        }
    }

    /// Resolves a language tag, falling back to pt-BR for unknown tags.
    pub fn for_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("en-US") || tag.eq_ignore_ascii_case("en") {
            Self::en_us()
        } else {
            Self::pt_br()
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::pt_br()
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let grouped = match int_part.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits, locale.grouping_separator)),
        None => group_digits(int_part, locale.grouping_separator),
    };
    match frac_part {
        Some(frac) => format!("{}{}{}", grouped, locale.decimal_separator, frac),
        None => grouped,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Formats an amount with the currency symbol, e.g. `R$ 1.234,56`.
///
/// Non-finite amounts render as zero.
pub fn format_currency_value(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let symbol = symbol_for(code.as_str());
    let negative = amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        format!("-{} {}", symbol, body)
    } else {
        format!("{} {}", symbol, body)
    }
}

/// Renders a fraction (`0.123`) as a percentage with one decimal (`12,3%`).
pub fn format_percent(fraction: f64, locale: &LocaleConfig) -> String {
    let fraction = if fraction.is_finite() { fraction } else { 0.0 };
    let body = format!("{:.1}", fraction * 100.0);
    format!("{}%", body.replace('.', &locale.decimal_separator.to_string()))
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::DayFirst => date.format("%d/%m/%Y").to_string(),
        DateFormatStyle::MonthFirst => format!("{:02}/{:02}/{}", date.month(), date.day(), date.year()),
    }
}

/// Full pt-BR month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES_PT.get(idx as usize))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_brl_with_brazilian_separators() {
        let locale = LocaleConfig::pt_br();
        let code = CurrencyCode::default();
        assert_eq!(format_currency_value(1234.5, &code, &locale), "R$ 1.234,50");
        assert_eq!(format_currency_value(-125000.0, &code, &locale), "-R$ 125.000,00");
        assert_eq!(format_currency_value(f64::NAN, &code, &locale), "R$ 0,00");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        let locale = LocaleConfig::pt_br();
        assert_eq!(
            format_currency_value(-0.001, &CurrencyCode::default(), &locale),
            "R$ 0,00"
        );
    }

    #[test]
    fn percent_uses_locale_decimal_separator() {
        assert_eq!(format_percent(0.1234, &LocaleConfig::pt_br()), "12,3%");
        assert_eq!(format_percent(1.0, &LocaleConfig::en_us()), "100.0%");
        assert_eq!(format_percent(f64::INFINITY, &LocaleConfig::en_us()), "0.0%");
    }

    #[test]
    fn month_names_are_one_based() {
        assert_eq!(month_name(1), Some("janeiro"));
        assert_eq!(month_name(12), Some("dezembro"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn dates_follow_locale_layout() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(format_date(&LocaleConfig::pt_br(), date), "09/03/2025");
        assert_eq!(format_date(&LocaleConfig::en_us(), date), "03/09/2025");
    }
}
