/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Fixed-precision amount followed by the currency code, with locale
/// separators: `1.234,50 MAD` for French locales, `1,234.50 MAD` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub currency: String,
    pub precision: usize,
    pub decimal_separator: char,
    pub group_separator: char,
}

impl MoneyFormat {
    pub fn for_locale(locale: &str, currency: impl Into<String>, precision: usize) -> Self {
        let french = locale.to_ascii_lowercase().starts_with("fr");
        let (decimal_separator, group_separator) = if french { (',', '.') } else { ('.', ',') };
        Self {
            currency: currency.into(),
            precision,
            decimal_separator,
            group_separator,
        }
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::for_locale("fr-MA", "MAD", 2)
    }
}

impl CurrencyFormatter for MoneyFormat {
    fn format_amount(&self, amount: f64) -> String {
        let raw = format!("{:.prec$}", amount.abs(), prec = self.precision);
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (raw.as_str(), None),
        };
        let mut body = group_digits(int_part, self.group_separator);
        if let Some(frac) = frac_part {
            body.push(self.decimal_separator);
            body.push_str(frac);
        }
        let negative = amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
        let sign = if negative { "-" } else { "" };
        format!("{sign}{body} {}", self.currency)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_locale_uses_comma_decimals() {
        let format = MoneyFormat::default();
        assert_eq!(format.format_amount(1234.5), "1.234,50 MAD");
        assert_eq!(format.format_amount(0.0), "0,00 MAD");
        assert_eq!(format.format_amount(-12.0), "-12,00 MAD");
    }

    #[test]
    fn other_locales_use_point_decimals() {
        let format = MoneyFormat::for_locale("en-US", "EUR", 2);
        assert_eq!(format.format_amount(1_234_567.891), "1,234,567.89 EUR");
    }

    #[test]
    fn zero_precision_has_no_separator() {
        let format = MoneyFormat::for_locale("en", "MAD", 0);
        assert_eq!(format.format_amount(999.6), "1,000 MAD");
    }
}
