use alu_config::Config;
use alu_core::{CurrencyFormatter, MoneyFormat};

use crate::backend::money_format;

/// Display formatting backed by the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    money: MoneyFormat,
}

impl CliFormatters {
    pub fn new(config: &Config) -> Self {
        Self {
            money: money_format(config),
        }
    }

    pub fn money(&self, amount: f64) -> String {
        self.money.format_amount(amount)
    }

    pub fn surface(&self, square_metres: f64) -> String {
        format!("{square_metres:.2} m²")
    }

    pub fn length(&self, metres: f64) -> String {
        format!("{metres:.2} m")
    }
}

impl CurrencyFormatter for CliFormatters {
    fn format_amount(&self, amount: f64) -> String {
        self.money(amount)
    }
}
