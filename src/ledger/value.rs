//! Monetary values and the currencies categories are kept in.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::BudgetError;

/// Exact, signed monetary amount. Expenditures are negative, income positive.
pub type Value = Decimal;

/// Currencies a category budget can be denominated in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Chf,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Eur,
        Currency::Usd,
        Currency::Gbp,
        Currency::Chf,
        Currency::Jpy,
    ];

    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Chf => "CHF",
            Currency::Jpy => "JPY",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
            Currency::Chf => "CHF",
            Currency::Jpy => "¥",
        }
    }

    /// Renders `value` rounded to two decimals with this currency's symbol.
    pub fn format(self, value: Value) -> String {
        let rounded = value.round_dp(2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{} {:.2}", self.symbol(), rounded.abs())
        } else {
            format!("{} {:.2}", self.symbol(), rounded.abs())
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = BudgetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| BudgetError::invalid(format!("unknown currency `{code}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Value {
        raw.parse().unwrap()
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" Eur ".parse::<Currency>().unwrap(), Currency::Eur);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn formats_negative_values_with_sign_before_symbol() {
        assert_eq!(Currency::Eur.format(dec("-35.5")), "-€ 35.50");
        assert_eq!(Currency::Usd.format(dec("64.499")), "$ 64.50");
    }

    #[test]
    fn serializes_as_upper_case_code() {
        let json = serde_json::to_string(&Currency::Gbp).unwrap();
        assert_eq!(json, "\"GBP\"");
    }
}
