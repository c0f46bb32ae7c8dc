use std::{str::FromStr, sync::LazyLock};

use fractic_server_error::ServerError;
use regex::Regex;

use crate::errors::InvalidYenAmount;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]").expect("hardcoded regex should be valid"));

/// Yen amount as printed on a card statement (`¥12,345`, `12345円`, ...).
/// Everything except digits, `.` and `-` is discarded before parsing.
#[derive(Debug)]
pub(crate) struct YenAmountModel(pub f64);
impl FromStr for YenAmountModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numeric_part = NON_NUMERIC.replace_all(s, "");
        let amount = numeric_part
            .parse::<f64>()
            .map_err(|_| InvalidYenAmount::new(s))?;
        if !amount.is_finite() {
            return Err(InvalidYenAmount::new(s));
        }
        Ok(YenAmountModel(amount))
    }
}

impl YenAmountModel {
    /// Amount typed into a form: full-width digits are accepted and every
    /// non-digit (separators, currency marks) is dropped.
    pub(crate) fn from_form_input(s: &str) -> Result<Self, ServerError> {
        let digits: String = s
            .chars()
            .filter_map(|c| match c {
                '０'..='９' => char::from_u32(c as u32 - 0xFEE0),
                '0'..='9' => Some(c),
                _ => None,
            })
            .collect();
        let amount = digits
            .parse::<u64>()
            .map_err(|_| InvalidYenAmount::new(s))?;
        Ok(YenAmountModel(amount as f64))
    }
}

impl From<YenAmountModel> for f64 {
    fn from(value: YenAmountModel) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_marks_and_separators() {
        assert_eq!(YenAmountModel::from_str("¥12,345").unwrap().0, 12345.0);
        assert_eq!(YenAmountModel::from_str("12345円").unwrap().0, 12345.0);
        assert_eq!(YenAmountModel::from_str(" -500 ").unwrap().0, -500.0);
        assert_eq!(YenAmountModel::from_str("1,234.5").unwrap().0, 1234.5);
    }

    #[test]
    fn rejects_text_without_digits() {
        assert!(YenAmountModel::from_str("").is_err());
        assert!(YenAmountModel::from_str("n/a").is_err());
    }

    #[test]
    fn form_input_accepts_full_width_digits() {
        assert_eq!(YenAmountModel::from_form_input("１２，３４５").unwrap().0, 12345.0);
        assert_eq!(YenAmountModel::from_form_input("5,000").unwrap().0, 5000.0);
        assert!(YenAmountModel::from_form_input("abc").is_err());
    }
}
