use std::str::FromStr;

use chrono::NaiveDate;
use fractic_server_error::ServerError;
use serde::Deserialize;

use crate::errors::InvalidIsoDate;

/// Calendar date as written on statements and import files. Accepts
/// `YYYY-MM-DD`, `YYYY/MM/DD` and `YYYY.MM.DD`; a time component after `T`
/// or a space is ignored.
#[derive(Debug)]
pub(crate) struct ISODateModel(NaiveDate);
impl FromStr for ISODateModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let date_part = trimmed
            .split(|c| c == 'T' || c == ' ')
            .next()
            .unwrap_or(trimmed);
        let normalized = date_part.replace(['/', '.'], "-");
        let d = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
            .map_err(|e| InvalidIsoDate::with_debug(s, &e))?;
        Ok(ISODateModel(d))
    }
}
impl<'de> Deserialize<'de> for ISODateModel {
    fn deserialize<D>(deserializer: D) -> Result<ISODateModel, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ISODateModel::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<ISODateModel> for NaiveDate {
    fn from(value: ISODateModel) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<NaiveDate> {
        ISODateModel::from_str(s).ok().map(Into::into)
    }

    #[test]
    fn normalizes_separators() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 8);
        assert_eq!(parse("2026-01-08"), expected);
        assert_eq!(parse("2026/01/08"), expected);
        assert_eq!(parse("2026.01.08"), expected);
        assert_eq!(parse(" 2026/1/8 "), expected);
    }

    #[test]
    fn ignores_time_component() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 8);
        assert_eq!(parse("2026-01-08T09:30:00Z"), expected);
        assert_eq!(parse("2026/01/08 09:30"), expected);
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("08/01/2026"), None);
        assert_eq!(parse("2026-13-01"), None);
    }
}
