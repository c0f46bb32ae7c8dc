use std::{fs, str::FromStr as _};

use fractic_server_error::ServerError;

use crate::{
    data::models::{iso_date_model::ISODateModel, yen_amount_model::YenAmountModel},
    entities::ImportRow,
    errors::{InvalidCsv, InvalidCsvContent, ReadError},
};

const MIN_COLUMNS: usize = 4;

/// Reads bulk transaction imports: `date,amount,merchant,memo` with a
/// header row.
pub(crate) trait TransactionsCsvDatasource {
    fn from_string(&self, s: &str) -> Result<Vec<ImportRow>, ServerError>;

    fn from_file<P>(&self, path: P) -> Result<Vec<ImportRow>, ServerError>
    where
        P: AsRef<std::path::Path>;
}

pub(crate) struct TransactionsCsvDatasourceImpl;

impl TransactionsCsvDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl TransactionsCsvDatasource for TransactionsCsvDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<Vec<ImportRow>, ServerError> {
        let s = s.strip_prefix('\u{feff}').unwrap_or(s);
        csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(s.as_bytes())
            .records()
            .filter_map(|r| match r {
                Ok(r) if r.len() < MIN_COLUMNS => {
                    tracing::warn!(columns = r.len(), "import row with too few columns skipped");
                    None
                }
                other => Some(other),
            })
            .map(|r| {
                r.map_err(|e| InvalidCsv::with_debug(&e)).and_then(|r| {
                    let line = r.position().map_or(0, |p| p.line());

                    // Extract from CSV record.
                    let raw_date = r.get(0).unwrap_or("");
                    let raw_amount = r.get(1).unwrap_or("");
                    let raw_merchant = r.get(2).unwrap_or("");
                    let raw_memo = r.get(3).unwrap_or("");

                    // Parse.
                    let transaction_date = ISODateModel::from_str(raw_date)
                        .map_err(|e| {
                            InvalidCsvContent::with_debug(&format!("line {line}: bad date"), &e)
                        })?
                        .into();
                    let amount: f64 = YenAmountModel::from_str(raw_amount)
                        .map_err(|e| {
                            InvalidCsvContent::with_debug(&format!("line {line}: bad amount"), &e)
                        })?
                        .into();
                    if amount <= 0.0 {
                        return Err(InvalidCsvContent::new(&format!(
                            "line {line}: amount must be positive"
                        )));
                    }
                    if raw_merchant.is_empty() {
                        return Err(InvalidCsvContent::new(&format!(
                            "line {line}: merchant name is required"
                        )));
                    }

                    // Build.
                    Ok(ImportRow {
                        line,
                        transaction_date,
                        amount,
                        merchant_name: raw_merchant.to_string(),
                        memo: Some(raw_memo.to_string()).filter(|m| !m.is_empty()),
                    })
                })
            })
            .collect()
    }

    fn from_file<P>(&self, path: P) -> Result<Vec<ImportRow>, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        self.from_string(&fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_rows_after_header() {
        let text = "取引日,金額,加盟店名,メモ\n\
                    2026-01-08,5000,セブンイレブン,朝食\n\
                    2026-01-08,3000,ローソン,\n";

        let rows = TransactionsCsvDatasourceImpl::new().from_string(text).unwrap();

        assert_eq!(
            rows,
            vec![
                ImportRow {
                    line: 2,
                    transaction_date: NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
                    amount: 5000.0,
                    merchant_name: "セブンイレブン".into(),
                    memo: Some("朝食".into()),
                },
                ImportRow {
                    line: 3,
                    transaction_date: NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
                    amount: 3000.0,
                    merchant_name: "ローソン".into(),
                    memo: None,
                },
            ]
        );
    }

    #[test]
    fn short_rows_are_skipped() {
        let text = "date,amount,merchant,memo\n2026-01-08,5000\n2026-01-09,100,Shop,x\n";
        let rows = TransactionsCsvDatasourceImpl::new().from_string(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].merchant_name, "Shop");
    }

    #[test]
    fn invalid_rows_fail_the_import() {
        let ds = TransactionsCsvDatasourceImpl::new();
        assert!(ds.from_string("h,h,h,h\nnot-a-date,100,Shop,\n").is_err());
        assert!(ds.from_string("h,h,h,h\n2026-01-08,abc,Shop,\n").is_err());
        assert!(ds.from_string("h,h,h,h\n2026-01-08,0,Shop,\n").is_err());
        assert!(ds.from_string("h,h,h,h\n2026-01-08,100,,\n").is_err());
    }
}
