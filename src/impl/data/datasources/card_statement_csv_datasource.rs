use std::{fs, str::FromStr as _};

use csv::StringRecord;
use fractic_server_error::ServerError;

use crate::{
    data::models::{iso_date_model::ISODateModel, yen_amount_model::YenAmountModel},
    entities::{CardStatement, CardStatementLayout, CardTransaction, SkipReason, SkippedRow},
    errors::{InvalidCsv, ReadError},
};

pub(crate) trait CardStatementCsvDatasource {
    fn from_string(&self, s: &str) -> Result<CardStatement, ServerError>;

    fn from_file<P>(&self, path: P) -> Result<CardStatement, ServerError>
    where
        P: AsRef<std::path::Path>;
}

pub(crate) struct CardStatementCsvDatasourceImpl {
    layout: CardStatementLayout,
}

impl CardStatementCsvDatasourceImpl {
    pub(crate) fn new(layout: CardStatementLayout) -> Self {
        Self { layout }
    }

    fn parse_record(&self, r: &StringRecord) -> Result<CardTransaction, SkipReason> {
        if r.len() < self.layout.min_columns {
            return Err(SkipReason::TooFewColumns { found: r.len() });
        }

        // Extract from CSV record.
        let raw_date = r.get(self.layout.date_column).unwrap_or("");
        let raw_amount = r.get(self.layout.amount_column).unwrap_or("");
        let raw_merchant = r.get(self.layout.merchant_column).unwrap_or("");
        let raw_card_number = r.get(self.layout.card_number_column).unwrap_or("");
        let raw_last_name = r.get(self.layout.last_name_column).unwrap_or("");
        let raw_first_name = r.get(self.layout.first_name_column).unwrap_or("");
        let raw_employee_id = r.get(self.layout.employee_id_column).unwrap_or("");

        // Zero and unparsable amounts both count as missing.
        let amount = YenAmountModel::from_str(raw_amount)
            .map(f64::from)
            .ok()
            .filter(|a| *a != 0.0);
        let amount = match amount {
            Some(a) if !raw_date.is_empty() && !raw_merchant.is_empty() => a,
            _ => return Err(SkipReason::MissingRequiredField),
        };
        let transaction_date = ISODateModel::from_str(raw_date).ok().map(Into::into);

        // Build.
        Ok(CardTransaction {
            transaction_date,
            raw_date: raw_date.to_string(),
            amount,
            merchant_name: raw_merchant.to_string(),
            card_number: raw_card_number.to_string(),
            account_holder_last_name: raw_last_name.to_string(),
            account_holder_first_name: raw_first_name.to_string(),
            employee_id: raw_employee_id.to_string(),
        })
    }
}

/// Tab-separated if the first data row contains a tab, otherwise
/// comma-separated. The header decides only when there are no data rows.
fn sniff_delimiter(s: &str) -> u8 {
    let mut lines = s.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next();
    match lines.next().or(header) {
        Some(line) if line.contains('\t') => b'\t',
        _ => b',',
    }
}

impl CardStatementCsvDatasource for CardStatementCsvDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<CardStatement, ServerError> {
        let s = s.strip_prefix('\u{feff}').unwrap_or(s);
        let delimiter = sniff_delimiter(s);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quoting(delimiter == b',')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(s.as_bytes());

        let mut statement = CardStatement::default();
        for r in reader.records() {
            let r = r.map_err(|e| InvalidCsv::with_debug(&e))?;
            let line = r.position().map_or(0, |p| p.line());
            match self.parse_record(&r) {
                Ok(tx) => statement.transactions.push(tx),
                Err(reason) => {
                    tracing::warn!(line, ?reason, "card statement row skipped");
                    statement.skipped.push(SkippedRow { line, reason });
                }
            }
        }
        tracing::debug!(
            rows = statement.transactions.len(),
            skipped = statement.skipped.len(),
            delimiter = %(delimiter as char).escape_default(),
            "card statement parsed"
        );
        Ok(statement)
    }

    fn from_file<P>(&self, path: P) -> Result<CardStatement, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        self.from_string(&fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?)
    }
}
