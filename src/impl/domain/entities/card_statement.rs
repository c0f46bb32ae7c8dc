use chrono::NaiveDate;

/// Zero-based column positions of a card statement export.
#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(default)]
pub struct CardStatementLayout {
    pub date_column: usize,
    pub card_number_column: usize,
    pub last_name_column: usize,
    pub first_name_column: usize,
    pub employee_id_column: usize,
    pub merchant_column: usize,
    pub amount_column: usize,
    /// Rows with fewer columns are skipped outright.
    pub min_columns: usize,
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTransaction {
    /// `None` when the printed date is not a recognised calendar date. Such a
    /// row never counts as the same date as a recorded transaction.
    pub transaction_date: Option<NaiveDate>,
    /// Date exactly as printed on the statement.
    pub raw_date: String,
    pub amount: f64,
    pub merchant_name: String,
    pub card_number: String,
    pub account_holder_last_name: String,
    pub account_holder_first_name: String,
    pub employee_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooFewColumns { found: usize },
    MissingRequiredField,
}

#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the uploaded file.
    pub line: u64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardStatement {
    pub transactions: Vec<CardTransaction>,
    pub skipped: Vec<SkippedRow>,
}

impl CardTransaction {
    pub fn holder_name(&self) -> String {
        format!(
            "{} {}",
            self.account_holder_last_name, self.account_holder_first_name
        )
        .trim()
        .to_string()
    }
}

impl CardStatement {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
