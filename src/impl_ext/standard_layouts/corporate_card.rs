use crate::entities::CardStatementLayout;

/// Column layout of the corporate card company's monthly usage export
/// (zero-based): usage date in column 2, card number in 3, holder name in
/// 7/8, employee number in 9, merchant in 12 and the yen amount in 36.
pub fn corporate_card_layout() -> CardStatementLayout {
    CardStatementLayout {
        date_column: 2,
        card_number_column: 3,
        last_name_column: 7,
        first_name_column: 8,
        employee_id_column: 9,
        merchant_column: 12,
        amount_column: 36,
        min_columns: 10,
    }
}

impl Default for CardStatementLayout {
    fn default() -> Self {
        corporate_card_layout()
    }
}
