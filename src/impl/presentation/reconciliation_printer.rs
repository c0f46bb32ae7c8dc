use super::utils::{fit, format_yen};
use crate::entities::{MismatchKind, ReconciliationReport, SkipReason};

pub(crate) struct ReconciliationPrinter;

impl ReconciliationPrinter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn print_report(&self, report: &ReconciliationReport) -> String {
        let mut output = String::new();

        output.push_str(
            "; --- Summary ------------------------------------------------------------------\n\n",
        );
        self.print_summary(&mut output, report);
        output.push_str("\n\n");

        output.push_str(
            "; --- Mismatches ---------------------------------------------------------------\n\n",
        );
        self.print_mismatches(&mut output, report);

        if !report.skipped_rows.is_empty() {
            output.push_str("\n\n");
            output.push_str(
                "; --- Skipped rows -------------------------------------------------------------\n\n",
            );
            self.print_skipped(&mut output, report);
        }

        output
    }

    fn print_summary(&self, output: &mut String, report: &ReconciliationReport) {
        let lines = [
            ("examined", report.examined),
            ("matched", report.matched),
            (
                MismatchKind::NotRegistered.as_str(),
                report.count(MismatchKind::NotRegistered),
            ),
            (
                MismatchKind::DateMismatch.as_str(),
                report.count(MismatchKind::DateMismatch),
            ),
            (
                MismatchKind::AmountMismatch.as_str(),
                report.count(MismatchKind::AmountMismatch),
            ),
            ("notifications", report.notifications_created),
            ("skipped", report.skipped_rows.len()),
        ];
        for (label, count) in lines {
            output.push_str(&format!("{}{:>6}\n", fit(label, 18), count));
        }
        if !report.unresolved_employee_ids.is_empty() {
            output.push_str(&format!(
                "unresolved employee ids: {}\n",
                report.unresolved_employee_ids.join(", ")
            ));
        }
    }

    fn print_mismatches(&self, output: &mut String, report: &ReconciliationReport) {
        if report.is_clean() {
            output.push_str("(none)\n");
            return;
        }
        for m in &report.mismatches {
            let card = &m.card_transaction;
            output.push_str(&format!(
                "{} {} {} {:>14}  {} [{}]\n",
                fit(m.kind.label(), 6),
                fit(&card.raw_date, 10),
                fit(&card.merchant_name, 24),
                format_yen(card.amount),
                card.employee_id,
                card.holder_name(),
            ));
            if let Some(tx) = &m.system_transaction {
                output.push_str(&format!(
                    "    recorded: {} {} {:>14}  ({})\n",
                    tx.transaction_date.format("%Y/%m/%d"),
                    fit(&tx.merchant_name, 24),
                    format_yen(tx.amount),
                    tx.id,
                ));
            }
        }
    }

    fn print_skipped(&self, output: &mut String, report: &ReconciliationReport) {
        for row in &report.skipped_rows {
            let reason = match &row.reason {
                SkipReason::TooFewColumns { found } => format!("too few columns ({found})"),
                SkipReason::MissingRequiredField => "missing date, amount or merchant".to_string(),
            };
            output.push_str(&format!("line {:>5}: {}\n", row.line, reason));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::entities::{CardTransaction, Mismatch, SkippedRow};

    #[test]
    fn prints_summary_and_rows() {
        let report = ReconciliationReport {
            examined: 3,
            matched: 1,
            mismatches: vec![Mismatch {
                kind: MismatchKind::NotRegistered,
                card_transaction: CardTransaction {
                    transaction_date: NaiveDate::from_ymd_opt(2026, 1, 8),
                    raw_date: "2026/01/08".into(),
                    amount: 12345.0,
                    merchant_name: "ABC Store".into(),
                    card_number: "1234".into(),
                    account_holder_last_name: "Yamada".into(),
                    account_holder_first_name: "Taro".into(),
                    employee_id: "E1001".into(),
                },
                system_transaction: None,
            }],
            notifications_created: 1,
            unresolved_employee_ids: vec![],
            skipped_rows: vec![SkippedRow {
                line: 4,
                reason: SkipReason::TooFewColumns { found: 3 },
            }],
        };
        let text = ReconciliationPrinter::new().print_report(&report);
        assert!(text.contains("examined               3"));
        assert!(text.contains("not_registered         1"));
        assert!(text.contains("未登録"));
        assert!(text.contains("12,345"));
        assert!(text.contains("E1001 [Yamada Taro]"));
        assert!(text.contains("line     4: too few columns (3)"));
        assert!(!text.contains("unresolved"));
    }

    #[test]
    fn clean_report_says_none() {
        let text = ReconciliationPrinter::new().print_report(&ReconciliationReport::default());
        assert!(text.contains("(none)"));
        assert!(!text.contains("Skipped rows"));
    }
}
