//! Bank statement field extraction.
//!
//! The bank name is a best-effort field. Statements rarely label it, so
//! the fallback is the letterhead line at the top of the page, which OCR
//! noise can corrupt. Callers should treat `bank_name` as approximate.

use crate::models::document::{BankStatementFields, StatementPeriod};

use super::dates::is_calendar_date;
use super::mask::mask_digits;
use super::patterns::{ACCOUNT_NUMBER, BANK_NAME_LABEL, DATE_DMY};
use super::transactions::parse_transactions;

/// Extracts account metadata and the transaction table from bank
/// statement text.
#[derive(Debug, Clone)]
pub struct StatementExtractor {
    validate_dates: bool,
}

impl StatementExtractor {
    /// Create an extractor with statement-period date validation enabled.
    pub fn new() -> Self {
        Self {
            validate_dates: true,
        }
    }

    /// Toggle calendar validation of statement-period dates.
    pub fn with_date_validation(mut self, validate: bool) -> Self {
        self.validate_dates = validate;
        self
    }

    /// Extract every bank statement field the text supports. Fields that
    /// cannot be found are left as `None`; the transaction list is empty
    /// rather than absent.
    pub fn extract(&self, text: &str) -> BankStatementFields {
        let (account_number, account_number_masked) = self.extract_account(text);

        BankStatementFields {
            bank_name: self.extract_bank_name(text),
            account_number,
            account_number_masked,
            statement_period: self.extract_period(text),
            transactions: parse_transactions(text),
        }
    }

    /// Prefer an explicit `BANK NAME:` label, then fall back to the
    /// letterhead line. Lines without a single letter (rules, dates,
    /// separators) are skipped.
    fn extract_bank_name(&self, text: &str) -> Option<String> {
        if let Some(caps) = BANK_NAME_LABEL.captures(text) {
            let value = caps[1].trim();
            if !value.is_empty() {
                return Some(title_case(value));
            }
        }

        text.lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && line.chars().any(|c| c.is_alphabetic()))
            .map(title_case)
    }

    /// Account numbers appear behind several label spellings and may be
    /// partially masked already (`XXXX1234`). The unmasked field keeps
    /// only the digits that survived; both fields are `None` when no
    /// digit did.
    fn extract_account(&self, text: &str) -> (Option<String>, Option<String>) {
        let Some(caps) = ACCOUNT_NUMBER.captures(text) else {
            return (None, None);
        };

        let digits: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return (None, None);
        }

        let masked = mask_digits(&digits);
        (Some(digits), Some(masked))
    }

    /// The statement period is the first pair of dates sharing a line,
    /// with lines mentioning `PERIOD` tried first.
    fn extract_period(&self, text: &str) -> Option<StatementPeriod> {
        let labelled = text
            .lines()
            .filter(|line| line.to_uppercase().contains("PERIOD"))
            .find_map(|line| self.date_pair(line));

        labelled.or_else(|| text.lines().find_map(|line| self.date_pair(line)))
    }

    fn date_pair(&self, line: &str) -> Option<StatementPeriod> {
        let mut dates = DATE_DMY
            .find_iter(line)
            .map(|m| m.as_str())
            .filter(|d| !self.validate_dates || is_calendar_date(d));

        let from = dates.next()?.to_string();
        let to = dates.next()?.to_string();
        Some(StatementPeriod { from, to })
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract bank statement fields with default settings.
pub fn extract_statement(text: &str) -> BankStatementFields {
    StatementExtractor::new().extract(text)
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "STATE BANK OF INDIA\n\
                             STATEMENT OF ACCOUNT\n\
                             ACCOUNT NUMBER: 000111222333\n\
                             STATEMENT PERIOD: 01/01/2023 TO 31/01/2023\n\
                             01/01/2023 GROCERY STORE 500.00 4500.00\n\
                             02/01/2023 SALARY JAN 50,000.00 CR 54,500.00";

    #[test]
    fn test_full_statement() {
        let fields = extract_statement(STATEMENT);
        assert_eq!(fields.bank_name.as_deref(), Some("State Bank Of India"));
        assert_eq!(fields.account_number.as_deref(), Some("000111222333"));
        assert_eq!(fields.account_number_masked.as_deref(), Some("********2333"));
        let period = fields.statement_period.as_ref().unwrap();
        assert_eq!(period.from, "01/01/2023");
        assert_eq!(period.to, "31/01/2023");
        assert_eq!(fields.transactions.len(), 2);
    }

    #[test]
    fn test_account_line_only() {
        let text = "ACCOUNT NUMBER: 000111222333\n01/01/2023 GROCERY STORE 500.00 4500.00";
        let fields = extract_statement(text);
        assert_eq!(fields.account_number.as_deref(), Some("000111222333"));
        assert_eq!(fields.transactions.len(), 1);
        assert_eq!(fields.transactions[0].date, "01/01/2023");
        assert_eq!(fields.transactions[0].amount, "500.00");
        assert_eq!(fields.transactions[0].balance, "4500.00");
    }

    #[test]
    fn test_labelled_bank_name_wins() {
        let text = "SOME NOISY HEADER\nBANK NAME: HDFC BANK\nACCOUNT NUMBER: 1234567890";
        let fields = extract_statement(text);
        assert_eq!(fields.bank_name.as_deref(), Some("Hdfc Bank"));
    }

    #[test]
    fn test_partially_masked_account() {
        let fields = extract_statement("A/C NO: XXXXXX4321");
        assert_eq!(fields.account_number.as_deref(), Some("4321"));
        assert_eq!(fields.account_number_masked.as_deref(), Some("4321"));
    }

    #[test]
    fn test_period_prefers_labelled_line() {
        let text = "TRANSFER ON 05/01/2023 VALUE 06/01/2023\n\
                    PERIOD 01/01/2023 - 31/01/2023";
        let period = extract_statement(text).statement_period.unwrap();
        assert_eq!(period.from, "01/01/2023");
        assert_eq!(period.to, "31/01/2023");
    }

    #[test]
    fn test_period_requires_shared_line() {
        let text = "FROM 01/01/2023\nTO 31/01/2023";
        assert!(extract_statement(text).statement_period.is_none());
    }

    #[test]
    fn test_invalid_period_dates_skipped() {
        let text = "PERIOD 99/99/2023 - 88/88/2023\nRANGE 01/01/2023 - 31/01/2023";
        let period = extract_statement(text).statement_period.unwrap();
        assert_eq!(period.from, "01/01/2023");

        let relaxed = StatementExtractor::new()
            .with_date_validation(false)
            .extract(text);
        assert_eq!(relaxed.statement_period.unwrap().from, "99/99/2023");
    }

    #[test]
    fn test_empty_text() {
        let fields = extract_statement("");
        assert!(fields.is_empty());
        assert!(fields.transactions.is_empty());
    }
}
