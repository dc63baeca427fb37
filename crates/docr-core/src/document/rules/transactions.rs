//! Transaction-line parsing for bank statements.

use crate::models::document::{Transaction, TransactionKind};

use super::patterns::TRANSACTION_LINE;

/// Parse every transaction line in the text, in source order.
///
/// A line either matches the transaction grammar or is skipped; this has
/// no error path, only inclusion per line. Empty input yields an empty
/// list.
pub fn parse_transactions(text: &str) -> Vec<Transaction> {
    text.lines().filter_map(parse_line).collect()
}

/// Parse a single line. `None` means "not a transaction line".
pub fn parse_line(line: &str) -> Option<Transaction> {
    let caps = TRANSACTION_LINE.captures(line.trim())?;

    Some(Transaction {
        date: caps[1].to_string(),
        description: caps[2].trim().to_string(),
        amount: caps[3].to_string(),
        kind: caps
            .get(4)
            .and_then(|tag| TransactionKind::from_token(tag.as_str())),
        balance: caps[5].to_string(),
    })
}
