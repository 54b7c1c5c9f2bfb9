use anyhow::Result;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::TransactionKind;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Negative,
    Success,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Negative => style(text).red().bold(),
        StyleType::Success => style(text).green(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Amount with two decimals and the currency code, e.g. `-12.50 EUR`.
/// Anything that rounds to zero prints as `0.00`, never `-0.00`.
pub fn format_money(amount: f64, currency: &str) -> String {
    let cents = (amount * 100.0).round() / 100.0 + 0.0;
    format!("{cents:.2} {currency}")
}

/// Styles a total green when non-negative, red otherwise.
pub fn style_total(amount: f64, currency: &str) -> String {
    let text = format_money(amount, currency);
    if amount >= 0.0 {
        style_text(&text, StyleType::TotalValue)
    } else {
        style_text(&text, StyleType::Negative)
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned money cell, red for negative values.
pub fn money_cell(amount: f64, currency: &str) -> Cell {
    let cell = Cell::new(format_money(amount, currency)).set_alignment(CellAlignment::Right);
    if amount < 0.0 { cell.fg(Color::Red) } else { cell }
}

/// Money cell colored by what the transaction does to the user's funds.
pub fn kind_money_cell(amount: f64, currency: &str, kind: TransactionKind) -> Cell {
    let cell = Cell::new(format_money(amount, currency)).set_alignment(CellAlignment::Right);
    match kind {
        TransactionKind::Income => cell.fg(Color::Green),
        TransactionKind::Expense => cell.fg(Color::Red),
        TransactionKind::Transfer => cell.fg(Color::Blue),
    }
}

pub fn kind_cell(kind: TransactionKind) -> Cell {
    let color = match kind {
        TransactionKind::Income => Color::Green,
        TransactionKind::Expense => Color::Red,
        TransactionKind::Transfer => Color::Blue,
    };
    Cell::new(kind.to_string()).fg(color)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(Cell::new("N/A").fg(Color::DarkGrey), |v| {
        Cell::new(format_fn(v))
    })
}

/// Spinner shown on stderr while requests are in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Blocking yes/no prompt. Anything but `y`/`yes` declines, as does a
/// non-interactive terminal.
pub fn confirm(prompt: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{prompt} [y/N] "))?;
    let answer = term.read_line()?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Reads a password without echo.
pub fn prompt_password(prompt: &str) -> Result<String> {
    let term = Term::stderr();
    term.write_str(&format!("{prompt}: "))?;
    Ok(term.read_secure_line()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234.5, "USD"), "1234.50 USD");
        assert_eq!(format_money(-0.004, "EUR"), "0.00 EUR");
        assert_eq!(format_money(-0.0, "USD"), "0.00 USD");
        assert_eq!(format_money(-0.005, "USD"), "-0.01 USD");
        assert_eq!(format_money(0.0, "VND"), "0.00 VND");
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_style_total_keeps_text() {
        assert!(style_total(-5.0, "USD").contains("-5.00 USD"));
        assert!(style_total(5.0, "USD").contains("5.00 USD"));
    }
}
