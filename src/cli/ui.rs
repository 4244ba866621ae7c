use crate::core::model::{Account, major_units};
use crate::core::orchestrator::{Disposition, FEATURE_COMING_SOON, RunReport};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
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

/// Formats minor units as a major-unit amount, e.g. `0.65 GBP`.
pub fn format_amount(minor_units: u64, currency: &str) -> String {
    format!("{:.2} {}", major_units(minor_units), currency)
}

/// Numbered table of accounts for selection.
pub fn accounts_table(accounts: &[Account]) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Currency"),
    ]);
    for (i, account) in accounts.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(&account.name),
            Cell::new(account.account_type),
            Cell::new(&account.currency),
        ]);
    }
    table
}

pub fn display_welcome() {
    println!(
        "{}",
        style_text("Welcome to the Financial RoundUp Service", StyleType::Title)
    );
}

pub fn display_report(report: &RunReport) {
    let currency = &report.account.currency;
    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Round-up"), header_cell("")]);
    table.add_row(vec![Cell::new("Account"), Cell::new(&report.account.name)]);
    table.add_row(vec![
        Cell::new("Window"),
        Cell::new(format!("{} to {}", report.start_date, report.end_date)),
    ]);
    table.add_row(vec![
        Cell::new("Transactions"),
        Cell::new(report.transactions_considered).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Round-up (minor units)"),
        Cell::new(report.round_up_minor_units).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Round-up").add_attribute(Attribute::Bold),
        Cell::new(format_amount(report.round_up_minor_units, currency))
            .add_attribute(Attribute::Bold)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right),
    ]);
    println!("{table}");

    let outcome = match &report.disposition {
        Disposition::Funded { goal } => format!(
            "Saved {} into new goal {}",
            format_amount(report.round_up_minor_units, currency),
            goal
        ),
        Disposition::CreatedUnfunded { goal } => {
            format!("Created goal {goal}; nothing to round up this time")
        }
        Disposition::ExistingGoalUnavailable => FEATURE_COMING_SOON.to_string(),
    };
    println!(
        "{} {}",
        style_text("Result:", StyleType::TotalLabel),
        style_text(&outcome, StyleType::TotalValue)
    );
}
