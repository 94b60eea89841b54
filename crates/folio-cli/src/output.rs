use std::fmt::Write as _;

use folio_core::{format_money, Holding, SessionState, TableRow, ViewModel, TABLE_HEADERS};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Summary deltas above this are flagged in table output.
const CONSISTENCY_TOLERANCE: f64 = 0.01;

pub fn render_view(view: &ViewModel, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(view)?
            } else {
                serde_json::to_string(view)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => print!("{}", format_view(view)),
    }
    Ok(())
}

pub fn format_view(view: &ViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Portfolio Summary");
    for line in view.summary.lines() {
        let _ = writeln!(out, "  {line}");
    }

    let consistency = view.consistency();
    if !consistency.is_within(CONSISTENCY_TOLERANCE) {
        let _ = writeln!(
            out,
            "  note: summary differs from holdings (value {:+.2}, cost {:+.2}, gain/loss {:+.2})",
            consistency.market_value_delta,
            consistency.cost_basis_delta,
            consistency.gain_loss_delta
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Allocation");
    if view.chart.is_empty() {
        let _ = writeln!(out, "  (no valued holdings)");
    } else {
        let total = view.chart.total();
        for (label, value) in view.chart.slices() {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            let _ = writeln!(out, "  {label:<8} {:>14} {share:>6.1}%", format_money(value));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Holdings");
    out.push_str(&format_rows(&view.rows));
    out
}

fn format_rows(rows: &[TableRow]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();

    let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.len()).collect();
    for (row, row_cells) in rows.iter().zip(&cells) {
        let measured = if row.is_failed() { 1 } else { row_cells.len() };
        for (width, cell) in widths.iter_mut().zip(row_cells.iter().take(measured)) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);

    for (row, row_cells) in rows.iter().zip(&cells) {
        if row.is_failed() {
            let _ = writeln!(
                out,
                "  {:<width$}  error: {}",
                row_cells[0],
                row_cells[1],
                width = widths[0]
            );
        } else {
            push_line(&mut out, row_cells, &widths);
        }
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::from(" ");
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        line.push(' ');
        if index == 0 {
            let _ = write!(line, "{cell:<width$}");
        } else {
            let _ = write!(line, "{cell:>width$}");
        }
        line.push(' ');
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn format_state(state: &SessionState) -> String {
    match state {
        SessionState::Idle => String::from("idle: no analysis yet"),
        SessionState::Loading => String::from("loading: analyzing..."),
        SessionState::Succeeded(result) => format!(
            "succeeded: {} holding(s), {} failed",
            result.holdings.len(),
            result.failed_count()
        ),
        SessionState::Failed(message) => format!("failed: {message}"),
    }
}

pub fn format_holdings(holdings: &[Holding]) -> String {
    if holdings.is_empty() {
        return String::from("  No holdings added yet.\n");
    }
    let mut out = String::new();
    for (index, holding) in holdings.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{index}] {} shares of {} @ ${}",
            holding.quantity, holding.ticker, holding.cost_basis
        );
    }
    out
}
