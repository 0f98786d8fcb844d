//! Markdown report — the console rendering of a scan.

use crate::scan::ScanReport;

/// Render the scan report as markdown.
pub fn render_markdown(report: &ScanReport) -> String {
    let mut out = format!(
        "# Daily Scan Report — {}\n\nRun ID: `{}`\n",
        report.date, report.run_id
    );

    out.push_str("\n## Portfolio Health\n\n");
    if report.health.is_empty() {
        out.push_str("No holdings configured.\n");
    } else {
        out.push_str("| Ticker | Price | Cost | R | Action | Defense | Diagnosis |\n");
        out.push_str("|--------|-------|------|---|--------|---------|-----------|\n");
        for row in &report.health {
            out.push_str(&format!(
                "| {} | {:.2} | {:.2} | {:.1}R | {} | {:.2} | {} |\n",
                row.ticker,
                row.price,
                row.cost,
                row.r_multiple,
                row.action,
                row.defense_price,
                row.rationale
            ));
        }
    }

    out.push_str("\n## Double-Confirmed Signals\n\n");
    if report.intersection.is_empty() {
        out.push_str("None today.\n");
    } else {
        for ticker in &report.intersection {
            out.push_str(&format!("- {ticker}\n"));
        }
    }

    out.push_str("\n## Pattern Scan\n\n");
    if report.chose.is_empty() {
        out.push_str("No signals today.\n");
    } else {
        out.push_str("| Ticker | Name | Price | Setup | RS | Pivot | Stop | Reason |\n");
        out.push_str("|--------|------|-------|-------|----|-------|------|--------|\n");
        for row in &report.chose {
            out.push_str(&format!(
                "| {} | {} | {:.2} | {} | {:.1} | {:.2} | {:.2} | {} |\n",
                row.ticker,
                row.name,
                row.price,
                row.setup,
                row.relative_strength,
                row.pivot_price,
                row.stop_suggestion,
                row.rationale
            ));
        }
    }

    out.push_str("\n## Momentum Scan\n\n");
    if report.drive.is_empty() {
        out.push_str("No signals today.\n");
    } else {
        if !report.leaders.is_empty() {
            out.push_str(&format!(
                "Leading industries: {}\n\n",
                report.leaders.join(", ")
            ));
        }
        out.push_str("| | Ticker | Name | Industry | Price | RS | Signal |\n");
        out.push_str("|-|--------|------|----------|-------|----|--------|\n");
        for row in &report.drive {
            let mut signals = Vec::new();
            if let Some(setup) = &row.setup {
                signals.push(setup.clone());
            }
            if let Some(mvp) = &row.accumulation {
                signals.push(format!("accumulation ({} up days)", mvp.up_days));
            }
            out.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} | {:.1} | {} |\n",
                if row.leader { "★" } else { "" },
                row.ticker,
                row.name,
                row.industry,
                row.price,
                row.relative_strength,
                signals.join(" + ")
            ));
        }
    }

    if !report.errors.is_empty() {
        out.push_str(&format!(
            "\n{} tickers failed to fetch and were skipped.\n",
            report.errors.len()
        ));
    }

    out
}
