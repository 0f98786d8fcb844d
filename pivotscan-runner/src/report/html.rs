//! HTML report — the email body.
//!
//! Four sections: portfolio health, double-confirmed intersection, the
//! pattern scan, and the momentum scan. Styled with an inline stylesheet so
//! it renders the same in every mail client.

use crate::scan::{DriveRow, HealthRow, ScanReport, SetupRow};

const STYLE: &str = r#"
    <style>
        .title { background: #2c3e50; color: white; padding: 10px; margin-top: 20px; font-weight: bold; }
        .alert { background: #d9534f; }
        .table { border-collapse: collapse; width: 100%; font-family: sans-serif; margin-bottom: 20px; }
        .table th, .table td { border: 1px solid #ddd; padding: 10px; text-align: left; }
        .table th { background-color: #f8f9fa; }
        .leader { background-color: #fff3cd; font-weight: bold; }
    </style>
"#;

/// Render the full report as a standalone HTML document.
pub fn render_html(report: &ScanReport) -> String {
    let mut html = String::new();
    html.push_str("<html><head>");
    html.push_str(STYLE);
    html.push_str("</head><body>");
    html.push_str(&format!(
        "<h2>Daily stock strategy report — {}</h2>",
        report.date
    ));

    html.push_str("<div class='title'>Portfolio health check</div>");
    if report.health.is_empty() {
        html.push_str("<p>No holdings configured</p>");
    } else {
        html.push_str(&health_table(&report.health));
    }

    html.push_str("<div class='title alert'>Double-confirmed signals (pattern &amp; momentum)</div>");
    if report.intersection.is_empty() {
        html.push_str("<p>No double-confirmed signals today</p>");
    } else {
        html.push_str(&format!(
            "<p>{}</p>",
            escape(&report.intersection.join(", "))
        ));
    }

    html.push_str("<div class='title'>Pattern scan (flag / gap / VCP breakout)</div>");
    if report.chose.is_empty() {
        html.push_str("<p>No signals today</p>");
    } else {
        html.push_str(&setup_table(&report.chose));
    }

    html.push_str("<div class='title'>Momentum scan (accumulation / leaders)</div>");
    if report.drive.is_empty() {
        html.push_str("<p>No signals today</p>");
    } else {
        if !report.leaders.is_empty() {
            html.push_str(&format!(
                "<p>Leading industries: {}</p>",
                escape(&report.leaders.join(", "))
            ));
        }
        html.push_str(&drive_table(&report.drive));
    }

    if !report.errors.is_empty() {
        html.push_str("<div class='title'>Fetch failures</div>");
        html.push_str(&format!(
            "<p>{} tickers could not be evaluated</p>",
            report.errors.len()
        ));
    }

    html.push_str(&format!(
        "<p style='color:#999;font-size:11px'>run {}</p>",
        report.run_id
    ));
    html.push_str("</body></html>");
    html
}

fn health_table(rows: &[HealthRow]) -> String {
    let mut out = String::from(
        "<table class='table'><tr><th>Ticker</th><th>Price</th><th>Cost</th>\
         <th>Profit (R)</th><th>Action</th><th>Defense price</th><th>Diagnosis</th></tr>",
    );
    for row in rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.1}R</td>\
             <td>{}</td><td>{:.2}</td><td>{}</td></tr>",
            escape(&row.ticker),
            row.price,
            row.cost,
            row.r_multiple,
            escape(&row.action),
            row.defense_price,
            escape(&row.rationale),
        ));
    }
    out.push_str("</table>");
    out
}

fn setup_table(rows: &[SetupRow]) -> String {
    let mut out = String::from(
        "<table class='table'><tr><th>Ticker</th><th>Name</th><th>Price</th>\
         <th>Setup</th><th>RS</th><th>Pivot</th><th>Stop (7%)</th><th>Reason</th></tr>",
    );
    for row in rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{:.1}</td>\
             <td>{:.2}</td><td>{:.2}</td><td>{}</td></tr>",
            escape(&row.ticker),
            escape(&row.name),
            row.price,
            escape(&row.setup),
            row.relative_strength,
            row.pivot_price,
            row.stop_suggestion,
            escape(&row.rationale),
        ));
    }
    out.push_str("</table>");
    out
}

fn drive_table(rows: &[DriveRow]) -> String {
    let mut out = String::from(
        "<table class='table'><tr><th></th><th>Ticker</th><th>Name</th><th>Industry</th>\
         <th>Price</th><th>RS</th><th>Signal</th></tr>",
    );
    for row in rows {
        let class = if row.leader { " class='leader'" } else { "" };
        let mut signals = Vec::new();
        if let Some(setup) = &row.setup {
            signals.push(setup.clone());
        }
        if let Some(mvp) = &row.accumulation {
            signals.push(format!(
                "accumulation ({} up days, {:.1}x volume)",
                mvp.up_days, mvp.volume_ratio
            ));
        }
        out.push_str(&format!(
            "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td>\
             <td>{:.1}</td><td>{}</td></tr>",
            class,
            if row.leader { "★" } else { "" },
            escape(&row.ticker),
            escape(&row.name),
            escape(&row.industry),
            row.price,
            row.relative_strength,
            escape(&signals.join(" + ")),
        ));
    }
    out.push_str("</table>");
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
