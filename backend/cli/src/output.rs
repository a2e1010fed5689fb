//! Terminal rendering for query reports.

use crate::query_cmd::QueryReport;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false)
}

fn paint(style: &str, text: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Two-column `field  value` listing followed by warnings and errors.
pub fn render_report(report: &QueryReport) -> String {
    render_with(report, supports_color())
}

fn render_with(report: &QueryReport, color: bool) -> String {
    let mut rows: Vec<(String, String)> = vec![
        ("query".into(), report.query.clone()),
        ("window".into(), report.window_id.clone()),
    ];
    if let Some(id) = &report.element_id {
        rows.push(("element".into(), id.clone()));
    }
    if let Some([left, top, right, bottom]) = report.bounds {
        rows.push(("bounds".into(), format!("{left},{top} → {right},{bottom}")));
    }
    if let Some(background) = &report.background {
        rows.push(("background".into(), background.clone()));
    }
    for property in &report.properties {
        rows.push((
            format!(".{}", property.name),
            format!("{} ({})", property.value, property.value_type),
        ));
    }

    let width = rows.iter().map(|(field, _)| field.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (field, value) in &rows {
        let padded = format!("{field:<width$}");
        out.push_str(&format!("  {}  {value}\n", paint(BOLD, &padded, color)));
    }
    for warning in &report.warnings {
        out.push_str(&format!("{} {warning}\n", paint(YELLOW, "warn:", color)));
    }
    for error in &report.errors {
        out.push_str(&format!("{} {error}\n", paint(RED, "error:", color)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_cmd::PropertyLine;

    #[test]
    fn renders_aligned_fields() {
        let report = QueryReport {
            query: "~First".into(),
            window_id: "w".into(),
            element_id: Some("e".into()),
            background: Some("#FFFFFFFF".into()),
            properties: vec![PropertyLine {
                name: "Width".into(),
                value: "50".into(),
                value_type: "Double".into(),
            }],
            ..Default::default()
        };
        let text = render_with(&report, false);
        assert!(text.contains("  query       ~First\n"));
        assert!(text.contains("  .Width      50 (Double)\n"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn lists_errors_last() {
        let report = QueryReport {
            errors: vec!["Failed to find element named 'X'".into()],
            ..Default::default()
        };
        let text = render_with(&report, false);
        assert!(text.ends_with("error: Failed to find element named 'X'\n"));
    }
}
