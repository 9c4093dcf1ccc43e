use std::fmt::Write;

use crate::rating::runner::StrategyReport;

const RULE_WIDTH: usize = 60;

/// Renders the plain-text comparison table printed at the end of a batch run.
///
/// A consistency column is added when any report carries one.
pub fn render_comparison_table(reports: &[StrategyReport]) -> String {
    let with_consistency = reports.iter().any(|r| r.consistency.is_some());
    let width = if with_consistency {
        RULE_WIDTH + 14
    } else {
        RULE_WIDTH
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(width));
    let _ = writeln!(out, "COMPARISON TABLE");
    let _ = writeln!(out, "{}", "=".repeat(width));

    let _ = write!(
        out,
        "{:<25} {:<12} {:<15} {:<18}",
        "Approach", "Accuracy", "JSON Validity", "Valid Predictions"
    );
    if with_consistency {
        let _ = write!(out, " {:<12}", "Consistency");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(width));

    for report in reports {
        let result = &report.result;
        let _ = write!(
            out,
            "{:<25} {:<12} {:<15} {:<18}",
            result.approach_name,
            format!("{:.2}%", result.accuracy),
            format!("{:.2}%", result.json_validity_rate),
            result.valid_predictions_count,
        );
        if with_consistency {
            let cell = report
                .consistency
                .map(|c| format!("{c:.2}%"))
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(out, " {cell:<12}");
        }
        let _ = writeln!(out);
    }

    out
}
