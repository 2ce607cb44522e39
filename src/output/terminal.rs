//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{BoundReport, MonteCarloEstimate, ProbabilityBound};

/// Format a bound report for human-readable terminal output.
///
/// Uses ANSI colors and Unicode box drawing. An inconclusive bound is shown
/// in yellow with a note, never as a number.
pub fn format_report(report: &BoundReport) -> String {
    let header = match report.bound {
        ProbabilityBound::Certified(_) => format!(
            "{} {}",
            "\u{2713}".green().bold(),
            "BOUND CERTIFIED".green().bold()
        ),
        ProbabilityBound::Inconclusive => format!(
            "{} {}",
            "\u{26A0}".yellow().bold(),
            "INCONCLUSIVE".yellow().bold()
        ),
    };

    let bound_line = match report.bound {
        ProbabilityBound::Certified(p) => {
            let text = format!("P(violation) <= {:.2}%", p * 100.0);
            if p > 0.5 {
                text.red().to_string()
            } else if p > 0.1 {
                text.yellow().to_string()
            } else {
                text.green().to_string()
            }
        }
        ProbabilityBound::Inconclusive => "P(violation): no bound".yellow().to_string(),
    };

    let mut panel = Panel::default();
    panel.line(header).rule().line(bound_line).rule();
    panel
        .line("Moments of p:".bold().to_string())
        .line(format!("  E[p]:   {:.6}", report.first_moment))
        .line(format!("  E[p^2]: {:.6}", report.second_moment))
        .line(format!("  Var[p]: {:.6}", report.variance))
        .line(format!(
            "Monomials: {} first, {} second",
            report.n_first_terms, report.n_second_terms
        ));

    let mut output = panel.render();
    if !report.bound.is_certified() {
        output.push_str(&format!(
            "\n{}\n",
            "Note: E[p] <= 0, so the moments cannot bound the violation probability."
                .dimmed()
                .italic()
        ));
    }

    output
}

/// Format a Monte Carlo estimate for terminal output.
pub fn format_monte_carlo(estimate: &MonteCarloEstimate) -> String {
    let mut panel = Panel::default();
    panel
        .line("Monte Carlo".bold().to_string())
        .rule()
        .line(format!(
            "Violation Frequency: {:.2}% (\u{00B1}{:.2}%)",
            estimate.probability * 100.0,
            estimate.standard_error() * 100.0
        ))
        .line(format!(
            "Violations: {} of {}",
            estimate.violations, estimate.samples
        ));
    if estimate.early_stopped {
        panel.line("Stopped early: time budget exceeded".yellow().to_string());
    }

    let mut output = panel.render();
    output.push_str(&format!(
        "\n{}\n",
        "Note: Monte Carlo frequencies are estimates and certify nothing."
            .dimmed()
            .italic()
    ));

    output
}

// Box drawing

/// Narrowest interior width of a panel.
const MIN_WIDTH: usize = 40;

enum Row {
    Text(String),
    Rule,
}

/// Rows collected first so the box can be sized to its widest line.
#[derive(Default)]
struct Panel {
    rows: Vec<Row>,
}

impl Panel {
    fn line(&mut self, content: impl Into<String>) -> &mut Self {
        self.rows.push(Row::Text(content.into()));
        self
    }

    fn rule(&mut self) -> &mut Self {
        self.rows.push(Row::Rule);
        self
    }

    /// Interior width: widest visible line plus one space either side.
    fn width(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| match row {
                Row::Text(text) => Some(visible_width(text) + 2),
                Row::Rule => None,
            })
            .fold(MIN_WIDTH, usize::max)
    }

    fn render(&self) -> String {
        let width = self.width();
        let horizontal = "\u{2500}".repeat(width);

        let mut output = format!("\u{250C}{horizontal}\u{2510}\n");
        for row in &self.rows {
            match row {
                Row::Text(text) => {
                    let padding = width - 2 - visible_width(text);
                    output.push_str(&format!(
                        "\u{2502} {text}{} \u{2502}\n",
                        " ".repeat(padding)
                    ));
                }
                Row::Rule => output.push_str(&format!("\u{251C}{horizontal}\u{2524}\n")),
            }
        }
        output.push_str(&format!("\u{2514}{horizontal}\u{2518}\n"));
        output
    }
}

/// Number of characters a terminal shows for `s`, skipping ANSI SGR
/// sequences (`ESC ... m`).
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (false, _) => width += 1,
            (true, 'm') => in_escape = false,
            (true, _) => {}
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report(bound: ProbabilityBound) -> BoundReport {
        BoundReport {
            first_moment: 1.25,
            second_moment: 2.0,
            variance: 0.4375,
            bound,
            n_first_terms: 4,
            n_second_terms: 10,
        }
    }

    #[test]
    fn test_format_certified_report() {
        let output = format_report(&make_report(ProbabilityBound::Certified(0.21875)));
        assert!(output.contains("BOUND CERTIFIED"));
        assert!(output.contains("21.88%"));
        assert!(output.contains("1.250000"));
        assert!(output.contains("4 first, 10 second"));
        assert!(!output.contains("Note:"));
    }

    #[test]
    fn test_format_inconclusive_report() {
        let output = format_report(&make_report(ProbabilityBound::Inconclusive));
        assert!(output.contains("INCONCLUSIVE"));
        assert!(output.contains("no bound"));
        assert!(output.contains("E[p] <= 0"));
    }

    #[test]
    fn test_format_monte_carlo() {
        let output = format_monte_carlo(&MonteCarloEstimate::new(25, 100, true));
        assert!(output.contains("25.00%"));
        assert!(output.contains("25 of 100"));
        assert!(output.contains("time budget"));
    }

    fn box_widths(output: &str) -> Vec<usize> {
        output
            .lines()
            .take_while(|line| !line.is_empty())
            .map(visible_width)
            .collect()
    }

    #[test]
    fn test_box_lines_have_equal_width() {
        colored::control::set_override(true);
        let output = format_report(&make_report(ProbabilityBound::Certified(0.5)));
        colored::control::unset_override();
        let widths = box_widths(&output);
        assert!(widths.iter().all(|&w| w == MIN_WIDTH + 2), "{widths:?}");
    }

    #[test]
    fn test_box_grows_with_content() {
        let report = BoundReport {
            first_moment: 123_456_789_012_345_678.0,
            second_moment: 1e40,
            ..make_report(ProbabilityBound::Certified(0.1))
        };
        let output = format_report(&report);
        let widths = box_widths(&output);
        assert!(widths[0] > MIN_WIDTH + 2);
        assert!(widths.iter().all(|&w| w == widths[0]), "{widths:?}");
    }

    #[test]
    fn test_visible_width_skips_escapes() {
        assert_eq!(visible_width("\x1b[32mgreen\x1b[0m"), 5);
        assert_eq!(visible_width("\x1b[1;33m\u{26A0} ok\x1b[0m"), 4);
        assert_eq!(visible_width("plain"), 5);
    }
}
