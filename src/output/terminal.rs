//! Terminal output formatting with colors.

use colored::Colorize;

use crate::result::{ComparisonResult, EffectMagnitude, GroupSummary};

/// Format a comparison result for human-readable terminal output.
pub fn format_result(result: &ComparisonResult, title: &str) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str(&format!("epibreak \u{2014} {}\n", title));
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    output.push_str(&format!(
        "  Column: {}   Cutoff: {}\n",
        result.metadata.value_column, result.metadata.cutoff
    ));
    output.push_str(&format!(
        "  Pre:  {}\n",
        format_group(&result.pre)
    ));
    output.push_str(&format!(
        "  Post: {}\n",
        format_group(&result.post)
    ));
    output.push('\n');

    if result.is_insufficient() {
        output.push_str(&format!(
            "  {}\n\n",
            "\u{26A0} Too few observations on one side of the cutoff"
                .yellow()
                .bold()
        ));
        output.push_str(&sep);
        output.push('\n');
        output.push_str("Note: statistics are withheld below 3 observations per group.\n");
        return output;
    }

    if let Some(p) = result.rank_sum_p {
        output.push_str(&format!(
            "  Rank-sum p (pre > post): {}\n",
            format_p_value(p)
        ));
    }
    if let Some(p) = result.variance_p {
        output.push_str(&format!(
            "  Variance homogeneity p:  {}\n",
            format_p_value(p)
        ));
    }

    if let Some(effect) = &result.effect {
        output.push_str(&format!(
            "  Effect: r = {:+.3} [{}] (95% CI {:+.3} to {:+.3})\n",
            effect.r,
            format_magnitude(effect.magnitude()),
            effect.interval.0,
            effect.interval.1
        ));
    }

    output.push('\n');
    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Bootstrap: {} iterations, seed {} \u{00b7} runtime {:.2}s\n",
        result.metadata.bootstrap_iterations,
        result.metadata.bootstrap_seed,
        result.metadata.runtime_secs
    ));

    output
}

fn format_group(group: &GroupSummary) -> String {
    match (group.mean, group.cv) {
        (Some(mean), Some(cv)) => format!(
            "n = {:<4} mean = {:<10.2} cv = {:.3}",
            group.len, mean, cv
        ),
        _ => format!("n = {}", group.len),
    }
}

fn format_p_value(p: f64) -> String {
    let text = format!("{:.4}", p);
    if p < 0.01 {
        text.red().bold().to_string()
    } else if p < 0.05 {
        text.yellow().to_string()
    } else {
        text.normal().to_string()
    }
}

fn format_magnitude(magnitude: EffectMagnitude) -> &'static str {
    match magnitude {
        EffectMagnitude::Negligible => "negligible",
        EffectMagnitude::Small => "small",
        EffectMagnitude::Medium => "medium",
        EffectMagnitude::Large => "large",
    }
}
