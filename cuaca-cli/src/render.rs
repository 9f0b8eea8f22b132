//! Plain-text rendering of predictions and dataset summaries.

use cuaca_core::{PredictionResult, ReferenceDataset, Session};
use std::fmt::Write;

const BAR_CELL: char = '█';

/// A probability as a percentage with two decimals, e.g. `52.50%`.
pub fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// A bar of `width * probability` cells, rounded to the nearest cell.
pub fn bar(probability: f64, width: usize) -> String {
    let filled = if probability.is_finite() {
        (probability.clamp(0.0, 1.0) * width as f64).round() as usize
    } else {
        0
    };
    std::iter::repeat_n(BAR_CELL, filled).collect()
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "missing".to_string()
    } else {
        value.to_string()
    }
}

/// The full prediction block shown after each submission.
pub fn prediction(result: &PredictionResult, bar_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Prediction: {}", result.display_label);
    let _ = writeln!(out);

    if result.probabilities_available {
        let label_width = result
            .class_labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        for (label, p) in result.pairs() {
            let _ = writeln!(
                out,
                "  {label:<label_width$}  {:<bar_width$}  {:>7}",
                bar(p, bar_width),
                percent(p)
            );
        }
        if let Some(top) = result.top_probability() {
            let _ = writeln!(out);
            let _ = writeln!(out, "  Highest probability: {}", percent(top));
        }
    } else {
        let _ = writeln!(out, "  Class probabilities are not available for this model.");
    }

    if !result.imputed.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Filled in automatically:");
        for feature in &result.imputed {
            let _ = writeln!(
                out,
                "    {} = {} ({})",
                feature.name,
                format_value(feature.value),
                feature.source
            );
        }
    }
    out
}

/// The first `rows` rows of a dataset as an aligned table.
pub fn preview(dataset: &ReferenceDataset, rows: usize) -> String {
    let head = dataset.head(rows);
    let mut widths: Vec<usize> = dataset.columns().iter().map(|c| c.chars().count()).collect();
    for row in head {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: &[String]| -> String {
        widths
            .iter()
            .enumerate()
            .map(|(i, &w)| format!("{:<w$}", cells.get(i).map(String::as_str).unwrap_or("")))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "  {}", line(dataset.columns()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "  {}", rule.join("-+-"));
    for row in head {
        let _ = writeln!(out, "  {}", line(row));
    }
    let _ = writeln!(
        out,
        "  ({} of {} rows)",
        head.len(),
        dataset.row_count()
    );
    out
}

/// Model, dataset and input-default summary.
pub fn info(session: &Session) -> String {
    let model = session.model();
    let caps = model.capabilities();
    let info = session.dataset().info();
    let defaults = session.input_defaults();
    let inputs = session.inputs();

    let mut out = String::new();
    let _ = writeln!(out, "  Model: {}", model.kind());
    let _ = writeln!(out, "    features: {}", model.feature_spec().names().join(", "));
    let _ = writeln!(
        out,
        "    probabilities: {}",
        if caps.probabilities { "yes" } else { "no" }
    );
    if let Some(classes) = model.classes() {
        let labels: Vec<String> = classes
            .iter()
            .map(|c| cuaca_core::pretty_label(c, session.labels()))
            .collect();
        let _ = writeln!(out, "    classes: {}", labels.join(", "));
    }
    let _ = writeln!(out, "  Dataset: {}", info.location);
    let _ = writeln!(
        out,
        "    {} rows, {} columns, loaded {}",
        info.row_count,
        info.column_count,
        info.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "  Defaults:");
    let _ = writeln!(out, "    {} = {}", inputs.temperature_column, defaults.temperature);
    let _ = writeln!(out, "    {} = {}", inputs.humidity_column, defaults.humidity);
    out
}
