//! Typst-based PDF report generation.
//!
//! Reads a Typst template (the built-in default or a custom file), resolves
//! all `{{PLACEHOLDER}}` markers from a [`ReportContext`], and writes the
//! final `.typ` file ready for `typst compile`.

pub mod default_template;
pub mod tables;

use std::fs;
use std::path::Path;

use crate::adapters::chart_svg;
use crate::domain::error::FincrossError;
use crate::domain::metrics::BacktestResult;
use crate::domain::series::IndicatorSeries;
use crate::ports::report_port::ReportPort;

/// Context for resolving template placeholders.
pub struct ReportContext<'a> {
    pub result: &'a BacktestResult,
    pub series: &'a IndicatorSeries,
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup.
pub fn resolve(template: &str, ctx: &ReportContext) -> String {
    let mut output = template.to_string();

    output = output.replace(
        "{{RUN_SUMMARY}}",
        &tables::render_run_summary(ctx.result),
    );
    output = output.replace(
        "{{METRICS_TABLE}}",
        &tables::render_metrics_table(ctx.result),
    );

    let price_svg = chart_svg::render_price_chart(ctx.series, &ctx.result.trade_log);
    output = output.replace("{{PRICE_CHART_SVG}}", &embed_svg(&price_svg, "price data"));

    let value_svg = chart_svg::render_value_chart(&ctx.result.value_path);
    output = output.replace("{{VALUE_CHART_SVG}}", &embed_svg(&value_svg, "value data"));

    output = output.replace(
        "{{TRADE_LOG}}",
        &tables::render_trade_log(&ctx.result.trade_log),
    );

    let history_note = if ctx.result.insufficient_history {
        "_Available history is shorter than the 200-day window; the sell \
         signal never activates._"
            .to_string()
    } else {
        String::new()
    };
    output = output.replace("{{HISTORY_NOTE}}", &history_note);

    output
}

/// Wrap an SVG string in a Typst `image.decode` call, escaping for the
/// enclosing string literal.
fn embed_svg(svg: &str, what: &str) -> String {
    if svg.is_empty() {
        return format!("_No {what}._");
    }
    format!(
        "#image.decode(\n\"{}\",\n  width: 100%,\n)",
        svg.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

/// Report adapter producing a `.typ` document, optionally from a custom
/// template.
pub struct TypstReportAdapter {
    template: Option<String>,
}

impl TypstReportAdapter {
    pub fn new() -> Self {
        Self { template: None }
    }

    pub fn with_template(template: String) -> Self {
        Self {
            template: Some(template),
        }
    }
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        series: &IndicatorSeries,
        output_path: &str,
    ) -> Result<(), FincrossError> {
        let template = self
            .template
            .as_deref()
            .unwrap_or_else(|| default_template::template());

        let ctx = ReportContext { result, series };
        let content = resolve(template, &ctx);

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(FincrossError::Io)?;
            }
        }
        fs::write(path, content).map_err(FincrossError::Io)?;

        Ok(())
    }
}
