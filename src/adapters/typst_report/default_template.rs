//! Built-in Typst report template.

/// The default template used when no custom `template_path` is configured.
pub fn template() -> &'static str {
    r#"#set page(paper: "a4", margin: 2cm)
#set text(size: 11pt)

= Backtest Report

{{HISTORY_NOTE}}

== Run

{{RUN_SUMMARY}}

== Results

{{METRICS_TABLE}}

== Price and Moving Averages

{{PRICE_CHART_SVG}}

== Portfolio Value

{{VALUE_CHART_SVG}}

== Trade Log

{{TRADE_LOG}}
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_carries_all_placeholders() {
        let t = template();
        for placeholder in [
            "{{HISTORY_NOTE}}",
            "{{RUN_SUMMARY}}",
            "{{METRICS_TABLE}}",
            "{{PRICE_CHART_SVG}}",
            "{{VALUE_CHART_SVG}}",
            "{{TRADE_LOG}}",
        ] {
            assert!(t.contains(placeholder), "missing {placeholder}");
        }
    }
}
