//! Askama templates specific to the web adapter. The report page reuses
//! [`crate::adapters::html_report_adapter::ReportTemplate`].

use askama::Template;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub symbols: Vec<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_lists_symbols() {
        let html = DashboardTemplate {
            symbols: vec!["AAPL".into(), "MSFT".into()],
        }
        .render()
        .unwrap();
        assert!(html.contains("AAPL"));
        assert!(html.contains("/report/MSFT"));
    }

    #[test]
    fn dashboard_empty_state() {
        let html = DashboardTemplate { symbols: vec![] }.render().unwrap();
        assert!(html.contains("No stored symbols"));
    }

    #[test]
    fn error_template_shows_status() {
        let html = ErrorTemplate {
            message: "no stored data for ZZZZ".into(),
            status: 404,
        }
        .render()
        .unwrap();
        assert!(html.contains("Error 404"));
        assert!(html.contains("ZZZZ"));
    }
}
