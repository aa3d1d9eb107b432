//! Endpoint URL construction for the HTTP market source.

use taroko_types::{FetchWindow, timestamp};

/// Default base URL of the data service gateway.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8787";

/// Builds the kbars query URL for one instrument's fetch window.
///
/// URL format: `{base}/v1/kbars/{code}?start=YYYY-MM-DD&end=YYYY-MM-DD`.
/// Both dates are inclusive on the source side.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use taroko_fetch::url::kbars_url;
/// use taroko_types::FetchWindow;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let url = kbars_url("http://127.0.0.1:8787", "2330", &FetchWindow::new(start, end));
/// assert_eq!(url, "http://127.0.0.1:8787/v1/kbars/2330?start=2024-01-05&end=2024-03-01");
/// ```
#[must_use]
pub fn kbars_url(base: &str, code: &str, window: &FetchWindow) -> String {
    format!(
        "{}/v1/kbars/{}?start={}&end={}",
        base.trim_end_matches('/'),
        code,
        window.start_date().format(timestamp::DATE_FORMAT),
        window.end_date().format(timestamp::DATE_FORMAT),
    )
}

/// Builds the cumulative-usage query URL.
#[must_use]
pub fn usage_url(base: &str) -> String {
    format!("{}/v1/usage", base.trim_end_matches('/'))
}

/// Builds the catalog listing URL.
#[must_use]
pub fn instruments_url(base: &str) -> String {
    format!("{}/v1/instruments", base.trim_end_matches('/'))
}

/// Builds the session logout URL.
#[must_use]
pub fn logout_url(base: &str) -> String {
    format!("{}/v1/logout", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> FetchWindow {
        let start = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        FetchWindow::new(start, end)
    }

    #[test]
    fn test_kbars_url_drops_intraday_anchor() {
        let url = kbars_url(DEFAULT_BASE_URL, "2330", &window());
        assert_eq!(
            url,
            "http://127.0.0.1:8787/v1/kbars/2330?start=2024-01-05&end=2024-03-01"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let url = kbars_url("https://md.example.tw/", "0050", &window());
        assert_eq!(
            url,
            "https://md.example.tw/v1/kbars/0050?start=2024-01-05&end=2024-03-01"
        );
    }

    #[test]
    fn test_bookkeeping_urls() {
        assert_eq!(usage_url("http://h:1/"), "http://h:1/v1/usage");
        assert_eq!(instruments_url("http://h:1"), "http://h:1/v1/instruments");
        assert_eq!(logout_url("http://h:1"), "http://h:1/v1/logout");
    }
}
