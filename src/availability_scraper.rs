use chrono::NaiveDate;
use log::error;
use scraper::Html;
use serde::Deserialize;

use crate::{error::ScrapeError, text_manipulators::find_first_with_attr};

/// Marker the booking site returns when a shop has no open slots.
pub const NO_FREE_APPOINTMENTS: &str = "Keine freien Termine";

const INTERVALS_ATTR: &str = "data-intervals";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct StepResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Intervals {
    dates: Vec<String>,
}

/// Parses the answer to the "shop selected" booking step.
///
/// Returns `Ok(None)` when the site reports no free appointments, and also
/// when the returned markup carries no `data-intervals` element at all. The
/// latter is logged, since it means the page changed shape rather than that
/// nothing is bookable. A malformed date inside the intervals is an error.
pub fn parse_availability_response(body: &str) -> Result<Option<Vec<NaiveDate>>, ScrapeError> {
    if body.contains(NO_FREE_APPOINTMENTS) {
        return Ok(None);
    }

    let response = serde_json::from_str::<StepResponse>(body).map_err(|source| {
        ScrapeError::Json {
            what: "availability response",
            source,
        }
    })?;

    let intervals = {
        let fragment = Html::parse_fragment(&response.content);
        let Some(node) = find_first_with_attr(fragment.root_element(), INTERVALS_ATTR) else {
            error!(
                "Unable to find node with {INTERVALS_ATTR} attribute in page.\n\n{}\n",
                response.content
            );
            return Ok(None);
        };
        node.value().attr(INTERVALS_ATTR).unwrap_or_default().to_string()
    };

    let intervals = serde_json::from_str::<Intervals>(&intervals).map_err(|source| {
        ScrapeError::Json {
            what: INTERVALS_ATTR,
            source,
        }
    })?;

    intervals
        .dates
        .into_iter()
        .map(|value| match NaiveDate::parse_from_str(&value, DATE_FORMAT) {
            Ok(date) => Ok(date),
            Err(source) => Err(ScrapeError::Date { value, source }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Mutex, Once};

    use super::*;
    use log::{Level, LevelFilter, Metadata, Record};
    use serde_json::json;

    static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

    struct CaptureLog;

    impl log::Log for CaptureLog {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Error
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                RECORDS
                    .lock()
                    .unwrap()
                    .push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLog = CaptureLog;

    fn capture_logs() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            log::set_logger(&CAPTURE).unwrap();
            log::set_max_level(LevelFilter::Error);
        });
    }

    pub(crate) fn step_response(content: &str) -> String {
        json!({ "content": content, "nav": "" }).to_string()
    }

    pub(crate) fn intervals_response(dates: &[&str]) -> String {
        let intervals = json!({ "dates": dates, "times": {} }).to_string();
        let content = format!(
            "<div class=\"sln-box\"><input type=\"hidden\" name=\"sln[date]\" data-intervals='{intervals}'></div>"
        );
        step_response(&content)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_free_appointments_is_not_an_error() {
        let body = step_response("<p>Keine freien Termine verfügbar</p>");
        assert_eq!(parse_availability_response(&body).unwrap(), None);
    }

    #[test]
    fn marker_is_checked_before_json() {
        assert_eq!(
            parse_availability_response("Keine freien Termine").unwrap(),
            None
        );
    }

    #[test]
    fn parses_interval_dates() {
        let body = intervals_response(&["2021-06-01", "2021-06-03"]);
        assert_eq!(
            parse_availability_response(&body).unwrap(),
            Some(vec![date(2021, 6, 1), date(2021, 6, 3)])
        );
    }

    #[test]
    fn entity_encoded_attribute_is_decoded() {
        let content = "<div data-intervals=\"{&quot;dates&quot;:[&quot;2021-07-12&quot;]}\"></div>";
        let body = step_response(content);
        assert_eq!(
            parse_availability_response(&body).unwrap(),
            Some(vec![date(2021, 7, 12)])
        );
    }

    #[test]
    fn missing_intervals_attribute_is_tolerated() {
        let body = step_response("<div class=\"sln-box\"><p>Bitte wählen</p></div>");
        assert_eq!(parse_availability_response(&body).unwrap(), None);
    }

    #[test]
    fn missing_intervals_attribute_is_logged_as_error() {
        capture_logs();
        let body = step_response("<div class=\"sln-box\"><p>Standort 4711</p></div>");
        assert_eq!(parse_availability_response(&body).unwrap(), None);

        let records = RECORDS.lock().unwrap();
        assert!(records.iter().any(|(level, message)| {
            *level == Level::Error
                && message.contains("data-intervals")
                && message.contains("Standort 4711")
        }));
    }

    #[test]
    fn malformed_date_is_an_error() {
        let body = intervals_response(&["2021-06-01", "01.06.2021"]);
        let err = parse_availability_response(&body).unwrap_err();
        assert!(err.is_parse());
        assert!(matches!(err, ScrapeError::Date { ref value, .. } if value == "01.06.2021"));
    }

    #[test]
    fn non_json_body_is_an_error() {
        let err = parse_availability_response("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ScrapeError::Json { what: "availability response", .. }));
    }
}
