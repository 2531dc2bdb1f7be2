use std::time::Duration;

use chrono::NaiveDate;
use log::{error, info, warn};

use crate::{
    model::{AvailabilityInfo, VaccineRound},
    plugin::{Plugin, VaccinationCenter},
};

/// Receives the results of a polling pass.
pub trait DataReceiver: Send {
    fn begin_polling(&mut self) {}

    fn on_vaccination_center(&mut self, _center: &dyn VaccinationCenter) {}

    fn on_availability_info_ready(
        &mut self,
        center: &dyn VaccinationCenter,
        vaccine_round: &VaccineRound,
        info: &AvailabilityInfo,
    );

    fn end_polling(&mut self) {}
}

/// Logs every availability it is told about.
#[derive(Debug, Default)]
pub struct LoggingReceiver;

impl DataReceiver for LoggingReceiver {
    fn on_availability_info_ready(
        &mut self,
        center: &dyn VaccinationCenter,
        vaccine_round: &VaccineRound,
        info: &AvailabilityInfo,
    ) {
        if info.dates.is_empty() {
            return;
        }
        info!(
            "Detected availability for {} at {} ({}): {}",
            vaccine_round,
            center.name(),
            center.url(),
            format_dates(&info.dates)
        );
    }
}

fn format_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    pub failed_plugins: usize,
    pub centers: usize,
    pub failed_checks: usize,
    pub availabilities: usize,
}

pub struct Poller {
    pub plugins: Vec<Box<dyn Plugin>>,
    pub receivers: Vec<Box<dyn DataReceiver>>,
    period: Duration,
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        Self {
            plugins: Vec::new(),
            receivers: Vec::new(),
            period,
        }
    }

    /// Discovers all centers and checks each of them once. Failing plugins
    /// and centers are logged and skipped.
    pub async fn poll_once(&mut self) -> PollReport {
        let mut report = PollReport::default();
        for receiver in &mut self.receivers {
            receiver.begin_polling();
        }

        let mut centers = Vec::new();
        for plugin in &self.plugins {
            info!("Polling vaccination centers for {}", plugin.name());
            match plugin.vaccination_centers().await {
                Ok(found) => centers.extend(found),
                Err(e) => {
                    error!(
                        "Failed to retrieve the vaccination centers provided via {}: {e}",
                        plugin.name()
                    );
                    report.failed_plugins += 1;
                }
            }
        }
        report.centers = centers.len();

        info!("Dispatching vaccination centers (count: {})", centers.len());
        for center in &centers {
            for receiver in &mut self.receivers {
                receiver.on_vaccination_center(center.as_ref());
            }
        }

        for center in &centers {
            info!("Checking availability of {}", center.uid());
            let availability = match center.check_availability().await {
                Ok(availability) => availability,
                Err(e) => {
                    warn!("Failed to check the availability of {}: {e}", center.uid());
                    report.failed_checks += 1;
                    continue;
                }
            };
            for (vaccine_round, info) in &availability {
                report.availabilities += 1;
                for receiver in &mut self.receivers {
                    receiver.on_availability_info_ready(center.as_ref(), vaccine_round, info);
                }
            }
        }

        for receiver in &mut self.receivers {
            receiver.end_polling();
        }
        report
    }

    pub async fn run(&mut self) {
        loop {
            let report = self.poll_once().await;
            info!(
                "Polling finished: {} centers, {} availabilities, {} failed checks, {} failed plugins",
                report.centers, report.availabilities, report.failed_checks, report.failed_plugins
            );
            tokio::time::sleep(self.period).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::availability_scraper::tests::{intervals_response, step_response};
    use crate::center_scraper::tests::booking_page_html;
    use crate::dachau_med::{BookingPageSource, DachauMedPlugin};
    use crate::model::VaccineType;
    use crate::requests::{Fetch, fake::FakeFetch};

    #[derive(Default)]
    struct Recorded {
        events: Vec<String>,
    }

    struct RecordingReceiver(Arc<Mutex<Recorded>>);

    impl DataReceiver for RecordingReceiver {
        fn begin_polling(&mut self) {
            self.0.lock().unwrap().events.push("begin".into());
        }

        fn on_vaccination_center(&mut self, center: &dyn VaccinationCenter) {
            self.0.lock().unwrap().events.push(format!("center {}", center.uid()));
        }

        fn on_availability_info_ready(
            &mut self,
            center: &dyn VaccinationCenter,
            vaccine_round: &VaccineRound,
            info: &AvailabilityInfo,
        ) {
            self.0.lock().unwrap().events.push(format!(
                "available {} {} {}",
                center.name(),
                vaccine_round,
                format_dates(&info.dates)
            ));
        }

        fn end_polling(&mut self) {
            self.0.lock().unwrap().events.push("end".into());
        }
    }

    #[tokio::test]
    async fn poll_once_dispatches_and_skips_failures() {
        let page = "https://booking.test/a/";
        let missing = "https://booking.test/missing/";
        let ajax_open = "https://booking.test/ajax-open";
        let ajax_closed = "https://booking.test/ajax-closed";
        let fetch = FakeFetch::default()
            .with_page(page, booking_page_html(ajax_open, "n1", &[("18", "Altstadt")]))
            .with_page(
                "https://booking.test/b/",
                booking_page_html(ajax_closed, "n2", &[("19", "Eching")]),
            )
            .with_ajax(ajax_open, intervals_response(&["2021-06-01"]))
            .with_ajax(ajax_closed, step_response("Keine freien Termine"));
        let client: Arc<dyn Fetch> = Arc::new(fetch);

        let mut poller = Poller::new(Duration::from_secs(1));
        poller.plugins.push(Box::new(DachauMedPlugin::with_pages(
            client.clone(),
            vec![
                BookingPageSource::new(page, VaccineType::Biontech, Some(1)),
                BookingPageSource::new("https://booking.test/b/", VaccineType::Biontech, Some(2)),
            ],
        )));
        poller.plugins.push(Box::new(DachauMedPlugin::with_pages(
            client,
            vec![BookingPageSource::new(missing, VaccineType::AstraZeneca, Some(2))],
        )));
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        poller.receivers.push(Box::new(RecordingReceiver(recorded.clone())));
        poller.receivers.push(Box::new(LoggingReceiver));

        let report = poller.poll_once().await;
        assert_eq!(
            report,
            PollReport {
                failed_plugins: 1,
                centers: 2,
                failed_checks: 0,
                availabilities: 1,
            }
        );
        assert_eq!(
            recorded.lock().unwrap().events,
            vec![
                "begin".to_string(),
                "center impfbot::dachau_med:Biontech:18".to_string(),
                "center impfbot::dachau_med:Biontech:19".to_string(),
                "available Altstadt BioNTech (dose 1) 2021-06-01".to_string(),
                "end".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failing_check_is_counted_not_raised() {
        let page = "https://booking.test/a/";
        let fetch = FakeFetch::default()
            .with_page(page, booking_page_html("https://booking.test/gone", "n", &[("18", "A")]));
        let mut poller = Poller::new(Duration::from_secs(1));
        poller.plugins.push(Box::new(DachauMedPlugin::with_pages(
            Arc::new(fetch),
            vec![BookingPageSource::new(page, VaccineType::JohnsonAndJohnson, None)],
        )));

        let report = poller.poll_once().await;
        assert_eq!(report.centers, 1);
        assert_eq!(report.failed_checks, 1);
        assert_eq!(report.availabilities, 0);
    }
}
