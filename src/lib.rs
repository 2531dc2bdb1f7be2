mod error;
mod model;

mod availability_scraper;
mod center_scraper;
mod config;
mod dachau_med;
mod logging;
mod plugin;
mod poller;
mod requests;
mod text_manipulators;

pub use availability_scraper::{NO_FREE_APPOINTMENTS, parse_availability_response};
pub use center_scraper::{BookingPage, SalonConfig, Shop, parse_booking_page};
pub use config::{
    Config, DEFAULT_ADMIN_CHAT_ID, DEFAULT_CHECK_PERIOD, DEFAULT_DATABASE_SPEC, DEFAULT_LOG_FORMAT,
};
pub use dachau_med::{BookingPageSource, DachauMedCenter, DachauMedPlugin, default_pages, discover};
pub use error::{ConfigError, ScrapeError};
pub use logging::{init_logging, render_log_line};
pub use model::{
    Availability, AvailabilityInfo, VaccinationCenterInfo, VaccineRound, VaccineType,
};
pub use plugin::{Plugin, VaccinationCenter, all_plugins};
pub use poller::{DataReceiver, LoggingReceiver, PollReport, Poller};
pub use requests::{Fetch, RequestClient};
