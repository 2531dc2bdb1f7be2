//! Appointment slots at the Dachau vaccination centers, booked through
//! https://termin.dachau-med.de.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::{
    availability_scraper::parse_availability_response,
    center_scraper::parse_booking_page,
    error::ScrapeError,
    model::{Availability, AvailabilityInfo, VaccineRound, VaccineType},
    plugin::{Plugin, VaccinationCenter},
    requests::Fetch,
};

pub const JNJ_URL: &str = "https://termin.dachau-med.de/impfungen02/";
pub const ASTRA_2_URL: &str = "https://termin.dachau-med.de/impfungen01/";
pub const BIONTECH_1_URL: &str = "https://termin.dachau-med.de/impfungen03/";
pub const BIONTECH_2_URL: &str = "https://termin.dachau-med.de/impfung/";

const LOCATION: &str = "Germany, Bavaria, Landkreis Dachau";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPageSource {
    pub url: String,
    pub vaccine_round: VaccineRound,
}

impl BookingPageSource {
    pub fn new(url: impl Into<String>, vaccine_type: VaccineType, round: Option<u8>) -> Self {
        Self {
            url: url.into(),
            vaccine_round: VaccineRound::new(vaccine_type, round),
        }
    }
}

/// The booking pages polled by default, in result order.
pub fn default_pages() -> Vec<BookingPageSource> {
    vec![
        BookingPageSource::new(JNJ_URL, VaccineType::JohnsonAndJohnson, None),
        BookingPageSource::new(ASTRA_2_URL, VaccineType::AstraZeneca, Some(2)),
        BookingPageSource::new(BIONTECH_1_URL, VaccineType::Biontech, Some(1)),
        BookingPageSource::new(BIONTECH_2_URL, VaccineType::Biontech, Some(2)),
    ]
}

pub struct DachauMedPlugin {
    client: Arc<dyn Fetch>,
    pages: Vec<BookingPageSource>,
}

impl DachauMedPlugin {
    pub fn new(client: Arc<dyn Fetch>) -> Self {
        Self::with_pages(client, default_pages())
    }

    pub fn with_pages(client: Arc<dyn Fetch>, pages: Vec<BookingPageSource>) -> Self {
        Self { client, pages }
    }

    /// Discovers every page in order and concatenates the results.
    pub async fn get_vaccination_centers(&self) -> Result<Vec<DachauMedCenter>, ScrapeError> {
        let mut centers = Vec::new();
        for page in &self.pages {
            centers.extend(discover(&self.client, &page.url, page.vaccine_round).await?);
        }
        Ok(centers)
    }
}

#[async_trait]
impl Plugin for DachauMedPlugin {
    fn name(&self) -> &str {
        "dachau-med"
    }

    async fn vaccination_centers(&self) -> Result<Vec<Box<dyn VaccinationCenter>>, ScrapeError> {
        let centers = self.get_vaccination_centers().await?;
        Ok(centers
            .into_iter()
            .map(|center| Box::new(center) as Box<dyn VaccinationCenter>)
            .collect())
    }
}

/// Fetches one booking page and returns a center per listed shop.
pub async fn discover(
    client: &Arc<dyn Fetch>,
    url: &str,
    vaccine_round: VaccineRound,
) -> Result<Vec<DachauMedCenter>, ScrapeError> {
    let html = client.get_text(url).await?;
    let page = parse_booking_page(&html)?;
    info!("Found {} shops for {} at {}", page.shops.len(), vaccine_round, url);

    Ok(page
        .shops
        .into_iter()
        .map(|shop| DachauMedCenter {
            vaccine_round,
            name: shop.name,
            shop_id: shop.id,
            url: url.to_string(),
            ajax_url: page.salon.ajax_url.clone(),
            ajax_nonce: page.salon.ajax_nonce.clone(),
            client: Arc::clone(client),
        })
        .collect())
}

pub struct DachauMedCenter {
    pub vaccine_round: VaccineRound,
    pub name: String,
    pub shop_id: String,
    pub url: String,
    pub ajax_url: String,
    pub ajax_nonce: String,
    client: Arc<dyn Fetch>,
}

impl fmt::Debug for DachauMedCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DachauMedCenter")
            .field("vaccine_round", &self.vaccine_round)
            .field("name", &self.name)
            .field("shop_id", &self.shop_id)
            .field("url", &self.url)
            .field("ajax_url", &self.ajax_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VaccinationCenter for DachauMedCenter {
    fn uid(&self) -> String {
        format!(
            "{}:{}:{}",
            module_path!(),
            self.vaccine_round.vaccine_type.name(),
            self.shop_id
        )
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> &str {
        LOCATION
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn check_availability(&self) -> Result<Availability, ScrapeError> {
        let fields = [
            ("sln[shop]", self.shop_id.as_str()),
            ("sln_step_page", "shop"),
            ("submit_shop", "next"),
            ("action", "salon"),
            ("method", "salonStep"),
            ("security", self.ajax_nonce.as_str()),
        ];
        let body = self.client.post_form(&self.ajax_url, &fields).await?;

        let mut availability = Availability::new();
        match parse_availability_response(&body)? {
            Some(dates) => {
                availability.insert(
                    self.vaccine_round,
                    AvailabilityInfo {
                        dates,
                        not_available_until: None,
                    },
                );
            }
            None => debug!("No free appointments at {} ({})", self.name, self.vaccine_round),
        }
        Ok(availability)
    }
}
