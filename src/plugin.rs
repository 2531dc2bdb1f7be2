use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    dachau_med::DachauMedPlugin,
    error::ScrapeError,
    model::{Availability, VaccinationCenterInfo},
    requests::Fetch,
};

/// One bookable location for one vaccine round.
#[async_trait]
pub trait VaccinationCenter: Send + Sync {
    /// Stable across discovery runs for the same location.
    fn uid(&self) -> String;
    fn name(&self) -> &str;
    fn location(&self) -> &str;
    fn url(&self) -> &str;

    fn metadata(&self) -> VaccinationCenterInfo {
        VaccinationCenterInfo {
            uid: self.uid(),
            name: self.name().to_string(),
            url: self.url().to_string(),
            location: self.location().to_string(),
        }
    }

    async fn check_availability(&self) -> Result<Availability, ScrapeError>;
}

/// A source of vaccination centers, usually one booking website.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    async fn vaccination_centers(&self) -> Result<Vec<Box<dyn VaccinationCenter>>, ScrapeError>;
}

pub fn all_plugins(client: Arc<dyn Fetch>) -> Vec<Box<dyn Plugin>> {
    vec![Box::new(DachauMedPlugin::new(client))]
}
