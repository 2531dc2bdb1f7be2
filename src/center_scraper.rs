use scraper::Html;
use serde::Deserialize;

use crate::{
    error::ScrapeError,
    text_manipulators::{assigned_value, extract_text, selector},
};

const STEP_FORM: &str = "form#salon-step-attendant";
const SHOP_LIST: &str = "div.sln-shop-list";
const SHOP_OPTION: &str = "option";
const SALON_EXTRA_SCRIPT: &str = "script#salon-js-extra";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    pub id: String,
    pub name: String,
}

/// Booking-flow settings the page hands to its client-side script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SalonConfig {
    pub ajax_url: String,
    pub ajax_nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPage {
    pub shops: Vec<Shop>,
    pub salon: SalonConfig,
}

pub fn parse_booking_page(html: &str) -> Result<BookingPage, ScrapeError> {
    let document = Html::parse_document(html);

    if document.select(&selector(STEP_FORM)?).next().is_none() {
        return Err(ScrapeError::parse(format!("{STEP_FORM} not found")));
    }

    let Some(shop_list) = document.select(&selector(SHOP_LIST)?).next() else {
        return Err(ScrapeError::parse(format!("{SHOP_LIST} not found")));
    };
    let option_selector = selector(SHOP_OPTION)?;
    let shops = shop_list
        .select(&option_selector)
        .map(|option| {
            let id = option
                .value()
                .attr("value")
                .ok_or_else(|| ScrapeError::parse("shop option without a value attribute"))?;
            Ok(Shop {
                id: id.to_string(),
                name: extract_text(option),
            })
        })
        .collect::<Result<Vec<_>, ScrapeError>>()?;

    let Some(script) = document.select(&selector(SALON_EXTRA_SCRIPT)?).next() else {
        return Err(ScrapeError::parse(format!("{SALON_EXTRA_SCRIPT} not found")));
    };
    let script_text = script.text().collect::<String>();
    let payload = assigned_value(&script_text)
        .ok_or_else(|| ScrapeError::parse(format!("{SALON_EXTRA_SCRIPT} has no assignment")))?;
    let salon = serde_json::from_str::<SalonConfig>(payload).map_err(|source| ScrapeError::Json {
        what: SALON_EXTRA_SCRIPT,
        source,
    })?;

    Ok(BookingPage { shops, salon })
}
