use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VaccineType {
    Biontech,
    AstraZeneca,
    JohnsonAndJohnson,
}

impl VaccineType {
    /// Identifier used when building center uids. Must never change.
    pub fn name(self) -> &'static str {
        match self {
            VaccineType::Biontech => "Biontech",
            VaccineType::AstraZeneca => "AstraZeneca",
            VaccineType::JohnsonAndJohnson => "JohnsonAndJohnson",
        }
    }
}

impl fmt::Display for VaccineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VaccineType::Biontech => "BioNTech",
            VaccineType::AstraZeneca => "AstraZeneca",
            VaccineType::JohnsonAndJohnson => "Johnson & Johnson",
        };
        f.write_str(label)
    }
}

/// A specific shot of a vaccination schedule. `round` is `None` for
/// single-dose vaccines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaccineRound {
    pub vaccine_type: VaccineType,
    pub round: Option<u8>,
}

impl VaccineRound {
    pub fn new(vaccine_type: VaccineType, round: Option<u8>) -> Self {
        Self {
            vaccine_type,
            round,
        }
    }
}

impl fmt::Display for VaccineRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.round {
            Some(round) => write!(f, "{} (dose {})", self.vaccine_type, round),
            None => write!(f, "{} (any dose)", self.vaccine_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AvailabilityInfo {
    /// Dates that have at least one free slot.
    pub dates: Vec<NaiveDate>,
    /// A date from which new appointments may be available again.
    pub not_available_until: Option<NaiveDate>,
}

pub type Availability = BTreeMap<VaccineRound, AvailabilityInfo>;

/// Read-only description of a vaccination center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccinationCenterInfo {
    pub uid: String,
    pub name: String,
    pub url: String,
    pub location: String,
}
