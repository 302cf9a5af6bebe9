//! Registered economic indices
//!
//! Only names in this set are accepted. Parsing is strict: an unknown name is
//! an error, never a fallback to some default index.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CorrectionError;

/// Publication granularity of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// One rate per calendar month
    Monthly,
    /// One rate per calendar day
    Daily,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Monthly => "monthly",
            Granularity::Daily => "daily",
        }
    }
}

/// Economic index used to correct monetary values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndexName {
    /// IPCA-E, special consumer price index (IBGE)
    #[serde(rename = "IPCA_E")]
    IpcaE,
    /// IPCA, broad consumer price index (IBGE)
    #[serde(rename = "IPCA")]
    Ipca,
    /// INPC, national consumer price index (IBGE)
    #[serde(rename = "INPC")]
    Inpc,
    /// IGP-M, general market price index (FGV)
    #[serde(rename = "IGP_M")]
    IgpM,
    /// SELIC policy rate, published per business day
    #[serde(rename = "SELIC")]
    Selic,
    /// TR, reference rate
    #[serde(rename = "TR")]
    Tr,
}

impl IndexName {
    pub const ALL: [IndexName; 6] = [
        IndexName::IpcaE,
        IndexName::Ipca,
        IndexName::Inpc,
        IndexName::IgpM,
        IndexName::Selic,
        IndexName::Tr,
    ];

    /// Canonical name as used in rate tables and requests
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexName::IpcaE => "IPCA_E",
            IndexName::Ipca => "IPCA",
            IndexName::Inpc => "INPC",
            IndexName::IgpM => "IGP_M",
            IndexName::Selic => "SELIC",
            IndexName::Tr => "TR",
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            IndexName::Selic => Granularity::Daily,
            _ => Granularity::Monthly,
        }
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexName {
    type Err = CorrectionError;

    /// Accepts the canonical names plus the hyphenated spelling (`IPCA-E`),
    /// case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        IndexName::ALL
            .iter()
            .copied()
            .find(|index| index.as_str() == normalized)
            .ok_or_else(|| CorrectionError::UnknownIndex(s.to_string()))
    }
}
