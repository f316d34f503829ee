use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, Index, IndexMut};
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::model::de;

/// The tracked metrics, in display order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kpi {
    #[serde(rename = "新規物件数")]
    NewListings,
    #[serde(rename = "有効物件数")]
    ActiveListings,
    #[serde(rename = "内覧数")]
    Viewings,
    #[serde(rename = "申込数")]
    Applications,
    #[serde(rename = "契約数")]
    Contracts,
}

impl Kpi {
    pub const ALL: [Kpi; 5] = [
        Kpi::NewListings,
        Kpi::ActiveListings,
        Kpi::Viewings,
        Kpi::Applications,
        Kpi::Contracts,
    ];

    /// Label used both on screen and as the field name in source data.
    pub fn label(self) -> &'static str {
        match self {
            Kpi::NewListings => "新規物件数",
            Kpi::ActiveListings => "有効物件数",
            Kpi::Viewings => "内覧数",
            Kpi::Applications => "申込数",
            Kpi::Contracts => "契約数",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Kpi::NewListings => "new-listings",
            Kpi::ActiveListings => "active-listings",
            Kpi::Viewings => "viewings",
            Kpi::Applications => "applications",
            Kpi::Contracts => "contracts",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kpi {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Kpi::ALL
            .into_iter()
            .find(|k| k.label() == s || k.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("Unknown KPI: '{}'", s))
    }
}

/// One integer per KPI. Every KPI is always present; unset means zero.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(from = "KpiFields", into = "KpiFields")]
pub struct KpiValues([i64; 5]);

impl KpiValues {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_fn(mut f: impl FnMut(Kpi) -> i64) -> Self {
        let mut values = Self::zero();
        for kpi in Kpi::ALL {
            values[kpi] = f(kpi);
        }
        values
    }

    pub fn get(&self, kpi: Kpi) -> i64 {
        self[kpi]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Kpi, i64)> + '_ {
        Kpi::ALL.into_iter().map(move |k| (k, self[k]))
    }

    pub fn map(&self, mut f: impl FnMut(i64) -> i64) -> Self {
        Self::from_fn(|k| f(self[k]))
    }
}

impl Index<Kpi> for KpiValues {
    type Output = i64;

    fn index(&self, kpi: Kpi) -> &i64 {
        &self.0[kpi.index()]
    }
}

impl IndexMut<Kpi> for KpiValues {
    fn index_mut(&mut self, kpi: Kpi) -> &mut i64 {
        &mut self.0[kpi.index()]
    }
}

/// Saturates instead of overflowing.
impl AddAssign<&KpiValues> for KpiValues {
    fn add_assign(&mut self, rhs: &KpiValues) {
        for kpi in Kpi::ALL {
            self[kpi] = self[kpi].saturating_add(rhs[kpi]);
        }
    }
}

impl<'a> Sum<&'a KpiValues> for KpiValues {
    fn sum<I: Iterator<Item = &'a KpiValues>>(iter: I) -> Self {
        iter.fold(KpiValues::zero(), |mut acc, v| {
            acc += v;
            acc
        })
    }
}

// Wire shape: one field per KPI label, each optional and lenient.
#[derive(Serialize, Deserialize, Clone, Default)]
struct KpiFields {
    #[serde(rename = "新規物件数", default, deserialize_with = "de::count")]
    new_listings: i64,
    #[serde(rename = "有効物件数", default, deserialize_with = "de::count")]
    active_listings: i64,
    #[serde(rename = "内覧数", default, deserialize_with = "de::count")]
    viewings: i64,
    #[serde(rename = "申込数", default, deserialize_with = "de::count")]
    applications: i64,
    #[serde(rename = "契約数", default, deserialize_with = "de::count")]
    contracts: i64,
}

impl From<KpiFields> for KpiValues {
    fn from(f: KpiFields) -> Self {
        KpiValues([
            f.new_listings,
            f.active_listings,
            f.viewings,
            f.applications,
            f.contracts,
        ])
    }
}

impl From<KpiValues> for KpiFields {
    fn from(v: KpiValues) -> Self {
        KpiFields {
            new_listings: v[Kpi::NewListings],
            active_listings: v[Kpi::ActiveListings],
            viewings: v[Kpi::Viewings],
            applications: v[Kpi::Applications],
            contracts: v[Kpi::Contracts],
        }
    }
}
