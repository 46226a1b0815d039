//! Closed classifications used to scope compliance rules
//!
//! Zone and billboard type arrive from callers as free text (database columns,
//! request payloads). Parsing ignores case only: the lowercased value must be
//! exactly one of the enumeration's names. Aliases, separators other than `_`
//! and surrounding whitespace are rejected rather than mapped to a member.

use serde::{Deserialize, Serialize};

/// Land-use zone a billboard is sited in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Prohibited,
    Restricted,
    Permitted,
    Heritage,
    Residential,
    Commercial,
    Industrial,
}

impl ZoneType {
    pub const ALL: [ZoneType; 7] = [
        ZoneType::Prohibited,
        ZoneType::Restricted,
        ZoneType::Permitted,
        ZoneType::Heritage,
        ZoneType::Residential,
        ZoneType::Commercial,
        ZoneType::Industrial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Prohibited => "prohibited",
            ZoneType::Restricted => "restricted",
            ZoneType::Permitted => "permitted",
            ZoneType::Heritage => "heritage",
            ZoneType::Residential => "residential",
            ZoneType::Commercial => "commercial",
            ZoneType::Industrial => "industrial",
        }
    }

    /// Parse a zone name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "prohibited" => Some(ZoneType::Prohibited),
            "restricted" => Some(ZoneType::Restricted),
            "permitted" => Some(ZoneType::Permitted),
            "heritage" => Some(ZoneType::Heritage),
            "residential" => Some(ZoneType::Residential),
            "commercial" => Some(ZoneType::Commercial),
            "industrial" => Some(ZoneType::Industrial),
            _ => None,
        }
    }
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural category of a billboard installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillboardType {
    Unipoles,
    Gantry,
    WallMounted,
    Rooftop,
    Kiosk,
    BusShelter,
    Digital,
    Traditional,
}

impl BillboardType {
    pub const ALL: [BillboardType; 8] = [
        BillboardType::Unipoles,
        BillboardType::Gantry,
        BillboardType::WallMounted,
        BillboardType::Rooftop,
        BillboardType::Kiosk,
        BillboardType::BusShelter,
        BillboardType::Digital,
        BillboardType::Traditional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillboardType::Unipoles => "unipoles",
            BillboardType::Gantry => "gantry",
            BillboardType::WallMounted => "wall_mounted",
            BillboardType::Rooftop => "rooftop",
            BillboardType::Kiosk => "kiosk",
            BillboardType::BusShelter => "bus_shelter",
            BillboardType::Digital => "digital",
            BillboardType::Traditional => "traditional",
        }
    }

    /// Parse a billboard type (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unipoles" => Some(BillboardType::Unipoles),
            "gantry" => Some(BillboardType::Gantry),
            "wall_mounted" => Some(BillboardType::WallMounted),
            "rooftop" => Some(BillboardType::Rooftop),
            "kiosk" => Some(BillboardType::Kiosk),
            "bus_shelter" => Some(BillboardType::BusShelter),
            "digital" => Some(BillboardType::Digital),
            "traditional" => Some(BillboardType::Traditional),
            _ => None,
        }
    }
}

impl std::fmt::Display for BillboardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad category of advertised content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    General,
    Political,
    Religious,
    AlcoholTobacco,
    Healthcare,
    Adult,
}

impl ContentCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(ContentCategory::General),
            "political" => Some(ContentCategory::Political),
            "religious" => Some(ContentCategory::Religious),
            "alcohol_tobacco" => Some(ContentCategory::AlcoholTobacco),
            "healthcare" => Some(ContentCategory::Healthcare),
            "adult" => Some(ContentCategory::Adult),
            _ => None,
        }
    }
}
