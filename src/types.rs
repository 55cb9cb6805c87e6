use crate::dates::iso_millis;
use crate::util::{date_label, human_size};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tabled::Tabled;

/// One entry of `overrides.json` exactly as authored.
///
/// Values stay loosely typed so a bad field only invalidates itself.
#[derive(Debug, Deserialize)]
pub struct RawOverride {
    pub file: Option<Value>,
    pub contains: Option<Value>,
    pub date: Option<Value>,
    pub featured: Option<Value>,
    pub pin: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawOverrideFile {
    pub overrides: Vec<RawOverride>,
}

/// How an override selects documents. Either rule may match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideMatch {
    /// Exact file name.
    pub file: Option<String>,
    /// Lower-cased substring of the file name or href.
    pub contains: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Override {
    pub matcher: OverrideMatch,
    pub date: Option<DateTime<Utc>>,
    pub featured: Option<bool>,
    pub pin: Option<i64>,
}

/// A file found under the reports directory, before any inference.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub href: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    /// `folderYear` when the file sits under `reports/<yyyy>/`, else `contentYear`.
    pub year: i32,
    #[serde(rename = "folderYear")]
    pub folder_year: Option<i32>,
    pub href: String,
    pub size_bytes: u64,
    #[serde(with = "iso_millis")]
    pub modified: DateTime<Utc>,
    #[serde(rename = "inferredISO", default, with = "iso_millis::option")]
    pub inferred_iso: Option<DateTime<Utc>>,
    #[serde(rename = "displayISO", with = "iso_millis")]
    pub display_iso: DateTime<Utc>,
    #[serde(rename = "contentYear")]
    pub content_year: i32,
    pub featured: bool,
    pub pin: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub count: usize,
    pub items: Vec<DocumentRecord>,
}

impl Manifest {
    pub fn new(items: Vec<DocumentRecord>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

#[derive(Debug, Tabled, Clone)]
pub struct DocumentRow {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Size")]
    pub size: String,
    #[tabled(rename = "Flags")]
    pub flags: String,
}

impl From<&DocumentRecord> for DocumentRow {
    fn from(record: &DocumentRecord) -> Self {
        let mut flags = Vec::new();
        if record.featured {
            flags.push("featured".to_string());
        }
        if let Some(pin) = record.pin {
            flags.push(format!("pin={pin}"));
        }
        DocumentRow {
            title: record.title.clone(),
            date: date_label(&record.display_iso),
            size: human_size(record.size_bytes).unwrap_or_default(),
            flags: flags.join(" "),
        }
    }
}

// Briefing tabs. Every cell is read as optional text and cleaned afterwards.

#[derive(Debug, Deserialize)]
pub struct RawHeroRow {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawProductionRow {
    pub month: Option<String>,
    pub avg: Option<String>,
    pub peak: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawHedgeRow {
    pub label: Option<String>,
    #[serde(rename = "hedgedVolume")]
    pub hedged_volume: Option<String>,
    #[serde(rename = "floorPrice")]
    pub floor_price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPoint {
    pub month: String,
    pub avg: f64,
    pub peak: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HedgePoint {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedged_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Briefing {
    pub hero: Hero,
    pub production: Vec<ProductionPoint>,
    pub gas_hedge: Vec<HedgePoint>,
    pub oil_hedge: Vec<HedgePoint>,
}

// Slide-deck briefing tabs (`kpis`, `production`, `hedge_kpis`, `oil`, `gas`,
// `hedge_meta`, `totals`, `avgPrices`, `footnotes`, `source`).

#[derive(Debug, Deserialize)]
pub struct RawKpiRow {
    pub label: Option<String>,
    pub value: Option<String>,
    pub unit: Option<String>,
    pub hint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSeriesRow {
    pub label: Option<String>,
    pub avg: Option<String>,
    pub peak: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawVolumeRow {
    pub period: Option<String>,
    pub volume: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHedgeMetaRow {
    #[serde(rename = "oil_unitVolume")]
    pub oil_unit_volume: Option<String>,
    #[serde(rename = "oil_unitPrice")]
    pub oil_unit_price: Option<String>,
    #[serde(rename = "gas_unitVolume")]
    pub gas_unit_volume: Option<String>,
    #[serde(rename = "gas_unitPrice")]
    pub gas_unit_price: Option<String>,
    pub spot_oil: Option<String>,
    pub spot_gas: Option<String>,
}

/// A `totals` or `avgPrices` row; `stream` is `oil` or `gas`.
#[derive(Debug, Deserialize)]
pub struct RawStreamValueRow {
    pub stream: Option<String>,
    pub label: Option<String>,
    pub value: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawFootnoteRow {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSourceRow {
    pub pdf: Option<String>,
    #[serde(rename = "pageHint")]
    pub page_hint: Option<String>,
    #[serde(rename = "updateCadence")]
    pub update_cadence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub kind: String,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelValue {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub avg: f64,
    pub peak: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub period: String,
    pub volume: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitValue {
    pub label: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HedgeStream {
    pub unit_volume: String,
    pub unit_price: String,
    pub rows: Vec<VolumePoint>,
    pub totals: Vec<UnitValue>,
    pub avg_prices: Vec<UnitValue>,
    pub spot: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub pdf: String,
    pub page_hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Hero {
        image: String,
        logo: String,
        title: String,
        subtitle: String,
    },
    ChartsRow {
        cols: u32,
        items: Vec<KpiTile>,
    },
    #[serde(rename_all = "camelCase")]
    BarLine {
        title: String,
        y_left_unit: String,
        series: Vec<SeriesPoint>,
    },
    HedgeTabs {
        kpis: Vec<LabelValue>,
        oil: HedgeStream,
        gas: HedgeStream,
        disclaimer: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Footnotes {
        items: Vec<String>,
        source: SourceRef,
        update_cadence: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlocksBriefing {
    pub slides: Vec<Slide>,
}
