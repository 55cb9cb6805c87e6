// Quarterly briefing fixtures: spreadsheet tabs exported as CSV become the
// chart-ready JSON the interactive briefing pages load. Two layouts exist:
// the flat series document and the slide deck made of typed blocks.
use crate::error::Result;
use crate::loader::load_tab;
use crate::types::{
    Block, BlocksBriefing, Briefing, HedgePoint, HedgeStream, Hero, KpiTile, LabelValue,
    ProductionPoint, RawFootnoteRow, RawHedgeMetaRow, RawHedgeRow, RawHeroRow, RawKpiRow,
    RawProductionRow, RawSeriesRow, RawSourceRow, RawStreamValueRow, RawVolumeRow, SeriesPoint,
    Slide, SourceRef, UnitValue, VolumePoint,
};
use crate::util::{non_empty, parse_f64_safe};
use std::path::Path;
use tracing::info;

pub const HERO_TAB: &str = "Hero.csv";
pub const PRODUCTION_TAB: &str = "Production.csv";
pub const GAS_HEDGE_TAB: &str = "GasHedge.csv";
pub const OIL_HEDGE_TAB: &str = "OilHedge.csv";

const HEDGE_COLUMNS: [&str; 3] = ["label", "hedgedVolume", "floorPrice"];

pub const KPIS_TAB: &str = "kpis.csv";
pub const SERIES_TAB: &str = "production.csv";
pub const HEDGE_KPIS_TAB: &str = "hedge_kpis.csv";
pub const OIL_TAB: &str = "oil.csv";
pub const GAS_TAB: &str = "gas.csv";
pub const HEDGE_META_TAB: &str = "hedge_meta.csv";
pub const TOTALS_TAB: &str = "totals.csv";
pub const AVG_PRICES_TAB: &str = "avgPrices.csv";
pub const FOOTNOTES_TAB: &str = "footnotes.csv";
pub const SOURCE_TAB: &str = "source.csv";

const VOLUME_COLUMNS: [&str; 3] = ["period", "volume", "price"];
const STREAM_COLUMNS: [&str; 3] = ["stream", "label", "value"];

const BRAND: &str = "BlueNord";
const LOGO: &str = "/images/brand/bluenord-logo-260925.png";
const HERO_SUBTITLE: &str =
    "Interactive view of selected slides. Updated from spreadsheet on each deploy.";
const PRODUCTION_UNIT: &str = "mboe/d";
const DISCLAIMER: &str = "Numbers loaded from spreadsheet.";

/// Build the briefing from the tab exports in `input_dir`.
///
/// Returns `Ok(None)` when the input directory does not exist, so a site
/// build without briefing data simply skips this step.
pub fn build_briefing(input_dir: &Path, period: &str) -> Result<Option<Briefing>> {
    if !input_dir.is_dir() {
        info!("Briefing input not found, skipping: {}", input_dir.display());
        return Ok(None);
    }

    let hero_rows: Vec<RawHeroRow> = load_tab(&input_dir.join(HERO_TAB), &["title"])?;
    let production_rows: Vec<RawProductionRow> =
        load_tab(&input_dir.join(PRODUCTION_TAB), &["month", "avg", "peak"])?;
    let gas_rows: Vec<RawHedgeRow> = load_tab(&input_dir.join(GAS_HEDGE_TAB), &HEDGE_COLUMNS)?;
    let oil_rows: Vec<RawHedgeRow> = load_tab(&input_dir.join(OIL_HEDGE_TAB), &HEDGE_COLUMNS)?;

    Ok(Some(Briefing {
        hero: hero(hero_rows.into_iter().next(), period),
        production: production(production_rows),
        gas_hedge: hedges(gas_rows),
        oil_hedge: hedges(oil_rows),
    }))
}

fn hero(first: Option<RawHeroRow>, period: &str) -> Hero {
    let (title, subtitle) = match first {
        Some(row) => (
            non_empty(row.title.as_deref()),
            non_empty(row.subtitle.as_deref()),
        ),
        None => (None, None),
    };
    Hero {
        title: title.unwrap_or_else(|| format!("{period} presentation (interactive)")),
        subtitle: subtitle.unwrap_or_default(),
    }
}

fn production(rows: Vec<RawProductionRow>) -> Vec<ProductionPoint> {
    rows.into_iter()
        .filter_map(|row| {
            let month = non_empty(row.month.as_deref())?;
            Some(ProductionPoint {
                month,
                avg: parse_f64_safe(row.avg.as_deref()).unwrap_or(0.0),
                peak: parse_f64_safe(row.peak.as_deref()).unwrap_or(0.0),
            })
        })
        .collect()
}

fn hedges(rows: Vec<RawHedgeRow>) -> Vec<HedgePoint> {
    rows.into_iter()
        .filter_map(|row| {
            let label = non_empty(row.label.as_deref())?;
            Some(HedgePoint {
                label,
                hedged_volume: parse_f64_safe(row.hedged_volume.as_deref()),
                floor_price: parse_f64_safe(row.floor_price.as_deref()),
            })
        })
        .collect()
}

/// Build the slide-deck briefing from the tab exports in `input_dir`.
///
/// Same skip rule as [`build_briefing`]. Units and spot prices come from the
/// first `hedge_meta` row, with `mmbbl`/`$/bbl` for oil and `GWh`/`€/MWh` for
/// gas when a unit is blank.
pub fn build_blocks(input_dir: &Path, period: &str) -> Result<Option<BlocksBriefing>> {
    if !input_dir.is_dir() {
        info!("Briefing input not found, skipping: {}", input_dir.display());
        return Ok(None);
    }

    let kpis: Vec<RawKpiRow> = load_tab(&input_dir.join(KPIS_TAB), &["label", "value"])?;
    let series: Vec<RawSeriesRow> =
        load_tab(&input_dir.join(SERIES_TAB), &["label", "avg", "peak"])?;
    let hedge_kpis: Vec<RawKpiRow> =
        load_tab(&input_dir.join(HEDGE_KPIS_TAB), &["label", "value"])?;
    let oil_rows: Vec<RawVolumeRow> = load_tab(&input_dir.join(OIL_TAB), &VOLUME_COLUMNS)?;
    let gas_rows: Vec<RawVolumeRow> = load_tab(&input_dir.join(GAS_TAB), &VOLUME_COLUMNS)?;
    let meta: RawHedgeMetaRow = load_tab(&input_dir.join(HEDGE_META_TAB), &[])?
        .into_iter()
        .next()
        .unwrap_or_default();
    let totals: Vec<RawStreamValueRow> =
        load_tab(&input_dir.join(TOTALS_TAB), &STREAM_COLUMNS)?;
    let avg_prices: Vec<RawStreamValueRow> =
        load_tab(&input_dir.join(AVG_PRICES_TAB), &STREAM_COLUMNS)?;
    let footnotes: Vec<RawFootnoteRow> = load_tab(&input_dir.join(FOOTNOTES_TAB), &["text"])?;
    let source: RawSourceRow = load_tab(&input_dir.join(SOURCE_TAB), &[])?
        .into_iter()
        .next()
        .unwrap_or_default();

    let oil_price_unit = unit_or(meta.oil_unit_price.as_deref(), "$/bbl");
    let gas_price_unit = unit_or(meta.gas_unit_price.as_deref(), "€/MWh");
    let oil = HedgeStream {
        unit_volume: unit_or(meta.oil_unit_volume.as_deref(), "mmbbl"),
        rows: volume_points(oil_rows),
        totals: stream_values(&totals, "oil", |row| {
            non_empty(row.unit.as_deref()).unwrap_or_default()
        }),
        avg_prices: stream_values(&avg_prices, "oil", |_| oil_price_unit.clone()),
        spot: number(meta.spot_oil.as_deref()),
        unit_price: oil_price_unit,
    };
    let gas = HedgeStream {
        unit_volume: unit_or(meta.gas_unit_volume.as_deref(), "GWh"),
        rows: volume_points(gas_rows),
        totals: stream_values(&totals, "gas", |row| {
            non_empty(row.unit.as_deref()).unwrap_or_default()
        }),
        avg_prices: stream_values(&avg_prices, "gas", |_| gas_price_unit.clone()),
        spot: number(meta.spot_gas.as_deref()),
        unit_price: gas_price_unit,
    };

    let slug = period_slug(period);
    let slides = vec![
        Slide {
            id: "hero".to_string(),
            title: format!("{BRAND} – {period} presentation (interactive)"),
            blocks: vec![Block::Hero {
                image: format!("/images/briefings/{slug}/hero.png"),
                logo: LOGO.to_string(),
                title: format!("{period} – Highlights & details"),
                subtitle: HERO_SUBTITLE.to_string(),
            }],
        },
        Slide {
            id: "highlights".to_string(),
            title: "Quarter highlights".to_string(),
            blocks: vec![Block::ChartsRow {
                cols: 3,
                items: kpi_tiles(kpis),
            }],
        },
        Slide {
            id: "production".to_string(),
            title: "Production – Average vs Peak".to_string(),
            blocks: vec![Block::BarLine {
                title: format!("Monthly production ({period})"),
                y_left_unit: PRODUCTION_UNIT.to_string(),
                series: series_points(series),
            }],
        },
        Slide {
            id: "hedging".to_string(),
            title: "Hedge portfolio (snapshot)".to_string(),
            blocks: vec![Block::HedgeTabs {
                kpis: label_values(hedge_kpis),
                oil,
                gas,
                disclaimer: vec![DISCLAIMER.to_string()],
            }],
        },
        Slide {
            id: "notes".to_string(),
            title: "Notes & sources".to_string(),
            blocks: vec![Block::Footnotes {
                items: footnotes
                    .into_iter()
                    .filter_map(|row| non_empty(row.text.as_deref()))
                    .collect(),
                source: SourceRef {
                    pdf: non_empty(source.pdf.as_deref()).unwrap_or_default(),
                    page_hint: non_empty(source.page_hint.as_deref()).unwrap_or_default(),
                },
                update_cadence: unit_or(source.update_cadence.as_deref(), "quarterly"),
            }],
        },
    ];
    Ok(Some(BlocksBriefing { slides }))
}

/// `Q2 2025` -> `q2-2025`, used in asset paths.
pub fn period_slug(period: &str) -> String {
    period
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn number(s: Option<&str>) -> f64 {
    parse_f64_safe(s).unwrap_or(0.0)
}

fn unit_or(s: Option<&str>, fallback: &str) -> String {
    non_empty(s).unwrap_or_else(|| fallback.to_string())
}

fn kpi_tiles(rows: Vec<RawKpiRow>) -> Vec<KpiTile> {
    rows.into_iter()
        .filter_map(|row| {
            Some(KpiTile {
                kind: "kpi".to_string(),
                label: non_empty(row.label.as_deref())?,
                value: non_empty(row.value.as_deref()).unwrap_or_default(),
                unit: non_empty(row.unit.as_deref()),
                hint: non_empty(row.hint.as_deref()),
            })
        })
        .collect()
}

fn label_values(rows: Vec<RawKpiRow>) -> Vec<LabelValue> {
    rows.into_iter()
        .filter_map(|row| {
            Some(LabelValue {
                label: non_empty(row.label.as_deref())?,
                value: non_empty(row.value.as_deref()).unwrap_or_default(),
            })
        })
        .collect()
}

fn series_points(rows: Vec<RawSeriesRow>) -> Vec<SeriesPoint> {
    rows.into_iter()
        .filter_map(|row| {
            Some(SeriesPoint {
                label: non_empty(row.label.as_deref())?,
                avg: number(row.avg.as_deref()),
                peak: number(row.peak.as_deref()),
            })
        })
        .collect()
}

fn volume_points(rows: Vec<RawVolumeRow>) -> Vec<VolumePoint> {
    rows.into_iter()
        .filter_map(|row| {
            Some(VolumePoint {
                period: non_empty(row.period.as_deref())?,
                volume: number(row.volume.as_deref()),
                price: number(row.price.as_deref()),
            })
        })
        .collect()
}

// Rows of one stream (`oil` or `gas`, any case) that carry a label.
fn stream_values<F>(rows: &[RawStreamValueRow], stream: &str, unit: F) -> Vec<UnitValue>
where
    F: Fn(&RawStreamValueRow) -> String,
{
    rows.iter()
        .filter(|row| {
            row.stream
                .as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case(stream))
        })
        .filter_map(|row| {
            Some(UnitValue {
                label: non_empty(row.label.as_deref())?,
                value: number(row.value.as_deref()),
                unit: unit(row),
            })
        })
        .collect()
}
