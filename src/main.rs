// Entry point and high-level CLI flow.
//
// - `build` scans the reports folder and writes `manifest.json`.
// - `list` previews a manifest with the same search and year filter the
//   site uses.
// - `briefing` turns spreadsheet tab exports into a briefing fixture, either
//   the flat chart series or the slide deck (`--format blocks`).
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use reports_manifest::types::DocumentRow;
use reports_manifest::{briefing, loader, manifest, output, query, util, BuildConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "reports-manifest")]
#[command(about = "Build the report manifest and briefing fixtures for the investor site")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the reports folder and write the manifest
    Build(BuildArgs),
    /// Print a filtered view of an existing manifest
    List(ListArgs),
    /// Convert briefing tab exports (CSV) into the page's JSON fixture
    Briefing(BriefingArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Web root; hrefs are relative to it
    #[arg(long, default_value = "public", env = "REPORTS_PUBLIC_DIR")]
    public_dir: PathBuf,

    /// Folder holding the reports [default: <public-dir>/reports]
    #[arg(long, env = "REPORTS_DIR")]
    reports_dir: Option<PathBuf>,

    /// Manifest to write [default: <reports-dir>/manifest.json]
    #[arg(long, env = "REPORTS_MANIFEST")]
    out: Option<PathBuf>,

    /// Manual overrides [default: <reports-dir>/overrides.json]
    #[arg(long, env = "REPORTS_OVERRIDES")]
    overrides: Option<PathBuf>,

    /// File extension to index
    #[arg(long)]
    extension: Option<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Manifest to read
    #[arg(long, default_value = "public/reports/manifest.json", env = "REPORTS_MANIFEST")]
    manifest: PathBuf,

    /// Case-insensitive title search
    #[arg(short, long, default_value = "")]
    query: String,

    /// Only documents whose content year matches
    #[arg(short, long)]
    year: Option<i32>,

    /// Rows shown per year
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BriefingFormat {
    /// `{hero, production, gasHedge, oilHedge}` from Hero/Production/GasHedge/OilHedge tabs
    Series,
    /// `{slides: [...]}` from kpis, production, hedge_kpis, oil, gas, hedge_meta,
    /// totals, avgPrices, footnotes and source tabs
    Blocks,
}

#[derive(Args, Debug)]
struct BriefingArgs {
    /// Folder with the tab exports, one CSV per tab
    #[arg(long)]
    input: PathBuf,

    /// JSON fixture to write
    #[arg(long)]
    out: PathBuf,

    /// Period label for the default hero title [default: from the output file name]
    #[arg(long)]
    period: Option<String>,

    /// Fixture layout to produce
    #[arg(long, value_enum, default_value_t = BriefingFormat::Series)]
    format: BriefingFormat,
}

fn handle_build(args: BuildArgs) -> Result<()> {
    let config = BuildConfig::resolve(
        args.public_dir,
        args.reports_dir,
        args.out,
        args.overrides,
        args.extension,
    );
    info!("Reports folder: {}", config.reports_dir.display());

    let manifest = manifest::build_manifest(&config)
        .with_context(|| format!("Failed to build manifest from {}", config.reports_dir.display()))?;
    output::write_json(&config.out_path, &manifest)
        .with_context(|| format!("Failed to write {}", config.out_path.display()))?;

    println!(
        "Wrote {} with {} items.",
        config.out_path.display(),
        util::format_int(manifest.count)
    );
    Ok(())
}

fn handle_list(args: ListArgs) -> Result<()> {
    let manifest = loader::load_manifest(&args.manifest)
        .with_context(|| format!("Failed to read {}", args.manifest.display()))?;

    let hits = query::filter(&manifest, &args.query, args.year);
    println!(
        "{} of {} documents (years: {})\n",
        util::format_int(hits.len()),
        util::format_int(manifest.count),
        query::years(&manifest)
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    for (year, items) in query::group_by_year(&hits) {
        println!("{year}");
        let rows: Vec<DocumentRow> = items.into_iter().map(DocumentRow::from).collect();
        output::preview_table_rows(&rows, args.limit);
    }
    Ok(())
}

fn handle_briefing(args: BriefingArgs) -> Result<()> {
    let period = args.period.clone().unwrap_or_else(|| {
        let stem = args
            .out
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        // `q2-2025.blocks.json` has the stem `q2-2025.blocks`.
        let inner = match args.format {
            BriefingFormat::Series => "json",
            BriefingFormat::Blocks => "blocks",
        };
        util::pretty_title(&stem, inner)
    });
    let context = || format!("Failed to read briefing tabs in {}", args.input.display());

    let summary = match args.format {
        BriefingFormat::Series => {
            let Some(briefing) =
                briefing::build_briefing(&args.input, &period).with_context(context)?
            else {
                println!("Briefing input not found, skipping: {}", args.input.display());
                return Ok(());
            };
            output::write_json(&args.out, &briefing)
                .with_context(|| format!("Failed to write {}", args.out.display()))?;
            format!(
                "prod:{} gas:{} oil:{}",
                briefing.production.len(),
                briefing.gas_hedge.len(),
                briefing.oil_hedge.len()
            )
        }
        BriefingFormat::Blocks => {
            let Some(deck) = briefing::build_blocks(&args.input, &period).with_context(context)?
            else {
                println!("Briefing input not found, skipping: {}", args.input.display());
                return Ok(());
            };
            output::write_json(&args.out, &deck)
                .with_context(|| format!("Failed to write {}", args.out.display()))?;
            format!("slides:{}", deck.slides.len())
        }
    };

    println!("Wrote {} ({})", args.out.display(), summary);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reports_manifest=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Build(args) => handle_build(args),
        Command::List(args) => handle_list(args),
        Command::Briefing(args) => handle_briefing(args),
    }
}
