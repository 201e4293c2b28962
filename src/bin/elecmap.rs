use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;

use elecmap::format::{fmt_opt, format_number};
use elecmap::{Dashboard, DashboardConfig, Dataset, Event, Metric, ScaleType};
use elecmap::{ranking, stats, storage, viz};

#[derive(Parser, Debug)]
#[command(
    name = "elecmap",
    version,
    about = "Map, rank & summarize country-level electricity self-sufficiency"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the dashboard (map, ranked bars, optional detail panel) to SVG or PNG.
    Render(RenderArgs),
    /// Print (and optionally export) the consumption ranking for a year.
    Rank(RankArgs),
    /// Print per-year summary statistics for one metric.
    Stats(StatsArgs),
    /// Show which dataset record a geography name resolves to.
    Resolve(ResolveArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MetricArg {
    SelfSufficiencyRate,
    NetGeneration,
    NetConsumption,
    Imports,
}

impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::SelfSufficiencyRate => Metric::SelfSufficiencyRate,
            MetricArg::NetGeneration => Metric::NetGeneration,
            MetricArg::NetConsumption => Metric::NetConsumption,
            MetricArg::Imports => Metric::Imports,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScaleArg {
    Linear,
    Log,
}

impl From<ScaleArg> for ScaleType {
    fn from(s: ScaleArg) -> Self {
        match s {
            ScaleArg::Linear => ScaleType::Linear,
            ScaleArg::Log => ScaleType::Log,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Metrics dataset (.json, or tidy .csv with country,metric,year,value).
    #[arg(short, long)]
    data: PathBuf,
    /// Optional TOML configuration (layout, locale, aliases, font).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: DataArgs,
    /// Country shapes as GeoJSON.
    #[arg(short, long)]
    geo: PathBuf,
    /// Output image (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    /// Year to show (clamped to the dataset's years).
    #[arg(short, long)]
    year: Option<i32>,
    #[arg(short, long, value_enum, default_value = "self-sufficiency-rate")]
    metric: MetricArg,
    #[arg(long, value_enum, default_value = "linear")]
    scale: ScaleArg,
    /// Show every ranked country instead of the Top N.
    #[arg(long, default_value_t = false)]
    all: bool,
    /// Open the detail panel for this geography name.
    #[arg(long)]
    select: Option<String>,
    /// Hover this geography name (tooltip and bar highlight).
    #[arg(long)]
    hover: Option<String>,
}

#[derive(Args, Debug)]
struct RankArgs {
    #[command(flatten)]
    input: DataArgs,
    #[arg(short, long)]
    year: Option<i32>,
    /// Print every country instead of the Top N.
    #[arg(long, default_value_t = false)]
    all: bool,
    /// Save the ranking to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    input: DataArgs,
    #[arg(short, long, value_enum, default_value = "self-sufficiency-rate")]
    metric: MetricArg,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    #[command(flatten)]
    input: DataArgs,
    /// Geography names to look up.
    #[arg(required = true)]
    names: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Rank(args) => cmd_rank(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Resolve(args) => cmd_resolve(args),
    }
}

fn load(input: &DataArgs) -> Result<(Dataset, DashboardConfig)> {
    let config = match &input.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let records = storage::load_dataset(&input.data)
        .with_context(|| format!("reading dataset {}", input.data.display()))?;
    Ok((Dataset::with_aliases(records, config.alias_table()), config))
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let (dataset, config) = load(&args.input)?;
    let features = storage::load_geography(&args.geo)
        .with_context(|| format!("reading geography {}", args.geo.display()))?;
    let mut dashboard = Dashboard::new(dataset, &features, config);

    if let Some(year) = args.year {
        dashboard.handle(Event::YearChanged(year));
    }
    dashboard.handle(Event::MetricChanged(args.metric.into()));
    dashboard.handle(Event::ScaleChanged(args.scale.into()));
    if args.all {
        dashboard.handle(Event::ToggleShowAll);
    }
    if let Some(name) = args.select {
        dashboard.handle(Event::RegionClicked(name));
    }
    if let Some(name) = args.hover {
        let (x, y) = region_anchor(&dashboard, &name)
            .ok_or_else(|| anyhow::anyhow!("no region named {name:?} in the geography"))?;
        dashboard.handle(Event::RegionHovered { name, x, y });
    }

    viz::render_dashboard(&dashboard, &args.out)?;
    eprintln!("Wrote dashboard to {}", args.out.display());
    Ok(())
}

/// Mean of the first exterior ring; stands in for a pointer position.
fn region_anchor(dashboard: &Dashboard, name: &str) -> Option<(f64, f64)> {
    let region = dashboard.map().regions.iter().find(|r| r.name == name)?;
    let ring = region.polygons.first()?.first()?;
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (sx, sy) = ring
        .iter()
        .fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x, ay + y));
    Some((sx / n, sy / n))
}

fn cmd_rank(args: RankArgs) -> Result<()> {
    let (dataset, config) = load(&args.input)?;
    let year = match (args.year, dataset.year_span()) {
        (Some(y), _) => y,
        (None, Some((lo, hi))) => config.default_year.clamp(lo, hi),
        (None, None) => config.default_year,
    };
    let all = ranking::rank(&dataset, year);
    let shown = ranking::visible(&all, args.all, config.bars.top_n);
    info!("{} of {} ranked countries shown for {}", shown.len(), all.len(), year);

    if shown.is_empty() {
        println!("{}", ranking::NO_DATA_MESSAGE);
    }
    for (i, e) in shown.iter().enumerate() {
        println!(
            "{:>3}. {:<32} consumption={} generation={} imports={}",
            i + 1,
            e.country,
            format_number(e.consumption, &config.locale),
            format_number(e.generation, &config.locale),
            format_number(e.imports, &config.locale),
        );
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_ranking_csv(shown, path)?,
            "json" => storage::save_ranking_json(shown, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", shown.len(), path.display());
    }
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let (dataset, _) = load(&args.input)?;
    let metric: Metric = args.metric.into();
    for s in stats::metric_summary(&dataset, metric) {
        println!(
            "{} • {}  count={} missing={}  min={} max={} mean={} median={}",
            s.metric.id(),
            s.year,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> Result<()> {
    let (dataset, _) = load(&args.input)?;
    for name in &args.names {
        match dataset.resolve(name) {
            Some(rec) => println!("{name} -> {}", rec.name),
            None => println!("{name} -> (no data)"),
        }
    }
    Ok(())
}
