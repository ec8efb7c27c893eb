use anyhow::{bail, Context};
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use viewx::{
    compare_view, AggregateFunction, Catalog, Dataset, Error, EventLog, FilterCondition,
    Measure, MeteredSource, PayloadFilter, SearchConfig, SearchReport,
    StrategyKind, ViewComparison,
};

/// Rank the aggregate views on which a target subset differs most from the rest
#[derive(Parser, Debug)]
#[command(name = "viewx")]
#[command(about = "Find the most interesting aggregate views of a table", long_about = None)]
struct Args {
    /// JSON-lines file, one row object per line
    #[arg(short, long)]
    data: PathBuf,

    /// Grouping columns
    #[arg(long, value_delimiter = ',', required = true)]
    dimensions: Vec<String>,

    /// Numeric columns to aggregate
    #[arg(long, value_delimiter = ',', required = true)]
    measures: Vec<String>,

    /// Aggregate functions (default: sum,max,min,avg,count)
    #[arg(long, value_delimiter = ',')]
    functions: Vec<String>,

    /// Column deciding target membership
    #[arg(long, conflicts_with = "target_filter")]
    target_column: Option<String>,

    /// Values of --target-column that select target rows
    #[arg(long, value_delimiter = ',', requires = "target_column")]
    target_values: Vec<String>,

    /// Target condition as JSON, e.g. '{"greater_than": {"field": "age", "value": 40}}'
    #[arg(long)]
    target_filter: Option<String>,

    /// Search configuration file (JSON); flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Distance measure: kld or emd
    #[arg(long)]
    measure: Option<String>,

    /// Inner strategy: naive or sharing
    #[arg(long)]
    strategy: Option<String>,

    /// Enable pruning with this many partitions
    #[arg(long)]
    partitions: Option<usize>,

    /// Pruning significance level
    #[arg(long)]
    alpha: Option<f64>,

    /// Print per-category values of the best N views
    #[arg(long, default_value_t = 0)]
    explain: usize,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting viewX v{}", env!("CARGO_PKG_VERSION"));

    let config = build_config(&args)?;
    let catalog = Catalog::new(args.dimensions.iter().cloned(), args.measures.iter().cloned())?;
    let functions = parse_functions(&args.functions)?;
    let target = target_filter(&args)?;

    let dataset = Dataset::load_jsonl(&args.data, catalog, &target)
        .with_context(|| format!("failed to load {:?}", args.data))?;
    info!(
        rows = dataset.len(),
        target = dataset.cohort_size(viewx::Cohort::Target),
        "dataset ready"
    );

    let views = dataset.catalog().views(&functions);
    if views.is_empty() {
        return Err(Error::EmptyViewSpace.into());
    }

    let mut source = MeteredSource::new(dataset);
    let mut log = EventLog::new();
    let results = config.run_observed(&mut source, &views, &mut log)?;
    let stats = source.stats();

    let mut comparisons: Vec<ViewComparison> = Vec::new();
    for ranked in results.iter().take(args.explain) {
        comparisons.push(compare_view(&mut source, &ranked.view, None)?);
    }

    let strategy = match config.pruning {
        Some(_) => format!("pruning({})", config.strategy),
        None => config.strategy.to_string(),
    };
    let report = SearchReport::new(
        strategy,
        config.measure,
        config.pruning.is_some(),
        views.len(),
        stats,
        results,
    )
    .with_comparisons(comparisons);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, log.total_pruned());
    }
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {:?}", path))?,
        None => SearchConfig::default(),
    };

    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }
    if let Some(measure) = &args.measure {
        config.measure = measure.parse::<Measure>()?;
    }
    if let Some(strategy) = &args.strategy {
        config.strategy = strategy.parse::<StrategyKind>()?;
    }
    if args.partitions.is_some() || args.alpha.is_some() {
        let mut pruning = config.pruning.unwrap_or_default();
        if let Some(partitions) = args.partitions {
            pruning.partitions = partitions;
        }
        if let Some(alpha) = args.alpha {
            pruning.alpha = alpha;
        }
        config.pruning = Some(pruning);
    }

    config.validate()?;
    Ok(config)
}

fn parse_functions(names: &[String]) -> anyhow::Result<Vec<AggregateFunction>> {
    if names.is_empty() {
        return Ok(AggregateFunction::ALL.to_vec());
    }
    let mut functions = Vec::with_capacity(names.len());
    for name in names {
        let function: AggregateFunction = name.parse()?;
        if !functions.contains(&function) {
            functions.push(function);
        }
    }
    Ok(functions)
}

fn target_filter(args: &Args) -> anyhow::Result<PayloadFilter> {
    if let Some(json) = &args.target_filter {
        let condition: FilterCondition =
            serde_json::from_str(json).context("invalid --target-filter")?;
        return Ok(PayloadFilter::new(condition));
    }
    match &args.target_column {
        Some(column) if !args.target_values.is_empty() => {
            // Bare words are strings, anything that parses as JSON keeps its type
            let values = args
                .target_values
                .iter()
                .map(|v| serde_json::from_str::<Value>(v).unwrap_or_else(|_| Value::String(v.clone())));
            Ok(PayloadFilter::new(FilterCondition::any_of(column, values)))
        }
        Some(_) => bail!("--target-column needs at least one --target-values entry"),
        None => bail!("either --target-column/--target-values or --target-filter is required"),
    }
}

fn print_report(report: &SearchReport, pruned: usize) {
    println!(
        "{} views, strategy {}, measure {}",
        report.candidates, report.strategy, report.measure
    );
    println!(
        "{} target + {} reference queries, {} views pruned",
        report.target_queries, report.reference_queries, pruned
    );
    println!();
    println!("{:>4}  {:>12}  view", "rank", "utility");
    for (i, result) in report.results.iter().enumerate() {
        println!("{:>4}  {:>12.6}  {}", i + 1, result.utility, result.view);
    }

    for comparison in &report.comparisons {
        println!();
        println!("{}", comparison.view);
        println!("  {:<24} {:>14} {:>14}", "category", "target", "reference");
        for row in comparison.rows() {
            println!("  {:<24} {:>14.4} {:>14.4}", row.category, row.target, row.reference);
        }
    }
}
