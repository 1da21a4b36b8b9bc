use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use georeg_client::{ApiClient, LawMeta};
use georeg_core::session::Session;
use georeg_core::{FeatureArtifact, RegionConstraint, export, ingest, route};

mod display;

#[derive(Parser)]
#[command(
    name = "georeg",
    about = "Client for the geo-reg compliance classification backend",
    version
)]
struct Cli {
    /// Backend base URL.
    #[arg(
        long,
        env = "GEOREG_API",
        default_value = "http://localhost:8000",
        global = true
    )]
    api: String,

    /// Per-request deadline in seconds.
    #[arg(long, default_value_t = 120, global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a single feature artifact.
    Analyze(AnalyzeArgs),
    /// Classify many artifacts from a file.
    Batch(BatchArgs),
    /// Convert a CSV of artifacts to editable JSON lines on stdout.
    Import {
        /// CSV file with feature_text OR feature_name + feature_description
        /// columns (optional rule_hits).
        #[arg(long)]
        input: PathBuf,
    },
    /// Preview raw retrieval for a query.
    Search {
        query: String,
        #[arg(long, default_value_t = route::DEFAULT_K)]
        k: u32,
        #[arg(long)]
        mmr: bool,
    },
    /// Manage the backend law knowledge base.
    Laws {
        #[command(subcommand)]
        command: LawsCommand,
    },
    /// Check backend availability.
    Health,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Feature description text. Reads --file when omitted.
    text: Option<String>,

    /// Read the artifact text from a file instead.
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Comma-separated rule tags; none means auto-detect.
    #[arg(long, value_delimiter = ',')]
    rules: Vec<String>,

    /// Assume a jurisdiction (e.g. "EU/EEA", "US-UT").
    #[arg(long)]
    assume: Option<String>,

    /// Write the pretty-printed audit record here.
    #[arg(long)]
    audit: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    /// Input file: CSV, or newline-delimited text/JSON records.
    #[arg(long)]
    input: PathBuf,

    /// Input format; inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Assume a jurisdiction for every row.
    #[arg(long)]
    assume: Option<String>,

    /// Retrieval depth per row.
    #[arg(long, default_value_t = route::DEFAULT_K)]
    k: u32,

    /// Write the backend's CSV export here.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    Csv,
    Lines,
}

#[derive(Subcommand)]
enum LawsCommand {
    /// List laws in the knowledge base.
    List,
    /// Upload one law document.
    Upload {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        article: Option<String>,
    },
    /// Remove one law document by its backend file path.
    Delete { file_path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("georeg v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();
    let client = ApiClient::with_timeout(cli.api, Duration::from_secs(cli.timeout))?;

    match cli.command {
        Command::Analyze(args) => run_analyze(&client, args).await,
        Command::Batch(args) => run_batch(&client, args).await,
        Command::Import { input } => run_import(&input),
        Command::Search { query, k, mmr } => run_search(&client, &query, k, mmr).await,
        Command::Laws { command } => run_laws(&client, command).await,
        Command::Health => run_health(&client).await,
    }
}

fn constraint_from(assume: Option<&str>) -> RegionConstraint {
    assume.map(RegionConstraint::assume).unwrap_or_default()
}

async fn run_analyze(client: &ApiClient, args: AnalyzeArgs) -> anyhow::Result<()> {
    let text = match (args.text, &args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => bail!("provide artifact text or --file"),
    };
    if text.trim().is_empty() {
        bail!("artifact text is empty");
    }

    let rules: Vec<String> = args
        .rules
        .iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();
    let artifact = FeatureArtifact::new(text.trim(), rules);
    let constraint = constraint_from(args.assume.as_deref());
    let plan = route::plan_single(&artifact, &constraint);

    let mut session = Session::new();
    let ticket = session.begin()?;
    let outcome = client.classify(&plan).await.map_err(|e| e.to_string());
    session.settle(ticket, outcome);

    match session.into_outcome() {
        Some(Ok(verdict)) => {
            display::print_verdict(&verdict);
            if let Some(path) = args.audit {
                std::fs::write(&path, export::audit_json(&verdict)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                eprintln!("audit written to {}", path.display());
            }
            Ok(())
        }
        Some(Err(message)) => bail!(message),
        None => bail!("request was not settled"),
    }
}

async fn run_batch(client: &ApiClient, args: BatchArgs) -> anyhow::Result<()> {
    // The whole file is read before parsing; no streaming.
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let format = args.format.unwrap_or_else(|| {
        match args.input.extension().and_then(|e| e.to_str()) {
            Some("csv") => InputFormat::Csv,
            _ => InputFormat::Lines,
        }
    });
    let artifacts = match format {
        InputFormat::Csv => ingest::from_csv(&text),
        InputFormat::Lines => ingest::from_lines(&text),
    };
    if artifacts.is_empty() {
        bail!("no artifacts found in {}", args.input.display());
    }

    let constraint = constraint_from(args.assume.as_deref());
    let plan = route::plan_batch(artifacts, &constraint, args.k, true);

    let mut session = Session::new();
    let ticket = session.begin()?;
    let outcome = client.batch_classify(&plan).await.map_err(|e| e.to_string());
    session.settle(ticket, outcome);

    match session.into_outcome() {
        Some(Ok(outcome)) => {
            display::print_batch(&outcome.rows);
            match export::batch_csv(&outcome) {
                Some(csv) => {
                    if let Some(path) = args.out {
                        std::fs::write(&path, csv)
                            .with_context(|| format!("writing {}", path.display()))?;
                        eprintln!("csv written to {}", path.display());
                    }
                }
                None => {
                    if args.out.is_some() {
                        eprintln!("backend returned no CSV export; structured rows only");
                    }
                }
            }
            Ok(())
        }
        Some(Err(message)) => bail!(message),
        None => bail!("request was not settled"),
    }
}

fn run_import(input: &PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let artifacts = ingest::from_csv(&text);
    if artifacts.is_empty() {
        bail!("no artifacts found in {}", input.display());
    }
    println!("{}", ingest::to_jsonl(&artifacts)?);
    Ok(())
}

async fn run_search(client: &ApiClient, query: &str, k: u32, mmr: bool) -> anyhow::Result<()> {
    let docs = client.search(query, k, mmr).await?;
    display::print_docs(&docs);
    Ok(())
}

async fn run_laws(client: &ApiClient, command: LawsCommand) -> anyhow::Result<()> {
    match command {
        LawsCommand::List => {
            let laws = client.laws().await?;
            display::print_law_entries(&laws);
        }
        LawsCommand::Upload {
            file,
            name,
            region,
            source,
            article,
        } => {
            let meta = LawMeta {
                law_name: name,
                region,
                source,
                article_or_section: article,
            };
            client.upload_law(&file, &meta).await?;
            eprintln!("uploaded {}", file.display());
        }
        LawsCommand::Delete { file_path } => {
            client.delete_law(&file_path).await?;
            eprintln!("deleted {file_path}");
        }
    }
    Ok(())
}

async fn run_health(client: &ApiClient) -> anyhow::Result<()> {
    let ok = matches!(client.health().await, Ok(true));
    println!("{}", if ok { "API online" } else { "API offline" });
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
