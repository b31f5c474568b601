use anyhow::{Context as AnyhowContext, Result};
use browse_config::{BrowseConfig, BrowseConfigStore, FeatureFlag, FileConfigStore};
use browse_engine::{
    AuthorityDomain, BrowseDomain, BrowseError, BrowseQuery, BrowseService, CallNumberDomain,
    ClassificationDomain, ContributorDomain, EngineSettings, SubjectDomain,
};
use browse_memory_index::MemoryIndex;
use browse_protocol::{
    serialize_json_pretty, BrowseField, BrowseMode, BrowseOptionId, ErrorEnvelope, TenantScope,
    ERROR_CODE_INTERNAL,
};
use browse_shelf_key::{normalize, ShelvingAlgorithm};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "catalog-browse")]
#[command(about = "Shelf browse over catalog call numbers and headings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Directory holding per-tenant browse configuration
    #[arg(long, global = true, default_value = ".catalog-browse/config")]
    store_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shelf key of a raw value
    Normalize(NormalizeArgs),

    /// Browse a JSON file of records around an anchor
    Browse(BrowseArgs),

    /// Manage browse options of a tenant
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Manage browse feature flags of a tenant
    Feature {
        #[command(subcommand)]
        command: FeatureCommand,
    },
}

#[derive(Args)]
struct NormalizeArgs {
    /// Raw call number or heading
    value: String,

    /// Shelving algorithm: lc|dewey|nlm|sudoc|local|generic
    #[arg(long, short, default_value = "generic")]
    algorithm: String,
}

#[derive(Args)]
struct BrowseArgs {
    /// JSON array of records of the browsed field
    #[arg(long)]
    records: PathBuf,

    /// callNumber|classification|subject|contributor|authority
    #[arg(long)]
    field: String,

    /// Raw anchor value; normalized with the option's algorithm
    #[arg(long, default_value = "")]
    anchor: String,

    /// around|around-exclusive|forward|forward-inclusive|backward|backward-inclusive
    #[arg(long, default_value = "around")]
    mode: String,

    /// Window size (defaults to the engine's default limit)
    #[arg(long)]
    limit: Option<usize>,

    /// Entries before the anchor in around modes (defaults to limit / 2)
    #[arg(long)]
    preceding: Option<usize>,

    /// Browse option id
    #[arg(long, default_value = BrowseOptionId::ALL)]
    option: String,

    #[arg(long, default_value = "default")]
    tenant: String,

    /// Browse as the consortium's central tenant
    #[arg(long)]
    central: bool,

    /// Attach full records to each item
    #[arg(long)]
    expand_all: bool,

    /// Do not mark the anchor
    #[arg(long)]
    no_highlight: bool,

    /// Engine settings file (JSON or TOML)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print one browse option
    Get {
        #[arg(long, default_value = "default")]
        tenant: String,
        #[arg(long)]
        option: String,
    },
    /// Create or replace a browse option
    Set {
        #[arg(long, default_value = "default")]
        tenant: String,
        #[arg(long)]
        option: String,
        #[arg(long)]
        algorithm: String,
        /// Classification type id belonging to the option (repeatable)
        #[arg(long = "type-id")]
        type_ids: Vec<String>,
    },
    /// Print every browse option in effect
    List {
        #[arg(long, default_value = "default")]
        tenant: String,
    },
}

#[derive(Subcommand)]
enum FeatureCommand {
    /// Print whether a feature is enabled
    Get {
        #[arg(long, default_value = "default")]
        tenant: String,
        /// browse.cn.intermediate.values|browse.cn.intermediate.remove.duplicates
        feature: String,
    },
    /// Enable or disable a feature
    Set {
        #[arg(long, default_value = "default")]
        tenant: String,
        feature: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureOutput {
    tenant: String,
    feature: String,
    enabled: bool,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if let Err(err) = run(cli).await {
        log::debug!("Command failed: {err:#}");
        eprintln!("{}", serialize_json_pretty(&error_envelope(&err))?);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let store = FileConfigStore::new(&cli.store_dir);
    match cli.command {
        Commands::Normalize(args) => run_normalize(&args),
        Commands::Browse(args) => run_browse(args, store).await,
        Commands::Config { command } => run_config(command, &store).await,
        Commands::Feature { command } => run_feature(command, &store).await,
    }
}

/// Maps any failure to the envelope printed on stderr.
fn error_envelope(err: &anyhow::Error) -> ErrorEnvelope {
    match err.downcast_ref::<BrowseError>() {
        Some(browse) => browse.to_envelope(),
        None => ErrorEnvelope {
            code: ERROR_CODE_INTERNAL.to_string(),
            message: format!("{err:#}"),
            details: None,
            hint: None,
        },
    }
}

fn parse_algorithm(raw: &str) -> Result<ShelvingAlgorithm, BrowseError> {
    raw.parse::<ShelvingAlgorithm>()
        .map_err(|err| BrowseError::validation("shelvingAlgorithm", raw, format!("{err}")))
}

fn parse_feature(raw: &str) -> Result<FeatureFlag, BrowseError> {
    raw.parse::<FeatureFlag>()
        .map_err(|reason: String| BrowseError::validation("feature", raw, reason))
}

fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let algorithm = parse_algorithm(&args.algorithm)?;
    print_stdout(&normalize(&args.value, algorithm))
}

async fn run_browse(args: BrowseArgs, store: FileConfigStore) -> Result<()> {
    let field = args
        .field
        .parse::<BrowseField>()
        .map_err(|_| BrowseError::UnknownField(args.field.clone()))?;
    let mode = args
        .mode
        .parse::<BrowseMode>()
        .map_err(|reason: String| BrowseError::validation("mode", &args.mode, reason))?;
    let settings = match &args.settings {
        Some(path) => EngineSettings::load(path).await?,
        None => EngineSettings::default(),
    };
    let service = BrowseService::new(Arc::new(store), settings);

    let output = match field {
        BrowseField::CallNumber => browse_field(CallNumberDomain, &service, &args, mode).await?,
        BrowseField::Classification => {
            browse_field(ClassificationDomain, &service, &args, mode).await?
        }
        BrowseField::Subject => browse_field(SubjectDomain, &service, &args, mode).await?,
        BrowseField::Contributor => browse_field(ContributorDomain, &service, &args, mode).await?,
        BrowseField::Authority => browse_field(AuthorityDomain, &service, &args, mode).await?,
    };
    print_stdout(&output)
}

async fn browse_field<D>(
    domain: D,
    service: &BrowseService,
    args: &BrowseArgs,
    mode: BrowseMode,
) -> Result<String>
where
    D: BrowseDomain,
    D::Record: DeserializeOwned + Serialize,
{
    let index = load_index(domain, &args.records).await?;
    let option = BrowseOptionId::new(&args.option);
    let scope = if args.central {
        TenantScope::central(&args.tenant)
    } else {
        TenantScope::member(&args.tenant)
    };

    let anchor = service
        .anchor_key(index.domain(), &args.tenant, &option, &args.anchor)
        .await?;
    let limit = args.limit.unwrap_or(service.settings().default_limit);
    let mut query = BrowseQuery::new(anchor, mode, limit, scope)
        .option(option)
        .display_anchor(args.anchor.clone())
        .highlight(!args.no_highlight)
        .expand_all(args.expand_all);
    if let Some(preceding) = args.preceding {
        query = query.preceding(preceding);
    }
    service.resolve_query_flags(&mut query).await?;

    let result = service.browse(index.domain(), &index, &query).await?;
    serialize_json_pretty(&result)
}

async fn load_index<D>(domain: D, path: &Path) -> Result<MemoryIndex<D>>
where
    D: BrowseDomain,
    D::Record: DeserializeOwned,
{
    MemoryIndex::load_json(domain, path)
        .await
        .with_context(|| format!("Failed to load records from {}", path.display()))
}

async fn run_config(command: ConfigCommand, store: &dyn BrowseConfigStore) -> Result<()> {
    let output = match command {
        ConfigCommand::Get { tenant, option } => {
            let config = store
                .get(&tenant, &BrowseOptionId::new(&option))
                .await
                .map_err(BrowseError::from)?;
            serialize_json_pretty(&config)?
        }
        ConfigCommand::Set {
            tenant,
            option,
            algorithm,
            type_ids,
        } => {
            let config = BrowseConfig::new(BrowseOptionId::new(&option), parse_algorithm(&algorithm)?)
                .with_type_ids(type_ids);
            store
                .set(&tenant, config.clone())
                .await
                .map_err(BrowseError::from)?;
            log::info!("Saved browse option {} for tenant {tenant}", config.id);
            serialize_json_pretty(&config)?
        }
        ConfigCommand::List { tenant } => {
            let configs = store.list(&tenant).await.map_err(BrowseError::from)?;
            serialize_json_pretty(&configs)?
        }
    };
    print_stdout(&output)
}

async fn run_feature(command: FeatureCommand, store: &dyn BrowseConfigStore) -> Result<()> {
    let (tenant, flag, enabled) = match command {
        FeatureCommand::Get { tenant, feature } => {
            let flag = parse_feature(&feature)?;
            let enabled = store.feature(&tenant, flag).await.map_err(BrowseError::from)?;
            (tenant, flag, enabled)
        }
        FeatureCommand::Set {
            tenant,
            feature,
            enabled,
        } => {
            let flag = parse_feature(&feature)?;
            store
                .set_feature(&tenant, flag, enabled)
                .await
                .map_err(BrowseError::from)?;
            log::info!("Set {flag} to {enabled} for tenant {tenant}");
            (tenant, flag, enabled)
        }
    };
    print_stdout(&serialize_json_pretty(&FeatureOutput {
        tenant,
        feature: flag.to_string(),
        enabled,
    })?)
}
