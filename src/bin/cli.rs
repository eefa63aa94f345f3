//! bloomkv CLI Client
//!
//! Command-line interface for the probabilistic data-structure commands.

use std::path::PathBuf;
use std::process::ExitCode;

use bloomkv::{
    bloom, cuckoo, dump, top_k, BloomCommands, Client, Config, CountMinCommands, CuckooCommands,
    TcpConnection, TopKCommands,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// bloomkv CLI
#[derive(Parser, Debug)]
#[command(name = "bloomkv-cli")]
#[command(about = "CLI for Bloom, Cuckoo, Count-Min Sketch and Top-K commands")]
#[command(version)]
struct Args {
    /// Server address (defaults to $BLOOMKV_ADDR, then 127.0.0.1:6379)
    #[arg(short, long)]
    server: Option<String>,

    /// Reply timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bloom filter commands
    #[command(subcommand)]
    Bf(BfCommand),

    /// Cuckoo filter commands
    #[command(subcommand)]
    Cf(CfCommand),

    /// Count-Min Sketch commands
    #[command(subcommand)]
    Cms(CmsCommand),

    /// Top-K commands
    #[command(subcommand)]
    Topk(TopkCommand),
}

#[derive(Subcommand, Debug)]
enum BfCommand {
    /// Create an empty filter
    Reserve {
        name: String,
        error_rate: f64,
        capacity: i64,
        #[arg(long)]
        expansion: Option<i64>,
        #[arg(long)]
        non_scaling: bool,
    },

    /// Add items
    Add { name: String, items: Vec<String> },

    /// Check items
    Exists { name: String, items: Vec<String> },

    /// Add items, creating the filter if needed
    Insert {
        name: String,
        #[arg(long)]
        capacity: Option<i64>,
        #[arg(long)]
        error_rate: Option<f64>,
        #[arg(long)]
        expansion: Option<i64>,
        #[arg(long)]
        no_create: bool,
        #[arg(long)]
        non_scaling: bool,
        items: Vec<String>,
    },

    /// Show filter info
    Info { name: String },

    /// Copy a filter chunk by chunk
    Copy { source: String, dest: String },

    #[command(flatten)]
    Archive(ArchiveCommand),
}

#[derive(Subcommand, Debug)]
enum CfCommand {
    /// Create an empty filter
    Reserve {
        key: String,
        capacity: i64,
        #[arg(long)]
        bucket_size: Option<i64>,
        #[arg(long)]
        max_iterations: Option<i64>,
        #[arg(long)]
        expansion: Option<i64>,
    },

    /// Add an item
    Add {
        key: String,
        item: String,
        /// Only add when not already present
        #[arg(long)]
        nx: bool,
    },

    /// Check an item
    Exists { key: String, item: String },

    /// Delete one occurrence of an item
    Del { key: String, item: String },

    /// Count occurrences of an item
    Count { key: String, item: String },

    /// Show filter info
    Info { key: String },

    #[command(flatten)]
    Archive(ArchiveCommand),
}

/// Dump archive subcommands shared by both filter families
#[derive(Subcommand, Debug)]
enum ArchiveCommand {
    /// Dump a filter into a file
    Save { key: String, file: PathBuf },

    /// Restore a filter from a file
    Load { key: String, file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum CmsCommand {
    /// Initialize by dimensions
    InitByDim { key: String, width: i64, depth: i64 },

    /// Initialize by error bound and probability
    InitByProb { key: String, error: f64, probability: f64 },

    /// Increase an item's count
    IncrBy { key: String, item: String, increment: i64 },

    /// Estimated counts
    Query { key: String, items: Vec<String> },

    /// Merge sources into dest
    Merge {
        dest: String,
        #[arg(required = true)]
        sources: Vec<String>,
        /// One weight per source
        #[arg(long, num_args = 1..)]
        weights: Option<Vec<i64>>,
    },

    /// Show sketch info
    Info { key: String },
}

#[derive(Subcommand, Debug)]
enum TopkCommand {
    /// Create a Top-K tracker
    Reserve {
        key: String,
        k: i64,
        #[command(flatten)]
        dims: TopkDims,
    },

    /// Add items
    Add { key: String, items: Vec<String> },

    /// List the current top items
    List { key: String },

    /// Show tracker info
    Info { key: String },
}

#[derive(ClapArgs, Debug)]
struct TopkDims {
    #[arg(long, requires_all = ["depth", "decay"])]
    width: Option<i64>,
    #[arg(long, requires_all = ["width", "decay"])]
    depth: Option<i64>,
    #[arg(long, requires_all = ["width", "depth"])]
    decay: Option<f64>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,bloomkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(server) = &args.server {
        config.addr = server.clone();
    }
    config.read_timeout_ms = args.timeout_ms;

    let mut client = match Client::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", config.addr, e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut client, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(client: &mut Client<TcpConnection>, command: Commands) -> bloomkv::Result<()> {
    match command {
        Commands::Bf(cmd) => run_bf(client, cmd),
        Commands::Cf(cmd) => run_cf(client, cmd),
        Commands::Cms(cmd) => run_cms(client, cmd),
        Commands::Topk(cmd) => run_topk(client, cmd),
    }
}

fn run_bf(client: &mut Client<TcpConnection>, cmd: BfCommand) -> bloomkv::Result<()> {
    match cmd {
        BfCommand::Reserve { name, error_rate, capacity, expansion, non_scaling } => {
            let options = bloom::ReserveOptions { expansion, non_scaling };
            println!("{}", client.bf_reserve(&name, capacity, error_rate, &options)?);
        }
        BfCommand::Add { name, items } => {
            println!("{:?}", client.bf_madd(&name, &strs(&items))?);
        }
        BfCommand::Exists { name, items } => {
            println!("{:?}", client.bf_mexists(&name, &strs(&items))?);
        }
        BfCommand::Insert { name, capacity, error_rate, expansion, no_create, non_scaling, items } => {
            let options = bloom::InsertOptions { capacity, error_rate, expansion, no_create, non_scaling };
            println!("{:?}", client.bf_insert(&name, &options, &strs(&items))?);
        }
        BfCommand::Info { name } => print_json(&client.bf_info(&name)?)?,
        BfCommand::Copy { source, dest } => {
            let chunks = bloom::dump(client, &source)?;
            bloom::restore(client, &dest, &chunks)?;
            println!("copied {} chunks", chunks.len());
        }
        BfCommand::Archive(ArchiveCommand::Save { key, file }) => {
            let written = dump::save(&file, &bloom::dump(client, &key)?)?;
            println!("saved {} chunks to {}", written, file.display());
        }
        BfCommand::Archive(ArchiveCommand::Load { key, file }) => {
            let chunks = dump::load(&file)?;
            bloom::restore(client, &key, &chunks)?;
            println!("loaded {} chunks into {}", chunks.len(), key);
        }
    }
    Ok(())
}

fn run_cf(client: &mut Client<TcpConnection>, cmd: CfCommand) -> bloomkv::Result<()> {
    match cmd {
        CfCommand::Reserve { key, capacity, bucket_size, max_iterations, expansion } => {
            let options = cuckoo::ReserveOptions { bucket_size, max_iterations, expansion };
            println!("{}", client.cf_reserve(&key, capacity, &options)?);
        }
        CfCommand::Add { key, item, nx } => {
            let added = if nx {
                client.cf_add_nx(&key, &item)?
            } else {
                client.cf_add(&key, &item)?
            };
            println!("{}", added);
        }
        CfCommand::Exists { key, item } => println!("{}", client.cf_exists(&key, &item)?),
        CfCommand::Del { key, item } => println!("{}", client.cf_del(&key, &item)?),
        CfCommand::Count { key, item } => println!("{}", client.cf_count(&key, &item)?),
        CfCommand::Info { key } => print_json(&client.cf_info(&key)?)?,
        CfCommand::Archive(ArchiveCommand::Save { key, file }) => {
            let written = dump::save(&file, &cuckoo::dump(client, &key)?)?;
            println!("saved {} chunks to {}", written, file.display());
        }
        CfCommand::Archive(ArchiveCommand::Load { key, file }) => {
            let chunks = dump::load(&file)?;
            cuckoo::restore(client, &key, &chunks)?;
            println!("loaded {} chunks into {}", chunks.len(), key);
        }
    }
    Ok(())
}

fn run_cms(client: &mut Client<TcpConnection>, cmd: CmsCommand) -> bloomkv::Result<()> {
    match cmd {
        CmsCommand::InitByDim { key, width, depth } => {
            println!("{}", client.cms_init_by_dim(&key, width, depth)?);
        }
        CmsCommand::InitByProb { key, error, probability } => {
            println!("{}", client.cms_init_by_prob(&key, error, probability)?);
        }
        CmsCommand::IncrBy { key, item, increment } => {
            println!("{}", client.cms_incr_by(&key, &item, increment)?);
        }
        CmsCommand::Query { key, items } => {
            println!("{:?}", client.cms_query(&key, &strs(&items))?);
        }
        CmsCommand::Merge { dest, sources, weights } => {
            let merged = match weights {
                Some(weights) => {
                    if weights.len() != sources.len() {
                        return Err(bloomkv::Error::Config(format!(
                            "{} weights given for {} sources",
                            weights.len(),
                            sources.len()
                        )));
                    }
                    let pairs: Vec<(&str, i64)> =
                        sources.iter().map(String::as_str).zip(weights).collect();
                    client.cms_merge_weighted(&dest, &pairs)?
                }
                None => client.cms_merge(&dest, &strs(&sources))?,
            };
            println!("{}", merged);
        }
        CmsCommand::Info { key } => print_json(&client.cms_info(&key)?)?,
    }
    Ok(())
}

fn run_topk(client: &mut Client<TcpConnection>, cmd: TopkCommand) -> bloomkv::Result<()> {
    match cmd {
        TopkCommand::Reserve { key, k, dims } => {
            let options = top_k::ReserveOptions {
                width: dims.width,
                depth: dims.depth,
                decay: dims.decay,
            };
            println!("{}", client.topk_reserve(&key, k, &options)?);
        }
        TopkCommand::Add { key, items } => {
            println!("{:?}", client.topk_add(&key, &strs(&items))?);
        }
        TopkCommand::List { key } => {
            for item in client.topk_list(&key)?.into_iter().flatten() {
                println!("{}", item);
            }
        }
        TopkCommand::Info { key } => print_json(&client.topk_info(&key)?)?,
    }
    Ok(())
}

fn strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

fn print_json<T: Serialize>(value: &T) -> bloomkv::Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| bloomkv::Error::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
