mod config;
mod query;
mod store;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use crate::query::{LookupQuery, QueryState};
use crate::store::client::StoreClient;
use crate::store::types::Record;

#[derive(Parser, Debug)]
#[command(name = "shopfront")]
#[command(about = "Probe a storefront REST backend")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/shopfront/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Resource collection to query (default: config default_resource)
  #[arg(short, long)]
  resource: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Look up a record by id, scanning the collection if the direct
  /// endpoint yields nothing
  Get { id: String },

  /// Fetch and print a full collection
  List,

  /// Poll a record by id, printing each state transition
  Watch {
    id: String,

    /// Seconds between refetches
    #[arg(long, default_value_t = 5)]
    interval: u64,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?;

  let resource = args
    .resource
    .or_else(|| config.default_resource.clone())
    .ok_or_else(|| eyre!("No resource given. Pass --resource or set default_resource."))?;

  let client = StoreClient::from_config(&config)?
    .ok_or_else(|| eyre!("No backend configured. Set backend.url in the config file."))?;

  match args.command {
    Command::Get { id } => get(&client, &resource, &id).await,
    Command::List => list(&client, &resource).await,
    Command::Watch { id, interval } => watch(client, resource, id, interval).await,
  }
}

async fn get(client: &StoreClient, resource: &str, id: &str) -> Result<()> {
  match client.lookup(resource, id).await? {
    Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
    None => println!("{}/{}: not found", resource, id),
  }
  Ok(())
}

async fn list(client: &StoreClient, resource: &str) -> Result<()> {
  let records = client.fetch_collection(resource).await?;
  println!("{}: {} records", resource, records.len());
  println!("{}", serde_json::to_string_pretty(&records)?);
  Ok(())
}

/// Drive a LookupQuery from a tick loop, refetching every `interval`
/// seconds, until interrupted.
async fn watch(client: StoreClient, resource: String, id: String, interval: u64) -> Result<()> {
  let mut lookup = LookupQuery::new(move |key: String| {
    let client = client.clone();
    let resource = resource.clone();
    async move {
      client
        .lookup(&resource, &key)
        .await
        .map_err(|e| e.to_string())
    }
  });

  lookup.set_key(Some(id.as_str()));

  let mut ticker = tokio::time::interval(Duration::from_millis(250));
  let mut next_refetch = Instant::now() + Duration::from_secs(interval);

  loop {
    ticker.tick().await;

    if lookup.poll() {
      print_state(&id, lookup.state())?;
    }

    if Instant::now() >= next_refetch && !lookup.is_loading() {
      lookup.refetch();
      next_refetch = Instant::now() + Duration::from_secs(interval);
    }
  }
}

fn print_state(id: &str, state: &QueryState<Option<Record>>) -> Result<()> {
  match state {
    QueryState::Success(Some(record)) => println!("{}", serde_json::to_string_pretty(record)?),
    QueryState::Success(None) => println!("{}: not found", id),
    QueryState::Error(e) => println!("{}: error: {}", id, e),
    QueryState::Idle | QueryState::Loading => {}
  }
  Ok(())
}
