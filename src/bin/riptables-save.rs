use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Decode iptables-save output and print it as JSON.
#[derive(Parser, Debug)]
#[command(name = "riptables-save", version, about = "Decode iptables-save output into JSON")]
struct Args {
  /// iptables-save output to read, `-` or nothing for stdin.
  input: Option<PathBuf>,

  /// Only print this table.
  #[arg(short, long)]
  table: Option<String>,

  /// Print single-line JSON.
  #[arg(long)]
  compact: bool,

  /// Log level, overridden by RUST_LOG.
  #[arg(long, default_value = "warn")]
  log_level: String,
}

fn main() {
  let args = Args::parse();
  init_tracing(&args.log_level);

  if let Err(e) = run(&args) {
    error!("{}", e);
    eprintln!("riptables-save: {}", e);
    process::exit(1);
  }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
  let text = match args.input {
    Some(ref path) if path.as_os_str() != "-" => fs::read_to_string(path)?,
    _ => {
      let mut text = String::new();
      io::stdin().read_to_string(&mut text)?;
      text
    }
  };

  let document = riptables_save::decode(&text)?;
  let value = match args.table {
    Some(ref table) => match document.table(table) {
      Some(chains) => serde_json::to_value(chains)?,
      None => return Err(format!("table [{}] not found", table).into()),
    },
    None => serde_json::to_value(&document)?,
  };

  let output = if args.compact {
    serde_json::to_string(&value)?
  } else {
    serde_json::to_string_pretty(&value)?
  };
  println!("{}", output);
  Ok(())
}

fn init_tracing(level: &str) {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(level))
    .unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(io::stderr))
    .init();
}
