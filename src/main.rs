#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "resjson", about = "Binary resource (.res) <-> JSON conversion tools")]
struct Cli {
	/// Enable codec phase and property tracing on stderr.
	#[arg(long, global = true)]
	debug: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode a `.res` file into JSON.
	Decode(cmd::decode::Args),
	/// Encode a JSON document into a `.res` file.
	Encode(cmd::encode::Args),
	/// Print header fields and table sizes.
	Info(cmd::info::Args),
	/// Decode, re-encode, and compare bytes.
	Roundtrip(cmd::roundtrip::Args),
	/// Convert every file in a directory.
	Batch(cmd::batch::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.debug);

	if let Err(err) = run(cli) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing(debug: bool) {
	let default = if debug { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: Cli) -> resjson::res::Result<()> {
	let debug = cli.debug;
	match cli.command {
		Commands::Decode(args) => cmd::decode::run(args, debug),
		Commands::Encode(args) => cmd::encode::run(args, debug),
		Commands::Info(args) => cmd::info::run(args),
		Commands::Roundtrip(args) => cmd::roundtrip::run(args, debug),
		Commands::Batch(args) => cmd::batch::run(args, debug),
	}
}
