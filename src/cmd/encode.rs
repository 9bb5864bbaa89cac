use std::path::PathBuf;

use resjson::res::{EncodeOptions, Result};

use crate::cmd::util::{encode_json_file, write_output};

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	#[arg(short = 'o', long = "output")]
	pub output: PathBuf,
	#[arg(long = "max-depth", default_value_t = 64)]
	pub max_depth: u32,
}

/// Encode a JSON document file into `.res` bytes.
pub fn run(args: Args, debug: bool) -> Result<()> {
	let options = EncodeOptions {
		max_depth: args.max_depth,
		trace: debug,
	};
	let bytes = encode_json_file(&args.input, &options)?;
	write_output(&args.output, &bytes)?;
	tracing::info!(input = %args.input.display(), output = %args.output.display(), bytes = bytes.len(), "encoded");
	Ok(())
}
