use std::path::PathBuf;

use resjson::res::Result;

use crate::cmd::util::{DecodeFlags, read_document, write_output};

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	#[arg(short = 'o', long = "output")]
	pub output: Option<PathBuf>,
	#[arg(long)]
	pub compact: bool,
	#[command(flatten)]
	pub flags: DecodeFlags,
}

/// Decode a `.res` file and print or write its JSON document.
pub fn run(args: Args, debug: bool) -> Result<()> {
	let Args {
		input,
		output,
		compact,
		flags,
	} = args;

	let document = read_document(&input, &flags.options(debug))?;
	let text = document.to_json_string(!compact)?;

	match output {
		Some(path) => {
			write_output(&path, format!("{text}\n").as_bytes())?;
			tracing::info!(input = %input.display(), output = %path.display(), "decoded");
		}
		None => println!("{text}"),
	}
	Ok(())
}
