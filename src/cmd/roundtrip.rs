use std::fs;
use std::path::PathBuf;

use resjson::res::{Document, Result, decode_document, encode_document};

use crate::cmd::util::{DecodeFlags, emit_json, first_difference};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	#[command(flatten)]
	pub flags: DecodeFlags,
}

/// Decode, pass through JSON text, re-encode, and compare with the input bytes.
pub fn run(args: Args, debug: bool) -> Result<()> {
	let Args { path, json, flags } = args;

	let original = fs::read(&path)?;
	let document = decode_document(&original, &flags.options(debug))?;
	let text = document.to_json_string(false)?;
	let reparsed = Document::from_json_str(&text)?;
	let encoded = encode_document(&reparsed, &flags.encode_options(debug))?;
	let difference = first_difference(&original, &encoded);

	let payload = RoundtripJson {
		path: path.display().to_string(),
		identical: difference.is_none(),
		first_difference: difference,
		input_len: original.len(),
		output_len: encoded.len(),
	};
	if json {
		emit_json(&payload);
		return Ok(());
	}

	match payload.first_difference {
		None => println!("{}: identical ({} bytes)", payload.path, payload.input_len),
		Some(offset) => println!(
			"{}: differs at offset {offset} (input {} bytes, re-encoded {} bytes)",
			payload.path, payload.input_len, payload.output_len
		),
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct RoundtripJson {
	path: String,
	identical: bool,
	first_difference: Option<usize>,
	input_len: usize,
	output_len: usize,
}
