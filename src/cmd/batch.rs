use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use resjson::res::Result;

use crate::cmd::util::{DecodeFlags, emit_json, encode_json_file, read_document, write_output};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
	Json,
	Res,
}

impl Target {
	fn input_extension(self) -> &'static str {
		match self {
			Self::Json => "res",
			Self::Res => "json",
		}
	}

	fn output_extension(self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Res => "res",
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	pub dir: PathBuf,
	#[arg(long, value_enum)]
	pub to: Target,
	#[arg(short = 'o', long = "output")]
	pub output: Option<PathBuf>,
	#[arg(long)]
	pub json: bool,
	#[command(flatten)]
	pub flags: DecodeFlags,
}

/// Convert every matching file in `dir`, one independent conversion per file.
pub fn run(args: Args, debug: bool) -> Result<()> {
	let Args {
		dir,
		to,
		output,
		json,
		flags,
	} = args;
	let out_dir = output.unwrap_or_else(|| dir.clone());

	let inputs = collect_inputs(&dir, to.input_extension())?;
	let mut results = Vec::with_capacity(inputs.len());
	for input in &inputs {
		let target = output_path(&out_dir, input, to.output_extension());
		let outcome = convert(input, &target, to, &flags, debug);
		if let Err(err) = &outcome {
			tracing::warn!(input = %input.display(), error = %err, "conversion failed");
		}
		results.push(FileJson {
			input: input.display().to_string(),
			output: target.display().to_string(),
			error: outcome.err().map(|err| err.to_string()),
		});
	}

	let ok = results.iter().filter(|item| item.error.is_none()).count();
	if json {
		emit_json(&BatchJson {
			ok,
			total: results.len(),
			files: results,
		});
		return Ok(());
	}

	for item in &results {
		match &item.error {
			None => println!("ok {} -> {}", item.input, item.output),
			Some(err) => println!("FAIL {}: {err}", item.input),
		}
	}
	println!("{ok}/{} converted", results.len());
	Ok(())
}

fn collect_inputs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
	let mut inputs = Vec::new();
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			inputs.push(path);
		}
	}
	inputs.sort();
	Ok(inputs)
}

fn output_path(out_dir: &Path, input: &Path, extension: &str) -> PathBuf {
	let stem = input.file_stem().map_or_else(|| "out".into(), OsStr::to_string_lossy);
	out_dir.join(format!("{stem}.{extension}"))
}

fn convert(input: &Path, target: &Path, to: Target, flags: &DecodeFlags, debug: bool) -> Result<()> {
	let bytes = match to {
		Target::Json => {
			let document = read_document(input, &flags.options(debug))?;
			let mut text = document.to_json_string(true)?;
			text.push('\n');
			text.into_bytes()
		}
		Target::Res => encode_json_file(input, &flags.encode_options(debug))?,
	};
	write_output(target, &bytes)
}

#[derive(serde::Serialize)]
struct FileJson {
	input: String,
	output: String,
	error: Option<String>,
}

#[derive(serde::Serialize)]
struct BatchJson {
	ok: usize,
	total: usize,
	files: Vec<FileJson>,
}
