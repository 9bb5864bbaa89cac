use std::fs;
use std::path::Path;

use resjson::res::{DecodeOptions, Document, EncodeOptions, Result, decode_document, encode_document};

/// Decode limits shared by every command that reads `.res` input.
#[derive(clap::Args, Debug, Clone)]
pub struct DecodeFlags {
	#[arg(long = "max-depth", default_value_t = 64)]
	pub max_depth: u32,
	#[arg(long = "strict-properties")]
	pub strict_properties: bool,
	#[arg(long = "reject-multi-body")]
	pub reject_multi_body: bool,
}

impl DecodeFlags {
	pub(crate) fn options(&self, trace: bool) -> DecodeOptions {
		DecodeOptions {
			max_depth: self.max_depth,
			strict_properties: self.strict_properties,
			reject_multi_body: self.reject_multi_body,
			trace,
			..DecodeOptions::default()
		}
	}

	pub(crate) fn encode_options(&self, trace: bool) -> EncodeOptions {
		EncodeOptions {
			max_depth: self.max_depth,
			trace,
		}
	}
}

/// Read and decode a `.res` file.
pub(crate) fn read_document(path: &Path, options: &DecodeOptions) -> Result<Document> {
	let bytes = fs::read(path)?;
	decode_document(&bytes, options)
}

/// Read a JSON document and encode it to `.res` bytes.
pub(crate) fn encode_json_file(path: &Path, options: &EncodeOptions) -> Result<Vec<u8>> {
	let text = fs::read_to_string(path)?;
	let document = Document::from_json_str(&text)?;
	encode_document(&document, options)
}

/// Write output bytes, creating parent directories as needed.
///
/// Callers only reach this after the conversion has fully succeeded.
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		fs::create_dir_all(parent)?;
	}
	fs::write(path, bytes)?;
	Ok(())
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to render json: {err}"),
	}
}

/// Offset of the first differing byte, or the shorter length when one input is a prefix of the other.
pub(crate) fn first_difference(left: &[u8], right: &[u8]) -> Option<usize> {
	let shared = left.iter().zip(right).position(|(a, b)| a != b);
	match shared {
		Some(offset) => Some(offset),
		None if left.len() != right.len() => Some(left.len().min(right.len())),
		None => None,
	}
}
