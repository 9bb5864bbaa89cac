use std::path::PathBuf;

use resjson::res::{Document, Result};

use crate::cmd::util::{DecodeFlags, emit_json, read_document};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	#[command(flatten)]
	pub flags: DecodeFlags,
}

/// Print header fields, table sizes, and the body summary.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json, flags } = args;
	let document = read_document(&path, &flags.options(false))?;
	let payload = summarize(&path, &document);

	if json {
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", payload.path);
	println!("magic: {}", payload.magic);
	println!("version: {}.{} (format {})", payload.ver_major, payload.ver_minor, payload.ver_format);
	println!("resource_type: {}", payload.resource_type);
	println!("flags: 0x{:08x}", payload.flags);
	println!("real_t_is_double: {}", payload.real_t_is_double);
	println!("uid: {}", payload.uid);
	if let Some(script_class) = &payload.script_class {
		println!("script_class: {script_class}");
	}
	println!("strings: {}", payload.strings);
	println!("external_resources: {}", payload.external_resources);
	println!("internal_resources: {}", payload.internal_resources);
	match &payload.body_type {
		Some(body_type) => println!("body: {body_type} ({} properties)", payload.properties),
		None => println!("body: -"),
	}
	Ok(())
}

fn summarize(path: &std::path::Path, document: &Document) -> InfoJson {
	let header = &document.header;
	InfoJson {
		path: path.display().to_string(),
		magic: header.magic.clone(),
		ver_major: header.ver_major,
		ver_minor: header.ver_minor,
		ver_format: header.ver_format,
		resource_type: header.resource_type.clone(),
		flags: header.flags,
		real_t_is_double: header.real_t_is_double,
		uid: header.uid.to_string(),
		script_class: header.has_script_class.then(|| header.script_class.clone()),
		strings: document.string_table.len(),
		external_resources: document.external_resources.len(),
		internal_resources: document.internal_resources.len(),
		body_type: document.resource_body.as_ref().map(|body| body.type_name.clone()),
		properties: document.resource_body.as_ref().map_or(0, |body| body.properties.len()),
	}
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	magic: String,
	ver_major: u32,
	ver_minor: u32,
	ver_format: u32,
	resource_type: String,
	flags: u32,
	real_t_is_double: bool,
	uid: String,
	script_class: Option<String>,
	strings: usize,
	external_resources: usize,
	internal_resources: usize,
	body_type: Option<String>,
	properties: usize,
}
