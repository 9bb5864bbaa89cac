use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::res::bytes::{Cursor, Writer};
use crate::res::document::u64_text;
use crate::res::{DecodeOptions, ResError, Result};

/// Reference to a resource stored in another file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalResource {
	/// Resource class name.
	#[serde(rename = "type")]
	pub type_name: String,
	/// Resource path, usually `res://...`.
	pub path: String,
	/// Resource UID.
	#[serde(with = "u64_text", default)]
	pub uid: u64,
}

/// Reference to a resource body stored later in the same file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalResource {
	/// Local path, usually `local://N`.
	pub path: String,
	/// Absolute byte offset of the body.
	#[serde(with = "u64_text", default)]
	pub offset: u64,
}

/// Decode the `u32`-counted string table.
pub fn decode_string_table(cursor: &mut Cursor<'_>, options: &DecodeOptions) -> Result<Vec<String>> {
	let count = cursor.read_u32_le()? as usize;
	if count > options.max_string_table_len {
		return Err(ResError::TableTooLarge {
			table: "string",
			count,
			max: options.max_string_table_len,
		});
	}

	let mut strings = Vec::with_capacity(bounded_capacity(count, cursor, 4));
	for _ in 0..count {
		strings.push(cursor.read_string(options.max_string_len)?);
	}
	Ok(strings)
}

/// Encode the string table in document order.
pub fn encode_string_table(writer: &mut Writer, strings: &[String]) -> Result<()> {
	writer.write_u32_le(strings.len() as u32);
	for item in strings {
		writer.write_string(item, false)?;
	}
	Ok(())
}

/// Decode the external resource table.
pub fn decode_external_table(cursor: &mut Cursor<'_>, options: &DecodeOptions) -> Result<Vec<ExternalResource>> {
	let count = cursor.read_u32_le()? as usize;
	let mut out = Vec::with_capacity(bounded_capacity(count, cursor, 16));
	for _ in 0..count {
		let type_name = cursor.read_string(options.max_string_len)?;
		let path = cursor.read_string(options.max_string_len)?;
		let uid = cursor.read_u64_le()?;
		out.push(ExternalResource { type_name, path, uid });
	}
	Ok(out)
}

/// Encode the external resource table.
pub fn encode_external_table(writer: &mut Writer, items: &[ExternalResource]) -> Result<()> {
	writer.write_u32_le(items.len() as u32);
	for item in items {
		writer.write_string(&item.type_name, false)?;
		writer.write_string(&item.path, false)?;
		writer.write_u64_le(item.uid);
	}
	Ok(())
}

/// Decode the internal resource table.
pub fn decode_internal_table(cursor: &mut Cursor<'_>, options: &DecodeOptions) -> Result<Vec<InternalResource>> {
	let count = cursor.read_u32_le()? as usize;
	let mut out = Vec::with_capacity(bounded_capacity(count, cursor, 12));
	for _ in 0..count {
		let path = cursor.read_string(options.max_string_len)?;
		let offset = cursor.read_u64_le()?;
		out.push(InternalResource { path, offset });
	}
	Ok(out)
}

/// Encode the internal resource table.
///
/// Returns the byte position of each entry's offset field so the caller can
/// patch body offsets once they are known.
pub fn encode_internal_table(writer: &mut Writer, items: &[InternalResource]) -> Result<Vec<usize>> {
	writer.write_u32_le(items.len() as u32);
	let mut offset_slots = Vec::with_capacity(items.len());
	for item in items {
		writer.write_string(&item.path, false)?;
		offset_slots.push(writer.len());
		writer.write_u64_le(item.offset);
	}
	Ok(offset_slots)
}

/// Reverse lookup from string-table text to index.
#[derive(Debug, Default)]
pub struct StringLookup {
	index: HashMap<String, u32>,
}

impl StringLookup {
	/// Build the lookup once per encode. Duplicates resolve to their first index.
	pub fn build(strings: &[String]) -> Self {
		let mut index = HashMap::with_capacity(strings.len());
		for (idx, item) in strings.iter().enumerate() {
			index.entry(item.clone()).or_insert(idx as u32);
		}
		Self { index }
	}

	/// Index of `name`, if present.
	pub fn get(&self, name: &str) -> Option<u32> {
		self.index.get(name).copied()
	}

	/// Index of `name`; absent names fail. The table is never extended.
	pub fn index_of(&self, name: &str) -> Result<u32> {
		self.get(name).ok_or_else(|| ResError::UnknownString { name: name.to_owned() })
	}
}

// Each record needs at least `min_record` bytes, which caps preallocation for hostile counts.
fn bounded_capacity(count: usize, cursor: &Cursor<'_>, min_record: usize) -> usize {
	count.min(cursor.remaining() / min_record)
}
