use serde::{Deserialize, Serialize};

use crate::res::bytes::{Cursor, Writer};
use crate::res::document::u64_text;
use crate::res::{DecodeOptions, ResError, Result};

/// Feature bit: scene ids are named.
pub const FLAG_NAMED_SCENE_IDS: u32 = 0x01;
/// Feature bit: external resources carry UIDs.
pub const FLAG_UIDS: u32 = 0x02;
/// Feature bit: real-valued math components are stored as doubles.
pub const FLAG_REAL_T_IS_DOUBLE: u32 = 0x04;
/// Feature bit: a script-class name follows the UID.
pub const FLAG_HAS_SCRIPT_CLASS: u32 = 0x08;

/// Number of reserved `u32` slots closing the header.
pub const RESERVED_FIELDS: usize = 11;

/// Magic of an uncompressed resource; also used as the trailing sentinel.
pub const MAGIC: [u8; 4] = *b"RSRC";
/// Magic of the compressed container.
pub const COMPRESSED_MAGIC: [u8; 4] = *b"RSCC";

/// Resource file prologue.
///
/// `flags` is authoritative. The `has_*` and `real_t_is_double` fields are
/// views of its bits, recomputed on decode and ignored on encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResHeader {
	/// Four-byte magic tag, normally `RSRC`.
	pub magic: String,
	/// Authoring platform was big-endian (informational).
	#[serde(default)]
	pub big_endian: bool,
	/// Authoring platform used 64-bit reals (informational).
	#[serde(default)]
	pub use_real64: bool,
	/// Engine major version.
	pub ver_major: u32,
	/// Engine minor version.
	pub ver_minor: u32,
	/// Binary format version.
	pub ver_format: u32,
	/// Class name of the main resource.
	pub resource_type: String,
	/// Offset of import metadata, zero when absent.
	#[serde(with = "u64_text", default)]
	pub import_metadata_offset: u64,
	/// Feature bitfield.
	#[serde(default)]
	pub flags: u32,
	/// Resource UID.
	#[serde(with = "u64_text", default)]
	pub uid: u64,
	/// Script class name, meaningful only when [`FLAG_HAS_SCRIPT_CLASS`] is set.
	#[serde(default)]
	pub script_class: String,
	/// View of [`FLAG_NAMED_SCENE_IDS`].
	#[serde(default)]
	pub has_named_scene_ids: bool,
	/// View of [`FLAG_UIDS`].
	#[serde(default)]
	pub has_uids: bool,
	/// View of [`FLAG_HAS_SCRIPT_CLASS`].
	#[serde(default)]
	pub has_script_class: bool,
	/// View of [`FLAG_REAL_T_IS_DOUBLE`].
	#[serde(default)]
	pub real_t_is_double: bool,
}

impl ResHeader {
	/// Build a header for `resource_type` with the given feature flags.
	pub fn new(resource_type: impl Into<String>, flags: u32) -> Self {
		let mut header = Self {
			magic: "RSRC".to_owned(),
			big_endian: false,
			use_real64: false,
			ver_major: 4,
			ver_minor: 0,
			ver_format: 6,
			resource_type: resource_type.into(),
			import_metadata_offset: 0,
			flags,
			uid: 0,
			script_class: String::new(),
			has_named_scene_ids: false,
			has_uids: false,
			has_script_class: false,
			real_t_is_double: false,
		};
		header.sync_flag_views();
		header
	}

	/// Decode the header at the cursor position.
	pub fn decode(cursor: &mut Cursor<'_>, options: &DecodeOptions) -> Result<Self> {
		let magic = cursor.read_code4()?;
		if magic == COMPRESSED_MAGIC {
			return Err(ResError::CompressedUnsupported);
		}
		let magic = std::str::from_utf8(&magic)
			.map(str::to_owned)
			.map_err(|_| ResError::InvalidUtf8 { at: 0 })?;

		let big_endian = cursor.read_u32_le()? != 0;
		let use_real64 = cursor.read_u32_le()? != 0;
		let ver_major = cursor.read_u32_le()?;
		let ver_minor = cursor.read_u32_le()?;
		let ver_format = cursor.read_u32_le()?;
		let resource_type = cursor.read_string(options.max_string_len)?;
		let import_metadata_offset = cursor.read_u64_le()?;
		let flags = cursor.read_u32_le()?;
		let uid = cursor.read_u64_le()?;

		let script_class = if flags & FLAG_HAS_SCRIPT_CLASS != 0 {
			cursor.read_string(options.max_string_len)?
		} else {
			String::new()
		};

		for _ in 0..RESERVED_FIELDS {
			let _ = cursor.read_u32_le()?;
		}

		let mut header = Self {
			magic,
			big_endian,
			use_real64,
			ver_major,
			ver_minor,
			ver_format,
			resource_type,
			import_metadata_offset,
			flags,
			uid,
			script_class,
			has_named_scene_ids: false,
			has_uids: false,
			has_script_class: false,
			real_t_is_double: false,
		};
		header.sync_flag_views();
		Ok(header)
	}

	/// Encode the header. Reserved slots are always zero.
	pub fn encode(&self, writer: &mut Writer) -> Result<()> {
		let magic = self.magic.as_bytes();
		if magic.len() != 4 {
			return Err(ResError::InvalidMagic { magic: self.magic.clone() });
		}

		writer.write_bytes(magic);
		writer.write_u32_le(u32::from(self.big_endian));
		writer.write_u32_le(u32::from(self.use_real64));
		writer.write_u32_le(self.ver_major);
		writer.write_u32_le(self.ver_minor);
		writer.write_u32_le(self.ver_format);
		writer.write_string(&self.resource_type, false)?;
		writer.write_u64_le(self.import_metadata_offset);
		writer.write_u32_le(self.flags);
		writer.write_u64_le(self.uid);
		if self.flags & FLAG_HAS_SCRIPT_CLASS != 0 {
			writer.write_string(&self.script_class, false)?;
		}
		for _ in 0..RESERVED_FIELDS {
			writer.write_u32_le(0);
		}
		Ok(())
	}

	/// Whether math payloads use 8-byte reals.
	pub fn reals_are_double(&self) -> bool {
		self.flags & FLAG_REAL_T_IS_DOUBLE != 0
	}

	/// Recompute the boolean flag views from `flags`.
	pub fn sync_flag_views(&mut self) {
		self.has_named_scene_ids = self.flags & FLAG_NAMED_SCENE_IDS != 0;
		self.has_uids = self.flags & FLAG_UIDS != 0;
		self.real_t_is_double = self.flags & FLAG_REAL_T_IS_DOUBLE != 0;
		self.has_script_class = self.flags & FLAG_HAS_SCRIPT_CLASS != 0;
	}
}
