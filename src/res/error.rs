use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ResError>;

/// Coarse error taxonomy used by callers that only need to branch on failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Malformed or oversized length fields, truncated buffers, bad offsets.
	Format,
	/// Variant tag the codec does not implement.
	UnsupportedVariant,
	/// Encode-time reference to a name absent from the string table.
	UnknownString,
	/// Encode-time value with no representable variant mapping.
	UnsupportedValue,
	/// Filesystem or stream failure in the collaborator layer.
	Io,
	/// JSON syntax or shape failure in the collaborator layer.
	Json,
}

/// Errors produced while decoding or encoding `.res` data.
#[derive(Debug, Error)]
pub enum ResError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON parse or serialization failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Declared string length exceeded the configured cap.
	#[error("string length {len} at offset {at} exceeds limit {max}")]
	StringTooLong {
		/// Offset of the length field.
		at: usize,
		/// Declared byte length.
		len: usize,
		/// Maximum permitted length.
		max: usize,
	},
	/// String payload was not valid UTF-8.
	#[error("invalid utf-8 string at offset {at}")]
	InvalidUtf8 {
		/// Offset of the string payload.
		at: usize,
	},
	/// Table entry count exceeded the configured cap.
	#[error("{table} table too large: count={count}, max={max}")]
	TableTooLarge {
		/// Logical table name.
		table: &'static str,
		/// Declared entry count.
		count: usize,
		/// Maximum permitted count.
		max: usize,
	},
	/// Seek target lies outside the buffer.
	#[error("offset {offset} out of range for buffer of {len} bytes")]
	OffsetOutOfRange {
		/// Requested absolute offset.
		offset: u64,
		/// Buffer length.
		len: usize,
	},
	/// String-table index read from the stream is out of range.
	#[error("string index {index} out of range (table has {len} entries)")]
	StringIndexOutOfRange {
		/// Offending index.
		index: u32,
		/// String table length.
		len: usize,
	},
	/// `OBJECT` variant carried a subtype outside 0..=3.
	#[error("invalid object subtype {subtype} at offset {at}")]
	InvalidObjectSubtype {
		/// Raw subtype value.
		subtype: u32,
		/// Offset of the subtype field.
		at: usize,
	},
	/// Resource is stored in the compressed container.
	#[error("compressed resources (RSCC) are not supported")]
	CompressedUnsupported,
	/// Variant nesting exceeded the configured depth.
	#[error("variant depth exceeded (max={max_depth}) at offset {at}")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
		/// Offset where the nested variant started.
		at: usize,
	},
	/// Internal resource table lists more than one body and rejection is enabled.
	#[error("document has {count} internal resources; only single-body documents are supported")]
	MultipleResourceBodies {
		/// Number of internal resource entries.
		count: usize,
	},
	/// Variant tag is recognised but not implemented, or not part of the enumeration.
	#[error("unsupported variant tag {tag} ({name}) at offset {at}")]
	UnsupportedVariant {
		/// Raw tag value.
		tag: u32,
		/// Symbolic tag name.
		name: &'static str,
		/// Offset of the tag field.
		at: usize,
	},
	/// Property name is missing from the string table.
	#[error("string not found in string table: {name:?}")]
	UnknownString {
		/// Requested name.
		name: String,
	},
	/// Document value has no variant representation.
	#[error("unsupported value: {reason}")]
	UnsupportedValue {
		/// Human-readable description of the rejected value.
		reason: String,
	},
	/// Header magic is not exactly four bytes.
	#[error("invalid magic {magic:?} (expected 4 bytes)")]
	InvalidMagic {
		/// Provided magic text.
		magic: String,
	},
	/// Integer text field could not be parsed.
	#[error("invalid integer for {field}: {text:?}")]
	InvalidInteger {
		/// Logical field name.
		field: &'static str,
		/// Offending text.
		text: String,
	},
	/// Document has a resource body but no internal resource entry to locate it.
	#[error("resource body present but internal resource table is empty")]
	BodyWithoutInternalEntry,
}

impl ResError {
	/// Map this error onto the coarse taxonomy.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) => ErrorKind::Io,
			Self::Json(_) => ErrorKind::Json,
			Self::UnexpectedEof { .. }
			| Self::StringTooLong { .. }
			| Self::InvalidUtf8 { .. }
			| Self::TableTooLarge { .. }
			| Self::OffsetOutOfRange { .. }
			| Self::StringIndexOutOfRange { .. }
			| Self::InvalidObjectSubtype { .. }
			| Self::CompressedUnsupported
			| Self::DepthExceeded { .. }
			| Self::MultipleResourceBodies { .. } => ErrorKind::Format,
			Self::UnsupportedVariant { .. } => ErrorKind::UnsupportedVariant,
			Self::UnknownString { .. } => ErrorKind::UnknownString,
			Self::UnsupportedValue { .. } | Self::InvalidMagic { .. } | Self::InvalidInteger { .. } | Self::BodyWithoutInternalEntry => {
				ErrorKind::UnsupportedValue
			}
		}
	}

	pub(crate) fn unsupported_value(reason: impl Into<String>) -> Self {
		Self::UnsupportedValue { reason: reason.into() }
	}
}
