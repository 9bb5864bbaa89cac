mod bytes;
mod decode;
mod document;
mod encode;
mod error;
mod header;
mod phase;
mod tables;
mod variant;
mod variant_json;

/// Byte cursor, writer, and string limits.
pub use bytes::{Cursor, INLINE_STRING_FLAG, MAX_STRING_LEN, Writer};
/// Decoding entry points and options.
pub use decode::{CONTAINER_COUNT_MASK, DecodeOptions, NODE_PATH_ABSOLUTE_FLAG, VariantContext, decode_document, decode_variant};
/// Document model.
pub use document::{Document, Properties, ResourceBody, u64_text};
/// Encoding entry points and options.
pub use encode::{EncodeContext, EncodeOptions, encode_document, encode_variant};
/// Error, taxonomy, and result aliases.
pub use error::{ErrorKind, ResError, Result};
/// File header representation and feature flags.
pub use header::{
	COMPRESSED_MAGIC, FLAG_HAS_SCRIPT_CLASS, FLAG_NAMED_SCENE_IDS, FLAG_REAL_T_IS_DOUBLE, FLAG_UIDS, MAGIC, RESERVED_FIELDS, ResHeader,
};
/// Conversion phases.
pub use phase::Phase;
/// String and resource table codecs.
pub use tables::{
	ExternalResource, InternalResource, StringLookup, decode_external_table, decode_internal_table, decode_string_table,
	encode_external_table, encode_internal_table, encode_string_table,
};
/// Variant model.
pub use variant::{NodePath, ObjectRef, Variant, VariantTag};
