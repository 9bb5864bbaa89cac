use crate::res::bytes::{Cursor, INLINE_STRING_FLAG, MAX_STRING_LEN};
use crate::res::header::MAGIC;
use crate::res::phase::{Phase, PhaseTracker};
use crate::res::tables::{decode_external_table, decode_internal_table, decode_string_table};
use crate::res::{Document, InternalResource, NodePath, ObjectRef, Properties, ResError, ResHeader, ResourceBody, Result, Variant, VariantTag};

/// Mask clearing the "shared" marker on array and dictionary counts.
pub const CONTAINER_COUNT_MASK: u32 = 0x7FFF_FFFF;

/// Bit in a node path's subname count marking an absolute path.
pub const NODE_PATH_ABSOLUTE_FLAG: u16 = 0x8000;

/// Runtime limits and behavior switches for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum variant nesting depth.
	pub max_depth: u32,
	/// Maximum declared byte length of any string.
	pub max_string_len: usize,
	/// Maximum string-table entry count.
	pub max_string_table_len: usize,
	/// Propagate property decode failures instead of truncating the property list.
	pub strict_properties: bool,
	/// Fail on documents whose internal table lists more than one body.
	pub reject_multi_body: bool,
	/// Emit per-phase and per-property trace events.
	pub trace: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_string_len: MAX_STRING_LEN,
			max_string_table_len: 100_000,
			strict_properties: false,
			reject_multi_body: false,
			trace: false,
		}
	}
}

/// Read-only state shared by every variant decoded from one document.
#[derive(Debug, Clone, Copy)]
pub struct VariantContext<'s> {
	/// String table for node-path index resolution.
	pub strings: &'s [String],
	/// Real-valued math components are 8 bytes wide.
	pub real_is_double: bool,
	/// Maximum nesting depth.
	pub max_depth: u32,
	/// Maximum declared string length.
	pub max_string_len: usize,
}

impl<'s> VariantContext<'s> {
	/// Build a context from decode options.
	pub fn new(strings: &'s [String], real_is_double: bool, options: &DecodeOptions) -> Self {
		Self {
			strings,
			real_is_double,
			max_depth: options.max_depth,
			max_string_len: options.max_string_len,
		}
	}
}

/// Decode a full `.res` buffer.
pub fn decode_document(bytes: &[u8], options: &DecodeOptions) -> Result<Document> {
	Decoder::new(bytes, options).run()
}

/// Decode one tagged variant at the cursor position.
///
/// `depth` is the nesting level of this value; top-level values pass `0`.
pub fn decode_variant(cursor: &mut Cursor<'_>, ctx: &VariantContext<'_>, depth: u32) -> Result<Variant> {
	let at = cursor.pos();
	if depth >= ctx.max_depth {
		return Err(ResError::DepthExceeded {
			max_depth: ctx.max_depth,
			at,
		});
	}

	let raw = cursor.read_u32_le()?;
	let Some(tag) = VariantTag::from_u32(raw) else {
		return Err(ResError::UnsupportedVariant {
			tag: raw,
			name: VariantTag::name_of(raw),
			at,
		});
	};

	let value = match tag {
		VariantTag::Nil => Variant::Nil,
		VariantTag::Bool => Variant::Bool(cursor.read_u32_le()? != 0),
		VariantTag::Int => Variant::Int(cursor.read_i32_le()?),
		VariantTag::Float => Variant::Float(cursor.read_f32_le()?),
		VariantTag::String => Variant::String(cursor.read_string(ctx.max_string_len)?),
		VariantTag::StringName => Variant::StringName(cursor.read_string(ctx.max_string_len)?),
		VariantTag::Int64 => Variant::Int64(cursor.read_i64_le()?),
		VariantTag::Double => Variant::Double(cursor.read_f64_le()?),
		VariantTag::Vector2 => Variant::Vector2(read_reals(cursor, ctx)?),
		VariantTag::Rect2 => Variant::Rect2(read_reals(cursor, ctx)?),
		VariantTag::Vector3 => Variant::Vector3(read_reals(cursor, ctx)?),
		VariantTag::Plane => Variant::Plane(read_reals(cursor, ctx)?),
		VariantTag::Quaternion => Variant::Quaternion(read_reals(cursor, ctx)?),
		VariantTag::Aabb => Variant::Aabb(read_reals(cursor, ctx)?),
		VariantTag::Basis => Variant::Basis(read_reals(cursor, ctx)?),
		VariantTag::Transform3d => Variant::Transform3d(read_reals(cursor, ctx)?),
		VariantTag::Transform2d => Variant::Transform2d(read_reals(cursor, ctx)?),
		VariantTag::Vector4 => Variant::Vector4(read_reals(cursor, ctx)?),
		VariantTag::Projection => Variant::Projection(read_reals(cursor, ctx)?),
		VariantTag::Color => {
			let mut out = [0.0_f32; 4];
			for slot in &mut out {
				*slot = cursor.read_f32_le()?;
			}
			Variant::Color(out)
		}
		VariantTag::Vector2i => Variant::Vector2i(read_ints(cursor)?),
		VariantTag::Rect2i => Variant::Rect2i(read_ints(cursor)?),
		VariantTag::Vector3i => Variant::Vector3i(read_ints(cursor)?),
		VariantTag::Vector4i => Variant::Vector4i(read_ints(cursor)?),
		VariantTag::Array => {
			let count = (cursor.read_u32_le()? & CONTAINER_COUNT_MASK) as usize;
			let mut items = Vec::with_capacity(count.min(cursor.remaining() / 4));
			for _ in 0..count {
				items.push(decode_variant(cursor, ctx, depth + 1)?);
			}
			Variant::Array(items)
		}
		VariantTag::Dictionary => {
			let count = (cursor.read_u32_le()? & CONTAINER_COUNT_MASK) as usize;
			let mut pairs = Vec::with_capacity(count.min(cursor.remaining() / 8));
			for _ in 0..count {
				let key = decode_variant(cursor, ctx, depth + 1)?;
				let value = decode_variant(cursor, ctx, depth + 1)?;
				pairs.push((key, value));
			}
			Variant::Dictionary(pairs)
		}
		VariantTag::Object => Variant::Object(decode_object(cursor, ctx)?),
		VariantTag::NodePath => Variant::NodePath(decode_node_path(cursor, ctx)?),
		VariantTag::Rid
		| VariantTag::InputEvent
		| VariantTag::Callable
		| VariantTag::Signal
		| VariantTag::PackedByteArray
		| VariantTag::PackedInt32Array
		| VariantTag::PackedFloat32Array
		| VariantTag::PackedStringArray
		| VariantTag::PackedVector3Array
		| VariantTag::PackedColorArray
		| VariantTag::PackedVector2Array
		| VariantTag::PackedInt64Array
		| VariantTag::PackedFloat64Array
		| VariantTag::PackedVector4Array => {
			return Err(ResError::UnsupportedVariant {
				tag: raw,
				name: tag.name(),
				at,
			});
		}
	};
	Ok(value)
}

fn read_reals<const N: usize>(cursor: &mut Cursor<'_>, ctx: &VariantContext<'_>) -> Result<[f64; N]> {
	let mut out = [0.0; N];
	for slot in &mut out {
		*slot = if ctx.real_is_double {
			cursor.read_f64_le()?
		} else {
			f64::from(cursor.read_f32_le()?)
		};
	}
	Ok(out)
}

fn read_ints<const N: usize>(cursor: &mut Cursor<'_>) -> Result<[i32; N]> {
	let mut out = [0; N];
	for slot in &mut out {
		*slot = cursor.read_i32_le()?;
	}
	Ok(out)
}

fn decode_object(cursor: &mut Cursor<'_>, ctx: &VariantContext<'_>) -> Result<ObjectRef> {
	let at = cursor.pos();
	let object = match cursor.read_u32_le()? {
		0 => ObjectRef::Null,
		1 => ObjectRef::External {
			index: cursor.read_u32_le()?,
		},
		2 => ObjectRef::Internal {
			index: cursor.read_u32_le()?,
		},
		3 => {
			let len = cursor.read_u32_le()? as usize;
			ObjectRef::Inline {
				path: cursor.read_raw_string(len, ctx.max_string_len)?,
			}
		}
		subtype => return Err(ResError::InvalidObjectSubtype { subtype, at }),
	};
	Ok(object)
}

fn decode_node_path(cursor: &mut Cursor<'_>, ctx: &VariantContext<'_>) -> Result<NodePath> {
	let name_count = cursor.read_u16_le()?;
	let raw_subnames = cursor.read_u16_le()?;
	let absolute = raw_subnames & NODE_PATH_ABSOLUTE_FLAG != 0;
	let subname_count = raw_subnames & !NODE_PATH_ABSOLUTE_FLAG;

	let mut names = Vec::with_capacity(usize::from(name_count));
	for _ in 0..name_count {
		names.push(decode_path_component(cursor, ctx)?);
	}
	let mut subnames = Vec::with_capacity(usize::from(subname_count));
	for _ in 0..subname_count {
		subnames.push(decode_path_component(cursor, ctx)?);
	}

	Ok(NodePath { names, subnames, absolute })
}

fn decode_path_component(cursor: &mut Cursor<'_>, ctx: &VariantContext<'_>) -> Result<String> {
	let word = cursor.read_u32_le()?;
	if word & INLINE_STRING_FLAG != 0 {
		let len = (word & !INLINE_STRING_FLAG) as usize;
		return cursor.read_raw_string(len, ctx.max_string_len);
	}
	lookup_string(ctx.strings, word)
}

fn lookup_string(strings: &[String], index: u32) -> Result<String> {
	strings
		.get(index as usize)
		.cloned()
		.ok_or(ResError::StringIndexOutOfRange { index, len: strings.len() })
}

struct Decoder<'a, 'o> {
	cursor: Cursor<'a>,
	options: &'o DecodeOptions,
	phases: PhaseTracker,
}

impl<'a, 'o> Decoder<'a, 'o> {
	fn new(bytes: &'a [u8], options: &'o DecodeOptions) -> Self {
		Self {
			cursor: Cursor::new(bytes),
			options,
			phases: PhaseTracker::new("decode", options.trace),
		}
	}

	fn run(mut self) -> Result<Document> {
		if self.options.trace {
			tracing::debug!(bytes = self.cursor.len(), head = %hex_prefix(self.cursor.as_slice()), "decode start");
		}

		let result = self.run_phases();
		if let Err(err) = &result {
			if self.options.trace {
				tracing::debug!(phase = self.phases.current().as_str(), offset = self.cursor.pos(), error = %err, "decode failed");
			}
		}
		result
	}

	fn run_phases(&mut self) -> Result<Document> {
		self.phases.enter(Phase::Header, self.cursor.pos());
		let header = ResHeader::decode(&mut self.cursor, self.options)?;

		self.phases.enter(Phase::StringTable, self.cursor.pos());
		let string_table = decode_string_table(&mut self.cursor, self.options)?;

		self.phases.enter(Phase::ExternalTable, self.cursor.pos());
		let external_resources = decode_external_table(&mut self.cursor, self.options)?;

		self.phases.enter(Phase::InternalTable, self.cursor.pos());
		let internal_resources = decode_internal_table(&mut self.cursor, self.options)?;

		self.phases.enter(Phase::ResourceBody, self.cursor.pos());
		let ctx = VariantContext::new(&string_table, header.reals_are_double(), self.options);
		let (resource_body, complete) = self.decode_body(&internal_resources, &ctx)?;

		self.phases.enter(Phase::TrailingSentinel, self.cursor.pos());
		if resource_body.is_some() && complete {
			self.check_sentinel();
		}
		self.phases.enter(Phase::Done, self.cursor.pos());

		if self.options.trace {
			tracing::debug!(
				resource_type = %header.resource_type,
				strings = string_table.len(),
				external = external_resources.len(),
				internal = internal_resources.len(),
				properties = resource_body.as_ref().map_or(0, |body| body.properties.len()),
				"decode complete"
			);
		}

		Ok(Document {
			header,
			string_table,
			external_resources,
			internal_resources,
			resource_body,
		})
	}

	/// Returns the body and whether every declared property was decoded.
	fn decode_body(&mut self, internal: &[InternalResource], ctx: &VariantContext<'_>) -> Result<(Option<ResourceBody>, bool)> {
		let Some(last) = internal.last() else {
			return Ok((None, true));
		};
		if internal.len() > 1 {
			if self.options.reject_multi_body {
				return Err(ResError::MultipleResourceBodies { count: internal.len() });
			}
			tracing::warn!(
				count = internal.len(),
				path = %last.path,
				"multiple internal resources; only the last body is materialised"
			);
		}

		self.cursor.seek(last.offset)?;
		let type_name = self.cursor.read_string(self.options.max_string_len)?;
		let count = self.cursor.read_u32_le()?;

		let mut properties = Properties::new();
		let mut complete = true;
		for index in 0..count {
			let at = self.cursor.pos();
			match self.decode_property(ctx) {
				Ok((name, value)) => {
					if self.options.trace {
						tracing::trace!(index, name = %name, kind = value.tag().name(), offset = at, "property");
					}
					properties.insert(name, value);
				}
				Err(err) => {
					if self.options.strict_properties {
						return Err(err);
					}
					tracing::warn!(
						index,
						declared = count,
						kept = properties.len(),
						offset = at,
						error = %err,
						"property decode failed; keeping properties parsed so far"
					);
					complete = false;
					break;
				}
			}
		}

		Ok((Some(ResourceBody { type_name, properties }), complete))
	}

	fn decode_property(&mut self, ctx: &VariantContext<'_>) -> Result<(String, Variant)> {
		let name_index = self.cursor.read_u32_le()?;
		let name = lookup_string(ctx.strings, name_index)?;
		let value = decode_variant(&mut self.cursor, ctx, 0)?;
		Ok((name, value))
	}

	fn check_sentinel(&mut self) {
		let at = self.cursor.pos();
		match self.cursor.read_code4() {
			Ok(code) if code == MAGIC => {}
			Ok(code) => tracing::warn!(offset = at, found = ?code, "trailing sentinel mismatch"),
			Err(_) => tracing::warn!(offset = at, "trailing sentinel missing"),
		}
	}
}

fn hex_prefix(bytes: &[u8]) -> String {
	bytes.iter().take(16).map(|byte| format!("{byte:02x}")).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests;
