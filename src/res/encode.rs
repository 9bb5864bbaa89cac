use crate::res::bytes::Writer;
use crate::res::decode::{CONTAINER_COUNT_MASK, NODE_PATH_ABSOLUTE_FLAG};
use crate::res::header::MAGIC;
use crate::res::phase::{Phase, PhaseTracker};
use crate::res::tables::{StringLookup, encode_external_table, encode_internal_table, encode_string_table};
use crate::res::{Document, NodePath, ObjectRef, ResError, ResourceBody, Result, Variant};

/// Runtime limits and behavior switches for encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
	/// Maximum variant nesting depth.
	pub max_depth: u32,
	/// Emit per-phase and per-property trace events.
	pub trace: bool,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self { max_depth: 64, trace: false }
	}
}

/// Read-only state shared by every variant encoded into one document.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'l> {
	/// String-table reverse lookup for node-path components.
	pub lookup: &'l StringLookup,
	/// Write real-valued math components as 8-byte doubles.
	pub real_is_double: bool,
	/// Maximum nesting depth.
	pub max_depth: u32,
}

/// Encode a document into `.res` bytes. On error no output is produced.
pub fn encode_document(document: &Document, options: &EncodeOptions) -> Result<Vec<u8>> {
	Encoder::new(document, options).run()
}

/// Encode one tagged variant.
pub fn encode_variant(writer: &mut Writer, value: &Variant, ctx: &EncodeContext<'_>, depth: u32) -> Result<()> {
	if depth >= ctx.max_depth {
		return Err(ResError::unsupported_value(format!("variant nesting exceeds max depth {}", ctx.max_depth)));
	}

	writer.write_u32_le(value.tag().as_u32());
	match value {
		Variant::Nil => {}
		Variant::Bool(value) => writer.write_u32_le(u32::from(*value)),
		Variant::Int(value) => writer.write_i32_clamped(i64::from(*value)),
		Variant::Float(value) => writer.write_f32_le(*value),
		Variant::String(text) | Variant::StringName(text) => writer.write_string(text, false)?,
		Variant::Int64(value) => writer.write_i64_clamped(i128::from(*value)),
		Variant::Double(value) => writer.write_f64_le(*value),
		Variant::Vector2(items) => write_reals(writer, items, ctx),
		Variant::Rect2(items) => write_reals(writer, items, ctx),
		Variant::Vector3(items) => write_reals(writer, items, ctx),
		Variant::Plane(items) => write_reals(writer, items, ctx),
		Variant::Quaternion(items) => write_reals(writer, items, ctx),
		Variant::Aabb(items) => write_reals(writer, items, ctx),
		Variant::Basis(items) => write_reals(writer, items, ctx),
		Variant::Transform3d(items) => write_reals(writer, items, ctx),
		Variant::Transform2d(items) => write_reals(writer, items, ctx),
		Variant::Vector4(items) => write_reals(writer, items, ctx),
		Variant::Projection(items) => write_reals(writer, items, ctx),
		Variant::Color(items) => {
			for item in items {
				writer.write_f32_le(*item);
			}
		}
		Variant::Vector2i(items) => write_ints(writer, items),
		Variant::Rect2i(items) => write_ints(writer, items),
		Variant::Vector3i(items) => write_ints(writer, items),
		Variant::Vector4i(items) => write_ints(writer, items),
		Variant::Array(items) => {
			writer.write_u32_le(container_count("array", items.len())?);
			for item in items {
				encode_variant(writer, item, ctx, depth + 1)?;
			}
		}
		Variant::Dictionary(pairs) => {
			writer.write_u32_le(container_count("dictionary", pairs.len())?);
			for (key, item) in pairs {
				encode_variant(writer, key, ctx, depth + 1)?;
				encode_variant(writer, item, ctx, depth + 1)?;
			}
		}
		Variant::Object(object) => encode_object(writer, object)?,
		Variant::NodePath(path) => encode_node_path(writer, path, ctx)?,
	}
	Ok(())
}

fn write_reals(writer: &mut Writer, items: &[f64], ctx: &EncodeContext<'_>) {
	for item in items {
		if ctx.real_is_double {
			writer.write_f64_le(*item);
		} else {
			writer.write_f32_le(*item as f32);
		}
	}
}

fn write_ints(writer: &mut Writer, items: &[i32]) {
	for item in items {
		writer.write_i32_clamped(i64::from(*item));
	}
}

fn container_count(what: &str, len: usize) -> Result<u32> {
	u32::try_from(len)
		.ok()
		.filter(|count| *count <= CONTAINER_COUNT_MASK)
		.ok_or_else(|| ResError::unsupported_value(format!("{what} with {len} entries exceeds count field")))
}

fn encode_object(writer: &mut Writer, object: &ObjectRef) -> Result<()> {
	// Decoding strips one trailing NUL from inline paths.
	if let ObjectRef::Inline { path } = object {
		if path.ends_with('\0') {
			return Err(ResError::unsupported_value(format!("inline resource path {path:?} ends with NUL")));
		}
	}

	writer.write_u32_le(object.subtype());
	match object {
		ObjectRef::Null => {}
		ObjectRef::External { index } | ObjectRef::Internal { index } => writer.write_u32_le(*index),
		ObjectRef::Inline { path } => writer.write_raw_string(path)?,
	}
	Ok(())
}

fn encode_node_path(writer: &mut Writer, path: &NodePath, ctx: &EncodeContext<'_>) -> Result<()> {
	let name_count = u16::try_from(path.names.len()).map_err(|_| ResError::unsupported_value("node path has too many names"))?;
	let subname_count = u16::try_from(path.subnames.len())
		.ok()
		.filter(|count| *count < NODE_PATH_ABSOLUTE_FLAG)
		.ok_or_else(|| ResError::unsupported_value("node path has too many subnames"))?;

	writer.write_u16_le(name_count);
	writer.write_u16_le(if path.absolute {
		subname_count | NODE_PATH_ABSOLUTE_FLAG
	} else {
		subname_count
	});
	for component in path.names.iter().chain(&path.subnames) {
		match ctx.lookup.get(component) {
			Some(index) => writer.write_u32_le(index),
			None => writer.write_string(component, true)?,
		}
	}
	Ok(())
}

struct Encoder<'d, 'o> {
	document: &'d Document,
	options: &'o EncodeOptions,
	writer: Writer,
	phases: PhaseTracker,
}

impl<'d, 'o> Encoder<'d, 'o> {
	fn new(document: &'d Document, options: &'o EncodeOptions) -> Self {
		Self {
			document,
			options,
			writer: Writer::new(),
			phases: PhaseTracker::new("encode", options.trace),
		}
	}

	fn run(mut self) -> Result<Vec<u8>> {
		let result = self.run_phases();
		if let Err(err) = &result {
			if self.options.trace {
				tracing::debug!(phase = self.phases.current().as_str(), offset = self.writer.len(), error = %err, "encode failed");
			}
		}
		result?;

		if self.options.trace {
			tracing::debug!(bytes = self.writer.len(), "encode complete");
		}
		Ok(self.writer.into_bytes())
	}

	fn run_phases(&mut self) -> Result<()> {
		let document = self.document;
		let lookup = StringLookup::build(&document.string_table);

		self.phases.enter(Phase::Header, self.writer.len());
		document.header.encode(&mut self.writer)?;

		self.phases.enter(Phase::StringTable, self.writer.len());
		encode_string_table(&mut self.writer, &document.string_table)?;

		self.phases.enter(Phase::ExternalTable, self.writer.len());
		encode_external_table(&mut self.writer, &document.external_resources)?;

		self.phases.enter(Phase::InternalTable, self.writer.len());
		let offset_slots = encode_internal_table(&mut self.writer, &document.internal_resources)?;

		self.phases.enter(Phase::ResourceBody, self.writer.len());
		match (&document.resource_body, offset_slots.last()) {
			(Some(body), Some(&slot)) => {
				if document.internal_resources.len() > 1 {
					tracing::warn!(
						count = document.internal_resources.len(),
						"multiple internal resources; only the last entry is given a body"
					);
				}
				self.patch_body_offset(slot);
				let ctx = EncodeContext {
					lookup: &lookup,
					real_is_double: document.header.reals_are_double(),
					max_depth: self.options.max_depth,
				};
				self.encode_body(body, &ctx)?;
			}
			(Some(_), None) => return Err(ResError::BodyWithoutInternalEntry),
			(None, Some(_)) => {
				return Err(ResError::unsupported_value("internal resources listed without a resource body"));
			}
			(None, None) => {}
		}

		self.phases.enter(Phase::TrailingSentinel, self.writer.len());
		self.writer.write_bytes(&MAGIC);
		self.phases.enter(Phase::Done, self.writer.len());
		Ok(())
	}

	// The body is written immediately after the internal table.
	fn patch_body_offset(&mut self, slot: usize) {
		let actual = self.writer.len() as u64;
		let recorded = self.document.internal_resources.last().map_or(actual, |item| item.offset);
		if recorded != actual && self.options.trace {
			tracing::debug!(recorded, actual, "rewriting resource body offset");
		}
		self.writer.patch_u64_le(slot, actual);
	}

	fn encode_body(&mut self, body: &ResourceBody, ctx: &EncodeContext<'_>) -> Result<()> {
		self.writer.write_string(&body.type_name, false)?;
		let count = u32::try_from(body.properties.len()).map_err(|_| ResError::unsupported_value("too many properties"))?;
		self.writer.write_u32_le(count);

		for (name, value) in body.properties.iter() {
			let at = self.writer.len();
			let name_index = ctx.lookup.index_of(name)?;
			self.writer.write_u32_le(name_index);
			encode_variant(&mut self.writer, value, ctx, 0)?;
			if self.options.trace {
				tracing::trace!(name, name_index, kind = value.tag().name(), offset = at, "property");
			}
		}
		Ok(())
	}
}
