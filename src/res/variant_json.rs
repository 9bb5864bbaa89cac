//! JSON form of [`Variant`].
//!
//! Values JSON can express unambiguously map onto plain JSON (`null`, booleans,
//! strings, arrays, string-keyed dictionaries). Everything else, including all
//! numbers, is written as a tagged object `{"kind": K, "value": V}`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::res::{NodePath, ObjectRef, ResError, Result, Variant, VariantTag};

const KIND: &str = "kind";
const VALUE: &str = "value";

const KIND_EXTERNAL: &str = "EXTERNAL_RESOURCE";
const KIND_INTERNAL: &str = "INTERNAL_RESOURCE";
const KIND_RESOURCE: &str = "RESOURCE";

impl Variant {
	/// Convert to the tagged JSON representation.
	pub fn to_json(&self) -> Value {
		match self {
			Self::Nil => Value::Null,
			Self::Bool(value) => Value::Bool(*value),
			Self::String(text) => Value::String(text.clone()),
			Self::Int(value) => tagged(VariantTag::Int.name(), Value::from(*value)),
			Self::Float(value) => tagged(VariantTag::Float.name(), real_json(f64::from(*value))),
			Self::Int64(value) => tagged(VariantTag::Int64.name(), Value::String(value.to_string())),
			Self::Double(value) => tagged(VariantTag::Double.name(), real_json(*value)),
			Self::StringName(text) => tagged(VariantTag::StringName.name(), Value::String(text.clone())),
			Self::Vector2(items) => reals_json(self.tag(), items),
			Self::Rect2(items) => reals_json(self.tag(), items),
			Self::Vector3(items) => reals_json(self.tag(), items),
			Self::Plane(items) => reals_json(self.tag(), items),
			Self::Quaternion(items) => reals_json(self.tag(), items),
			Self::Aabb(items) => reals_json(self.tag(), items),
			Self::Basis(items) => reals_json(self.tag(), items),
			Self::Transform3d(items) => reals_json(self.tag(), items),
			Self::Transform2d(items) => reals_json(self.tag(), items),
			Self::Vector4(items) => reals_json(self.tag(), items),
			Self::Projection(items) => reals_json(self.tag(), items),
			Self::Color(items) => {
				let wide = items.map(f64::from);
				reals_json(self.tag(), &wide)
			}
			Self::Vector2i(items) => ints_json(self.tag(), items),
			Self::Rect2i(items) => ints_json(self.tag(), items),
			Self::Vector3i(items) => ints_json(self.tag(), items),
			Self::Vector4i(items) => ints_json(self.tag(), items),
			Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
			Self::Dictionary(pairs) => dictionary_json(pairs),
			Self::Object(object) => match object {
				ObjectRef::Null => tagged(VariantTag::Object.name(), Value::Null),
				ObjectRef::External { index } => tagged(KIND_EXTERNAL, Value::from(*index)),
				ObjectRef::Internal { index } => tagged(KIND_INTERNAL, Value::from(*index)),
				ObjectRef::Inline { path } => tagged(KIND_RESOURCE, Value::String(path.clone())),
			},
			Self::NodePath(path) => {
				let mut body = Map::new();
				body.insert("names".to_owned(), string_list(&path.names));
				body.insert("subnames".to_owned(), string_list(&path.subnames));
				body.insert("absolute".to_owned(), Value::Bool(path.absolute));
				tagged(VariantTag::NodePath.name(), Value::Object(body))
			}
		}
	}

	/// Convert from JSON. Plain numbers become `INT` when integral, `FLOAT` otherwise.
	pub fn from_json(value: &Value) -> Result<Self> {
		match value {
			Value::Null => Ok(Self::Nil),
			Value::Bool(value) => Ok(Self::Bool(*value)),
			Value::String(text) => Ok(Self::String(text.clone())),
			Value::Number(number) => Ok(plain_number(number)),
			Value::Array(items) => items.iter().map(Self::from_json).collect::<Result<Vec<_>>>().map(Self::Array),
			Value::Object(map) => match map.get(KIND) {
				Some(Value::String(kind)) => tagged_from_json(kind, map.get(VALUE).unwrap_or(&Value::Null)),
				_ => map
					.iter()
					.map(|(key, item)| Ok((Self::String(key.clone()), Self::from_json(item)?)))
					.collect::<Result<Vec<_>>>()
					.map(Self::Dictionary),
			},
		}
	}
}

impl Serialize for Variant {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		self.to_json().serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for Variant {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		let value = Value::deserialize(deserializer)?;
		Self::from_json(&value).map_err(serde::de::Error::custom)
	}
}

fn tagged(kind: &str, value: Value) -> Value {
	let mut map = Map::new();
	map.insert(KIND.to_owned(), Value::String(kind.to_owned()));
	map.insert(VALUE.to_owned(), value);
	Value::Object(map)
}

fn real_json(value: f64) -> Value {
	match Number::from_f64(value) {
		Some(number) => Value::Number(number),
		None if value.is_nan() => Value::String("nan".to_owned()),
		None if value > 0.0 => Value::String("inf".to_owned()),
		None => Value::String("-inf".to_owned()),
	}
}

fn reals_json(tag: VariantTag, items: &[f64]) -> Value {
	tagged(tag.name(), Value::Array(items.iter().copied().map(real_json).collect()))
}

fn ints_json(tag: VariantTag, items: &[i32]) -> Value {
	tagged(tag.name(), Value::Array(items.iter().copied().map(Value::from).collect()))
}

fn string_list(items: &[String]) -> Value {
	Value::Array(items.iter().cloned().map(Value::String).collect())
}

fn dictionary_json(pairs: &[(Variant, Variant)]) -> Value {
	let mut plain = Map::with_capacity(pairs.len());
	for (key, value) in pairs {
		let Variant::String(key) = key else {
			return tagged_dictionary(pairs);
		};
		if key == KIND || plain.contains_key(key) {
			return tagged_dictionary(pairs);
		}
		plain.insert(key.clone(), value.to_json());
	}
	Value::Object(plain)
}

fn tagged_dictionary(pairs: &[(Variant, Variant)]) -> Value {
	let items = pairs.iter().map(|(key, value)| Value::Array(vec![key.to_json(), value.to_json()])).collect();
	tagged(VariantTag::Dictionary.name(), Value::Array(items))
}

fn plain_number(number: &Number) -> Variant {
	if let Some(value) = number.as_i64() {
		return Variant::Int(clamp_i32(i128::from(value)));
	}
	if let Some(value) = number.as_u64() {
		return Variant::Int(clamp_i32(i128::from(value)));
	}
	let value = number.as_f64().unwrap_or(0.0);
	if value.is_finite() && value.fract() == 0.0 {
		Variant::Int(clamp_i32(value as i128))
	} else {
		Variant::Float(value as f32)
	}
}

fn clamp_i32(value: i128) -> i32 {
	value.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32
}

fn clamp_i64(value: i128) -> i64 {
	value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn tagged_from_json(kind: &str, value: &Value) -> Result<Variant> {
	let variant = match kind {
		KIND_EXTERNAL => Variant::Object(ObjectRef::External { index: index_value(kind, value)? }),
		KIND_INTERNAL => Variant::Object(ObjectRef::Internal { index: index_value(kind, value)? }),
		KIND_RESOURCE => Variant::Object(ObjectRef::Inline {
			path: string_value(kind, value)?,
		}),
		_ => {
			let tag = tag_by_name(kind).ok_or_else(|| ResError::unsupported_value(format!("unknown kind {kind:?}")))?;
			tagged_variant(tag, value)?
		}
	};
	Ok(variant)
}

fn tagged_variant(tag: VariantTag, value: &Value) -> Result<Variant> {
	let kind = tag.name();
	let variant = match tag {
		VariantTag::Nil => Variant::Nil,
		VariantTag::Bool => match value {
			Value::Bool(value) => Variant::Bool(*value),
			_ => return Err(shape_error(kind, "a boolean")),
		},
		VariantTag::Int => Variant::Int(clamp_i32(integer_value(kind, value)?)),
		VariantTag::Int64 => Variant::Int64(clamp_i64(integer_value(kind, value)?)),
		VariantTag::Float => Variant::Float(real_value(kind, value)? as f32),
		VariantTag::Double => Variant::Double(real_value(kind, value)?),
		VariantTag::String => Variant::String(string_value(kind, value)?),
		VariantTag::StringName => Variant::StringName(string_value(kind, value)?),
		VariantTag::Vector2 => Variant::Vector2(reals_value(kind, value)?),
		VariantTag::Rect2 => Variant::Rect2(reals_value(kind, value)?),
		VariantTag::Vector3 => Variant::Vector3(reals_value(kind, value)?),
		VariantTag::Plane => Variant::Plane(reals_value(kind, value)?),
		VariantTag::Quaternion => Variant::Quaternion(reals_value(kind, value)?),
		VariantTag::Aabb => Variant::Aabb(reals_value(kind, value)?),
		VariantTag::Basis => Variant::Basis(reals_value(kind, value)?),
		VariantTag::Transform3d => Variant::Transform3d(reals_value(kind, value)?),
		VariantTag::Transform2d => Variant::Transform2d(reals_value(kind, value)?),
		VariantTag::Vector4 => Variant::Vector4(reals_value(kind, value)?),
		VariantTag::Projection => Variant::Projection(reals_value(kind, value)?),
		VariantTag::Color => Variant::Color(reals_value::<4>(kind, value)?.map(|item| item as f32)),
		VariantTag::Vector2i => Variant::Vector2i(ints_value(kind, value)?),
		VariantTag::Rect2i => Variant::Rect2i(ints_value(kind, value)?),
		VariantTag::Vector3i => Variant::Vector3i(ints_value(kind, value)?),
		VariantTag::Vector4i => Variant::Vector4i(ints_value(kind, value)?),
		VariantTag::Array => match value {
			Value::Array(items) => Variant::Array(items.iter().map(Variant::from_json).collect::<Result<Vec<_>>>()?),
			_ => return Err(shape_error(kind, "an array")),
		},
		VariantTag::Dictionary => Variant::Dictionary(pairs_value(kind, value)?),
		VariantTag::Object => match value {
			Value::Null => Variant::Object(ObjectRef::Null),
			_ => return Err(shape_error(kind, "null (use EXTERNAL_RESOURCE, INTERNAL_RESOURCE or RESOURCE for references)")),
		},
		VariantTag::NodePath => Variant::NodePath(node_path_value(value)?),
		other => {
			return Err(ResError::unsupported_value(format!("kind {} has no encoder", other.name())));
		}
	};
	Ok(variant)
}

fn tag_by_name(kind: &str) -> Option<VariantTag> {
	(0..64).filter_map(VariantTag::from_u32).find(|tag| tag.name() == kind)
}

fn shape_error(kind: &str, expected: &str) -> ResError {
	ResError::unsupported_value(format!("{kind} value must be {expected}"))
}

fn integer_value(kind: &str, value: &Value) -> Result<i128> {
	match value {
		Value::Number(number) => {
			if let Some(value) = number.as_i64() {
				return Ok(i128::from(value));
			}
			if let Some(value) = number.as_u64() {
				return Ok(i128::from(value));
			}
			match number.as_f64() {
				Some(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i128),
				_ => Err(shape_error(kind, "an integer")),
			}
		}
		Value::String(text) => text.trim().parse::<i128>().map_err(|_| ResError::InvalidInteger {
			field: "variant",
			text: text.clone(),
		}),
		_ => Err(shape_error(kind, "an integer or decimal string")),
	}
}

fn real_value(kind: &str, value: &Value) -> Result<f64> {
	match value {
		Value::Number(number) => number.as_f64().ok_or_else(|| shape_error(kind, "a number")),
		Value::String(text) => match text.as_str() {
			"nan" => Ok(f64::NAN),
			"inf" => Ok(f64::INFINITY),
			"-inf" => Ok(f64::NEG_INFINITY),
			_ => Err(shape_error(kind, "a number, \"nan\", \"inf\" or \"-inf\"")),
		},
		_ => Err(shape_error(kind, "a number")),
	}
}

fn components<'a, const N: usize>(kind: &str, value: &'a Value) -> Result<&'a [Value]> {
	match value {
		Value::Array(items) if items.len() == N => Ok(items),
		_ => Err(shape_error(kind, &format!("an array of {N} components"))),
	}
}

fn reals_value<const N: usize>(kind: &str, value: &Value) -> Result<[f64; N]> {
	let items = components::<N>(kind, value)?;
	let mut out = [0.0; N];
	for (slot, item) in out.iter_mut().zip(items) {
		*slot = real_value(kind, item)?;
	}
	Ok(out)
}

fn ints_value<const N: usize>(kind: &str, value: &Value) -> Result<[i32; N]> {
	let items = components::<N>(kind, value)?;
	let mut out = [0; N];
	for (slot, item) in out.iter_mut().zip(items) {
		*slot = clamp_i32(integer_value(kind, item)?);
	}
	Ok(out)
}

fn string_value(kind: &str, value: &Value) -> Result<String> {
	match value {
		Value::String(text) => Ok(text.clone()),
		_ => Err(shape_error(kind, "a string")),
	}
}

fn index_value(kind: &str, value: &Value) -> Result<u32> {
	let raw = integer_value(kind, value)?;
	u32::try_from(raw).map_err(|_| shape_error(kind, "an index in 0..=4294967295"))
}

fn pairs_value(kind: &str, value: &Value) -> Result<Vec<(Variant, Variant)>> {
	let Value::Array(items) = value else {
		return Err(shape_error(kind, "an array of [key, value] pairs"));
	};
	items
		.iter()
		.map(|item| match item {
			Value::Array(pair) if pair.len() == 2 => Ok((Variant::from_json(&pair[0])?, Variant::from_json(&pair[1])?)),
			_ => Err(shape_error(kind, "an array of [key, value] pairs")),
		})
		.collect()
}

fn node_path_value(value: &Value) -> Result<NodePath> {
	let kind = VariantTag::NodePath.name();
	let Value::Object(map) = value else {
		return Err(shape_error(kind, "an object with names, subnames and absolute"));
	};
	let list = |field: &str| -> Result<Vec<String>> {
		match map.get(field) {
			None | Some(Value::Null) => Ok(Vec::new()),
			Some(Value::Array(items)) => items.iter().map(|item| string_value(kind, item)).collect(),
			Some(_) => Err(shape_error(kind, "an object whose names/subnames are string arrays")),
		}
	};
	let absolute = match map.get("absolute") {
		None | Some(Value::Null) => false,
		Some(Value::Bool(value)) => *value,
		Some(_) => return Err(shape_error(kind, "an object whose absolute field is a boolean")),
	};
	Ok(NodePath {
		names: list("names")?,
		subnames: list("subnames")?,
		absolute,
	})
}
