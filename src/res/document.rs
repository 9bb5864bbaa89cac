use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::res::{ExternalResource, InternalResource, ResHeader, Result, Variant};

/// Whole-file document model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
	/// File prologue.
	pub header: ResHeader,
	/// Index-addressed string pool.
	#[serde(default)]
	pub string_table: Vec<String>,
	/// External resource descriptors.
	#[serde(default)]
	pub external_resources: Vec<ExternalResource>,
	/// Internal resource descriptors.
	#[serde(default)]
	pub internal_resources: Vec<InternalResource>,
	/// Materialised body of the last internal resource.
	#[serde(default, alias = "resourceData")]
	pub resource_body: Option<ResourceBody>,
}

impl Document {
	/// Parse a document from JSON text.
	pub fn from_json_str(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}

	/// Render the document as JSON text.
	pub fn to_json_string(&self, pretty: bool) -> Result<String> {
		let text = if pretty {
			serde_json::to_string_pretty(self)?
		} else {
			serde_json::to_string(self)?
		};
		Ok(text)
	}
}

/// One resource body: class name plus ordered properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBody {
	/// Resource class name.
	#[serde(rename = "type")]
	pub type_name: String,
	/// Property values by name.
	#[serde(default)]
	pub properties: Properties,
}

/// Insertion-ordered property map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
	entries: Vec<(String, Variant)>,
}

impl Properties {
	/// Create an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of properties.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return true when there are no properties.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Insert or replace `name`. A replaced entry keeps its original position.
	pub fn insert(&mut self, name: impl Into<String>, value: Variant) {
		let name = name.into();
		match self.entries.iter_mut().find(|(key, _)| *key == name) {
			Some(slot) => slot.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	/// Look up a property by name.
	pub fn get(&self, name: &str) -> Option<&Variant> {
		self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value)
	}

	/// Iterate properties in order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}
}

impl<K: Into<String>> FromIterator<(K, Variant)> for Properties {
	fn from_iter<I: IntoIterator<Item = (K, Variant)>>(iter: I) -> Self {
		let mut out = Self::new();
		for (key, value) in iter {
			out.insert(key, value);
		}
		out
	}
}

impl Serialize for Properties {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (key, value) in &self.entries {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for Properties {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct PropertiesVisitor;

		impl<'de> Visitor<'de> for PropertiesVisitor {
			type Value = Properties;

			fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
				formatter.write_str("a map of property names to values")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Properties, A::Error> {
				let mut out = Properties::new();
				while let Some((key, value)) = access.next_entry::<String, Variant>()? {
					out.insert(key, value);
				}
				Ok(out)
			}
		}

		deserializer.deserialize_map(PropertiesVisitor)
	}
}

/// Serde helper storing `u64` as decimal text.
///
/// Reading accepts decimal text or a JSON number.
pub mod u64_text {
	use serde::{Deserialize, Deserializer, Serializer};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Text {
		Number(u64),
		String(String),
	}

	/// Serialize as decimal text.
	pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(value)
	}

	/// Deserialize from decimal text or number.
	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
		match Text::deserialize(deserializer)? {
			Text::Number(value) => Ok(value),
			Text::String(text) => text
				.trim()
				.parse::<u64>()
				.map_err(|_| serde::de::Error::custom(format!("invalid u64 text {text:?}"))),
		}
	}
}

#[cfg(test)]
mod tests;
