/// Type tags of the binary variant encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum VariantTag {
	Nil = 1,
	Bool = 2,
	Int = 3,
	Float = 4,
	String = 5,
	Vector2 = 10,
	Rect2 = 11,
	Vector3 = 12,
	Plane = 13,
	Quaternion = 14,
	Aabb = 15,
	Basis = 16,
	Transform3d = 17,
	Transform2d = 18,
	Color = 20,
	NodePath = 22,
	Rid = 23,
	Object = 24,
	InputEvent = 25,
	Dictionary = 26,
	Array = 30,
	PackedByteArray = 31,
	PackedInt32Array = 32,
	PackedFloat32Array = 33,
	PackedStringArray = 34,
	PackedVector3Array = 35,
	PackedColorArray = 36,
	PackedVector2Array = 37,
	Int64 = 40,
	Double = 41,
	Callable = 42,
	Signal = 43,
	StringName = 44,
	Vector2i = 45,
	Rect2i = 46,
	Vector3i = 47,
	PackedInt64Array = 48,
	PackedFloat64Array = 49,
	Vector4 = 50,
	Vector4i = 51,
	Projection = 52,
	PackedVector4Array = 53,
}

impl VariantTag {
	const ALL: [Self; 42] = [
		Self::Nil,
		Self::Bool,
		Self::Int,
		Self::Float,
		Self::String,
		Self::Vector2,
		Self::Rect2,
		Self::Vector3,
		Self::Plane,
		Self::Quaternion,
		Self::Aabb,
		Self::Basis,
		Self::Transform3d,
		Self::Transform2d,
		Self::Color,
		Self::NodePath,
		Self::Rid,
		Self::Object,
		Self::InputEvent,
		Self::Dictionary,
		Self::Array,
		Self::PackedByteArray,
		Self::PackedInt32Array,
		Self::PackedFloat32Array,
		Self::PackedStringArray,
		Self::PackedVector3Array,
		Self::PackedColorArray,
		Self::PackedVector2Array,
		Self::Int64,
		Self::Double,
		Self::Callable,
		Self::Signal,
		Self::StringName,
		Self::Vector2i,
		Self::Rect2i,
		Self::Vector3i,
		Self::PackedInt64Array,
		Self::PackedFloat64Array,
		Self::Vector4,
		Self::Vector4i,
		Self::Projection,
		Self::PackedVector4Array,
	];

	/// Map a raw tag to the enumeration.
	pub fn from_u32(raw: u32) -> Option<Self> {
		Self::ALL.into_iter().find(|tag| tag.as_u32() == raw)
	}

	/// Raw wire value.
	pub fn as_u32(self) -> u32 {
		self as u32
	}

	/// Stable upper-case name, also used as the JSON `kind` label.
	pub fn name(self) -> &'static str {
		match self {
			Self::Nil => "NIL",
			Self::Bool => "BOOL",
			Self::Int => "INT",
			Self::Float => "FLOAT",
			Self::String => "STRING",
			Self::Vector2 => "VECTOR2",
			Self::Rect2 => "RECT2",
			Self::Vector3 => "VECTOR3",
			Self::Plane => "PLANE",
			Self::Quaternion => "QUATERNION",
			Self::Aabb => "AABB",
			Self::Basis => "BASIS",
			Self::Transform3d => "TRANSFORM3D",
			Self::Transform2d => "TRANSFORM2D",
			Self::Color => "COLOR",
			Self::NodePath => "NODE_PATH",
			Self::Rid => "RID",
			Self::Object => "OBJECT",
			Self::InputEvent => "INPUT_EVENT",
			Self::Dictionary => "DICTIONARY",
			Self::Array => "ARRAY",
			Self::PackedByteArray => "PACKED_BYTE_ARRAY",
			Self::PackedInt32Array => "PACKED_INT32_ARRAY",
			Self::PackedFloat32Array => "PACKED_FLOAT32_ARRAY",
			Self::PackedStringArray => "PACKED_STRING_ARRAY",
			Self::PackedVector3Array => "PACKED_VECTOR3_ARRAY",
			Self::PackedColorArray => "PACKED_COLOR_ARRAY",
			Self::PackedVector2Array => "PACKED_VECTOR2_ARRAY",
			Self::Int64 => "INT64",
			Self::Double => "DOUBLE",
			Self::Callable => "CALLABLE",
			Self::Signal => "SIGNAL",
			Self::StringName => "STRING_NAME",
			Self::Vector2i => "VECTOR2I",
			Self::Rect2i => "RECT2I",
			Self::Vector3i => "VECTOR3I",
			Self::PackedInt64Array => "PACKED_INT64_ARRAY",
			Self::PackedFloat64Array => "PACKED_FLOAT64_ARRAY",
			Self::Vector4 => "VECTOR4",
			Self::Vector4i => "VECTOR4I",
			Self::Projection => "PROJECTION",
			Self::PackedVector4Array => "PACKED_VECTOR4_ARRAY",
		}
	}

	/// Name for a raw tag, `UNKNOWN` outside the enumeration.
	pub fn name_of(raw: u32) -> &'static str {
		Self::from_u32(raw).map_or("UNKNOWN", Self::name)
	}
}

/// Decoded property value.
///
/// Real-valued math components are held as `f64` regardless of their
/// on-disk width.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Variant {
	Nil,
	Bool(bool),
	Int(i32),
	Float(f32),
	String(String),
	StringName(String),
	Int64(i64),
	Double(f64),
	Vector2([f64; 2]),
	Rect2([f64; 4]),
	Vector3([f64; 3]),
	Plane([f64; 4]),
	Quaternion([f64; 4]),
	Aabb([f64; 6]),
	Basis([f64; 9]),
	Transform3d([f64; 12]),
	Transform2d([f64; 6]),
	Color([f32; 4]),
	Vector2i([i32; 2]),
	Rect2i([i32; 4]),
	Vector3i([i32; 3]),
	Vector4([f64; 4]),
	Vector4i([i32; 4]),
	Projection([f64; 16]),
	Array(Vec<Variant>),
	/// Key/value pairs in stream order; keys are arbitrary variants.
	Dictionary(Vec<(Variant, Variant)>),
	Object(ObjectRef),
	NodePath(NodePath),
}

impl Variant {
	/// Wire tag for this value.
	pub fn tag(&self) -> VariantTag {
		match self {
			Self::Nil => VariantTag::Nil,
			Self::Bool(_) => VariantTag::Bool,
			Self::Int(_) => VariantTag::Int,
			Self::Float(_) => VariantTag::Float,
			Self::String(_) => VariantTag::String,
			Self::StringName(_) => VariantTag::StringName,
			Self::Int64(_) => VariantTag::Int64,
			Self::Double(_) => VariantTag::Double,
			Self::Vector2(_) => VariantTag::Vector2,
			Self::Rect2(_) => VariantTag::Rect2,
			Self::Vector3(_) => VariantTag::Vector3,
			Self::Plane(_) => VariantTag::Plane,
			Self::Quaternion(_) => VariantTag::Quaternion,
			Self::Aabb(_) => VariantTag::Aabb,
			Self::Basis(_) => VariantTag::Basis,
			Self::Transform3d(_) => VariantTag::Transform3d,
			Self::Transform2d(_) => VariantTag::Transform2d,
			Self::Color(_) => VariantTag::Color,
			Self::Vector2i(_) => VariantTag::Vector2i,
			Self::Rect2i(_) => VariantTag::Rect2i,
			Self::Vector3i(_) => VariantTag::Vector3i,
			Self::Vector4(_) => VariantTag::Vector4,
			Self::Vector4i(_) => VariantTag::Vector4i,
			Self::Projection(_) => VariantTag::Projection,
			Self::Array(_) => VariantTag::Array,
			Self::Dictionary(_) => VariantTag::Dictionary,
			Self::Object(_) => VariantTag::Object,
			Self::NodePath(_) => VariantTag::NodePath,
		}
	}
}

/// `OBJECT` payload. Indices are kept unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectRef {
	/// Subtype 0.
	Null,
	/// Subtype 1: index into the external resource table.
	External {
		/// Table index, not bounds-checked.
		index: u32,
	},
	/// Subtype 2: index into the internal resource table.
	Internal {
		/// Table index, not bounds-checked.
		index: u32,
	},
	/// Subtype 3: inline resource path.
	Inline {
		/// Raw path text.
		path: String,
	},
}

impl ObjectRef {
	/// Wire subtype.
	pub fn subtype(&self) -> u32 {
		match self {
			Self::Null => 0,
			Self::External { .. } => 1,
			Self::Internal { .. } => 2,
			Self::Inline { .. } => 3,
		}
	}
}

/// Scene-tree address made of names and property subnames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath {
	/// Node name components.
	pub names: Vec<String>,
	/// Property subname components.
	pub subnames: Vec<String>,
	/// Path starts at the tree root.
	pub absolute: bool,
}
