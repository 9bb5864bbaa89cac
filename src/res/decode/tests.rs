use crate::res::bytes::{Cursor, Writer};
use crate::res::decode::{VariantContext, decode_document, decode_variant};
use crate::res::tables::{encode_external_table, encode_internal_table, encode_string_table};
use crate::res::{DecodeOptions, ErrorKind, InternalResource, NodePath, ObjectRef, ResError, ResHeader, Variant};

fn decode_one(bytes: &[u8], strings: &[String], real_is_double: bool) -> crate::res::Result<Variant> {
	let options = DecodeOptions::default();
	let ctx = VariantContext::new(strings, real_is_double, &options);
	decode_variant(&mut Cursor::new(bytes), &ctx, 0)
}

fn strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|item| (*item).to_owned()).collect()
}

/// Header + tables + one body at the recorded offset; `body` writes the property records.
fn raw_document(table: &[String], internal_paths: &[&str], property_count: u32, body: impl FnOnce(&mut Writer)) -> Vec<u8> {
	let mut writer = Writer::new();
	ResHeader::new("Resource", 0).encode(&mut writer).expect("header encodes");
	encode_string_table(&mut writer, table).expect("table encodes");
	encode_external_table(&mut writer, &[]).expect("table encodes");
	let internal: Vec<_> = internal_paths
		.iter()
		.map(|path| InternalResource {
			path: (*path).to_owned(),
			offset: 0,
		})
		.collect();
	let slots = encode_internal_table(&mut writer, &internal).expect("table encodes");
	let offset = writer.len() as u64;
	for slot in slots {
		writer.patch_u64_le(slot, offset);
	}
	writer.write_string("Resource", false).expect("string fits");
	writer.write_u32_le(property_count);
	body(&mut writer);
	writer.write_bytes(b"RSRC");
	writer.into_bytes()
}

#[test]
fn decodes_scalar_tags() {
	let mut writer = Writer::new();
	writer.write_u32_le(2);
	writer.write_u32_le(1);
	assert_eq!(decode_one(writer.as_bytes(), &[], false).expect("bool"), Variant::Bool(true));

	let mut writer = Writer::new();
	writer.write_u32_le(3);
	writer.write_i32_clamped(-5);
	assert_eq!(decode_one(writer.as_bytes(), &[], false).expect("int"), Variant::Int(-5));

	let mut writer = Writer::new();
	writer.write_u32_le(40);
	writer.write_i64_clamped(-9_007_199_254_740_993);
	assert_eq!(decode_one(writer.as_bytes(), &[], false).expect("int64"), Variant::Int64(-9_007_199_254_740_993));

	let mut writer = Writer::new();
	writer.write_u32_le(44);
	writer.write_string("idle", false).expect("string fits");
	assert_eq!(
		decode_one(writer.as_bytes(), &[], false).expect("string name"),
		Variant::StringName("idle".to_owned())
	);

	let mut writer = Writer::new();
	writer.write_u32_le(1);
	assert_eq!(decode_one(writer.as_bytes(), &[], false).expect("nil"), Variant::Nil);
}

#[test]
fn shared_bit_is_masked_from_container_counts() {
	let build = |count: u32| {
		let mut writer = Writer::new();
		writer.write_u32_le(30);
		writer.write_u32_le(count);
		writer.write_u32_le(3);
		writer.write_i32_clamped(1);
		writer.write_u32_le(3);
		writer.write_i32_clamped(2);
		writer.into_bytes()
	};
	let plain = decode_one(&build(2), &[], false).expect("plain array");
	let shared = decode_one(&build(2 | 0x8000_0000), &[], false).expect("shared array");
	assert_eq!(plain, shared);
	assert_eq!(plain, Variant::Array(vec![Variant::Int(1), Variant::Int(2)]));

	let mut writer = Writer::new();
	writer.write_u32_le(26);
	writer.write_u32_le(1 | 0x8000_0000);
	writer.write_u32_le(3);
	writer.write_i32_clamped(9);
	writer.write_u32_le(5);
	writer.write_string("nine", false).expect("string fits");
	let dict = decode_one(writer.as_bytes(), &[], false).expect("shared dictionary");
	assert_eq!(dict, Variant::Dictionary(vec![(Variant::Int(9), Variant::String("nine".to_owned()))]));
}

#[test]
fn external_reference_past_table_stays_unresolved() {
	let mut writer = Writer::new();
	writer.write_u32_le(24);
	writer.write_u32_le(1);
	writer.write_u32_le(3);
	let value = decode_one(writer.as_bytes(), &[], false).expect("object decodes");
	assert_eq!(value, Variant::Object(ObjectRef::External { index: 3 }));
}

#[test]
fn decodes_inline_resource_object() {
	let mut writer = Writer::new();
	writer.write_u32_le(24);
	writer.write_u32_le(3);
	writer.write_u32_le(12);
	writer.write_bytes(b"res://a.tres");
	let value = decode_one(writer.as_bytes(), &[], false).expect("object decodes");
	assert_eq!(
		value,
		Variant::Object(ObjectRef::Inline {
			path: "res://a.tres".to_owned()
		})
	);
}

#[test]
fn invalid_object_subtype_is_a_format_error() {
	let mut writer = Writer::new();
	writer.write_u32_le(24);
	writer.write_u32_le(9);
	let err = decode_one(writer.as_bytes(), &[], false).expect_err("subtype 9 must fail");
	assert!(matches!(err, ResError::InvalidObjectSubtype { subtype: 9, at: 4 }));
	assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn node_path_mixes_table_indices_and_inline_strings() {
	let table = strings(&["Player", "position"]);
	let mut writer = Writer::new();
	writer.write_u32_le(22);
	writer.write_u16_le(2);
	writer.write_u16_le(1 | 0x8000);
	writer.write_u32_le(0);
	writer.write_string("Sprite", true).expect("string fits");
	writer.write_u32_le(1);

	let value = decode_one(writer.as_bytes(), &table, false).expect("node path decodes");
	assert_eq!(
		value,
		Variant::NodePath(NodePath {
			names: vec!["Player".to_owned(), "Sprite".to_owned()],
			subnames: vec!["position".to_owned()],
			absolute: true,
		})
	);
}

#[test]
fn node_path_index_out_of_range_fails() {
	let mut writer = Writer::new();
	writer.write_u32_le(22);
	writer.write_u16_le(1);
	writer.write_u16_le(0);
	writer.write_u32_le(5);
	let err = decode_one(writer.as_bytes(), &strings(&["a"]), false).expect_err("index 5 must fail");
	assert!(matches!(err, ResError::StringIndexOutOfRange { index: 5, len: 1 }));
}

#[test]
fn unimplemented_tag_fails_with_tag_and_offset() {
	let mut writer = Writer::new();
	writer.write_u32_le(30);
	writer.write_u32_le(2);
	writer.write_u32_le(1);
	writer.write_u32_le(35);
	writer.write_u32_le(0);

	let err = decode_one(writer.as_bytes(), &[], false).expect_err("packed vector3 array is rejected");
	assert_eq!(err.kind(), ErrorKind::UnsupportedVariant);
	assert!(matches!(
		err,
		ResError::UnsupportedVariant {
			tag: 35,
			name: "PACKED_VECTOR3_ARRAY",
			at: 12
		}
	));
}

#[test]
fn unknown_tag_number_is_rejected() {
	let bytes = 6_u32.to_le_bytes();
	let err = decode_one(&bytes, &[], false).expect_err("tag 6 is not in the enumeration");
	assert!(matches!(err, ResError::UnsupportedVariant { tag: 6, name: "UNKNOWN", at: 0 }));
}

#[test]
fn nesting_beyond_max_depth_fails() {
	let options = DecodeOptions {
		max_depth: 3,
		..DecodeOptions::default()
	};
	let mut writer = Writer::new();
	for _ in 0..4 {
		writer.write_u32_le(30);
		writer.write_u32_le(1);
	}
	writer.write_u32_le(1);
	let ctx = VariantContext::new(&[], false, &options);
	let err = decode_variant(&mut Cursor::new(writer.as_bytes()), &ctx, 0).expect_err("depth 4 must fail");
	assert!(matches!(err, ResError::DepthExceeded { max_depth: 3, at: 24 }));

	let mut shallow = Writer::new();
	for _ in 0..2 {
		shallow.write_u32_le(30);
		shallow.write_u32_le(1);
	}
	shallow.write_u32_le(1);
	decode_variant(&mut Cursor::new(shallow.as_bytes()), &ctx, 0).expect("depth 3 is allowed");
}

#[test]
fn real_width_follows_header_flag() {
	let mut single = Writer::new();
	single.write_u32_le(10);
	single.write_f32_le(1.5);
	single.write_f32_le(-2.0);
	assert_eq!(decode_one(single.as_bytes(), &[], false).expect("vector2"), Variant::Vector2([1.5, -2.0]));

	let mut double = Writer::new();
	double.write_u32_le(10);
	double.write_f64_le(0.1);
	double.write_f64_le(0.2);
	assert_eq!(decode_one(double.as_bytes(), &[], true).expect("vector2"), Variant::Vector2([0.1, 0.2]));

	let mut color = Writer::new();
	color.write_u32_le(20);
	for item in [1.0_f32, 0.5, 0.25, 1.0] {
		color.write_f32_le(item);
	}
	assert_eq!(
		decode_one(color.as_bytes(), &[], true).expect("color ignores real width"),
		Variant::Color([1.0, 0.5, 0.25, 1.0])
	);
}

#[test]
fn bad_property_name_keeps_earlier_properties() {
	let table = strings(&["alpha", "beta"]);
	let bytes = raw_document(&table, &["local://1"], 3, |writer| {
		writer.write_u32_le(0);
		writer.write_u32_le(3);
		writer.write_i32_clamped(1);
		writer.write_u32_le(7);
		writer.write_u32_le(3);
		writer.write_i32_clamped(2);
		writer.write_u32_le(1);
		writer.write_u32_le(3);
		writer.write_i32_clamped(3);
	});

	let document = decode_document(&bytes, &DecodeOptions::default()).expect("partial decode succeeds");
	let body = document.resource_body.expect("body exists");
	assert_eq!(body.properties.len(), 1);
	assert_eq!(body.properties.get("alpha"), Some(&Variant::Int(1)));
}

#[test]
fn unsupported_property_value_truncates_property_list() {
	let table = strings(&["alpha", "mesh", "beta"]);
	let bytes = raw_document(&table, &["local://1"], 3, |writer| {
		writer.write_u32_le(0);
		writer.write_u32_le(5);
		writer.write_string("kept", false).expect("string fits");
		writer.write_u32_le(1);
		writer.write_u32_le(35);
		writer.write_u32_le(0);
		writer.write_u32_le(2);
		writer.write_u32_le(1);
	});

	let document = decode_document(&bytes, &DecodeOptions::default()).expect("partial decode succeeds");
	let body = document.resource_body.expect("body exists");
	assert_eq!(body.properties.len(), 1);
	assert_eq!(body.properties.get("alpha"), Some(&Variant::String("kept".to_owned())));

	let strict = DecodeOptions {
		strict_properties: true,
		..DecodeOptions::default()
	};
	let err = decode_document(&bytes, &strict).expect_err("strict mode propagates");
	assert!(matches!(err, ResError::UnsupportedVariant { tag: 35, .. }));
}

#[test]
fn multi_body_documents_use_last_entry_or_reject() {
	let table = strings(&["alpha"]);
	let bytes = raw_document(&table, &["local://1", "local://2"], 1, |writer| {
		writer.write_u32_le(0);
		writer.write_u32_le(2);
		writer.write_u32_le(0);
	});

	let document = decode_document(&bytes, &DecodeOptions::default()).expect("last entry is materialised");
	assert_eq!(document.internal_resources.len(), 2);
	let body = document.resource_body.expect("body exists");
	assert_eq!(body.properties.get("alpha"), Some(&Variant::Bool(false)));

	let reject = DecodeOptions {
		reject_multi_body: true,
		..DecodeOptions::default()
	};
	let err = decode_document(&bytes, &reject).expect_err("multi-body rejected");
	assert!(matches!(err, ResError::MultipleResourceBodies { count: 2 }));
}

#[test]
fn document_without_internal_resources_has_no_body() {
	let mut writer = Writer::new();
	ResHeader::new("Resource", 0).encode(&mut writer).expect("header encodes");
	encode_string_table(&mut writer, &[]).expect("table encodes");
	encode_external_table(&mut writer, &[]).expect("table encodes");
	encode_internal_table(&mut writer, &[]).expect("table encodes");
	writer.write_bytes(b"RSRC");

	let document = decode_document(writer.as_bytes(), &DecodeOptions::default()).expect("document decodes");
	assert!(document.resource_body.is_none());
	assert!(document.internal_resources.is_empty());
}

#[test]
fn body_offset_past_end_is_fatal() {
	let mut writer = Writer::new();
	ResHeader::new("Resource", 0).encode(&mut writer).expect("header encodes");
	encode_string_table(&mut writer, &[]).expect("table encodes");
	encode_external_table(&mut writer, &[]).expect("table encodes");
	encode_internal_table(
		&mut writer,
		&[InternalResource {
			path: "local://1".to_owned(),
			offset: 1 << 40,
		}],
	)
	.expect("table encodes");

	let err = decode_document(writer.as_bytes(), &DecodeOptions::default()).expect_err("bad offset must fail");
	assert!(matches!(err, ResError::OffsetOutOfRange { offset, .. } if offset == 1 << 40));
}

#[test]
fn oversized_string_in_string_table_aborts_decode() {
	let mut writer = Writer::new();
	ResHeader::new("Resource", 0).encode(&mut writer).expect("header encodes");
	writer.write_u32_le(1);
	writer.write_u32_le(2_000_000);
	writer.write_bytes(&[0; 16]);

	let err = decode_document(writer.as_bytes(), &DecodeOptions::default()).expect_err("oversized string must fail");
	assert_eq!(err.kind(), ErrorKind::Format);
	assert!(matches!(err, ResError::StringTooLong { len: 2_000_000, .. }));
}
