#![allow(missing_docs)]

use resjson::res::{
	DecodeOptions, Document, EncodeOptions, ExternalResource, FLAG_REAL_T_IS_DOUBLE, FLAG_UIDS, InternalResource, NodePath, ObjectRef,
	Properties, ResHeader, ResourceBody, Variant, decode_document, encode_document,
};

fn rich_document(flags: u32) -> Document {
	let mut header = ResHeader::new("Resource", flags | FLAG_UIDS);
	header.uid = 9_007_199_254_740_993;

	let properties: Properties = [
		("resource_name", Variant::String("sample".to_owned())),
		("count", Variant::Int(-7)),
		("ratio", Variant::Float(0.5)),
		("big", Variant::Int64(i64::MIN)),
		("precise", Variant::Double(1.0 / 3.0)),
		("animation", Variant::StringName("idle".to_owned())),
		("origin", Variant::Vector3([1.0, 2.5, -4.0])),
		("xform", Variant::Transform2d([1.0, 0.0, 0.0, 1.0, 16.0, 32.0])),
		("tint", Variant::Color([1.0, 0.5, 0.25, 1.0])),
		("cell", Variant::Vector2i([3, -4])),
		("texture", Variant::Object(ObjectRef::External { index: 0 })),
		("none", Variant::Object(ObjectRef::Null)),
		(
			"target",
			Variant::NodePath(NodePath {
				names: vec!["Player".to_owned(), "Camera".to_owned()],
				subnames: vec!["position".to_owned()],
				absolute: false,
			}),
		),
		(
			"metadata",
			Variant::Dictionary(vec![
				(Variant::String("speed".to_owned()), Variant::Float(3.5)),
				(Variant::Int(1), Variant::Array(vec![Variant::Bool(true), Variant::Nil])),
			]),
		),
	]
	.into_iter()
	.collect();

	let mut string_table: Vec<String> = properties.iter().map(|(name, _)| name.to_owned()).collect();
	string_table.push("Player".to_owned());

	Document {
		header,
		string_table,
		external_resources: vec![ExternalResource {
			type_name: "Texture2D".to_owned(),
			path: "res://icon.svg".to_owned(),
			uid: 42,
		}],
		internal_resources: vec![InternalResource {
			path: "local://1".to_owned(),
			offset: 0,
		}],
		resource_body: Some(ResourceBody {
			type_name: "Resource".to_owned(),
			properties,
		}),
	}
}

fn with_real_offset(mut document: Document, bytes: &[u8]) -> Document {
	let decoded = decode_document(bytes, &DecodeOptions::default()).expect("encoded bytes decode");
	document.internal_resources[0].offset = decoded.internal_resources[0].offset;
	document
}

#[test]
fn document_survives_binary_round_trip() {
	let document = rich_document(0);
	let bytes = encode_document(&document, &EncodeOptions::default()).expect("document encodes");
	let decoded = decode_document(&bytes, &DecodeOptions::default()).expect("document decodes");
	assert_eq!(decoded, with_real_offset(document, &bytes));
}

#[test]
fn double_precision_documents_keep_full_width() {
	let mut document = rich_document(FLAG_REAL_T_IS_DOUBLE);
	if let Some(body) = document.resource_body.as_mut() {
		body.properties.insert("origin", Variant::Vector3([0.1, 0.2, 0.3]));
	}
	let bytes = encode_document(&document, &EncodeOptions::default()).expect("document encodes");
	let decoded = decode_document(&bytes, &DecodeOptions::default()).expect("document decodes");
	assert!(decoded.header.real_t_is_double);
	let origin = decoded.resource_body.as_ref().and_then(|body| body.properties.get("origin"));
	assert_eq!(origin, Some(&Variant::Vector3([0.1, 0.2, 0.3])));
}

#[test]
fn json_then_binary_is_byte_stable() {
	let bytes = encode_document(&rich_document(0), &EncodeOptions::default()).expect("document encodes");
	let decoded = decode_document(&bytes, &DecodeOptions::default()).expect("document decodes");

	let text = decoded.to_json_string(true).expect("json renders");
	let reparsed = Document::from_json_str(&text).expect("json parses");
	assert_eq!(reparsed, decoded);

	let again = encode_document(&reparsed, &EncodeOptions::default()).expect("document re-encodes");
	assert_eq!(again, bytes);
}

#[test]
fn json_form_tags_ambiguous_values() {
	let bytes = encode_document(&rich_document(0), &EncodeOptions::default()).expect("document encodes");
	let decoded = decode_document(&bytes, &DecodeOptions::default()).expect("document decodes");
	let value = serde_json::to_value(&decoded).expect("document serializes");

	let properties = &value["resourceBody"]["properties"];
	assert_eq!(properties["resource_name"], "sample");
	assert_eq!(properties["count"], serde_json::json!({"kind": "INT", "value": -7}));
	assert_eq!(properties["big"]["value"], "-9223372036854775808");
	assert_eq!(properties["texture"], serde_json::json!({"kind": "EXTERNAL_RESOURCE", "value": 0}));
	assert_eq!(properties["none"], serde_json::json!({"kind": "OBJECT", "value": null}));
	assert_eq!(properties["metadata"]["kind"], "DICTIONARY");
	assert_eq!(value["header"]["uid"], "9007199254740993");
}

#[test]
fn truncated_input_is_rejected() {
	let bytes = encode_document(&rich_document(0), &EncodeOptions::default()).expect("document encodes");
	let err = decode_document(&bytes[..20], &DecodeOptions::default()).expect_err("truncated header must fail");
	assert_eq!(err.kind(), resjson::res::ErrorKind::Format);
}
