use serde_json::{Value, json};

use crate::res::{Document, ErrorKind, ExternalResource, InternalResource, Properties, ResHeader, ResourceBody, Variant};

fn sample() -> Document {
	let mut header = ResHeader::new("Resource", 0x02);
	header.uid = 18_446_744_073_709_551_615;
	Document {
		header,
		string_table: vec!["zeta".to_owned(), "alpha".to_owned()],
		external_resources: vec![ExternalResource {
			type_name: "Texture2D".to_owned(),
			path: "res://icon.png".to_owned(),
			uid: 7,
		}],
		internal_resources: vec![InternalResource {
			path: "local://1".to_owned(),
			offset: 128,
		}],
		resource_body: Some(ResourceBody {
			type_name: "Resource".to_owned(),
			properties: [("zeta", Variant::Int(1)), ("alpha", Variant::Bool(false))].into_iter().collect(),
		}),
	}
}

#[test]
fn json_uses_camel_case_and_decimal_text_for_u64() {
	let value = serde_json::to_value(sample()).expect("document serializes");
	assert_eq!(value["header"]["uid"], json!("18446744073709551615"));
	assert_eq!(value["header"]["importMetadataOffset"], json!("0"));
	assert_eq!(value["header"]["hasUids"], json!(true));
	assert_eq!(value["header"]["resourceType"], json!("Resource"));
	assert_eq!(value["externalResources"][0]["type"], json!("Texture2D"));
	assert_eq!(value["externalResources"][0]["uid"], json!("7"));
	assert_eq!(value["internalResources"][0]["offset"], json!("128"));
	assert_eq!(value["resourceBody"]["type"], json!("Resource"));
}

#[test]
fn property_order_survives_json() {
	let text = sample().to_json_string(false).expect("document renders");
	let zeta = text.find("\"zeta\":").expect("zeta present");
	let alpha = text.find("\"alpha\":").expect("alpha present");
	let body = text.find("\"resourceBody\"").expect("body present");
	assert!(body < zeta && zeta < alpha);

	let parsed = Document::from_json_str(&text).expect("document parses");
	let names: Vec<_> = parsed.resource_body.as_ref().expect("body").properties.iter().map(|(name, _)| name).collect();
	assert_eq!(names, ["zeta", "alpha"]);
	assert_eq!(parsed, sample());
}

#[test]
fn u64_fields_accept_numbers_and_legacy_body_key() {
	let value = json!({
		"header": {
			"magic": "RSRC",
			"verMajor": 4,
			"verMinor": 2,
			"verFormat": 6,
			"resourceType": "Curve",
			"importMetadataOffset": 0,
			"flags": 0,
			"uid": 42
		},
		"stringTable": ["points"],
		"internalResources": [{"path": "local://1", "offset": 64}],
		"resourceData": {"type": "Curve", "properties": {"points": []}}
	});
	let document: Document = serde_json::from_value(value).expect("document parses");
	assert_eq!(document.header.uid, 42);
	assert_eq!(document.internal_resources[0].offset, 64);
	assert!(document.external_resources.is_empty());
	let body = document.resource_body.expect("alias populates body");
	assert_eq!(body.properties.get("points"), Some(&Variant::Array(Vec::new())));
}

#[test]
fn malformed_u64_text_is_a_json_error() {
	let text = r#"{"header":{"magic":"RSRC","verMajor":4,"verMinor":0,"verFormat":6,"resourceType":"R","uid":"abc"}}"#;
	let err = Document::from_json_str(text).expect_err("bad uid must fail");
	assert_eq!(err.kind(), ErrorKind::Json);
}

#[test]
fn duplicate_property_keeps_first_position() {
	let mut properties = Properties::new();
	properties.insert("a", Variant::Int(1));
	properties.insert("b", Variant::Int(2));
	properties.insert("a", Variant::Int(3));
	let items: Vec<_> = properties.iter().collect();
	assert_eq!(items, [("a", &Variant::Int(3)), ("b", &Variant::Int(2))]);
}

#[test]
fn missing_body_serializes_as_null() {
	let mut document = sample();
	document.resource_body = None;
	let value: Value = serde_json::to_value(&document).expect("document serializes");
	assert_eq!(value["resourceBody"], Value::Null);
}
