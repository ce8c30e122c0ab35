use palette_core::{
    deserialize, parse_document, serialize, serialize_palette, CodecError, Palette,
    PaletteDocument, Section,
};

fn sample_list() -> Vec<Palette> {
    vec![
        Palette {
            id: 1_700_000_000_000,
            title: "Paleta 1 - Naturaleza".to_string(),
            sections: vec![Section::new(
                1,
                "Fondos",
                vec!["#45C4B0".into(), "not-a-color".into()],
            )],
        },
        Palette::new(1_700_000_000_001, ""),
    ]
}

#[test]
fn serialize_then_deserialize_is_lossless() {
    let list = sample_list();
    let text = serialize(&list).unwrap();
    assert_eq!(deserialize(&text).unwrap(), list);
    assert_eq!(deserialize(&serialize(&[]).unwrap()).unwrap(), Vec::new());
}

#[test]
fn serialize_emits_pretty_array_with_wire_field_names() {
    let text = serialize(&sample_list()).unwrap();
    assert!(text.starts_with("[\n  {"));

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value[0]["id"], 1_700_000_000_000_i64);
    assert_eq!(value[0]["sections"][0]["colors"][0], "#45C4B0");
    assert_eq!(value[1]["sections"], serde_json::json!([]));
}

#[test]
fn parse_document_distinguishes_object_and_array() {
    let single = serialize_palette(&sample_list()[0]).unwrap();
    assert!(matches!(
        parse_document(&single).unwrap(),
        PaletteDocument::Single(palette) if palette.id == 1_700_000_000_000
    ));

    let sequence = serialize(&sample_list()).unwrap();
    let document = parse_document(&sequence).unwrap();
    assert_eq!(document.kind(), "sequence");
    assert_eq!(document.len(), 2);
}

#[test]
fn missing_fields_are_defaulted() {
    let document = parse_document(r#"{"id": 4, "sections": [{"id": 2}]}"#).unwrap();
    let palette = match document {
        PaletteDocument::Single(palette) => palette,
        other => panic!("unexpected document: {other:?}"),
    };
    assert_eq!(palette.title, "");
    assert_eq!(palette.sections[0].title, "");
    assert!(palette.sections[0].colors.is_empty());

    let without_id = parse_document(r#"[{"title": "no id"}]"#).unwrap();
    assert_eq!(without_id.into_palettes()[0].id, 0);
}

#[test]
fn malformed_json_is_parse_error_and_wrong_types_are_shape_errors() {
    assert!(matches!(parse_document("[{"), Err(CodecError::Parse(_))));
    assert!(matches!(
        parse_document(r#"[{"id": "abc"}]"#),
        Err(CodecError::Shape(_))
    ));
    assert!(matches!(
        parse_document(r#"{"id": 1.5}"#),
        Err(CodecError::Shape(_))
    ));
    assert!(matches!(parse_document("null"), Err(CodecError::Shape(_))));
}

#[test]
fn deserialize_rejects_single_object() {
    let err = deserialize(r#"{"id": 1}"#).unwrap_err();
    assert!(err.to_string().contains("array"));
}
