use super::*;
use crate::style::color::Color;
use crate::style::model::{Comp, Fill, Plate, PlateShape, PlateSize, Position, Shadow, Stroke};

fn sample() -> TelopStyle {
    TelopStyle {
        text: Some("テロップ sample".to_string()),
        font_name: "Noto Sans JP Black".to_string(),
        font_size: 96,
        tracking: -25,
        position: Position { x: -4, y: 620 },
        fill: Fill {
            enabled: true,
            color: Color::new(1.0, 0.9, 0.1).unwrap(),
        },
        strokes: vec![
            Stroke {
                color: Color::new(0.8, 0.1, 0.1).unwrap(),
                width: 30,
            },
            Stroke {
                color: Color::new(0.1, 0.1, 0.8).unwrap(),
                width: 10,
            },
        ],
        shadow: Shadow {
            enabled: true,
            color: Color::new(0.0, 0.0, 0.0).unwrap(),
            distance: 8,
            softness: 6,
            opacity: 60,
            direction: 135,
        },
        plate: Plate {
            enabled: true,
            shape: PlateShape::RoundedRect,
            size: PlateSize { w: 640, h: 160 },
            radius: 24,
            color: Color::new(0.2, 0.2, 0.2).unwrap(),
            opacity: 80,
            stroke_width: 4,
            stroke_color: Color::WHITE,
        },
        comp: Comp {
            width: 1280,
            height: 720,
            fps: 24,
            duration: 2.5,
        },
        template_name: "Lower_Third-01".to_string(),
    }
}

#[test]
fn roundtrip_preserves_value_and_stroke_order() {
    let s = sample();
    let text = serialize(&s).unwrap();
    let back = deserialize(&text).unwrap();
    assert_eq!(back, s);
    assert_eq!(back.strokes[0].width, 30);
    assert_eq!(back.strokes[1].width, 10);
}

#[test]
fn inferred_styles_always_serialize() {
    use crate::assets::decode::ImageDims;
    use crate::infer::heuristics::style_for_dims;

    for (width, height) in [(1, 1), (1920, 1080), (16_000, 9)] {
        let style = style_for_dims(ImageDims { width, height });
        let text = serialize(&style).unwrap();
        assert_eq!(deserialize(&text).unwrap(), style);
    }
}

#[test]
fn invalid_style_is_not_serialized() {
    let mut s = sample();
    s.comp.duration = f64::NAN;
    assert!(matches!(serialize(&s), Err(TelopError::Format(_))));

    let mut s = sample();
    s.template_name = "a/b".to_string();
    assert!(matches!(s.to_json(), Err(TelopError::Format(_))));
}

#[test]
fn serialized_field_order_is_canonical() {
    let text = sample().to_json().unwrap();
    let keys = [
        "\"text\"",
        "\"font_name\"",
        "\"font_size\"",
        "\"tracking\"",
        "\"position\"",
        "\"fill\"",
        "\"strokes\"",
        "\"shadow\"",
        "\"plate\"",
        "\"comp\"",
        "\"template_name\"",
    ];
    let mut last = 0usize;
    for k in keys {
        let at = text.find(k).unwrap_or_else(|| panic!("missing {k}"));
        assert!(at >= last, "{k} out of order");
        last = at;
    }
    assert!(text.contains("\"shape\": \"rounded-rect\""));
    assert!(text.contains("テロップ"));
}

#[test]
fn null_text_roundtrips_but_missing_text_is_rejected() {
    let mut s = sample();
    s.text = None;
    let text = s.to_json().unwrap();
    assert!(text.contains("\"text\": null"));
    assert_eq!(deserialize(&text).unwrap(), s);

    let mut v: serde_json::Value = serde_json::from_str(&text).unwrap();
    v.as_object_mut().unwrap().remove("text");
    let err = deserialize(&v.to_string()).unwrap_err();
    assert!(matches!(err, TelopError::Format(_)));
}

#[test]
fn missing_comp_is_rejected() {
    let mut v: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
    v.as_object_mut().unwrap().remove("comp");
    let err = deserialize(&v.to_string()).unwrap_err();
    match err {
        TelopError::Format(msg) => assert!(msg.contains("comp"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_keys_are_rejected() {
    let mut v: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
    v["shadow"]["spread"] = serde_json::json!(3);
    assert!(matches!(
        deserialize(&v.to_string()),
        Err(TelopError::Format(_))
    ));
}

#[test]
fn wrong_shapes_are_rejected() {
    let base: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();

    let mut v = base.clone();
    v["fill"]["color"] = serde_json::json!([1.0, 1.0]);
    assert!(deserialize(&v.to_string()).is_err());

    let mut v = base.clone();
    v["strokes"][0]["color"] = serde_json::json!([1.0, 1.2, 0.0]);
    assert!(deserialize(&v.to_string()).is_err());

    let mut v = base.clone();
    v["font_size"] = serde_json::json!("big");
    assert!(deserialize(&v.to_string()).is_err());

    let mut v = base.clone();
    v["strokes"][0]["width"] = serde_json::json!(-1);
    assert!(deserialize(&v.to_string()).is_err());

    let mut v = base;
    v["plate"]["shape"] = serde_json::json!("ellipse");
    assert!(deserialize(&v.to_string()).is_err());
}

#[test]
fn not_json_is_a_format_error() {
    assert!(matches!(
        deserialize("{ text: nope"),
        Err(TelopError::Format(_))
    ));
    assert!(matches!(deserialize(""), Err(TelopError::Format(_))));
}

#[test]
fn save_and_load_path_roundtrip() {
    let dir = std::env::temp_dir().join(format!(
        "telop_interchange_{}_{}",
        std::process::id(),
        line!()
    ));
    let path = dir.join("nested").join("style.json");
    let s = sample();
    s.save_to_path(&path).unwrap();
    let back = TelopStyle::from_path(&path).unwrap();
    assert_eq!(back, s);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn from_path_missing_file_is_not_a_format_error() {
    let err = TelopStyle::from_path("/definitely/not/here/style.json").unwrap_err();
    assert!(matches!(err, TelopError::Other(_)));
}
