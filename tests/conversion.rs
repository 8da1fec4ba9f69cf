mod common;

use std::path::{Path, PathBuf};

use survey_pdf::config::{FontConfig, PageSetup};
use survey_pdf::{Config, Error, convert_json_bytes_to_pdf, convert_json_to_pdf, load_config};

fn test_config() -> Config {
    Config {
        fonts: FontConfig {
            dirs: vec![],
            ..FontConfig::default()
        },
        ..Config::default()
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn survey_json(sizes: &[usize]) -> Vec<u8> {
    let categories: Vec<_> = sizes
        .iter()
        .enumerate()
        .map(|(c, &n)| {
            let questions: Vec<_> = (0..n)
                .map(|q| serde_json::json!({ "Text": format!("Question {q} of {c}"), "YesPercentage": 50 }))
                .collect();
            serde_json::json!({ "name": format!("Category {c}"), "questions": questions })
        })
        .collect();
    serde_json::to_vec(&serde_json::json!({ "title": "Sized", "categories": categories })).unwrap()
}

#[test]
fn sample_survey_becomes_a_single_a3_page() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("report.pdf");

    convert_json_bytes_to_pdf(common::SAMPLE_JSON.as_bytes(), &output, &test_config())
        .expect("conversion");

    let pdf = std::fs::read(&output).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(common::page_count(&pdf), 1);

    let boxes = common::media_boxes(&pdf);
    assert_eq!(boxes.len(), 1);
    let expected = [0.0, 0.0, 1190.5, 841.895];
    assert_eq!(boxes[0].len(), 4);
    for (got, want) in boxes[0].iter().zip(expected) {
        assert!((got - want).abs() < 0.01, "media box {:?}", boxes[0]);
    }
    assert!(!tmp_sibling(&output).exists());
}

#[test]
fn converts_from_a_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    let output = dir.path().join("output.pdf");
    std::fs::write(&input, common::SAMPLE_JSON).unwrap();

    convert_json_to_pdf(&input, &output, &test_config()).expect("conversion");
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn custom_page_size_is_used_for_the_media_box() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a4.pdf");
    let config = Config {
        page: PageSetup {
            width: 842.0,
            height: 595.0,
            ..PageSetup::default()
        },
        ..test_config()
    };

    convert_json_bytes_to_pdf(common::SAMPLE_JSON.as_bytes(), &output, &config).unwrap();
    let boxes = common::media_boxes(&std::fs::read(&output).unwrap());
    assert_eq!(boxes, vec![vec![0.0, 0.0, 842.0, 595.0]]);
}

#[test]
fn failed_conversion_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");
    let bad_percentage = br#"{ "title": "t", "categories": [
        { "name": "c", "questions": [{ "Text": "Over", "YesPercentage": 140 }] }
    ]}"#;

    match convert_json_bytes_to_pdf(bad_percentage, &output, &test_config()) {
        Err(Error::InvalidPercentage { value, .. }) => assert_eq!(value, 140.0),
        other => panic!("expected InvalidPercentage, got {other:?}"),
    }
    assert!(!output.exists());

    match convert_json_bytes_to_pdf(&survey_json(&[14, 14, 14]), &output, &test_config()) {
        Err(Error::ColumnBudgetExceeded { required }) => assert_eq!(required, 4),
        other => panic!("expected ColumnBudgetExceeded, got {other:?}"),
    }
    assert!(!output.exists());
    assert!(!tmp_sibling(&output).exists());
}

#[test]
fn failed_conversion_keeps_an_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");
    std::fs::write(&output, b"previous").unwrap();

    assert!(convert_json_bytes_to_pdf(b"[]", &output, &test_config()).is_err());
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");
}

#[test]
fn logo_is_embedded_as_an_image() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    image::RgbaImage::from_pixel(8, 4, image::Rgba([44, 55, 146, 200]))
        .save(&logo)
        .unwrap();
    let output = dir.path().join("with-logo.pdf");
    let config = Config {
        logo: Some(logo),
        ..test_config()
    };

    convert_json_bytes_to_pdf(common::SAMPLE_JSON.as_bytes(), &output, &config).unwrap();
    let pdf = std::fs::read(&output).unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("/Subtype /Image"));
    assert!(text.contains("/Im1"));
}

#[test]
fn unreadable_logo_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    std::fs::write(&logo, b"not an image").unwrap();
    let output = dir.path().join("no-logo.pdf");
    let config = Config {
        logo: Some(logo),
        ..test_config()
    };

    convert_json_bytes_to_pdf(common::SAMPLE_JSON.as_bytes(), &output, &config).unwrap();
    let pdf = std::fs::read(&output).unwrap();
    assert!(!String::from_utf8_lossy(&pdf).contains("/Subtype /Image"));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r##"{
            "page": { "margin_x": 10 },
            "fonts": { "body": "DejaVu Sans", "dirs": [] },
            "palette": { "positive": "#008000" }
        }"##,
    )
    .unwrap();

    let config = load_config(Some(&path)).expect("config");
    assert_eq!(config.page.margin_x, 10.0);
    assert_eq!(config.page.width, 1190.5);
    assert_eq!(config.fonts.body, "DejaVu Sans");
    assert_eq!(config.fonts.heading, "Futura Medium");
    assert!(config.fonts.dirs.is_empty());
    assert_eq!(config.palette.positive.0, [0, 128, 0]);
    assert!(config.logo.is_none());
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    std::fs::write(&path, r#"{ "page": { "width": 50, "margin_x": 40 } }"#).unwrap();
    assert!(matches!(load_config(Some(&path)), Err(Error::Config(_))));

    std::fs::write(&path, r#"{ "palette": { "neutral": "blue" } }"#).unwrap();
    match load_config(Some(&path)) {
        Err(Error::Config(msg)) => assert!(msg.contains("config.json"), "{msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }

    assert!(load_config(None).is_ok());
}

/// `/Size` from the trailer: one past the highest object number in use.
fn xref_size(pdf: &[u8]) -> Option<u32> {
    let text = String::from_utf8_lossy(pdf);
    let start = text.rfind("/Size ")? + "/Size ".len();
    text[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()?
        .parse()
        .ok()
}

#[test]
fn undecodable_logo_does_not_consume_object_numbers() {
    let dir = tempfile::tempdir().unwrap();

    // Valid PNG signature and header, no image data.
    let full = dir.path().join("full.png");
    image::RgbImage::from_pixel(16, 16, image::Rgb([82, 178, 232]))
        .save(&full)
        .unwrap();
    let bytes = std::fs::read(&full).unwrap();
    let truncated = dir.path().join("truncated.png");
    std::fs::write(&truncated, &bytes[..33]).unwrap();

    let plain = dir.path().join("plain.pdf");
    convert_json_bytes_to_pdf(common::SAMPLE_JSON.as_bytes(), &plain, &test_config()).unwrap();

    let broken = dir.path().join("broken.pdf");
    let config = Config {
        logo: Some(truncated),
        ..test_config()
    };
    convert_json_bytes_to_pdf(common::SAMPLE_JSON.as_bytes(), &broken, &config).unwrap();

    let plain = std::fs::read(&plain).unwrap();
    let broken = std::fs::read(&broken).unwrap();
    assert!(!String::from_utf8_lossy(&broken).contains("/Subtype /Image"));
    assert!(xref_size(&plain).is_some());
    assert_eq!(xref_size(&broken), xref_size(&plain));
}

#[test]
fn missing_config_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent-config.json");
    match load_config(Some(&path)) {
        Err(Error::Io(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            assert!(e.to_string().contains("absent-config.json"), "{e}");
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}
