// パス: tests/errors.rs
// 役割: ErrorInfo の表示形式と各エラー型のコード付与を検証
// 意図: 利用者が目にする診断文字列の形を固定する
// 関連ファイル: src/errors.rs, src/config.rs, src/source/xml.rs
use trampgen::errors::{ConfigError, ErrorInfo, GenError, SourceError};
use trampgen::source::xml::parse_document;
use trampgen::GeneratorConfig;

#[test]
fn error_display_line_col_pos_and_snippet() {
    let e = ErrorInfo::at("XML010", "msg", Some(12), Some(3), Some(5)).with_snippet("abcdef");
    assert_eq!(e.to_string(), "[XML010] msg @line=3,col=5 @pos=12\nabcdef\n    ^");
}

#[test]
fn error_display_line_only() {
    let e = ErrorInfo::at("REG100", "msg", None, Some(4), None);
    assert_eq!(e.to_string(), "[REG100] msg @line=4");
}

#[test]
fn error_display_pos_only_and_plain() {
    assert_eq!(ErrorInfo::new("E003", "msg", Some(7)).to_string(), "[E003] msg @pos=7");
    assert_eq!(ErrorInfo::new("E004", "plain", None).to_string(), "[E004] plain");
}

#[test]
fn xml_error_points_at_offending_line() {
    let err = parse_document("<a>\n  <b></c>\n</a>").unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.starts_with(&format!("[{}]", err.code())), "{rendered}");
    assert!(rendered.contains("@line=2"), "{rendered}");
    assert!(rendered.contains("  <b></c>"), "{rendered}");
}

#[test]
fn config_errors_carry_codes() {
    let json = GeneratorConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(json, ConfigError::Json(_)));
    assert!(json.to_string().starts_with("[CFG401]"));

    let unknown = GeneratorConfig::from_json_str(r#"{ "nope": 1 }"#).unwrap_err();
    assert!(matches!(unknown, ConfigError::Json(_)));

    let invalid = GeneratorConfig::from_json_str(r#"{ "trace_function": " " }"#).unwrap_err();
    assert!(invalid.to_string().starts_with("[CFG402] 設定値が不正です: trace_function"));
}

#[test]
fn gen_error_wraps_sources() {
    let e: GenError = SourceError::new("HDR201", "bad", None).into();
    assert!(e.to_string().contains("[HDR201] bad"));
    let e: GenError = ConfigError::invalid("prefix", "x").into();
    assert_eq!(e.to_string(), "[CFG402] 設定値が不正です: prefix: x");
}
