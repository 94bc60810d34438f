// パス: src/source/xml.rs
// 役割: xml クレートのイベント列からレジストリ用の小さな要素ツリーを組み立てる
// 意図: レジストリ読み取りが必要とする要素・属性・テキストだけを位置付きで保持する
// 関連ファイル: src/source/registry.rs, src/errors.rs
//! XML ツリー
//!
//! - 字句解析と整形式検査は `xml::reader::EventReader` に任せる。
//! - CDATA と空白は通常のテキストとして扱い、コメントと処理命令は捨てる。
//! - 失敗は行・列・スニペット付きの `SourceError` で返す。

use xml::common::Position;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

use crate::errors::SourceError;

/// 要素ノード。子は要素とテキストが出現順に並ぶ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 直下の子要素を順に返す。
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// 指定名の直下子要素を返す。
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// 子孫のテキストをすべて連結する。
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }
}

fn parser_config() -> ParserConfig {
    ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true)
}

/// 0 始まりの行・列を 1 始まりにし、該当行をスニペットとして付ける。
fn located_error(src: &str, code: &'static str, message: impl Into<String>, row: u64, column: u64) -> SourceError {
    let line = row as usize + 1;
    let snippet = src.lines().nth(row as usize).unwrap_or_default();
    SourceError::at_with_snippet(code, message, None, Some(line), Some(column as usize + 1), snippet)
}

/// 文書全体を解析し、ルート要素を返す。
pub fn parse_document(src: &str) -> Result<Element, SourceError> {
    let mut reader = EventReader::new_with_config(src.as_bytes(), parser_config());
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    loop {
        let event = match reader.next() {
            Ok(event) => event,
            Err(err) => {
                let pos = err.position();
                return Err(located_error(src, "XML001", err.msg().to_string(), pos.row, pos.column));
            }
        };
        match event {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                let line = reader.position().row as usize + 1;
                let attrs = attributes
                    .into_iter()
                    .map(|a| (a.name.local_name, a.value))
                    .collect();
                stack.push(Element {
                    name: name.local_name,
                    attrs,
                    children: Vec::new(),
                    line,
                });
            }
            XmlEvent::EndElement { .. } => {
                // 対応関係はリーダが検査済み
                let Some(elem) = stack.pop() else {
                    let pos = reader.position();
                    return Err(located_error(src, "XML002", "対応する開始タグがありません", pos.row, pos.column));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(elem)),
                    None => root = Some(elem),
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) | XmlEvent::Whitespace(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text));
                }
            }
            XmlEvent::EndDocument => break,
            _ => {}
        }
    }
    root.ok_or_else(|| SourceError::new("XML003", "ルート要素がありません", None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_text() {
        let doc = parse_document(
            "<?xml version=\"1.0\"?>\n<!-- c -->\n<a x=\"1\"><b>t&amp;u</b><c/></a>",
        )
        .unwrap();
        assert_eq!(doc.name, "a");
        assert_eq!(doc.attr("x"), Some("1"));
        assert_eq!(doc.first_child("b").unwrap().text(), "t&u");
        assert!(doc.first_child("c").is_some());
    }

    #[test]
    fn mismatched_close_reports_line() {
        let err = parse_document("<a>\n  <b></c>\n</a>").unwrap_err();
        assert_eq!(err.code(), "XML001");
        assert_eq!(err.0.line, Some(2));
        assert_eq!(err.0.snippet.as_deref(), Some("  <b></c>"));
    }

    #[test]
    fn cdata_is_kept_as_text() {
        let doc = parse_document("<proto><![CDATA[void]]> <name>glFoo</name></proto>").unwrap();
        assert_eq!(doc.text(), "void glFoo");
        assert_eq!(doc.first_child("name").unwrap().text(), "glFoo");
    }

    #[test]
    fn char_refs_are_decoded() {
        let doc = parse_document("<a>&#65;&#x42;</a>").unwrap();
        assert_eq!(doc.text(), "AB");
    }

    #[test]
    fn element_lines_are_one_based() {
        let doc = parse_document("<a>\n\n  <b/>\n</a>").unwrap();
        assert_eq!(doc.line, 1);
        assert_eq!(doc.first_child("b").unwrap().line, 3);
    }
}
