// パス: src/source/registry.rs
// 役割: API レジストリ XML から機能順に関数宣言を取り出す
// 意図: バージョン情報付きの宣言をヘッダ走査より正確に供給する
// 関連ファイル: src/source/xml.rs, src/source/mod.rs, tests/registry_source.rs
//! レジストリ読み取り
//!
//! - `<commands>` 配下の `<command>` を名前で索引化する。
//! - `<feature api=API>` を文書順に、続いて `supported` に API を含む `<extension>` を走査し、
//!   `<require>` で初めて参照されたときの機能名を導入バージョンとする。
//! - 互換プロファイル扱いとし、`profile` 属性が互換以外の `<require>` は無視する。

use std::collections::{HashMap, HashSet, VecDeque};

use super::xml::{parse_document, Element, Node};
use super::DeclarationSource;
use crate::errors::SourceError;
use crate::signature::{Declaration, ParamList, Parameter, Signature};

const PROFILE: &str = "compatibility";

#[derive(Debug, Clone)]
pub struct RegistrySource {
    provenance: String,
    pending: VecDeque<Declaration>,
}

impl RegistrySource {
    /// レジストリ全文を解析し、`api`（例: `gl`）向けの宣言列を構築する。
    pub fn parse(provenance: impl Into<String>, text: &str, api: &str) -> Result<Self, SourceError> {
        let root = parse_document(text)?;
        if root.name != "registry" {
            return Err(SourceError::at(
                "REG100",
                format!("ルート要素が <registry> ではありません: <{}>", root.name),
                None,
                Some(root.line),
                None,
            ));
        }

        let mut commands: HashMap<String, Signature> = HashMap::new();
        for block in root.children_named("commands") {
            for cmd in block.children_named("command") {
                let sig = command_signature(cmd)?;
                commands.insert(sig.name.clone(), sig);
            }
        }

        let mut pending = VecDeque::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut visit = |feature: &Element, pending: &mut VecDeque<Declaration>| -> Result<(), SourceError> {
            let Some(feature_name) = feature.attr("name") else {
                return Err(SourceError::at(
                    "REG110",
                    format!("<{}> に name 属性がありません", feature.name),
                    None,
                    Some(feature.line),
                    None,
                ));
            };
            for req in feature.children_named("require") {
                if !require_applies(req, api) {
                    continue;
                }
                for cmd_ref in req.children_named("command") {
                    let Some(name) = cmd_ref.attr("name") else {
                        continue;
                    };
                    if !seen.insert(name.to_string()) {
                        continue;
                    }
                    let Some(sig) = commands.get(name) else {
                        return Err(SourceError::at(
                            "REG111",
                            format!("{feature_name} が未定義のコマンド {name} を要求しています"),
                            None,
                            Some(cmd_ref.line),
                            None,
                        ));
                    };
                    pending.push_back(Declaration::new(sig.clone(), feature_name));
                }
            }
            Ok(())
        };

        for feature in root.children_named("feature") {
            if feature.attr("api") == Some(api) {
                visit(feature, &mut pending)?;
            }
        }
        for block in root.children_named("extensions") {
            for ext in block.children_named("extension") {
                if extension_supported(ext, api) {
                    visit(ext, &mut pending)?;
                }
            }
        }

        Ok(Self {
            provenance: provenance.into(),
            pending,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl DeclarationSource for RegistrySource {
    fn next_declaration(&mut self) -> Option<Declaration> {
        self.pending.pop_front()
    }

    fn provenance(&self) -> &str {
        &self.provenance
    }
}

fn require_applies(req: &Element, api: &str) -> bool {
    let api_ok = req.attr("api").map_or(true, |a| a == api);
    let profile_ok = req.attr("profile").map_or(true, |p| p == PROFILE);
    api_ok && profile_ok
}

fn extension_supported(ext: &Element, api: &str) -> bool {
    ext.attr("supported")
        .map_or(false, |s| s.split('|').any(|part| part == api))
}

fn command_signature(cmd: &Element) -> Result<Signature, SourceError> {
    let Some(proto) = cmd.first_child("proto") else {
        return Err(SourceError::at(
            "REG101",
            "<command> に <proto> がありません",
            None,
            Some(cmd.line),
            None,
        ));
    };
    let (return_type, name) = split_typed_name(proto)?;
    let mut params = Vec::new();
    for param in cmd.children_named("param") {
        let (ty, pname) = split_typed_name(param)?;
        params.push(Parameter::new(ty, pname));
    }
    Ok(Signature::new(name, return_type, ParamList::from_params(params)))
}

/// `<proto>` / `<param>` を (型テキスト, 名前) に分ける。型は `<name>` より前のテキスト全体。
fn split_typed_name(elem: &Element) -> Result<(String, String), SourceError> {
    let mut ty = String::new();
    for child in &elem.children {
        match child {
            Node::Element(e) if e.name == "name" => return Ok((ty, e.text())),
            Node::Element(e) => ty.push_str(&e.text()),
            Node::Text(t) => ty.push_str(t),
        }
    }
    Err(SourceError::at(
        "REG102",
        format!("<{}> に <name> がありません", elem.name),
        None,
        Some(elem.line),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proto_text_before_name_is_return_type() {
        let root = parse_document(
            "<proto>const <ptype>GLubyte</ptype> *<name>glGetString</name></proto>",
        )
        .unwrap();
        let (ty, name) = split_typed_name(&root).unwrap();
        assert_eq!(ty, "const GLubyte *");
        assert_eq!(name, "glGetString");
    }

    #[test]
    fn missing_name_is_an_error() {
        let root = parse_document("<param><ptype>GLenum</ptype></param>").unwrap();
        let err = split_typed_name(&root).unwrap_err();
        assert_eq!(err.code(), "REG102");
    }
}
