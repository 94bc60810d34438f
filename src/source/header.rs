// パス: src/source/header.rs
// 役割: C ヘッダの `GLAPI ... APIENTRY name(args);` 行を正規表現で走査して宣言を得る
// 意図: レジストリが無い環境でもヘッダだけでトランポリンを生成できるようにする
// 関連ファイル: src/source/mod.rs, src/signature.rs, tests/header_source.rs

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use super::DeclarationSource;
use crate::errors::SourceError;
use crate::signature::{Declaration, ParamList, Parameter, Signature};

static PROTOTYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bGLAPI\s+(.+?)\s+APIENTRY\s+(\w+)\s*\((.*)\)\s*;").expect("prototype regex")
});

static SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/\*\s*(\d+)\.(\d+)\s+functions\s*\*/$").expect("section regex")
});

/// セクションコメントが現れるまでの既定機能名。
pub const INITIAL_FEATURE: &str = "GL_VERSION_1_0";

/// 型名として単独で現れうる語。これで終わる引数は無名とみなす。
const TYPE_WORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "const",
];

/// 修飾子だけの語。型部分がこれだけなら末尾の語は型名であり引数名ではない。
const QUALIFIERS: &[&str] = &["const", "volatile"];

#[derive(Debug, Clone)]
pub struct HeaderSource {
    provenance: String,
    pending: VecDeque<Declaration>,
}

impl HeaderSource {
    /// ヘッダ全文を走査する。`provenance` は由来コメントに使う名前。
    pub fn parse(provenance: impl Into<String>, text: &str) -> Result<Self, SourceError> {
        let mut pending = VecDeque::new();
        let mut feature = INITIAL_FEATURE.to_string();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if let Some(caps) = SECTION.captures(line) {
                feature = format!("GL_VERSION_{}_{}", &caps[1], &caps[2]);
                continue;
            }
            let Some(caps) = PROTOTYPE.captures(line) else {
                continue;
            };
            let params = parse_arglist(&caps[3]).map_err(|(msg, col)| {
                let col = raw.find(&caps[3]).map_or(col, |base| base + col + 1);
                SourceError::at_with_snippet("HDR201", msg, None, Some(idx + 1), Some(col), raw)
            })?;
            let signature = Signature::new(&caps[2], &caps[1], params);
            pending.push_back(Declaration::new(signature, feature.clone()));
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

impl DeclarationSource for HeaderSource {
    fn next_declaration(&mut self) -> Option<Declaration> {
        self.pending.pop_front()
    }

    fn provenance(&self) -> &str {
        &self.provenance
    }
}

/// 引数リスト文字列を分割する。失敗時は (メッセージ, 引数リスト内の桁) を返す。
fn parse_arglist(arglist: &str) -> Result<ParamList, (String, usize)> {
    let trimmed = arglist.trim();
    if trimmed.is_empty() || trimmed == "void" {
        return Ok(ParamList::Void);
    }
    let mut params = Vec::new();
    let mut offset = 0;
    for (index, arg) in arglist.split(',').enumerate() {
        if arg.trim().is_empty() {
            return Err((format!("{} 番目の引数が空です", index + 1), offset));
        }
        params.push(parse_param(arg, index));
        offset += arg.len() + 1;
    }
    Ok(ParamList::from_params(params))
}

fn parse_param(arg: &str, index: usize) -> Parameter {
    let arg = arg.trim();
    let (base, is_array) = match arg.find('[') {
        Some(i) => (arg[..i].trim_end(), true),
        None => (arg, false),
    };
    let split = base
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(0, |i| i + 1);
    let (ty, name) = base.split_at(split);
    let qualifier_only = ty.split_whitespace().all(|w| QUALIFIERS.contains(&w));
    let unnamed = qualifier_only || name.is_empty() || TYPE_WORDS.contains(&name);
    let (ty, name) = if unnamed {
        (base.to_string(), format!("p{index}"))
    } else {
        (ty.to_string(), name.to_string())
    };
    // 配列引数はポインタへ減衰させる
    let ty = if is_array { format!("{} *", ty.trim()) } else { ty };
    Parameter::new(ty, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_named_and_unnamed_params() {
        let list = parse_arglist("GLenum mode, const GLfloat *v, GLint").unwrap();
        let params = list.as_slice();
        assert_eq!(params[0], Parameter::new("GLenum", "mode"));
        assert_eq!(params[1], Parameter::new("const GLfloat *", "v"));
        assert_eq!(params[2], Parameter::new("GLint", "p2"));
    }

    #[test]
    fn qualified_type_without_name_is_unnamed() {
        let list = parse_arglist("const GLubyte, volatile const GLint, const GLuint *ids").unwrap();
        let params = list.as_slice();
        assert_eq!(params[0], Parameter::new("const GLubyte", "p0"));
        assert_eq!(params[1], Parameter::new("volatile const GLint", "p1"));
        assert_eq!(params[2], Parameter::new("const GLuint *", "ids"));
    }

    #[test]
    fn arrays_decay_to_pointers() {
        let list = parse_arglist("const GLdouble m[16]").unwrap();
        assert_eq!(list.as_slice()[0], Parameter::new("const GLdouble *", "m"));
    }

    #[test]
    fn void_and_empty_lists() {
        assert!(parse_arglist("void").unwrap().is_void());
        assert!(parse_arglist("  ").unwrap().is_void());
        assert!(parse_arglist("GLenum a,,GLint b").is_err());
    }
}
