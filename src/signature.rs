// パス: src/signature.rs
// 役割: 関数宣言の正規化モデル（名前・戻り値型・引数列）を定義する
// 意図: 宣言ソースの違いを吸収し、保持ポリシーと各エミッタが共通に扱えるようにする
// 関連ファイル: src/source/mod.rs, src/policy/mod.rs, src/emit/trampoline.rs
//! シグネチャモデル
//!
//! - 型テキストは宣言ソースから受け取ったものを空白整形のみして保持する。
//! - 引数なしは `ParamList::Void` で表す。空の `List` も引数なしとして扱う。

use std::fmt;

/// 1 個の仮引数（型テキストと名前）。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: normalize_type_text(&ty.into()),
            name: name.into().trim().to_string(),
        }
    }
}

/// 引数列。`Void` は「引数なし」を明示する番兵。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamList {
    Void,
    List(Vec<Parameter>),
}

impl ParamList {
    /// 空ベクタは `Void` へ正規化する。
    pub fn from_params(params: Vec<Parameter>) -> Self {
        if params.is_empty() {
            Self::Void
        } else {
            Self::List(params)
        }
    }

    /// 引数が 1 個も無いか。空の `List` も含む。
    pub fn is_void(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn as_slice(&self) -> &[Parameter] {
        match self {
            Self::Void => &[],
            Self::List(params) => params,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// 関数宣言 1 件の正規化表現。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub return_type: String,
    pub params: ParamList,
}

impl Signature {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>, params: ParamList) -> Self {
        Self {
            name: name.into().trim().to_string(),
            return_type: normalize_type_text(&return_type.into()),
            params,
        }
    }

    /// 戻り値型がちょうど `void`（大文字小文字・前後空白は無視）かどうか。
    pub fn returns_void(&self) -> bool {
        self.return_type.trim().eq_ignore_ascii_case("void")
    }

    /// 関数ポインタ型名 `PFN<NAME>PROC` を返す。
    pub fn proc_type_name(&self) -> String {
        format!("PFN{}PROC", self.name.to_ascii_uppercase())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        if self.params.is_empty() {
            write!(f, "void")?;
        }
        for (i, p) in self.params.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", declarator(&p.ty, &p.name))?;
        }
        write!(f, ")")
    }
}

/// 宣言ソースが返す生の宣言。導入した機能名（API バージョン/拡張名）を伴う。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub signature: Signature,
    pub feature: String,
}

impl Declaration {
    pub fn new(signature: Signature, feature: impl Into<String>) -> Self {
        Self {
            signature,
            feature: feature.into(),
        }
    }
}

/// 型と名前を C の宣言子として連結する。`*` で終わる型には空白を挟まない。
pub fn declarator(ty: &str, name: &str) -> String {
    if ty.ends_with('*') {
        format!("{ty}{name}")
    } else {
        format!("{ty} {name}")
    }
}

/// 連続空白を 1 個に畳み、`*` の直前の空白を揃える。
pub fn normalize_type_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    for ch in collapsed.chars() {
        if ch == '*' && !out.ends_with(' ') && !out.ends_with('*') && !out.is_empty() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_detection_ignores_case_and_spaces() {
        let sig = Signature::new("glFinish", "  VOID ", ParamList::Void);
        assert!(sig.returns_void());
        let sig = Signature::new("glIsList", "GLboolean", ParamList::Void);
        assert!(!sig.returns_void());
        let sig = Signature::new("glMapBuffer", "void *", ParamList::Void);
        assert!(!sig.returns_void());
    }

    #[test]
    fn type_text_is_normalized() {
        assert_eq!(normalize_type_text("const  GLubyte*"), "const GLubyte *");
        assert_eq!(normalize_type_text("void **"), "void **");
        assert_eq!(normalize_type_text(" GLenum "), "GLenum");
    }

    #[test]
    fn empty_params_become_void() {
        assert!(ParamList::from_params(vec![]).is_void());
        let empty = ParamList::List(Vec::new());
        assert!(empty.is_void());
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        let sig = Signature::new("glFinish", "void", empty);
        assert_eq!(sig.to_string(), "void glFinish(void)");
        let sig = Signature::new(
            "glGetString",
            "const GLubyte *",
            ParamList::from_params(vec![Parameter::new("GLenum", "name")]),
        );
        assert_eq!(sig.to_string(), "const GLubyte * glGetString(GLenum name)");
        assert_eq!(sig.proc_type_name(), "PFNGLGETSTRINGPROC");
    }
}
