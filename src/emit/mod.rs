// パス: src/emit/mod.rs
// 役割: 生成テキストの共通バッファと生成フラグを定義し、各エミッタを束ねる
// 意図: トランポリン本体・配線・事前解決を独立した純粋関数として差し替えやすくする
// 関連ファイル: src/emit/trampoline.rs, src/emit/wiring.rs, src/emit/preresolve.rs

pub mod prelude;
pub mod preresolve;
pub mod trampoline;
pub mod wiring;

use std::fmt;

pub use trampoline::GeneratedTrampoline;

/// 1 回の生成全体に一様に適用されるフラグ。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// 呼び出しトレースと直接呼び出し回数の計測を出力する。
    pub trace: bool,
    /// トランポリンを翻訳単位ローカル（`static`）にする。
    pub static_linkage: bool,
    /// 事前解決ブロックを出力する。
    pub preresolve: bool,
    /// 実行時サポートの前置きを出力する。
    pub prelude: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            trace: true,
            static_linkage: false,
            preresolve: false,
            prelude: true,
        }
    }
}

/// 行単位でテキストを組み立てるバッファ。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBuffer {
    text: String,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.text.push('\n');
        self
    }

    pub fn append(&mut self, other: &str) -> &mut Self {
        self.text.push_str(other);
        self
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for CodeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// 出力先頭の由来コメント。
pub fn provenance_comment(source: &str) -> String {
    format!("/* Automatically generated from {source} - DO NOT EDIT */\n\n")
}

/// C 文字列リテラル用に `\` と `"` をエスケープする（引用符は付けない）。
pub(crate) fn c_string_body(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn c_string_literal(s: &str) -> String {
    format!("\"{}\"", c_string_body(s))
}
