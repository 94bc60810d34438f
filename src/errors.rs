//! エラー型の定義（共通フォーマット: \[CODE\] メッセージ @line:col / @pos）。
//!
//! - 宣言ソース（ヘッダ/レジストリ/XML）とディスパッチヘッダの読み取り失敗は `SourceError`。
//! - 設定ファイルの失敗は `ConfigError`、生成全体の失敗は `GenError` に集約する。

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::io;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub msg: String,
    pub pos: Option<usize>,      // バイトオフセット（任意）
    pub line: Option<usize>,     // 1-origin（任意）
    pub col: Option<usize>,      // 1-origin（任意）
    pub snippet: Option<String>, // エラー行のスニペット（任意）
}

impl ErrorInfo {
    pub fn new(code: &'static str, msg: impl Into<String>, pos: Option<usize>) -> Self {
        Self {
            code,
            msg: msg.into(),
            pos,
            line: None,
            col: None,
            snippet: None,
        }
    }
    pub fn at(
        code: &'static str,
        msg: impl Into<String>,
        pos: Option<usize>,
        line: Option<usize>,
        col: Option<usize>,
    ) -> Self {
        Self {
            code,
            msg: msg.into(),
            pos,
            line,
            col,
            snippet: None,
        }
    }
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // 1行目: ヘッダ
        match (self.line, self.col, self.pos) {
            (Some(l), Some(c), Some(p)) => write!(
                f,
                "[{}] {} @line={},col={} @pos={}",
                self.code, self.msg, l, c, p
            )?,
            (Some(l), Some(c), None) => {
                write!(f, "[{}] {} @line={},col={}", self.code, self.msg, l, c)?
            }
            (Some(l), None, _) => write!(f, "[{}] {} @line={}", self.code, self.msg, l)?,
            (_, _, Some(p)) => write!(f, "[{}] {} @pos={}", self.code, self.msg, p)?,
            _ => write!(f, "[{}] {}", self.code, self.msg)?,
        }
        // 2行目以降: スニペット
        if let (Some(s), Some(c)) = (&self.snippet, self.col) {
            let caret = if c > 1 {
                " ".repeat(c - 1) + "^"
            } else {
                "^".to_string()
            };
            write!(f, "\n{}\n{}", s, caret)?;
        }
        Ok(())
    }
}

/// 宣言ソースおよびディスパッチヘッダの読み取りエラー。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError(pub ErrorInfo);
impl SourceError {
    pub fn new(code: &'static str, msg: impl Into<String>, pos: Option<usize>) -> Self {
        Self(ErrorInfo::new(code, msg, pos))
    }
    pub fn at(
        code: &'static str,
        msg: impl Into<String>,
        pos: Option<usize>,
        line: Option<usize>,
        col: Option<usize>,
    ) -> Self {
        Self(ErrorInfo::at(code, msg, pos, line, col))
    }
    pub fn at_with_snippet(
        code: &'static str,
        msg: impl Into<String>,
        pos: Option<usize>,
        line: Option<usize>,
        col: Option<usize>,
        snippet: impl Into<String>,
    ) -> Self {
        Self(ErrorInfo::at(code, msg, pos, line, col).with_snippet(snippet))
    }

    pub fn code(&self) -> &'static str {
        self.0.code
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
impl StdError for SourceError {}

/// 設定ファイルの読み込み・検証エラー。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[CFG400] 設定ファイルを読めません: {0}")]
    Io(#[from] io::Error),
    #[error("[CFG401] 設定ファイルの JSON が不正です: {0}")]
    Json(#[from] serde_json::Error),
    #[error("[CFG402] 設定値が不正です: {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// 生成パイプライン全体で発生しうるエラー種別。
#[derive(Debug, Error)]
pub enum GenError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("宣言ソースの読み取りに失敗しました: {0}")]
    Source(#[from] SourceError),
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// 生成処理の結果を表す型。
pub type GenResult<T> = Result<T, GenError>;
