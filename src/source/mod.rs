// パス: src/source/mod.rs
// 役割: 宣言ソースの共通インタフェースと具象ソースを束ねる
// 意図: ヘッダ走査とレジストリ読み取りを同じ生成パイプラインへ差し替え可能にする
// 関連ファイル: src/source/header.rs, src/source/registry.rs, src/pipeline.rs
//! 宣言ソース
//!
//! 生成コアは「次の宣言を返す／終端を知らせる」能力だけに依存する。
//! 具象ソースは構築時に入力全体を解析し、以後は発見順に宣言を払い出す。

pub mod header;
pub mod registry;
pub mod xml;

use std::collections::VecDeque;

use crate::signature::Declaration;

pub use header::HeaderSource;
pub use registry::RegistrySource;

/// 生の宣言列を供給するもの。
pub trait DeclarationSource {
    /// 次の宣言を返す。入力が尽きたら `None`。
    fn next_declaration(&mut self) -> Option<Declaration>;

    /// 出力先頭の由来コメントに使う識別名（通常は入力ファイル名）。
    fn provenance(&self) -> &str;
}

/// 事前に組み立てた宣言列をそのまま払い出すソース。テストや組み込み用途向け。
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    provenance: String,
    pending: VecDeque<Declaration>,
}

impl VecSource {
    pub fn new(provenance: impl Into<String>, decls: impl IntoIterator<Item = Declaration>) -> Self {
        Self {
            provenance: provenance.into(),
            pending: decls.into_iter().collect(),
        }
    }
}

impl DeclarationSource for VecSource {
    fn next_declaration(&mut self) -> Option<Declaration> {
        self.pending.pop_front()
    }

    fn provenance(&self) -> &str {
        &self.provenance
    }
}

impl<S: DeclarationSource + ?Sized> DeclarationSource for Box<S> {
    fn next_declaration(&mut self) -> Option<Declaration> {
        (**self).next_declaration()
    }

    fn provenance(&self) -> &str {
        (**self).provenance()
    }
}
