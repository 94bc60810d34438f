// パス: src/lib.rs
// 役割: Crate root wiring modules and exports
// 意図: Expose the signature model, sources, policy and emitters as a small API
// 関連ファイル: src/pipeline.rs, src/emit/mod.rs, src/bin/trampgen.rs
//! trampgen ルートモジュール
//!
//! 目的:
//! - ドライバ API の呼び出し規約と異なる規約から呼べるトランポリン関数を C テキストとして生成する。
//! - 基準バージョン以降の関数は名前で遅延解決し、解決失敗時はプロセスを落とさず番兵を返す。
//!
//! 方針:
//! - コメント/ドキュメントは日本語、識別子は英語。
//! - 生成は決定的。同じ入力と同じフラグからはバイト単位で同じ出力を得る。

pub mod config;
pub mod dispatch;
pub mod emit;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod policy;
pub mod signature;
pub mod source;

// 便利な再エクスポート
pub use crate::config::GeneratorConfig;
pub use crate::dispatch::DispatchRequirement;
pub use crate::emit::{EmitOptions, GeneratedTrampoline};
pub use crate::errors::*;
pub use crate::pipeline::{Diagnostic, GeneratedOutput, Generator};
pub use crate::policy::{RetentionDecision, RetentionPolicy, Strategy, VersionClassifier};
pub use crate::signature::{Declaration, ParamList, Parameter, Signature};
pub use crate::source::DeclarationSource;

/// 既定設定で宣言列からトランポリンを生成する。
pub fn generate(
    source: &mut dyn DeclarationSource,
    options: EmitOptions,
    dispatch: Option<DispatchRequirement>,
) -> GeneratedOutput {
    let mut generator = Generator::new(GeneratorConfig::default(), options);
    if let Some(req) = dispatch {
        generator = generator.with_dispatch(req);
    }
    generator.run(source)
}
