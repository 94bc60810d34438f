// パス: src/emit/preresolve.rs
// 役割: 保持された全シグネチャの解決スロット宣言と一括解決ルーチンを出力する
// 意図: 埋め込み側が動的シンボル解決を任意の時点（コンテキスト生成時など）にまとめて行えるようにする
// 関連ファイル: src/emit/prelude.rs, src/pipeline.rs, tests/pipeline.rs

use super::{c_string_literal, CodeBuffer};
use crate::signature::Signature;

/// 一括解決ルーチン名。解決に失敗した数を返す。
pub fn resolve_function_name(prefix: &str) -> String {
    format!("{prefix}ResolveExtensionProcs")
}

/// `signatures` は発見順の保持済みシグネチャ。
pub fn emit_preresolve<'a, I>(signatures: I, prefix: &str) -> String
where
    I: IntoIterator<Item = &'a Signature>,
{
    let signatures: Vec<&Signature> = signatures.into_iter().collect();
    let mut buf = CodeBuffer::new();
    for sig in &signatures {
        buf.line(format!("RESOLVE_DECL({});", sig.proc_type_name()));
    }
    buf.blank();
    buf.line(format!("int {}(void)", resolve_function_name(prefix)));
    buf.line("{");
    buf.line("  int unresolved = 0;");
    buf.blank();
    for sig in &signatures {
        buf.line(format!(
            "  PRERESOLVE({}, {});",
            sig.proc_type_name(),
            c_string_literal(&sig.name)
        ));
    }
    buf.blank();
    buf.line("  return unresolved;");
    buf.line("}");
    buf.blank();
    buf.into_string()
}
