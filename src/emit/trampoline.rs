// パス: src/emit/trampoline.rs
// 役割: 保持されたシグネチャ 1 件からトランポリン関数のテキストを生成する
// 意図: 直接呼び出しと名前解決呼び出しの 2 形状を決定的に出し分ける
// 関連ファイル: src/emit/prelude.rs, src/policy/mod.rs, tests/emit_trampoline.rs
//! トランポリン生成
//!
//! - 関数名は元の名前に接尾辞を付けたもの。戻り値型・引数型は宣言どおり写す。
//! - 本体では引数名の末尾に `_` を付け、型名やマクロとの衝突を避ける。
//! - `void` 戻り値（大文字小文字・前後空白は無視）では `return` を出さない。
//! - 解決失敗時の戻り値は前置きの `RESOLVE_RET` マクロが番兵を返す形で担う。

use super::{c_string_body, c_string_literal, CodeBuffer, EmitOptions};
use crate::config::GeneratorConfig;
use crate::policy::Strategy;
use crate::signature::{declarator, ParamList, Signature};

/// 生成済みトランポリン。生成後は不変。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedTrampoline {
    pub signature: Signature,
    pub strategy: Strategy,
    pub wrapper_name: String,
    pub source_text: String,
}

/// 本体で使う引数名。
fn forwarded_name(name: &str) -> String {
    format!("{name}_")
}

/// 宣言部の引数リスト。引数なしは `void`。
fn parameter_list(params: &ParamList) -> String {
    if params.is_empty() {
        return "void".to_string();
    }
    params
        .as_slice()
        .iter()
        .map(|p| declarator(&p.ty, &forwarded_name(&p.name)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 呼び出し側の実引数リスト。
fn argument_list(params: &ParamList) -> String {
    params
        .as_slice()
        .iter()
        .map(|p| forwarded_name(&p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn trace_line(signature: &Signature, config: &GeneratorConfig) -> String {
    format!(
        "  if ({}) {}(\"{}\\n\");",
        config.trace_condition(),
        config.trace_function,
        c_string_body(&signature.name)
    )
}

pub fn emit_trampoline(
    signature: &Signature,
    strategy: Strategy,
    options: &EmitOptions,
    config: &GeneratorConfig,
) -> GeneratedTrampoline {
    let wrapper_name = config.wrapper_name(&signature.name);
    let mut buf = CodeBuffer::new();
    let linkage = if options.static_linkage { "static " } else { "" };
    buf.line(format!(
        "{linkage}{} {wrapper_name}({})",
        signature.return_type,
        parameter_list(&signature.params)
    ));
    buf.line("{");

    let returns = if signature.returns_void() { "" } else { "return " };
    let args = argument_list(&signature.params);
    match strategy {
        Strategy::DirectCall => {
            if options.trace {
                buf.line(trace_line(signature, config));
                buf.line(format!("  {}++;", config.direct_call_counter));
                buf.blank();
            }
            buf.line(format!("  {returns}{}({args});", signature.name));
        }
        Strategy::ResolveAndCall => {
            let proc_type = signature.proc_type_name();
            let symbol = c_string_literal(&signature.name);
            if signature.returns_void() {
                buf.line(format!("  RESOLVE({proc_type}, {symbol});"));
            } else {
                buf.line(format!(
                    "  RESOLVE_RET({proc_type}, {symbol}, {});",
                    config.failure_sentinel
                ));
            }
            if options.trace {
                buf.blank();
                buf.line(trace_line(signature, config));
            }
            buf.blank();
            buf.line(format!("  {returns}RESOLVED_PROC({proc_type})({args});"));
        }
    }
    buf.line("}");
    buf.blank();

    log::debug!("emitted {wrapper_name} ({strategy:?})");
    GeneratedTrampoline {
        signature: signature.clone(),
        strategy,
        wrapper_name,
        source_text: buf.into_string(),
    }
}

/// 包含フィルタで省いた名前に付ける注記。
pub fn omission_comment(name: &str) -> String {
    format!("/* No wrapper for {name}, not in dispatch table */\n")
}
