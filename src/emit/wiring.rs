// パス: src/emit/wiring.rs
// 役割: ディスパッチ表を一度だけ確保し、各スロットへトランポリンを設定して有効化するルーチンを出力する
// 意図: 欠けたスロットを生成失敗ではなく可視のビルド警告として残す
// 関連ファイル: src/dispatch.rs, src/emit/trampoline.rs, tests/dispatch_wiring.rs
//! 配線ルーチン生成
//!
//! - 必須名は名前順に走査する（発見順ではない）。
//! - 初期化本体は別関数に分け、`tramp_call_once` 経由で一度だけ実行する。
//! - 対応するトランポリンが無いスロットは `#warning` を出して未設定のまま残す。

use indexmap::IndexMap;

use super::{CodeBuffer, GeneratedTrampoline};
use crate::config::GeneratorConfig;
use crate::dispatch::DispatchRequirement;
use crate::policy::exclusions::lookup_exclusion;

/// トランポリンを設定できなかったスロット。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingSlot {
    pub name: String,
    pub slot: String,
    /// 除外集合によって生成されなかった場合 true。
    pub excluded: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WiringOutput {
    pub text: String,
    pub missing: Vec<MissingSlot>,
}

pub fn emit_wiring(
    requirement: &DispatchRequirement,
    trampolines: &IndexMap<String, GeneratedTrampoline>,
    is_excluded: impl Fn(&str) -> bool,
    config: &GeneratorConfig,
) -> WiringOutput {
    let setup = &config.dispatch_setup_function;
    let table_type = &config.dispatch_table_type;
    let table_var = format!("{setup}Table");
    let init_fn = format!("{setup}Init");

    let mut buf = CodeBuffer::new();
    let mut missing = Vec::new();

    buf.line(format!("static {table_type} *{table_var} = NULL;"));
    buf.blank();
    buf.line(format!("static void {init_fn}(void)"));
    buf.line("{");
    buf.line(format!(
        "  {table_type} *disp = calloc(_glapi_get_dispatch_table_size(), sizeof(void *));"
    ));
    buf.line("  assert(disp);");
    buf.blank();
    for (name, slot) in requirement.iter() {
        if let Some(tramp) = trampolines.get(name) {
            buf.line(format!("  SET_{slot}(disp, (void *){});", tramp.wrapper_name));
            continue;
        }
        let excluded = is_excluded(name);
        if excluded {
            let owner = lookup_exclusion(name)
                .map_or("another subsystem", |e| e.owner.describe());
            buf.line(format!("  /* {name} is excluded: owned by {owner} */"));
        }
        buf.line(format!("#warning No wrapper for {name} !"));
        log::warn!("dispatch slot {slot} has no wrapper for {name}");
        missing.push(MissingSlot {
            name: name.to_string(),
            slot: slot.to_string(),
            excluded,
        });
    }
    buf.blank();
    buf.line(format!("  {table_var} = disp;"));
    buf.line("}");
    buf.blank();
    buf.line(format!("void {setup}(void)"));
    buf.line("{");
    buf.line("  static int once = 0;");
    buf.blank();
    buf.line(format!("  tramp_call_once(&once, {init_fn});"));
    buf.line(format!("  _glapi_set_dispatch({table_var});"));
    buf.line("}");

    WiringOutput {
        text: buf.into_string(),
        missing,
    }
}
