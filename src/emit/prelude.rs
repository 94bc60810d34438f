// パス: src/emit/prelude.rs
// 役割: 生成ファイル冒頭に置く実行時サポート（外部宣言と解決マクロ）を出力する
// 意図: 生成コードの遅延解決と一度きり初期化を trampoline_runtime の原子的操作へ結び付ける
// 関連ファイル: runtime_native/src/resolve.rs, runtime_native/src/once.rs, src/emit/trampoline.rs
//! 前置きテキスト
//!
//! マクロはすべて `#ifndef` で囲み、埋め込み側が独自定義を先に与えられるようにする。
//! 事前解決モードでは解決スロットを proc 型ごとのファイルスコープ変数として共有し、
//! 通常モードでは各トランポリンの関数ローカル静的変数に置く。

use super::CodeBuffer;

const RUNTIME_DECLS: &[&str] = &[
    "#include <assert.h>",
    "#include <stddef.h>",
    "#include <stdlib.h>",
    "",
    "extern void *tramp_resolve(void **slot, const char *symbol);",
    "extern void tramp_call_once(int *state, void (*init)(void));",
    "extern int tramp_last_status(void);",
];

const LAZY_RESOLVE: &[&str] = &[
    "#ifndef RESOLVE_RET",
    "#define RESOLVE_RET(proctype, symbol, retval) \\",
    "    static void *proctype##_slot = NULL; \\",
    "    proctype proc = (proctype)tramp_resolve(&proctype##_slot, symbol); \\",
    "    if (proc == NULL) { \\",
    "        return retval; \\",
    "    }",
    "#endif",
];

const SHARED_RESOLVE: &[&str] = &[
    "#ifndef RESOLVE_DECL",
    "#define RESOLVE_DECL(proctype) static void *proctype##_slot = NULL",
    "#endif",
    "#ifndef PRERESOLVE",
    "#define PRERESOLVE(proctype, symbol) \\",
    "    if (tramp_resolve(&proctype##_slot, symbol) == NULL) { \\",
    "        unresolved++; \\",
    "    }",
    "#endif",
    "#ifndef RESOLVE_RET",
    "#define RESOLVE_RET(proctype, symbol, retval) \\",
    "    proctype proc = (proctype)tramp_resolve(&proctype##_slot, symbol); \\",
    "    if (proc == NULL) { \\",
    "        return retval; \\",
    "    }",
    "#endif",
];

const COMMON_MACROS: &[&str] = &[
    "#ifndef RESOLVE",
    "#define RESOLVE(proctype, symbol) RESOLVE_RET(proctype, symbol,)",
    "#endif",
    "#ifndef RESOLVED_PROC",
    "#define RESOLVED_PROC(proctype) proc",
    "#endif",
];

pub fn emit_prelude(preresolve: bool) -> String {
    let mut buf = CodeBuffer::new();
    for line in RUNTIME_DECLS {
        buf.line(line);
    }
    buf.blank();
    let resolve = if preresolve { SHARED_RESOLVE } else { LAZY_RESOLVE };
    for line in resolve.iter().chain(COMMON_MACROS) {
        buf.line(line);
    }
    buf.blank();
    buf.into_string()
}
