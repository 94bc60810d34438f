// パス: tests/test_support.rs
// 役割: 統合テスト共通の補助関数とアサーションを提供する
// 意図: シグネチャ構築と生成実行を一元化しテストを簡潔に保つ
// 関連ファイル: tests/emit_trampoline.rs, tests/dispatch_wiring.rs, tests/pipeline.rs
#![allow(dead_code)]
use trampgen::source::VecSource;
use trampgen::{
    Declaration, DispatchRequirement, EmitOptions, GeneratedOutput, Generator, GeneratorConfig,
    ParamList, Parameter, Signature,
};

pub const BASELINE: &str = "GL_VERSION_1_1";
pub const LATER: &str = "GL_VERSION_1_3";

pub fn sig(name: &str, ret: &str, params: &[(&str, &str)]) -> Signature {
    let params = params
        .iter()
        .map(|(ty, pname)| Parameter::new(*ty, *pname))
        .collect();
    Signature::new(name, ret, ParamList::from_params(params))
}

pub fn decl(name: &str, ret: &str, params: &[(&str, &str)], feature: &str) -> Declaration {
    Declaration::new(sig(name, ret, params), feature)
}

pub fn options(trace: bool) -> EmitOptions {
    EmitOptions {
        trace,
        static_linkage: false,
        preresolve: false,
        prelude: false,
    }
}

pub fn run(decls: Vec<Declaration>, options: EmitOptions) -> GeneratedOutput {
    let mut source = VecSource::new("test.xml", decls);
    Generator::new(GeneratorConfig::default(), options).run(&mut source)
}

pub fn run_with_dispatch(
    decls: Vec<Declaration>,
    options: EmitOptions,
    slots: &[&str],
) -> GeneratedOutput {
    let mut source = VecSource::new("test.xml", decls);
    Generator::new(GeneratorConfig::default(), options)
        .with_dispatch(DispatchRequirement::from_slots("gl", slots.iter().copied()))
        .run(&mut source)
}

/// 本体（`{` から `}` まで）の行だけを返す。
pub fn body_lines(text: &str) -> Vec<&str> {
    text.lines()
        .skip_while(|l| *l != "{")
        .skip(1)
        .take_while(|l| *l != "}")
        .collect()
}

pub fn assert_fragments(text: &str, fragments: &[&str]) {
    for fragment in fragments {
        assert!(
            text.contains(fragment),
            "期待する断片 `{fragment}` が含まれていません:\n{text}"
        );
    }
}
