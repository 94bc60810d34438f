// パス: tests/dispatch_wiring.rs
// 役割: ディスパッチヘッダ読み取りと配線ルーチン生成を検証
// 意図: 名前順走査、欠落スロットの警告、一度きり初期化の形状を固定する
// 関連ファイル: src/dispatch.rs, src/emit/wiring.rs, tests/test_support.rs

#[path = "test_support.rs"]
mod support;

use support::{assert_fragments, decl, options, run_with_dispatch, BASELINE, LATER};
use trampgen::{Diagnostic, DispatchRequirement};

#[test]
fn wiring_sets_present_and_warns_missing() {
    let out = run_with_dispatch(
        vec![decl("glFoo", "void", &[], BASELINE)],
        options(false),
        &["Foo", "Bar"],
    );
    let init_start = out.text.find("static void glWinSetupDispatchTableInit(void)").unwrap();
    let init = &out.text[init_start..];
    // 名前順: glBar が先
    let bar = init.find("#warning No wrapper for glBar !").unwrap();
    let foo = init.find("  SET_Foo(disp, (void *)glFooWrapper);").unwrap();
    assert!(bar < foo);
    assert!(!init.contains("SET_Bar("));
    assert_eq!(
        out.diagnostics,
        vec![
            Diagnostic::FilterNameAbsent {
                name: "glBar".into()
            },
            Diagnostic::MissingDispatchSlot {
                name: "glBar".into(),
                slot: "Bar".into(),
                excluded: false
            },
        ]
    );
}

#[test]
fn setup_function_initialises_once_then_activates() {
    let out = run_with_dispatch(
        vec![decl("glFoo", "void", &[], BASELINE)],
        options(false),
        &["Foo"],
    );
    assert!(out.text.ends_with(
        "void glWinSetupDispatchTable(void)\n\
         {\n\
         \x20 static int once = 0;\n\
         \n\
         \x20 tramp_call_once(&once, glWinSetupDispatchTableInit);\n\
         \x20 _glapi_set_dispatch(glWinSetupDispatchTableTable);\n\
         }\n"
    ));
    assert_fragments(
        &out.text,
        &[
            "static struct _glapi_table *glWinSetupDispatchTableTable = NULL;",
            "calloc(_glapi_get_dispatch_table_size(), sizeof(void *));",
            "  assert(disp);",
            "  glWinSetupDispatchTableTable = disp;",
        ],
    );
}

#[test]
fn inclusion_filter_omits_unlisted_names_with_comment() {
    let out = run_with_dispatch(
        vec![
            decl("glClear", "void", &[("GLbitfield", "mask")], BASELINE),
            decl("glBlendColor", "void", &[], LATER),
        ],
        options(false),
        &["Clear"],
    );
    assert!(out.trampolines.contains_key("glClear"));
    assert!(!out.trampolines.contains_key("glBlendColor"));
    assert_fragments(
        &out.text,
        &["/* No wrapper for glBlendColor, not in dispatch table */"],
    );
    assert!(out.diagnostics.is_empty());
}

#[test]
fn excluded_required_name_is_warned_with_owner() {
    let out = run_with_dispatch(
        vec![
            decl("glFoo", "void", &[], BASELINE),
            decl("wglCreateContext", "HGLRC", &[("HDC", "hdc")], BASELINE),
        ],
        options(false),
        &["Foo"],
    );
    assert!(!out.trampolines.contains_key("wglCreateContext"));

    let wgl = DispatchRequirement::from_slots("wgl", ["CreateContext"]);
    let mut source = trampgen::source::VecSource::new(
        "wgl.xml",
        vec![decl("wglCreateContext", "HGLRC", &[("HDC", "hdc")], BASELINE)],
    );
    let out = trampgen::generate(&mut source, options(false), Some(wgl));
    assert!(out.trampolines.is_empty());
    assert!(!out.text.contains("wglCreateContextWrapper"));
    assert_fragments(
        &out.text,
        &[
            "  /* wglCreateContext is excluded: owned by",
            "#warning No wrapper for wglCreateContext !",
        ],
    );
    assert_eq!(
        out.diagnostics,
        vec![Diagnostic::MissingDispatchSlot {
            name: "wglCreateContext".into(),
            slot: "CreateContext".into(),
            excluded: true
        }]
    );
}

#[test]
fn dispatch_header_parse_skips_ignored_and_sorts() {
    let header = "\
#define SET_Clear(disp, fn) SET_by_offset(disp, _gloffset_Clear, fn)
static inline void SET_Accum(struct _glapi_table *disp, void (*fn)(GLenum, GLfloat)) {
   SET_by_offset(disp, _gloffset_Accum, fn);
}
#define SET_by_offset(disp, offset, fn) ((void)0)
SET_ActiveTexture(disp, fn);
/* unrelated */ int SET_nothing;
";
    let req = DispatchRequirement::parse(header, "gl", &["by_offset".to_string()]).unwrap();
    assert_eq!(
        req.names().collect::<Vec<_>>(),
        vec!["glAccum", "glActiveTexture", "glClear"]
    );
    assert_eq!(req.slot_for("glClear"), Some("Clear"));
    assert_eq!(req.slot_for("glby_offset"), None);
}

#[test]
fn dispatch_header_with_empty_slot_is_error() {
    let err = DispatchRequirement::parse("first\n  SET_(disp, fn);\n", "gl", &[]).unwrap_err();
    assert_eq!(err.code(), "DSP301");
    assert_eq!(err.0.line, Some(2));
    assert_eq!(err.0.col, Some(3));
}
