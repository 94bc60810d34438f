// パス: src/policy/exclusions.rs
// 役割: 別サブシステムが所有する組み込み除外名の表を定義する
// 意図: 除外理由（所有サブシステム）を名前から一度の参照で引けるようにする
// 関連ファイル: src/policy/mod.rs, src/config.rs, src/emit/wiring.rs

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// 除外名の由来となるサブシステム。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnedBy {
    WglContext,
    WglFont,
    WglLayer,
    PixelFormat,
}

impl OwnedBy {
    pub const fn describe(&self) -> &'static str {
        match self {
            OwnedBy::WglContext => "WGL context management",
            OwnedBy::WglFont => "WGL font rendering",
            OwnedBy::WglLayer => "WGL layer planes",
            OwnedBy::PixelFormat => "GDI pixel formats",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Exclusion {
    pub name: &'static str,
    pub owner: OwnedBy,
}

macro_rules! define_exclusions {
    (
        $(
            $owner:expr => { $( $name:literal ),+ $(,)? }
        ),+ $(,)?
    ) => {
        /// 別途ラップされるため、このトランポリンを生成してはならない基本 WGL/GDI 関数。
        pub const BUILTIN_EXCLUSIONS: &[Exclusion] = &[
            $(
                $(
                    Exclusion { name: $name, owner: $owner },
                )+
            )+
        ];
    };
}

define_exclusions! {
    OwnedBy::WglContext => {
        "wglCopyContext",
        "wglCreateContext",
        "wglCreateLayerContext",
        "wglDeleteContext",
        "wglGetCurrentContext",
        "wglGetCurrentDC",
        "wglGetProcAddress",
        "wglMakeCurrent",
        "wglShareLists",
        "SwapBuffers",
        "wglSwapMultipleBuffers",
    },
    OwnedBy::WglFont => {
        "wglUseFontBitmapsA",
        "wglUseFontBitmapsW",
        "wglUseFontBitmaps",
        "wglUseFontOutlinesA",
        "wglUseFontOutlinesW",
        "wglUseFontOutlines",
    },
    OwnedBy::WglLayer => {
        "wglDescribeLayerPlane",
        "wglSetLayerPaletteEntries",
        "wglGetLayerPaletteEntries",
        "wglRealizeLayerPalette",
        "wglSwapLayerBuffers",
    },
    OwnedBy::PixelFormat => {
        "ChoosePixelFormat",
        "DescribePixelFormat",
        "GetEnhMetaFilePixelFormat",
        "GetPixelFormat",
        "SetPixelFormat",
    },
}

static BY_NAME: Lazy<HashMap<&'static str, &'static Exclusion>> =
    Lazy::new(|| BUILTIN_EXCLUSIONS.iter().map(|e| (e.name, e)).collect());

/// 組み込み除外名なら所有サブシステム付きの項目を返す。
pub fn lookup_exclusion(name: &str) -> Option<&'static Exclusion> {
    BY_NAME.get(name).copied()
}

pub fn builtin_exclusion_names() -> Vec<String> {
    BUILTIN_EXCLUSIONS.iter().map(|e| e.name.to_string()).collect()
}
