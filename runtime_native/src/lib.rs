//! trampoline runtime crate
//!
//! この crate は生成されたトランポリンからリンクされる実行時機能を提供する。
//! シンボルの遅延解決（スロットへの一度きりの公開）と、ディスパッチ表初期化用の
//! 一度きり実行プリミティブを C ABI で公開する。

#![allow(clippy::missing_safety_doc)]

mod error;
mod once;
mod resolve;

pub use error::*;
pub use once::*;
pub use resolve::*;
