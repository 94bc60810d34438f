// パス: runtime_native/src/error.rs
// 役割: ランタイム共通のステータスコードと last status ストレージを実装する
// 意図: 生成コードが解決失敗の理由を呼び出し後に問い合わせられるようにする
// 関連ファイル: runtime_native/src/resolve.rs, src/emit/prelude.rs

use std::cell::Cell;

/// 直近の呼び出し結果。C 側からは `int` として見える。
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrampStatus {
    Ok = 0,
    NullArgument = 1,
    NoResolver = 2,
    Unresolved = 3,
}

thread_local! {
    static LAST_STATUS: Cell<TrampStatus> = const { Cell::new(TrampStatus::Ok) };
}

pub fn set_last_status(status: TrampStatus) {
    LAST_STATUS.with(|cell| cell.set(status));
}

pub fn clear_last_status() {
    set_last_status(TrampStatus::Ok);
}

/// 呼び出したスレッドで最後に `tramp_resolve` が返した状態。
#[no_mangle]
pub extern "C" fn tramp_last_status() -> TrampStatus {
    LAST_STATUS.with(|cell| cell.get())
}
