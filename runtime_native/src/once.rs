// パス: runtime_native/src/once.rs
// 役割: C 側の `int` 変数を状態とする一度きり初期化プリミティブを提供する
// 意図: 生成されたディスパッチ表初期化の check-then-act 競合を原子的な状態遷移で置き換える
// 関連ファイル: src/emit/wiring.rs, runtime_native/tests/runtime.rs

use std::ffi::c_int;
use std::sync::atomic::{AtomicI32, Ordering};
use std::thread;

const INCOMPLETE: i32 = 0;
const RUNNING: i32 = 1;
const COMPLETE: i32 = 2;

/// 初期化関数が巻き戻った場合に状態を未完了へ戻す。
struct ResetOnUnwind<'a> {
    state: &'a AtomicI32,
    armed: bool,
}

impl Drop for ResetOnUnwind<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.store(INCOMPLETE, Ordering::Release);
        }
    }
}

/// `state` が未完了なら `init` を実行する。同時に呼ばれた他のスレッドは完了まで待つ。
/// 戻り値は、この呼び出しが `init` を実行したかどうか。
pub fn call_once(state: &AtomicI32, init: impl FnOnce()) -> bool {
    loop {
        match state.compare_exchange(INCOMPLETE, RUNNING, Ordering::Acquire, Ordering::Acquire) {
            Ok(_) => {
                let mut guard = ResetOnUnwind { state, armed: true };
                init();
                guard.armed = false;
                state.store(COMPLETE, Ordering::Release);
                return true;
            }
            Err(COMPLETE) => return false,
            Err(_) => thread::yield_now(),
        }
    }
}

pub fn is_complete(state: &AtomicI32) -> bool {
    state.load(Ordering::Acquire) == COMPLETE
}

/// # Safety
/// `state` は 0 で初期化された静的 `int` 変数を指し、以後は原子的にのみアクセスされること。
#[no_mangle]
pub unsafe extern "C" fn tramp_call_once(state: *mut c_int, init: Option<extern "C" fn()>) {
    let Some(init) = init else {
        return;
    };
    if state.is_null() {
        init();
        return;
    }
    // c_int と AtomicI32 は同じ配置
    let state = &*(state as *const AtomicI32);
    call_once(state, || init());
}
