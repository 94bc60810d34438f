// パス: runtime_native/src/resolve.rs
// 役割: シンボル名から関数ポインタを解決し、スロットへ一度だけ公開する
// 意図: 複数スレッドが同時に初回呼び出しをしても状態を壊さず、失敗した解決は再試行しない
// 関連ファイル: runtime_native/src/error.rs, src/emit/prelude.rs, runtime_native/tests/runtime.rs
//! 遅延解決
//!
//! スロットの状態は 3 通り:
//! - null: 未解決
//! - `UNRESOLVABLE`: 解決を試みて失敗した
//! - それ以外: 解決済みの関数アドレス
//!
//! 初回は競合したスレッドがそれぞれ検索してよい。公開は compare-and-set で行い、
//! 負けた側は勝った側の値を採用する。

use std::ffi::{c_char, c_void, CStr};
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use crate::error::{clear_last_status, set_last_status, TrampStatus};

/// プラットフォームのシンボル解決関数（例: `wglGetProcAddress` のラッパ）。
pub type ResolverFn = unsafe extern "C" fn(symbol: *const c_char) -> *mut c_void;

const UNRESOLVABLE: *mut c_void = usize::MAX as *mut c_void;

static RESOLVER: AtomicPtr<c_void> = AtomicPtr::new(ptr::null_mut());
static INDIRECT_CALLS: AtomicUsize = AtomicUsize::new(0);
static UNRESOLVED: AtomicUsize = AtomicUsize::new(0);

/// 1 シンボル分のキャッシュ。C 側の `void *` 変数と同じ配置。
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct ProcSlot(AtomicPtr<c_void>);

impl ProcSlot {
    pub const fn new() -> Self {
        Self(AtomicPtr::new(ptr::null_mut()))
    }

    /// 既存の `void *` 変数をスロットとして扱う。
    ///
    /// # Safety
    /// `raw` は有効で、以後このスロットへのアクセスはすべて原子的でなければならない。
    pub unsafe fn from_raw<'a>(raw: *mut *mut c_void) -> &'a Self {
        // ProcSlot は AtomicPtr と、AtomicPtr は `*mut c_void` と同じ配置
        &*(raw as *const Self)
    }

    /// 解決済みかどうか（失敗として確定した場合も true）。
    pub fn is_settled(&self) -> bool {
        !self.0.load(Ordering::Acquire).is_null()
    }

    /// `lookup` を使って解決する。失敗は記録され、以後 `lookup` は呼ばれない。
    pub fn resolve_with<F>(&self, symbol: &CStr, lookup: F) -> Option<NonNull<c_void>>
    where
        F: FnOnce(&CStr) -> *mut c_void,
    {
        let current = self.0.load(Ordering::Acquire);
        let settled = if current.is_null() {
            let found = lookup(symbol);
            let publish = if found.is_null() { UNRESOLVABLE } else { found };
            match self
                .0
                .compare_exchange(ptr::null_mut(), publish, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    if publish == UNRESOLVABLE {
                        UNRESOLVED.fetch_add(1, Ordering::Relaxed);
                    }
                    publish
                }
                Err(existing) => existing,
            }
        } else {
            current
        };
        if settled == UNRESOLVABLE {
            set_last_status(TrampStatus::Unresolved);
            return None;
        }
        INDIRECT_CALLS.fetch_add(1, Ordering::Relaxed);
        clear_last_status();
        NonNull::new(settled)
    }

    /// 登録済みの解決関数で解決する。未登録ならキャッシュせずに失敗する。
    pub fn resolve(&self, symbol: &CStr) -> Option<NonNull<c_void>> {
        let Some(resolver) = installed_resolver() else {
            set_last_status(TrampStatus::NoResolver);
            return None;
        };
        // SAFETY: symbol は NUL 終端済み。resolver は登録時に有効な関数として渡されている。
        self.resolve_with(symbol, |s| unsafe { resolver(s.as_ptr()) })
    }
}

fn installed_resolver() -> Option<ResolverFn> {
    let raw = RESOLVER.load(Ordering::Acquire);
    if raw.is_null() {
        None
    } else {
        // SAFETY: RESOLVER には tramp_set_resolver で ResolverFn だけが格納される
        Some(unsafe { std::mem::transmute::<*mut c_void, ResolverFn>(raw) })
    }
}

/// 解決関数を登録する。`None` で登録解除。
#[no_mangle]
pub extern "C" fn tramp_set_resolver(resolver: Option<ResolverFn>) {
    let raw = resolver.map_or(ptr::null_mut(), |f| f as *mut c_void);
    RESOLVER.store(raw, Ordering::Release);
}

/// スロットを使って `symbol` を解決する。失敗時は NULL。
///
/// # Safety
/// `slot` は生成コードの静的 `void *` 変数、`symbol` は NUL 終端文字列でなければならない。
#[no_mangle]
pub unsafe extern "C" fn tramp_resolve(slot: *mut *mut c_void, symbol: *const c_char) -> *mut c_void {
    if slot.is_null() || symbol.is_null() {
        set_last_status(TrampStatus::NullArgument);
        return ptr::null_mut();
    }
    let slot = ProcSlot::from_raw(slot);
    let symbol = CStr::from_ptr(symbol);
    slot.resolve(symbol)
        .map_or(ptr::null_mut(), NonNull::as_ptr)
}

/// 解決済みポインタ経由の呼び出し回数。
#[no_mangle]
pub extern "C" fn tramp_indirect_calls() -> usize {
    INDIRECT_CALLS.load(Ordering::Relaxed)
}

/// 解決に失敗したシンボル数。
#[no_mangle]
pub extern "C" fn tramp_unresolved_count() -> usize {
    UNRESOLVED.load(Ordering::Relaxed)
}
