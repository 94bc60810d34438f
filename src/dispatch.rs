// パス: src/dispatch.rs
// 役割: ディスパッチヘッダの `SET_xxx(` マクロ行から必須スロット集合を構築する
// 意図: 配線ルーチンの入力と包含フィルタを同じ集合から得る
// 関連ファイル: src/emit/wiring.rs, src/policy/mod.rs, tests/dispatch_wiring.rs

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SourceError;

// 行頭の `SET_xxx(`、または `#define SET_xxx(` / `static inline void SET_xxx(` の定義行
static SETTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#\s*define\s+|static\s+inline\s+\w+\s+)?SET_(\S*?)\(").expect("setter regex")
});

/// 必須シンボル集合。キーはドライバ関数名（接頭辞 + スロット名）、値はスロット名。
/// `BTreeMap` なので走査順は常に名前順になる。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchRequirement {
    slots: BTreeMap<String, String>,
}

impl DispatchRequirement {
    /// ヘッダ本文を走査する。`ignore` に挙げたスロットは入口関数ではないので除く。
    pub fn parse(text: &str, prefix: &str, ignore: &[String]) -> Result<Self, SourceError> {
        let mut slots = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let Some(caps) = SETTER.captures(line) else {
                continue;
            };
            let slot = &caps[1];
            if slot.is_empty() {
                return Err(SourceError::at_with_snippet(
                    "DSP301",
                    "SET_ マクロにスロット名がありません",
                    None,
                    Some(idx + 1),
                    Some(raw.len() - raw.trim_start().len() + 1),
                    raw,
                ));
            }
            if ignore.iter().any(|i| i == slot) {
                continue;
            }
            slots.insert(format!("{prefix}{slot}"), slot.to_string());
        }
        Ok(Self { slots })
    }

    /// スロット名の一覧から直接構築する。
    pub fn from_slots<I, S>(prefix: &str, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = slots
            .into_iter()
            .map(Into::into)
            .map(|slot: String| (format!("{prefix}{slot}"), slot))
            .collect();
        Self { slots }
    }

    /// (ドライバ関数名, スロット名) を名前順で返す。
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots.iter().map(|(n, s)| (n.as_str(), s.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn slot_for(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_setter_macros_and_drops_ignored() {
        let text = "\
#define SET_by_offset(disp, offset, fn) \\
#define SET_Clear(disp, fn) SET_by_offset(disp, _gloffset_Clear, fn)
SET_Accum(disp, fn);
  SET_ActiveTexture(disp, fn)
#define GET_Clear(disp) ...
static inline void SET_Clear(struct _glapi_table *disp, void (GLAPIENTRYP fn)(GLbitfield)) {
   SET_by_offset(disp, _gloffset_Clear, fn);
}
";
        let req = DispatchRequirement::parse(text, "gl", &["by_offset".to_string()]).unwrap();
        let names: Vec<_> = req.names().collect();
        assert_eq!(names, vec!["glAccum", "glActiveTexture", "glClear"]);
        assert_eq!(req.slot_for("glAccum"), Some("Accum"));
    }
}
