// パス: src/policy/mod.rs
// 役割: シグネチャごとにトランポリンを生成するか、どの呼び出し方式にするかを決める
// 意図: 除外集合・包含フィルタ・バージョン区分を 1 回の純粋な参照にまとめる
// 関連ファイル: src/policy/exclusions.rs, src/pipeline.rs, src/emit/trampoline.rs
//! 保持ポリシー
//!
//! 判定順は「除外 → 包含フィルタ → バージョン区分」。除外は常に優先する。
//! 呼び出し方式は導入バージョンだけで決まり、トレース等のフラグには依存しない。

pub mod exclusions;

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;

use crate::signature::Declaration;

/// トランポリン本体の呼び出し方式。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// 基準バージョンの関数。元の関数を直接呼ぶ。
    DirectCall,
    /// それ以降の関数。名前で解決したポインタ経由で呼ぶ。
    ResolveAndCall,
}

/// 生成しない理由。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Omission {
    /// 別サブシステムが所有する名前。
    Excluded,
    /// 包含フィルタ（ディスパッチ表）に含まれない名前。
    NotInDispatchTable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VersionBucket {
    Baseline,
    Later,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetentionDecision {
    pub emit: bool,
    pub strategy: Strategy,
    pub omission: Option<Omission>,
}

impl RetentionDecision {
    fn retained(strategy: Strategy) -> Self {
        Self {
            emit: true,
            strategy,
            omission: None,
        }
    }

    fn omitted(strategy: Strategy, why: Omission) -> Self {
        Self {
            emit: false,
            strategy,
            omission: Some(why),
        }
    }
}

/// 機能名（`GL_VERSION_1_1` 等）を基準区分かそれ以降かに振り分ける。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionClassifier {
    baseline: BTreeSet<String>,
}

impl VersionClassifier {
    pub fn new<I, S>(baseline: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            baseline: baseline.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bucket(&self, feature: &str) -> VersionBucket {
        if self.baseline.contains(feature) {
            VersionBucket::Baseline
        } else {
            VersionBucket::Later
        }
    }

    pub fn strategy(&self, feature: &str) -> Strategy {
        match self.bucket(feature) {
            VersionBucket::Baseline => Strategy::DirectCall,
            VersionBucket::Later => Strategy::ResolveAndCall,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RetentionPolicy {
    exclusions: HashSet<String>,
    inclusion: Option<HashSet<String>>,
    versions: VersionClassifier,
}

impl RetentionPolicy {
    pub fn new<I, S>(exclusions: I, versions: VersionClassifier) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclusions: exclusions.into_iter().map(Into::into).collect(),
            inclusion: None,
            versions,
        }
    }

    /// 包含フィルタを設定する。以後フィルタに無い名前は生成しない。
    pub fn with_inclusion<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inclusion = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }

    pub fn decide(&self, name: &str, feature: &str) -> RetentionDecision {
        let strategy = self.versions.strategy(feature);
        if self.exclusions.contains(name) {
            return RetentionDecision::omitted(strategy, Omission::Excluded);
        }
        if let Some(filter) = &self.inclusion {
            if !filter.contains(name) {
                return RetentionDecision::omitted(strategy, Omission::NotInDispatchTable);
            }
        }
        RetentionDecision::retained(strategy)
    }

    /// 宣言列全体を 1 回だけ分類し、名前→判定の表を作る。
    /// 同名の宣言は後勝ちで、位置は最初の発見位置を保つ。
    pub fn classify_all<'a, I>(&self, decls: I) -> RetentionTable
    where
        I: IntoIterator<Item = &'a Declaration>,
    {
        let mut table = IndexMap::new();
        for decl in decls {
            let name = &decl.signature.name;
            table.insert(name.clone(), self.decide(name, &decl.feature));
        }
        RetentionTable { decisions: table }
    }
}

/// 名前→判定の写像。発見順を保持する。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RetentionTable {
    decisions: IndexMap<String, RetentionDecision>,
}

impl RetentionTable {
    pub fn get(&self, name: &str) -> Option<&RetentionDecision> {
        self.decisions.get(name)
    }

    pub fn retained(&self) -> impl Iterator<Item = (&str, Strategy)> {
        self.decisions
            .iter()
            .filter(|(_, d)| d.emit)
            .map(|(n, d)| (n.as_str(), d.strategy))
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> VersionClassifier {
        VersionClassifier::new(["GL_VERSION_1_0", "GL_VERSION_1_1"])
    }

    #[test]
    fn exclusion_wins_over_inclusion() {
        let policy = RetentionPolicy::new(["wglMakeCurrent"], classifier())
            .with_inclusion(["wglMakeCurrent", "glClear"]);
        let d = policy.decide("wglMakeCurrent", "GL_VERSION_1_0");
        assert!(!d.emit);
        assert_eq!(d.omission, Some(Omission::Excluded));
    }

    #[test]
    fn inclusion_filter_omits_unlisted_names() {
        let policy = RetentionPolicy::new(Vec::<String>::new(), classifier()).with_inclusion(["glClear"]);
        let d = policy.decide("glAccum", "GL_VERSION_1_0");
        assert_eq!(d.omission, Some(Omission::NotInDispatchTable));
        assert!(policy.decide("glClear", "GL_VERSION_1_0").emit);
    }

    #[test]
    fn strategy_follows_version_bucket() {
        let policy = RetentionPolicy::new(Vec::<String>::new(), classifier());
        assert_eq!(
            policy.decide("glClear", "GL_VERSION_1_1").strategy,
            Strategy::DirectCall
        );
        assert_eq!(
            policy.decide("glActiveTexture", "GL_VERSION_1_3").strategy,
            Strategy::ResolveAndCall
        );
        assert_eq!(
            policy.decide("glFooARB", "GL_ARB_foo").strategy,
            Strategy::ResolveAndCall
        );
    }
}
