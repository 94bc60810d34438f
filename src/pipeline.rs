// パス: src/pipeline.rs
// 役割: 宣言ソース→保持ポリシー→各エミッタの順に 1 回の生成を実行する
// 意図: 出力順（由来→前置き→事前解決→トランポリン→配線）と診断収集を 1 か所で決める
// 関連ファイル: src/source/mod.rs, src/policy/mod.rs, src/emit/mod.rs, src/bin/trampgen.rs
//! 生成パイプライン
//!
//! 単一スレッドで逐次に実行し、同じ入力と同じフラグからは常に同じテキストを得る。

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::config::GeneratorConfig;
use crate::dispatch::DispatchRequirement;
use crate::emit::prelude::emit_prelude;
use crate::emit::preresolve::emit_preresolve;
use crate::emit::trampoline::{emit_trampoline, omission_comment};
use crate::emit::wiring::emit_wiring;
use crate::emit::{provenance_comment, CodeBuffer, EmitOptions, GeneratedTrampoline};
use crate::errors::GenResult;
use crate::policy::Omission;
use crate::signature::Declaration;
use crate::source::{DeclarationSource, HeaderSource, RegistrySource};

/// 生成中に見つかった、失敗ではないが利用者に見せるべき事象。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// 必須スロットに対応するトランポリンが無い。
    MissingDispatchSlot {
        name: String,
        slot: String,
        excluded: bool,
    },
    /// 包含フィルタにあるが宣言ソースに無い名前。
    FilterNameAbsent { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingDispatchSlot {
                name,
                slot,
                excluded: true,
            } => write!(f, "dispatch slot {slot}: {name} is excluded, slot left unset"),
            Diagnostic::MissingDispatchSlot { name, slot, .. } => {
                write!(f, "dispatch slot {slot}: no wrapper for {name}, slot left unset")
            }
            Diagnostic::FilterNameAbsent { name } => {
                write!(f, "{name} is required by the dispatch table but not declared by the source")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub text: String,
    /// 発見順。名前で引ける。
    pub trampolines: IndexMap<String, GeneratedTrampoline>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Debug)]
pub struct Generator {
    config: GeneratorConfig,
    options: EmitOptions,
    dispatch: Option<DispatchRequirement>,
}

impl Generator {
    pub fn new(config: GeneratorConfig, options: EmitOptions) -> Self {
        Self {
            config,
            options,
            dispatch: None,
        }
    }

    /// 必須スロット集合を与える。包含フィルタと配線ルーチンの両方に使われる。
    pub fn with_dispatch(mut self, requirement: DispatchRequirement) -> Self {
        self.dispatch = Some(requirement);
        self
    }

    pub fn run(&self, source: &mut dyn DeclarationSource) -> GeneratedOutput {
        let decls = collect_declarations(source);

        let mut policy = self.config.retention_policy();
        if let Some(req) = &self.dispatch {
            policy = policy.with_inclusion(req.names());
        }
        let table = policy.classify_all(decls.values());

        let mut diagnostics = Vec::new();
        if let Some(req) = &self.dispatch {
            for name in req.names().filter(|n| !decls.contains_key(*n)) {
                log::warn!("{name} is in the dispatch table but not in {}", source.provenance());
                diagnostics.push(Diagnostic::FilterNameAbsent {
                    name: name.to_string(),
                });
            }
        }

        let mut out = CodeBuffer::new();
        out.append(&provenance_comment(source.provenance()));
        if self.options.prelude {
            out.append(&emit_prelude(self.options.preresolve));
        }
        if self.options.preresolve {
            let retained = table
                .retained()
                .filter_map(|(name, _)| decls.get(name))
                .map(|d| &d.signature);
            out.append(&emit_preresolve(retained, &self.config.prefix));
        }

        let mut trampolines = IndexMap::new();
        for (name, decl) in &decls {
            let Some(decision) = table.get(name) else {
                continue;
            };
            if decision.emit {
                let tramp =
                    emit_trampoline(&decl.signature, decision.strategy, &self.options, &self.config);
                out.append(&tramp.source_text);
                trampolines.insert(name.clone(), tramp);
            } else if decision.omission == Some(Omission::NotInDispatchTable) {
                out.append(&omission_comment(name));
            }
        }

        if let Some(req) = &self.dispatch {
            let wiring = emit_wiring(req, &trampolines, |n| policy.is_excluded(n), &self.config);
            out.append(&wiring.text);
            diagnostics.extend(wiring.missing.into_iter().map(|m| {
                Diagnostic::MissingDispatchSlot {
                    name: m.name,
                    slot: m.slot,
                    excluded: m.excluded,
                }
            }));
        }

        log::info!(
            "{} declarations, {} wrappers, {} diagnostics",
            decls.len(),
            trampolines.len(),
            diagnostics.len()
        );
        GeneratedOutput {
            text: out.into_string(),
            trampolines,
            diagnostics,
        }
    }
}

/// 発見順を保ったまま名前で索引化する。同名は後勝ちで最初の位置に置き換える。
fn collect_declarations(source: &mut dyn DeclarationSource) -> IndexMap<String, Declaration> {
    let mut decls: IndexMap<String, Declaration> = IndexMap::new();
    while let Some(decl) = source.next_declaration() {
        let name = decl.signature.name.clone();
        if decls.insert(name.clone(), decl).is_some() {
            log::debug!("duplicate declaration of {name}, later one wins");
        }
    }
    decls
}

/// 入力の種類。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Header,
    Registry,
}

/// ファイルから宣言ソースを読み込む。由来名はファイル名部分。
pub fn open_source(
    kind: SourceKind,
    path: &Path,
    config: &GeneratorConfig,
) -> GenResult<Box<dyn DeclarationSource>> {
    let text = fs::read_to_string(path)?;
    let provenance = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let source: Box<dyn DeclarationSource> = match kind {
        SourceKind::Header => Box::new(HeaderSource::parse(provenance, &text)?),
        SourceKind::Registry => Box::new(RegistrySource::parse(provenance, &text, &config.prefix)?),
    };
    Ok(source)
}

pub fn load_dispatch(path: &Path, config: &GeneratorConfig) -> GenResult<DispatchRequirement> {
    let text = fs::read_to_string(path)?;
    Ok(DispatchRequirement::parse(
        &text,
        &config.prefix,
        &config.dispatch_ignore,
    )?)
}
