// パス: src/config.rs
// 役割: 生成テキストが依存する名前・定数を設定として定義し、JSON から読み込む
// 意図: 埋め込み先ごとに異なるトレース変数やディスパッチ関数名をコード変更なしで切り替える
// 関連ファイル: src/pipeline.rs, src/emit/mod.rs, src/bin/trampgen.rs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::policy::exclusions::builtin_exclusion_names;
use crate::policy::{RetentionPolicy, VersionClassifier};

/// 生成設定。省略したキーは既定値になる。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// API 接頭辞。ディスパッチのスロット名に付けて関数名を得る。
    pub prefix: String,
    pub wrapper_suffix: String,
    /// 直接呼び出しにする機能名。
    pub baseline_features: Vec<String>,
    pub exclusions: Vec<String>,
    /// `{PREFIX}` は大文字化した接頭辞に置換される。
    pub trace_condition: String,
    pub trace_function: String,
    pub direct_call_counter: String,
    /// 解決失敗時に非 void 関数が返す値。
    pub failure_sentinel: String,
    pub dispatch_setup_function: String,
    pub dispatch_table_type: String,
    pub dispatch_ignore: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prefix: "gl".into(),
            wrapper_suffix: "Wrapper".into(),
            baseline_features: vec!["GL_VERSION_1_0".into(), "GL_VERSION_1_1".into()],
            exclusions: builtin_exclusion_names(),
            trace_condition: "glxWinDebugSettings.enable{PREFIX}callTrace".into(),
            trace_function: "ErrorF".into(),
            direct_call_counter: "glWinDirectProcCalls".into(),
            failure_sentinel: "FALSE".into(),
            dispatch_setup_function: "glWinSetupDispatchTable".into(),
            dispatch_table_type: "struct _glapi_table".into(),
            dispatch_ignore: vec!["by_offset".into()],
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// 生成コードへ埋め込む項目が空でなく、名前になる項目が C の識別子であることを確認する。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("prefix", &self.prefix),
            ("wrapper_suffix", &self.wrapper_suffix),
            ("trace_function", &self.trace_function),
            ("dispatch_setup_function", &self.dispatch_setup_function),
            ("dispatch_table_type", &self.dispatch_table_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(field, "空にはできません"));
            }
        }
        let identifiers = [
            ("prefix", &self.prefix),
            ("wrapper_suffix", &self.wrapper_suffix),
            ("dispatch_setup_function", &self.dispatch_setup_function),
        ];
        for (field, value) in identifiers {
            if !is_c_identifier(value) {
                return Err(ConfigError::invalid(
                    field,
                    format!("C の識別子ではありません: {value:?}"),
                ));
            }
        }
        Ok(())
    }

    pub fn trace_condition(&self) -> String {
        self.trace_condition
            .replace("{PREFIX}", &self.prefix.to_ascii_uppercase())
    }

    pub fn wrapper_name(&self, name: &str) -> String {
        format!("{name}{}", self.wrapper_suffix)
    }

    pub fn version_classifier(&self) -> VersionClassifier {
        VersionClassifier::new(self.baseline_features.iter().cloned())
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::new(self.exclusions.iter().cloned(), self.version_classifier())
    }
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GeneratorConfig::from_json_str(r#"{ "prefix": "gles" }"#).unwrap();
        assert_eq!(cfg.prefix, "gles");
        assert_eq!(cfg.wrapper_suffix, "Wrapper");
        assert_eq!(cfg.trace_condition(), "glxWinDebugSettings.enableGLEScallTrace");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = GeneratorConfig::from_json_str(r#"{ "prefx": "gl" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn names_spliced_into_c_must_be_identifiers() {
        for (json, field) in [
            (r#"{ "wrapper_suffix": "Wrap per" }"#, "wrapper_suffix"),
            (r#"{ "dispatch_setup_function": "setup table" }"#, "dispatch_setup_function"),
            (r#"{ "dispatch_setup_function": "9setup" }"#, "dispatch_setup_function"),
        ] {
            let err = GeneratorConfig::from_json_str(json).unwrap_err();
            assert!(err.to_string().contains(field), "{err}");
        }
        assert!(GeneratorConfig::from_json_str(r#"{ "wrapper_suffix": "_thunk" }"#).is_ok());
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let err = GeneratorConfig::from_json_str(r#"{ "wrapper_suffix": " " }"#).unwrap_err();
        assert!(err.to_string().contains("wrapper_suffix"));
    }
}
