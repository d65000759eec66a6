//! 検出器の設定。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::negative::NegativeSpec;

/// 検出器の設定（JSON）。省略した項目は既定値になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// 否定パターン判定で一致の前に見る文字数。
    pub context_before_chars: usize,
    /// 一致の後に見る最大文字数（文末で打ち切る）。
    pub context_after_chars: usize,
    /// 準用・読替えなどの効果を判定するか。
    pub classify_effects: bool,
    /// 組み込みの否定パターン表を置き換える場合に指定する。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_patterns: Option<Vec<NegativeSpec>>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            context_before_chars: 20,
            context_after_chars: 200,
            classify_effects: true,
            negative_patterns: None,
        }
    }
}

impl DetectorConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("検出器設定JSONの解析に失敗しました")
    }

    /// ローカルJSONから設定を読み込む。
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("設定ファイル読み込みに失敗: {}", path.display()))?;
        Self::from_json(&raw)
    }
}
