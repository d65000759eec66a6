//! 他法令名から法令IDを引く辞書と、その照合処理。

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::law_name::split_qualifier;
use crate::model::ExternalCitation;

/// 法令名辞書の1エントリ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawEntry {
    pub law_id: Option<String>,
    pub law_num: Option<String>,
    pub law_title: String,
}

impl LawEntry {
    pub fn new(law_id: &str, law_num: &str, law_title: &str) -> Self {
        Self {
            law_id: Some(law_id.to_string()),
            law_num: Some(law_num.to_string()),
            law_title: law_title.to_string(),
        }
    }
}

/// 頻繁に引用される法令（法令名, 法令ID, 法令番号）。
const BUILTIN_LAWS: &[(&str, &str, &str)] = &[
    ("民法", "129AC0000000089", "明治二十九年法律第八十九号"),
    ("商法", "132AC0000000048", "明治三十二年法律第四十八号"),
    ("刑法", "140AC0000000045", "明治四十年法律第四十五号"),
    ("日本国憲法", "321CONSTITUTION", "昭和二十一年憲法"),
    ("刑事訴訟法", "323AC0000000131", "昭和二十三年法律第百三十一号"),
    ("地方自治法", "322AC0000000067", "昭和二十二年法律第六十七号"),
    ("労働基準法", "322AC0000000049", "昭和二十二年法律第四十九号"),
    ("特許法", "334AC0000000121", "昭和三十四年法律第百二十一号"),
    ("所得税法", "340AC0000000033", "昭和四十年法律第三十三号"),
    ("法人税法", "340AC0000000034", "昭和四十年法律第三十四号"),
    ("著作権法", "345AC0000000048", "昭和四十五年法律第四十八号"),
    ("行政手続法", "405AC0000000088", "平成五年法律第八十八号"),
    ("民事訴訟法", "408AC0000000109", "平成八年法律第百九号"),
    (
        "個人情報の保護に関する法律",
        "415AC0000000057",
        "平成十五年法律第五十七号",
    ),
    ("会社法", "417AC0000000086", "平成十七年法律第八十六号"),
];

/// よく使われる略称（略称, 正式名）。
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("憲法", "日本国憲法"),
    ("個人情報保護法", "個人情報の保護に関する法律"),
];

type LawNameDictionary = HashMap<String, LawEntry>;

/// 法令名（略称を含む）から法令を引く静的な辞書。
#[derive(Debug, Clone, Default)]
pub struct ExternalLawRegistry {
    by_name: LawNameDictionary,
    by_num: HashMap<String, LawEntry>,
}

impl ExternalLawRegistry {
    /// 空の辞書。
    pub fn new() -> Self {
        Self::default()
    }

    /// 主要法令を登録済みの辞書。
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (title, law_id, law_num) in BUILTIN_LAWS {
            registry.insert(*title, LawEntry::new(law_id, law_num, title));
        }
        for (alias, title) in BUILTIN_ALIASES {
            if let Some(entry) = registry.get(title).cloned() {
                registry.insert(*alias, entry);
            }
        }
        registry
    }

    /// 名前（正式名・略称・法令番号のいずれか）で登録する。
    pub fn insert(&mut self, name: impl Into<String>, entry: LawEntry) {
        if let Some(num) = entry.law_num.as_deref().filter(|n| !n.trim().is_empty()) {
            self.by_num
                .entry(num.to_string())
                .or_insert_with(|| entry.clone());
        }
        self.by_name.insert(name.into(), entry);
    }

    /// e-Gov法令名辞書形式（名前→エントリ）のJSONから構築する。
    pub fn from_json(raw: &str) -> Result<Self> {
        let dict: LawNameDictionary =
            serde_json::from_str(raw).context("法令名辞書JSONの解析に失敗しました")?;
        let mut registry = Self::new();
        for (name, entry) in dict {
            registry.insert(name, entry);
        }
        Ok(registry)
    }

    /// ローカルJSONから法令名辞書を読み込む。
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("辞書ファイル読み込みに失敗: {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// 別の辞書の内容を追加する（既存の名前は上書き）。
    pub fn extend(&mut self, other: ExternalLawRegistry) {
        for (name, entry) in other.by_name {
            self.insert(name, entry);
        }
    }

    pub fn get(&self, name: &str) -> Option<&LawEntry> {
        self.by_name.get(name)
    }

    pub fn find_by_law_num(&self, law_num: &str) -> Option<&LawEntry> {
        self.by_num.get(law_num.trim())
    }

    /// 登録済みの名前の一覧。
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// 他法令参照の法令名を辞書で解決する。
#[derive(Debug, Clone)]
pub struct ExternalLawResolver {
    registry: ExternalLawRegistry,
}

impl ExternalLawResolver {
    pub fn new(registry: ExternalLawRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ExternalLawRegistry {
        &self.registry
    }

    /// 法令名（括弧書きの法令番号付きでもよい）から辞書エントリを引く。
    ///
    /// 名前で見つからなければ法令番号で引き直す。
    pub fn resolve(&self, law_name: &str, law_num: Option<&str>) -> Option<&LawEntry> {
        let (name, qualifier) = split_qualifier(law_name);
        self.registry
            .get(name)
            .or_else(|| law_num.or(qualifier).and_then(|n| self.registry.find_by_law_num(n)))
    }

    /// 他法令参照へ法令IDを設定する。未登録なら法令IDは空のまま残す。
    pub fn apply(&self, citation: &mut ExternalCitation) {
        let Some(name) = citation.law_name.as_deref() else {
            return;
        };
        citation.law_id = self
            .resolve(name, citation.law_num.as_deref())
            .and_then(|entry| entry.law_id.clone());
    }
}
