//! 参照と誤認しやすい文脈（削除規定・旧法・法令番号など）の除外。

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Span;

/// 一致の前後から切り出した判定用の文脈。
#[derive(Debug, Clone, Copy)]
pub struct ContextWindow<'t> {
    text: &'t str,
    from: usize,
    start: usize,
    end: usize,
    to: usize,
}

impl<'t> ContextWindow<'t> {
    /// 一致の前 `before_chars` 文字（直前の句点は越えない）と、
    /// 後ろは句点を含む文末まで（最大 `after_chars` 文字）を切り出す。
    pub fn around(text: &'t str, span: Span, before_chars: usize, after_chars: usize) -> Self {
        let mut from = span.start;
        for (idx, c) in text[..span.start].char_indices().rev().take(before_chars) {
            if c == '。' {
                break;
            }
            from = idx;
        }
        let mut to = span.end;
        for (idx, c) in text[span.end..].char_indices().take(after_chars) {
            to = span.end + idx + c.len_utf8();
            if c == '。' {
                break;
            }
        }
        Self {
            text,
            from,
            start: span.start,
            end: span.end,
            to,
        }
    }

    pub fn before(&self) -> &'t str {
        &self.text[self.from..self.start]
    }

    pub fn matched(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    pub fn after(&self) -> &'t str {
        &self.text[self.end..self.to]
    }

    /// 前の文脈と一致部分。
    pub fn leading(&self) -> &'t str {
        &self.text[self.from..self.end]
    }

    pub fn whole(&self) -> &'t str {
        &self.text[self.from..self.to]
    }
}

/// 否定パターンを当てる文脈の範囲。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeScope {
    Preceding,
    Following,
    Leading,
    Window,
}

/// 設定ファイルから与える否定パターン。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeSpec {
    pub name: String,
    pub scope: NegativeScope,
    pub pattern: String,
}

impl NegativeSpec {
    fn new(name: &str, scope: NegativeScope, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            scope,
            pattern: pattern.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct NegativePattern {
    name: String,
    scope: NegativeScope,
    matcher: Regex,
}

impl NegativePattern {
    fn hits(&self, window: &ContextWindow<'_>) -> bool {
        let haystack = match self.scope {
            NegativeScope::Preceding => window.before(),
            NegativeScope::Following => window.after(),
            NegativeScope::Leading => window.leading(),
            NegativeScope::Window => window.whole(),
        };
        self.matcher.is_match(haystack)
    }
}

/// 組み込みの否定パターン表。
pub fn builtin_negative_specs() -> Vec<NegativeSpec> {
    const NUM: &str = "[0-9０-９〇一二三四五六七八九十百千]+";
    vec![
        NegativeSpec::new(
            "deletion",
            NegativeScope::Following,
            "^[、及び並にから第条項号までの0-9０-９〇一二三四五六七八九十百千]{0,30}(?:の規定)?(?:を|は)、?(?:削除|廃止)(?:する|した|して|し[、，]|され|。|$)",
        ),
        NegativeSpec::new(
            "deleted_placeholder",
            NegativeScope::Following,
            "^[ 　]*削除[ 　]*(?:。|$)",
        ),
        NegativeSpec::new(
            "former_law",
            NegativeScope::Preceding,
            "(?:旧(?:法律|法|令)?|改正前の?|改正前における|廃止前の|廃止前における)$",
        ),
        NegativeSpec::new("draft", NegativeScope::Window, "仮称"),
        NegativeSpec::new("bill", NegativeScope::Preceding, "案$"),
        NegativeSpec::new(
            "law_number",
            NegativeScope::Leading,
            &format!("(?:法律|政令|省令|府令|規則|規程|条例|告示|訓令|通達|勅令)第{NUM}号$"),
        ),
        NegativeSpec::new(
            "explanatory",
            NegativeScope::Window,
            "例えば|たとえば|に相当する規定|を参考に",
        ),
    ]
}

/// 否定パターンの集合。どれか1つでも当たれば候補を捨てる。
#[derive(Debug, Clone)]
pub struct NegativeFilter {
    patterns: Vec<NegativePattern>,
}

impl NegativeFilter {
    /// 組み込みの否定パターン表で初期化する。
    pub fn new() -> Result<Self> {
        Self::from_specs(&builtin_negative_specs())
    }

    /// 任意の否定パターン表で初期化する。空の表や不正な正規表現はエラー。
    pub fn from_specs(specs: &[NegativeSpec]) -> Result<Self> {
        if specs.is_empty() {
            bail!("否定パターンが1件も指定されていません");
        }
        let patterns = specs
            .iter()
            .map(|spec| -> Result<NegativePattern> {
                let matcher = Regex::new(&spec.pattern)
                    .with_context(|| format!("否定パターン {} の初期化に失敗", spec.name))?;
                Ok(NegativePattern {
                    name: spec.name.clone(),
                    scope: spec.scope,
                    matcher,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 当たった否定パターンの名前。当たらなければ `None`。
    pub fn rejection(&self, window: &ContextWindow<'_>) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.hits(window))
            .map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window<'t>(text: &'t str, matched: &str) -> ContextWindow<'t> {
        let start = text.find(matched).unwrap();
        let span = Span {
            start,
            end: start + matched.len(),
        };
        ContextWindow::around(text, span, 20, 200)
    }

    /// 前は句点で止まり、後ろは句点を含めて切り出すことを確認する。
    #[test]
    fn window_stops_at_sentence_boundaries() {
        let text = "前の文。この法律は第三条の規定による。次の文";
        let w = window(text, "第三条");
        assert_eq!(w.before(), "この法律は");
        assert_eq!(w.matched(), "第三条");
        assert_eq!(w.after(), "の規定による。");
        assert_eq!(w.leading(), "この法律は第三条");
        assert_eq!(w.whole(), "この法律は第三条の規定による。");
    }

    /// 文字数の上限が文字単位で働くことを確認する。
    #[test]
    fn window_limits_are_counted_in_chars() {
        let text = "あいうえお第三条かきくけこ";
        let start = text.find("第三条").unwrap();
        let span = Span {
            start,
            end: start + "第三条".len(),
        };
        let w = ContextWindow::around(text, span, 2, 3);
        assert_eq!(w.before(), "えお");
        assert_eq!(w.after(), "かきく");
    }

    /// 組み込みの否定パターンが想定する文脈を除外することを確認する。
    #[test]
    fn builtin_patterns_reject_exclusionary_contexts() {
        let filter = NegativeFilter::new().unwrap();
        let cases = [
            ("民法第90条を削除する。", "民法第90条", "deletion"),
            ("第三条及び第四条を削除する。", "第三条", "deletion"),
            ("第十条の規定は、廃止する。", "第十条", "deletion"),
            ("第五条　削除", "第五条", "deleted_placeholder"),
            ("旧民法第三条の規定", "民法第三条", "former_law"),
            ("改正前の第三条", "第三条", "former_law"),
            ("（仮称）に関する法律第二条", "第二条", "draft"),
            ("法律案第二条", "第二条", "bill"),
            ("平成十五年法律第五十七号", "第五十七号", "law_number"),
            ("昭和三十年訓令第一号", "第一号", "law_number"),
            ("事務処理規程第二号", "第二号", "law_number"),
            ("例えば第九条に規定する場合", "第九条", "explanatory"),
        ];
        for (text, matched, expected) in cases {
            assert_eq!(
                filter.rejection(&window(text, matched)),
                Some(expected),
                "{}",
                text
            );
        }
    }

    /// 通常の参照は除外しないことを確認する。
    #[test]
    fn builtin_patterns_keep_ordinary_citations() {
        let filter = NegativeFilter::new().unwrap();
        for (text, matched) in [
            ("第十条の規定を適用する。", "第十条"),
            ("同条第一項第三号に掲げる者", "第三号"),
            ("前条の規定により削除された事項", "前条"),
            ("第十条の規定を削除しない場合", "第十条"),
            ("第四条を廃止しないときは", "第四条"),
        ] {
            assert_eq!(filter.rejection(&window(text, matched)), None, "{}", text);
        }
    }

    /// 空の表や不正なパターンは初期化エラーになることを確認する。
    #[test]
    fn invalid_tables_fail_construction() {
        assert!(NegativeFilter::from_specs(&[]).is_err());
        let broken = [NegativeSpec::new("broken", NegativeScope::Window, "(")];
        assert!(NegativeFilter::from_specs(&broken).is_err());
        let custom = [NegativeSpec::new("custom", NegativeScope::Following, "^を除く")];
        let filter = NegativeFilter::from_specs(&custom).unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(
            filter.rejection(&window("第二条を除く。", "第二条")),
            Some("custom")
        );
    }
}
