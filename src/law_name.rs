//! 条文中の法令名断片の正規化。

use anyhow::{Context, Result};
use regex::Regex;

/// 法令名の末尾になる語（正規表現の選択肢）。
pub const LAW_SUFFIX_PATTERN: &str = "法律|法|施行令|施行規則|政令|省令|府令|規則|条例|条約|令";

const LAW_SUFFIXES: [&str; 12] = [
    "法律",
    "法",
    "施行令",
    "施行規則",
    "政令",
    "省令",
    "府令",
    "規則",
    "条例",
    "条約",
    "令",
    "命令",
];

/// 抽出した法令名断片から実際の法令名部分を取り出す。
#[derive(Debug, Clone)]
pub struct LawNameNormalizer {
    token: Regex,
    /// 既知の法令名（長い順）。
    known: Vec<String>,
}

impl LawNameNormalizer {
    /// 既知の法令名一覧とともに初期化する。
    pub fn new<I, S>(known: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let token = Regex::new(&format!(
            r"[一-龥々〆ァ-ヶーA-Za-z0-9・]{{1,30}}(?:{})",
            LAW_SUFFIX_PATTERN
        ))
        .context("法令名トークン正規表現の初期化に失敗")?;
        let mut known: Vec<String> = known
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();
        known.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        known.dedup();
        Ok(Self { token, known })
    }

    /// 法令名として有効な部分（断片の末尾）を返す。
    ///
    /// 「同法」「この法律」など自法令・直前法令を指す語は `None`。
    pub fn normalize<'a>(&self, fragment: &'a str) -> Option<&'a str> {
        let trimmed = fragment.trim_matches(|c: char| {
            matches!(
                c,
                ' ' | '　' | '（' | '）' | '(' | ')' | '「' | '」' | '『' | '』' | '、' | '。'
            )
        });
        if trimmed.is_empty() || is_self_reference(trimmed) {
            return None;
        }

        let last = self.token.find_iter(trimmed).last();
        let mut candidate = None;
        if let Some(m) = last {
            let token = strip_token_noise(m.as_str());
            let prefix = &trimmed[..m.end() - token.len()];
            if is_self_reference(token) || prefix.ends_with("この") || prefix.ends_with("その") {
                return None;
            }
            if self.known.iter().any(|k| k == token) {
                return Some(token);
            }
            if token.chars().count() >= 2 {
                candidate = Some(token);
            }
        }
        if let Some(known) = self.known_suffix(trimmed) {
            return Some(known);
        }
        candidate.or_else(|| descriptive_name(trimmed))
    }

    /// 語の境界で終わる既知の法令名。
    fn known_suffix<'a>(&self, s: &'a str) -> Option<&'a str> {
        for name in &self.known {
            if let Some(before) = s.strip_suffix(name.as_str()) {
                if before.chars().last().is_none_or(|c| !is_name_char(c)) {
                    return Some(&s[before.len()..]);
                }
            }
        }
        None
    }
}

/// 「〜に関する法律」型の題名を末尾から取り出す。
fn descriptive_name(s: &str) -> Option<&str> {
    let pos = s.rfind("に関する")?;
    let tail = &s[pos + "に関する".len()..];
    if !LAW_SUFFIXES.contains(&tail) {
        return None;
    }
    let mut start = pos;
    for (idx, c) in s[..pos].char_indices().rev() {
        if is_name_char(c) || matches!(c, 'の' | '等') {
            start = idx;
        } else {
            break;
        }
    }
    let name = s[start..].trim_start_matches('の');
    (name.len() > tail.len() + "に関する".len()).then_some(name)
}

/// 法令名を構成しうる文字か（漢字・カタカナ・英数字など）。
fn is_name_char(c: char) -> bool {
    matches!(c, '一'..='龥' | '々' | '〆' | 'ァ'..='ヶ' | 'ー' | '・' | 'A'..='Z' | 'a'..='z' | '0'..='9')
}

/// 自法令・直前法令を指す語か。
fn is_self_reference(s: &str) -> bool {
    if LAW_SUFFIXES.contains(&s) {
        return true;
    }
    ["同", "本", "この", "前記"]
        .iter()
        .filter_map(|p| s.strip_prefix(p))
        .any(|rest| LAW_SUFFIXES.contains(&rest))
}

/// 改正前後・旧などの修飾や、直前の条項番号の残骸を取り除く。
fn strip_token_noise(token: &str) -> &str {
    let token = strip_revision_prefix(token);
    let token = token.trim_start_matches(|c: char| {
        matches!(
            c,
            '一' | '二'
                | '三'
                | '四'
                | '五'
                | '六'
                | '七'
                | '八'
                | '九'
                | '十'
                | '百'
                | '千'
                | '〇'
                | '0'..='9' | '第' | '条' | '項' | '号'
        )
    });
    let token = token.strip_prefix('中').unwrap_or(token);
    let token = strip_revision_prefix(token);
    match token.rsplit_once('中') {
        Some((_, right)) if ends_with_law_suffix(right) => right,
        _ => token,
    }
}

fn strip_revision_prefix(token: &str) -> &str {
    token
        .strip_prefix("改正前")
        .or_else(|| token.strip_prefix("改正後"))
        .or_else(|| token.strip_prefix('旧'))
        .unwrap_or(token)
}

fn ends_with_law_suffix(s: &str) -> bool {
    s.chars().count() >= 2 && LAW_SUFFIXES.iter().any(|suffix| s.ends_with(suffix))
}

/// 法令名末尾の括弧書き（法令番号）を切り離す。
pub fn split_qualifier(name: &str) -> (&str, Option<&str>) {
    let trimmed = name.trim_end();
    for (open, close) in [('（', '）'), ('(', ')')] {
        if let Some(body) = trimmed.strip_suffix(close) {
            if let Some(pos) = body.rfind(open) {
                let inner = &body[pos + open.len_utf8()..];
                return (body[..pos].trim_end(), Some(inner));
            }
        }
    }
    (trimmed, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> LawNameNormalizer {
        LawNameNormalizer::new(["民法", "特許法", "個人情報の保護に関する法律"]).unwrap()
    }

    /// 曖昧語や過剰な接頭辞を除去できることを確認する。
    #[test]
    fn normalize_filters_ambiguous_labels() {
        let n = normalizer();
        assert_eq!(n.normalize("旧特許法"), Some("特許法"));
        assert_eq!(n.normalize("この法律による改正後の特許法"), Some("特許法"));
        assert_eq!(n.normalize("三第一条中特許法"), Some("特許法"));
        assert_eq!(n.normalize("規定中特許法"), Some("特許法"));
        assert_eq!(n.normalize("同法"), None);
        assert_eq!(n.normalize("この法律"), None);
        assert_eq!(n.normalize("この規則"), None);
        assert_eq!(n.normalize("本法"), None);
    }

    /// 前置きの文言を含む断片から法令名だけを取り出せることを確認する。
    #[test]
    fn normalize_drops_leading_prose() {
        let n = normalizer();
        assert_eq!(n.normalize("第十条及び民法"), Some("民法"));
        assert_eq!(n.normalize("により読み替えて適用する民法"), Some("民法"));
        assert_eq!(n.normalize("この命令"), None);
    }

    /// 未登録の法令名も語として取り出せることを確認する。
    #[test]
    fn normalize_keeps_unknown_law_names() {
        let n = normalizer();
        assert_eq!(n.normalize("規定により地方税法"), Some("地方税法"));
        assert_eq!(n.normalize("特別民法"), Some("特別民法"));
    }

    /// ひらがなを含む題名を扱えることを確認する。
    #[test]
    fn normalize_handles_descriptive_titles() {
        let n = normalizer();
        assert_eq!(
            n.normalize("の規定を適用する個人情報の保護に関する法律"),
            Some("個人情報の保護に関する法律")
        );
        assert_eq!(n.normalize("に関する法律"), None);
        assert_eq!(
            n.normalize("消費者の利益の擁護に関する法律"),
            Some("消費者の利益の擁護に関する法律")
        );
    }

    /// 括弧書きの法令番号を切り離せることを確認する。
    #[test]
    fn split_qualifier_separates_law_number() {
        assert_eq!(
            split_qualifier("民法（明治二十九年法律第八十九号）"),
            ("民法", Some("明治二十九年法律第八十九号"))
        );
        assert_eq!(split_qualifier("民法"), ("民法", None));
        assert_eq!(split_qualifier("刑法(明治四十年法律第四十五号)"), ("刑法", Some("明治四十年法律第四十五号")));
    }
}
