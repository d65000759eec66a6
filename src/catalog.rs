//! 参照表現のパターン一覧と、テキスト全体の走査。

use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;

use crate::law_name::{LAW_SUFFIX_PATTERN, LawNameNormalizer};
use crate::model::{ReferenceType, Span};

const NUM: &str = "[0-9０-９〇一二三四五六七八九十百千]+";
/// 枝番号（「の二」など）。枝番号は2から始まるため「の一」は含めない。
const BRANCH: &str = "の(?:[二三四五六七八九十百][〇一二三四五六七八九十百]*|[2-9２-９][0-9０-９]*|[1１][0-9０-９]+)";
const CLAUSE: &str = "(?P<clause>ただし書|本文|前段|後段)?";

/// 捕捉グループ名。
const GROUP_NAMES: &[&str] = &[
    "law",
    "law_num",
    "art",
    "art_end",
    "para",
    "para_end",
    "item",
    "item_end",
    "all_items",
    "clause",
    "dir",
    "count",
    "unit",
    "levels",
    "level",
];

/// パターン規則の識別子。`ALL` の並びがそのまま優先順位になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    ExternalArticle,
    SameLawArticle,
    ArticleWithItem,
    ArticleWithParagraph,
    ArticleRange,
    BranchArticle,
    RelativeWithItem,
    RelativeWithParagraph,
    MultiplePreceding,
    ParagraphWithItem,
    ParagraphRange,
    ItemRange,
    Article,
    StructuralAbsolute,
    StructuralRelative,
    RelativeKeyword,
    ItemList,
    Paragraph,
    Item,
}

impl RuleId {
    /// 構造的に具体的なものから順に並べた全規則。
    pub const ALL: [RuleId; 19] = [
        RuleId::ExternalArticle,
        RuleId::SameLawArticle,
        RuleId::ArticleWithItem,
        RuleId::ArticleWithParagraph,
        RuleId::ArticleRange,
        RuleId::BranchArticle,
        RuleId::RelativeWithItem,
        RuleId::RelativeWithParagraph,
        RuleId::MultiplePreceding,
        RuleId::ParagraphWithItem,
        RuleId::ParagraphRange,
        RuleId::ItemRange,
        RuleId::Article,
        RuleId::StructuralAbsolute,
        RuleId::StructuralRelative,
        RuleId::RelativeKeyword,
        RuleId::ItemList,
        RuleId::Paragraph,
        RuleId::Item,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleId::ExternalArticle => "external_article",
            RuleId::SameLawArticle => "same_law_article",
            RuleId::ArticleWithItem => "article_with_item",
            RuleId::ArticleWithParagraph => "article_with_paragraph",
            RuleId::ArticleRange => "article_range",
            RuleId::BranchArticle => "branch_article",
            RuleId::RelativeWithItem => "relative_with_item",
            RuleId::RelativeWithParagraph => "relative_with_paragraph",
            RuleId::MultiplePreceding => "multiple_preceding",
            RuleId::ParagraphWithItem => "paragraph_with_item",
            RuleId::ParagraphRange => "paragraph_range",
            RuleId::ItemRange => "item_range",
            RuleId::Article => "article",
            RuleId::StructuralAbsolute => "structural_absolute",
            RuleId::StructuralRelative => "structural_relative",
            RuleId::RelativeKeyword => "relative_keyword",
            RuleId::ItemList => "item_list",
            RuleId::Paragraph => "paragraph",
            RuleId::Item => "item",
        }
    }

    /// 規則が生成する参照の大分類（範囲指定の有無などで変わるものは代表値）。
    pub fn reference_type(self) -> ReferenceType {
        match self {
            RuleId::ExternalArticle | RuleId::SameLawArticle => ReferenceType::External,
            RuleId::ArticleWithItem
            | RuleId::ArticleWithParagraph
            | RuleId::BranchArticle
            | RuleId::ParagraphWithItem
            | RuleId::Article
            | RuleId::Paragraph
            | RuleId::Item => ReferenceType::Internal,
            RuleId::ArticleRange | RuleId::ParagraphRange | RuleId::ItemRange => {
                ReferenceType::Complex
            }
            RuleId::RelativeWithItem
            | RuleId::RelativeWithParagraph
            | RuleId::MultiplePreceding
            | RuleId::RelativeKeyword
            | RuleId::ItemList => ReferenceType::Relative,
            RuleId::StructuralAbsolute | RuleId::StructuralRelative => ReferenceType::Structural,
        }
    }

    fn pattern(self) -> String {
        let article = format!("{NUM}条(?:{BRANCH})*");
        let item = format!("{NUM}号(?:{BRANCH})*");
        let law = format!("[一-龥々〆ぁ-んァ-ヶー・]{{1,40}}?(?:{LAW_SUFFIX_PATTERN})");
        let item_tail = format!(
            "(?:第(?P<item>{item})(?:から第(?P<item_end>{item})まで)?|(?P<all_items>各号))"
        );
        let law_tail = format!(
            "第(?P<art>{article})(?:から第(?P<art_end>{article})まで)?(?:第(?P<para>{NUM})項)?(?:第(?P<item>{item}))?{CLAUSE}"
        );
        match self {
            RuleId::ExternalArticle => {
                format!("(?P<law>{law})(?:（(?P<law_num>[^（）]{{1,40}})）)?{law_tail}")
            }
            RuleId::SameLawArticle => format!("同(?:{LAW_SUFFIX_PATTERN}){law_tail}"),
            RuleId::ArticleWithItem => {
                format!("第(?P<art>{article})(?:第(?P<para>{NUM})項)?{item_tail}{CLAUSE}")
            }
            RuleId::ArticleWithParagraph => format!(
                "第(?P<art>{article})第(?P<para>{NUM})項(?:から第(?P<para_end>{NUM})項まで)?{CLAUSE}"
            ),
            RuleId::ArticleRange => {
                format!("第(?P<art>{article})から第(?P<art_end>{article})まで")
            }
            RuleId::BranchArticle => format!("第(?P<art>{NUM}条(?:{BRANCH})+){CLAUSE}"),
            RuleId::RelativeWithItem => format!(
                "(?P<dir>前|次|同)(?P<unit>条|項)(?:第(?P<para>{NUM})項)?{item_tail}{CLAUSE}"
            ),
            RuleId::RelativeWithParagraph => format!(
                "(?P<dir>前|次|同)条第(?P<para>{NUM})項(?:から第(?P<para_end>{NUM})項まで)?{CLAUSE}"
            ),
            RuleId::MultiplePreceding => format!("前(?P<count>{NUM})(?P<unit>条|項|号)"),
            RuleId::ParagraphWithItem => format!("第(?P<para>{NUM})項{item_tail}{CLAUSE}"),
            RuleId::ParagraphRange => {
                format!("第(?P<para>{NUM})項から第(?P<para_end>{NUM})項まで")
            }
            RuleId::ItemRange => format!("第(?P<item>{item})から第(?P<item_end>{item})まで"),
            RuleId::Article => format!("第(?P<art>{NUM})条{CLAUSE}"),
            RuleId::StructuralAbsolute => {
                format!("(?P<levels>(?:第{NUM}[編章節款目](?:{BRANCH})*)+)")
            }
            RuleId::StructuralRelative => "(?P<dir>前|次|同|この|本)(?P<level>[編章節款])".to_string(),
            RuleId::RelativeKeyword => format!("(?P<dir>前|次|同)(?P<unit>条|項|号){CLAUSE}"),
            RuleId::ItemList => "(?P<dir>次の|前)各(?P<unit>号|項)".to_string(),
            RuleId::Paragraph => format!("第(?P<para>{NUM})項{CLAUSE}"),
            RuleId::Item => format!("第(?P<item>{item})"),
        }
    }
}

/// 参照パターン1件。
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub id: RuleId,
    pub matcher: Regex,
    /// 小さいほど具体的。
    pub specificity_rank: u8,
}

impl PatternRule {
    pub fn reference_type(&self) -> ReferenceType {
        self.id.reference_type()
    }
}

/// 走査で得られた未加工の一致。
#[derive(Debug, Clone)]
pub struct RawMatch<'t> {
    pub rule: RuleId,
    pub specificity_rank: u8,
    pub span: Span,
    pub text: &'t str,
    char_len: usize,
    groups: HashMap<&'static str, &'t str>,
}

impl<'t> RawMatch<'t> {
    pub fn group(&self, name: &str) -> Option<&'t str> {
        self.groups.get(name).copied()
    }

    /// 文字数で数えた長さ。
    pub fn char_len(&self) -> usize {
        self.char_len
    }
}

/// 優先順位付きの参照パターン一覧。一度だけ構築し、以後は読み取り専用。
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<PatternRule>,
    law_names: LawNameNormalizer,
}

impl PatternCatalog {
    /// 全パターンを初期化する。1つでも失敗すれば全体を失敗とする。
    pub fn new(law_names: LawNameNormalizer) -> Result<Self> {
        let mut rules = Vec::with_capacity(RuleId::ALL.len());
        for (rank, id) in RuleId::ALL.into_iter().enumerate() {
            let matcher = Regex::new(&id.pattern())
                .with_context(|| format!("参照パターン {} の初期化に失敗", id.name()))?;
            rules.push(PatternRule {
                id,
                matcher,
                specificity_rank: u8::try_from(rank).unwrap_or(u8::MAX),
            });
        }
        Ok(Self { rules, law_names })
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// 全パターンでテキストを走査し、重なりを含む全一致を返す。
    pub fn scan<'t>(&self, text: &'t str) -> Vec<RawMatch<'t>> {
        let mut out = Vec::new();
        for rule in &self.rules {
            for caps in rule.matcher.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let mut start = whole.start();
                let end = whole.end();
                if has_false_trailer(whole.as_str(), &text[end..]) {
                    continue;
                }
                let mut groups = HashMap::new();
                for name in GROUP_NAMES {
                    if let Some(m) = caps.name(name) {
                        groups.insert(*name, m.as_str());
                    }
                }
                if rule.id == RuleId::ExternalArticle {
                    // 法令名の前に付いた文言を切り落とし、一致範囲も法令名の先頭へ詰める。
                    let Some(law) = caps.name("law") else {
                        continue;
                    };
                    let Some(name) = self.law_names.normalize(law.as_str()) else {
                        continue;
                    };
                    let Some(prefix) = law.as_str().strip_suffix(name) else {
                        continue;
                    };
                    start = law.start() + prefix.len();
                    groups.insert("law", name);
                }
                let matched = &text[start..end];
                out.push(RawMatch {
                    rule: rule.id,
                    specificity_rank: rule.specificity_rank,
                    span: Span { start, end },
                    text: matched,
                    char_len: matched.chars().count(),
                    groups,
                });
            }
        }
        out
    }
}

/// 「条約」「条例」「項目」「号様式」のように、一致の直後で別の語になるもの。
fn has_false_trailer(matched: &str, rest: &str) -> bool {
    let Some(next) = rest.chars().next() else {
        return false;
    };
    match matched.chars().last() {
        Some('条') => matches!(next, '約' | '例'),
        Some('項') => next == '目',
        Some('号') => next == '様',
        _ => false,
    }
}
