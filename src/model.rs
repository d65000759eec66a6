//! 参照検出の入出力データ型。

use serde::{Deserialize, Serialize};

use crate::numeral::ProvisionNumber;

/// 編・章・節・款・目の階層種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Part,
    Chapter,
    Section,
    Subsection,
    Division,
}

impl StructureType {
    /// 外側から内側の順。
    pub const ALL: [StructureType; 5] = [
        StructureType::Part,
        StructureType::Chapter,
        StructureType::Section,
        StructureType::Subsection,
        StructureType::Division,
    ];

    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '編' => Some(Self::Part),
            '章' => Some(Self::Chapter),
            '節' => Some(Self::Section),
            '款' => Some(Self::Subsection),
            '目' => Some(Self::Division),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Part => '編',
            Self::Chapter => '章',
            Self::Section => '節',
            Self::Subsection => '款',
            Self::Division => '目',
        }
    }

    fn depth(self) -> usize {
        match self {
            Self::Part => 0,
            Self::Chapter => 1,
            Self::Section => 2,
            Self::Subsection => 3,
            Self::Division => 4,
        }
    }
}

/// 条より上位の構造上の位置（第二章第三節など）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructurePath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<ProvisionNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<ProvisionNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<ProvisionNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<ProvisionNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<ProvisionNumber>,
}

impl StructurePath {
    pub fn get(&self, level: StructureType) -> Option<&ProvisionNumber> {
        match level {
            StructureType::Part => self.part.as_ref(),
            StructureType::Chapter => self.chapter.as_ref(),
            StructureType::Section => self.section.as_ref(),
            StructureType::Subsection => self.subsection.as_ref(),
            StructureType::Division => self.division.as_ref(),
        }
    }

    fn slot(&mut self, level: StructureType) -> &mut Option<ProvisionNumber> {
        match level {
            StructureType::Part => &mut self.part,
            StructureType::Chapter => &mut self.chapter,
            StructureType::Section => &mut self.section,
            StructureType::Subsection => &mut self.subsection,
            StructureType::Division => &mut self.division,
        }
    }

    /// 指定階層に番号を設定し、それより内側の階層は未知として消去する。
    pub fn set(&mut self, level: StructureType, number: ProvisionNumber) {
        *self.slot(level) = Some(number);
        for inner in StructureType::ALL.iter().filter(|l| l.depth() > level.depth()) {
            *self.slot(*inner) = None;
        }
    }

    /// 指定階層までを残した経路。
    pub fn truncated(&self, level: StructureType) -> Self {
        let mut out = self.clone();
        for inner in StructureType::ALL.iter().filter(|l| l.depth() > level.depth()) {
            *out.slot(*inner) = None;
        }
        out
    }

    /// 番号が付いている最も内側の階層。
    pub fn deepest(&self) -> Option<StructureType> {
        StructureType::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| self.get(*level).is_some())
    }

    /// `other` に含まれる階層で上書きした経路。
    pub fn merged(&self, other: &StructurePath) -> Self {
        let mut out = self.clone();
        for level in StructureType::ALL {
            if let Some(n) = other.get(level) {
                out.set(level, n.clone());
            }
        }
        out
    }
}

/// 検出対象テキストが法令内のどこにあるか。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPosition {
    pub law_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<ProvisionNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<ProvisionNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<ProvisionNumber>,
    #[serde(default)]
    pub structure: StructurePath,
}

impl DocumentPosition {
    /// 条単位の位置を作る。条番号は `90`、`九十`、`第九十条の二` などを受け付ける。
    pub fn new(law_id: impl Into<String>, article: &str) -> Self {
        Self {
            law_id: law_id.into(),
            article: ProvisionNumber::parse(article),
            ..Self::default()
        }
    }

    /// 条番号を持たない本則（項のみの法令）の位置。
    pub fn main_provision(law_id: impl Into<String>) -> Self {
        Self {
            law_id: law_id.into(),
            ..Self::default()
        }
    }

    pub fn with_paragraph(mut self, paragraph: u32) -> Self {
        self.paragraph = ProvisionNumber::new(paragraph);
        self
    }

    pub fn with_item(mut self, item: u32) -> Self {
        self.item = ProvisionNumber::new(item);
        self
    }

    pub fn with_structure(mut self, level: StructureType, number: u32) -> Self {
        if let Some(n) = ProvisionNumber::new(number) {
            *self.structure.slot(level) = Some(n);
        }
        self
    }
}

/// 入力テキスト上の位置（UTF-8バイトオフセット）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// 相対参照の向き。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeDirection {
    Previous,
    Next,
    Same,
    /// 「この章」「本章」のように記載箇所自身を指すもの。
    This,
}

impl RelativeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Next => "next",
            Self::Same => "same",
            Self::This => "this",
        }
    }
}

/// 相対参照が数える単位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeUnit {
    Article,
    Paragraph,
    Item,
}

/// ただし書・本文・前段・後段の区別。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClausePart {
    Proviso,
    MainText,
    FirstSentence,
    LatterSentence,
}

impl ClausePart {
    pub fn from_marker(s: &str) -> Option<Self> {
        match s {
            "ただし書" => Some(Self::Proviso),
            "本文" => Some(Self::MainText),
            "前段" => Some(Self::FirstSentence),
            "後段" => Some(Self::LatterSentence),
            _ => None,
        }
    }
}

/// 条・項・号で特定される参照先。範囲参照では `*_end` が終端。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<ProvisionNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_end: Option<ProvisionNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<ProvisionNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_end: Option<ProvisionNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ProvisionNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_end: Option<ProvisionNumber>,
    /// 「各号」による号全体の指定。
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub all_items: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause: Option<ClausePart>,
}

impl ProvisionTarget {
    pub fn article(article: ProvisionNumber) -> Self {
        Self {
            article: Some(article),
            ..Self::default()
        }
    }

    pub fn is_range(&self) -> bool {
        self.article_end.is_some() || self.paragraph_end.is_some() || self.item_end.is_some()
    }
}

/// 参照の大分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Internal,
    External,
    Relative,
    Complex,
    Structural,
}

impl ReferenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Relative => "relative",
            Self::Complex => "complex",
            Self::Structural => "structural",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalSubType {
    Article,
    BranchArticle,
    WithParagraph,
    WithItem,
    Paragraph,
    Item,
}

/// 同一法令内の番号付き参照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalCitation {
    pub sub_type: InternalSubType,
    pub target: ProvisionTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalSubType {
    Article,
    WithParagraph,
    WithItem,
    Range,
    SameLaw,
}

/// 他法令の条項への参照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalCitation {
    pub sub_type: ExternalSubType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub law_name: Option<String>,
    /// 括弧書きの法令番号（明治二十九年法律第八十九号など）。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub law_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub law_id: Option<String>,
    pub target: ProvisionTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeSubType {
    Keyword,
    WithParagraph,
    WithItem,
    Multiple,
    ItemList,
}

/// 前条・同項・前二条・次の各号などの相対参照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeCitation {
    pub sub_type: RelativeSubType,
    pub direction: RelativeDirection,
    pub unit: RelativeUnit,
    /// 「前二条」の2。各号・各項の一括指定では0。
    pub count: u32,
    /// 直前に他法令の条を指していた場合のその法令（民法第九十条…同条第二項）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_id: Option<String>,
    pub target: ProvisionTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexSubType {
    Range,
    ParagraphRange,
    ItemRange,
}

/// 「から〜まで」の範囲参照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexCitation {
    pub sub_type: ComplexSubType,
    pub target: ProvisionTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralSubType {
    Absolute,
    Relative,
}

/// 編・章・節などへの参照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralCitation {
    pub sub_type: StructuralSubType,
    pub structure_type: StructureType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<RelativeDirection>,
    pub target: StructurePath,
}

/// 検出された参照の種別ごとの内容。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Citation {
    Internal(InternalCitation),
    External(ExternalCitation),
    Relative(RelativeCitation),
    Complex(ComplexCitation),
    Structural(StructuralCitation),
}

impl Citation {
    pub fn reference_type(&self) -> ReferenceType {
        match self {
            Citation::Internal(_) => ReferenceType::Internal,
            Citation::External(_) => ReferenceType::External,
            Citation::Relative(_) => ReferenceType::Relative,
            Citation::Complex(_) => ReferenceType::Complex,
            Citation::Structural(_) => ReferenceType::Structural,
        }
    }

    pub fn sub_type(&self) -> &'static str {
        match self {
            Citation::Internal(c) => match c.sub_type {
                InternalSubType::Article => "article",
                InternalSubType::BranchArticle => "branch_article",
                InternalSubType::WithParagraph => "with_paragraph",
                InternalSubType::WithItem => "with_item",
                InternalSubType::Paragraph => "paragraph",
                InternalSubType::Item => "item",
            },
            Citation::External(c) => match c.sub_type {
                ExternalSubType::Article => "article",
                ExternalSubType::WithParagraph => "with_paragraph",
                ExternalSubType::WithItem => "with_item",
                ExternalSubType::Range => "range",
                ExternalSubType::SameLaw => "same_law",
            },
            Citation::Relative(c) => match c.sub_type {
                RelativeSubType::Keyword => "keyword",
                RelativeSubType::WithParagraph => "with_paragraph",
                RelativeSubType::WithItem => "with_item",
                RelativeSubType::Multiple => "multiple",
                RelativeSubType::ItemList => "item_list",
            },
            Citation::Complex(c) => match c.sub_type {
                ComplexSubType::Range => "range",
                ComplexSubType::ParagraphRange => "paragraph_range",
                ComplexSubType::ItemRange => "item_range",
            },
            Citation::Structural(c) => match c.sub_type {
                StructuralSubType::Absolute => "absolute",
                StructuralSubType::Relative => "relative",
            },
        }
    }

    /// 条・項・号で表される参照先。構造参照では `None`。
    pub fn target(&self) -> Option<&ProvisionTarget> {
        match self {
            Citation::Internal(c) => Some(&c.target),
            Citation::External(c) => Some(&c.target),
            Citation::Relative(c) => Some(&c.target),
            Citation::Complex(c) => Some(&c.target),
            Citation::Structural(_) => None,
        }
    }
}

/// 参照がどのような法的効果を伴うか（準用・読替えなど）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceEffect {
    MutatisMutandis,
    Deemed,
    ReadAs,
    FollowPrior,
    BasedOn,
    AccordingTo,
}

impl ReferenceEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MutatisMutandis => "mutatis_mutandis",
            Self::Deemed => "deemed",
            Self::ReadAs => "read_as",
            Self::FollowPrior => "follow_prior",
            Self::BasedOn => "based_on",
            Self::AccordingTo => "according_to",
        }
    }
}

/// 検出結果1件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub span: Span,
    pub text: String,
    pub citation: Citation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<ReferenceEffect>,
    pub confidence: f32,
    pub resolved: bool,
}

impl Reference {
    pub fn reference_type(&self) -> ReferenceType {
        self.citation.reference_type()
    }

    pub fn sub_type(&self) -> &'static str {
        self.citation.sub_type()
    }

    pub fn target(&self) -> Option<&ProvisionTarget> {
        self.citation.target()
    }

    /// 参照元と同じ法令を指すか。
    pub fn is_same_law(&self) -> bool {
        match &self.citation {
            Citation::External(_) => false,
            Citation::Relative(c) => c.law_name.is_none() && c.law_id.is_none(),
            _ => true,
        }
    }

    /// 関係表・グラフ辺として保存するための平坦な形へ変換する。
    pub fn to_row(&self, from: &DocumentPosition) -> ReferenceRow {
        let target = self.target();
        let (to_law, to_law_name) = match &self.citation {
            Citation::External(c) => (c.law_id.clone(), c.law_name.clone()),
            Citation::Relative(c) if c.law_name.is_some() || c.law_id.is_some() => {
                (c.law_id.clone(), c.law_name.clone())
            }
            _ => (Some(from.law_id.clone()), None),
        };
        let (relative_direction, relative_count) = match &self.citation {
            Citation::Relative(c) => (Some(c.direction), Some(c.count)),
            Citation::Structural(c) => (c.direction, None),
            _ => (None, None),
        };
        ReferenceRow {
            from_law: from.law_id.clone(),
            from_article: from.article.as_ref().map(ToString::to_string),
            reference_type: self.reference_type(),
            sub_type: self.sub_type().to_string(),
            to_law,
            to_law_name,
            to_article: target.and_then(|t| t.article.as_ref()).map(ToString::to_string),
            to_article_end: target
                .and_then(|t| t.article_end.as_ref())
                .map(ToString::to_string),
            to_paragraph: target
                .and_then(|t| t.paragraph.as_ref())
                .map(ToString::to_string),
            to_item: target.and_then(|t| t.item.as_ref()).map(ToString::to_string),
            relative_direction,
            relative_count,
            effect: self.effect,
            source_text: self.text.clone(),
            confidence: self.confidence,
            resolved: self.resolved,
        }
    }
}

/// 関係表の1行（グラフの `REFERS_TO` 辺の属性にも使う）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub from_law: String,
    pub from_article: Option<String>,
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    pub sub_type: String,
    pub to_law: Option<String>,
    pub to_law_name: Option<String>,
    pub to_article: Option<String>,
    pub to_article_end: Option<String>,
    pub to_paragraph: Option<String>,
    pub to_item: Option<String>,
    pub relative_direction: Option<RelativeDirection>,
    pub relative_count: Option<u32>,
    pub effect: Option<ReferenceEffect>,
    pub source_text: String,
    pub confidence: f32,
    pub resolved: bool,
}
