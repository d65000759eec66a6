//! 直前に明示された条項を手掛かりに、相対参照（同条・前項・前二条など）を解決する。
//!
//! 解決は左から右へ1件ずつ行い、解決できた参照の参照先でアンカーを更新する。
//! 解決できなかった参照はアンカーを変えない。

use crate::model::{
    Citation, ComplexCitation, DocumentPosition, ExternalCitation, ExternalSubType,
    InternalCitation, ProvisionTarget, RelativeCitation, RelativeDirection,
    RelativeSubType, RelativeUnit, StructuralCitation, StructuralSubType, StructurePath,
    StructureType,
};
use crate::numeral::ProvisionNumber;

/// 他法令の識別情報。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LawAnchor {
    pub name: Option<String>,
    pub law_id: Option<String>,
}

/// 解決の基準となる直近の参照先。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub article: Option<ProvisionNumber>,
    pub paragraph: Option<ProvisionNumber>,
    pub item: Option<ProvisionNumber>,
    pub structure: StructurePath,
    /// アンカーの条が他法令のものならその法令。
    pub law: Option<LawAnchor>,
    /// 最後に言及された他法令（同法の解決に使う）。
    pub last_external: Option<LawAnchor>,
}

/// 1件分の解決結果。
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub citation: Citation,
    pub resolved: bool,
}

impl Resolution {
    fn new(citation: Citation, resolved: bool) -> Self {
        Self { citation, resolved }
    }
}

/// 出現順の引用を順に解決する。
pub fn resolve_all(position: &DocumentPosition, citations: Vec<Citation>) -> Vec<Resolution> {
    let mut anchor = Anchor::seeded(position);
    let mut out = Vec::with_capacity(citations.len());
    for citation in citations {
        let (resolution, next) = anchor.resolve(position, citation);
        if let Some(next) = next {
            anchor = next;
        }
        out.push(resolution);
    }
    out
}

impl Anchor {
    /// 記載箇所の位置を初期値とする。
    pub fn seeded(position: &DocumentPosition) -> Self {
        Self {
            article: position.article.clone(),
            paragraph: position.paragraph.clone(),
            item: position.item.clone(),
            structure: position.structure.clone(),
            law: None,
            last_external: None,
        }
    }

    /// 1件を解決し、更新後のアンカーを返す。アンカーを変えない場合は `None`。
    pub fn resolve(
        &self,
        position: &DocumentPosition,
        citation: Citation,
    ) -> (Resolution, Option<Anchor>) {
        match citation {
            Citation::Internal(c) => self.resolve_internal(c),
            Citation::Complex(c) => self.resolve_complex(c),
            Citation::External(c) => self.resolve_external(c),
            Citation::Relative(c) => match c.sub_type {
                RelativeSubType::ItemList => (resolve_item_list(position, c), None),
                RelativeSubType::Multiple => (self.resolve_multiple(c), None),
                RelativeSubType::Keyword
                | RelativeSubType::WithParagraph
                | RelativeSubType::WithItem => self.resolve_relative(c),
            },
            Citation::Structural(c) => self.resolve_structural(position, c),
        }
    }

    fn resolve_internal(&self, mut c: InternalCitation) -> (Resolution, Option<Anchor>) {
        if c.target.article.is_some() {
            let next = self.pointing_at(&c.target, None);
            return (Resolution::new(Citation::Internal(c), true), Some(next));
        }
        // 項・号だけの参照はアンカーの条（号なら項も）に属する。
        let Some(article) = self.article.clone() else {
            return (Resolution::new(Citation::Internal(c), false), None);
        };
        c.target.article = Some(article);
        if c.target.paragraph.is_none() && (c.target.item.is_some() || c.target.all_items) {
            c.target.paragraph = self.paragraph.clone();
        }
        match &self.law {
            // 「民法第九十条第一項及び第二項」の第二項は民法のもの。
            Some(law) => {
                let sub_type = if c.target.item.is_some() {
                    ExternalSubType::WithItem
                } else {
                    ExternalSubType::WithParagraph
                };
                let next = self.pointing_at(&c.target, Some(law.clone()));
                let resolved = law.law_id.is_some();
                let citation = Citation::External(ExternalCitation {
                    sub_type,
                    law_name: law.name.clone(),
                    law_num: None,
                    law_id: law.law_id.clone(),
                    target: c.target,
                });
                (Resolution::new(citation, resolved), Some(next))
            }
            None => {
                let next = self.pointing_at(&c.target, None);
                (Resolution::new(Citation::Internal(c), true), Some(next))
            }
        }
    }

    fn resolve_complex(&self, mut c: ComplexCitation) -> (Resolution, Option<Anchor>) {
        if c.target.article.is_none() {
            let Some(article) = self.article.clone() else {
                return (Resolution::new(Citation::Complex(c), false), None);
            };
            c.target.article = Some(article);
            if c.target.paragraph.is_none() && c.target.item.is_some() {
                c.target.paragraph = self.paragraph.clone();
            }
        }
        // 範囲参照の後はアンカーを範囲の先頭へ置く。
        let next = self.pointing_at(&c.target, None);
        (Resolution::new(Citation::Complex(c), true), Some(next))
    }

    fn resolve_external(&self, mut c: ExternalCitation) -> (Resolution, Option<Anchor>) {
        let law = if c.sub_type == ExternalSubType::SameLaw {
            let Some(law) = self.last_external.clone() else {
                return (Resolution::new(Citation::External(c), false), None);
            };
            c.law_name = law.name.clone();
            c.law_id = law.law_id.clone();
            law
        } else {
            LawAnchor {
                name: c.law_name.clone(),
                law_id: c.law_id.clone(),
            }
        };
        // 法令IDが未登録でも条番号は明示されているのでアンカーは動かす。
        let mut next = self.pointing_at(&c.target, Some(law.clone()));
        next.last_external = Some(law);
        let resolved = c.law_id.is_some();
        (Resolution::new(Citation::External(c), resolved), Some(next))
    }

    fn resolve_relative(&self, mut c: RelativeCitation) -> (Resolution, Option<Anchor>) {
        let Some(target) = self.relative_target(&c) else {
            return (Resolution::new(Citation::Relative(c), false), None);
        };
        let next = self.merged_with(&target);
        c.target = target;
        if let Some(law) = &self.law {
            c.law_name = law.name.clone();
            c.law_id = law.law_id.clone();
        }
        let resolved = self.law.as_ref().is_none_or(|law| law.law_id.is_some());
        (Resolution::new(Citation::Relative(c), resolved), Some(next))
    }

    /// 前・次・同の参照先。境界を越える場合は `None`。
    fn relative_target(&self, c: &RelativeCitation) -> Option<ProvisionTarget> {
        let mut target = c.target.clone();
        match c.unit {
            RelativeUnit::Article => {
                target.article = Some(shift(self.article.as_ref()?, c.direction, c.count)?);
            }
            RelativeUnit::Paragraph => {
                target.article = self.article.clone();
                let paragraph = match c.direction {
                    RelativeDirection::Same | RelativeDirection::This => self.paragraph.clone()?,
                    RelativeDirection::Previous | RelativeDirection::Next => {
                        shift(&self.paragraph_or_first(), c.direction, c.count)?
                    }
                };
                target.paragraph = Some(paragraph);
            }
            RelativeUnit::Item => {
                target.article = self.article.clone();
                target.paragraph = self.paragraph.clone();
                target.item = Some(shift(self.item.as_ref()?, c.direction, c.count)?);
            }
        }
        Some(target)
    }

    /// 前N条・前N項・前N号は `[アンカー − N + 1, アンカー]` の範囲。
    fn resolve_multiple(&self, mut c: RelativeCitation) -> Resolution {
        let span = |end: &ProvisionNumber| -> Option<(ProvisionNumber, Option<ProvisionNumber>)> {
            let start = end.step_back(c.count.saturating_sub(1))?;
            let end = (start != *end).then(|| end.clone());
            Some((start, end))
        };
        let mut target = c.target.clone();
        let computed = match c.unit {
            RelativeUnit::Article => self.article.as_ref().and_then(span).map(|(start, end)| {
                target.article = Some(start);
                target.article_end = end;
            }),
            RelativeUnit::Paragraph => span(&self.paragraph_or_first()).map(|(start, end)| {
                target.article = self.article.clone();
                target.paragraph = Some(start);
                target.paragraph_end = end;
            }),
            RelativeUnit::Item => self.item.as_ref().and_then(span).map(|(start, end)| {
                target.article = self.article.clone();
                target.paragraph = self.paragraph.clone();
                target.item = Some(start);
                target.item_end = end;
            }),
        };
        if computed.is_none() {
            return Resolution::new(Citation::Relative(c), false);
        }
        c.target = target;
        if let Some(law) = &self.law {
            c.law_name = law.name.clone();
            c.law_id = law.law_id.clone();
        }
        let resolved = self.law.as_ref().is_none_or(|law| law.law_id.is_some());
        Resolution::new(Citation::Relative(c), resolved)
    }

    fn resolve_structural(
        &self,
        position: &DocumentPosition,
        mut c: StructuralCitation,
    ) -> (Resolution, Option<Anchor>) {
        let Some(path) = self.structural_target(position, &c) else {
            return (Resolution::new(Citation::Structural(c), false), None);
        };
        // 「この章」「同章」は現在の階層を指すだけなのでアンカーは動かさない。
        let moves = !matches!(
            c.direction,
            Some(RelativeDirection::This | RelativeDirection::Same)
        );
        let next = moves.then(|| Anchor {
            structure: path.clone(),
            ..self.clone()
        });
        c.target = path;
        (Resolution::new(Citation::Structural(c), true), next)
    }

    fn structural_target(
        &self,
        position: &DocumentPosition,
        c: &StructuralCitation,
    ) -> Option<StructurePath> {
        let level = c.structure_type;
        match (c.sub_type, c.direction) {
            (StructuralSubType::Absolute, _) => Some(with_outer_levels(&self.structure, &c.target)),
            (StructuralSubType::Relative, Some(RelativeDirection::This)) => {
                position.structure.get(level)?;
                Some(position.structure.truncated(level))
            }
            (StructuralSubType::Relative, Some(direction)) => {
                let current = self.structure.get(level)?;
                let mut path = self.structure.truncated(level);
                path.set(level, shift(current, direction, 1)?);
                Some(path)
            }
            (StructuralSubType::Relative, None) => None,
        }
    }

    /// 明示された参照先を指すアンカー。
    fn pointing_at(&self, target: &ProvisionTarget, law: Option<LawAnchor>) -> Anchor {
        Anchor {
            article: target.article.clone(),
            paragraph: target.paragraph.clone(),
            item: target.item.clone(),
            structure: self.structure.clone(),
            law,
            last_external: self.last_external.clone(),
        }
    }

    /// 相対参照の参照先で上書きしたアンカー。条が変わらなければ下位の番号を引き継ぐ。
    fn merged_with(&self, target: &ProvisionTarget) -> Anchor {
        let article = target.article.clone().or_else(|| self.article.clone());
        let same_article = article == self.article;
        let paragraph = target
            .paragraph
            .clone()
            .or_else(|| same_article.then(|| self.paragraph.clone()).flatten());
        let same_paragraph = same_article && paragraph == self.paragraph;
        let item = target
            .item
            .clone()
            .or_else(|| same_paragraph.then(|| self.item.clone()).flatten());
        Anchor {
            article,
            paragraph,
            item,
            ..self.clone()
        }
    }

    /// 項番号のない位置は第1項として数える。
    fn paragraph_or_first(&self) -> ProvisionNumber {
        self.paragraph.clone().unwrap_or_else(ProvisionNumber::first)
    }
}

/// 「次の各号」「前各号」「前各項」は記載箇所自身の位置から求める。
fn resolve_item_list(position: &DocumentPosition, mut c: RelativeCitation) -> Resolution {
    let mut target = c.target.clone();
    let resolved = match (c.direction, c.unit) {
        (RelativeDirection::Next, RelativeUnit::Item) => {
            target.article = position.article.clone();
            target.paragraph = position.paragraph.clone();
            target.all_items = true;
            true
        }
        (RelativeDirection::Previous, RelativeUnit::Item) => {
            target.article = position.article.clone();
            target.paragraph = position.paragraph.clone();
            match &position.item {
                // 号の中の「前各号」はそれより前の号全部。
                Some(item) => match item.step_back(1) {
                    Some(end) => {
                        let (start, end) = range_from_first(end);
                        target.item = Some(start);
                        target.item_end = end;
                        target.all_items = false;
                        true
                    }
                    None => false,
                },
                // 柱書の「前各号」は同じ項の号全部。
                None => {
                    target.all_items = true;
                    true
                }
            }
        }
        (RelativeDirection::Previous, RelativeUnit::Paragraph) => {
            match position.paragraph.as_ref().and_then(|p| p.step_back(1)) {
                Some(end) => {
                    let (start, end) = range_from_first(end);
                    target.article = position.article.clone();
                    target.paragraph = Some(start);
                    target.paragraph_end = end;
                    true
                }
                None => false,
            }
        }
        _ => false,
    };
    if resolved {
        c.target = target;
    }
    Resolution::new(Citation::Relative(c), resolved)
}

/// `[1, end]` の範囲。`end` が1なら終端なし。
fn range_from_first(end: ProvisionNumber) -> (ProvisionNumber, Option<ProvisionNumber>) {
    let start = ProvisionNumber::first();
    let end = (end != start).then_some(end);
    (start, end)
}

fn shift(
    number: &ProvisionNumber,
    direction: RelativeDirection,
    count: u32,
) -> Option<ProvisionNumber> {
    match direction {
        RelativeDirection::Previous => number.step_back(count),
        RelativeDirection::Next => Some(number.step_forward(count)),
        RelativeDirection::Same | RelativeDirection::This => Some(number.clone()),
    }
}

/// 「第三節」のように内側の階層だけを示す参照は、外側の階層をアンカーから補う。
fn with_outer_levels(anchor: &StructurePath, cited: &StructurePath) -> StructurePath {
    let outermost = StructureType::ALL
        .iter()
        .position(|level| cited.get(*level).is_some());
    match outermost {
        Some(idx) if idx > 0 => anchor.truncated(StructureType::ALL[idx - 1]).merged(cited),
        _ => cited.clone(),
    }
}
