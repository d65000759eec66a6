//! 未加工の一致を型付きの引用へ変換する。

use crate::catalog::{RawMatch, RuleId};
use crate::model::{
    Citation, ClausePart, ComplexCitation, ComplexSubType, ExternalCitation, ExternalSubType,
    InternalCitation, InternalSubType, ProvisionTarget, RelativeCitation, RelativeDirection,
    RelativeSubType, RelativeUnit, StructuralCitation, StructuralSubType, StructurePath,
    StructureType,
};
use crate::numeral::{ProvisionNumber, parse_numeral};

/// 番号を表す捕捉グループ（`ProvisionTarget` の各欄に対応）。
const NUMBER_GROUPS: [&str; 6] = ["art", "art_end", "para", "para_end", "item", "item_end"];

/// 一致を引用へ変換する。番号が0になるなど解釈できないものは `None`。
///
/// 相対参照は向き・単位・個数だけを持ち、条番号などは解決時に埋める。
pub fn normalize(m: &RawMatch<'_>) -> Option<Citation> {
    let target = numbered_target(m)?;
    let citation = match m.rule {
        RuleId::ExternalArticle | RuleId::SameLawArticle => {
            let sub_type = if m.rule == RuleId::SameLawArticle {
                ExternalSubType::SameLaw
            } else if target.article_end.is_some() {
                ExternalSubType::Range
            } else if target.item.is_some() {
                ExternalSubType::WithItem
            } else if target.paragraph.is_some() {
                ExternalSubType::WithParagraph
            } else {
                ExternalSubType::Article
            };
            Citation::External(ExternalCitation {
                sub_type,
                law_name: m.group("law").map(str::to_string),
                law_num: m.group("law_num").map(str::to_string),
                law_id: None,
                target,
            })
        }
        RuleId::ArticleWithItem | RuleId::ParagraphWithItem => {
            if target.item_end.is_some() {
                complex(ComplexSubType::ItemRange, target)
            } else {
                internal(InternalSubType::WithItem, target)
            }
        }
        RuleId::ArticleWithParagraph => {
            if target.paragraph_end.is_some() {
                complex(ComplexSubType::ParagraphRange, target)
            } else {
                internal(InternalSubType::WithParagraph, target)
            }
        }
        RuleId::ArticleRange => complex(ComplexSubType::Range, target),
        RuleId::ParagraphRange => complex(ComplexSubType::ParagraphRange, target),
        RuleId::ItemRange => complex(ComplexSubType::ItemRange, target),
        RuleId::BranchArticle => internal(InternalSubType::BranchArticle, target),
        RuleId::Article => internal(InternalSubType::Article, target),
        RuleId::Paragraph => internal(InternalSubType::Paragraph, target),
        RuleId::Item => internal(InternalSubType::Item, target),
        RuleId::RelativeWithItem => relative(m, RelativeSubType::WithItem, target)?,
        RuleId::RelativeWithParagraph => {
            let direction = direction(m.group("dir")?)?;
            Citation::Relative(RelativeCitation {
                sub_type: RelativeSubType::WithParagraph,
                direction,
                unit: RelativeUnit::Article,
                count: default_count(direction),
                law_name: None,
                law_id: None,
                target,
            })
        }
        RuleId::RelativeKeyword => relative(m, RelativeSubType::Keyword, target)?,
        RuleId::MultiplePreceding => {
            let count = parse_numeral(m.group("count")?).filter(|n| *n > 0)?;
            Citation::Relative(RelativeCitation {
                sub_type: RelativeSubType::Multiple,
                direction: RelativeDirection::Previous,
                unit: unit(m.group("unit")?)?,
                count,
                law_name: None,
                law_id: None,
                target,
            })
        }
        RuleId::ItemList => {
            let direction = match m.group("dir")? {
                "次の" => RelativeDirection::Next,
                _ => RelativeDirection::Previous,
            };
            let unit = unit(m.group("unit")?)?;
            // 「次の各項」は参照先を特定できないので扱わない。
            if direction == RelativeDirection::Next && unit == RelativeUnit::Paragraph {
                return None;
            }
            Citation::Relative(RelativeCitation {
                sub_type: RelativeSubType::ItemList,
                direction,
                unit,
                count: 0,
                law_name: None,
                law_id: None,
                target: ProvisionTarget {
                    all_items: unit == RelativeUnit::Item,
                    ..target
                },
            })
        }
        RuleId::StructuralAbsolute => structural_absolute(m.group("levels")?)?,
        RuleId::StructuralRelative => {
            let level = m.group("level")?.chars().next()?;
            Citation::Structural(StructuralCitation {
                sub_type: StructuralSubType::Relative,
                structure_type: StructureType::from_glyph(level)?,
                direction: Some(direction(m.group("dir")?)?),
                target: StructurePath::default(),
            })
        }
    };
    Some(citation)
}

/// 捕捉した番号を参照先へ変換する。捕捉されたのに番号として読めないものがあれば `None`。
fn numbered_target(m: &RawMatch<'_>) -> Option<ProvisionTarget> {
    let mut numbers: [Option<ProvisionNumber>; 6] = Default::default();
    for (slot, name) in numbers.iter_mut().zip(NUMBER_GROUPS) {
        if let Some(raw) = m.group(name) {
            *slot = Some(ProvisionNumber::parse(raw)?);
        }
    }
    let [article, article_end, paragraph, paragraph_end, item, item_end] = numbers;
    Some(ProvisionTarget {
        article,
        article_end,
        paragraph,
        paragraph_end,
        item,
        item_end,
        all_items: m.group("all_items").is_some(),
        clause: m.group("clause").and_then(ClausePart::from_marker),
    })
}

fn internal(sub_type: InternalSubType, target: ProvisionTarget) -> Citation {
    Citation::Internal(InternalCitation { sub_type, target })
}

fn complex(sub_type: ComplexSubType, target: ProvisionTarget) -> Citation {
    Citation::Complex(ComplexCitation { sub_type, target })
}

fn relative(m: &RawMatch<'_>, sub_type: RelativeSubType, target: ProvisionTarget) -> Option<Citation> {
    let direction = direction(m.group("dir")?)?;
    Some(Citation::Relative(RelativeCitation {
        sub_type,
        direction,
        unit: unit(m.group("unit")?)?,
        count: default_count(direction),
        law_name: None,
        law_id: None,
        target,
    }))
}

fn direction(s: &str) -> Option<RelativeDirection> {
    match s {
        "前" => Some(RelativeDirection::Previous),
        "次" | "次の" => Some(RelativeDirection::Next),
        "同" => Some(RelativeDirection::Same),
        "この" | "本" => Some(RelativeDirection::This),
        _ => None,
    }
}

fn unit(s: &str) -> Option<RelativeUnit> {
    match s {
        "条" => Some(RelativeUnit::Article),
        "項" => Some(RelativeUnit::Paragraph),
        "号" => Some(RelativeUnit::Item),
        _ => None,
    }
}

/// 前・次は1つ分、同は移動なし。
fn default_count(direction: RelativeDirection) -> u32 {
    match direction {
        RelativeDirection::Previous | RelativeDirection::Next => 1,
        RelativeDirection::Same | RelativeDirection::This => 0,
    }
}

/// 「第二章第三節」を階層ごとの番号へ分解する。
fn structural_absolute(levels: &str) -> Option<Citation> {
    let mut path = StructurePath::default();
    let mut deepest = None;
    for part in levels.split('第').filter(|p| !p.is_empty()) {
        let level = part.chars().find_map(StructureType::from_glyph)?;
        path.set(level, ProvisionNumber::parse(part)?);
        deepest = Some(level);
    }
    Some(Citation::Structural(StructuralCitation {
        sub_type: StructuralSubType::Absolute,
        structure_type: deepest?,
        direction: None,
        target: path,
    }))
}
