//! 参照の種別ごとの確信度。

use crate::model::{
    Citation, ComplexSubType, ExternalSubType, InternalSubType, RelativeSubType,
    StructuralSubType,
};

/// 種別と細分類だけで決まる確信度（0.0〜1.0）。
pub fn score(citation: &Citation) -> f32 {
    match citation {
        Citation::External(c) => match c.sub_type {
            ExternalSubType::Article
            | ExternalSubType::WithParagraph
            | ExternalSubType::WithItem
            | ExternalSubType::Range => 0.95,
            ExternalSubType::SameLaw => 0.9,
        },
        Citation::Internal(c) => match c.sub_type {
            InternalSubType::Article
            | InternalSubType::BranchArticle
            | InternalSubType::WithParagraph
            | InternalSubType::WithItem => 0.9,
            InternalSubType::Paragraph => 0.85,
            InternalSubType::Item => 0.8,
        },
        Citation::Complex(c) => match c.sub_type {
            ComplexSubType::Range => 0.9,
            ComplexSubType::ParagraphRange | ComplexSubType::ItemRange => 0.85,
        },
        Citation::Relative(c) => match c.sub_type {
            RelativeSubType::Keyword => 0.85,
            RelativeSubType::WithParagraph | RelativeSubType::WithItem => 0.88,
            RelativeSubType::Multiple | RelativeSubType::ItemList => 0.85,
        },
        Citation::Structural(c) => match c.sub_type {
            StructuralSubType::Absolute | StructuralSubType::Relative => 0.85,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExternalCitation, InternalCitation, ProvisionTarget};

    /// 他法令参照が最も高く、号だけの参照が最も低いことを確認する。
    #[test]
    fn score_depends_only_on_type() {
        let external = Citation::External(ExternalCitation {
            sub_type: ExternalSubType::Article,
            law_name: Some("民法".to_string()),
            law_num: None,
            law_id: None,
            target: ProvisionTarget::default(),
        });
        let item = Citation::Internal(InternalCitation {
            sub_type: InternalSubType::Item,
            target: ProvisionTarget::default(),
        });
        assert_eq!(score(&external), 0.95);
        assert_eq!(score(&item), 0.8);
        assert!(score(&external) > score(&item));
    }
}
