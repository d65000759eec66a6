//! 重なり合う一致から採用する一致を選ぶ。

use crate::catalog::RawMatch;

/// 長い一致を優先し、同じ長さなら具体的な規則、次に先に現れたものを採る。
///
/// 採用済みの一致と重なるものは捨て、残りをテキスト上の出現順に並べて返す。
pub fn select_non_overlapping(mut matches: Vec<RawMatch<'_>>) -> Vec<RawMatch<'_>> {
    matches.sort_by(|a, b| {
        b.char_len()
            .cmp(&a.char_len())
            .then_with(|| a.specificity_rank.cmp(&b.specificity_rank))
            .then_with(|| a.span.start.cmp(&b.span.start))
    });

    let mut accepted: Vec<RawMatch<'_>> = Vec::with_capacity(matches.len());
    for candidate in matches {
        if accepted.iter().all(|m| !m.span.overlaps(&candidate.span)) {
            accepted.push(candidate);
        }
    }
    accepted.sort_by_key(|m| m.span.start);
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PatternCatalog, RuleId};
    use crate::law_name::LawNameNormalizer;

    fn select(text: &str) -> Vec<(RuleId, String)> {
        let catalog = PatternCatalog::new(LawNameNormalizer::new(["民法"]).unwrap()).unwrap();
        select_non_overlapping(catalog.scan(text))
            .into_iter()
            .map(|m| (m.rule, m.text.to_string()))
            .collect()
    }

    /// 複合表現が構成要素より優先されることを確認する。
    #[test]
    fn longest_match_wins() {
        assert_eq!(
            select("第九十条第二項"),
            vec![(RuleId::ArticleWithParagraph, "第九十条第二項".to_string())]
        );
        assert_eq!(
            select("民法第九十条第二項"),
            vec![(RuleId::ExternalArticle, "民法第九十条第二項".to_string())]
        );
    }

    /// 結果が出現順で重なりを含まないことを確認する。
    #[test]
    fn selection_is_ordered_and_disjoint() {
        let catalog = PatternCatalog::new(LawNameNormalizer::new(["民法"]).unwrap()).unwrap();
        let text = "第十条及び第十一条並びに前条第二項";
        let selected = select_non_overlapping(catalog.scan(text));
        let texts: Vec<_> = selected.iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["第十条", "第十一条", "前条第二項"]);
        for pair in selected.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
        }
    }

    /// 同じ長さなら優先順位の高い規則が選ばれることを確認する。
    #[test]
    fn equal_length_prefers_specific_rule() {
        // 「同法第三条」は同法参照として採り、内部参照の「第三条」は重なるので捨てる。
        assert_eq!(
            select("同法第三条"),
            vec![(RuleId::SameLawArticle, "同法第三条".to_string())]
        );
    }
}
