//! 参照検出の全工程（走査・選択・除外・正規化・法令解決・アンカー解決・確信度）。

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::anchor::resolve_all;
use crate::catalog::PatternCatalog;
use crate::confidence::score;
use crate::config::DetectorConfig;
use crate::effect::EffectClassifier;
use crate::law_name::LawNameNormalizer;
use crate::model::{Citation, DocumentPosition, Reference, ReferenceEffect, Span};
use crate::negative::{ContextWindow, NegativeFilter};
use crate::normalize::normalize;
use crate::registry::{ExternalLawRegistry, ExternalLawResolver};
use crate::span::select_non_overlapping;

/// 検出対象の1単位（条・項・号の本文と、その位置）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    pub text: String,
    pub position: DocumentPosition,
}

impl TextUnit {
    pub fn new(text: impl Into<String>, position: DocumentPosition) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// 正規化済みで、アンカー解決を待つ参照。
struct Pending<'t> {
    span: Span,
    text: &'t str,
    effect: Option<ReferenceEffect>,
}

/// 参照検出器。構築後は読み取り専用で、複数スレッドから共有できる。
#[derive(Debug, Clone)]
pub struct ReferenceDetector {
    catalog: PatternCatalog,
    negatives: NegativeFilter,
    laws: ExternalLawResolver,
    effects: EffectClassifier,
    config: DetectorConfig,
}

impl ReferenceDetector {
    /// 既定の設定で構築する。
    pub fn new(registry: ExternalLawRegistry) -> Result<Self> {
        Self::with_config(registry, DetectorConfig::default())
    }

    /// パターン表・否定パターン表のどれか1つでも初期化に失敗すれば構築しない。
    pub fn with_config(registry: ExternalLawRegistry, config: DetectorConfig) -> Result<Self> {
        let catalog = PatternCatalog::new(LawNameNormalizer::new(registry.names())?)?;
        let negatives = match &config.negative_patterns {
            Some(specs) => NegativeFilter::from_specs(specs)?,
            None => NegativeFilter::new()?,
        };
        debug!(
            rules = catalog.rules().len(),
            negative_patterns = negatives.len(),
            laws = registry.len(),
            "参照検出器を初期化"
        );
        Ok(Self {
            catalog,
            negatives,
            laws: ExternalLawResolver::new(registry),
            effects: EffectClassifier::new()?,
            config,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ExternalLawRegistry {
        self.laws.registry()
    }

    /// テキスト中の参照を出現順に返す。どのような入力でも失敗しない。
    pub fn detect(&self, text: &str, position: &DocumentPosition) -> Vec<Reference> {
        let raw = self.catalog.scan(text);
        let candidates = raw.len();

        let mut pending = Vec::new();
        let mut citations = Vec::new();
        for m in select_non_overlapping(raw) {
            let window = ContextWindow::around(
                text,
                m.span,
                self.config.context_before_chars,
                self.config.context_after_chars,
            );
            if let Some(pattern) = self.negatives.rejection(&window) {
                debug!(pattern, text = m.text, "否定パターンにより除外");
                continue;
            }
            let Some(mut citation) = normalize(&m) else {
                trace!(rule = m.rule.name(), text = m.text, "番号を解釈できない一致を除外");
                continue;
            };
            if let Citation::External(c) = &mut citation {
                self.laws.apply(c);
            }
            let effect = if self.config.classify_effects {
                self.effects.classify(window.after())
            } else {
                None
            };
            pending.push(Pending {
                span: m.span,
                text: m.text,
                effect,
            });
            citations.push(citation);
        }

        let references: Vec<Reference> = pending
            .into_iter()
            .zip(resolve_all(position, citations))
            .map(|(p, resolution)| {
                if !resolution.resolved {
                    debug!(
                        text = p.text,
                        sub_type = resolution.citation.sub_type(),
                        "参照先を解決できない"
                    );
                }
                Reference {
                    span: p.span,
                    text: p.text.to_string(),
                    confidence: score(&resolution.citation),
                    citation: resolution.citation,
                    effect: p.effect,
                    resolved: resolution.resolved,
                }
            })
            .collect();

        debug!(
            law_id = %position.law_id,
            article = ?position.article.as_ref().map(ToString::to_string),
            candidates,
            emitted = references.len(),
            "参照検出"
        );
        references
    }

    /// 独立した複数の単位を並列に処理する。結果は入力と同じ順。
    pub fn detect_batch(&self, units: &[TextUnit]) -> Vec<Vec<Reference>> {
        units
            .par_iter()
            .map(|unit| self.detect(&unit.text, &unit.position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negative::{NegativeScope, NegativeSpec};

    fn detector() -> ReferenceDetector {
        ReferenceDetector::new(ExternalLawRegistry::builtin()).unwrap()
    }

    /// 検出器をスレッド間で共有できることを確認する。
    #[test]
    fn detector_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReferenceDetector>();
    }

    /// 空文字列や参照を含まない文字列では空になることを確認する。
    #[test]
    fn detect_handles_text_without_references() {
        let d = detector();
        let pos = DocumentPosition::new("LAW", "1");
        assert!(d.detect("", &pos).is_empty());
        assert!(d.detect("この法律は、公布の日から施行する。", &pos).is_empty());
        assert!(d.detect("第第第条条項号の各号から", &pos).is_empty());
    }

    /// 一致範囲が入力テキストの該当部分と一致することを確認する。
    #[test]
    fn spans_point_into_input() {
        let d = detector();
        let text = "前項の場合において、第三条第二項の規定を適用する。";
        let pos = DocumentPosition::new("LAW", "5").with_paragraph(2);
        let refs = d.detect(text, &pos);
        assert_eq!(refs.len(), 2);
        for r in &refs {
            assert_eq!(&text[r.span.start..r.span.end], r.text);
        }
        assert_eq!(refs[0].text, "前項");
        assert_eq!(refs[1].text, "第三条第二項");
    }

    /// 設定で否定パターン表と効果判定を切り替えられることを確認する。
    #[test]
    fn config_controls_filters_and_effects() {
        let config = DetectorConfig {
            classify_effects: false,
            negative_patterns: Some(vec![NegativeSpec {
                name: "skip_note".to_string(),
                scope: NegativeScope::Preceding,
                pattern: "備考$".to_string(),
            }]),
            ..DetectorConfig::default()
        };
        let d = ReferenceDetector::with_config(ExternalLawRegistry::builtin(), config).unwrap();
        let pos = DocumentPosition::new("LAW", "1");
        assert!(d.detect("備考第三条", &pos).is_empty());

        let refs = d.detect("第三条の規定を準用する。", &pos);
        assert_eq!(refs.len(), 1);
        assert!(refs[0].effect.is_none());
    }

    /// 空の否定パターン表では構築できないことを確認する。
    #[test]
    fn empty_negative_table_is_rejected() {
        let config = DetectorConfig {
            negative_patterns: Some(Vec::new()),
            ..DetectorConfig::default()
        };
        assert!(ReferenceDetector::with_config(ExternalLawRegistry::builtin(), config).is_err());
    }
}
