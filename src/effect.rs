//! 参照に続く文言から、準用・読替えなどの法的効果を判定する。

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::ReferenceEffect;

/// 効果を表す文言。最初に現れたものを採る。
const EFFECT_PATTERN: &str =
    "なお従前の例|なお効力|準用|みな[すし]|読み?替え|基づ|に(?:よ|従)(?:る|り|って)";

#[derive(Debug, Clone)]
pub struct EffectClassifier {
    matcher: Regex,
}

impl EffectClassifier {
    pub fn new() -> Result<Self> {
        let matcher = Regex::new(EFFECT_PATTERN).context("効果判定正規表現の初期化に失敗")?;
        Ok(Self { matcher })
    }

    /// 参照直後から文末までの文言を判定する。
    pub fn classify(&self, following: &str) -> Option<ReferenceEffect> {
        let found = self.matcher.find(following)?.as_str();
        let effect = if found.starts_with("なお") {
            ReferenceEffect::FollowPrior
        } else if found == "準用" {
            ReferenceEffect::MutatisMutandis
        } else if found.starts_with("みな") {
            ReferenceEffect::Deemed
        } else if found.starts_with("読") {
            ReferenceEffect::ReadAs
        } else if found == "基づ" {
            ReferenceEffect::BasedOn
        } else {
            ReferenceEffect::AccordingTo
        };
        Some(effect)
    }
}
