//! 漢数字と算用数字の相互変換、および条・項・号番号の正規表現。

use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};

const DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// 漢数字1文字を値へ変換する。
fn kanji_digit(c: char) -> Option<u32> {
    match c {
        '〇' | '零' => Some(0),
        '一' | '壱' => Some(1),
        '二' | '弐' => Some(2),
        '三' | '参' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

/// 半角・全角の算用数字1文字を値へ変換する。
fn arabic_digit(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => None,
    }
}

/// 千以下の位を表す単位文字。
fn small_unit(c: char) -> Option<u64> {
    match c {
        '十' | '拾' => Some(10),
        '百' => Some(100),
        '千' => Some(1000),
        _ => None,
    }
}

/// 4桁区切りの単位文字。
fn large_unit(c: char) -> Option<u64> {
    match c {
        '万' => Some(10_000),
        '億' => Some(100_000_000),
        _ => None,
    }
}

/// 数字列を整数へ変換する。数字として読める文字が1つもなければ `None`。
///
/// 単位を挟まない数字の連続（`二〇`、`12`）は位取り記法として読む。
/// 認識できない文字は読み飛ばす。
pub fn parse_numeral(s: &str) -> Option<u32> {
    let mut total: u64 = 0;
    let mut group: u64 = 0;
    let mut pending: Option<u64> = None;
    let mut seen = false;

    for c in s.chars() {
        if let Some(d) = kanji_digit(c).or_else(|| arabic_digit(c)) {
            let d = u64::from(d);
            pending = Some(pending.map_or(d, |p| p.saturating_mul(10).saturating_add(d)));
            seen = true;
        } else if let Some(unit) = small_unit(c) {
            group = group.saturating_add(pending.take().unwrap_or(1).saturating_mul(unit));
            seen = true;
        } else if let Some(unit) = large_unit(c) {
            let mut value = group.saturating_add(pending.take().unwrap_or(0));
            if value == 0 {
                value = 1;
            }
            total = total.saturating_add(value.saturating_mul(unit));
            group = 0;
            seen = true;
        }
    }
    if !seen {
        return None;
    }
    let value = total
        .saturating_add(group)
        .saturating_add(pending.unwrap_or(0));
    Some(u32::try_from(value).unwrap_or(u32::MAX))
}

/// 漢数字を整数へ変換する。解析できない場合は0を返す。
pub fn kanji_to_arabic(s: &str) -> u32 {
    parse_numeral(s).unwrap_or(0)
}

/// 整数を漢数字へ変換する。
///
/// 十・百・千の直前の「一」は常に省略し、万・億の直前の「一」は常に残す。
pub fn arabic_to_kanji(n: u32) -> String {
    if n == 0 {
        return DIGITS[0].to_string();
    }
    let mut out = String::new();
    let mut rest = n;
    for (scale, glyph) in [(100_000_000, '億'), (10_000, '万')] {
        let group = rest / scale;
        if group > 0 {
            out.push_str(&four_digit_group(group));
            out.push(glyph);
        }
        rest %= scale;
    }
    out.push_str(&four_digit_group(rest));
    out
}

/// 9999以下の値を千・百・十・一の位で表記する。
fn four_digit_group(n: u32) -> String {
    let mut out = String::new();
    for (unit, glyph) in [(1000, '千'), (100, '百'), (10, '十')] {
        let d = (n / unit) % 10;
        if d == 0 {
            continue;
        }
        if d > 1 {
            out.push(DIGITS[d as usize]);
        }
        out.push(glyph);
    }
    let ones = n % 10;
    if ones > 0 {
        out.push(DIGITS[ones as usize]);
    }
    out
}

/// 条・項・号などの番号（枝番号を含む）。
///
/// 表記はe-Gov法令XMLの `Num` 属性と同じく `90`、`90_2` の形式。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ProvisionNumber {
    base: u32,
    branches: Vec<u32>,
}

impl ProvisionNumber {
    /// 枝番号なしの番号を作る。0は番号として扱わない。
    pub fn new(base: u32) -> Option<Self> {
        (base > 0).then(|| Self {
            base,
            branches: Vec::new(),
        })
    }

    /// 第1条・第1項・第1号。
    pub fn first() -> Self {
        Self {
            base: 1,
            branches: Vec::new(),
        }
    }

    /// 枝番号を1段追加する。
    pub fn with_branch(mut self, branch: u32) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn branches(&self) -> &[u32] {
        &self.branches
    }

    /// `九十`、`90`、`第九十条の二`、`九十条の二`、`90_2` などを解釈する。
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('第');
        let mut parts = s.split(['の', '_', '-', 'ノ']).map(|part| {
            part.trim_end_matches(|c: char| {
                matches!(c, '条' | '項' | '号' | '編' | '章' | '節' | '款' | '目')
            })
        });
        let base = parse_numeral(parts.next()?)?;
        let mut number = Self::new(base)?;
        for part in parts {
            match parse_numeral(part) {
                Some(branch) if branch > 0 => number.branches.push(branch),
                _ => return None,
            }
        }
        Some(number)
    }

    /// `count` 個前の番号。1未満になる場合は `None`。
    ///
    /// `N_2` の前は `N`、`N_M`（M>2）の前は `N_(M-1)` とする。
    pub fn step_back(&self, count: u32) -> Option<Self> {
        let mut current = self.clone();
        let mut remaining = count;
        // 枝番号 M から本番号へ戻るには M−1 歩（M が2以下なら1歩）かかる。
        while remaining > 0 {
            let Some(last) = current.branches.last_mut() else {
                break;
            };
            let cost = last.saturating_sub(1).max(1);
            if remaining < cost {
                *last -= remaining;
                remaining = 0;
            } else {
                current.branches.pop();
                remaining -= cost;
            }
        }
        current.base = current.base.checked_sub(remaining).filter(|b| *b > 0)?;
        Some(current)
    }

    /// `count` 個後の番号。枝番号付きの番号の次は本番号+1とする。
    pub fn step_forward(&self, count: u32) -> Self {
        if count == 0 {
            return self.clone();
        }
        Self {
            base: self.base.saturating_add(count),
            branches: Vec::new(),
        }
    }

    /// 条文中の表記（`九十の二`）へ戻す。
    pub fn to_kanji(&self) -> String {
        let mut out = arabic_to_kanji(self.base);
        for branch in &self.branches {
            out.push('の');
            out.push_str(&arabic_to_kanji(*branch));
        }
        out
    }
}

impl fmt::Display for ProvisionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for branch in &self.branches {
            write!(f, "_{}", branch)?;
        }
        Ok(())
    }
}

impl FromStr for ProvisionNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| anyhow!("番号として解釈できません: {}", s))
    }
}

impl From<ProvisionNumber> for String {
    fn from(n: ProvisionNumber) -> Self {
        n.to_string()
    }
}

impl TryFrom<String> for ProvisionNumber {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 単位字の前の数字が乗数になることを確認する。
    #[test]
    fn kanji_to_arabic_handles_units() {
        assert_eq!(kanji_to_arabic("十"), 10);
        assert_eq!(kanji_to_arabic("二十"), 20);
        assert_eq!(kanji_to_arabic("九十三"), 93);
        assert_eq!(kanji_to_arabic("百二"), 102);
        assert_eq!(kanji_to_arabic("千九百九十九"), 1999);
        assert_eq!(kanji_to_arabic("九千九百九十九"), 9999);
        assert_eq!(kanji_to_arabic("一万二千"), 12000);
        assert_eq!(kanji_to_arabic("十二万"), 120_000);
    }

    /// 位取り記法と算用数字を受け付けることを確認する。
    #[test]
    fn kanji_to_arabic_accepts_positional_and_arabic() {
        assert_eq!(kanji_to_arabic("二〇"), 20);
        assert_eq!(kanji_to_arabic("90"), 90);
        assert_eq!(kanji_to_arabic("１２"), 12);
    }

    /// 数字を含まない入力は0になることを確認する。
    #[test]
    fn kanji_to_arabic_returns_zero_for_garbage() {
        assert_eq!(kanji_to_arabic("あいう"), 0);
        assert_eq!(kanji_to_arabic(""), 0);
        assert_eq!(parse_numeral("条"), None);
    }

    /// 十・百・千の前の「一」は省略し、万の前は残すことを確認する。
    #[test]
    fn arabic_to_kanji_elides_leading_one_before_small_units() {
        assert_eq!(arabic_to_kanji(10), "十");
        assert_eq!(arabic_to_kanji(110), "百十");
        assert_eq!(arabic_to_kanji(1000), "千");
        assert_eq!(arabic_to_kanji(1011), "千十一");
        assert_eq!(arabic_to_kanji(90), "九十");
        assert_eq!(arabic_to_kanji(10_000), "一万");
        assert_eq!(arabic_to_kanji(0), "〇");
    }

    /// 1〜9999の全値で往復変換が一致することを確認する。
    #[test]
    fn numeral_round_trip() {
        for n in 1..=9999 {
            assert_eq!(kanji_to_arabic(&arabic_to_kanji(n)), n, "n = {}", n);
        }
        for n in [10_000, 10_001, 123_456, 100_000_000, u32::MAX] {
            assert_eq!(kanji_to_arabic(&arabic_to_kanji(n)), n, "n = {}", n);
        }
    }

    /// 枝番号付きの条番号を正規形へ変換できることを確認する。
    #[test]
    fn provision_number_parses_branch_forms() {
        let n = ProvisionNumber::parse("第九十条の二").unwrap();
        assert_eq!(n.to_string(), "90_2");
        assert_eq!(ProvisionNumber::parse("九十条の二の三").unwrap().to_string(), "90_2_3");
        assert_eq!(ProvisionNumber::parse("90_2").unwrap(), n);
        assert_eq!(ProvisionNumber::parse("３号").unwrap().to_string(), "3");
        assert_eq!(n.to_kanji(), "九十の二");
        assert!(ProvisionNumber::parse("〇").is_none());
        assert!(ProvisionNumber::parse("十の").is_none());
    }

    /// 前後の番号計算が枝番号と境界を扱うことを確認する。
    #[test]
    fn provision_number_steps() {
        let ten = ProvisionNumber::new(10).unwrap();
        assert_eq!(ten.step_back(1).unwrap().to_string(), "9");
        assert_eq!(ten.step_back(3).unwrap().to_string(), "7");
        assert_eq!(ten.step_forward(2).to_string(), "12");
        assert!(ProvisionNumber::new(1).unwrap().step_back(1).is_none());

        let branch = ProvisionNumber::parse("90_3").unwrap();
        assert_eq!(branch.step_back(1).unwrap().to_string(), "90_2");
        assert_eq!(branch.step_back(2).unwrap().to_string(), "90");
        assert_eq!(branch.step_forward(1).to_string(), "91");
        assert_eq!(branch.step_back(3).unwrap().to_string(), "89");

        let nested = ProvisionNumber::new(90).unwrap().with_branch(2).with_branch(4);
        assert_eq!(nested.to_string(), "90_2_4");
        assert_eq!(nested.step_back(2).unwrap().to_string(), "90_2_2");
        assert_eq!(nested.step_back(3).unwrap().to_string(), "90_2");
        assert_eq!(nested.step_back(4).unwrap().to_string(), "90");
    }

    /// 非常に大きな個数でも一度の引き算で計算されることを確認する。
    #[test]
    fn provision_number_steps_with_huge_counts() {
        let max = ProvisionNumber::new(u32::MAX).unwrap();
        assert_eq!(max.step_back(u32::MAX - 1).unwrap().to_string(), "1");
        assert!(max.step_back(u32::MAX).is_none());
        let branch = max.with_branch(5);
        assert_eq!(branch.step_back(u32::MAX - 1).unwrap().to_string(), "5");
        assert!(ProvisionNumber::new(3).unwrap().step_back(u32::MAX).is_none());
    }

    /// 番号は文字列としてシリアライズされることを確認する。
    #[test]
    fn provision_number_serializes_as_string() {
        let n = ProvisionNumber::parse("二の三").unwrap();
        assert_eq!(serde_json::to_value(&n).unwrap(), serde_json::json!("2_3"));
        let back: ProvisionNumber = serde_json::from_str("\"2_3\"").unwrap();
        assert_eq!(back, n);
        assert!(serde_json::from_str::<ProvisionNumber>("\"abc\"").is_err());
    }

    /// 番号の順序が枝番号を考慮することを確認する。
    #[test]
    fn provision_number_ordering() {
        let a = ProvisionNumber::parse("90").unwrap();
        let b = ProvisionNumber::parse("90_2").unwrap();
        let c = ProvisionNumber::parse("91").unwrap();
        assert!(a < b && b < c);
    }
}
