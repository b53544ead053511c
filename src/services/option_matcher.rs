//! 选项匹配服务
//!
//! 把 LLM 的自由文本回答对应回页面上的某个选项。
//! 规则：去空白后，回答是选项的子串即算命中，按页面顺序取第一个。

use crate::models::OptionSet;
use crate::services::text_normalizer::normalize;

/// 匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched { index: usize, option: String },
    NoMatch,
}

/// 在 `options` 中查找包含 `proposed` 的第一个选项
///
/// 去空白后为空的回答一律视为 `NoMatch`，否则空串会命中第一个选项
pub fn resolve(proposed: &str, options: &OptionSet) -> MatchResult {
    let needle = normalize(proposed);
    if needle.is_empty() {
        return MatchResult::NoMatch;
    }

    options
        .iter()
        .enumerate()
        .find(|(_, option)| normalize(option).contains(&needle))
        .map(|(index, option)| MatchResult::Matched {
            index,
            option: option.to_string(),
        })
        .unwrap_or(MatchResult::NoMatch)
}
