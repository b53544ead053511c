/// 去掉所有空白字符（不只是首尾）
///
/// 只作为匹配时的比较键，不用于展示
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
