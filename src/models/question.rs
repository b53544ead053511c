use std::fmt;

/// 一道题目
///
/// 提取后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 题号（从1开始）
    pub ordinal: usize,
    /// 题干
    pub text: String,
}

impl Question {
    pub fn new(ordinal: usize, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
        }
    }
}

/// 一道题的全部选项
///
/// 保持页面上的顺序，且至少包含一个选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet(Vec<String>);

impl OptionSet {
    /// 选项为空时返回 `None`
    pub fn new(options: Vec<String>) -> Option<Self> {
        if options.is_empty() {
            None
        } else {
            Some(Self(options))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, option: &str) -> bool {
        self.0.iter().any(|o| o == option)
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" | "))
    }
}

/// 从页面提取出的一道题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuestion {
    pub question: Question,
    pub options: OptionSet,
}
