use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::OptionSet;

/// 随机兜底选择器
///
/// 匹配失败或 LLM 不可用时，从该题的选项中等概率随机选一个
pub struct FallbackSelector {
    rng: Mutex<StdRng>,
}

impl FallbackSelector {
    /// 使用系统熵初始化
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// 固定种子，结果可复现
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// 返回 (下标, 选项)
    pub fn pick<'a>(&self, options: &'a OptionSet) -> (usize, &'a str) {
        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen_range(0..options.len())
        };
        // OptionSet 非空，下标必然有效
        let option = options.get(index).unwrap_or_default();
        (index, option)
    }
}

impl Default for FallbackSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(items: &[&str]) -> OptionSet {
        OptionSet::new(items.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_pick_is_always_an_option() {
        let selector = FallbackSelector::new();
        let opts = options(&["甲", "乙", "丙", "丁"]);
        for _ in 0..500 {
            let (index, option) = selector.pick(&opts);
            assert!(opts.contains(option));
            assert_eq!(opts.get(index), Some(option));
        }
    }

    #[test]
    fn test_pick_covers_every_option() {
        let selector = FallbackSelector::seeded(42);
        let opts = options(&["A", "B", "C", "D"]);
        let mut hits = [0usize; 4];
        for _ in 0..2000 {
            let (index, _) = selector.pick(&opts);
            hits[index] += 1;
        }
        assert!(hits.iter().all(|&n| n > 0), "hits: {:?}", hits);
    }

    #[test]
    fn test_single_option() {
        let selector = FallbackSelector::seeded(7);
        let opts = options(&["唯一"]);
        assert_eq!(selector.pick(&opts), (0, "唯一"));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let opts = options(&["A", "B", "C", "D", "E"]);
        let a = FallbackSelector::seeded(1);
        let b = FallbackSelector::seeded(1);
        for _ in 0..50 {
            assert_eq!(a.pick(&opts), b.pick(&opts));
        }
    }
}
