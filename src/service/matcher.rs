use crate::config::MatcherConfig;
use crate::models::{
    pick_amounts, subset_total, AcceptanceWindow, Amount, MatchResult, SubsetMatch, ToleranceMode, Total,
};
use crate::service::meet_in_middle::find_closest_subset_mitm;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// 搜索策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 穷举所有子集 (默认, 正确性基线)
    #[default]
    BruteForce,
    /// 折半搜索, O(2^(n/2)), 需显式开启
    MeetInTheMiddle,
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("too many invoices: {count} (max {max})")]
    TooManyInvoices { count: usize, max: usize },
}

/// 旧版入口: 加性窗口 [target, target + tolerance] 内找最接近 target 的子集
pub fn find_closest_subset(amounts: &[Amount], target: Amount, tolerance: Amount) -> MatchResult {
    find_closest_in_window(amounts, target, AcceptanceWindow::additive(target, tolerance))
}

/// 穷举搜索
///
/// 按子集大小 r = 1..=n 递增, 同一大小内按位置组合的字典序枚举;
/// 只在误差严格更小时替换, 所以并列时先枚举到的胜出.
/// 误差为 0 时不可能再改进, 提前结束.
pub fn find_closest_in_window(amounts: &[Amount], target: Amount, window: AcceptanceWindow) -> MatchResult {
    let target_total = Total::from(target);
    let mut best: Option<(Vec<usize>, Total, Total)> = None;

    'search: for r in 1..=amounts.len() {
        for indices in Combinations::new(amounts.len(), r) {
            let sum = subset_total(amounts, &indices);
            if !window.contains(sum) {
                continue;
            }

            let error = (target_total - sum).abs();
            let improves = match &best {
                None => true,
                Some((_, _, best_error)) => error < *best_error,
            };
            if improves {
                best = Some((indices, sum, error));
                if error == 0 {
                    break 'search;
                }
            }
        }
    }

    match best {
        Some((indices, sum, error)) => build_match(amounts, target, indices, sum, error),
        None => MatchResult::NoMatch,
    }
}

/// 组装命中结果; target 为 0 时按 IEEE 规则得到 inf / NaN
pub(crate) fn build_match(
    amounts: &[Amount],
    target: Amount,
    indices: Vec<usize>,
    sum: Total,
    error: Total,
) -> MatchResult {
    MatchResult::Found(SubsetMatch {
        subset: pick_amounts(amounts, &indices),
        error_percentage: (error as f64 / target as f64) * 100.0,
        indices,
        sum,
    })
}

/// 位置组合迭代器: 0..n 中取 r 个, 字典序升序
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    first: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, r: usize) -> Self {
        Self {
            n,
            indices: (0..r).collect(),
            first: true,
            done: r > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.first {
            self.first = false;
            return Some(self.indices.clone());
        }

        let r = self.indices.len();
        // 找最右侧还能右移的位置
        let Some(i) = (0..r).rev().find(|&i| self.indices[i] != i + self.n - r) else {
            self.done = true;
            return None;
        };
        self.indices[i] += 1;
        for j in i + 1..r {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

/// 匹配服务: 按配置选择窗口语义和搜索策略
#[derive(Debug, Clone)]
pub struct SubsetMatcher {
    config: MatcherConfig,
}

impl SubsetMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// 按服务配置搜索
    pub fn search(&self, invoices: &[Amount], target: Amount, tolerance: Amount) -> Result<MatchResult, MatchError> {
        self.search_with(invoices, target, tolerance, self.config.strategy, self.config.tolerance_mode)
    }

    /// 指定策略和容差语义搜索 (发票数量上限仍取服务配置)
    pub fn search_with(
        &self,
        invoices: &[Amount],
        target: Amount,
        tolerance: Amount,
        strategy: Strategy,
        mode: ToleranceMode,
    ) -> Result<MatchResult, MatchError> {
        if invoices.len() > self.config.max_invoices {
            tracing::warn!(
                "Rejecting search over {} invoices (max {})",
                invoices.len(), self.config.max_invoices
            );
            return Err(MatchError::TooManyInvoices {
                count: invoices.len(),
                max: self.config.max_invoices,
            });
        }

        let window = AcceptanceWindow::for_mode(mode, target, tolerance);
        tracing::debug!(
            "搜索子集: {} 张发票, target {}, 窗口 [{}, {}], 策略 {:?}",
            invoices.len(), target, window.lower, window.upper, strategy
        );

        let started = Instant::now();
        let result = match strategy {
            Strategy::BruteForce => find_closest_in_window(invoices, target, window),
            Strategy::MeetInTheMiddle => find_closest_subset_mitm(invoices, target, window),
        };

        match &result {
            MatchResult::Found(m) => tracing::info!(
                "匹配完成: 子集 {} 项, 合计 {}, 误差 {}%, 耗时 {:?}",
                m.subset.len(), m.sum, m.error_percentage, started.elapsed()
            ),
            MatchResult::NoMatch => tracing::info!(
                "匹配完成: 窗口内无子集, 耗时 {:?}",
                started.elapsed()
            ),
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(result: &MatchResult) -> &SubsetMatch {
        result.as_match().expect("expected a match")
    }

    #[test]
    fn combinations_follow_lexicographic_order() {
        let combos: Vec<_> = Combinations::new(4, 2).collect();
        assert_eq!(
            combos,
            vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
        );
        assert_eq!(Combinations::new(3, 3).count(), 1);
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }

    #[test]
    fn tie_prefers_first_single_element() {
        let result = find_closest_subset(&[10, 10, 5, 5], 10, 0);
        let m = found(&result);
        assert_eq!(m.subset, vec![10]);
        assert_eq!(m.indices, vec![0]);
        assert_eq!(m.error_percentage, 0.0);
    }

    #[test]
    fn empty_input_has_no_match() {
        assert_eq!(find_closest_subset(&[], 10, 100), MatchResult::NoMatch);
        assert_eq!(find_closest_subset(&[], 0, 0), MatchResult::NoMatch);
    }

    #[test]
    fn window_out_of_reach_has_no_match() {
        assert_eq!(find_closest_subset(&[1, 2, 3], 100, 0), MatchResult::NoMatch);
    }

    #[test]
    fn exact_match_picks_smallest_then_lexicographic() {
        let result = find_closest_subset(&[5, 3, 7, 2], 10, 0);
        let m = found(&result);
        assert_eq!(m.subset, vec![3, 7]);
        assert_eq!(m.indices, vec![1, 2]);
        assert_eq!(m.sum, 10);
        assert_eq!(m.error_percentage, 0.0);
    }

    #[test]
    fn sums_below_target_never_qualify() {
        // 9 离 target 更近, 但低于窗口下界
        let result = find_closest_subset(&[4, 5, 12], 10, 5);
        let m = found(&result);
        assert_eq!(m.subset, vec![12]);
        assert_eq!(m.sum, 12);
        assert!((m.error_percentage - 20.0).abs() < 1e-9);
    }

    #[test]
    fn closest_over_target_wins_across_sizes() {
        let result = find_closest_subset(&[15, 6, 6], 11, 10);
        let m = found(&result);
        assert_eq!(m.subset, vec![6, 6]);
        assert_eq!(m.sum, 12);
    }

    #[test]
    fn zero_target_yields_infinite_percentage() {
        let result = find_closest_subset(&[1, 2], 0, 5);
        let m = found(&result);
        assert_eq!(m.subset, vec![1]);
        assert_eq!(m.sum, 1);
        assert!(m.error_percentage.is_infinite());
        assert!(m.error_percentage.is_sign_positive());
    }

    #[test]
    fn zero_target_with_zero_error_is_nan() {
        let result = find_closest_subset(&[0, 2], 0, 5);
        let m = found(&result);
        assert_eq!(m.subset, vec![0]);
        assert!(m.error_percentage.is_nan());
    }

    #[test]
    fn negative_tolerance_never_matches() {
        assert_eq!(find_closest_subset(&[10, 20], 10, -1), MatchResult::NoMatch);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let amounts = [120, 75, 33, 48, 90, 61];
        let a = find_closest_subset(&amounts, 200, 30);
        let b = find_closest_subset(&amounts, 200, 30);
        assert_eq!(a, b);
        let (a, b) = (found(&a), found(&b));
        assert_eq!(a.error_percentage.to_bits(), b.error_percentage.to_bits());
    }

    #[test]
    fn service_rejects_oversized_input() {
        let matcher = SubsetMatcher::new(MatcherConfig {
            max_invoices: 3,
            ..MatcherConfig::default()
        });
        let err = matcher.search(&[1, 2, 3, 4], 3, 0).unwrap_err();
        assert!(matches!(err, MatchError::TooManyInvoices { count: 4, max: 3 }));
    }

    #[test]
    fn service_strategies_agree() {
        let matcher = SubsetMatcher::new(MatcherConfig::default());
        let amounts = [5, 3, 7, 2, 9, 1];
        for mode in [ToleranceMode::Additive, ToleranceMode::Percentage] {
            let brute = matcher
                .search_with(&amounts, 13, 10, Strategy::BruteForce, mode)
                .unwrap();
            let mitm = matcher
                .search_with(&amounts, 13, 10, Strategy::MeetInTheMiddle, mode)
                .unwrap();
            assert_eq!(brute, mitm);
        }
    }

    #[test]
    fn percentage_mode_accepts_sums_below_target() {
        let matcher = SubsetMatcher::new(MatcherConfig {
            tolerance_mode: ToleranceMode::Percentage,
            ..MatcherConfig::default()
        });
        let result = matcher.search(&[4, 5, 12], 10, 10).unwrap();
        let m = found(&result);
        assert_eq!(m.subset, vec![4, 5]);
        assert!((m.error_percentage - 10.0).abs() < 1e-9);
    }
}
