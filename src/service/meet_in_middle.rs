//! 折半搜索策略
//!
//! 把位置分成低半区和高半区, 各自枚举子集 (位掩码表示, 第 i 位 = 第 i 个位置).
//! 高半区按合计排序, 每个合计只保留排序最靠前的子集; 对每个低半区子集,
//! 二分查找 target 两侧最近且落在窗口内的高半区合计.
//!
//! 选择规则与穷举完全一致: 先比误差, 再比子集大小, 最后比位置组合字典序.
//! 同样大小的两个掩码, 最低的不同位属于谁, 谁的字典序在前.

use crate::models::{AcceptanceWindow, Amount, MatchResult, Total};
use crate::service::matcher::{build_match, find_closest_in_window};
use std::cmp::Ordering;

/// 折半搜索处理的最大位置数 (每个半区最多 2^25 个子集); 更长的输入退回穷举
pub const MAX_POSITIONS: usize = 50;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    mask: u64,
    sum: Total,
    error: Total,
}

/// 枚举顺序: 先按子集大小, 再按位置组合字典序
fn enumeration_order(a: u64, b: u64) -> Ordering {
    a.count_ones().cmp(&b.count_ones()).then_with(|| {
        if a == b {
            return Ordering::Equal;
        }
        let diff = a ^ b;
        let lowest = diff & diff.wrapping_neg();
        if a & lowest != 0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    })
}

/// 半区内所有子集的 (合计, 掩码), 含空集, 掩码升序
fn half_sums(amounts: &[Amount]) -> Vec<(Total, u64)> {
    let count = 1usize << amounts.len();
    let mut sums: Vec<Total> = vec![0; count];
    for mask in 1..count {
        let bit = mask.trailing_zeros() as usize;
        sums[mask] = sums[mask & (mask - 1)] + Total::from(amounts[bit]);
    }
    sums.into_iter()
        .enumerate()
        .map(|(mask, sum)| (sum, mask as u64))
        .collect()
}

/// 高半区索引: 非空子集按合计升序, 每个合计只留枚举顺序最靠前的掩码
fn index_by_sum(amounts: &[Amount]) -> Vec<(Total, u64)> {
    let mut entries: Vec<(Total, u64)> = half_sums(amounts)
        .into_iter()
        .filter(|&(_, mask)| mask != 0)
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| enumeration_order(a.1, b.1)));
    entries.dedup_by_key(|entry| entry.0);
    entries
}

fn consider(best: &mut Option<Candidate>, target: Total, mask: u64, sum: Total) {
    let candidate = Candidate {
        mask,
        sum,
        error: (target - sum).abs(),
    };
    let better = match best {
        None => true,
        Some(current) => candidate
            .error
            .cmp(&current.error)
            .then_with(|| enumeration_order(candidate.mask, current.mask))
            == Ordering::Less,
    };
    if better {
        *best = Some(candidate);
    }
}

fn mask_indices(mask: u64, n: usize) -> Vec<usize> {
    (0..n).filter(|&i| mask >> i & 1 == 1).collect()
}

/// 折半搜索, 结果与 [`find_closest_in_window`] 逐位一致
pub fn find_closest_subset_mitm(amounts: &[Amount], target: Amount, window: AcceptanceWindow) -> MatchResult {
    let n = amounts.len();
    if n > MAX_POSITIONS {
        return find_closest_in_window(amounts, target, window);
    }
    if n == 0 || window.is_empty() {
        return MatchResult::NoMatch;
    }

    let low_len = n / 2;
    let low = half_sums(&amounts[..low_len]);
    let high = index_by_sum(&amounts[low_len..]);
    let target_total = Total::from(target);
    let mut best: Option<Candidate> = None;

    for (low_sum, low_mask) in low {
        // 高半区取空集
        if low_mask != 0 && window.contains(low_sum) {
            consider(&mut best, target_total, low_mask, low_sum);
        }

        let want = target_total - low_sum;
        let lo = window.lower - low_sum;
        let hi = window.upper - low_sum;

        // want 上方 (含) 最近的合计
        let from = want.max(lo);
        let above = high.partition_point(|&(sum, _)| sum < from);
        if let Some(&(sum, mask)) = high.get(above) {
            if sum <= hi {
                consider(&mut best, target_total, low_mask | mask << low_len, low_sum + sum);
            }
        }

        // want 下方 (含) 最近的合计
        let to = want.min(hi);
        let below = high.partition_point(|&(sum, _)| sum <= to);
        if below > 0 {
            let (sum, mask) = high[below - 1];
            if sum >= lo {
                consider(&mut best, target_total, low_mask | mask << low_len, low_sum + sum);
            }
        }
    }

    match best {
        Some(c) => build_match(amounts, target, mask_indices(c.mask, n), c.sum, c.error),
        None => MatchResult::NoMatch,
    }
}
