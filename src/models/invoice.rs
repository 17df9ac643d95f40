/// 发票金额 (整数, 由输入层保证)
pub type Amount = i64;

/// 子集合计 / 误差 (加宽整数, 任意 i64 子集求和都不会溢出)
pub type Total = i128;

/// 计算一组位置对应的金额合计 (每次从头计算, 不复用部分和)
pub fn subset_total(amounts: &[Amount], indices: &[usize]) -> Total {
    indices.iter().map(|&i| Total::from(amounts[i])).sum()
}

/// 按位置取出金额
pub fn pick_amounts(amounts: &[Amount], indices: &[usize]) -> Vec<Amount> {
    indices.iter().map(|&i| amounts[i]).collect()
}
