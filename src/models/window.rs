use crate::models::{Amount, Total};
use serde::{Deserialize, Serialize};

/// 容差解释方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceMode {
    /// 旧版语义: 绝对加性上偏移, 窗口为 [target, target + tolerance]
    #[default]
    Additive,
    /// 对称百分比区间: target ± |target| * tolerance / 100
    Percentage,
}

/// 接受窗口 (闭区间, 整数边界)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcceptanceWindow {
    pub lower: Total,
    pub upper: Total,
}

impl AcceptanceWindow {
    /// 旧版加性窗口. tolerance 为负时区间倒置, 永远无匹配
    pub fn additive(target: Amount, tolerance: Amount) -> Self {
        let target = Total::from(target);
        Self {
            lower: target,
            upper: target + Total::from(tolerance),
        }
    }

    /// 百分比窗口, 收缩到整数边界 (子集合计只能是整数)
    pub fn percentage(target: Amount, percent: Amount) -> Self {
        let scaled = Total::from(target) * 100;
        let band = Total::from(target).abs() * Total::from(percent);
        Self {
            lower: div_ceil(scaled - band, 100),
            upper: (scaled + band).div_euclid(100),
        }
    }

    pub fn for_mode(mode: ToleranceMode, target: Amount, tolerance: Amount) -> Self {
        match mode {
            ToleranceMode::Additive => Self::additive(target, tolerance),
            ToleranceMode::Percentage => Self::percentage(target, tolerance),
        }
    }

    pub fn contains(&self, sum: Total) -> bool {
        self.lower <= sum && sum <= self.upper
    }

    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }
}

fn div_ceil(value: Total, divisor: Total) -> Total {
    -(-value).div_euclid(divisor)
}
