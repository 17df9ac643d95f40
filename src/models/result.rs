use crate::models::{Amount, Total};
use serde::{Serialize, Serializer};
use std::fmt;

/// 无匹配时的提示信息
pub const NO_MATCH_MESSAGE: &str = "No subset found within the given tolerance.";

/// 命中的子集
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsetMatch {
    pub subset: Vec<Amount>,  // 选中的金额 (按位置顺序)
    pub indices: Vec<usize>,  // 选中的位置
    pub sum: Total,
    #[serde(serialize_with = "serialize_percentage")]
    pub error_percentage: f64, // target 为 0 时为 inf / NaN
}

/// 非有限值写成字符串 ("inf" / "-inf" / "NaN"), 避免 JSON 里变成 null
fn serialize_percentage<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.collect_str(value)
    }
}

/// 匹配结果: 命中子集或无匹配
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    Found(SubsetMatch),
    NoMatch,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Found(_))
    }

    pub fn as_match(&self) -> Option<&SubsetMatch> {
        match self {
            MatchResult::Found(m) => Some(m),
            MatchResult::NoMatch => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Found(m) => write!(
                f,
                "subset: {:?}, sum: {}, error_percentage: {}",
                m.subset, m.sum, m.error_percentage
            ),
            MatchResult::NoMatch => f.write_str(NO_MATCH_MESSAGE),
        }
    }
}
