use crate::config::SessionConfig;
use crate::models::{Amount, MatchResult};
use crate::service::matcher::{MatchError, SubsetMatcher};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no target value entered; choose option 2 before searching")]
    MissingTarget,
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// 交互会话状态: 发票列表 / target / 容差, 在菜单命令之间保留
#[derive(Debug, Clone)]
pub struct Session {
    invoices: Vec<Amount>,
    target: Option<Amount>,
    tolerance: Option<Amount>,
    default_tolerance: Amount,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            invoices: Vec::new(),
            target: None,
            tolerance: None,
            default_tolerance: config.default_tolerance,
        }
    }

    pub fn set_invoices(&mut self, invoices: Vec<Amount>) {
        tracing::debug!("Session invoices replaced: {} items", invoices.len());
        self.invoices = invoices;
    }

    pub fn set_target(&mut self, target: Amount) {
        self.target = Some(target);
    }

    pub fn set_tolerance(&mut self, tolerance: Amount) {
        self.tolerance = Some(tolerance);
    }

    pub fn invoices(&self) -> &[Amount] {
        &self.invoices
    }

    pub fn target(&self) -> Option<Amount> {
        self.target
    }

    pub fn tolerance(&self) -> Option<Amount> {
        self.tolerance
    }

    /// 搜索最接近的子集
    ///
    /// 未设置容差时先写入默认值 (之后一直保留), 再检查 target.
    /// 没有 target 返回 [`SessionError::MissingTarget`], 会话不受影响.
    pub fn find_closest(&mut self, matcher: &SubsetMatcher) -> Result<MatchResult, SessionError> {
        let tolerance = *self.tolerance.get_or_insert(self.default_tolerance);
        let Some(target) = self.target else {
            tracing::warn!("Search requested before a target was entered");
            return Err(SessionError::MissingTarget);
        };

        Ok(matcher.search(&self.invoices, target, tolerance)?)
    }
}
