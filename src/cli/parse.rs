use crate::models::Amount;

/// 用户输入错误: 在进入匹配核心之前拒绝
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("invalid invoice amount {token:?}: expected an integer")]
    InvalidInvoice { token: String },
    #[error("invalid {field} {input:?}: expected an integer")]
    InvalidNumber { field: &'static str, input: String },
}

/// 解析逗号分隔的整数发票列表, 每项允许前后空白
pub fn parse_invoice_list(input: &str) -> Result<Vec<Amount>, InputError> {
    input
        .split(',')
        .map(|token| {
            token.trim().parse::<Amount>().map_err(|_| InputError::InvalidInvoice {
                token: token.trim().to_string(),
            })
        })
        .collect()
}

/// 解析单个整数 (target / 容差)
pub fn parse_amount(field: &'static str, input: &str) -> Result<Amount, InputError> {
    input.trim().parse().map_err(|_| InputError::InvalidNumber {
        field,
        input: input.trim().to_string(),
    })
}
