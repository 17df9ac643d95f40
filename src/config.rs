use crate::models::{Amount, ToleranceMode};
use crate::service::Strategy;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// 环境变量前缀, 例如 SUBSET_MATCH_SERVER__PORT=9000
pub const ENV_PREFIX: &str = "SUBSET_MATCH";

/// 未输入容差时使用的默认值
pub const DEFAULT_TOLERANCE: Amount = 90000;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub matcher: MatcherConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub strategy: Strategy,
    pub tolerance_mode: ToleranceMode,
    pub max_invoices: usize, // 超过则拒绝搜索
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub default_tolerance: Amount,
    /// 旧版行为: 未设置 target 就搜索时结束会话
    pub exit_on_missing_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::BruteForce,
            tolerance_mode: ToleranceMode::Additive,
            max_invoices: 40,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_tolerance: DEFAULT_TOLERANCE,
            exit_on_missing_target: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置 (未设置的项取默认值)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load(env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("matcher.strategy", "brute_force")?
            .set_default("matcher.tolerance_mode", "additive")?
            .set_default("matcher.max_invoices", defaults.matcher.max_invoices as i64)?
            .set_default("session.default_tolerance", defaults.session.default_tolerance)?
            .set_default("session.exit_on_missing_target", defaults.session.exit_on_missing_target)?
            .set_default("log.level", defaults.log.level)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// 日志级别, 无法识别时退回 INFO
    pub fn log_level(&self) -> tracing::Level {
        self.log.level.parse().unwrap_or(tracing::Level::INFO)
    }
}
