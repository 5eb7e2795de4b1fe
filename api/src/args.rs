use clap::{Parser, ValueEnum};
use gutlog_core::{
    domain::common::{DatabaseConfig, GutlogConfig, LLMConfig},
    infrastructure::llm::DEFAULT_GEMINI_BASE_URL,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "gutlog-api", version, about = "gutlog HTTP API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    /// Prefix of every route, e.g. `/api`.
    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseArgs {
    #[arg(id = "database_host", long = "database-host", env = "DATABASE_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(id = "database_port", long = "database-port", env = "DATABASE_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(long = "database-user", env = "DATABASE_USER", default_value = "postgres")]
    pub user: String,

    #[arg(
        long = "database-password",
        env = "DATABASE_PASSWORD",
        default_value = "postgres",
        hide_env_values = true
    )]
    pub password: String,

    #[arg(long = "database-name", env = "DATABASE_NAME", default_value = "gutlog")]
    pub name: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = "gemini-2.0-flash")]
    pub gemini_model: String,

    #[arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    /// Upper bound for one model call, in seconds.
    #[arg(long = "llm-timeout", env = "LLM_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(
        long = "log-filter",
        env = "RUST_LOG",
        default_value = "gutlog_api=info,gutlog_core=info,tower_http=info"
    )]
    pub filter: String,

    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub format: LogFormat,
}

impl From<Args> for GutlogConfig {
    fn from(args: Args) -> Self {
        GutlogConfig {
            database: DatabaseConfig {
                host: args.db.host,
                port: args.db.port,
                username: args.db.user,
                password: args.db.password,
                name: args.db.name,
            },
            llm: LLMConfig {
                gemini_api_key: args.llm.gemini_api_key,
                gemini_model: args.llm.gemini_model,
                gemini_base_url: args.llm.gemini_base_url,
                request_timeout_secs: args.llm.timeout_secs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_config_mapping() {
        let args = Args::try_parse_from([
            "gutlog-api",
            "--gemini-api-key",
            "key",
            "--allowed-origins",
            "http://a.test,http://b.test",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.server.port, 3333);
        assert_eq!(args.server.allowed_origins.len(), 2);
        assert_eq!(args.log.format, LogFormat::Json);

        let config = GutlogConfig::from(args);
        assert_eq!(config.database.name, "gutlog");
        assert_eq!(config.llm.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.llm.request_timeout_secs, 60);
    }
}
