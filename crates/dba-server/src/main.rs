use clap::Parser;
use dba_server::config::{DEFAULT_PORT, DEFAULT_RETRIEVAL_K};
use dba_server::logging::init_logging;
use dba_server::{run_server, ServerConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "dba-server")]
#[command(about = "Oracle DBA assistant HTTP server")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory holding analysis snapshots and the sessions/ store
    #[arg(long, env = "DBA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory of .txt documentation used for retrieval
    #[arg(long, env = "DBA_KNOWLEDGE_DIR")]
    knowledge_dir: Option<PathBuf>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "LLM_BASE_URL", default_value = dba_llm::openai::DEFAULT_BASE_URL)]
    llm_base_url: String,

    /// LLM model name
    #[arg(long, env = "LLM_MODEL", default_value = dba_llm::openai::DEFAULT_MODEL)]
    model: String,

    /// System message sent with every completion request
    #[arg(long, env = "LLM_SYSTEM_ROLE", default_value = dba_llm::openai::DEFAULT_SYSTEM_ROLE)]
    system_role: String,

    /// LLM API key
    #[arg(long, env = "DEEP_SEEK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Documents retrieved per chat turn
    #[arg(long, env = "RETRIEVAL_K", default_value_t = DEFAULT_RETRIEVAL_K)]
    retrieval_k: usize,

    /// Serialize concurrent turns that target the same session
    #[arg(long, env = "SERIALIZE_SESSIONS", default_value = "false")]
    serialize_sessions: bool,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            port: self.port,
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            knowledge_dir: self.knowledge_dir,
            llm_base_url: self.llm_base_url,
            model: self.model,
            system_role: self.system_role,
            api_key: self.api_key,
            retrieval_k: self.retrieval_k,
            serialize_sessions: self.serialize_sessions,
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if cli.log_level.is_some() {
        env_logger::init();
    } else {
        init_logging(cli.debug);
    }

    log::info!("Starting DBA assistant server on port {}", cli.port);
    log::info!("LLM Configuration:");
    log::info!("  Base URL: {}", cli.llm_base_url);
    log::info!("  Model: {}", cli.model);
    log::debug!("  Retrieval k: {}", cli.retrieval_k);
    log::debug!("  Serialize sessions: {}", cli.serialize_sessions);

    run_server(cli.into_config()).await
}
