use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Port for the relay to listen on.
    #[arg(long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// Upstream credential. Takes precedence over GROQ_API_KEY.
    #[arg(long, env = "OPEN_KEY")]
    pub open_key: Option<String>,

    /// Upstream credential, consulted when OPEN_KEY is unset.
    #[arg(long, env = "GROQ_API_KEY")]
    pub groq_api_key: Option<String>,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "openai/gpt-oss-120b")]
    pub chat_model: String,

    /// Base URL for the upstream completion API.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Comma-separated list of origins permitted to call the relay from a
    /// browser context.
    #[arg(long, env = "ALLOWED_ORIGINS")]
    pub allowed_origins: Option<String>,
}
