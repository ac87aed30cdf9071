use crate::cli::Args;

const DEFAULT_ALLOWED_ORIGIN: &str = "https://chipper-snickerdoodle-ed545c.netlify.app";

/// Relay configuration resolved once at startup from [`Args`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    /// Upstream credential, OPEN_KEY winning over GROQ_API_KEY. None means
    /// the relay starts but answers /api/chat with a misconfiguration error.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl RelayConfig {
    pub fn from_args(args: &Args) -> Self {
        let api_key = args
            .open_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| args.groq_api_key.clone().filter(|k| !k.is_empty()));

        let allowed_origins = match &args.allowed_origins {
            Some(raw) => raw
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        };

        Self {
            port: args.port,
            api_key,
            model: args.chat_model.clone(),
            base_url: args.chat_base_url.clone(),
            allowed_origins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["chat-relay"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn open_key_wins_over_groq_api_key() {
        let config = RelayConfig::from_args(&args(&[
            "--open-key", "primary",
            "--groq-api-key", "fallback",
        ]));
        assert_eq!(config.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn groq_api_key_used_when_open_key_absent() {
        let config = RelayConfig::from_args(&args(&["--groq-api-key", "fallback"]));
        assert_eq!(config.api_key.as_deref(), Some("fallback"));
    }

    #[test]
    fn empty_credentials_resolve_to_none() {
        let config = RelayConfig::from_args(&args(&["--open-key", ""]));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn origins_split_on_commas_and_trimmed() {
        let config = RelayConfig::from_args(&args(&[
            "--allowed-origins",
            "https://a.example, https://b.example,",
        ]));
        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn origins_default_to_deploy_origin() {
        let config = RelayConfig::from_args(&args(&[]));
        assert_eq!(config.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);
    }
}
