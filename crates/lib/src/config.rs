//! Configuration, resolved from the environment.
//!
//! The demo deliberately keeps no config file or state file: the Twilio
//! credentials, the demo destination number, and the gateway bind/port all
//! come from environment variables at startup.

/// Top-level application config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gateway server settings.
    pub gateway: GatewayConfig,

    /// SMS provider settings (Twilio).
    pub provider: ProviderConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP port (default 3001, `PORT` env).
    pub port: u16,

    /// Bind address (default "127.0.0.1", `ALDEN_BIND` env).
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    3001
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// SMS provider credentials and numbers. All optional at load time; sending
/// fails with a structured error when credentials are missing.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Twilio account SID (`TWILIO_ACCOUNT_SID`).
    pub account_sid: Option<String>,
    /// Twilio auth token (`TWILIO_AUTH_TOKEN`).
    pub auth_token: Option<String>,
    /// Number the reminder is sent from (`TWILIO_FROM_NUMBER`).
    pub from_number: Option<String>,
    /// The single controlled inbox every reminder is sent to
    /// (`DEMO_PHONE_NUMBER`), never the caregiver's real number.
    pub demo_number: Option<String>,
    /// Provider API base URL override (`TWILIO_API_BASE`, for tests or a
    /// custom endpoint). Defaults to the real Twilio API when unset.
    pub api_base: Option<String>,
}

/// Read an env var, treating unset/blank as absent.
fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Load config from the environment. Missing vars fall back to defaults.
pub fn load_config() -> Config {
    let port = env_nonempty("PORT")
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or_else(default_gateway_port);
    let bind = env_nonempty("ALDEN_BIND").unwrap_or_else(default_gateway_bind);
    Config {
        gateway: GatewayConfig { port, bind },
        provider: ProviderConfig {
            account_sid: env_nonempty("TWILIO_ACCOUNT_SID"),
            auth_token: env_nonempty("TWILIO_AUTH_TOKEN"),
            from_number: env_nonempty("TWILIO_FROM_NUMBER"),
            demo_number: env_nonempty("DEMO_PHONE_NUMBER"),
            api_base: env_nonempty("TWILIO_API_BASE"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gateway_port_and_bind() {
        let g = GatewayConfig::default();
        assert_eq!(g.port, 3001);
        assert_eq!(g.bind, "127.0.0.1");
    }

    #[test]
    fn default_provider_is_unconfigured() {
        let p = ProviderConfig::default();
        assert!(p.account_sid.is_none());
        assert!(p.demo_number.is_none());
        assert!(p.api_base.is_none());
    }

    #[test]
    fn env_nonempty_trims_and_drops_blank() {
        std::env::set_var("ALDEN_TEST_ENV_BLANK", "   ");
        std::env::set_var("ALDEN_TEST_ENV_PADDED", "  +15550001111  ");
        assert_eq!(env_nonempty("ALDEN_TEST_ENV_BLANK"), None);
        assert_eq!(
            env_nonempty("ALDEN_TEST_ENV_PADDED"),
            Some("+15550001111".to_string())
        );
        assert_eq!(env_nonempty("ALDEN_TEST_ENV_UNSET"), None);
    }
}
