/// Listen address, read from `SIM_HOST` / `SIM_PORT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 5000;

    /// Load from the process environment, falling back to defaults for unset
    /// or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("SIM_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let port = lookup("SIM_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(Self::DEFAULT_PORT);
        Self { host, port }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "127.0.0.1:5000");
    }

    #[test]
    fn reads_overrides_and_ignores_bad_ports() {
        let config = ServerConfig::from_lookup(|key| match key {
            "SIM_HOST" => Some("0.0.0.0".to_string()),
            "SIM_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert_eq!(config.addr(), "0.0.0.0:5000");

        let config =
            ServerConfig::from_lookup(|key| (key == "SIM_PORT").then(|| "8080".to_string()));
        assert_eq!(config.port, 8080);
    }
}
