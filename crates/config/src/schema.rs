use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrionConfig {
    pub server: ServerConfig,
    pub responder: ResponderConfig,
    pub voice: VoiceConfig,
}

/// Gateway server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 4780,
        }
    }
}

/// Message responder configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// Override for the acknowledgment text. `None` keeps the built-in reply.
    pub ack_text: Option<String>,
}

/// Voice synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Answer synthesis requests with a generated beep instead of a real
    /// model. On by default; no model backend ships with this build.
    pub mock_audio: bool,
    /// Default output sample rate in Hz.
    pub sample_rate: u32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            mock_audio: true,
            sample_rate: 24_000,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = OrionConfig::default();
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert!(cfg.voice.mock_audio);
        assert_eq!(cfg.voice.sample_rate, 24_000);
        assert!(cfg.responder.ack_text.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: OrionConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert!(cfg.voice.mock_audio);
    }
}
