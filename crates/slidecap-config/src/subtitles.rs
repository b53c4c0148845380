use serde::{Deserialize, Serialize};

/// Resolved subtitle configuration supplied by the host's content resolver.
///
/// The host computes this object when presentation content is resolved and
/// hands it to the caption state store in one piece; navigating to other
/// content produces a fresh object that replaces the previous one. The store
/// never inspects it beyond holding it, so every field has a default and a
/// partial host document deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubtitlesConfig {
    /// Language codes with an available caption track (e.g., `"en"`, `"fr"`).
    #[serde(default)]
    pub languages: Vec<String>,
    /// Language selected when the viewer has not picked one yet.
    #[serde(default = "default_lang")]
    pub default_lang: String,
    /// Whether captions are enabled for this presentation at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Endpoint used to synthesize caption audio, if the host provides one.
    #[serde(default)]
    pub tts_api: Option<String>,
}

impl Default for SubtitlesConfig {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            default_lang: default_lang(),
            enabled: default_enabled(),
            tts_api: None,
        }
    }
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_host_document_uses_defaults() {
        let config: SubtitlesConfig =
            serde_json::from_str(r#"{"languages": ["en", "fr"]}"#).unwrap();

        assert_eq!(config.languages, vec!["en", "fr"]);
        assert_eq!(config.default_lang, "en");
        assert!(config.enabled);
        assert!(config.tts_api.is_none());
    }

    #[test]
    fn empty_host_document_matches_default() {
        let config: SubtitlesConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SubtitlesConfig::default());
    }
}
