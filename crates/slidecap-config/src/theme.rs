use serde::{Deserialize, Serialize};

/// Syntax-highlighter theme pair handed to the host's rendering pipeline.
///
/// The host picks `dark` or `light` to match the active color scheme; this
/// crate only carries the theme names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HighlighterThemes {
    /// Theme used when the presentation renders in dark mode.
    #[serde(default = "default_dark_theme")]
    pub dark: String,
    /// Theme used when the presentation renders in light mode.
    #[serde(default = "default_light_theme")]
    pub light: String,
}

impl Default for HighlighterThemes {
    fn default() -> Self {
        Self {
            dark: default_dark_theme(),
            light: default_light_theme(),
        }
    }
}

fn default_dark_theme() -> String {
    "material-theme-darker".to_string()
}

fn default_light_theme() -> String {
    "material-theme".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_material_theme_pair() {
        let themes = HighlighterThemes::default();
        assert_eq!(themes.dark, "material-theme-darker");
        assert_eq!(themes.light, "material-theme");
    }
}
