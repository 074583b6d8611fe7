use serde::{Deserialize, Serialize};

/// Host-provided settings for the core.
///
/// The host hands these over as JSON (the same way an LSP client pushes its
/// configuration); everything defaults to a sensible value so a missing or
/// partial payload never blocks the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Folder card files are created under; empty means "next to the source
    /// note".
    pub default_folder: String,

    /// Keep the source note after decomposition. There is no delete path in
    /// the core; turning this off only suppresses the banner.
    pub keep_original_note: bool,

    /// Append a banner section linking the generated cards to the source
    /// note.
    pub add_banner: bool,

    /// Also write a star-layout canvas file next to the cards.
    pub generate_canvas: bool,

    /// Maximum number of decomposition history entries kept in memory.
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_folder: String::new(),
            keep_original_note: true,
            add_banner: true,
            generate_canvas: false,
            history_limit: 50,
        }
    }
}

impl Settings {
    /// Deserialize host-provided settings, falling back to defaults when the
    /// payload does not parse.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}
