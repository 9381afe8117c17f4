//! Presentation state shared by every page
//!
//! Theme and sidebar visibility live here and are handed to the renderer
//! explicitly; nothing reads them from ambient globals.

use acctbook_config::{Theme, UiConfig};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub theme: Theme,
    pub sidebar_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

impl UiState {
    pub fn from_config(config: &UiConfig) -> Self {
        Self {
            theme: config.theme,
            sidebar_open: config.sidebar_open,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Flip sidebar visibility and return the new value
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    /// Class for the `<html>` element; `None` follows the browser
    pub fn html_class(&self) -> Option<&'static str> {
        match self.theme {
            Theme::Dark => Some("dark"),
            Theme::Light => Some("light"),
            Theme::System => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sidebar() {
        let mut ui = UiState::default();
        assert!(ui.sidebar_open);
        assert!(!ui.toggle_sidebar());
        assert!(ui.toggle_sidebar());
    }

    #[test]
    fn test_theme_class() {
        let mut ui = UiState::default();
        assert_eq!(ui.html_class(), None);
        ui.set_theme(Theme::Dark);
        assert_eq!(ui.html_class(), Some("dark"));
    }
}
