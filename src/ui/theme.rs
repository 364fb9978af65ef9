use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for human CLI output. With `DXCATALOG_QUIET` set, or when stdout
/// is not a terminal (piped into `jq`, redirected to a file), every style is
/// empty so the text carries no ANSI escapes.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    /// Category codes in listings
    pub category: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if crate::output::is_quiet() || !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            category: Style::new().blue().bold(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            category: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_adds_no_escapes() {
        use owo_colors::OwoColorize;
        let plain = Theme::plain();
        assert_eq!("MRD".style(plain.category).to_string(), "MRD");
        assert_ne!("MRD".style(Theme::colored().category).to_string(), "MRD");
    }
}
