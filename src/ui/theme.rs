use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Terminal styles for CLI output, including one per medal
#[derive(Debug, Clone)]
pub struct Theme {
    pub heading: Style,
    pub ok: Style,
    pub failure: Style,
    pub caution: Style,
    pub label: Style,
    pub gold: Style,
    pub silver: Style,
    pub bronze: Style,
}

impl Theme {
    /// Medal colours on an interactive terminal, plain text when piped or
    /// when colours are switched off (`NO_COLOR`, `CLICOLOR=0`)
    pub fn detect() -> Self {
        if console::Term::stdout().is_term() && console::colors_enabled() {
            Self::medals()
        } else {
            Self::plain()
        }
    }

    pub fn medals() -> Self {
        Self {
            heading: Style::new().bright_blue().bold(),
            ok: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            caution: Style::new().yellow(),
            label: Style::new().dimmed(),
            gold: Style::new().truecolor(212, 175, 55).bold(),
            silver: Style::new().truecolor(192, 192, 192).bold(),
            bronze: Style::new().truecolor(205, 127, 50).bold(),
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            ok: Style::new(),
            failure: Style::new(),
            caution: Style::new(),
            label: Style::new(),
            gold: Style::new(),
            silver: Style::new(),
            bronze: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
