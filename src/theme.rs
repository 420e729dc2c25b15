use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct SeverityColors {
    pub blocker: Color,
    pub critical: Color,
    pub major: Color,
    pub minor: Color,
    pub info: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct ThemePalette {
    pub name: &'static str,
    pub accent_primary: Color,
    pub accent_success: Color,
    pub accent_danger: Color,
    pub accent_subtle: Color,
    pub bg_app: Color,
    pub bg_panel: Color,
    pub bg_panel_alt: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub border_panel: Color,
    pub border_focus: Color,
    pub border_popup: Color,
    pub bg_popup: Color,
    pub severity: SeverityColors,
}

impl ThemePalette {
    /// Badge colour for an upper-cased severity level. Both the legacy
    /// (BLOCKER..INFO) and the newer impact scale (HIGH/MEDIUM/LOW) map here.
    pub fn severity_color(&self, level: &str) -> Color {
        match level {
            "BLOCKER" => self.severity.blocker,
            "CRITICAL" | "HIGH" => self.severity.critical,
            "MAJOR" | "MEDIUM" => self.severity.major,
            "MINOR" | "LOW" => self.severity.minor,
            _ => self.severity.info,
        }
    }
}

pub const THEMES: [ThemePalette; 3] = [
    ThemePalette {
        name: "github_dark",
        accent_primary: Color::Rgb(88, 166, 255),
        accent_success: Color::Rgb(63, 185, 80),
        accent_danger: Color::Rgb(248, 81, 73),
        accent_subtle: Color::Rgb(145, 171, 255),
        bg_app: Color::Rgb(13, 17, 23),
        bg_panel: Color::Rgb(22, 27, 34),
        bg_panel_alt: Color::Rgb(28, 34, 43),
        text_primary: Color::Rgb(230, 237, 243),
        text_muted: Color::Rgb(139, 148, 158),
        border_panel: Color::Rgb(48, 54, 61),
        border_focus: Color::Rgb(105, 138, 255),
        border_popup: Color::Rgb(128, 160, 255),
        bg_popup: Color::Rgb(13, 17, 23),
        severity: SeverityColors {
            blocker: Color::Rgb(218, 54, 51),
            critical: Color::Rgb(248, 81, 73),
            major: Color::Rgb(219, 109, 40),
            minor: Color::Rgb(210, 153, 34),
            info: Color::Rgb(88, 166, 255),
        },
    },
    ThemePalette {
        name: "midnight",
        accent_primary: Color::Rgb(91, 157, 255),
        accent_success: Color::Rgb(68, 201, 127),
        accent_danger: Color::Rgb(238, 111, 129),
        accent_subtle: Color::Rgb(166, 189, 255),
        bg_app: Color::Rgb(9, 13, 20),
        bg_panel: Color::Rgb(15, 20, 31),
        bg_panel_alt: Color::Rgb(20, 27, 40),
        text_primary: Color::Rgb(226, 234, 250),
        text_muted: Color::Rgb(141, 157, 190),
        border_panel: Color::Rgb(39, 57, 98),
        border_focus: Color::Rgb(115, 156, 255),
        border_popup: Color::Rgb(151, 186, 255),
        bg_popup: Color::Rgb(18, 24, 37),
        severity: SeverityColors {
            blocker: Color::Rgb(230, 72, 96),
            critical: Color::Rgb(238, 111, 129),
            major: Color::Rgb(240, 150, 90),
            minor: Color::Rgb(226, 196, 106),
            info: Color::Rgb(115, 156, 255),
        },
    },
    ThemePalette {
        name: "graphite",
        accent_primary: Color::Rgb(120, 170, 255),
        accent_success: Color::Rgb(103, 205, 147),
        accent_danger: Color::Rgb(241, 124, 149),
        accent_subtle: Color::Rgb(186, 204, 255),
        bg_app: Color::Rgb(16, 18, 22),
        bg_panel: Color::Rgb(24, 27, 34),
        bg_panel_alt: Color::Rgb(31, 35, 45),
        text_primary: Color::Rgb(231, 236, 245),
        text_muted: Color::Rgb(151, 160, 179),
        border_panel: Color::Rgb(54, 62, 81),
        border_focus: Color::Rgb(132, 177, 255),
        border_popup: Color::Rgb(165, 195, 255),
        bg_popup: Color::Rgb(29, 33, 42),
        severity: SeverityColors {
            blocker: Color::Rgb(235, 94, 110),
            critical: Color::Rgb(241, 124, 149),
            major: Color::Rgb(236, 160, 102),
            minor: Color::Rgb(220, 200, 120),
            info: Color::Rgb(132, 177, 255),
        },
    },
];

pub fn resolve_theme(name: Option<&str>) -> &'static ThemePalette {
    if let Some(name) = name
        && let Some(theme) = THEMES
            .iter()
            .find(|theme| theme.name.eq_ignore_ascii_case(name))
    {
        return theme;
    }
    default_theme()
}

pub fn default_theme() -> &'static ThemePalette {
    &THEMES[0]
}

#[cfg(test)]
mod tests {
    use super::{default_theme, resolve_theme};

    #[test]
    fn resolves_known_theme_case_insensitive() {
        let theme = resolve_theme(Some("GraPhite"));
        assert_eq!(theme.name, "graphite");
    }

    #[test]
    fn falls_back_to_default_for_unknown_theme() {
        assert_eq!(resolve_theme(Some("solarized")).name, default_theme().name);
        assert_eq!(resolve_theme(None).name, default_theme().name);
    }

    #[test]
    fn unknown_severity_uses_info_colour() {
        let theme = default_theme();
        assert_eq!(theme.severity_color("WHATEVER"), theme.severity.info);
        assert_eq!(theme.severity_color("BLOCKER"), theme.severity.blocker);
        assert_eq!(theme.severity_color("HIGH"), theme.severity.critical);
    }
}
