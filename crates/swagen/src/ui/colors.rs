use std::io::IsTerminal;

use clap::{ValueEnum, builder::styling::Ansi256Color};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy)]
pub enum Theme {
  Dark,
  Light,
}

/// Terminal palette shared by the loggers and the `list` tables.
#[derive(Debug, Clone, Copy)]
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

pub trait IntoComfyColor {
  fn into_comfy(self) -> ComfyColor;
}

/// The palette only produces RGB colors or `Reset`.
impl IntoComfyColor for Color {
  fn into_comfy(self) -> ComfyColor {
    match self {
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      Color::AnsiValue(value) => ComfyColor::AnsiValue(value),
      _ => ComfyColor::Reset,
    }
  }
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn pick(&self, dark: (u8, u8, u8), light: (u8, u8, u8)) -> Color {
    if !self.enabled {
      return Color::Reset;
    }
    let (r, g, b) = match self.theme {
      Theme::Dark => dark,
      Theme::Light => light,
    };
    Color::Rgb { r, g, b }
  }

  pub const fn timestamp(&self) -> Color {
    self.pick((118, 166, 166), (92, 62, 38))
  }

  pub const fn primary(&self) -> Color {
    self.pick((191, 126, 4), (70, 42, 25))
  }

  pub const fn accent(&self) -> Color {
    self.pick((166, 84, 55), (211, 99, 70))
  }

  pub const fn info(&self) -> Color {
    self.pick((118, 166, 166), (40, 111, 170))
  }

  pub const fn success(&self) -> Color {
    self.pick((118, 166, 166), (34, 142, 90))
  }

  pub const fn label(&self) -> Color {
    self.pick((217, 164, 4), (176, 103, 66))
  }

  pub const fn value(&self) -> Color {
    self.pick((242, 211, 56), (199, 146, 76))
  }

  const fn to_clap(color: Color) -> Option<clap::builder::styling::Color> {
    use clap::builder::styling::{Color as ClapColor, RgbColor};

    match color {
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      Color::AnsiValue(value) => Some(ClapColor::Ansi256(Ansi256Color(value))),
      _ => None,
    }
  }

  /// Help output styling, always using the dark palette.
  pub const fn clap_styles() -> clap::builder::Styles {
    use clap::builder::styling::{Style, Styles};

    let colors = Self::new(true, Theme::Dark);

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(Self::to_clap(colors.label())))
      .usage(Style::new().bold().fg_color(Self::to_clap(colors.label())))
      .literal(Style::new().fg_color(Self::to_clap(colors.success())))
      .placeholder(Style::new().fg_color(Self::to_clap(colors.info())))
      .error(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
      .valid(Style::new().fg_color(Self::to_clap(colors.success())))
      .invalid(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => detect_terminal_theme(),
  }
}

/// Reads `COLORFGBG` (`fg;bg`); background colors 8 and up are light.
fn detect_terminal_theme() -> Theme {
  if let Ok(colorfgbg) = std::env::var("COLORFGBG")
    && let Some(bg) = colorfgbg.split(';').next_back()
    && let Ok(bg_num) = bg.parse::<u8>()
  {
    return if bg_num >= 8 { Theme::Light } else { Theme::Dark };
  }

  Theme::Dark
}
