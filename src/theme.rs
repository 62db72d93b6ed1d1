//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// One Dark palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile colours by `TileColor::index`: yellow, purple, red, blue, green, pink.
    pub tiles: [Color; 6],
    /// Bubble obstacles.
    pub bubble: Color,
    /// Glyphs on special pieces and the rainbow tile.
    pub special: Color,
    /// Board background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, goal).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text and the idle cursor frame.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

const ONEDARK_TILES: [Color; 6] = [
    Color::from_u32(0x00E5_C07B), // yellow
    Color::from_u32(0x00C6_78DD), // magenta
    Color::from_u32(0x00E0_6C75), // red
    Color::from_u32(0x0061_AFEF), // blue
    Color::from_u32(0x0098_C379), // green
    Color::from_u32(0x00F0_9FC8), // pink
];

impl Theme {
    /// One Dark defaults: hex values from onedark.theme, plus a pink it does not define.
    pub fn onedark_default() -> Self {
        Self {
            tiles: ONEDARK_TILES,
            bubble: Color::from_u32(0x0056_B6C2),
            special: Color::from_u32(0x00FF_FFFF),
            bg: Color::from_u32(0x0031_353F),
            div_line: Color::from_u32(0x003F_444F),
            main_fg: Color::from_u32(0x00AB_B2BF),
            title: Color::from_u32(0x00E5_C07B),
            inactive_fg: Color::from_u32(0x005C_6370),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or file is missing.
    /// `palette` selects colour variant: Normal (theme), HighContrast, or Colorblind.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override tile colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.tiles = [
                    Color::from_u32(0x00FF_FF00),
                    Color::from_u32(0x00AA_00FF),
                    Color::from_u32(0x00FF_0000),
                    Color::from_u32(0x0000_88FF),
                    Color::from_u32(0x0000_FF00),
                    Color::from_u32(0x00FF_66CC),
                ];
                self.bubble = Color::from_u32(0x0000_FFFF);
            }
            crate::Palette::Colorblind => {
                // Paul Tol's bright scheme; no red/green pair relies on hue alone.
                self.tiles = [
                    Color::from_u32(0x00CC_BB44),
                    Color::from_u32(0x00AA_3377),
                    Color::from_u32(0x00EE_6677),
                    Color::from_u32(0x0044_77AA),
                    Color::from_u32(0x0022_8833),
                    Color::from_u32(0x00EE_99CC),
                ];
                self.bubble = Color::from_u32(0x0066_CCEE);
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        let d = Self::onedark_default();
        Self {
            tiles: [
                get("title").or_else(|| get("cpu_mid")).unwrap_or(d.tiles[0]),
                get("net_box").unwrap_or(d.tiles[1]),
                get("cpu_end")
                    .or_else(|| get("temp_end"))
                    .unwrap_or(d.tiles[2]),
                get("cpu_box").unwrap_or(d.tiles[3]),
                get("mem_box")
                    .or_else(|| get("cpu_start"))
                    .unwrap_or(d.tiles[4]),
                get("proc_box").unwrap_or(d.tiles[5]),
            ],
            bubble: get("hi_fg")
                .or_else(|| get("proc_misc"))
                .unwrap_or(d.bubble),
            special: get("selected_fg").unwrap_or(d.special),
            bg: get("meter_bg").unwrap_or(d.bg),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
        }
    }

    /// Tile colour for `TileColor::index` (0..6). The wildcard index gets the special colour.
    #[inline]
    pub fn tile_color(&self, index: u8) -> Color {
        self.tiles.get(index as usize).copied().unwrap_or(self.special)
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(eq) = rest.find('=') {
            let value = rest[eq + 1..]
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .to_string();
            if !value.is_empty() {
                map.insert(key.to_string(), value);
            }
        }
    }
    map
}

fn hex_byte(s: &str) -> Result<u8, ThemeError> {
    u8::from_str_radix(s, 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ThemeError::InvalidHex(s.to_string()));
    }
    let (r, g, b) = match s.len() {
        6 => (hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?),
        3 => (
            hex_byte(&s[0..1])? * 17,
            hex_byte(&s[1..2])? * 17,
            hex_byte(&s[2..3])? * 17,
        ),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}
