use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub page: PageSetup,
    pub table: TableStyle,
    pub branding: Branding,
    /// Flate-compress page content streams.
    pub compress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page: PageSetup::default(),
            table: TableStyle::default(),
            branding: Branding::default(),
            compress: true,
        }
    }
}

/// Page size and margins, in points.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        // A4 portrait
        Self {
            width: 210.0 * MM,
            height: 297.0 * MM,
            margin: 20.0 * MM,
        }
    }
}

impl PageSetup {
    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    pub base_row_height: f32,
    pub header_row_height: f32,
    /// Character budget of one description line.
    pub description_chars_per_line: usize,
    pub font_size: f32,
    pub header_font_size: f32,
    /// Description, quantity, unit, unit price, total. Must sum to 100.
    pub column_shares: [u32; 5],
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            base_row_height: 7.0 * MM,
            header_row_height: 8.0 * MM,
            description_chars_per_line: 50,
            font_size: 8.0,
            header_font_size: 9.0,
            column_shares: [45, 10, 10, 15, 20],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub issuer_name: String,
    pub document_title: String,
    pub tagline: String,
    pub primary: [u8; 3],
    pub accent: [u8; 3],
    pub muted: [u8; 3],
    pub light: [u8; 3],
    pub row_shade: [u8; 3],
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            issuer_name: "QuoteForge".to_string(),
            document_title: "DEVIS".to_string(),
            tagline: "Généré par QuoteForge - Solution de devis intelligent pour les professionnels"
                .to_string(),
            primary: [0x13, 0x29, 0x3D],
            accent: [0xFF, 0x6B, 0x35],
            muted: [0x71, 0x80, 0x96],
            light: [0xE2, 0xE8, 0xF0],
            row_shade: [245, 247, 250],
        }
    }
}

impl RenderConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let p = &self.page;
        let t = &self.table;
        let positive = [
            ("page.width", p.width),
            ("page.height", p.height),
            ("table.base_row_height", t.base_row_height),
            ("table.header_row_height", t.header_row_height),
            ("table.font_size", t.font_size),
            ("table.header_font_size", t.header_font_size),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::Config(format!("{name} must be a positive number, got {v}")));
            }
        }
        if !p.margin.is_finite() || p.margin < 0.0 || p.usable_width() <= 0.0 {
            return Err(Error::Config(format!(
                "page.margin {} leaves no usable width on a {}pt page",
                p.margin, p.width
            )));
        }
        if t.description_chars_per_line == 0 {
            return Err(Error::Config("table.description_chars_per_line must be at least 1".into()));
        }
        let share_sum: u32 = t.column_shares.iter().sum();
        if share_sum != 100 {
            return Err(Error::Config(format!(
                "table.column_shares must sum to 100, got {share_sum}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: RenderConfig =
            serde_json::from_str(r#"{"compress": false, "table": {"description_chars_per_line": 40}}"#)
                .unwrap();
        assert!(!cfg.compress);
        assert_eq!(cfg.table.description_chars_per_line, 40);
        assert_eq!(cfg.table.column_shares, [45, 10, 10, 15, 20]);
        assert_eq!(cfg.branding.document_title, "DEVIS");
    }

    #[test]
    fn shares_must_sum_to_hundred() {
        let mut cfg = RenderConfig::default();
        cfg.table.column_shares = [50, 10, 10, 15, 20];
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }
}
