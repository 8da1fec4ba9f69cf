use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// Channels scaled to 0.0..=1.0 for PDF color operators.
    pub fn to_unit(self) -> [f32; 3] {
        self.0.map(|c| c as f32 / 255.0)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("not a #RRGGBB color: {value}"))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Bar when the percentage meets or beats the benchmark.
    pub positive: Color,
    pub negative: Color,
    /// Bar for questions without a benchmark.
    pub neutral: Color,
    pub category: Color,
    pub summary: Color,
    pub title_box: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            positive: Color([0x50, 0xBE, 0x3B]),
            negative: Color([0xF1, 0x51, 0x1B]),
            neutral: Color([0x52, 0xB2, 0xE8]),
            category: Color([0x2C, 0x37, 0x92]),
            summary: Color([0x52, 0xB3, 0xE9]),
            title_box: Color::BLACK,
        }
    }
}

impl Palette {
    /// Exactly meeting the benchmark counts as meeting it. A benchmark of 0 is a
    /// real benchmark, only `None` selects the neutral color.
    pub fn bar_color(&self, percentage: f32, benchmark: Option<f32>) -> Color {
        match benchmark {
            None => self.neutral,
            Some(target) if percentage - target >= 0.0 => self.positive,
            Some(_) => self.negative,
        }
    }
}

/// Bar color with the default report palette.
pub fn bar_color(percentage: f32, benchmark: Option<f32>) -> Color {
    Palette::default().bar_color(percentage, benchmark)
}
