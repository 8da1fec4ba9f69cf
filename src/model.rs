use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Question {
    #[serde(rename = "Text", alias = "text")]
    pub text: String,
    #[serde(rename = "YesPercentage", alias = "yesPercentage")]
    pub yes_percentage: f32,
    /// `null` and a missing key both mean "no benchmark".
    #[serde(rename = "YesBenchmark", alias = "yesBenchmark", default)]
    pub yes_benchmark: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Report {
    pub title: String,
    #[serde(default)]
    pub summary: Vec<String>,
    pub categories: Vec<Category>,
}

impl Report {
    /// Number of render nodes: one per category header plus one per question.
    pub fn node_count(&self) -> usize {
        node_count(&self.categories)
    }
}

pub fn node_count(categories: &[Category]) -> usize {
    categories.iter().map(|c| 1 + c.questions.len()).sum()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub column: u32,
    pub row: u32, // 0..GRID_ROWS
}

impl GridPosition {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Same order as the flattened categories: header, then its questions.
    pub positions: Vec<GridPosition>,
    pub total_columns: u32,
    /// True when the first pass overflowed and the shifted start was used.
    pub shifted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderNode {
    Category {
        label: String,
        position: GridPosition,
    },
    Question {
        label: String,
        percentage: f32,
        benchmark: Option<f32>,
        position: GridPosition,
    },
}

impl RenderNode {
    pub fn position(&self) -> GridPosition {
        match self {
            RenderNode::Category { position, .. } | RenderNode::Question { position, .. } => {
                *position
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RenderNode::Category { label, .. } | RenderNode::Question { label, .. } => label,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// A logo read from disk: the original bytes plus the decoded pixels.
#[derive(Clone)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub decoded: image::DynamicImage,
}
