#![allow(dead_code)]

use survey_pdf::model::{Category, GridPosition, Question, Report};

pub fn question(text: &str, yes: f32, benchmark: Option<f32>) -> Question {
    Question {
        text: text.to_string(),
        yes_percentage: yes,
        yes_benchmark: benchmark,
    }
}

/// Category with `n` generated questions.
pub fn category(name: &str, n: usize) -> Category {
    Category {
        name: name.to_string(),
        questions: (0..n)
            .map(|i| question(&format!("{name} question number {i}"), 50.0, None))
            .collect(),
    }
}

pub fn categories(sizes: &[usize]) -> Vec<Category> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &n)| category(&format!("Category {i}"), n))
        .collect()
}

pub fn report(sizes: &[usize]) -> Report {
    Report {
        title: "Some insights".to_string(),
        summary: vec!["42 respondents".to_string(), "March 2024".to_string()],
        categories: categories(sizes),
    }
}

pub fn pos(column: u32, row: u32) -> GridPosition {
    GridPosition::new(column, row)
}

/// Header positions, one per category, out of a flattened position list.
pub fn header_positions(categories: &[Category], positions: &[GridPosition]) -> Vec<GridPosition> {
    let mut out = Vec::new();
    let mut i = 0;
    for category in categories {
        out.push(positions[i]);
        i += 1 + category.questions.len();
    }
    out
}

/// Slices of the flattened positions per category: (header, questions).
pub fn per_category<'a>(
    categories: &[Category],
    positions: &'a [GridPosition],
) -> Vec<(GridPosition, &'a [GridPosition])> {
    let mut out = Vec::new();
    let mut i = 0;
    for category in categories {
        let n = category.questions.len();
        out.push((positions[i], &positions[i + 1..i + 1 + n]));
        i += 1 + n;
    }
    out
}

pub const SAMPLE_JSON: &str = r#"{
    "title": "Some insights",
    "summary": ["128 employees", "87% response rate"],
    "categories": [
        {
            "name": "Leadership",
            "questions": [
                { "Text": "I trust the decisions made by senior management", "YesPercentage": 72, "YesBenchmark": 65 },
                { "Text": "My manager gives me useful feedback", "YesPercentage": 58, "YesBenchmark": 70 },
                { "Text": "Goals are communicated clearly", "YesPercentage": 81, "YesBenchmark": null }
            ]
        },
        {
            "name": "Wellbeing",
            "questions": [
                { "Text": "My workload is manageable", "YesPercentage": 64 }
            ]
        }
    ]
}"#;

/// All `/MediaBox [..]` arrays in an uncompressed PDF object stream.
pub fn media_boxes(pdf: &[u8]) -> Vec<Vec<f32>> {
    let text = String::from_utf8_lossy(pdf);
    text.match_indices("/MediaBox [")
        .filter_map(|(start, needle)| {
            let rest = &text[start + needle.len()..];
            let end = rest.find(']')?;
            Some(
                rest[..end]
                    .split_whitespace()
                    .filter_map(|n| n.parse().ok())
                    .collect(),
            )
        })
        .collect()
}

pub fn page_count(pdf: &[u8]) -> usize {
    let text = String::from_utf8_lossy(pdf);
    text.match_indices("/Type /Page")
        .filter(|(i, m)| !text[i + m.len()..].starts_with('s'))
        .count()
}
