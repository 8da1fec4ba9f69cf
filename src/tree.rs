use crate::error::Error;
use crate::model::{Category, GridPosition, RenderNode, node_count};

/// Flatten categories into render nodes, consuming positions in placement order.
pub fn build_nodes(
    categories: &[Category],
    positions: &[GridPosition],
) -> Result<Vec<RenderNode>, Error> {
    let expected = node_count(categories);
    if positions.len() != expected {
        return Err(Error::PositionCountMismatch {
            expected,
            actual: positions.len(),
        });
    }

    let mut positions = positions.iter().copied();
    let mut nodes = Vec::with_capacity(expected);
    for category in categories {
        // Lengths match, so the iterator cannot run dry.
        let Some(position) = positions.next() else {
            break;
        };
        nodes.push(RenderNode::Category {
            label: category.name.clone(),
            position,
        });
        for (question, position) in category.questions.iter().zip(positions.by_ref()) {
            nodes.push(RenderNode::Question {
                label: question.text.clone(),
                percentage: question.yes_percentage,
                benchmark: question.yes_benchmark,
                position,
            });
        }
    }
    Ok(nodes)
}
