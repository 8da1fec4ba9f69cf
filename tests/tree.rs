mod common;

use common::{pos, question};
use survey_pdf::Error;
use survey_pdf::model::{Category, RenderNode};
use survey_pdf::placement::place;
use survey_pdf::tree::build_nodes;

fn survey() -> Vec<Category> {
    vec![
        Category {
            name: "Leadership".into(),
            questions: vec![
                question("I trust senior management", 72.0, Some(65.0)),
                question("Goals are clear", 81.0, None),
            ],
        },
        Category {
            name: "Empty".into(),
            questions: Vec::new(),
        },
        Category {
            name: "Wellbeing".into(),
            questions: vec![question("My workload is manageable", 64.0, Some(64.0))],
        },
    ]
}

#[test]
fn nodes_follow_input_order_with_positions_zipped() {
    let cats = survey();
    let positions = vec![pos(1, 0), pos(1, 1), pos(1, 2), pos(1, 4), pos(1, 6), pos(1, 7)];
    let nodes = build_nodes(&cats, &positions).expect("nodes");

    assert_eq!(
        nodes,
        vec![
            RenderNode::Category {
                label: "Leadership".into(),
                position: pos(1, 0),
            },
            RenderNode::Question {
                label: "I trust senior management".into(),
                percentage: 72.0,
                benchmark: Some(65.0),
                position: pos(1, 1),
            },
            RenderNode::Question {
                label: "Goals are clear".into(),
                percentage: 81.0,
                benchmark: None,
                position: pos(1, 2),
            },
            RenderNode::Category {
                label: "Empty".into(),
                position: pos(1, 4),
            },
            RenderNode::Category {
                label: "Wellbeing".into(),
                position: pos(1, 6),
            },
            RenderNode::Question {
                label: "My workload is manageable".into(),
                percentage: 64.0,
                benchmark: Some(64.0),
                position: pos(1, 7),
            },
        ]
    );
}

#[test]
fn nodes_take_positions_from_placement() {
    let cats = survey();
    let placement = place(&cats).expect("placement");
    let nodes = build_nodes(&cats, &placement.positions).expect("nodes");

    assert_eq!(nodes.len(), placement.positions.len());
    let node_positions: Vec<_> = nodes.iter().map(RenderNode::position).collect();
    assert_eq!(node_positions, placement.positions);
    assert_eq!(nodes[3].label(), "Empty");
}

#[test]
fn position_count_mismatch_is_reported() {
    let cats = survey();
    for positions in [vec![pos(1, 0)], vec![pos(1, 0); 7]] {
        match build_nodes(&cats, &positions) {
            Err(Error::PositionCountMismatch { expected, actual }) => {
                assert_eq!(expected, 6);
                assert_eq!(actual, positions.len());
            }
            other => panic!("expected PositionCountMismatch, got {other:?}"),
        }
    }
}
