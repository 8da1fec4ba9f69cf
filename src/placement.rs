//! Grid placement: assigns every category header and question a cell in the
//! fixed 16-row column grid.
//!
//! A placement pass walks the categories in order with a single cursor. Each
//! category either fits below the cursor, is split across the current and
//! the next column, or moves to a fresh column. A pass starting at column 1
//! that ends beyond the column budget, or that has to split a category twice,
//! is thrown away and rerun from row 9 of column 0 (rows 0-8 there are
//! reserved for the general-info block).

use crate::error::Error;
use crate::model::{Category, GridPosition, Placement, node_count};

pub const GRID_ROWS: u32 = 16;
pub const MAX_COLUMNS: u32 = 3;

const ROWS: i32 = GRID_ROWS as i32;
const LAST_ROW: i32 = ROWS - 1;
/// Free rows the current column must still have for a category to start there and split.
const MIN_SPLIT_ROWS: i32 = 4;
/// Empty rows after a category block.
const BLOCK_GAP: i32 = 2;

#[derive(Clone, Copy, Debug)]
struct Cursor {
    column: u32,
    row: i32, // -1 right after a split, so the next question lands on row 0
}

impl Cursor {
    const FIRST_PASS: Cursor = Cursor { column: 1, row: 0 };
    const SHIFTED: Cursor = Cursor { column: 0, row: 9 };

    fn position(self) -> GridPosition {
        debug_assert!((0..ROWS).contains(&self.row), "row {} off grid", self.row);
        GridPosition::new(self.column, self.row as u32)
    }

    fn next_column(&mut self) {
        self.column += 1;
        self.row = 0;
    }
}

/// Place all categories. Pure: the same input always gives the same result.
pub fn place(categories: &[Category]) -> Result<Placement, Error> {
    let overflow = match place_from(categories, Cursor::FIRST_PASS) {
        Ok((positions, last_column)) if last_column < MAX_COLUMNS => {
            return Ok(Placement {
                positions,
                total_columns: last_column + 1,
                shifted: false,
            });
        }
        Ok((_, last_column)) => format!("ends in column {last_column}"),
        // A second split means the category ran past the column budget as well.
        Err(e @ Error::CategoryTooLarge { .. }) => e.to_string(),
        Err(e) => return Err(e),
    };

    log::debug!(
        "placement from column {} {overflow}, retrying from column {} row {}",
        Cursor::FIRST_PASS.column,
        Cursor::SHIFTED.column,
        Cursor::SHIFTED.row,
    );

    let (positions, last_column) = place_from(categories, Cursor::SHIFTED)?;
    if last_column >= MAX_COLUMNS {
        return Err(Error::ColumnBudgetExceeded {
            required: last_column + 1,
        });
    }
    Ok(Placement {
        positions,
        total_columns: last_column + 1,
        shifted: true,
    })
}

fn place_from(categories: &[Category], start: Cursor) -> Result<(Vec<GridPosition>, u32), Error> {
    let mut positions = Vec::with_capacity(node_count(categories));
    let mut cursor = start;

    for category in categories {
        let need = i32::try_from(category.questions.len()).map_err(|_| too_large(category))?;

        if need + cursor.row < ROWS {
            place_block(&mut positions, &mut cursor, need);
        } else if LAST_ROW - cursor.row >= MIN_SPLIT_ROWS {
            place_split(&mut positions, &mut cursor, category, need)?;
        } else {
            cursor.next_column();
            if need < ROWS {
                place_block(&mut positions, &mut cursor, need);
            } else {
                // Not even a clean column holds it; split from the top instead of running off the grid.
                place_split(&mut positions, &mut cursor, category, need)?;
            }
        }
    }

    Ok((positions, cursor.column))
}

fn place_block(positions: &mut Vec<GridPosition>, cursor: &mut Cursor, need: i32) {
    positions.push(cursor.position());
    for _ in 0..need {
        cursor.row += 1;
        positions.push(cursor.position());
    }
    cursor.row += BLOCK_GAP;
}

/// Header stays in the current column; questions past the threshold row continue at
/// the top of the next column. At least two questions are carried over.
fn place_split(
    positions: &mut Vec<GridPosition>,
    cursor: &mut Cursor,
    category: &Category,
    need: i32,
) -> Result<(), Error> {
    let threshold = if need - (LAST_ROW - cursor.row) >= 2 {
        LAST_ROW
    } else {
        LAST_ROW - 1
    };

    positions.push(cursor.position());
    let mut split = false;
    for index in 0..need {
        cursor.row += 1;
        positions.push(cursor.position());
        if cursor.row == threshold && index != need - 1 {
            if split {
                return Err(too_large(category));
            }
            split = true;
            cursor.column += 1;
            cursor.row = -1;
        }
    }
    cursor.row += BLOCK_GAP;
    Ok(())
}

fn too_large(category: &Category) -> Error {
    Error::CategoryTooLarge {
        category: category.name.clone(),
        questions: category.questions.len(),
    }
}
