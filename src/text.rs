use crate::error::Error;

/// Split `text` at the space closest to its middle (by character count) for a
/// two-line label. The space itself is dropped. Ties go to the earlier space.
pub fn split_sentence(text: &str) -> Result<(&str, &str), Error> {
    let boundaries: Vec<(usize, char)> = text.char_indices().collect();
    let mid = boundaries.len() / 2;
    let is_space = |i: &usize| boundaries[*i].1 == ' ';

    let after = (mid..boundaries.len()).find(is_space);
    // Index 0 is never a boundary on the backward scan: it would leave an empty first line.
    let before = (1..=mid.min(boundaries.len().saturating_sub(1))).rev().find(is_space);

    let split_at = match (before, after) {
        (Some(b), Some(a)) if a - mid < mid - b => a,
        (Some(b), _) => b,
        (None, Some(a)) => a,
        (None, None) => return Err(Error::NoSplitPoint(text.to_string())),
    };

    let byte = boundaries[split_at].0;
    Ok((&text[..byte], &text[byte + 1..]))
}
