use std::collections::HashSet;

use super::types::{FieldSize, Point};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

pub fn is_valid_level(level: u8) -> bool {
    (MIN_LEVEL..=MAX_LEVEL).contains(&level)
}

/// Hurdle cells for `level`, clipped to the field. `None` for unknown levels.
pub fn level_hurdles(level: u8, field_size: &FieldSize) -> Option<HashSet<Point>> {
    let cells: Vec<Point> = match level {
        1 => Vec::new(),
        2 => vec![Point::new(10, 10), Point::new(10, 11), Point::new(10, 12)],
        3 => vec![
            Point::new(5, 5),
            Point::new(6, 5),
            Point::new(7, 5),
            Point::new(12, 15),
            Point::new(13, 15),
            Point::new(14, 15),
        ],
        4 => (6..14)
            .map(|x| Point::new(x, 10))
            .chain((6..14).map(|y| Point::new(10, y)))
            .collect(),
        5 => (0..20)
            .filter(|i| *i != 5 && *i != 15)
            .flat_map(|i| [Point::new(i, 10), Point::new(10, i)])
            .collect(),
        _ => return None,
    };

    Some(cells.into_iter().filter(|p| field_size.contains(*p)).collect())
}
