use std::collections::{HashSet, VecDeque};

use super::types::{Direction, Point};

#[derive(Clone, Debug)]
pub struct Snake {
    pub body: VecDeque<Point>,
    pub body_set: HashSet<Point>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
}

impl Snake {
    pub fn new(start_pos: Point, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();
        body.push_back(start_pos);
        body_set.insert(start_pos);

        Self {
            body,
            body_set,
            direction,
            pending_direction: None,
        }
    }

    /// Builds a snake from head-first segments. Returns `None` for an empty or
    /// self-overlapping body.
    pub fn from_segments(
        segments: impl IntoIterator<Item = Point>,
        direction: Direction,
    ) -> Option<Self> {
        let body: VecDeque<Point> = segments.into_iter().collect();
        let body_set: HashSet<Point> = body.iter().copied().collect();
        if body.is_empty() || body_set.len() != body.len() {
            return None;
        }

        Some(Self {
            body,
            body_set,
            direction,
            pending_direction: None,
        })
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.body_set.contains(&point)
    }

    pub fn segments(&self) -> Vec<Point> {
        self.body.iter().copied().collect()
    }

    /// Direction the next move will take.
    pub fn heading(&self) -> Direction {
        self.pending_direction.unwrap_or(self.direction)
    }

    /// Queues a turn for the next move. A reversal of the direction of the
    /// last move is refused.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(&self.direction) || direction == self.heading() {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    pub fn apply_pending_direction(&mut self) {
        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }
    }

    pub fn push_head(&mut self, head: Point) {
        self.body.push_front(head);
        self.body_set.insert(head);
    }

    pub fn pop_tail(&mut self) -> Point {
        let tail = self
            .body
            .pop_back()
            .expect("Snake body should never be empty");
        self.body_set.remove(&tail);
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snake_is_single_cell() {
        let snake = Snake::new(Point::new(0, 0), Direction::Right);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Point::new(0, 0));
        assert!(snake.contains(Point::new(0, 0)));
    }

    #[test]
    fn test_from_segments_rejects_overlap() {
        let overlapping = [Point::new(1, 1), Point::new(1, 2), Point::new(1, 1)];
        assert!(Snake::from_segments(overlapping, Direction::Up).is_none());
        assert!(Snake::from_segments([], Direction::Up).is_none());
    }

    #[test]
    fn test_steer_rejects_reverse() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Right);
        assert!(!snake.steer(Direction::Left));
        assert_eq!(snake.heading(), Direction::Right);

        assert!(snake.steer(Direction::Up));
        assert_eq!(snake.heading(), Direction::Up);
        assert_eq!(snake.direction, Direction::Right);
    }

    #[test]
    fn test_steer_checks_last_move_not_queued_turn() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Right);
        assert!(snake.steer(Direction::Up));
        // Still moving right, so left is a reversal even with up queued.
        assert!(!snake.steer(Direction::Left));
        assert!(snake.steer(Direction::Down));
        snake.apply_pending_direction();
        assert_eq!(snake.direction, Direction::Down);
        assert_eq!(snake.pending_direction, None);
    }

    #[test]
    fn test_push_and_pop_keep_set_in_sync() {
        let mut snake = Snake::new(Point::new(0, 0), Direction::Right);
        snake.push_head(Point::new(1, 0));
        assert_eq!(snake.segments(), vec![Point::new(1, 0), Point::new(0, 0)]);

        let tail = snake.pop_tail();
        assert_eq!(tail, Point::new(0, 0));
        assert!(!snake.contains(tail));
        assert_eq!(snake.len(), 1);
    }
}
