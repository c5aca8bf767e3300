use std::fmt::Write;

use slytherin_common::games::snake::{
    display_name, ordinal_label, FoodType, Point, SessionSnapshot, SessionStatus,
};

const HEAD: char = '@';
const BODY: char = 'o';
const HURDLE: char = 'X';
const EMPTY: char = '.';
const BORDER: char = '#';

fn food_char(food_type: FoodType) -> char {
    match food_type {
        FoodType::Normal => '*',
        FoodType::Bonus => '$',
        FoodType::Bomb => '!',
    }
}

fn status_line(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::NotStarted => "Press n to start",
        SessionStatus::Running => "Running",
        SessionStatus::Paused => "Paused (p to resume)",
        SessionStatus::Over => "Game over (n for a new game)",
    }
}

fn build_grid(snapshot: &SessionSnapshot) -> Vec<Vec<char>> {
    let mut grid = vec![vec![EMPTY; snapshot.field_width]; snapshot.field_height];
    let mut put = |point: Point, c: char| {
        if point.x >= 0
            && point.y >= 0
            && let Some(cell) = grid
                .get_mut(point.y as usize)
                .and_then(|row| row.get_mut(point.x as usize))
        {
            *cell = c;
        }
    };

    for hurdle in &snapshot.hurdles {
        put(*hurdle, HURDLE);
    }
    // Blinking is flagged in the header rather than by hiding the cell.
    if let Some(food) = snapshot.food {
        put(food.position, food_char(food.food_type));
    }
    for segment in snapshot.snake.iter().skip(1) {
        put(*segment, BODY);
    }
    if let Some(head) = snapshot.snake.first() {
        put(*head, HEAD);
    }
    grid
}

/// Draws the board, a status header and the top of the leaderboard.
pub fn render_frame(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Level {} | Score {} | High {} | {} | {}",
        snapshot.level,
        snapshot.score,
        snapshot.highest_score,
        snapshot.player_name,
        status_line(snapshot.status)
    );

    if let (Some(food), Some(left)) = (snapshot.food, snapshot.special_time_left) {
        let _ = writeln!(
            out,
            "{:?} food: {:.1}s left{}",
            food.food_type,
            left.as_secs_f32(),
            if snapshot.food_blinking { " (blinking)" } else { "" }
        );
    }

    let border: String = std::iter::repeat_n(BORDER, snapshot.field_width + 2).collect();
    let _ = writeln!(out, "{}", border);
    for row in build_grid(snapshot) {
        let line: String = row.into_iter().collect();
        let _ = writeln!(out, "{}{}{}", BORDER, line, BORDER);
    }
    let _ = writeln!(out, "{}", border);

    for (index, entry) in snapshot.top_entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4} {:<11} {}",
            ordinal_label(index),
            display_name(&entry.name),
            entry.score
        );
    }

    out
}
