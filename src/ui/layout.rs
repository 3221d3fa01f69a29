use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Split the screen into the main area and a one-line help bar
pub fn create_layout_with_help(area: Rect) -> (Rect, Rect) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    (vertical[0], vertical[1])
}

/// A centered overlay of `percent_w` x `percent_h`, never smaller than
/// `min_w` x `min_h` and always leaving a two-cell margin.
pub fn centered_area(total: Rect, percent_w: u16, percent_h: u16, min_w: u16, min_h: u16) -> Rect {
    let width = (total.width * percent_w / 100)
        .max(min_w)
        .min(total.width.saturating_sub(4));
    let height = (total.height * percent_h / 100)
        .max(min_h)
        .min(total.height.saturating_sub(4));

    let x = total.x + total.width.saturating_sub(width) / 2;
    let y = total.y + total.height.saturating_sub(height) / 2;

    Rect::new(x, y, width, height)
}

/// Split `area` into a one-line input row and the rest
pub fn input_and_list(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);
    (chunks[0], chunks[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_bar_is_last_line() {
        let (main, help) = create_layout_with_help(Rect::new(0, 0, 80, 24));
        assert_eq!(main.height, 23);
        assert_eq!(help, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn centered_area_respects_minimum_and_margin() {
        let area = centered_area(Rect::new(0, 0, 100, 40), 60, 50, 50, 10);
        assert_eq!(area, Rect::new(20, 10, 60, 20));

        let small = centered_area(Rect::new(0, 0, 40, 12), 60, 50, 50, 10);
        assert_eq!(small.width, 36);
        assert_eq!(small.height, 8);
    }
}
