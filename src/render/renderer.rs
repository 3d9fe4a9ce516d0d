use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Canvas, Cell, Collision, GameStatus, Grid, Paint};

/// Canvas that lays cells out by row and column, one glyph per cell
pub struct TerminalCanvas {
    size: usize,
    paints: Vec<Paint>,
}

impl TerminalCanvas {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            paints: vec![Paint::Empty; size * size],
        }
    }

    pub fn paint_at(&self, row: usize, col: usize) -> Paint {
        self.paints[row * self.size + col]
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        self.paints
            .chunks(self.size)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|paint| match paint {
                        Paint::Snake => Span::styled(
                            "■ ",
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Paint::Food => Span::styled(
                            "O ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Paint::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Canvas for TerminalCanvas {
    fn fill_cell(&mut self, cell: &Cell, paint: Paint) {
        self.paints[cell.row() * self.size + cell.col()] = paint;
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, grid: &Grid) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_status(grid), chunks[0]);

        let mut canvas = TerminalCanvas::new(grid.config().grid_size);
        grid.draw(&mut canvas);
        frame.render_widget(self.render_grid(&canvas, grid.status()), chunks[1]);

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, canvas: &TerminalCanvas, status: GameStatus) -> Paragraph<'static> {
        let border = match status {
            GameStatus::Running => Color::White,
            GameStatus::GameOver(_) => Color::Red,
        };

        Paragraph::new(canvas.lines())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_status(&self, grid: &Grid) -> Paragraph<'static> {
        let line = match grid.status() {
            GameStatus::Running => Line::from(vec![
                Span::styled("Heading: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:?}", grid.direction()),
                    Style::default().fg(Color::White),
                ),
            ]),
            GameStatus::GameOver(cause) => Line::from(vec![
                Span::styled(
                    "GAME OVER",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(collision_text(cause), Style::default().fg(Color::Gray)),
            ]),
        };

        Paragraph::new(line).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" new game | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn collision_text(cause: Collision) -> &'static str {
    match cause {
        Collision::Boundary => "hit the wall",
        Collision::SelfCollision => "ran into itself",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GridConfig;

    #[test]
    fn test_canvas_mirrors_grid() {
        let grid = Grid::new(GridConfig {
            seed: Some(1),
            ..GridConfig::new(10)
        })
        .unwrap();
        let mut canvas = TerminalCanvas::new(10);

        grid.draw(&mut canvas);

        // 10x10: head at (4, 4), tail at (4, 5)
        assert_eq!(canvas.paint_at(4, 4), Paint::Snake);
        assert_eq!(canvas.paint_at(4, 5), Paint::Snake);

        let food = grid.cell(grid.food().unwrap()).unwrap();
        assert_eq!(canvas.paint_at(food.row(), food.col()), Paint::Food);
        assert_eq!(canvas.lines().len(), 10);
    }

    #[test]
    fn test_collision_text() {
        assert_eq!(collision_text(Collision::Boundary), "hit the wall");
        assert_eq!(collision_text(Collision::SelfCollision), "ran into itself");
    }
}
