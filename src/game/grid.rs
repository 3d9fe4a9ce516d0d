use rand::{SeedableRng, rngs::StdRng, seq::IteratorRandom};
use tracing::{debug, info, warn};

use super::{
    canvas::{Canvas, Paint},
    cell::Cell,
    config::GridConfig,
    direction::Direction,
    error::GameError,
    snake::Snake,
};

/// What the head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// The move would leave the grid
    Boundary,
    /// The move would land on a snake segment
    SelfCollision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// Terminal; a grid never leaves this state
    GameOver(Collision),
}

/// Result of a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced { head: usize, ate_food: bool },
    Collided(Collision),
}

/// Result of a frame tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The move interval has not elapsed yet
    Waiting,
    /// The game is over; nothing moved
    Halted,
    Moved(StepOutcome),
}

/// The playing field and the state machine driving it
pub struct Grid {
    config: GridConfig,
    cells: Vec<Cell>,
    snake: Snake,
    direction: Direction,
    status: GameStatus,
    /// Set once the snake moved since the last accepted direction change
    has_moved: bool,
    food: Option<usize>,
    last_move_ms: u64,
    rng: StdRng,
}

impl Grid {
    /// Build a grid with the snake at its centre, tail to the right of the
    /// head, heading right, and one food cell placed.
    pub fn new(config: GridConfig) -> Result<Self, GameError> {
        config.validate()?;

        let n = config.grid_size;
        let cells = (0..config.cell_count())
            .map(|index| Cell::new(index, &config))
            .collect();

        let centre = (n - 1) / 2;
        let head = centre * n + centre;
        let mut snake = Snake::new(head);
        snake.attach_child(head + 1);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut grid = Self {
            config,
            cells,
            snake,
            direction: Direction::default(),
            status: GameStatus::Running,
            has_moved: true,
            food: None,
            last_move_ms: 0,
            rng,
        };
        grid.spawn_food();

        debug!(grid_size = n, head, "grid created");
        Ok(grid)
    }

    /// Move once if more than the move interval elapsed since the last move
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        if now_ms.saturating_sub(self.last_move_ms) <= self.config.move_interval_ms {
            return TickOutcome::Waiting;
        }
        if self.is_game_over() {
            return TickOutcome::Halted;
        }

        let outcome = self.step();
        self.last_move_ms = now_ms;
        TickOutcome::Moved(outcome)
    }

    /// Move the snake one cell in the current direction, ignoring the clock
    ///
    /// After game over this is a no-op that reports the original collision.
    pub fn step(&mut self) -> StepOutcome {
        if let GameStatus::GameOver(cause) = self.status {
            return StepOutcome::Collided(cause);
        }

        let next = match self.next_cell() {
            Ok(next) => next,
            Err(cause) => {
                self.status = GameStatus::GameOver(cause);
                info!(?cause, length = self.snake.len(), "game over");
                return StepOutcome::Collided(cause);
            }
        };

        let vacated = self.snake.advance(next);
        let ate_food = self.cells[next].is_food;
        if ate_food {
            self.snake.attach_child(vacated);
            self.cells[next].is_food = false;
            self.food = None;
            debug!(length = self.snake.len(), "snake grew");
            self.spawn_food();
        }

        self.has_moved = true;
        StepOutcome::Advanced {
            head: next,
            ate_food,
        }
    }

    /// Request a new heading; returns whether it was accepted
    ///
    /// Reversals are refused, and so is a second change before the snake has
    /// moved, which would otherwise let two quick turns fold it onto itself.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if self.is_game_over() || !self.has_moved || self.direction.is_opposite(direction) {
            debug!(?direction, current = ?self.direction, "direction change ignored");
            return false;
        }

        self.direction = direction;
        self.has_moved = false;
        true
    }

    /// Place food on a free cell chosen uniformly at random
    ///
    /// Any food already on the grid is removed first. Returns `None` when the
    /// snake covers every cell.
    pub fn spawn_food(&mut self) -> Option<usize> {
        if let Some(old) = self.food.take() {
            self.cells[old].is_food = false;
        }

        let snake = &self.snake;
        let Some(index) = (0..self.cells.len())
            .filter(|&index| !snake.occupies(index))
            .choose(&mut self.rng)
        else {
            warn!("no free cell left for food");
            return None;
        };

        self.cells[index].is_food = true;
        self.food = Some(index);
        debug!(index, "food placed");
        Some(index)
    }

    /// Paint every cell, then every snake segment
    pub fn draw(&self, canvas: &mut impl Canvas) {
        for cell in &self.cells {
            let paint = if cell.is_food { Paint::Food } else { Paint::Empty };
            canvas.fill_cell(cell, paint);
        }
        for index in self.snake.segments() {
            canvas.fill_cell(&self.cells[index], Paint::Snake);
        }
    }

    /// Cell the head would enter next, or what it would hit instead
    fn next_cell(&self) -> Result<usize, Collision> {
        let n = self.config.grid_size as i64;
        let head = &self.cells[self.snake.head()];
        let (dx, dy) = self.direction.delta();

        let col = head.col() as i64 + dx as i64;
        let row = head.row() as i64 + dy as i64;
        if !(0..n).contains(&col) || !(0..n).contains(&row) {
            return Err(Collision::Boundary);
        }

        let next = (head.index() as isize + self.direction.index_offset(n as usize)) as usize;
        if self.snake.occupies(next) {
            return Err(Collision::SelfCollision);
        }
        Ok(next)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver(_))
    }

    pub fn food(&self) -> Option<usize> {
        self.food
    }

    /// Whether a snake segment currently sits on `index`
    pub fn is_occupied(&self, index: usize) -> bool {
        self.snake.occupies(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: usize) -> Grid {
        Grid::new(GridConfig {
            seed: Some(42),
            ..GridConfig::new(size)
        })
        .unwrap()
    }

    /// Move the food to a known cell
    fn place_food(grid: &mut Grid, index: usize) {
        if let Some(old) = grid.food.take() {
            grid.cells[old].is_food = false;
        }
        grid.cells[index].is_food = true;
        grid.food = Some(index);
    }

    fn chain(cells: &[usize]) -> Snake {
        let mut snake = Snake::new(cells[0]);
        for &cell in &cells[1..] {
            assert!(snake.attach_child(cell));
        }
        snake
    }

    fn food_cells(grid: &Grid) -> Vec<usize> {
        grid.cells()
            .iter()
            .filter(|c| c.is_food())
            .map(|c| c.index())
            .collect()
    }

    #[derive(Default)]
    struct RecordingCanvas {
        paints: Vec<(usize, Paint)>,
    }

    impl Canvas for RecordingCanvas {
        fn fill_cell(&mut self, cell: &Cell, paint: Paint) {
            self.paints.push((cell.index(), paint));
        }
    }

    #[test]
    fn test_spawn_layout() {
        let grid = grid(20);

        assert_eq!(grid.snake().head(), 189);
        assert_eq!(grid.snake().tail(), 190);
        assert_eq!(grid.snake().len(), 2);
        assert_eq!(grid.direction(), Direction::Right);
        assert_eq!(grid.status(), GameStatus::Running);
        assert_eq!(grid.cells().len(), 400);
    }

    #[test]
    fn test_head_spawns_in_interior() {
        for size in 3..=30 {
            let grid = grid(size);
            let head = grid.cell(grid.snake().head()).unwrap();

            assert!(head.row() > 0 && head.row() < size - 1, "size {size}");
            assert!(head.col() > 0 && head.col() < size - 1, "size {size}");
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(matches!(
            Grid::new(GridConfig::new(2)),
            Err(GameError::GridTooSmall { .. })
        ));
    }

    #[test]
    fn test_one_food_after_construction() {
        let grid = grid(20);
        let food = food_cells(&grid);

        assert_eq!(food.len(), 1);
        assert_eq!(grid.food(), Some(food[0]));
        assert!(!grid.is_occupied(food[0]));
    }

    #[test]
    fn test_first_tick_right_hits_tail() {
        let mut grid = grid(20);

        let outcome = grid.tick(201);

        assert_eq!(
            outcome,
            TickOutcome::Moved(StepOutcome::Collided(Collision::SelfCollision))
        );
        assert_eq!(grid.status(), GameStatus::GameOver(Collision::SelfCollision));
        assert_eq!(grid.snake().segments().collect::<Vec<_>>(), vec![189, 190]);
    }

    #[test]
    fn test_turn_up_then_tick() {
        let mut grid = grid(20);
        place_food(&mut grid, 0);

        assert!(grid.change_direction(Direction::Up));
        let outcome = grid.tick(201);

        assert_eq!(
            outcome,
            TickOutcome::Moved(StepOutcome::Advanced {
                head: 169,
                ate_food: false
            })
        );
        assert_eq!(grid.snake().segments().collect::<Vec<_>>(), vec![169, 189]);
        assert!(!grid.is_occupied(190));
        assert_eq!(grid.food(), Some(0));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut grid = grid(20);

        assert!(!grid.change_direction(Direction::Left));
        assert_eq!(grid.direction(), Direction::Right);
    }

    #[test]
    fn test_second_change_before_move_ignored() {
        let mut grid = grid(20);

        assert!(grid.change_direction(Direction::Up));
        assert!(!grid.change_direction(Direction::Left));
        assert_eq!(grid.direction(), Direction::Up);

        grid.step();
        assert!(grid.change_direction(Direction::Left));
        assert_eq!(grid.direction(), Direction::Left);
    }

    #[test]
    fn test_same_direction_consumes_move() {
        let mut grid = grid(20);

        assert!(grid.change_direction(Direction::Right));
        assert!(!grid.change_direction(Direction::Up));
    }

    #[test]
    fn test_food_consumption() {
        let mut grid = grid(20);
        place_food(&mut grid, 169);
        grid.change_direction(Direction::Up);

        let outcome = grid.step();

        assert_eq!(
            outcome,
            StepOutcome::Advanced {
                head: 169,
                ate_food: true
            }
        );
        assert_eq!(
            grid.snake().segments().collect::<Vec<_>>(),
            vec![169, 189, 190]
        );
        assert!(!grid.cell(169).unwrap().is_food());

        let food = food_cells(&grid);
        assert_eq!(food.len(), 1);
        assert_ne!(food[0], 169);
        assert!(!grid.is_occupied(food[0]));
    }

    #[test]
    fn test_grown_tail_follows() {
        let mut grid = grid(20);
        place_food(&mut grid, 169);
        grid.change_direction(Direction::Up);
        grid.step();
        place_food(&mut grid, 0);

        grid.step();

        assert_eq!(
            grid.snake().segments().collect::<Vec<_>>(),
            vec![149, 169, 189]
        );
        assert!(!grid.is_occupied(190));
    }

    #[test]
    fn test_wall_collision() {
        // 5x5: head at 12, tail at 13
        let mut grid = grid(5);
        place_food(&mut grid, 24);
        grid.change_direction(Direction::Up);

        assert!(matches!(grid.step(), StepOutcome::Advanced { head: 7, .. }));
        assert!(matches!(grid.step(), StepOutcome::Advanced { head: 2, .. }));
        let before: Vec<_> = grid.snake().segments().collect();

        assert_eq!(grid.step(), StepOutcome::Collided(Collision::Boundary));
        assert_eq!(grid.status(), GameStatus::GameOver(Collision::Boundary));
        assert_eq!(grid.snake().segments().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_no_wrap_at_row_edge() {
        let mut grid = grid(5);
        place_food(&mut grid, 24);
        grid.change_direction(Direction::Up);
        grid.step(); // head 7
        grid.change_direction(Direction::Left);
        grid.step(); // head 6
        grid.step(); // head 5, column 0

        assert_eq!(grid.snake().head(), 5);
        assert_eq!(grid.step(), StepOutcome::Collided(Collision::Boundary));
        assert!(!grid.is_occupied(4));
    }

    #[test]
    fn test_self_collision() {
        let mut grid = grid(10);
        place_food(&mut grid, 0);
        // Hook shape: head at 55 with the body curling below it
        grid.snake = chain(&[55, 56, 66, 65, 64]);
        grid.direction = Direction::Down;

        assert_eq!(grid.step(), StepOutcome::Collided(Collision::SelfCollision));
        assert_eq!(
            grid.status(),
            GameStatus::GameOver(Collision::SelfCollision)
        );
    }

    #[test]
    fn test_moving_into_tail_cell_collides() {
        let mut grid = grid(10);
        place_food(&mut grid, 0);
        // Square: the tail at 45 still counts as occupied when the head arrives
        grid.snake = chain(&[44, 34, 35, 45]);
        grid.direction = Direction::Right;

        assert_eq!(grid.step(), StepOutcome::Collided(Collision::SelfCollision));
    }

    #[test]
    fn test_tick_interval_gate() {
        let mut grid = grid(20);
        grid.change_direction(Direction::Up);

        assert_eq!(grid.tick(100), TickOutcome::Waiting);
        assert_eq!(grid.tick(200), TickOutcome::Waiting);
        assert!(matches!(grid.tick(201), TickOutcome::Moved(_)));
        assert_eq!(grid.tick(300), TickOutcome::Waiting);
        assert_eq!(grid.tick(401), TickOutcome::Waiting);
        assert!(matches!(grid.tick(402), TickOutcome::Moved(_)));
        assert_eq!(grid.snake().head(), 149);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut grid = grid(20);
        grid.tick(201);
        assert!(grid.is_game_over());
        let before: Vec<_> = grid.snake().segments().collect();

        assert_eq!(grid.tick(1000), TickOutcome::Halted);
        assert!(!grid.change_direction(Direction::Up));
        assert_eq!(
            grid.step(),
            StepOutcome::Collided(Collision::SelfCollision)
        );
        assert_eq!(grid.snake().segments().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_spawn_food_replaces_existing() {
        let mut grid = grid(20);

        for _ in 0..50 {
            let index = grid.spawn_food().unwrap();
            assert_eq!(food_cells(&grid), vec![index]);
            assert!(!grid.is_occupied(index));
        }
    }

    #[test]
    fn test_spawn_food_on_last_free_cell() {
        let mut grid = grid(3);
        grid.snake = chain(&[4, 5, 2, 1, 0, 3, 6, 7]);

        assert_eq!(grid.spawn_food(), Some(8));
    }

    #[test]
    fn test_spawn_food_full_grid() {
        let mut grid = grid(3);
        grid.snake = chain(&[4, 5, 2, 1, 0, 3, 6, 7, 8]);

        assert_eq!(grid.spawn_food(), None);
        assert_eq!(grid.food(), None);
        assert!(food_cells(&grid).is_empty());
    }

    #[test]
    fn test_same_seed_same_food() {
        assert_eq!(grid(20).food(), grid(20).food());
    }

    #[test]
    fn test_food_stays_unique_over_a_lap() {
        let mut grid = grid(20);
        grid.change_direction(Direction::Up);
        let turns = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];

        for turn in turns {
            for _ in 0..3 {
                if let StepOutcome::Collided(_) = grid.step() {
                    return;
                }
                assert_eq!(food_cells(&grid).len(), 1);
                let food = grid.food().unwrap();
                assert!(!grid.is_occupied(food));
            }
            grid.change_direction(turn);
        }
    }

    #[test]
    fn test_draw_paints_cells_then_snake() {
        let mut grid = grid(20);
        place_food(&mut grid, 0);
        let mut canvas = RecordingCanvas::default();

        grid.draw(&mut canvas);

        assert_eq!(canvas.paints.len(), 402);
        assert_eq!(canvas.paints[0], (0, Paint::Food));
        assert!(canvas.paints[1..400].iter().all(|(_, p)| *p == Paint::Empty));
        assert_eq!(canvas.paints[400..], [(189, Paint::Snake), (190, Paint::Snake)]);
    }
}
