use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// A player in a game. The remote player's moves come from the
/// external move-selection service, the human's from the client.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Remote,
    Human,
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::Remote => Player::Human,
            Player::Human => Player::Remote,
        }
    }

    /// Cell value in the wire encoding sent to the move provider.
    pub fn wire_value(self) -> u8 {
        match self {
            Player::Remote => 1,
            Player::Human => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Draw,
}

/// A rejected drop. The board is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("game is already over")]
    GameOver,
    #[error("it is not {0:?}'s turn")]
    NotYourTurn(Player),
    #[error("column {0} is out of range")]
    OutOfRange(usize),
    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// The cell affected by a successful drop.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedPiece {
    pub row: usize,
    pub column: usize,
    pub player: Player,
}

/// Authoritative state for one connect-four game.
///
/// Row 0 is the top of the board. Pieces stack from the bottom: each
/// column keeps a fill pointer holding the next free row index,
/// starting at `rows - 1` and counting down; a negative pointer means
/// the column is full.
pub struct GameEngine {
    rows: usize,
    cols: usize,
    win_length: usize,
    first_player: Player,
    board: Vec<Vec<Option<Player>>>,
    col_fills: Vec<isize>,
    turn: Player,
    status: GameStatus,
}

impl GameEngine {
    pub fn new(config: &GameConfig) -> Self {
        let mut engine = GameEngine {
            rows: config.rows,
            cols: config.cols,
            win_length: config.win_length,
            first_player: config.first_player,
            board: Vec::new(),
            col_fills: Vec::new(),
            turn: config.first_player,
            status: GameStatus::InProgress,
        };
        engine.reset();
        engine
    }

    /// Clear the board and return to the initial state. The designated
    /// first mover opens the next game regardless of who just moved.
    pub fn reset(&mut self) {
        self.board = vec![vec![None; self.cols]; self.rows];
        self.col_fills = vec![self.rows as isize - 1; self.cols];
        self.turn = self.first_player;
        self.status = GameStatus::InProgress;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_player(&self) -> Player {
        self.turn
    }

    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Drop a piece for `player` into `column`.
    ///
    /// The piece lands on the column's fill pointer row and the win and
    /// draw checks run for the mover before the turn flips. A win on the
    /// board-filling move takes precedence over the draw.
    pub fn drop_piece(&mut self, column: usize, player: Player) -> Result<PlacedPiece, IllegalMove> {
        if self.status != GameStatus::InProgress {
            return Err(IllegalMove::GameOver);
        }
        if player != self.turn {
            return Err(IllegalMove::NotYourTurn(player));
        }
        if column >= self.cols {
            return Err(IllegalMove::OutOfRange(column));
        }
        let row = self.col_fills[column];
        if row < 0 {
            return Err(IllegalMove::ColumnFull(column));
        }

        let row = row as usize;
        self.board[row][column] = Some(player);
        self.col_fills[column] -= 1;

        if self.check_winner(player) {
            self.status = GameStatus::Won(player);
        } else if self.check_draw() {
            self.status = GameStatus::Draw;
        } else {
            self.turn = player.other();
        }

        Ok(PlacedPiece { row, column, player })
    }

    /// Whether `player` has a run of `win_length` anywhere on the board,
    /// horizontally, vertically, or along either diagonal.
    pub fn check_winner(&self, player: Player) -> bool {
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        let target = Some(player);

        for r in 0..self.rows as isize {
            for c in 0..self.cols as isize {
                'direction: for (dr, dc) in DIRECTIONS {
                    for i in 0..self.win_length as isize {
                        let row = r + dr * i;
                        let col = c + dc * i;
                        if row < 0
                            || row >= self.rows as isize
                            || col < 0
                            || col >= self.cols as isize
                            || self.board[row as usize][col as usize] != target
                        {
                            continue 'direction;
                        }
                    }
                    return true;
                }
            }
        }
        false
    }

    /// Whether the board is completely full with no winner for either
    /// player.
    pub fn check_draw(&self) -> bool {
        self.col_fills.iter().all(|&row| row < 0)
            && !self.check_winner(Player::Remote)
            && !self.check_winner(Player::Human)
    }

    /// The full board as the move provider expects it: 0 = empty,
    /// 1 = remote player, 2 = human player, row-major, top row first.
    pub fn wire_grid(&self) -> Vec<Vec<u8>> {
        self.board
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(0, Player::wire_value))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::new(&GameConfig::default())
    }

    /// Drop a piece for `player` regardless of whose turn it is, as if
    /// the other player passed.
    fn force_drop(engine: &mut GameEngine, column: usize, player: Player) -> PlacedPiece {
        engine.turn = player;
        engine.drop_piece(column, player).unwrap()
    }

    /// Fill the engine bottom row first from a top-row-first grid of
    /// wire values (0 = leave empty, 1 = remote, 2 = human).
    fn fill_from_rows(engine: &mut GameEngine, grid: &[[u8; 7]; 6]) {
        for row in (0..6).rev() {
            for col in 0..7 {
                match grid[row][col] {
                    0 => {}
                    1 => {
                        force_drop(engine, col, Player::Remote);
                    }
                    2 => {
                        force_drop(engine, col, Player::Human);
                    }
                    other => panic!("bad cell value {other}"),
                }
            }
        }
    }

    fn assert_gravity(engine: &GameEngine) {
        let grid = engine.wire_grid();
        for col in 0..engine.cols() {
            for row in 1..engine.rows() {
                if grid[row][col] == 0 {
                    assert_eq!(grid[row - 1][col], 0, "piece floating above ({row},{col})");
                }
            }
        }
    }

    #[test]
    fn first_mover_opens() {
        let engine = engine();
        assert_eq!(engine.current_player(), Player::Remote);
        assert_eq!(engine.status(), GameStatus::InProgress);
    }

    #[test]
    fn pieces_stack_from_the_bottom() {
        let mut engine = engine();
        let first = engine.drop_piece(3, Player::Remote).unwrap();
        assert_eq!((first.row, first.column), (5, 3));
        let second = engine.drop_piece(3, Player::Human).unwrap();
        assert_eq!((second.row, second.column), (4, 3));

        let grid = engine.wire_grid();
        assert_eq!(grid[5][3], 1);
        assert_eq!(grid[4][3], 2);
        assert_gravity(&engine);
    }

    #[test]
    fn gravity_holds_over_a_scattered_sequence() {
        let mut engine = engine();
        for (i, col) in [3, 3, 0, 6, 3, 0, 2, 5, 2, 1, 4, 6].into_iter().enumerate() {
            let player = if i % 2 == 0 { Player::Remote } else { Player::Human };
            force_drop(&mut engine, col, player);
            assert_gravity(&engine);
        }
    }

    #[test]
    fn turn_alternates_after_each_drop() {
        let mut engine = engine();
        engine.drop_piece(0, Player::Remote).unwrap();
        assert_eq!(engine.current_player(), Player::Human);
        engine.drop_piece(1, Player::Human).unwrap();
        assert_eq!(engine.current_player(), Player::Remote);
    }

    #[test]
    fn wrong_player_is_rejected_without_mutation() {
        let mut engine = engine();
        let before = engine.wire_grid();
        assert_eq!(
            engine.drop_piece(0, Player::Human),
            Err(IllegalMove::NotYourTurn(Player::Human))
        );
        assert_eq!(engine.wire_grid(), before);
        assert_eq!(engine.current_player(), Player::Remote);
    }

    #[test]
    fn full_column_is_rejected_without_mutation() {
        let mut engine = engine();
        for i in 0..6 {
            let player = if i % 2 == 0 { Player::Remote } else { Player::Human };
            force_drop(&mut engine, 2, player);
        }
        let before = engine.wire_grid();
        engine.turn = Player::Remote;
        assert_eq!(
            engine.drop_piece(2, Player::Remote),
            Err(IllegalMove::ColumnFull(2))
        );
        assert_eq!(engine.wire_grid(), before);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.current_player(), Player::Remote);
    }

    #[test]
    fn out_of_range_column_is_rejected() {
        let mut engine = engine();
        assert_eq!(
            engine.drop_piece(7, Player::Remote),
            Err(IllegalMove::OutOfRange(7))
        );
    }

    #[test]
    fn four_drops_in_one_column_win() {
        let mut engine = engine();
        for _ in 0..3 {
            force_drop(&mut engine, 0, Player::Remote);
        }
        assert_eq!(engine.status(), GameStatus::InProgress);
        let placed = force_drop(&mut engine, 0, Player::Remote);
        assert_eq!(placed.row, 2);
        assert!(engine.check_winner(Player::Remote));
        assert_eq!(engine.status(), GameStatus::Won(Player::Remote));
    }

    #[test]
    fn horizontal_run_wins() {
        let mut engine = engine();
        for col in 0..4 {
            force_drop(&mut engine, col, Player::Human);
        }
        assert!(engine.check_winner(Player::Human));
        assert_eq!(engine.status(), GameStatus::Won(Player::Human));
    }

    #[test]
    fn broken_horizontal_run_does_not_win() {
        let mut engine = engine();
        for col in [0, 1, 2, 4] {
            force_drop(&mut engine, col, Player::Human);
        }
        assert!(!engine.check_winner(Player::Human));
        assert_eq!(engine.status(), GameStatus::InProgress);
    }

    #[test]
    fn diagonal_up_run_wins() {
        let mut engine = engine();
        let grid = [
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 1, 0, 0, 0],
            [0, 0, 1, 2, 0, 0, 0],
            [0, 1, 2, 2, 0, 0, 0],
            [1, 2, 2, 1, 0, 0, 0],
        ];
        fill_from_rows(&mut engine, &grid);
        assert!(engine.check_winner(Player::Remote));
        assert!(!engine.check_winner(Player::Human));
    }

    #[test]
    fn diagonal_down_run_wins() {
        let mut engine = engine();
        let grid = [
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 2, 0, 0, 0],
            [0, 0, 0, 1, 2, 0, 0],
            [0, 0, 0, 2, 1, 2, 0],
            [0, 0, 0, 1, 1, 1, 2],
        ];
        fill_from_rows(&mut engine, &grid);
        assert!(engine.check_winner(Player::Human));
        assert!(!engine.check_winner(Player::Remote));
    }

    // Alternating colors horizontally with two-row bands vertically:
    // no four-in-a-row anywhere once the board is full.
    const DRAW_GRID: [[u8; 7]; 6] = [
        [1, 2, 1, 2, 1, 2, 1],
        [1, 2, 1, 2, 1, 2, 1],
        [2, 1, 2, 1, 2, 1, 2],
        [2, 1, 2, 1, 2, 1, 2],
        [1, 2, 1, 2, 1, 2, 1],
        [1, 2, 1, 2, 1, 2, 1],
    ];

    #[test]
    fn full_board_without_a_run_is_a_draw() {
        let mut engine = engine();
        fill_from_rows(&mut engine, &DRAW_GRID);
        assert!(engine.check_draw());
        assert_eq!(engine.status(), GameStatus::Draw);
    }

    #[test]
    fn board_filling_win_takes_precedence_over_draw() {
        let mut engine = engine();
        // DRAW_GRID with column 0 rearranged so the last empty cell,
        // (0, 0), completes a vertical run of remote pieces.
        let grid = [
            [0, 2, 1, 2, 1, 2, 1],
            [1, 2, 1, 2, 1, 2, 1],
            [1, 1, 2, 1, 2, 1, 2],
            [1, 1, 2, 1, 2, 1, 2],
            [2, 2, 1, 2, 1, 2, 1],
            [2, 2, 1, 2, 1, 2, 1],
        ];
        fill_from_rows(&mut engine, &grid);
        assert_eq!(engine.status(), GameStatus::InProgress);

        let placed = force_drop(&mut engine, 0, Player::Remote);
        assert_eq!((placed.row, placed.column), (0, 0));
        assert_eq!(engine.status(), GameStatus::Won(Player::Remote));
        assert!(!engine.check_draw());
    }

    #[test]
    fn terminal_game_rejects_further_drops() {
        let mut engine = engine();
        for _ in 0..4 {
            force_drop(&mut engine, 0, Player::Remote);
        }
        assert_eq!(engine.status(), GameStatus::Won(Player::Remote));

        engine.turn = Player::Human;
        let before = engine.wire_grid();
        assert_eq!(engine.drop_piece(1, Player::Human), Err(IllegalMove::GameOver));
        assert_eq!(engine.wire_grid(), before);
        assert_eq!(engine.status(), GameStatus::Won(Player::Remote));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut engine = engine();
        for _ in 0..4 {
            force_drop(&mut engine, 0, Player::Remote);
        }
        assert!(engine.is_terminal());

        engine.reset();
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.current_player(), Player::Remote);
        assert!(engine.wire_grid().iter().flatten().all(|&cell| cell == 0));
        assert_eq!(engine.col_fills, vec![5; 7]);
    }

    #[test]
    fn wire_grid_encodes_players() {
        let mut engine = engine();
        engine.drop_piece(0, Player::Remote).unwrap();
        engine.drop_piece(6, Player::Human).unwrap();

        let grid = engine.wire_grid();
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0].len(), 7);
        assert_eq!(grid[5][0], 1);
        assert_eq!(grid[5][6], 2);
        assert_eq!(grid[0][0], 0);
    }
}
