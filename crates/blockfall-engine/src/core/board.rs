use std::collections::VecDeque;

use super::piece::{Piece, PieceKind, PiecePosition, PieceShape};

/// A single cell of the board.
///
/// Each cell maps losslessly to the integer cell value used by the game rules:
/// `0` is empty and `1..=7` is a locked block of the corresponding [`PieceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Block of a specific piece kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Block::Empty)
    }

    /// Returns the integer cell value (`0` for empty, `1..=7` for pieces).
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.value(),
        }
    }

    /// Parses an integer cell value, returning `None` for values above 7.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        if value == 0 {
            return Some(Block::Empty);
        }
        match PieceKind::from_value(value) {
            Some(kind) => Some(Block::Piece(kind)),
            None => None,
        }
    }
}

/// Fixed-size grid of locked blocks.
///
/// Rows are indexed top to bottom (`y = 0` is the top row) and columns left to
/// right. The dimensions never change after construction; only cell values do.
///
/// Out-of-bounds reads and writes through [`Board::get`] and [`Board::set`] are
/// caller errors and panic. Collision queries ([`Board::is_colliding`]) are the
/// bounds-checked way to look at arbitrary coordinates.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Block, Board, PieceKind};
///
/// let mut board = Board::default();
/// assert_eq!((board.width(), board.height()), (10, 20));
///
/// board.set(3, 19, Block::Piece(PieceKind::T));
/// assert_eq!(board.get(3, 19).value(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    rows: VecDeque<Vec<Block>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HEIGHT, Self::DEFAULT_WIDTH)
    }
}

impl Board {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;

    /// Creates an empty board with `rows` rows of `cols` cells.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board dimensions must be non-zero");
        Self {
            width: cols,
            rows: (0..rows).map(|_| vec![Block::Empty; cols]).collect(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Block {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y][x] = block;
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.rows.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows().flatten().all(|block| block.is_empty())
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|block| !block.is_empty())
    }

    /// Removes row `y` and inserts a fresh empty row at the top.
    ///
    /// Every row above `y` moves down by one; rows below are untouched.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn remove_row(&mut self, y: usize) {
        assert!(y < self.height(), "row {y} out of bounds");
        self.rows.remove(y);
        self.rows.push_front(vec![Block::Empty; self.width]);
    }

    /// Returns the position at which a freshly spawned `shape` is placed.
    ///
    /// The shape is horizontally centered (rounding left) on the top row.
    #[must_use]
    pub fn spawn_position(&self, shape: &PieceShape) -> PiecePosition {
        let x = coord(self.width / 2) - coord(shape.size() / 2);
        PiecePosition::new(x, 0)
    }

    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        self.is_shape_colliding(piece.shape(), piece.position())
    }

    /// Tests whether `shape` placed at `position` leaves the board or overlaps a locked block.
    ///
    /// A cell collides when it lies left or right of the board, below the bottom
    /// row, or on an occupied cell. Rows above the board count as empty.
    #[must_use]
    pub fn is_shape_colliding(&self, shape: &PieceShape, position: PiecePosition) -> bool {
        shape.occupied_cells().any(|(dx, dy, _)| {
            let Ok(x) = usize::try_from(position.x() + dx) else {
                return true;
            };
            if x >= self.width {
                return true;
            }
            let Ok(y) = usize::try_from(position.y() + dy) else {
                return false;
            };
            y >= self.height() || !self.get(x, y).is_empty()
        })
    }

    /// Writes the piece's blocks into the board.
    ///
    /// Locking requires a collision-free piece, but a topped-out piece may be
    /// drawn over the board too. Blocks outside the board are discarded.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let position = piece.position();
        for (dx, dy, block) in piece.shape().occupied_cells() {
            let (Ok(x), Ok(y)) = (
                usize::try_from(position.x() + dx),
                usize::try_from(position.y() + dy),
            ) else {
                continue;
            };
            if x < self.width && y < self.height() {
                self.set(x, y, block);
            }
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are scanned bottom to top. After a removal the same index is
    /// examined again, since the row above has moved into it.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height();
        while y > 0 {
            if self.is_row_full(y - 1) {
                self.remove_row(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }
}

pub(super) fn coord(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize, kind: PieceKind) {
        for x in 0..board.width() {
            board.set(x, y, Block::Piece(kind));
        }
    }

    fn piece_at(kind: PieceKind, x: i32, y: i32) -> Piece {
        Piece::new(kind).with_position(PiecePosition::new(x, y))
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(20, 10);
        assert_eq!(board.height(), 20);
        assert_eq!(board.width(), 10);
        assert!(board.is_empty());
        assert!(board.rows().all(|row| row.len() == 10));
    }

    #[test]
    fn test_block_value_conversion() {
        assert_eq!(Block::Empty.value(), 0);
        for kind in PieceKind::ALL {
            let block = Block::Piece(kind);
            assert_eq!(Block::from_value(block.value()), Some(block));
        }
        assert_eq!(Block::from_value(0), Some(Block::Empty));
        assert_eq!(Block::from_value(8), None);
    }

    #[test]
    fn test_remove_row_shifts_rows_above() {
        let mut board = Board::new(4, 3);
        board.set(0, 0, Block::Piece(PieceKind::I));
        board.set(1, 1, Block::Piece(PieceKind::J));
        board.set(2, 2, Block::Piece(PieceKind::L));
        board.set(0, 3, Block::Piece(PieceKind::O));

        board.remove_row(2);

        assert!(board.rows().next().unwrap().iter().all(|b| b.is_empty()));
        assert_eq!(board.get(0, 1), Block::Piece(PieceKind::I));
        assert_eq!(board.get(1, 2), Block::Piece(PieceKind::J));
        assert_eq!(board.get(0, 3), Block::Piece(PieceKind::O));
        assert_eq!(board.get(2, 2), Block::Empty);
    }

    #[test]
    fn test_collision_with_walls_and_floor() {
        let board = Board::default();
        // T occupies (1,0), (0,1), (1,1), (2,1) of its 3x3 box.
        assert!(!board.is_colliding(&piece_at(PieceKind::T, 0, 0)));
        assert!(board.is_colliding(&piece_at(PieceKind::T, -1, 0)));
        assert!(!board.is_colliding(&piece_at(PieceKind::T, 7, 0)));
        assert!(board.is_colliding(&piece_at(PieceKind::T, 8, 0)));
        assert!(!board.is_colliding(&piece_at(PieceKind::T, 3, 18)));
        assert!(board.is_colliding(&piece_at(PieceKind::T, 3, 19)));
    }

    #[test]
    fn test_empty_shape_cells_never_collide() {
        let board = Board::default();
        // The I piece's occupied row is the second one; the rest is transparent.
        assert!(!board.is_colliding(&piece_at(PieceKind::I, 0, 18)));
        assert!(!board.is_colliding(&piece_at(PieceKind::I, 6, 0)));
        assert!(board.is_colliding(&piece_at(PieceKind::I, 7, 0)));
    }

    #[test]
    fn test_rows_above_board_are_empty() {
        let board = Board::default();
        assert!(!board.is_colliding(&piece_at(PieceKind::T, 3, -1)));
        assert!(!board.is_colliding(&piece_at(PieceKind::O, 0, -2)));
        // Column bounds still apply above the board.
        assert!(board.is_colliding(&piece_at(PieceKind::O, -1, -2)));
        assert!(board.is_colliding(&piece_at(PieceKind::O, 9, -2)));
    }

    #[test]
    fn test_collision_with_locked_blocks() {
        let mut board = Board::default();
        board.set(4, 10, Block::Piece(PieceKind::Z));
        assert!(board.is_colliding(&piece_at(PieceKind::O, 3, 9)));
        assert!(board.is_colliding(&piece_at(PieceKind::O, 4, 10)));
        assert!(!board.is_colliding(&piece_at(PieceKind::O, 5, 9)));
        assert!(!board.is_colliding(&piece_at(PieceKind::O, 3, 11)));
    }

    #[test]
    fn test_fill_piece_discards_cells_outside_board() {
        let mut board = Board::new(20, 2);
        let piece = Piece::spawn(PieceKind::I, &board);
        assert_eq!(piece.position(), PiecePosition::new(-1, 0));
        assert!(board.is_colliding(&piece));

        board.fill_piece(&piece);
        assert_eq!(board.get(0, 1), Block::Piece(PieceKind::I));
        assert_eq!(board.get(1, 1), Block::Piece(PieceKind::I));

        let mut board = Board::new(4, 4);
        board.fill_piece(&piece_at(PieceKind::O, 1, 3));
        assert_eq!(board.get(1, 3), Block::Piece(PieceKind::O));
        assert_eq!(board.get(2, 3), Block::Piece(PieceKind::O));
    }

    #[test]
    fn test_fill_piece_writes_only_occupied_cells() {
        let mut board = Board::default();
        board.set(3, 17, Block::Piece(PieceKind::I));
        let piece = piece_at(PieceKind::S, 3, 17);
        board.fill_piece(&piece);

        // S occupies (1,0), (2,0), (0,1), (1,1); (0,0) is transparent.
        assert_eq!(board.get(3, 17), Block::Piece(PieceKind::I));
        assert_eq!(board.get(4, 17), Block::Piece(PieceKind::S));
        assert_eq!(board.get(5, 17), Block::Piece(PieceKind::S));
        assert_eq!(board.get(3, 18), Block::Piece(PieceKind::S));
        assert_eq!(board.get(4, 18), Block::Piece(PieceKind::S));
        assert_eq!(board.get(5, 18), Block::Empty);
        assert_eq!(board.get(3, 19), Block::Empty);
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::default();
        fill_row(&mut board, 19, PieceKind::I);
        board.set(0, 18, Block::Piece(PieceKind::T));
        board.set(9, 0, Block::Piece(PieceKind::Z));

        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board.get(0, 19), Block::Piece(PieceKind::T));
        assert_eq!(board.get(9, 1), Block::Piece(PieceKind::Z));
        assert!(board.rows().next().unwrap().iter().all(|b| b.is_empty()));
        assert!(!board.is_row_full(19));
    }

    #[test]
    fn test_clear_adjacent_lines_rechecks_same_index() {
        let mut board = Board::default();
        fill_row(&mut board, 16, PieceKind::L);
        fill_row(&mut board, 17, PieceKind::J);
        fill_row(&mut board, 18, PieceKind::O);
        board.set(2, 19, Block::Piece(PieceKind::S));
        board.set(5, 15, Block::Piece(PieceKind::T));

        assert_eq!(board.clear_lines(), 3);
        assert_eq!(board.get(2, 19), Block::Piece(PieceKind::S));
        assert_eq!(board.get(5, 18), Block::Piece(PieceKind::T));
        assert_eq!(board.rows().flatten().filter(|b| !b.is_empty()).count(), 2);
    }

    #[test]
    fn test_clear_separated_lines() {
        let mut board = Board::default();
        fill_row(&mut board, 19, PieceKind::I);
        board.set(1, 18, Block::Piece(PieceKind::T));
        fill_row(&mut board, 17, PieceKind::I);

        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.get(1, 19), Block::Piece(PieceKind::T));
        assert_eq!(board.rows().flatten().filter(|b| !b.is_empty()).count(), 1);
    }

    #[test]
    fn test_clear_no_lines_leaves_board_unchanged() {
        let mut board = Board::default();
        board.set(0, 19, Block::Piece(PieceKind::I));
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_spawn_position_is_centered() {
        let board = Board::default();
        assert_eq!(
            board.spawn_position(&PieceKind::O.shape()),
            PiecePosition::new(4, 0)
        );
        assert_eq!(
            board.spawn_position(&PieceKind::T.shape()),
            PiecePosition::new(4, 0)
        );
        assert_eq!(
            board.spawn_position(&PieceKind::I.shape()),
            PiecePosition::new(3, 0)
        );
    }
}
