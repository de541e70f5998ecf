use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::board::{Block, Board, coord};

/// A falling piece: a shape matrix of one kind at a position on the board.
///
/// The position is the board coordinate of the matrix's top-left cell. Pieces
/// are plain values; movement and rotation return new `Piece` instances that
/// the caller checks against the board before committing.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::default();
/// let piece = Piece::spawn(PieceKind::T, &board);
/// assert_eq!((piece.position().x(), piece.position().y()), (4, 0));
///
/// let moved = piece.shifted(-1, 0);
/// assert!(!board.is_colliding(&moved));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: PieceShape,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece in its canonical orientation at the origin.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            position: PiecePosition::default(),
        }
    }

    /// Creates a piece in its canonical orientation at the board's spawn position.
    #[must_use]
    pub fn spawn(kind: PieceKind, board: &Board) -> Self {
        let shape = kind.shape();
        Self {
            kind,
            shape,
            position: board.spawn_position(&shape),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn with_position(self, position: PiecePosition) -> Self {
        Self { position, ..self }
    }

    /// Returns the board coordinates covered by the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_cells()
            .map(move |(dx, dy, _)| (self.position.x + dx, self.position.y + dy))
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        self.with_position(PiecePosition::new(
            self.position.x + dx,
            self.position.y + dy,
        ))
    }

    /// Returns the piece rotated 90° clockwise in place, without any kick.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..*self
        }
    }

    /// Rotates the piece clockwise, searching for a horizontal kick if the rotation collides.
    ///
    /// Kick offsets are applied cumulatively in the order `1, -2, 3, -4, ...`
    /// (net shifts of `+1, -1, +2, -2, ...` columns), stopping at the first
    /// collision-free position. The search gives up as soon as the next
    /// offset would exceed the shape width, so 3- and 4-wide shapes try net
    /// shifts `+1, -1, +2` only.
    ///
    /// Returns `None` when every candidate collides; the original piece is
    /// left untouched since pieces are values.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{Board, Piece, PieceKind, PiecePosition};
    ///
    /// let board = Board::default();
    /// // A vertical I piece hugging the right wall.
    /// let piece = Piece::new(PieceKind::I)
    ///     .rotated()
    ///     .with_position(PiecePosition::new(7, 5));
    /// assert!(!board.is_colliding(&piece));
    ///
    /// let rotated = piece.kicked_rotation(&board).unwrap();
    /// assert_eq!(rotated.position().x(), 6);
    /// ```
    #[must_use]
    pub fn kicked_rotation(&self, board: &Board) -> Option<Self> {
        let mut piece = self.rotated();
        let width = coord(piece.shape.width());
        let mut offset: i32 = 1;
        while board.is_colliding(&piece) {
            piece = piece.shifted(offset, 0);
            offset = -(offset + offset.signum());
            if offset > width {
                return None;
            }
        }
        Some(piece)
    }

    /// Returns the lowest collision-free position reachable by moving straight down.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let next = dropped.shifted(0, 1);
            if board.is_colliding(&next) {
                return dropped;
            }
            dropped = next;
        }
    }
}

/// Board coordinate of a piece's top-left matrix cell.
///
/// Coordinates are signed: kicks may push the matrix partially past the left
/// wall as long as its occupied cells stay inside the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }
}

/// Largest shape matrix dimension (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Square matrix of blocks describing a piece's footprint in one orientation.
///
/// Only the top-left `size × size` cells are meaningful. Every non-empty cell
/// holds the same piece kind; rotation preserves this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceShape {
    size: usize,
    cells: [[Block; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl PieceShape {
    /// Matrix dimension (the matrix is square).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Matrix width; equal to [`Self::size`].
    #[must_use]
    pub const fn width(&self) -> usize {
        self.size
    }

    /// Returns the block at column `x`, row `y` of the matrix.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside the matrix.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Block {
        assert!(x < self.size && y < self.size, "({x}, {y}) out of shape");
        self.cells[y][x]
    }

    /// Returns an iterator over the matrix rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.cells[..self.size].iter().map(|row| &row[..self.size])
    }

    /// Returns `(x, y, block)` for every non-empty cell, in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, Block)> + '_ {
        self.rows().zip(0..).flat_map(|(row, y)| {
            row.iter()
                .zip(0..)
                .filter(|(block, _)| !block.is_empty())
                .map(move |(block, x)| (x, y, *block))
        })
    }

    /// Rotates the matrix 90° clockwise: transpose, then reverse every row.
    pub fn rotate(&mut self) {
        let n = self.size;
        for y in 0..n {
            for x in 0..y {
                let tmp = self.cells[x][y];
                self.cells[x][y] = self.cells[y][x];
                self.cells[y][x] = tmp;
            }
        }
        for row in &mut self.cells[..n] {
            row[..n].reverse();
        }
    }

    #[must_use]
    pub fn rotated(&self) -> Self {
        let mut shape = *self;
        shape.rotate();
        shape
    }
}

/// The seven piece kinds.
///
/// The discriminant is the cell value a locked block of this kind leaves on
/// the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// J-piece.
    J = 2,
    /// L-piece.
    L = 3,
    /// O-piece.
    O = 4,
    /// S-piece.
    S = 5,
    /// T-piece.
    T = 6,
    /// Z-piece.
    Z = 7,
}

/// Uniform choice among the seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the canonical (spawn orientation) shape of this kind.
    #[must_use]
    pub const fn shape(self) -> PieceShape {
        PIECE_SHAPES[self as usize - 1]
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

const PIECE_SHAPES: [PieceShape; PieceKind::LEN] = {
    use Block::Empty as E;
    const I: Block = Block::Piece(PieceKind::I);
    const J: Block = Block::Piece(PieceKind::J);
    const L: Block = Block::Piece(PieceKind::L);
    const O: Block = Block::Piece(PieceKind::O);
    const S: Block = Block::Piece(PieceKind::S);
    const T: Block = Block::Piece(PieceKind::T);
    const Z: Block = Block::Piece(PieceKind::Z);
    const EEEE: [Block; 4] = [E; 4];

    const fn shape(size: usize, cells: [[Block; 4]; 4]) -> PieceShape {
        PieceShape { size, cells }
    }

    [
        shape(4, [EEEE, [I, I, I, I], EEEE, EEEE]),
        shape(3, [[J, E, E, E], [J, J, J, E], EEEE, EEEE]),
        shape(3, [[E, E, L, E], [L, L, L, E], EEEE, EEEE]),
        shape(2, [[O, O, E, E], [O, O, E, E], EEEE, EEEE]),
        shape(3, [[E, S, S, E], [S, S, E, E], EEEE, EEEE]),
        shape(3, [[E, T, E, E], [T, T, T, E], EEEE, EEEE]),
        shape(3, [[Z, Z, E, E], [E, Z, Z, E], EEEE, EEEE]),
    ]
};
