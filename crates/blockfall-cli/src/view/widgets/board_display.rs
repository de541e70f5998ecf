use std::iter;

use blockfall_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use super::BlockDisplay;

/// The playfield with the falling piece drawn over the locked blocks.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Option<&'a Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        grid_len(self.board.width()) * BlockDisplay::WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        grid_len(self.board.height()) * BlockDisplay::HEIGHT
            + super::block_vertical_margin(self.block.as_ref())
    }
}

fn grid_len(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mut board = self.board.clone();
        if let Some(piece) = self.falling_piece {
            board.fill_piece(piece);
        }

        let col_constraints =
            (0..board.width()).map(|_| Constraint::Length(BlockDisplay::WIDTH));
        let row_constraints =
            (0..board.height()).map(|_| Constraint::Length(BlockDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        for (row_area, row) in iter::zip(vertical.split(area).iter(), board.rows()) {
            for (cell_area, block) in iter::zip(horizontal.split(*row_area).iter(), row) {
                BlockDisplay::from_block(*block).render(*cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Block, PieceKind, PiecePosition};

    use super::*;

    #[test]
    fn test_size_includes_border() {
        let board = Board::new(20, 10);
        let display = BoardDisplay::new(&board);
        assert_eq!((display.width(), display.height()), (20, 20));

        let display = display.block(BlockWidget::bordered());
        assert_eq!((display.width(), display.height()), (22, 22));
    }

    #[test]
    fn test_topped_out_piece_is_clipped_to_board() {
        let board = Board::new(4, 2);
        let piece = Piece::spawn(PieceKind::I, &board);
        assert!(board.is_colliding(&piece));
        let display = BoardDisplay::new(&board).falling_piece(Some(&piece));

        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        let row_text = |y: u16| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>();
        assert!(row_text(0).contains('.'));
        assert!(!row_text(1).contains('.'));
    }

    #[test]
    fn test_falling_piece_is_drawn_over_board() {
        let mut board = Board::new(4, 4);
        board.set(0, 3, Block::Piece(PieceKind::Z));
        let piece = Piece::new(PieceKind::O).with_position(PiecePosition::new(2, 0));
        let display = BoardDisplay::new(&board).falling_piece(Some(&piece));

        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        let cell_style = |x: u16, y: u16| buf[(x * BlockDisplay::WIDTH, y)].style();
        let expect = |block| {
            let mut expected = Buffer::empty(Rect::new(0, 0, 2, 1));
            BlockDisplay::from_block(block).render(expected.area, &mut expected);
            expected[(0, 0)].style()
        };
        assert_eq!(cell_style(2, 0), expect(Block::Piece(PieceKind::O)));
        assert_eq!(cell_style(3, 1), expect(Block::Piece(PieceKind::O)));
        assert_eq!(cell_style(0, 3), expect(Block::Piece(PieceKind::Z)));
        assert_eq!(cell_style(0, 0), expect(Block::Empty));
        assert!(board.get(2, 0).is_empty());
    }
}
