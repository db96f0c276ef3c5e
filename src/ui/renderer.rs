/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The board bumps a revision on every write; frames where neither the
/// revision, the screen nor the terminal size changed are skipped.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::{CellColor, Position};
use crate::sim::board::Board;
use crate::sim::screen::Screen;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Sky backdrop behind and around the grid.
    const BASE_BG: Color = Color::Rgb { r: 40, g: 110, b: 160 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 4],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("?")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }
}

// ── Layout ──

/// Each grid cell is two terminal columns wide.
const CELL_W: usize = 2;

const TITLE_ROW: usize = 0;
const GRID_ROW: usize = 2;
const GRID_COL: usize = 2;

const CELL_WHITE: Color = Color::Rgb { r: 240, g: 244, b: 248 };
const CELL_GREEN: Color = Color::Rgb { r: 70, g: 170, b: 80 };

/// Map a terminal cell to a grid position, if it lands on the grid.
pub fn screen_to_grid(x: u16, y: u16, grid_w: i32, grid_h: i32) -> Option<Position> {
    let (x, y) = (x as usize, y as usize);
    if x < GRID_COL || y < GRID_ROW {
        return None;
    }
    let pos = Position::new(((x - GRID_COL) / CELL_W) as i32, (y - GRID_ROW) as i32);
    pos.in_bounds(grid_w, grid_h).then_some(pos)
}

fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Title => " Space/Enter/Click: Start   Esc/Q: Quit   Pad: Start/A",
        Screen::Playing => " WASD/Arrows: Move   Click: Column   Wheel: Up/Down   Esc: Quit",
        Screen::Ending(_) => " Esc/Q: Quit",
    }
}

/// Build one frame of the board into `buf`.
fn compose(buf: &mut FrameBuffer, board: &Board, screen: Screen) {
    let title = " Raindrop Journey ";
    buf.put_str(GRID_COL, TITLE_ROW, title, Color::White, Cell::BASE_BG);

    for gy in 0..board.height() {
        let row = GRID_ROW + gy as usize;
        if row >= buf.height { break; }
        for gx in 0..board.width() {
            let col = GRID_COL + gx as usize * CELL_W;
            if col + 1 >= buf.width { break; }

            let cell = board.cell(Position::new(gx, gy));
            let bg = match cell.color {
                CellColor::White => CELL_WHITE,
                CellColor::Green => CELL_GREEN,
            };
            match cell.glyph {
                Some(g) if g.is_wide() => {
                    buf.set(col, row, Cell::from_char_wide(g.symbol(), Color::Black, bg));
                    buf.set(col + 1, row, Cell { bg, ..Cell::WIDE_CONT });
                }
                Some(g) => {
                    buf.set(col, row, Cell::from_char(g.symbol(), Color::DarkBlue, bg));
                    buf.set(col + 1, row, Cell::from_char(' ', Color::Black, bg));
                }
                None => {
                    buf.set(col, row, Cell::from_char(' ', Color::Black, bg));
                    buf.set(col + 1, row, Cell::from_char(' ', Color::Black, bg));
                }
            }
        }
    }

    let status_row = GRID_ROW + board.height() as usize + 1;
    if status_row < buf.height {
        buf.put_str(GRID_COL, status_row, board.status(), Color::White, Cell::BASE_BG);
    }
    let help_row = status_row + 2;
    if help_row < buf.height {
        buf.put_str(0, help_row, help_text(screen), Color::Rgb { r: 200, g: 220, b: 235 }, Cell::BASE_BG);
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_frame: Option<(u64, Screen)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_frame: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, board: &Board, screen: Screen) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            self.last_frame = None;
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        let frame = (board.revision(), screen);
        if self.last_frame == Some(frame) {
            return Ok(());
        }
        self.last_frame = Some(frame);

        self.front.clear();
        compose(&mut self.front, board, screen);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Right half of a wide glyph is printed with its left half.
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Glyph;
    use crate::sim::services::GridSurface;

    #[test]
    fn clicks_map_to_cells() {
        assert_eq!(screen_to_grid(2, 2, 11, 11), Some(Position::new(0, 0)));
        assert_eq!(screen_to_grid(3, 2, 11, 11), Some(Position::new(0, 0)));
        assert_eq!(screen_to_grid(4, 5, 11, 11), Some(Position::new(1, 3)));
        assert_eq!(screen_to_grid(23, 12, 11, 11), Some(Position::new(10, 10)));
        assert_eq!(screen_to_grid(24, 2, 11, 11), None);
        assert_eq!(screen_to_grid(1, 2, 11, 11), None);
        assert_eq!(screen_to_grid(5, 13, 11, 11), None);
    }

    #[test]
    fn compose_draws_glyphs_colors_and_status() {
        let mut board = Board::new(3, 3);
        board.set_glyph(Position::new(1, 0), Some(Glyph::Raindrop));
        board.set_glyph(Position::new(2, 1), Some(Glyph::Cloud));
        board.set_color(Position::new(0, 2), CellColor::Green);
        board.set_status("hello");

        let mut buf = FrameBuffer::new(40, 12);
        compose(&mut buf, &board, Screen::Playing);

        let drop = buf.get(GRID_COL + 2, GRID_ROW);
        assert_eq!(drop.as_str(), "☔");
        assert!(drop.wide);
        assert!(buf.get(GRID_COL + 3, GRID_ROW).cont);

        let cloud = buf.get(GRID_COL + 4, GRID_ROW + 1);
        assert_eq!(cloud.as_str(), "☁");
        assert!(!cloud.wide);

        assert_eq!(buf.get(GRID_COL, GRID_ROW + 2).bg, CELL_GREEN);
        assert_eq!(buf.get(GRID_COL + 2, GRID_ROW + 2).bg, CELL_WHITE);

        let status_row = GRID_ROW + 3 + 1;
        let text: String = (0..5).map(|i| buf.get(GRID_COL + i, status_row).as_str().to_string()).collect();
        assert_eq!(text, "hello");
    }

    #[test]
    fn compose_clips_to_small_terminal() {
        let board = Board::new(11, 11);
        let mut buf = FrameBuffer::new(8, 4);
        compose(&mut buf, &board, Screen::Title);
        assert_eq!(buf.cells.len(), 32);
    }
}
