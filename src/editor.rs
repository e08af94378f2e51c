use crate::error::Result;
use crate::input::InputSeq;
use crate::screen::Screen;
use crate::status_bar::StatusBar;
use crate::text_buffer::{CursorDir, TextBuffer};
use std::io::Write;
use std::path::Path;

const CTRL_Q: u8 = 0x11;

pub struct Editor<I: Iterator<Item = Result<InputSeq>>, W: Write> {
    input: I, // Escape sequences stream represented as Iterator
    screen: Screen<W>,
    buf: TextBuffer,
    status_bar: StatusBar,
}

impl<I, W> Editor<I, W>
where
    I: Iterator<Item = Result<InputSeq>>,
    W: Write,
{
    fn with_buf(
        buf: TextBuffer,
        mut input: I,
        output: W,
        window_size: Option<(usize, usize)>,
    ) -> Result<Editor<I, W>> {
        let screen = Screen::new(window_size, &mut input, output)?;
        let status_bar = StatusBar::from_buffer(&buf);
        Ok(Editor {
            input,
            screen,
            buf,
            status_bar,
        })
    }

    pub fn new(input: I, output: W, window_size: Option<(usize, usize)>) -> Result<Editor<I, W>> {
        Self::with_buf(TextBuffer::empty(), input, output, window_size)
    }

    pub fn with_lines<'a, L: Iterator<Item = &'a str>>(
        lines: L,
        input: I,
        output: W,
        window_size: Option<(usize, usize)>,
    ) -> Result<Editor<I, W>> {
        Self::with_buf(TextBuffer::with_lines(lines), input, output, window_size)
    }

    pub fn open<P: AsRef<Path>>(
        input: I,
        output: W,
        window_size: Option<(usize, usize)>,
        path: P,
    ) -> Result<Editor<I, W>> {
        Self::with_buf(TextBuffer::open(path)?, input, output, window_size)
    }

    fn render_screen(&mut self) -> Result<()> {
        self.status_bar.update_from_buf(&self.buf);
        self.screen.render(&self.buf, &self.status_bar)
    }

    // Returns true when the quit key was pressed
    fn process_keypress(&mut self, seq: InputSeq) -> Result<bool> {
        use InputSeq::*;

        let rowoff = self.screen.rowoff;
        let rows = self.screen.rows();

        match seq {
            Key(CTRL_Q) => return Ok(true),
            UpKey => self.buf.move_cursor_one(CursorDir::Up),
            DownKey => self.buf.move_cursor_one(CursorDir::Down),
            LeftKey => self.buf.move_cursor_one(CursorDir::Left),
            RightKey => self.buf.move_cursor_one(CursorDir::Right),
            PageUpKey => self.buf.move_cursor_page(CursorDir::Up, rowoff, rows),
            PageDownKey => self.buf.move_cursor_page(CursorDir::Down, rowoff, rows),
            HomeKey => self.buf.move_cursor_to_line_edge(CursorDir::Left),
            EndKey => self.buf.move_cursor_to_line_edge(CursorDir::Right),
            // Anything else is a no-op in this read-only viewer
            DeleteKey | Escape | Key(..) | Cursor(..) | Unidentified => {}
        }

        Ok(false)
    }

    pub fn run(&mut self) -> Result<()> {
        self.render_screen()?; // First paint

        while let Some(seq) = self.input.next() {
            let resized = self.screen.maybe_resize(&mut self.input)?;

            let seq = seq?;
            if self.process_keypress(seq)? {
                break;
            }

            // Idle timeout ticks do not dirty anything; skip the redraw for them
            if resized || seq != InputSeq::Unidentified {
                self.render_screen()?;
            }
        }

        self.screen.clear() // Finally clear screen on exit
    }

    pub fn buf(&self) -> &TextBuffer {
        &self.buf
    }

    pub fn screen(&self) -> &Screen<W> {
        &self.screen
    }

    pub fn lines(&self) -> crate::text_buffer::Lines<'_> {
        self.buf.lines()
    }
}
