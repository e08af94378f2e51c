use crate::error::{Error, Result};
use crate::input::InputSeq;
use crate::row::Row;
use crate::signal::SigwinchWatcher;
use crate::status_bar::StatusBar;
use crate::text_buffer::TextBuffer;
use std::io::Write;
use std::time::SystemTime;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

struct StatusMessage {
    text: String,
    timestamp: SystemTime,
}

impl StatusMessage {
    fn new<S: Into<String>>(message: S) -> StatusMessage {
        StatusMessage {
            text: message.into(),
            timestamp: SystemTime::now(),
        }
    }
}

fn get_window_size_fallback<I, W>(input: &mut I, output: &mut W) -> Result<(usize, usize)>
where
    I: Iterator<Item = Result<InputSeq>>,
    W: Write,
{
    // Move cursor to the bottom-right corner with 'C' and 'B' commands, then query its
    // position with 'n'. \x1b[999;999H is not used since it does not guarantee that the
    // cursor stops at the corner
    output.write(b"\x1b[999C\x1b[999B\x1b[6n")?;
    output.flush()?;

    // Wait for the cursor position report from the terminal discarding other sequences
    for seq in input {
        if let InputSeq::Cursor(r, c) = seq? {
            return Ok((c, r));
        }
    }

    Ok((0, 0)) // Give up
}

fn validate_window_size(w: usize, h: usize) -> Result<(usize, usize)> {
    if w == 0 || h == 0 {
        return Err(Error::UnknownWindowSize);
    }
    if h < 3 {
        return Err(Error::TooSmallWindow(w, h));
    }
    Ok((w, h))
}

// Cut off a line after the given number of columns, never in the middle of a character
fn truncate_cols(line: &str, cols: usize) -> &str {
    match line.char_indices().nth(cols) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

pub struct Screen<W: Write> {
    output: W,
    // X coordinate in `render` text of rows
    rx: usize,
    // Screen size
    num_cols: usize,
    num_rows: usize,
    // Scroll position (row/col offset)
    pub rowoff: usize,
    pub coloff: usize,
    message: StatusMessage,
    sigwinch: SigwinchWatcher,
}

impl<W: Write> Screen<W> {
    pub fn new<I>(
        window_size: Option<(usize, usize)>,
        input: &mut I,
        mut output: W,
    ) -> Result<Self>
    where
        I: Iterator<Item = Result<InputSeq>>,
    {
        let (w, h) = if let Some(s) = window_size {
            s
        } else {
            get_window_size_fallback(input, &mut output)?
        };
        let (w, h) = validate_window_size(w, h)?;

        Ok(Self {
            output,
            rx: 0,
            num_cols: w,
            // Screen height is 2 lines less than the window height due to the status bar
            // and the message bar
            num_rows: h - 2,
            rowoff: 0,
            coloff: 0,
            message: StatusMessage::new("Ctrl-Q to quit"),
            sigwinch: SigwinchWatcher::new()?,
        })
    }

    fn trim_line<S: AsRef<str>>(&self, line: S) -> String {
        let line = line.as_ref();
        if line.len() <= self.coloff {
            return "".to_string();
        }
        line.chars().skip(self.coloff).take(self.num_cols).collect()
    }

    fn draw_welcome_message<B: Write>(&self, mut buf: B) -> Result<()> {
        let msg = format!("Lino viewer -- version {}", VERSION);
        let welcome = self.trim_line(&msg);
        let padding = (self.num_cols.saturating_sub(welcome.len())) / 2;
        if padding > 0 {
            buf.write(b"~")?;
            for _ in 0..padding - 1 {
                buf.write(b" ")?;
            }
        }
        buf.write(welcome.as_bytes())?;
        Ok(())
    }

    fn draw_rows<B: Write>(&self, mut buf: B, rows: &[Row]) -> Result<()> {
        for y in 0..self.num_rows {
            let file_row = y + self.rowoff;

            if file_row >= rows.len() {
                if rows.is_empty() && y == self.num_rows / 3 {
                    self.draw_welcome_message(&mut buf)?;
                } else {
                    buf.write(b"~")?;
                }
            } else {
                buf.write(self.trim_line(rows[file_row].render_text()).as_bytes())?;
            }

            // Erase the rest of the line. http://vt100.net/docs/vt100-ug/chapter3.html#EL
            buf.write(b"\x1b[K")?;
            if y < self.num_rows - 1 {
                buf.write(b"\r\n")?;
            }
        }
        Ok(())
    }

    fn draw_status_bar<B: Write>(&self, mut buf: B, status_bar: &StatusBar) -> Result<()> {
        write!(buf, "\x1b[{}H", self.num_rows + 1)?;

        // 'm' command with argument 7 inverts the colors. https://vt100.net/docs/vt100-ug/chapter3.html#SGR
        buf.write(b"\x1b[7m")?;

        let left = status_bar.left();
        let left = truncate_cols(&left, self.num_cols);
        buf.write(left.as_bytes())?;

        // Column arithmetic counts characters, not bytes; the file name may not be ASCII
        let rest_len = self.num_cols - left.chars().count();
        let right = status_bar.right();
        if right.len() <= rest_len {
            // Padding so that the right segment is flush against the right edge
            for _ in 0..rest_len - right.len() {
                buf.write(b" ")?;
            }
            buf.write(right.as_bytes())?;
        } else {
            for _ in 0..rest_len {
                buf.write(b" ")?;
            }
        }

        // Default argument of 'm' command is 0 so it resets attributes
        buf.write(b"\x1b[m")?;
        Ok(())
    }

    fn draw_message_bar<B: Write>(&self, mut buf: B) -> Result<()> {
        write!(buf, "\x1b[{}H", self.num_rows + 2)?;
        buf.write(b"\x1b[K")?;
        if let Ok(d) = SystemTime::now().duration_since(self.message.timestamp) {
            if d.as_secs() < 5 {
                let msg = truncate_cols(&self.message.text, self.num_cols);
                buf.write(msg.as_bytes())?;
            }
        }
        Ok(())
    }

    fn redraw_screen(&mut self, rows: &[Row], cy: usize, status_bar: &StatusBar) -> Result<()> {
        let mut buf = Vec::with_capacity((self.num_rows + 2) * self.num_cols);

        // \x1b[: Escape sequence header
        // Hide cursor while updating screen. 'l' is command to unset mode http://vt100.net/docs/vt100-ug/chapter3.html#RM
        buf.write(b"\x1b[?25l")?;
        // H: Command to move cursor. Here \x1b[H is the same as \x1b[1;1H
        buf.write(b"\x1b[H")?;

        self.draw_rows(&mut buf, rows)?;
        self.draw_status_bar(&mut buf, status_bar)?;
        self.draw_message_bar(&mut buf)?;

        // Move cursor to its rendered position (1-based)
        let cursor_row = cy - self.rowoff + 1;
        let cursor_col = self.rx - self.coloff + 1;
        write!(buf, "\x1b[{};{}H", cursor_row, cursor_col)?;

        // Reveal cursor again. 'h' is command to set mode https://vt100.net/docs/vt100-ug/chapter3.html#SM
        buf.write(b"\x1b[?25h")?;

        // The frame is flushed in exactly one write. A partial write is not retried; it
        // only degrades one frame, not the editor state
        self.output.write(&buf)?;
        self.output.flush()?;
        Ok(())
    }

    fn do_scroll(&mut self, rows: &[Row], cx: usize, cy: usize) {
        // Calculate X coordinate to render considering tab stop
        if cy < rows.len() {
            self.rx = rows[cy].rx_from_cx(cx);
        } else {
            self.rx = 0;
        }

        // Adjust scroll position when cursor is outside the screen. Vertical and
        // horizontal clamps are independent
        if cy < self.rowoff {
            // Scroll up when cursor is above the top of window
            self.rowoff = cy;
        }
        if cy >= self.rowoff + self.num_rows {
            // Scroll down when cursor is below the bottom of window
            self.rowoff = cy - self.num_rows + 1;
        }
        if self.rx < self.coloff {
            self.coloff = self.rx;
        }
        if self.rx >= self.coloff + self.num_cols {
            self.coloff = self.rx - self.num_cols + 1;
        }
    }

    pub fn render(&mut self, buf: &TextBuffer, status_bar: &StatusBar) -> Result<()> {
        let (cx, cy) = buf.cursor();
        self.do_scroll(buf.rows(), cx, cy);
        self.redraw_screen(buf.rows(), cy, status_bar)
    }

    pub fn maybe_resize<I>(&mut self, input: &mut I) -> Result<bool>
    where
        I: Iterator<Item = Result<InputSeq>>,
    {
        if !self.sigwinch.notified() {
            return Ok(false); // No resize signal arrived
        }

        let (w, h) = if let Some(s) = term_size::dimensions_stdout() {
            s
        } else {
            get_window_size_fallback(input, &mut self.output)?
        };
        let (w, h) = validate_window_size(w, h)?;

        self.num_cols = w;
        self.num_rows = h - 2;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        // 2: Argument of 'J' command to reset entire screen
        // J: Command to erase screen http://vt100.net/docs/vt100-ug/chapter3.html#ED
        self.output.write(b"\x1b[2J")?;
        // Set cursor position to left-top corner
        self.output.write(b"\x1b[H")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.num_rows
    }

    pub fn cols(&self) -> usize {
        self.num_cols
    }

    pub fn message_text(&self) -> &str {
        self.message.text.as_str()
    }
}
