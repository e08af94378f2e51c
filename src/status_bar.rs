use crate::text_buffer::TextBuffer;

#[derive(Default)]
pub struct StatusBar {
    pub filename: String,
    pub line_pos: (usize, usize),
}

impl StatusBar {
    pub fn from_buffer(buf: &TextBuffer) -> Self {
        let mut bar = StatusBar::default();
        bar.update_from_buf(buf);
        bar
    }

    pub fn left(&self) -> String {
        format!("{:<20?} - {} lines", self.filename, self.line_pos.1)
    }

    pub fn right(&self) -> String {
        format!("{}/{}", self.line_pos.0, self.line_pos.1)
    }

    pub fn update_from_buf(&mut self, buf: &TextBuffer) {
        self.filename = buf.filename().to_string();
        self.line_pos = (buf.cy() + 1, buf.rows().len());
    }
}
