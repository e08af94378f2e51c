use crate::error::Result;
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::str;

pub struct StdinRawMode {
    stdin: io::Stdin,
    orig: termios::Termios,
}

impl StdinRawMode {
    pub fn new() -> Result<StdinRawMode> {
        use termios::*;

        let stdin = io::stdin();
        let fd = stdin.as_raw_fd();
        let mut termios = Termios::from_fd(fd)?;
        let orig = termios;

        // Set terminal raw mode. Disable echo back, canonical mode, signals (SIGINT, SIGTSTP) and Ctrl+V.
        termios.c_lflag &= !(ECHO | ICANON | ISIG | IEXTEN);
        // Disable control flow mode (Ctrl+Q/Ctrl+S) and CR-to-NL translation
        termios.c_iflag &= !(IXON | ICRNL | BRKINT | INPCK | ISTRIP);
        // Disable output processing such as \n to \r\n translation
        termios.c_oflag &= !OPOST;
        // Ensure character size is 8bits
        termios.c_cflag |= CS8;
        // Do not wait for next byte with blocking since reading 0 byte is permitted
        termios.c_cc[VMIN] = 0;
        // Set read timeout to 1/10 second it enables 100ms timeout on read()
        termios.c_cc[VTIME] = 1;
        // Apply terminal configurations
        tcsetattr(fd, TCSAFLUSH, &termios)?;

        Ok(StdinRawMode { stdin, orig })
    }

    pub fn input_keys(self) -> InputSequences<StdinRawMode> {
        InputSequences::new(self)
    }
}

impl Drop for StdinRawMode {
    fn drop(&mut self) {
        // Restore original terminal mode
        termios::tcsetattr(self.stdin.as_raw_fd(), termios::TCSAFLUSH, &self.orig).unwrap();
    }
}

impl Read for StdinRawMode {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdin.read(buf)
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum InputSeq {
    Unidentified,
    Key(u8), // Printable or control byte
    LeftKey,
    RightKey,
    UpKey,
    DownKey,
    PageUpKey,
    PageDownKey,
    HomeKey,
    EndKey,
    DeleteKey,
    Escape,
    Cursor(usize, usize), // Pseudo key carrying a cursor position report (row, col)
}

pub struct InputSequences<R: Read> {
    input: R,
}

impl<R: Read> InputSequences<R> {
    pub fn new(input: R) -> InputSequences<R> {
        InputSequences { input }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut one_byte: [u8; 1] = [0];
        Ok(if self.input.read(&mut one_byte)? == 0 {
            None
        } else {
            Some(one_byte[0])
        })
    }

    // Accept `\x1b[5~` style sequences and the cursor position report `\x1b[24;80R`
    // (https://vt100.net/docs/vt100-ug/chapter3.html#CPR). The report is how the screen
    // detects its size when the system cannot tell it.
    fn decode_numbered(&mut self, digit: u8) -> Result<InputSeq> {
        use InputSeq::*;

        let mut buf = vec![digit];
        loop {
            match self.read_byte()? {
                Some(b'~') => {
                    return Ok(match buf.as_slice() {
                        b"1" | b"7" => HomeKey,
                        b"3" => DeleteKey,
                        b"4" | b"8" => EndKey,
                        b"5" => PageUpKey,
                        b"6" => PageDownKey,
                        _ => Escape,
                    });
                }
                Some(b'R') => {
                    let mut args = buf
                        .split(|b| *b == b';')
                        .filter_map(|s| str::from_utf8(s).ok().and_then(|s| s.parse().ok()));
                    return Ok(match (args.next(), args.next()) {
                        (Some(r), Some(c)) => Cursor(r, c),
                        _ => Escape,
                    });
                }
                Some(b @ b'0'..=b'9') | Some(b @ b';') => buf.push(b),
                // Timeout in the middle of a sequence or an unknown trailer
                _ => return Ok(Escape),
            }
        }
    }

    fn decode_escape_sequence(&mut self) -> Result<InputSeq> {
        use InputSeq::*;

        // A bare ESC keypress and a timeout in the middle of a sequence are
        // indistinguishable here. Both decode to Escape; never block waiting for
        // a sequence which may not complete.
        let b1 = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(Escape),
        };
        let b2 = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(Escape),
        };

        match (b1, b2) {
            (b'[', b'0'..=b'9') => self.decode_numbered(b2),
            (b'[', b'A') => Ok(UpKey),
            (b'[', b'B') => Ok(DownKey),
            (b'[', b'C') => Ok(RightKey),
            (b'[', b'D') => Ok(LeftKey),
            (b'[', b'H') => Ok(HomeKey),
            (b'[', b'F') => Ok(EndKey),
            (b'O', b'H') => Ok(HomeKey),
            (b'O', b'F') => Ok(EndKey),
            // Unknown escape sequence degrades to a bare Escape key
            _ => Ok(Escape),
        }
    }

    fn decode(&mut self, b: u8) -> Result<InputSeq> {
        match b {
            0x1b => self.decode_escape_sequence(),
            _ => Ok(InputSeq::Key(b)),
        }
    }

    fn read_seq(&mut self) -> Result<InputSeq> {
        if let Some(b) = self.read_byte()? {
            self.decode(b)
        } else {
            Ok(InputSeq::Unidentified)
        }
    }
}

impl<R: Read> Iterator for InputSequences<R> {
    type Item = Result<InputSeq>;

    // Read next byte from the input with 100ms timeout. When nothing was read, it yields
    // InputSeq::Unidentified. This method never returns None so for loop never ends
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.read_seq())
    }
}

#[cfg(test)]
mod tests {
    use super::InputSeq::*;
    use super::*;

    fn decode_one(bytes: &[u8]) -> InputSeq {
        InputSequences::new(bytes).read_seq().unwrap()
    }

    #[test]
    fn test_printable_and_control_bytes() {
        assert_eq!(decode_one(b"a"), Key(b'a'));
        assert_eq!(decode_one(b" "), Key(b' '));
        assert_eq!(decode_one(&[0x11]), Key(0x11)); // Ctrl-Q
        assert_eq!(decode_one(&[0x0d]), Key(b'\r'));
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(decode_one(b"\x1b[A"), UpKey);
        assert_eq!(decode_one(b"\x1b[B"), DownKey);
        assert_eq!(decode_one(b"\x1b[C"), RightKey);
        assert_eq!(decode_one(b"\x1b[D"), LeftKey);
    }

    #[test]
    fn test_home_end_variants() {
        assert_eq!(decode_one(b"\x1b[H"), HomeKey);
        assert_eq!(decode_one(b"\x1b[F"), EndKey);
        assert_eq!(decode_one(b"\x1bOH"), HomeKey);
        assert_eq!(decode_one(b"\x1bOF"), EndKey);
        assert_eq!(decode_one(b"\x1b[1~"), HomeKey);
        assert_eq!(decode_one(b"\x1b[7~"), HomeKey);
        assert_eq!(decode_one(b"\x1b[4~"), EndKey);
        assert_eq!(decode_one(b"\x1b[8~"), EndKey);
    }

    #[test]
    fn test_numbered_sequences() {
        assert_eq!(decode_one(b"\x1b[5~"), PageUpKey);
        assert_eq!(decode_one(b"\x1b[6~"), PageDownKey);
        assert_eq!(decode_one(b"\x1b[3~"), DeleteKey);
        assert_eq!(decode_one(b"\x1b[2~"), Escape); // Unmapped digit
    }

    #[test]
    fn test_cursor_position_report() {
        assert_eq!(decode_one(b"\x1b[24;80R"), Cursor(24, 80));
        assert_eq!(decode_one(b"\x1b[1;1R"), Cursor(1, 1));
        assert_eq!(decode_one(b"\x1b[42R"), Escape); // Missing column
    }

    #[test]
    fn test_bare_escape_on_short_read() {
        // The input runs dry which looks like a read timeout to the decoder
        assert_eq!(decode_one(b"\x1b"), Escape);
        assert_eq!(decode_one(b"\x1b["), Escape);
        assert_eq!(decode_one(b"\x1b[5"), Escape);
    }

    #[test]
    fn test_unknown_sequences_degrade_to_escape() {
        assert_eq!(decode_one(b"\x1b[Z"), Escape);
        assert_eq!(decode_one(b"\x1bOA"), Escape);
        assert_eq!(decode_one(b"\x1bxy"), Escape);
    }

    #[test]
    fn test_timeout_yields_unidentified() {
        let mut input = InputSequences::new(&b""[..]);
        assert_eq!(input.next().unwrap().unwrap(), Unidentified);
    }

    #[test]
    fn test_decodes_stream_in_order() {
        let mut input = InputSequences::new(&b"q\x1b[C\x1b[5~"[..]);
        assert_eq!(input.read_seq().unwrap(), Key(b'q'));
        assert_eq!(input.read_seq().unwrap(), RightKey);
        assert_eq!(input.read_seq().unwrap(), PageUpKey);
    }
}
