use lino::{Editor, Result, StdinRawMode, VERSION};
use std::env;
use std::io;
use std::process::exit;

const USAGE: &str = "\
USAGE: lino [file]

  A tiny screen-oriented text viewer for terminals.

OPTIONS:
  --version : Print version
  --help    : Print this help";

fn view(file: Option<String>) -> Result<()> {
    // The raw mode guard lives for the whole session and restores the terminal on
    // every exit path when dropped
    let input = StdinRawMode::new()?.input_keys();
    let output = io::stdout();
    let window_size = term_size::dimensions_stdout();

    match file {
        Some(file) => Editor::open(input, output, window_size, &file)?.run(),
        None => Editor::new(input, output, window_size)?.run(),
    }
}

fn main() {
    let arg = env::args().nth(1);

    match arg.as_deref() {
        Some("--version") => {
            println!("{}", VERSION);
            return;
        }
        Some("--help") => {
            println!("{}", USAGE);
            return;
        }
        _ => {}
    }

    if let Err(err) = view(arg) {
        eprintln!("Error: {}", err);
        exit(1);
    }
}
