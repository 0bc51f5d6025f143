//! User-facing terminal output: warnings, progress and errors.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::ConvertError;
use crate::sink::OutputSink;

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Diagnostic sink for the binary: one `warning:` line per message on stderr.
pub struct WarningSink {
    stream: StandardStream,
}

impl WarningSink {
    pub fn stderr() -> Self {
        Self {
            stream: StandardStream::stderr(color_choice(io::stderr().is_terminal())),
        }
    }
}

impl OutputSink for WarningSink {
    fn emit(&mut self, text: &str) {
        for line in text.lines() {
            let _ = self
                .stream
                .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
            let _ = write!(self.stream, "warning");
            let _ = self.stream.reset();
            let _ = writeln!(self.stream, ": {line}");
        }
    }
}

/// Lists a template as it is converted.
pub fn print_converted(path: &Path) {
    let mut stdout = StandardStream::stdout(color_choice(io::stdout().is_terminal()));
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    let _ = write!(stdout, "converting");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", path.display());
}

pub fn print_summary(count: usize, output_dir: &Path) {
    let mut stdout = StandardStream::stdout(color_choice(io::stdout().is_terminal()));
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "done");
    let _ = stdout.reset();
    let _ = writeln!(stdout, ": {count} template(s) written to {}", output_dir.display());
}

/// Renders an error with its diagnostic code on stderr.
pub fn print_error(error: ConvertError) {
    eprintln!("{:?}", miette::Report::new(error));
}
