use std::io::{self, BufRead, Write};

use serde_json::Value as JsonValue;

use crate::wizard::error::WizardError;

/// Line-oriented console boundary used by the wizard.
pub trait Console {
    /// Show `prompt` and read one line. `Ok(None)` means the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, WizardError>;

    fn write_line(&mut self, line: &str) -> Result<(), WizardError>;

    fn write_lines(&mut self, lines: &[String]) -> Result<(), WizardError> {
        for line in lines {
            self.write_line(line)?;
        }
        Ok(())
    }
}

/// [`Console`] over any buffered reader and writer.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl LineConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, WizardError> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;
        let mut line = String::new();
        let read = match self.input.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(trimmed))
    }

    fn write_line(&mut self, line: &str) -> Result<(), WizardError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}

/// ANSI colouring, disabled when output is not a terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(self) -> bool {
        self.enabled
    }

    fn paint(self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\u{1b}[{code}m{text}\u{1b}[00m")
        } else {
            text.to_string()
        }
    }

    pub fn red(self, text: &str) -> String {
        self.paint("91", text)
    }

    pub fn green(self, text: &str) -> String {
        self.paint("92", text)
    }

    pub fn light_purple(self, text: &str) -> String {
        self.paint("94", text)
    }

    pub fn cyan(self, text: &str) -> String {
        self.paint("96", text)
    }
}

const INDENT: &str = "    ";

/// Render an operation result for the console: strings verbatim, sequences
/// element by element and mappings as `key: value`, recursively.
pub fn render_value(value: &JsonValue, palette: Palette) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(value, palette, 0, &mut lines);
    lines
}

fn render_into(value: &JsonValue, palette: Palette, depth: usize, lines: &mut Vec<String>) {
    let pad = INDENT.repeat(depth);
    match value {
        JsonValue::String(text) => {
            for line in text.lines() {
                lines.push(format!("{pad}{line}"));
            }
            if text.is_empty() {
                lines.push(pad);
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                render_into(item, palette, depth, lines);
            }
        }
        JsonValue::Object(map) => {
            for (key, value) in map {
                let key = palette.light_purple(key);
                match scalar(value) {
                    Some(rendered) => lines.push(format!("{pad}{key}: {rendered}")),
                    None => {
                        lines.push(format!("{pad}{key}:"));
                        render_into(value, palette, depth + 1, lines);
                    }
                }
            }
        }
        other => lines.push(format!("{pad}{}", scalar(other).unwrap_or_default())),
    }
}

fn scalar(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => Some("null".to_string()),
        JsonValue::Bool(value) => Some(value.to_string()),
        JsonValue::Number(value) => Some(value.to_string()),
        JsonValue::String(text) if !text.contains('\n') => Some(text.clone()),
        _ => None,
    }
}
