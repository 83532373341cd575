//! Interpreter for the compact path mini-language used by shapes and clip paths.
//!
//! A command string is a run of single-letter opcodes, each followed by numeric arguments
//! separated by whitespace or commas. Upper case is absolute, lower case is relative to the
//! current point. Supported: `M L C Q H V Z`. The opcodes `S R A T` are recognized but produce no
//! geometry, and any command with the wrong argument count is skipped.

use crate::foundation::core::{BezPath, Point};

/// Opcodes the format recognizes but does not draw.
const IGNORED_OPCODES: &[char] = &['S', 'R', 'A', 'T'];

/// Execute `commands` and return the resulting path.
pub fn interpret(commands: &str) -> BezPath {
    let mut pen = Pen::default();
    for (op, args) in tokenize(commands) {
        pen.apply(op, &args);
    }
    pen.path
}

/// Path whose command string may be set before any geometry is needed.
///
/// Values set while the path is not yet materialized are buffered; the buffered string is
/// interpreted the first time [`DeferredPath::geometry`] is called. Values set afterwards are
/// appended to the existing geometry immediately.
#[derive(Clone, Debug, Default)]
pub struct DeferredPath {
    pending: Option<String>,
    path: Option<BezPath>,
}

impl DeferredPath {
    /// Create an empty, not yet materialized path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path holding `commands` for later materialization.
    pub fn with_values(commands: impl Into<String>) -> Self {
        Self {
            pending: Some(commands.into()),
            path: None,
        }
    }

    /// Set command values, buffering them until the geometry is requested.
    pub fn set_values(&mut self, commands: impl Into<String>) {
        let commands = commands.into();
        match &mut self.path {
            None => self.pending = Some(commands),
            Some(path) => {
                let extra = interpret(&commands);
                path.extend(extra.elements().iter().copied());
            }
        }
    }

    /// Whether geometry has been materialized.
    pub fn is_materialized(&self) -> bool {
        self.path.is_some()
    }

    /// Materialize (once) and borrow the geometry.
    pub fn geometry(&mut self) -> &BezPath {
        let pending = self.pending.take();
        self.path
            .get_or_insert_with(|| pending.as_deref().map(interpret).unwrap_or_default())
    }

    /// Materialize and take ownership of the geometry.
    pub fn into_geometry(mut self) -> BezPath {
        self.geometry();
        self.path.unwrap_or_default()
    }
}

#[derive(Default)]
struct Pen {
    path: BezPath,
    current: Point,
    subpath_start: Point,
    open: bool,
}

impl Pen {
    fn apply(&mut self, op: char, args: &[f64]) {
        let relative = op.is_ascii_lowercase();
        match (op.to_ascii_uppercase(), args) {
            ('M', &[x, y]) => {
                let p = self.resolve(x, y, relative);
                self.path.move_to(p);
                self.subpath_start = p;
                self.current = p;
                self.open = true;
            }
            ('L', &[x, y]) => {
                let p = self.resolve(x, y, relative);
                self.line_to(p);
            }
            ('C', &[x1, y1, x2, y2, x, y]) => {
                let c1 = self.resolve(x1, y1, relative);
                let c2 = self.resolve(x2, y2, relative);
                let p = self.resolve(x, y, relative);
                self.ensure_open();
                self.path.curve_to(c1, c2, p);
                self.current = p;
            }
            ('Q', &[x1, y1, x, y]) => {
                let c = self.resolve(x1, y1, relative);
                let p = self.resolve(x, y, relative);
                self.ensure_open();
                self.path.quad_to(c, p);
                self.current = p;
            }
            ('H', &[x]) => {
                let x = if relative { self.current.x + x } else { x };
                self.line_to(Point::new(x, self.current.y));
            }
            ('V', &[y]) => {
                let y = if relative { self.current.y + y } else { y };
                self.line_to(Point::new(self.current.x, y));
            }
            ('Z', _) => {
                if self.open {
                    self.path.close_path();
                    self.current = self.subpath_start;
                    self.open = false;
                }
            }
            _ => {}
        }
    }

    fn resolve(&self, x: f64, y: f64, relative: bool) -> Point {
        if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        }
    }

    fn line_to(&mut self, p: Point) {
        self.ensure_open();
        self.path.line_to(p);
        self.current = p;
    }

    // Drawing without a preceding move starts a subpath at the current point.
    fn ensure_open(&mut self) {
        if !self.open {
            self.path.move_to(self.current);
            self.subpath_start = self.current;
            self.open = true;
        }
    }
}

fn is_opcode(c: char) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        'M' | 'L' | 'H' | 'V' | 'C' | 'Q' | 'Z'
    ) || IGNORED_OPCODES.contains(&c.to_ascii_uppercase())
}

/// Split a command string into `(opcode, arguments)` pairs.
///
/// Letters outside the recognized opcode set start a segment that is discarded. Arguments that
/// fail to parse as numbers read as `0.0`.
fn tokenize(commands: &str) -> Vec<(char, Vec<f64>)> {
    let mut out = Vec::new();
    let mut current: Option<(char, Vec<f64>)> = None;
    let mut discarding = false;
    let mut number = String::new();

    let flush_number = |number: &mut String, current: &mut Option<(char, Vec<f64>)>| {
        if number.is_empty() {
            return;
        }
        if let Some((_, args)) = current.as_mut() {
            args.push(number.parse::<f64>().unwrap_or(0.0));
        }
        number.clear();
    };

    let mut chars = commands.chars().peekable();
    while let Some(c) = chars.next() {
        let exponent = (c == 'e' || c == 'E')
            && number.chars().last().is_some_and(|p| p.is_ascii_digit() || p == '.');
        if c.is_ascii_alphabetic() && !exponent {
            flush_number(&mut number, &mut current);
            if let Some(done) = current.take() {
                out.push(done);
            }
            discarding = !is_opcode(c);
            if !discarding {
                current = Some((c, Vec::new()));
            }
            continue;
        }
        if discarding {
            continue;
        }
        if c.is_whitespace() || c == ',' {
            flush_number(&mut number, &mut current);
            continue;
        }
        number.push(c);
        if exponent && matches!(chars.peek(), Some('-') | Some('+')) {
            if let Some(sign) = chars.next() {
                number.push(sign);
            }
        }
    }
    flush_number(&mut number, &mut current);
    if let Some(done) = current.take() {
        out.push(done);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/path/interpreter.rs"]
mod tests;
