use core::fmt::{self, Write as _};

/// Separator placed between two factors.
const FACTOR_SEPARATOR: &str = " * ";

/// A rendered factorization: `"<number> = <f1> * <f2> * ... * <fn>\n"`.
///
/// The line is built once and never changes; the write stage hands
/// [`ResultLine::as_bytes`] to the sink in a single call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultLine {
    text: String,
}

impl ResultLine {
    /// Formats `number` and its `factors` into a newline-terminated line.
    pub fn new(number: isize, factors: &[isize]) -> Self {
        let mut text = String::with_capacity(24 + factors.len() * 8);
        // Writing into a `String` cannot fail.
        let _ = write!(text, "{number} =");
        for (i, factor) in factors.iter().enumerate() {
            let sep = if i == 0 { " " } else { FACTOR_SEPARATOR };
            let _ = write!(text, "{sep}{factor}");
        }
        text.push('\n');
        Self { text }
    }

    /// The full line, including the trailing newline.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Renders the line without its trailing newline.
impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text.trim_end_matches('\n'))
    }
}
