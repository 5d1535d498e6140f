//! Line and field splitting for the delimiter-split dialect.
//!
//! There is no quoting: a delimiter inside a field cannot be represented.

/// Splits one line into fields on every occurrence of `delimiter`.
///
/// CR and LF characters are removed from every field. A line with `k`
/// delimiters always yields `k + 1` fields.
///
/// ```
/// use tabstat::tokenizer::split_line;
///
/// assert_eq!(split_line("a,b,", ','), vec!["a", "b", ""]);
/// ```
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(strip_line_breaks).collect()
}

fn strip_line_breaks(field: &str) -> String {
    if field.contains(['\r', '\n']) {
        field.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
    } else {
        field.to_string()
    }
}

/// Iterator over the non-blank lines of a buffer.
///
/// A line ends at `\n` or `\r`. After the line body one `\r` and then one
/// `\n` are consumed if present, so `\r\n`, `\n` and a lone `\r` all end a
/// line. Zero-length lines are skipped.
pub struct Lines<'a> {
    rest: &'a str,
    /// 1-based line number of the next line body in the source text.
    line_no: usize,
}

/// Returns an iterator of `(line_number, line)` pairs.
pub fn split_lines(text: &str) -> Lines<'_> {
    Lines {
        rest: text,
        line_no: 1,
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            let end = self.rest.find(['\r', '\n']).unwrap_or(self.rest.len());
            let line = &self.rest[..end];
            let mut tail = &self.rest[end..];
            if let Some(t) = tail.strip_prefix('\r') {
                tail = t;
            }
            if let Some(t) = tail.strip_prefix('\n') {
                tail = t;
            }
            let line_no = self.line_no;
            self.line_no += 1;
            self.rest = tail;
            if !line.is_empty() {
                return Some((line_no, line));
            }
        }
        None
    }
}
