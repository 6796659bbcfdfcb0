//! Streaming reader: characters in, syntax trees out.

use std::io::BufRead;

use tracing::trace;

use super::syntax::{classify_atom, Syntax};
use crate::error::{Error, Result};

/// Characters that end an atom token
fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | ';') || c.is_whitespace()
}

/// Character-level reader over a buffered input stream.
///
/// Yields one complete form per call so the driver can interleave prompting
/// with evaluation. Input is pulled a line at a time and a form may span any
/// number of lines; reading blocks only when the next form is incomplete.
pub struct Reader<R> {
    input: R,
    line: Vec<char>,
    pos: usize,
    eof: bool,
}

impl<R: BufRead> Reader<R> {
    /// Creates a reader over an input stream
    pub fn new(input: R) -> Self {
        Reader {
            input,
            line: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    /// Reads the next complete form, or `None` once input is exhausted.
    ///
    /// A malformed form (stray closing delimiter, unterminated string,
    /// out-of-range integer) is reported as an error; the offending
    /// characters are consumed so the caller can keep reading.
    pub fn read_syntax(&mut self) -> Result<Option<Syntax>> {
        self.skip_blank()?;
        if self.peek()?.is_none() {
            return Ok(None);
        }
        let form = self.read_form()?;
        trace!(?form, "read form");
        Ok(Some(form))
    }

    fn read_form(&mut self) -> Result<Syntax> {
        self.skip_blank()?;
        let Some(c) = self.peek()? else {
            return Err(Error::UnexpectedEof);
        };
        match c {
            '(' | '[' => {
                self.bump();
                self.read_list()
            }
            ')' | ']' => {
                self.bump();
                Err(Error::syntax(format!("unexpected `{c}`")))
            }
            '\'' => {
                self.bump();
                let quoted = self.read_form()?;
                Ok(Syntax::List(vec![Syntax::Symbol("quote".into()), quoted]))
            }
            '"' => {
                self.bump();
                self.read_string()
            }
            _ => self.read_atom(),
        }
    }

    /// Reads forms until a closing delimiter. `()` and `[]` are
    /// interchangeable, so a list opened with either closes with either.
    fn read_list(&mut self) -> Result<Syntax> {
        let mut items = Vec::new();
        loop {
            self.skip_blank()?;
            match self.peek()? {
                None => return Err(Error::UnexpectedEof),
                Some(')') | Some(']') => {
                    self.bump();
                    return Ok(Syntax::List(items));
                }
                Some(_) => items.push(self.read_form()?),
            }
        }
    }

    fn read_string(&mut self) -> Result<Syntax> {
        let mut value = String::new();
        loop {
            let Some(c) = self.peek()? else {
                return Err(Error::syntax("unterminated string"));
            };
            self.bump();
            match c {
                '"' => return Ok(Syntax::Str(value)),
                '\\' => {
                    let Some(escaped) = self.peek()? else {
                        return Err(Error::syntax("unterminated string"));
                    };
                    self.bump();
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        // unknown escapes pass the character through
                        other => other,
                    });
                }
                other => value.push(other),
            }
        }
    }

    fn read_atom(&mut self) -> Result<Syntax> {
        let mut token = String::new();
        while let Some(c) = self.peek()? {
            if is_delimiter(c) {
                break;
            }
            self.bump();
            token.push(c);
        }
        classify_atom(&token)
    }

    /// Skips whitespace and `;` comments (to end of line)
    fn skip_blank(&mut self) -> Result<()> {
        while let Some(c) = self.peek()? {
            if c == ';' {
                self.pos = self.line.len();
            } else if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<char>> {
        loop {
            if self.pos < self.line.len() {
                return Ok(Some(self.line[self.pos]));
            }
            if self.eof {
                return Ok(None);
            }
            let mut buf = String::new();
            let n = self
                .input
                .read_line(&mut buf)
                .map_err(|e| Error::syntax(format!("input error: {e}")))?;
            if n == 0 {
                self.eof = true;
                return Ok(None);
            }
            self.line = buf.chars().collect();
            self.pos = 0;
        }
    }

    fn bump(&mut self) {
        self.pos += 1;
    }
}
