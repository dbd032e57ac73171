//! Parser for serialized choice lists such as `["Closer", "Further"]`
//!
//! Accepts list (`[...]`) or tuple (`(...)`) literals whose items are quoted
//! strings (single or double quotes, backslash escapes), numbers, or the bare
//! words `True`, `False` and `None`. Items are returned as display text.

/// Why a serialized list could not be read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected character {ch:?} at offset {offset}")]
    Unexpected { ch: char, offset: usize },

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("expected a list or tuple literal")]
    NotASequence,

    #[error("trailing input at offset {0}")]
    Trailing(usize),
}

pub type LiteralResult<T> = std::result::Result<T, LiteralError>;

/// Parse a serialized list literal into its items
pub fn parse_list_literal(input: &str) -> LiteralResult<Vec<String>> {
    let mut parser = LiteralParser::new(input);
    let items = parser.parse_sequence()?;
    parser.skip_whitespace();
    if parser.pos < input.len() {
        return Err(LiteralError::Trailing(parser.pos));
    }
    Ok(items)
}

struct LiteralParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().map(char::is_whitespace).unwrap_or(false) {
            self.advance();
        }
    }

    fn parse_sequence(&mut self) -> LiteralResult<Vec<String>> {
        self.skip_whitespace();
        let close = match self.advance() {
            Some('[') => ']',
            Some('(') => ')',
            Some(_) | None => return Err(LiteralError::NotASequence),
        };

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.current_char() {
                None => return Err(LiteralError::UnexpectedEof),
                Some(c) if c == close => {
                    self.advance();
                    return Ok(items);
                }
                Some(_) => {}
            }

            items.push(self.parse_item()?);

            self.skip_whitespace();
            match self.advance() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                Some(ch) => {
                    return Err(LiteralError::Unexpected {
                        ch,
                        offset: self.pos - ch.len_utf8(),
                    })
                }
                None => return Err(LiteralError::UnexpectedEof),
            }
        }
    }

    fn parse_item(&mut self) -> LiteralResult<String> {
        let start = self.pos;
        match self.current_char() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                self.read_string(quote, start)
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                Ok(self.read_number())
            }
            Some(c) if c.is_alphabetic() => {
                let word = self.read_word();
                match word.as_str() {
                    "True" | "False" | "None" => Ok(word),
                    _ => Err(LiteralError::Unexpected { ch: c, offset: start }),
                }
            }
            Some(ch) => Err(LiteralError::Unexpected { ch, offset: start }),
            None => Err(LiteralError::UnexpectedEof),
        }
    }

    fn read_string(&mut self, quote: char, start: usize) -> LiteralResult<String> {
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(LiteralError::UnterminatedString(start)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.advance() {
                    None => return Err(LiteralError::UnterminatedString(start)),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn read_number(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_') {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while self
            .current_char()
            .map(|c| c.is_alphanumeric() || c == '_')
            .unwrap_or(false)
        {
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }
}
