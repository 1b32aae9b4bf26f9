//! Character-level CSV tokenizer.
//!
//! Turns decoded text into records (lists of field strings). The tokenizer
//! is a pure state machine: it knows nothing about headers, rows or value
//! types, and it never looks ahead. Situations that need one character of
//! lookahead (CRLF, a doubled quote) are represented as their own states so a
//! chunk boundary can fall anywhere.

use crate::error::CsvError;

/// Tokenizer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Outside any quoted span.
    Unquoted,
    /// A CR just ended a record; an immediately following LF is part of it.
    AfterCr,
    /// Inside a quoted span.
    Quoted,
    /// Saw a quote inside a quoted span: either an escaped quote or the end.
    QuoteInQuoted,
}

#[derive(Debug)]
pub(crate) struct Tokenizer {
    delimiter: char,
    quote: char,
    state: State,
    field: String,
    record: Vec<String>,
    /// A quote opened in the current record, so it exists even if empty.
    record_started: bool,
}

impl Tokenizer {
    pub(crate) fn new(delimiter: char, quote: char) -> Self {
        Self {
            delimiter,
            quote,
            state: State::Unquoted,
            field: String::new(),
            record: Vec::new(),
            record_started: false,
        }
    }

    /// Runs every character of `text` through the state machine, handing each
    /// completed record to `on_record`. Stops at the first error it returns.
    pub(crate) fn feed<F>(&mut self, text: &str, mut on_record: F) -> Result<(), CsvError>
    where
        F: FnMut(Vec<String>) -> Result<(), CsvError>,
    {
        for ch in text.chars() {
            if let Some(record) = self.step(ch) {
                on_record(record)?;
            }
        }
        Ok(())
    }

    /// Ends the input.
    ///
    /// Returns the pending record if the input did not end with a line
    /// terminator and the record has started, even if only with `""`.
    pub(crate) fn finish(&mut self) -> Result<Option<Vec<String>>, CsvError> {
        match self.state {
            State::Quoted => return Err(CsvError::UnclosedQuote),
            State::QuoteInQuoted | State::AfterCr => self.state = State::Unquoted,
            State::Unquoted => {}
        }

        if self.field.is_empty() && self.record.is_empty() && !self.record_started {
            return Ok(None);
        }
        Ok(Some(self.end_record()))
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> State {
        self.state
    }

    fn step(&mut self, ch: char) -> Option<Vec<String>> {
        match self.state {
            State::Unquoted => self.unquoted(ch),
            State::AfterCr => {
                self.state = State::Unquoted;
                if ch == '\n' {
                    None
                } else {
                    self.unquoted(ch)
                }
            }
            State::Quoted => {
                if ch == self.quote {
                    self.state = State::QuoteInQuoted;
                } else {
                    self.field.push(ch);
                }
                None
            }
            State::QuoteInQuoted => {
                if ch == self.quote {
                    // Escaped quote ("")
                    self.field.push(ch);
                    self.state = State::Quoted;
                    None
                } else {
                    self.state = State::Unquoted;
                    self.unquoted(ch)
                }
            }
        }
    }

    fn unquoted(&mut self, ch: char) -> Option<Vec<String>> {
        if ch == self.quote {
            self.state = State::Quoted;
            self.record_started = true;
            None
        } else if ch == self.delimiter {
            let field = std::mem::take(&mut self.field);
            self.record.push(field);
            None
        } else if ch == '\r' {
            self.state = State::AfterCr;
            Some(self.end_record())
        } else if ch == '\n' {
            Some(self.end_record())
        } else {
            self.field.push(ch);
            None
        }
    }

    fn end_record(&mut self) -> Vec<String> {
        let field = std::mem::take(&mut self.field);
        self.record.push(field);
        self.record_started = false;
        std::mem::take(&mut self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Result<Vec<Vec<String>>, CsvError> {
        let mut tokenizer = Tokenizer::new(',', '"');
        let mut records = Vec::new();
        tokenizer.feed(text, |r| {
            records.push(r);
            Ok(())
        })?;
        records.extend(tokenizer.finish()?);
        Ok(records)
    }

    #[test]
    fn test_simple() {
        assert_eq!(tokenize("a,b,c\n").unwrap(), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(tokenize("\"a,b\",c\n").unwrap(), vec![vec!["a,b", "c"]]);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            tokenize(r#""Say ""Hello""",world"#).unwrap(),
            vec![vec![r#"Say "Hello""#, "world"]]
        );
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(tokenize("a,,c\n").unwrap(), vec![vec!["a", "", "c"]]);
        assert_eq!(tokenize(",,\n").unwrap(), vec![vec!["", "", ""]]);
    }

    #[test]
    fn test_trailing_delimiter_gives_empty_field() {
        assert_eq!(tokenize("a,b,\n").unwrap(), vec![vec!["a", "b", ""]]);
    }

    #[test]
    fn test_quoted_with_newline() {
        assert_eq!(
            tokenize("\"Line 1\nLine 2\",normal\n").unwrap(),
            vec![vec!["Line 1\nLine 2", "normal"]]
        );
    }

    #[test]
    fn test_line_endings() {
        let expected = vec![vec!["a"], vec!["b"], vec!["c"]];
        assert_eq!(tokenize("a\nb\nc\n").unwrap(), expected);
        assert_eq!(tokenize("a\r\nb\r\nc\r\n").unwrap(), expected);
        assert_eq!(tokenize("a\rb\rc\r").unwrap(), expected);
    }

    #[test]
    fn test_cr_cr_is_two_terminators() {
        assert_eq!(tokenize("a\r\rb").unwrap(), vec![vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn test_text_after_closing_quote_is_literal() {
        assert_eq!(tokenize("\"ab\"cd,e\n").unwrap(), vec![vec!["abcd", "e"]]);
    }

    #[test]
    fn test_quote_mid_field_opens_span() {
        assert_eq!(tokenize("ab\"c,d\"e\n").unwrap(), vec![vec!["abc,de"]]);
    }

    #[test]
    fn test_unterminated_last_record() {
        assert_eq!(tokenize("a,b\n1,2").unwrap(), vec![vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(tokenize("a,b\n1,").unwrap(), vec![vec!["a", "b"], vec!["1", ""]]);
    }

    #[test]
    fn test_nothing_pending_after_terminator() {
        assert_eq!(tokenize("a\n").unwrap(), vec![vec!["a"]]);
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_unclosed_quote() {
        assert!(matches!(tokenize("a\n\"oops\n"), Err(CsvError::UnclosedQuote)));
    }

    #[test]
    fn test_empty_quoted_field_at_end_of_input() {
        assert_eq!(tokenize("\"\"").unwrap(), vec![vec![""]]);
        assert_eq!(tokenize("a\n\"\"").unwrap(), vec![vec!["a"], vec![""]]);
        assert_eq!(tokenize("a\n\"\"\n").unwrap(), vec![vec!["a"], vec![""]]);
    }

    #[test]
    fn test_closing_quote_at_end_of_input() {
        assert_eq!(tokenize("\"x\"").unwrap(), vec![vec!["x"]]);
    }

    #[test]
    fn test_states_survive_split_points() {
        let mut tokenizer = Tokenizer::new(',', '"');
        let mut records = Vec::new();

        for piece in ["\"a\"", "\"b\"", "\r", "\n", "c"] {
            tokenizer
                .feed(piece, |r| {
                    records.push(r);
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(tokenizer.state(), State::Unquoted);
        records.extend(tokenizer.finish().unwrap());

        assert_eq!(records, vec![vec!["a\"b"], vec!["c"]]);
    }

    #[test]
    fn test_custom_delimiter_and_quote() {
        let mut tokenizer = Tokenizer::new(';', '\'');
        let mut records = Vec::new();
        tokenizer
            .feed("a;'b;c';d\n", |r| {
                records.push(r);
                Ok(())
            })
            .unwrap();
        assert_eq!(records, vec![vec!["a", "b;c", "d"]]);
    }
}
