//! SQL Lexer - Tokenizes SQL input text into a stream of tokens
//!
//! Two modes share the character primitives: `scan_token` for statement text and
//! `scan_value_token` for the literals inside `VALUES (...)`.

use std::{fmt::Display, iter::Peekable, str::Chars};

/// Represents a single lexical token in the SQL input
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// SQL reserved keyword
    Keyword(Keyword),
    /// Identifier such as table name or column name
    Ident(String),
    /// Literal value, quotes stripped; numbers and words alike
    Value(String),
    /// Run of contiguous whitespace
    Whitespace(String),
    Asterisk,
    Comma,
    OpenParen,
    CloseParen,
    SingleQuote,
    DoubleQuote,
    Semicolon,
    /// End of input
    Eof,
    /// Anything the current mode cannot tokenize
    Illegal(String),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Token::Keyword(keyword) => keyword.to_str(),
            Token::Ident(ident) => ident,
            Token::Value(v) => v,
            Token::Whitespace(ws) => ws,
            Token::Asterisk => "*",
            Token::Comma => ",",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::SingleQuote => "'",
            Token::DoubleQuote => "\"",
            Token::Semicolon => ";",
            Token::Eof => "",
            Token::Illegal(s) => s,
        })
    }
}

/// SQL reserved keywords
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Keyword {
    // DDL keywords
    Create,
    Table,
    // DML keywords
    Insert,
    Into,
    Values,
    Select,
    From,
    // Column type keywords
    Bool,
    Int,
    Float,
    String,
    Time,
    Bytes,
    Uuid,
    // Constraint keywords
    Not,
    Null,
    Primary,
    Foreign,
    Key,
    Unique,
}

impl Keyword {
    /// Attempts to parse a string as a keyword (case-insensitive)
    pub fn from_str(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_ref() {
            "CREATE" => Keyword::Create,
            "TABLE" => Keyword::Table,
            "INSERT" => Keyword::Insert,
            "INTO" => Keyword::Into,
            "VALUES" => Keyword::Values,
            "SELECT" => Keyword::Select,
            "FROM" => Keyword::From,
            "BOOL" => Keyword::Bool,
            "INT" => Keyword::Int,
            "FLOAT" => Keyword::Float,
            "STRING" => Keyword::String,
            "TIME" => Keyword::Time,
            "BYTES" => Keyword::Bytes,
            "UUID" => Keyword::Uuid,
            "NOT" => Keyword::Not,
            "NULL" => Keyword::Null,
            "PRIMARY" => Keyword::Primary,
            "FOREIGN" => Keyword::Foreign,
            "KEY" => Keyword::Key,
            "UNIQUE" => Keyword::Unique,
            _ => return None,
        })
    }

    /// Returns the uppercase string representation of the keyword
    pub fn to_str(&self) -> &'static str {
        match self {
            Keyword::Create => "CREATE",
            Keyword::Table => "TABLE",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Bool => "BOOL",
            Keyword::Int => "INT",
            Keyword::Float => "FLOAT",
            Keyword::String => "STRING",
            Keyword::Time => "TIME",
            Keyword::Bytes => "BYTES",
            Keyword::Uuid => "UUID",
            Keyword::Not => "NOT",
            Keyword::Null => "NULL",
            Keyword::Primary => "PRIMARY",
            Keyword::Foreign => "FOREIGN",
            Keyword::Key => "KEY",
            Keyword::Unique => "UNIQUE",
        }
    }

    /// Whether the keyword shapes statements and can never be an identifier
    ///
    /// Type and constraint keywords are not reserved; the parser takes them
    /// as identifiers, in lowercase, wherever a name is expected.
    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            Keyword::Create
                | Keyword::Table
                | Keyword::Insert
                | Keyword::Into
                | Keyword::Values
                | Keyword::Select
                | Keyword::From
        )
    }

    /// Whether the keyword names a column type
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Keyword::Bool
                | Keyword::Int
                | Keyword::Float
                | Keyword::String
                | Keyword::Time
                | Keyword::Bytes
                | Keyword::Uuid
        )
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Characters that end an unquoted literal
fn is_value_terminator(c: char) -> bool {
    matches!(c, ',' | ';' | ')') || is_whitespace(c)
}

/// SQL lexical analyzer (lexer/tokenizer)
pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
}

/// Statement-mode tokens up to, not including, `Token::Eof`
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.scan_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given SQL text
    pub fn new(sql_text: &'a str) -> Self {
        Self {
            iter: sql_text.chars().peekable(),
        }
    }

    /// Consumes the next character if it satisfies the predicate
    fn next_if<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<char> {
        self.iter.peek().filter(|&c| predicate(*c))?;
        self.iter.next()
    }

    /// Consumes consecutive characters while they satisfy the predicate
    fn next_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.next_if(&predicate) {
            value.push(c);
        }
        Some(value).filter(|v| !v.is_empty())
    }

    /// Scans the next token in statement mode
    pub fn scan_token(&mut self) -> Token {
        if let Some(ws) = self.next_while(is_whitespace) {
            return Token::Whitespace(ws);
        }
        match self.iter.peek() {
            Some(c) if c.is_ascii_alphabetic() => self.scan_ident(),
            Some(_) => self.scan_symbol(),
            None => Token::Eof,
        }
    }

    /// Scans the next token in literal-value mode
    pub fn scan_value_token(&mut self) -> Token {
        if let Some(ws) = self.next_while(is_whitespace) {
            return Token::Whitespace(ws);
        }
        match self.iter.peek() {
            Some(',') | Some(';') | Some(')') => self.scan_symbol(),
            Some('\'') => self.scan_quoted(),
            Some(_) => match self.next_while(|c| !is_value_terminator(c)) {
                Some(v) => Token::Value(v),
                None => Token::Eof,
            },
            None => Token::Eof,
        }
    }

    /// Scans a quoted literal, where `''` stands for one quote
    fn scan_quoted(&mut self) -> Token {
        self.iter.next();
        let mut val = String::new();

        loop {
            match self.iter.next() {
                Some('\'') => {
                    if self.next_if(|c| c == '\'').is_none() {
                        break;
                    }
                    val.push('\'');
                }
                Some(c) => val.push(c),
                None => return Token::Illegal(format!("'{}", val)),
            }
        }
        Token::Value(val)
    }

    /// Scans an identifier or keyword
    fn scan_ident(&mut self) -> Token {
        let val = self
            .next_while(|c| c.is_ascii_alphanumeric() || c == '_')
            .unwrap_or_default();
        // Returns Keyword if matched, otherwise returns as a regular Ident
        Keyword::from_str(&val).map_or(Token::Ident(val), Token::Keyword)
    }

    /// Scans a single-character symbol token
    fn scan_symbol(&mut self) -> Token {
        let Some(c) = self.iter.next() else {
            return Token::Eof;
        };
        match c {
            '*' => Token::Asterisk,
            ',' => Token::Comma,
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '\'' => Token::SingleQuote,
            '"' => Token::DoubleQuote,
            ';' => Token::Semicolon,
            c => Token::Illegal(c.to_string()),
        }
    }
}
