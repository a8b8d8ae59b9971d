use crate::error::{Error, Result};
use crate::sql::parser::ast::{
    ColumnSpec, CreateTableStatement, Fields, InsertStatement, SelectStatement, Statement,
};
use crate::sql::parser::lexer::{Keyword, Lexer, Token};

pub mod ast;
mod lexer;

/// SQL Parser - Converts tokens into Abstract Syntax Tree (AST)
///
/// Reads from the lexer in statement or value mode as the grammar requires,
/// with room for exactly one unscanned token.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    buf: Option<Token>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given SQL input
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            buf: None,
        }
    }

    /// Parses the input SQL statement into an AST
    pub fn parse(&mut self) -> Result<Statement> {
        let stmt = match self.scan_ignore_whitespace() {
            Token::Keyword(Keyword::Insert) => Statement::Insert(self.parse_insert()?),
            Token::Keyword(Keyword::Select) => Statement::Select(self.parse_select()?),
            Token::Keyword(Keyword::Create) => Statement::CreateTable(self.parse_create_table()?),
            token => return Err(Error::parse("INSERT, SELECT or CREATE", token.to_string())),
        };
        // No tokens allowed after semicolon
        match self.scan_ignore_whitespace() {
            Token::Eof => Ok(stmt),
            token => Err(Error::parse("end of input", token.to_string())),
        }
    }

    /// INSERT INTO t [(a, b)] VALUES (v1, v2);
    fn parse_insert(&mut self) -> Result<InsertStatement> {
        self.next_expect(Token::Keyword(Keyword::Into))?;
        let table_name = self.next_ident("table name")?;

        let fields = match self.scan_ignore_whitespace() {
            token @ Token::Keyword(Keyword::Values) => {
                self.unscan(token);
                Fields::All
            }
            Token::OpenParen => Fields::Named(self.parse_ident_list()?),
            token => return Err(Error::parse("( or VALUES", token.to_string())),
        };

        self.next_expect(Token::Keyword(Keyword::Values))?;
        self.next_expect(Token::OpenParen)?;

        let mut values = Vec::new();
        loop {
            match self.scan_value_ignore_whitespace() {
                Token::Value(v) => values.push(v),
                token => return Err(Error::parse("value", token.to_string())),
            }
            match self.scan_ignore_whitespace() {
                Token::Comma => {}
                Token::CloseParen => break,
                token => return Err(Error::parse(", or )", token.to_string())),
            }
        }
        self.next_expect(Token::Semicolon)?;

        Ok(InsertStatement {
            table_name,
            fields,
            values,
        })
    }

    /// SELECT * FROM t; or SELECT (a, b) FROM t;
    fn parse_select(&mut self) -> Result<SelectStatement> {
        let fields = match self.scan_ignore_whitespace() {
            Token::Asterisk => Fields::All,
            Token::OpenParen => Fields::Named(self.parse_ident_list()?),
            token => return Err(Error::parse("* or (", token.to_string())),
        };

        self.next_expect(Token::Keyword(Keyword::From))?;
        let table_name = self.next_ident("table name")?;
        self.next_expect(Token::Semicolon)?;

        Ok(SelectStatement { table_name, fields })
    }

    /// CREATE TABLE t (a type, b type);
    fn parse_create_table(&mut self) -> Result<CreateTableStatement> {
        self.next_expect(Token::Keyword(Keyword::Table))?;
        let table_name = self.next_ident("table name")?;
        self.next_expect(Token::OpenParen)?;

        let mut columns = Vec::new();
        loop {
            let name = self.next_ident("column name")?;
            let type_name = match self.scan_ignore_whitespace() {
                Token::Ident(t) => t,
                Token::Keyword(k) if k.is_type() => k.to_str().to_string(),
                token => return Err(Error::parse("column type", token.to_string())),
            };
            columns.push(ColumnSpec { name, type_name });

            match self.scan_ignore_whitespace() {
                Token::Comma => {}
                Token::CloseParen => break,
                token => return Err(Error::parse(", or )", token.to_string())),
            }
        }
        self.next_expect(Token::Semicolon)?;

        Ok(CreateTableStatement {
            table_name,
            columns,
        })
    }

    /// Comma-separated identifiers after an opening parenthesis, through `)`
    fn parse_ident_list(&mut self) -> Result<Vec<String>> {
        let mut idents = Vec::new();
        loop {
            idents.push(self.next_ident("field")?);
            match self.scan_ignore_whitespace() {
                Token::Comma => {}
                Token::CloseParen => break,
                token => return Err(Error::parse(", or )", token.to_string())),
            }
        }
        Ok(idents)
    }

    /// Next token in statement mode, the unscanned one first
    fn scan(&mut self) -> Token {
        self.buf.take().unwrap_or_else(|| self.lexer.scan_token())
    }

    /// Next token in value mode, the unscanned one first
    fn scan_value(&mut self) -> Token {
        self.buf.take().unwrap_or_else(|| self.lexer.scan_value_token())
    }

    /// Whitespace is merged by the lexer, so skipping one token suffices
    fn scan_ignore_whitespace(&mut self) -> Token {
        match self.scan() {
            Token::Whitespace(_) => self.scan(),
            token => token,
        }
    }

    fn scan_value_ignore_whitespace(&mut self) -> Token {
        match self.scan_value() {
            Token::Whitespace(_) => self.scan_value(),
            token => token,
        }
    }

    /// Pushes a token back; it is returned by the next scan
    fn unscan(&mut self, token: Token) {
        debug_assert!(self.buf.is_none(), "only one token can be unscanned");
        self.buf = Some(token);
    }

    /// Expects and consumes an identifier
    fn next_ident(&mut self, what: &str) -> Result<String> {
        match self.scan_ignore_whitespace() {
            Token::Ident(ident) => Ok(ident),
            Token::Keyword(keyword) if !keyword.is_reserved() => {
                Ok(keyword.to_str().to_lowercase())
            }
            token => Err(Error::parse(what, token.to_string())),
        }
    }

    /// Expects a specific token, returns error if different
    fn next_expect(&mut self, expect: Token) -> Result<()> {
        let token = self.scan_ignore_whitespace();
        if token != expect {
            return Err(Error::parse(expect.to_string(), token.to_string()));
        }
        Ok(())
    }
}
