// kiz-parser - Parser for kiz
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Recursive descent parser for kiz source code.
//!
//! Statements are newline-terminated; blocks are closed by `end` (or
//! `else`/`catch` for their owning constructs). Assignment targets are
//! disambiguated after parsing the left-hand expression: an identifier
//! becomes a plain assignment, a member access a member set, an index
//! access an item set.

use std::fmt;

use crate::Span;
use crate::ast::{BinaryOp, Block, CatchClause, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use crate::lexer::{LexError, Lexer};
use crate::token::{Token, TokenKind};

/// Parser error with position information.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Syntax error at {}:{}: {}",
            self.span.line_start, self.span.col_start, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            message: e.message,
            span: e.span,
        }
    }
}

type Result<T> = std::result::Result<T, ParseError>;

/// The kiz parser.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Parse a whole source string into a block of statements.
    pub fn parse_source(source: &str) -> Result<Block> {
        Parser::parse_source_at(source, 1)
    }

    /// Parse a source string whose first line is numbered `start_line`
    /// (used by the REPL, which accumulates input into one virtual file).
    pub fn parse_source_at(source: &str, start_line: usize) -> Result<Block> {
        let tokens = Lexer::with_start_line(source, start_line).tokenize()?;
        Parser::new(tokens).parse_program()
    }

    /// Create a parser over a token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parse statements until end of input.
    pub fn parse_program(&mut self) -> Result<Block> {
        let block = self.parse_block(&[])?;
        self.expect_kind(&TokenKind::Eof)?;
        Ok(block)
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_kind(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "expected '{}', found '{}'",
                kind,
                self.current().kind
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span)> {
        match &self.current().kind {
            TokenKind::Ident(_) => {
                let token = self.advance();
                match token.kind {
                    TokenKind::Ident(name) => Ok((name, token.span)),
                    _ => unreachable!(),
                }
            }
            other => Err(self.error_here(format!("expected identifier, found '{}'", other))),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            span: self.current().span,
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Consume the end of a statement: a newline or semicolon, or a
    /// following block terminator / end of input.
    fn end_statement(&mut self) -> Result<()> {
        match &self.current().kind {
            TokenKind::Newline | TokenKind::Semicolon => {
                self.advance();
                self.skip_newlines();
                Ok(())
            }
            TokenKind::Eof | TokenKind::End | TokenKind::Else | TokenKind::Catch => Ok(()),
            other => Err(self.error_here(format!("expected end of statement, found '{}'", other))),
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Parse statements until one of `terminators` (or end of input).
    /// The terminator token is not consumed.
    fn parse_block(&mut self, terminators: &[TokenKind]) -> Result<Block> {
        let mut statements = Vec::new();
        self.skip_newlines();
        loop {
            if self.check(&TokenKind::Eof) || terminators.iter().any(|t| self.check(t)) {
                return Ok(Block::new(statements));
            }
            statements.push(self.parse_stmt()?);
            self.skip_newlines();
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        match &self.current().kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Fn => self.parse_fn_stmt(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let token = self.advance();
                self.end_statement()?;
                Ok(Stmt::new(StmtKind::Break, token.span))
            }
            TokenKind::Next => {
                let token = self.advance();
                self.end_statement()?;
                Ok(Stmt::new(StmtKind::Next, token.span))
            }
            TokenKind::Import => self.parse_import(),
            TokenKind::Nonlocal => self.parse_scoped_assign(true),
            TokenKind::Global => self.parse_scoped_assign(false),
            TokenKind::Object => self.parse_object(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Try => self.parse_try(),
            _ => self.parse_expr_or_assign(),
        }
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let if_token = self.advance();
        let condition = self.parse_expression()?;
        self.skip_newlines();
        let then_block = self.parse_block(&[TokenKind::Else, TokenKind::End])?;
        let else_block = if self.eat(&TokenKind::Else) {
            // `else if ...` chains nest as a single-statement else block
            if self.check(&TokenKind::If) {
                let nested = self.parse_if()?;
                Some(Block::new(vec![nested]))
            } else {
                self.skip_newlines();
                let block = self.parse_block(&[TokenKind::End])?;
                self.expect_kind(&TokenKind::End)?;
                Some(block)
            }
        } else {
            self.expect_kind(&TokenKind::End)?;
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_block,
                else_block,
            },
            if_token.span,
        ))
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let token = self.advance();
        let condition = self.parse_expression()?;
        self.skip_newlines();
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect_kind(&TokenKind::End)?;
        Ok(Stmt::new(StmtKind::While { condition, body }, token.span))
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        let token = self.advance();
        let (var, _) = self.expect_ident()?;
        self.expect_kind(&TokenKind::Colon)?;
        let iter = self.parse_expression()?;
        self.skip_newlines();
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect_kind(&TokenKind::End)?;
        Ok(Stmt::new(StmtKind::For { var, iter, body }, token.span))
    }

    /// `fn name(params) ... end` is sugar for `name = fn(params) ... end`.
    fn parse_fn_stmt(&mut self) -> Result<Stmt> {
        let fn_token = self.advance();
        let (name, _) = self.expect_ident()?;
        let params = self.parse_param_list()?;
        self.skip_newlines();
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect_kind(&TokenKind::End)?;
        let span = fn_token.span;
        Ok(Stmt::new(
            StmtKind::Assign {
                name: name.clone(),
                value: Expr::new(ExprKind::Fn { name, params, body }, span),
            },
            span,
        ))
    }

    fn parse_param_list(&mut self) -> Result<Vec<String>> {
        let mut params = Vec::new();
        if self.eat(&TokenKind::LParen) {
            self.skip_newlines();
            while !self.check(&TokenKind::RParen) {
                let (param, _) = self.expect_ident()?;
                params.push(param);
                self.skip_newlines();
                if self.eat(&TokenKind::Comma) {
                    self.skip_newlines();
                } else if !self.check(&TokenKind::RParen) {
                    return Err(self.error_here("mismatched function parameters"));
                }
            }
            self.expect_kind(&TokenKind::RParen)?;
        }
        Ok(params)
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        let token = self.advance();
        let value = match &self.current().kind {
            TokenKind::Newline
            | TokenKind::Semicolon
            | TokenKind::Eof
            | TokenKind::End
            | TokenKind::Else
            | TokenKind::Catch => None,
            _ => Some(self.parse_expression()?),
        };
        self.end_statement()?;
        Ok(Stmt::new(StmtKind::Return(value), token.span))
    }

    fn parse_import(&mut self) -> Result<Stmt> {
        let token = self.advance();
        let path = match &self.current().kind {
            TokenKind::Ident(_) => self.expect_ident()?.0,
            TokenKind::Str(text) => {
                let text = text.clone();
                self.advance();
                text
            }
            other => {
                return Err(self.error_here(format!(
                    "expected module name after 'import', found '{}'",
                    other
                )));
            }
        };
        self.end_statement()?;
        Ok(Stmt::new(StmtKind::Import(path), token.span))
    }

    fn parse_scoped_assign(&mut self, nonlocal: bool) -> Result<Stmt> {
        let token = self.advance();
        let (name, _) = self.expect_ident()?;
        self.expect_kind(&TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.end_statement()?;
        let kind = if nonlocal {
            StmtKind::NonlocalAssign { name, value }
        } else {
            StmtKind::GlobalAssign { name, value }
        };
        Ok(Stmt::new(kind, token.span))
    }

    fn parse_object(&mut self) -> Result<Stmt> {
        let token = self.advance();
        let (name, _) = self.expect_ident()?;
        let parent = if self.eat(&TokenKind::Colon) {
            Some(self.expect_ident()?.0)
        } else {
            None
        };
        self.skip_newlines();
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect_kind(&TokenKind::End)?;
        Ok(Stmt::new(StmtKind::Object { name, parent, body }, token.span))
    }

    fn parse_throw(&mut self) -> Result<Stmt> {
        let token = self.advance();
        let value = self.parse_expression()?;
        self.end_statement()?;
        Ok(Stmt::new(StmtKind::Throw(value), token.span))
    }

    fn parse_try(&mut self) -> Result<Stmt> {
        let try_token = self.advance();
        self.skip_newlines();
        let body = self.parse_block(&[TokenKind::Catch, TokenKind::End])?;
        if !self.check(&TokenKind::Catch) {
            return Err(self.error_here("found try block without catch block"));
        }

        let mut catches = Vec::new();
        while self.check(&TokenKind::Catch) {
            let catch_token = self.advance();
            let (name, _) = self.expect_ident()?;
            self.expect_kind(&TokenKind::Colon)?;
            let proto = self.parse_expression()?;
            self.skip_newlines();
            let catch_body = self.parse_block(&[TokenKind::Catch, TokenKind::End])?;
            catches.push(CatchClause {
                name,
                proto,
                body: catch_body,
                span: catch_token.span,
            });
        }
        self.expect_kind(&TokenKind::End)?;
        Ok(Stmt::new(StmtKind::Try { body, catches }, try_token.span))
    }

    /// Parse an expression and, if an `=` follows, reinterpret it as an
    /// assignment target.
    fn parse_expr_or_assign(&mut self) -> Result<Stmt> {
        let expr = self.parse_expression()?;
        if self.eat(&TokenKind::Assign) {
            let value = self.parse_expression()?;
            self.end_statement()?;
            let span = expr.span;
            let kind = match expr.kind {
                ExprKind::Ident(name) => StmtKind::Assign { name, value },
                ExprKind::GetMember { object, name } => StmtKind::SetMember {
                    object: *object,
                    name,
                    value,
                },
                ExprKind::GetItem { object, mut args } => {
                    if args.len() != 1 {
                        return Err(ParseError {
                            message: "item assignment takes exactly one index".into(),
                            span,
                        });
                    }
                    StmtKind::SetItem {
                        object: *object,
                        index: args.remove(0),
                        value,
                    }
                }
                _ => {
                    return Err(ParseError {
                        message: "invalid assignment target".into(),
                        span,
                    });
                }
            };
            return Ok(Stmt::new(kind, span));
        }
        self.end_statement()?;
        let span = expr.span;
        Ok(Stmt::new(StmtKind::Expr(expr), span))
    }

    // ------------------------------------------------------------------
    // Expressions (precedence climbing)
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_not()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_not()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Not) {
            let token = self.advance();
            let operand = self.parse_not()?;
            let span = token.span.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::Ne => BinaryOp::Ne,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                TokenKind::Is => BinaryOp::Is,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Minus) {
            let token = self.advance();
            let operand = self.parse_unary()?;
            let span = token.span.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_power()
    }

    /// `^` is right-associative and binds tighter than unary minus on
    /// its left, looser on its right: `-2 ^ 2` is `-(2 ^ 2)`.
    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_postfix()?;
        if self.eat(&TokenKind::Caret) {
            let exponent = self.parse_unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match &self.current().kind {
                TokenKind::LParen => {
                    let args = self.parse_arg_list()?;
                    let span = expr.span;
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let (name, name_span) = self.expect_ident()?;
                    let span = expr.span.merge(name_span);
                    expr = Expr::new(
                        ExprKind::GetMember {
                            object: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.skip_newlines();
                    let mut args = Vec::new();
                    while !self.check(&TokenKind::RBracket) {
                        args.push(self.parse_expression()?);
                        self.skip_newlines();
                        if self.eat(&TokenKind::Comma) {
                            self.skip_newlines();
                        }
                    }
                    let close = self.expect_kind(&TokenKind::RBracket)?;
                    let span = expr.span.merge(close.span);
                    expr = Expr::new(
                        ExprKind::GetItem {
                            object: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_arg_list(&mut self) -> Result<Vec<Expr>> {
        self.expect_kind(&TokenKind::LParen)?;
        self.skip_newlines();
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) {
            args.push(self.parse_expression()?);
            self.skip_newlines();
            if self.eat(&TokenKind::Comma) {
                self.skip_newlines();
            } else if !self.check(&TokenKind::RParen) {
                return Err(self.error_here("expected ',' or ')' in argument list"));
            }
        }
        self.expect_kind(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Int(_) => {
                let token = self.advance();
                match token.kind {
                    TokenKind::Int(value) => Ok(Expr::new(ExprKind::Int(value), token.span)),
                    _ => unreachable!(),
                }
            }
            TokenKind::Decimal(_) => {
                let token = self.advance();
                match token.kind {
                    TokenKind::Decimal(text) => Ok(Expr::new(ExprKind::Decimal(text), token.span)),
                    _ => unreachable!(),
                }
            }
            TokenKind::Str(_) => {
                let token = self.advance();
                match token.kind {
                    TokenKind::Str(text) => Ok(Expr::new(ExprKind::Str(text), token.span)),
                    _ => unreachable!(),
                }
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(true), token.span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(false), token.span))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::new(ExprKind::Nil, token.span))
            }
            TokenKind::Ident(_) => {
                let token = self.advance();
                match token.kind {
                    TokenKind::Ident(name) => Ok(Expr::new(ExprKind::Ident(name), token.span)),
                    _ => unreachable!(),
                }
            }
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let expr = self.parse_expression()?;
                self.skip_newlines();
                self.expect_kind(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_dict_literal(),
            TokenKind::Fn => self.parse_fn_expr(),
            other => Err(self.error_here(format!("unexpected token '{}'", other))),
        }
    }

    fn parse_list_literal(&mut self) -> Result<Expr> {
        let open = self.expect_kind(&TokenKind::LBracket)?;
        self.skip_newlines();
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            elements.push(self.parse_expression()?);
            self.skip_newlines();
            if self.eat(&TokenKind::Comma) {
                self.skip_newlines();
            } else if !self.check(&TokenKind::RBracket) {
                return Err(self.error_here("expected ',' or ']' in list literal"));
            }
        }
        let close = self.expect_kind(&TokenKind::RBracket)?;
        Ok(Expr::new(
            ExprKind::List(elements),
            open.span.merge(close.span),
        ))
    }

    /// Dict literal: `{ key = value, ... }`.
    fn parse_dict_literal(&mut self) -> Result<Expr> {
        let open = self.expect_kind(&TokenKind::LBrace)?;
        self.skip_newlines();
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let key = self.parse_expression()?;
            self.skip_newlines();
            self.expect_kind(&TokenKind::Assign)?;
            self.skip_newlines();
            let value = self.parse_expression()?;
            entries.push((key, value));
            self.skip_newlines();
            if self.eat(&TokenKind::Comma) {
                self.skip_newlines();
            } else if !self.check(&TokenKind::RBrace) {
                return Err(self.error_here("expected ',' or '}' in dict literal"));
            }
        }
        let close = self.expect_kind(&TokenKind::RBrace)?;
        Ok(Expr::new(
            ExprKind::Dict(entries),
            open.span.merge(close.span),
        ))
    }

    /// Anonymous function expression: `fn(params) ... end`.
    fn parse_fn_expr(&mut self) -> Result<Expr> {
        let fn_token = self.expect_kind(&TokenKind::Fn)?;
        let params = self.parse_param_list()?;
        self.skip_newlines();
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect_kind(&TokenKind::End)?;
        Ok(Expr::new(
            ExprKind::Fn {
                name: String::new(),
                params,
                body,
            },
            fn_token.span,
        ))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn parse(source: &str) -> Block {
        Parser::parse_source(source).expect("parse error")
    }

    fn single_stmt(source: &str) -> StmtKind {
        let block = parse(source);
        assert_eq!(block.statements.len(), 1, "expected one statement");
        block.statements.into_iter().next().unwrap().kind
    }

    #[test]
    fn parses_assignment() {
        match single_stmt("x = 1 + 2") {
            StmtKind::Assign { name, value } => {
                assert_eq!(name, "x");
                assert!(matches!(
                    value.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Add,
                        ..
                    }
                ));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn precedence_mul_over_add() {
        match single_stmt("x = 1 + 2 * 3") {
            StmtKind::Assign { value, .. } => match value.kind {
                ExprKind::Binary {
                    op: BinaryOp::Add,
                    right,
                    ..
                } => {
                    assert!(matches!(
                        right.kind,
                        ExprKind::Binary {
                            op: BinaryOp::Mul,
                            ..
                        }
                    ));
                }
                other => panic!("expected add at top, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn power_is_right_associative() {
        match single_stmt("x = 2 ^ 3 ^ 2") {
            StmtKind::Assign { value, .. } => match value.kind {
                ExprKind::Binary {
                    op: BinaryOp::Pow,
                    right,
                    ..
                } => {
                    assert!(matches!(
                        right.kind,
                        ExprKind::Binary {
                            op: BinaryOp::Pow,
                            ..
                        }
                    ));
                }
                other => panic!("expected pow at top, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn fn_statement_desugars_to_assignment() {
        match single_stmt("fn add(a, b)\n  return a + b\nend") {
            StmtKind::Assign { name, value } => {
                assert_eq!(name, "add");
                match value.kind {
                    ExprKind::Fn { name, params, body } => {
                        assert_eq!(name, "add");
                        assert_eq!(params, vec!["a".to_string(), "b".to_string()]);
                        assert_eq!(body.statements.len(), 1);
                    }
                    other => panic!("expected fn expr, got {:?}", other),
                }
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn member_and_item_assignment_targets() {
        assert!(matches!(
            single_stmt("a.b = 1"),
            StmtKind::SetMember { .. }
        ));
        assert!(matches!(
            single_stmt("a[\"k\"] = 1"),
            StmtKind::SetItem { .. }
        ));
    }

    #[test]
    fn method_call_parses_as_call_of_member() {
        match single_stmt("xs.append(1)") {
            StmtKind::Expr(expr) => match expr.kind {
                ExprKind::Call { callee, args } => {
                    assert_eq!(args.len(), 1);
                    assert!(matches!(callee.kind, ExprKind::GetMember { .. }));
                }
                other => panic!("expected call, got {:?}", other),
            },
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn parses_if_else_chain() {
        let source = "if a\n  x = 1\nelse if b\n  x = 2\nelse\n  x = 3\nend";
        match single_stmt(source) {
            StmtKind::If { else_block, .. } => {
                let else_block = else_block.expect("missing else");
                assert_eq!(else_block.statements.len(), 1);
                assert!(matches!(
                    else_block.statements[0].kind,
                    StmtKind::If { .. }
                ));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn parses_for_loop() {
        match single_stmt("for x : [1, 2]\n  total = x\nend") {
            StmtKind::For { var, iter, .. } => {
                assert_eq!(var, "x");
                assert!(matches!(iter.kind, ExprKind::List(_)));
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn parses_try_with_two_catches() {
        let source = "try\n  f()\ncatch e : Error\n  g()\ncatch e : Object\n  h()\nend";
        match single_stmt(source) {
            StmtKind::Try { catches, .. } => {
                assert_eq!(catches.len(), 2);
                assert_eq!(catches[0].name, "e");
            }
            other => panic!("expected try, got {:?}", other),
        }
    }

    #[test]
    fn try_requires_catch() {
        assert!(Parser::parse_source("try\n  f()\nend").is_err());
    }

    #[test]
    fn parses_object_with_parent() {
        match single_stmt("object Dog : Animal\n  sound = \"woof\"\nend") {
            StmtKind::Object { name, parent, body } => {
                assert_eq!(name, "Dog");
                assert_eq!(parent.as_deref(), Some("Animal"));
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn parses_dict_literal() {
        match single_stmt("d = { \"a\" = 1, \"b\" = 2 }") {
            StmtKind::Assign { value, .. } => match value.kind {
                ExprKind::Dict(entries) => assert_eq!(entries.len(), 2),
                other => panic!("expected dict literal, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn parses_import_forms() {
        assert!(matches!(single_stmt("import utils"), StmtKind::Import(p) if p == "utils"));
        assert!(
            matches!(single_stmt("import \"lib/utils.kiz\""), StmtKind::Import(p) if p == "lib/utils.kiz")
        );
    }

    #[test]
    fn parses_nonlocal_and_global() {
        assert!(matches!(
            single_stmt("nonlocal n = 1"),
            StmtKind::NonlocalAssign { .. }
        ));
        assert!(matches!(
            single_stmt("global g = 1"),
            StmtKind::GlobalAssign { .. }
        ));
    }

    #[test]
    fn integer_literals_are_bigints() {
        match single_stmt("x = 99999999999999999999999999") {
            StmtKind::Assign { value, .. } => {
                let expected: BigInt = "99999999999999999999999999".parse().unwrap();
                assert_eq!(value.kind, ExprKind::Int(expected));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_assignment_target() {
        assert!(Parser::parse_source("1 + 2 = 3").is_err());
    }
}
