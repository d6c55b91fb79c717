//! Expression parsing by precedence climbing.
//!
//! Each precedence level is its own function calling the next-tighter level;
//! `**` recurses into itself on the right for right-associativity. The
//! subset has no chained-comparison semantics: `a < b < c` parses as
//! `(a < b) < c`.

use pyjs_lex::TokenKind;

use crate::ast::*;
use crate::{ParseError, Parser};

impl Parser {
    /// Entry point: parses one expression at the lowest precedence level.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_logical_and()?;
        while self.check(TokenKind::Or) {
            let position = self.current().position;
            self.advance();
            let right = self.parse_logical_and()?;
            node = Expr::Binary(Box::new(BinaryExpr {
                left: node,
                op: BinOp::Or,
                right,
                position,
            }));
        }
        Ok(node)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_comparison()?;
        while self.check(TokenKind::And) {
            let position = self.current().position;
            self.advance();
            let right = self.parse_comparison()?;
            node = Expr::Binary(Box::new(BinaryExpr {
                left: node,
                op: BinOp::And,
                right,
                position,
            }));
        }
        Ok(node)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_addition()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Lt => BinOp::Lt,
                TokenKind::GtEq => BinOp::GtEq,
                TokenKind::LtEq => BinOp::LtEq,
                _ => break,
            };
            let position = self.current().position;
            self.advance();
            let right = self.parse_addition()?;
            node = Expr::Binary(Box::new(BinaryExpr {
                left: node,
                op,
                right,
                position,
            }));
        }
        Ok(node)
    }

    fn parse_addition(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_multiplication()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let position = self.current().position;
            self.advance();
            let right = self.parse_multiplication()?;
            node = Expr::Binary(Box::new(BinaryExpr {
                left: node,
                op,
                right,
                position,
            }));
        }
        Ok(node)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_power()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let position = self.current().position;
            self.advance();
            let right = self.parse_power()?;
            node = Expr::Binary(Box::new(BinaryExpr {
                left: node,
                op,
                right,
                position,
            }));
        }
        Ok(node)
    }

    /// `**` is right-associative: the right operand recurses into this
    /// level instead of the next-tighter one.
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let node = self.parse_unary()?;
        if self.check(TokenKind::StarStar) {
            let position = self.current().position;
            self.advance();
            let right = self.parse_power()?;
            return Ok(Expr::Binary(Box::new(BinaryExpr {
                left: node,
                op: BinOp::Pow,
                right,
                position,
            })));
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        let position = self.current().position;
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary(Box::new(UnaryExpr {
            op,
            operand,
            position,
        })))
    }

    /// Primary expressions: identifiers (possibly called), literals,
    /// parenthesized expressions and list literals.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        match token.kind {
            // `print` and `str` are reserved but legal as callees or bare
            // names; `str(x)` is how string coercion is spelled.
            TokenKind::Variable | TokenKind::Print | TokenKind::Str => {
                self.advance();
                let ident = Ident {
                    name: token.lexeme,
                    position: token.position,
                };
                if self.check(TokenKind::LParen) {
                    return self.parse_function_call(ident);
                }
                Ok(Expr::Identifier(ident))
            }
            TokenKind::Integer => {
                self.advance();
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    ParseError::InvalidLiteral {
                        what: "integer",
                        lexeme: token.lexeme.clone(),
                        position: token.position,
                    }
                })?;
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::Int(value),
                    ty: DataType::Int,
                    position: token.position,
                }))
            }
            TokenKind::FloatNumber => {
                self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    ParseError::InvalidLiteral {
                        what: "float",
                        lexeme: token.lexeme.clone(),
                        position: token.position,
                    }
                })?;
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::Float(value),
                    ty: DataType::Float,
                    position: token.position,
                }))
            }
            TokenKind::String | TokenKind::Char => {
                self.advance();
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::Str(token.lexeme),
                    ty: DataType::String,
                    position: token.position,
                }))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::Bool(true),
                    ty: DataType::Boolean,
                    position: token.position,
                }))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::Bool(false),
                    ty: DataType::Boolean,
                    position: token.position,
                }))
            }
            TokenKind::None => {
                self.advance();
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::None,
                    ty: DataType::None,
                    position: token.position,
                }))
            }
            TokenKind::LParen => {
                self.advance();
                let node = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(node)
            }
            TokenKind::LBracket => self.parse_list_literal(),
            found => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found,
                position: token.position,
            }),
        }
    }

    /// `NAME(ARG, ...)`. The opening parenthesis is the current token.
    fn parse_function_call(&mut self, callee: Ident) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let arguments = self.parse_argument_list()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::Call(CallExpr {
            position: callee.position,
            callee,
            arguments,
        }))
    }

    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RParen) {
            arguments.push(self.parse_expression()?);
            while self.check(TokenKind::Comma) {
                self.advance();
                arguments.push(self.parse_expression()?);
            }
        }
        Ok(arguments)
    }

    /// `[E1, ...]`. Every element must reduce to a literal value.
    fn parse_list_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.expect(TokenKind::LBracket, "'['")?;
        let mut elements = Vec::new();
        if !self.check(TokenKind::RBracket) {
            elements.push(self.parse_expression()?);
            while self.check(TokenKind::Comma) {
                self.advance();
                elements.push(self.parse_expression()?);
            }
        }
        self.expect(TokenKind::RBracket, "']'")?;

        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                Expr::Literal(literal) => values.push(literal.value),
                other => {
                    return Err(ParseError::NonLiteralListElement {
                        position: other.position(),
                    })
                }
            }
        }

        Ok(Expr::Literal(Literal {
            value: LiteralValue::List(values),
            ty: DataType::List,
            position: token.position,
        }))
    }
}
