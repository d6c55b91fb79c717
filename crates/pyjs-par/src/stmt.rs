//! Statement and block parsing.

use pyjs_lex::TokenKind;

use crate::ast::*;
use crate::{ParseError, Parser};

impl Parser {
    /// Parses one top-level statement. `import` and `def` are only legal
    /// here; everything else is shared with block statements.
    pub(crate) fn parse_top_level(&mut self) -> Result<Stmt, ParseError> {
        match self.current().kind {
            TokenKind::Import => self.parse_import(),
            TokenKind::Def => self.parse_function_declaration(),
            _ => self.parse_statement(),
        }
    }

    /// Parses one statement inside a block (or a shared top-level form).
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current().kind {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_loop(),
            TokenKind::For => self.parse_for_loop(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => {
                let token = self.current().clone();
                self.advance();
                Ok(Stmt::Break(token.position))
            }
            TokenKind::Continue => {
                let token = self.current().clone();
                self.advance();
                Ok(Stmt::Continue(token.position))
            }
            TokenKind::Variable if self.peek_second().kind.is_assign_op() => {
                self.parse_assignment()
            }
            kind if kind.starts_expression() => {
                let position = self.current().position;
                let expression = self.parse_expression()?;
                Ok(Stmt::Expression(ExprStmt {
                    expression,
                    position,
                }))
            }
            found => Err(ParseError::UnexpectedToken {
                expected: "statement".to_string(),
                found,
                position: self.current().position,
            }),
        }
    }

    /// `import NAME`
    fn parse_import(&mut self) -> Result<Stmt, ParseError> {
        let token = self.expect(TokenKind::Import, "'import'")?;
        let module = self.expect(TokenKind::Variable, "module name")?;
        Ok(Stmt::Import(Import {
            module: module.lexeme,
            position: token.position,
        }))
    }

    /// `def NAME(P1, ...): BODY`
    fn parse_function_declaration(&mut self) -> Result<Stmt, ParseError> {
        let token = self.expect(TokenKind::Def, "'def'")?;
        let name = self.expect(TokenKind::Variable, "function name")?;
        self.expect(TokenKind::LParen, "'('")?;
        let parameters = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        let body = self.parse_block()?;

        Ok(Stmt::FunctionDecl(FunctionDecl {
            name: name.lexeme,
            parameters,
            body,
            return_type: DataType::Any,
            position: token.position,
        }))
    }

    /// Comma-separated identifiers up to the closing parenthesis.
    fn parse_parameter_list(&mut self) -> Result<Vec<Ident>, ParseError> {
        let mut parameters = Vec::new();
        if !self.check(TokenKind::RParen) {
            let first = self.expect(TokenKind::Variable, "parameter name")?;
            parameters.push(Ident {
                name: first.lexeme,
                position: first.position,
            });
            while self.check(TokenKind::Comma) {
                self.advance();
                let next = self.expect(TokenKind::Variable, "parameter name")?;
                parameters.push(Ident {
                    name: next.lexeme,
                    position: next.position,
                });
            }
        }
        Ok(parameters)
    }

    /// Parses a block: `Indent` statements `Dedent`, or a single inline
    /// statement when no indent follows the colon. `else`/`elif` terminate
    /// the block without being consumed.
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let position = self.current().position;
        let mut statements = Vec::new();

        if self.check(TokenKind::Indent) {
            self.advance();
            loop {
                self.skip_newlines();
                if matches!(
                    self.current().kind,
                    TokenKind::Dedent | TokenKind::Eof | TokenKind::Else | TokenKind::Elif
                ) {
                    break;
                }
                statements.push(self.parse_statement()?);
                self.skip_newlines();
            }
            if self.check(TokenKind::Dedent) {
                self.advance();
            }
        } else if !matches!(self.current().kind, TokenKind::Newline | TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }

        Ok(Block {
            statements,
            position,
        })
    }

    /// `return [EXPR]`. The value is absent iff the line ends right after
    /// the keyword.
    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let token = self.expect(TokenKind::Return, "'return'")?;
        let value = if matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof
        ) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        Ok(Stmt::Return(ReturnStmt {
            value,
            position: token.position,
        }))
    }

    /// `NAME = EXPR` or a compound form; `x += e` expands to `x = x + e`
    /// during parsing, and analogously for the other compound operators.
    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let target_token = self.expect(TokenKind::Variable, "assignment target")?;
        let target = Ident {
            name: target_token.lexeme,
            position: target_token.position,
        };

        let op_token = self.current().clone();
        let compound = match op_token.kind {
            TokenKind::Assign => None,
            TokenKind::PlusAssign => Some(BinOp::Add),
            TokenKind::MinusAssign => Some(BinOp::Sub),
            TokenKind::StarAssign => Some(BinOp::Mul),
            TokenKind::SlashAssign => Some(BinOp::Div),
            TokenKind::PercentAssign => Some(BinOp::Mod),
            found => {
                return Err(ParseError::UnexpectedToken {
                    expected: "assignment operator".to_string(),
                    found,
                    position: op_token.position,
                })
            }
        };
        self.advance();

        let rhs = self.parse_expression()?;
        let value = match compound {
            Some(op) => Expr::Binary(Box::new(BinaryExpr {
                left: Expr::Identifier(target.clone()),
                op,
                right: rhs,
                position: op_token.position,
            })),
            None => rhs,
        };

        Ok(Stmt::Assign(Assign {
            position: target.position,
            target,
            value,
        }))
    }

    /// `if COND: THEN [elif ...] [else: ELSE]`
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        Ok(Stmt::If(self.parse_if_chain(TokenKind::If)?))
    }

    /// Parses an `if` or `elif` head plus its branches. An `elif` becomes a
    /// nested `IfStmt` in the else-branch, keeping the chain explicit.
    fn parse_if_chain(&mut self, keyword: TokenKind) -> Result<IfStmt, ParseError> {
        let description = if keyword == TokenKind::If {
            "'if'"
        } else {
            "'elif'"
        };
        let token = self.expect(keyword, description)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        let then_branch = self.parse_block()?;
        self.skip_newlines();

        let else_branch = match self.current().kind {
            TokenKind::Elif => Some(ElseBranch::If(Box::new(
                self.parse_if_chain(TokenKind::Elif)?,
            ))),
            TokenKind::Else => {
                self.advance();
                self.expect(TokenKind::Colon, "':'")?;
                self.skip_newlines();
                Some(ElseBranch::Block(self.parse_block()?))
            }
            _ => None,
        };

        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
            position: token.position,
        })
    }

    /// `while COND: BODY`
    fn parse_while_loop(&mut self) -> Result<Stmt, ParseError> {
        let token = self.expect(TokenKind::While, "'while'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        let body = self.parse_block()?;
        Ok(Stmt::While(WhileStmt {
            condition,
            body,
            position: token.position,
        }))
    }

    /// `for VAR in ITER: BODY`
    fn parse_for_loop(&mut self) -> Result<Stmt, ParseError> {
        let token = self.expect(TokenKind::For, "'for'")?;
        let variable_token = self.expect(TokenKind::Variable, "loop variable")?;
        let variable = Ident {
            name: variable_token.lexeme,
            position: variable_token.position,
        };
        self.expect(TokenKind::In, "'in'")?;
        let iterable = self.parse_expression()?;
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        let body = self.parse_block()?;
        Ok(Stmt::For(ForStmt {
            variable,
            iterable,
            body,
            position: token.position,
        }))
    }
}
