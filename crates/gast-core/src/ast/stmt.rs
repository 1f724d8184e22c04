use crate::ast::{
    Any, BExpr, Bracket, Definition, Directive, Entity, Expr, Ident, Pattern, Token,
    VariableDefinition, Wrap,
};

pub type BStmt = Box<Stmt>;

/// A whole file: its top-level statements.
pub type Program = Vec<Stmt>;

common_enum! {
    pub enum LabelIdent {
        None,
        Id(Ident),
        Int(Wrap<Option<i64>>),
        Dynamic(BExpr),
    }
}

common_enum! {
    pub enum ForVarOrExpr {
        /// newvar
        InitVar(Entity, VariableDefinition),
        InitExpr(Expr),
    }
}

common_enum! {
    pub enum ForHeader {
        /// `for (init; cond; update)`; absent clauses stay `None`.
        Classic(Vec<ForVarOrExpr>, Option<Expr>, Option<Expr>),
        /// `for (pat in e)`; the pattern introduces newvars.
        Each(Pattern, Token, Expr),
        Ellipsis(Token),
    }
}

common_enum! {
    pub enum Case {
        Case(Token, Pattern),
        Default(Token),
        /// `case e:` where `e` is an arbitrary expression, not a pattern.
        CaseEqualExpr(Token, Expr),
    }
}

common_struct! {
    pub struct CaseAndBody {
        pub cases: Vec<Case>,
        pub body: Stmt,
    }
}

common_struct! {
    /// `catch (pat) body`; the pattern introduces newvars.
    pub struct Catch {
        pub tok: Token,
        pub pat: Pattern,
        pub body: Stmt,
    }
}

common_struct! {
    pub struct Finally {
        pub tok: Token,
        pub body: Stmt,
    }
}

common_enum! {
    /// Tag of [`Stmt::OtherStmtWithStmt`]: constructs wrapping exactly one statement.
    pub enum OtherStmtWithStmtOp {
        /// `with e: body`, try-with-resources.
        With,
        Synchronized,
        /// `else` arm of a Python loop or try.
        Else,
        /// Java `static { ... }` initializer.
        StaticInit,
        Todo(String),
    }
}

common_enum! {
    /// Tag of [`Stmt::OtherStmt`]. The payload never holds statements.
    pub enum OtherStmtOp {
        Pass,
        Delete,
        Print,
        Exec,
        Empty,
        Todo(String),
    }
}

common_enum! {
    pub enum Stmt {
        ExprStmt(Expr, Token),
        DefStmt(Box<Definition>),
        DirectiveStmt(Box<Directive>),
        /// newscope
        Block(Bracket<Vec<Stmt>>),
        If(Token, Expr, BStmt, Option<BStmt>),
        While(Token, Expr, BStmt),
        DoWhile(Token, BStmt, Expr),
        /// newscope
        For(Token, ForHeader, BStmt),
        Switch(Token, Option<Expr>, Vec<CaseAndBody>),
        Return(Token, Option<Expr>, Token),
        Continue(Token, LabelIdent, Token),
        Break(Token, LabelIdent, Token),
        Label(Ident, BStmt),
        Goto(Token, Ident),
        Throw(Token, Expr, Token),
        Try(Token, BStmt, Vec<Catch>, Option<Box<Finally>>),
        Assert(Token, Expr, Option<Expr>, Token),
        DisjStmt(BStmt, BStmt),
        OtherStmtWithStmt(OtherStmtWithStmtOp, Option<Expr>, BStmt),
        OtherStmt(OtherStmtOp, Vec<Any>),
    }
}

impl Stmt {
    pub fn expr(expr: Expr, sc: Token) -> Stmt {
        Stmt::ExprStmt(expr, sc)
    }

    pub fn def(def: Definition) -> Stmt {
        Stmt::DefStmt(Box::new(def))
    }

    pub fn directive(dir: Directive) -> Stmt {
        Stmt::DirectiveStmt(Box::new(dir))
    }

    pub fn block(open: Token, stmts: Vec<Stmt>, close: Token) -> Stmt {
        Stmt::Block(Bracket::new(open, stmts, close))
    }

    pub fn fake_block(stmts: Vec<Stmt>) -> Stmt {
        Stmt::Block(Bracket::new(Token::fake("{"), stmts, Token::fake("}")))
    }

    /// Escape hatch for statements without nested statements.
    ///
    /// Statement-bearing constructs belong in [`Stmt::OtherStmtWithStmt`] so
    /// that control-flow builders see them.
    pub fn other(op: OtherStmtOp, payload: Vec<Any>) -> Stmt {
        debug_assert!(
            payload.iter().all(|any| !any.holds_stmt()),
            "OtherStmt payload must not contain statements"
        );
        Stmt::OtherStmt(op, payload)
    }

    pub fn other_with_stmt(op: OtherStmtWithStmtOp, expr: Option<Expr>, stmt: Stmt) -> Stmt {
        Stmt::OtherStmtWithStmt(op, expr, Box::new(stmt))
    }

    pub fn todo(kind: &str, payload: Vec<Any>) -> Stmt {
        Stmt::other(OtherStmtOp::Todo(kind.to_string()), payload)
    }

    /// Escape hatch for an unmodelled construct whose children may be statements.
    ///
    /// Falls back to [`Stmt::OtherStmtWithStmt`] over a block of the children when
    /// the payload would not be allowed in [`Stmt::OtherStmt`].
    pub fn todo_any(kind: &str, payload: Vec<Any>) -> Stmt {
        if !payload.iter().any(Any::holds_stmt) {
            return Stmt::todo(kind, payload);
        }
        let body = payload.into_iter().flat_map(Any::into_stmts).collect();
        Stmt::other_with_stmt(
            OtherStmtWithStmtOp::Todo(kind.to_string()),
            None,
            Stmt::fake_block(body),
        )
    }

    /// Statements of a block, or the statement itself.
    pub fn stmts(&self) -> Vec<&Stmt> {
        match self {
            Stmt::Block(block) => block.value.iter().collect(),
            other => vec![other],
        }
    }

    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            Stmt::DefStmt(def) => Some(def),
            _ => None,
        }
    }
}
