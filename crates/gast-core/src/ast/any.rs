//! [`Any`]: a value of any node category, used for escape-hatch payloads and as
//! the uniform entry point of the traversal engines.

use crate::ast::{
    Argument, Attribute, Definition, DefinitionKind, Directive, DottedIdent, Entity, Expr,
    Field, Ident, LabelIdent, Literal, ModuleName, Name, Parameter, Pattern, Stmt, Token, Type,
    TypeArgument, TypeParameter,
};

common_enum! {
    #[derive(derive_more::From)]
    pub enum Any {
        E(Expr),
        S(Stmt),
        T(Type),
        P(Pattern),
        Def(Definition),
        Dir(Directive),
        At(Attribute),
        Pa(Parameter),
        Ar(Argument),
        I(Ident),
        N(Name),
        En(Entity),
        Dk(DefinitionKind),
        Di(DottedIdent),
        Modn(ModuleName),
        Fld(Field),
        Ta(TypeArgument),
        Tp(TypeParameter),
        L(Literal),
        Tk(Token),
        Lbl(LabelIdent),
        Ss(Vec<Stmt>),
        Params(Vec<Parameter>),
        Args(Vec<Argument>),
        Anys(Vec<Any>),
    }
}

impl Any {
    /// Whether this value is, or directly lists, statements.
    ///
    /// Statements nested inside expressions (lambda bodies, anonymous classes)
    /// do not count: they are reached through the expression.
    pub fn holds_stmt(&self) -> bool {
        match self {
            Any::S(_) | Any::Ss(_) | Any::Def(_) | Any::Dk(_) => true,
            Any::Fld(Field::FieldStmt(_)) => true,
            Any::Anys(items) => items.iter().any(Any::holds_stmt),
            _ => false,
        }
    }

    /// Statements standing for this value; non-statement values are wrapped in
    /// an expression statement.
    pub fn into_stmts(self) -> Vec<Stmt> {
        match self {
            Any::S(s) => vec![s],
            Any::Ss(ss) => ss,
            Any::Def(def) => vec![Stmt::def(def)],
            Any::Fld(Field::FieldStmt(s)) => vec![s],
            Any::Anys(items) => items.into_iter().flat_map(Any::into_stmts).collect(),
            Any::E(e) => vec![Stmt::expr(e, Token::fake(";"))],
            other => {
                let kind = other.kind_name();
                vec![Stmt::expr(Expr::todo(kind, vec![other]), Token::fake(";"))]
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Any::E(_) => "expr",
            Any::S(_) => "stmt",
            Any::T(_) => "type",
            Any::P(_) => "pattern",
            Any::Def(_) => "definition",
            Any::Dir(_) => "directive",
            Any::At(_) => "attribute",
            Any::Pa(_) => "parameter",
            Any::Ar(_) => "argument",
            Any::I(_) => "ident",
            Any::N(_) => "name",
            Any::En(_) => "entity",
            Any::Dk(_) => "definition kind",
            Any::Di(_) => "dotted ident",
            Any::Modn(_) => "module name",
            Any::Fld(_) => "field",
            Any::Ta(_) => "type argument",
            Any::Tp(_) => "type parameter",
            Any::L(_) => "literal",
            Any::Tk(_) => "token",
            Any::Lbl(_) => "label",
            Any::Ss(_) => "stmts",
            Any::Params(_) => "parameters",
            Any::Args(_) => "arguments",
            Any::Anys(_) => "anys",
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Any::E(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_stmts(&self) -> Option<&[Stmt]> {
        match self {
            Any::Ss(ss) => Some(ss),
            _ => None,
        }
    }
}
