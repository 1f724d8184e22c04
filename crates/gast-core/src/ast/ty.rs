use crate::ast::{Any, BExpr, Bracket, Field, Ident, Name, Parameter, Token, Wrap};

pub type BType = Box<Type>;

common_enum! {
    pub enum OtherTypeOp {
        /// Annotated type such as `@NonNull String`.
        Annotated,
        Todo(String),
    }
}

common_enum! {
    pub enum TypeArgument {
        TypeArg(Type),
        /// `?`, `? extends T` (flag `true`), `? super T` (flag `false`).
        Wildcard(Token, Option<(Wrap<bool>, Type)>),
        OtherTypeArg(OtherTypeOp, Vec<Any>),
    }
}

pub type TypeArguments = Bracket<Vec<TypeArgument>>;

common_struct! {
    pub struct TypeParameter {
        pub name: Ident,
        pub bounds: Vec<Type>,
    }
}

common_enum! {
    pub enum Type {
        /// `int`, `void`, `boolean`, ...
        TyBuiltin(Wrap<String>),
        TyN(Name),
        TyApply(BType, TypeArguments),
        TyVar(Ident),
        TyFun(Vec<Parameter>, BType),
        /// Array type; the bracket holds the dimension expression when written.
        TyArray(Bracket<Option<BExpr>>, BType),
        TyPointer(Token, BType),
        TyTuple(Bracket<Vec<Type>>),
        /// `T?`
        TyQuestion(BType, Token),
        /// Anonymous record type.
        TyAnd(Bracket<Vec<Field>>),
        /// Union type `A | B`.
        TyOr(BType, Token, BType),
        OtherType(OtherTypeOp, Vec<Any>),
    }
}

impl Type {
    pub fn builtin(name: impl Into<String>, tok: Token) -> Type {
        Type::TyBuiltin(Wrap::new(name.into(), tok))
    }

    pub fn name(name: Name) -> Type {
        Type::TyN(name)
    }

    pub fn array(open: Token, dim: Option<BExpr>, close: Token, elem: Type) -> Type {
        Type::TyArray(Bracket::new(open, dim, close), Box::new(elem))
    }

    pub fn todo(kind: &str, payload: Vec<Any>) -> Type {
        Type::OtherType(OtherTypeOp::Todo(kind.to_string()), payload)
    }

    /// Number of array layers around the innermost element type.
    pub fn array_depth(&self) -> usize {
        match self {
            Type::TyArray(_, elem) => 1 + elem.array_depth(),
            _ => 0,
        }
    }
}
