use crate::ast::{
    Any, BPattern, BType, Bracket, ClassDefinition, Field, FunctionDefinition, Ident, IdInfoCell,
    Name, Pattern, Token, Type, Wrap,
};

pub type BExpr = Box<Expr>;

common_enum! {
    pub enum Literal {
        Bool(Wrap<bool>),
        /// Value is `None` when the text does not fit an `i64`.
        Int(Wrap<Option<i64>>),
        Float(Wrap<Option<f64>>),
        Char(Wrap<String>),
        String(Wrap<String>),
        Regexp(Wrap<String>),
        Unit(Token),
        Null(Token),
        Undefined(Token),
        Imag(Wrap<String>),
    }
}

impl Literal {
    pub fn tok(&self) -> &Token {
        match self {
            Literal::Bool(w) => &w.tok,
            Literal::Int(w) => &w.tok,
            Literal::Float(w) => &w.tok,
            Literal::Char(w) | Literal::String(w) | Literal::Regexp(w) | Literal::Imag(w) => &w.tok,
            Literal::Unit(tok) | Literal::Null(tok) | Literal::Undefined(tok) => tok,
        }
    }
}

common_tag! {
    pub enum ContainerOperator {
        Array,
        List,
        Set,
        Dict,
    }
}

common_tag! {
    pub enum Operator {
        Plus,
        Minus,
        Mult,
        Div,
        Mod,
        Pow,
        FloorDiv,
        MatMult,
        LSL,
        LSR,
        ASR,
        BitOr,
        BitXor,
        BitAnd,
        BitNot,
        And,
        Or,
        Xor,
        Not,
        Eq,
        NotEq,
        /// `===`
        PhysEq,
        /// `!==`
        NotPhysEq,
        Lt,
        LtE,
        Gt,
        GtE,
        Concat,
        In,
        NotIn,
        Is,
        NotIs,
        /// `??`
        Nullish,
    }
}

impl Operator {
    /// Binary/unary operator spelled the C way (`+`, `<<`, `&&`, ...).
    pub fn from_c_like(text: &str) -> Option<Operator> {
        Some(match text {
            "+" => Operator::Plus,
            "-" => Operator::Minus,
            "*" => Operator::Mult,
            "/" => Operator::Div,
            "%" => Operator::Mod,
            "**" => Operator::Pow,
            "<<" => Operator::LSL,
            ">>" => Operator::ASR,
            ">>>" => Operator::LSR,
            "|" => Operator::BitOr,
            "^" => Operator::BitXor,
            "&" => Operator::BitAnd,
            "~" => Operator::BitNot,
            "&&" => Operator::And,
            "||" => Operator::Or,
            "!" => Operator::Not,
            "==" => Operator::Eq,
            "!=" => Operator::NotEq,
            "===" => Operator::PhysEq,
            "!==" => Operator::NotPhysEq,
            "<" => Operator::Lt,
            "<=" => Operator::LtE,
            ">" => Operator::Gt,
            ">=" => Operator::GtE,
            "??" => Operator::Nullish,
            "in" => Operator::In,
            _ => return None,
        })
    }

    /// Operator of a compound assignment such as `+=`.
    pub fn from_assign_op(text: &str) -> Option<Operator> {
        let op = text.strip_suffix('=')?;
        match op {
            "//" => Some(Operator::FloorDiv),
            "@" => Some(Operator::MatMult),
            _ => Operator::from_c_like(op),
        }
    }
}

common_tag! {
    pub enum IncrDecr {
        Incr,
        Decr,
    }
}

common_tag! {
    pub enum PrefixPostfix {
        Prefix,
        Postfix,
    }
}

common_tag! {
    pub enum ConcatKind {
        /// Template literal or f-string.
        Interpolated,
        /// Adjacent string literals.
        Implicit,
    }
}

common_tag! {
    /// Built-in identifiers and keyword-like operators.
    pub enum SpecialKind {
        This,
        Super,
        Self_,
        Parent,
        Eval,
        Typeof,
        Instanceof,
        Sizeof,
        New,
        Spread,
        HashSplat,
        ConcatString(ConcatKind),
        InterpolatedElement,
        Op(Operator),
        IncrDecr(IncrDecr, PrefixPostfix),
    }
}

common_enum! {
    /// Tag of an [`Expr::OtherExpr`] escape hatch.
    pub enum OtherExprOp {
        /// `Foo::bar`
        MethodRef,
        /// `Foo.class`
        ClassLiteral,
        /// A statement used in expression position (Java switch expressions).
        StmtExpr,
        /// List/set/dict comprehension or generator expression.
        Comprehension,
        CompFor,
        CompIf,
        /// Chained comparison `a < b < c`.
        CmpOps,
        Delete,
        Void,
        /// `outer.new Inner()`
        QualifiedNew,
        /// Construct the normalizer does not model; carries the parser's node kind.
        Todo(String),
    }
}

common_enum! {
    pub enum OtherArgOp {
        /// Binding pattern in argument position (`x instanceof Point p`).
        Pattern,
        Todo(String),
    }
}

common_enum! {
    pub enum FieldName {
        EN(Name),
        EDynamic(BExpr),
    }
}

common_enum! {
    pub enum Argument {
        Arg(Expr),
        ArgKwd(Ident, Expr),
        ArgType(Type),
        ArgOther(OtherArgOp, Vec<Any>),
    }
}

pub type Arguments = Bracket<Vec<Argument>>;

common_struct! {
    pub struct Slice {
        pub start: Option<BExpr>,
        pub end: Option<BExpr>,
        pub step: Option<BExpr>,
    }
}

common_struct! {
    /// One arm of a [`Expr::MatchPattern`].
    pub struct Action {
        pub pat: Pattern,
        pub body: Expr,
    }
}

common_enum! {
    pub enum Expr {
        L(Literal),
        Container(ContainerOperator, Bracket<Vec<Expr>>),
        Tuple(Bracket<Vec<Expr>>),
        /// Object literal; fields are definitions.
        Record(Bracket<Vec<Field>>),
        Constructor(Name, Vec<Expr>),
        /// newscope
        Lambda(Box<FunctionDefinition>),
        AnonClass(Box<ClassDefinition>),
        N(Name),
        IdSpecial(Wrap<SpecialKind>),
        Call(BExpr, Arguments),
        DotAccess(BExpr, Token, FieldName),
        ArrayAccess(BExpr, Bracket<BExpr>),
        SliceAccess(BExpr, Bracket<Slice>),
        Assign(BExpr, Token, BExpr),
        AssignOp(BExpr, Wrap<Operator>, BExpr),
        /// Destructuring binding; the pattern introduces newvars.
        LetPattern(BPattern, BExpr),
        Conditional(BExpr, BExpr, BExpr),
        MatchPattern(BExpr, Vec<Action>),
        /// `yield e`; the flag marks `yield*` / `yield from`.
        Yield(Token, Option<BExpr>, bool),
        Await(Token, BExpr),
        Cast(BType, BExpr),
        Seq(Vec<Expr>),
        Ref(Token, BExpr),
        DeRef(Token, BExpr),
        Ellipsis(Token),
        DeepEllipsis(Bracket<BExpr>),
        TypedMetavar(Ident, Token, BType),
        DisjExpr(BExpr, BExpr),
        OtherExpr(OtherExprOp, Vec<Any>),
    }
}

impl Expr {
    pub fn id(ident: Ident) -> Expr {
        Expr::N(Name::Id(ident, IdInfoCell::new()))
    }

    pub fn name(name: Name) -> Expr {
        Expr::N(name)
    }

    pub fn special(kind: SpecialKind, tok: Token) -> Expr {
        Expr::IdSpecial(Wrap::new(kind, tok))
    }

    pub fn call(callee: Expr, args: Arguments) -> Expr {
        Expr::Call(Box::new(callee), args)
    }

    /// Apply a built-in operator; operands travel as plain arguments between fake parens.
    pub fn op_call(op: Operator, tok: Token, operands: Vec<Expr>) -> Expr {
        Expr::call(
            Expr::special(SpecialKind::Op(op), tok),
            Bracket::fake(operands.into_iter().map(Argument::Arg).collect()),
        )
    }

    pub fn special_call(kind: SpecialKind, tok: Token, args: Vec<Argument>) -> Expr {
        Expr::call(Expr::special(kind, tok), Bracket::fake(args))
    }

    pub fn dot(obj: Expr, dot: Token, field: Ident) -> Expr {
        Expr::DotAccess(Box::new(obj), dot, FieldName::EN(Name::id(field)))
    }

    pub fn assign(lhs: Expr, tok: Token, rhs: Expr) -> Expr {
        Expr::Assign(Box::new(lhs), tok, Box::new(rhs))
    }

    pub fn string(value: impl Into<String>, tok: Token) -> Expr {
        Expr::L(Literal::String(Wrap::new(value.into(), tok)))
    }

    pub fn int(value: Option<i64>, tok: Token) -> Expr {
        Expr::L(Literal::Int(Wrap::new(value, tok)))
    }

    pub fn other(op: OtherExprOp, payload: Vec<Any>) -> Expr {
        Expr::OtherExpr(op, payload)
    }

    pub fn todo(kind: &str, payload: Vec<Any>) -> Expr {
        Expr::OtherExpr(OtherExprOp::Todo(kind.to_string()), payload)
    }

    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Expr::N(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, Expr::OtherExpr(..))
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::L(lit)
    }
}

impl From<Name> for Expr {
    fn from(name: Name) -> Self {
        Expr::N(name)
    }
}

/// Parse an integer literal the way most C-family languages spell it.
pub fn parse_int_literal(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .trim_end_matches(['l', 'L', 'n'])
        .to_string();
    let lower = cleaned.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()
    } else if lower.len() > 1 && lower.starts_with('0') && lower.chars().all(|c| c.is_ascii_digit()) {
        i64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

pub fn parse_float_literal(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    cleaned
        .trim_end_matches(['f', 'F', 'd', 'D'])
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_spellings() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("0x1F"), Some(31));
        assert_eq!(parse_int_literal("0b101"), Some(5));
        assert_eq!(parse_int_literal("1_000L"), Some(1000));
        assert_eq!(parse_int_literal("017"), Some(15));
        assert_eq!(parse_int_literal("0"), Some(0));
        assert_eq!(parse_int_literal("99999999999999999999"), None);
    }

    #[test]
    fn float_spellings() {
        assert_eq!(parse_float_literal("1.5"), Some(1.5));
        assert_eq!(parse_float_literal("2.0f"), Some(2.0));
        assert_eq!(parse_float_literal("1e3"), Some(1000.0));
    }

    #[test]
    fn assign_operators() {
        assert_eq!(Operator::from_assign_op("+="), Some(Operator::Plus));
        assert_eq!(Operator::from_assign_op(">>>="), Some(Operator::LSR));
        assert_eq!(Operator::from_assign_op("//="), Some(Operator::FloorDiv));
        assert_eq!(Operator::from_assign_op("="), None);
    }
}
