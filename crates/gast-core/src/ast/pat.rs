use crate::ast::{
    Any, Bracket, DottedIdent, Expr, Ident, IdInfoCell, Literal, Name, Token, Type,
};

pub type BPattern = Box<Pattern>;

common_struct! {
    pub struct PatRecordField {
        pub field: DottedIdent,
        pub pat: Pattern,
    }
}

common_enum! {
    pub enum OtherPatOp {
        /// A destructuring target that is an arbitrary expression (`[a.b] = xs`).
        ExprPattern,
        /// `...rest` inside a destructuring pattern.
        Rest,
        /// `{ a = 1 }`: binding with a default value.
        DefaultValue,
        Todo(String),
    }
}

common_enum! {
    pub enum Pattern {
        PatLiteral(Literal),
        PatConstructor(Name, Vec<Pattern>),
        PatRecord(Bracket<Vec<PatRecordField>>),
        /// newvar
        PatId(Ident, IdInfoCell),
        PatTuple(Bracket<Vec<Pattern>>),
        PatList(Bracket<Vec<Pattern>>),
        PatKeyVal(BPattern, BPattern),
        PatUnderscore(Token),
        PatDisj(BPattern, BPattern),
        PatTyped(BPattern, Type),
        PatWhen(BPattern, Expr),
        /// newvar
        PatAs(BPattern, Ident, IdInfoCell),
        /// Type test without binding (`catch (IOException)`).
        PatType(Type),
        /// Typed variable, as in `catch (IOException e)` or `x instanceof T t`; newvar
        PatVar(Type, Option<(Ident, IdInfoCell)>),
        PatEllipsis(Token),
        OtherPat(OtherPatOp, Vec<Any>),
    }
}

impl Pattern {
    pub fn id(ident: Ident) -> Pattern {
        Pattern::PatId(ident, IdInfoCell::new())
    }

    pub fn other(op: OtherPatOp, payload: Vec<Any>) -> Pattern {
        Pattern::OtherPat(op, payload)
    }

    pub fn todo(kind: &str, payload: Vec<Any>) -> Pattern {
        Pattern::OtherPat(OtherPatOp::Todo(kind.to_string()), payload)
    }

    /// Identifiers this pattern binds, left to right.
    pub fn bound_idents(&self) -> Vec<&Ident> {
        let mut out = Vec::new();
        self.collect_bound(&mut out);
        out
    }

    fn collect_bound<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match self {
            Pattern::PatId(id, _) => out.push(id),
            Pattern::PatAs(pat, id, _) => {
                pat.collect_bound(out);
                out.push(id);
            }
            Pattern::PatVar(_, Some((id, _))) => out.push(id),
            Pattern::PatConstructor(_, pats) => pats.iter().for_each(|p| p.collect_bound(out)),
            Pattern::PatTuple(pats) | Pattern::PatList(pats) => {
                pats.value.iter().for_each(|p| p.collect_bound(out))
            }
            Pattern::PatRecord(fields) => fields.value.iter().for_each(|f| f.pat.collect_bound(out)),
            Pattern::PatKeyVal(a, b) | Pattern::PatDisj(a, b) => {
                a.collect_bound(out);
                b.collect_bound(out);
            }
            Pattern::PatTyped(pat, _) | Pattern::PatWhen(pat, _) => pat.collect_bound(out),
            Pattern::OtherPat(_, payload) => {
                for any in payload {
                    if let Any::P(pat) = any {
                        pat.collect_bound(out);
                    }
                }
            }
            Pattern::PatLiteral(_)
            | Pattern::PatUnderscore(_)
            | Pattern::PatType(_)
            | Pattern::PatVar(_, None)
            | Pattern::PatEllipsis(_) => {}
        }
    }
}
