use crate::ast::{Any, DottedIdent, Ident, IdInfoCell, ModuleName, Token};

common_struct! {
    /// `as name` of an import; newvar.
    pub struct Alias {
        pub ident: Ident,
        pub info: IdInfoCell,
    }
}

impl Alias {
    pub fn new(ident: Ident) -> Self {
        Self {
            ident,
            info: IdInfoCell::new(),
        }
    }
}

common_enum! {
    pub enum OtherDirectiveOp {
        /// `export ...`
        Export,
        /// `export default ...`
        ExportDefault,
        /// `from __future__ import ...`
        Future,
        Todo(String),
    }
}

common_enum! {
    pub enum Directive {
        /// `from m import x as y`, `import { x as y } from "m"`
        ImportFrom(Token, ModuleName, Ident, Option<Alias>),
        /// `import m as y`, `import y from "m"`
        ImportAs(Token, ModuleName, Option<Alias>),
        /// `from m import *`, `import a.b.*`
        ImportAll(Token, ModuleName, Token),
        Package(Token, DottedIdent),
        PackageEnd(Token),
        /// `"use strict"` and other in-source compiler switches.
        Pragma(Ident, Vec<Any>),
        OtherDirective(OtherDirectiveOp, Vec<Any>),
    }
}

impl Directive {
    pub fn todo(kind: &str, payload: Vec<Any>) -> Directive {
        Directive::OtherDirective(OtherDirectiveOp::Todo(kind.to_string()), payload)
    }

    pub fn module(&self) -> Option<&ModuleName> {
        match self {
            Directive::ImportFrom(_, m, _, _)
            | Directive::ImportAs(_, m, _)
            | Directive::ImportAll(_, m, _) => Some(m),
            _ => None,
        }
    }
}
