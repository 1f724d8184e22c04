use gast_core::ast::{
    Any, Argument, ConcatKind, ContainerOperator, DefinitionKind, Directive, Expr, FieldName,
    ForHeader, IncrDecr, Keyword, Literal, ModuleName, Name, Operator, OtherDirectiveOp,
    Parameter, Pattern, PrefixPostfix, Program, SpecialKind, Stmt, Type,
};
use gast_core::config::NormalizeConfig;
use gast_core::error::Error;
use gast_core::utils::{abstract_position_info, token_strings};
use gast_core::LanguageFrontend;
use pretty_assertions::assert_eq;

use crate::{normalize_fragment, normalize_with, JsFrontend, JsParser};

fn lower(source: &str) -> Program {
    let mut parser = JsParser::new().expect("grammar should load");
    let tree = parser.parse_str(source).expect("parse should succeed");
    normalize_with(&tree, source, None, NormalizeConfig::strict()).expect("normalize should succeed")
}

fn lower_expr(source: &str) -> Expr {
    let mut parser = JsParser::new().expect("grammar should load");
    let tree = parser.parse_str(source).expect("parse should succeed");
    match normalize_fragment(&tree, source).expect("normalize should succeed") {
        Any::E(e) => e,
        other => panic!("expected an expression, got {other:?}"),
    }
}

fn op_of(e: &Expr) -> Option<Operator> {
    match e {
        Expr::Call(callee, _) => match callee.as_ref() {
            Expr::IdSpecial(w) => match &w.value {
                SpecialKind::Op(op) => Some(op.clone()),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}

#[test]
fn function_declaration_end_to_end() {
    let source = "function f(a) { return a + 1; }";
    let program = lower(source);
    assert_eq!(program.len(), 1);

    let def = program[0].as_definition().expect("function definition");
    assert_eq!(def.name(), "f");
    let func = def.as_function().expect("function kind");
    assert_eq!(func.params.value.len(), 1);
    let Parameter::Classic(param) = &func.params.value[0] else {
        panic!("expected a classic parameter");
    };
    assert_eq!(param.name.as_ref().map(|id| id.value.as_str()), Some("a"));

    let Stmt::Block(body) = func.body.as_ref() else {
        panic!("expected a block body");
    };
    let Stmt::Return(_, Some(value), _) = &body.value[0] else {
        panic!("expected return with a value");
    };
    assert_eq!(op_of(value), Some(Operator::Plus));

    assert_eq!(
        token_strings(&Any::Ss(program)),
        vec!["function", "f", "(", "a", ")", "{", "return", "a", "+", "1", ";", "}"]
    );
}

#[test]
fn for_in_is_a_for_each() {
    let program = lower("for (x in xs) {}");
    let Stmt::For(_, ForHeader::Each(pat, tok, coll), _) = &program[0] else {
        panic!("expected a for-each header, got {:?}", program[0]);
    };
    assert!(matches!(pat, Pattern::PatId(id, _) if id.value == "x"));
    assert_eq!(tok.str_of(), "in");
    assert!(matches!(coll, Expr::N(name) if name.ident().value == "xs"));
}

#[test]
fn classic_for_keeps_absent_clauses_empty() {
    let program = lower("for (;;) {}");
    let Stmt::For(_, ForHeader::Classic(inits, cond, next), _) = &program[0] else {
        panic!("expected a classic for header");
    };
    assert!(inits.is_empty());
    assert!(cond.is_none());
    assert!(next.is_none());

    let program = lower("for (let i = 0; i < n; i++) {}");
    let Stmt::For(_, ForHeader::Classic(inits, cond, next), _) = &program[0] else {
        panic!("expected a classic for header");
    };
    assert_eq!(inits.len(), 1);
    assert_eq!(cond.as_ref().and_then(op_of), Some(Operator::Lt));
    assert!(next.is_some());
}

#[test]
fn declarations_split_per_variable() {
    let program = lower("let a = 1, b;");
    assert_eq!(program.len(), 2);
    let names: Vec<_> = program
        .iter()
        .filter_map(Stmt::as_definition)
        .map(|def| def.name().to_string())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    for stmt in &program {
        let def = stmt.as_definition().expect("variable definition");
        assert!(def.entity.has_keyword(Keyword::Let));
    }
    let second = program[1].as_definition().and_then(|d| d.as_variable());
    assert!(second.is_some_and(|var| var.init.is_none()));
}

#[test]
fn destructuring_becomes_let_pattern() {
    let program = lower("const { x, y: z } = obj;");
    let Stmt::ExprStmt(Expr::LetPattern(pat, init), _) = &program[0] else {
        panic!("expected a destructuring binding");
    };
    let bound: Vec<_> = pat.bound_idents().iter().map(|id| id.value.clone()).collect();
    assert_eq!(bound, vec!["x", "z"]);
    assert!(matches!(init.as_ref(), Expr::N(_)));
}

#[test]
fn imports_become_directives() {
    let program = lower(r#"import React, { useState as s } from "react";"#);
    assert_eq!(program.len(), 2);
    let Stmt::DirectiveStmt(first) = &program[0] else {
        panic!("expected a directive");
    };
    let Directive::ImportFrom(_, ModuleName::FileName(module), name, Some(alias)) = first.as_ref()
    else {
        panic!("expected a default import");
    };
    assert_eq!(module.value, "react");
    assert_eq!(name.value, "default");
    assert!(name.tok.is_fake());
    assert_eq!(alias.ident.value, "React");

    let Stmt::DirectiveStmt(second) = &program[1] else {
        panic!("expected a directive");
    };
    let Directive::ImportFrom(_, _, name, Some(alias)) = second.as_ref() else {
        panic!("expected a named import");
    };
    assert_eq!(name.value, "useState");
    assert_eq!(alias.ident.value, "s");
}

#[test]
fn exported_declaration_keeps_definition_and_marker() {
    let program = lower("export const k = 1;");
    assert_eq!(program.len(), 2);
    assert_eq!(program[0].as_definition().map(|d| d.name()), Some("k"));
    let Stmt::DirectiveStmt(dir) = &program[1] else {
        panic!("expected an export marker");
    };
    let Directive::OtherDirective(OtherDirectiveOp::Export, payload) = dir.as_ref() else {
        panic!("expected an export directive");
    };
    assert!(matches!(&payload[1], Any::I(id) if id.value == "k"));
}

#[test]
fn template_string_is_interpolation_call() {
    let e = lower_expr("`a${b}c`");
    let Expr::Call(callee, args) = &e else {
        panic!("expected a call");
    };
    assert!(matches!(
        callee.as_ref(),
        Expr::IdSpecial(w) if w.value == SpecialKind::ConcatString(ConcatKind::Interpolated)
    ));
    assert_eq!(args.value.len(), 3);

    let plain = lower_expr("`plain`");
    assert!(matches!(plain, Expr::L(Literal::String(s)) if s.value == "plain"));
}

#[test]
fn member_chain_nests_dot_access() {
    let e = lower_expr("a.b.c");
    let Expr::DotAccess(inner, _, FieldName::EN(last)) = &e else {
        panic!("expected a member access");
    };
    assert_eq!(last.ident().value, "c");
    assert!(matches!(inner.as_ref(), Expr::DotAccess(..)));
}

#[test]
fn new_passes_constructor_first() {
    let e = lower_expr("new Foo(1)");
    let Expr::Call(callee, args) = &e else {
        panic!("expected a call");
    };
    assert!(matches!(callee.as_ref(), Expr::IdSpecial(w) if w.value == SpecialKind::New));
    assert_eq!(args.value.len(), 2);
    assert!(matches!(&args.value[0], Argument::Arg(Expr::N(Name::Id(id, _))) if id.value == "Foo"));
    assert!(args.open.is_origin());
}

#[test]
fn update_expressions_record_fixity() {
    let prefix = lower_expr("++i");
    let postfix = lower_expr("i--");
    let kind = |e: &Expr| match e {
        Expr::Call(callee, _) => match callee.as_ref() {
            Expr::IdSpecial(w) => Some(w.value.clone()),
            _ => None,
        },
        _ => None,
    };
    assert_eq!(
        kind(&prefix),
        Some(SpecialKind::IncrDecr(IncrDecr::Incr, PrefixPostfix::Prefix))
    );
    assert_eq!(
        kind(&postfix),
        Some(SpecialKind::IncrDecr(IncrDecr::Decr, PrefixPostfix::Postfix))
    );
}

#[test]
fn object_literal_is_record() {
    let e = lower_expr("({ a: 1, b, ...rest, m() {} })");
    let Expr::Record(fields) = &e else {
        panic!("expected a record, got {e:?}");
    };
    assert_eq!(fields.value.len(), 4);

    let array = lower_expr("[1, 2]");
    assert!(matches!(array, Expr::Container(ContainerOperator::Array, ref items) if items.value.len() == 2));
}

#[test]
fn class_with_extends_and_constructor() {
    let program = lower("class A extends B { constructor() { super(); } static m() {} }");
    let def = program[0].as_definition().expect("class definition");
    let class = def.as_class().expect("class kind");
    assert_eq!(class.extends.len(), 1);
    assert!(matches!(&class.extends[0], Type::TyN(name) if name.ident().value == "B"));
    assert_eq!(class.body.value.len(), 2);

    let methods: Vec<_> = class
        .body
        .value
        .iter()
        .filter_map(|field| match field {
            gast_core::ast::Field::FieldStmt(stmt) => stmt.as_definition(),
            _ => None,
        })
        .collect();
    assert!(methods[0].entity.has_keyword(Keyword::Ctor));
    assert!(methods[1].entity.has_keyword(Keyword::Static));
    assert!(matches!(methods[1].kind, DefinitionKind::FuncDef(_)));
}

#[test]
fn whitespace_does_not_change_abstracted_tree() {
    let a = lower("f(a,b);");
    let b = lower("f( a ,\n   b );");
    assert_ne!(Any::Ss(a.clone()), Any::Ss(b.clone()));
    assert_eq!(
        abstract_position_info(Any::Ss(a)),
        abstract_position_info(Any::Ss(b))
    );
}

#[test]
fn syntax_errors_fail_unless_lossy() {
    let source = "let = ;";
    let mut parser = JsParser::new().expect("grammar should load");
    let tree = parser.parse_str(source).expect("parse should succeed");

    let err = normalize_with(&tree, source, None, NormalizeConfig::strict()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));

    let lossy = NormalizeConfig::strict().with_lossy(true);
    assert!(normalize_with(&tree, source, None, lossy).is_ok());
}

#[test]
fn frontend_attaches_snapshot_on_request() {
    let config = NormalizeConfig::strict().with_snapshot(true);
    let result = JsFrontend::with_config(config)
        .parse("x = 1;", None)
        .expect("frontend should succeed");
    assert_eq!(result.ast.len(), 1);
    let snapshot = result.snapshot.expect("snapshot");
    assert_eq!(snapshot.description, "javascript source <stdin>");
    assert!(snapshot
        .serialized
        .is_some_and(|sexp| sexp.starts_with("(program")));
}

fn left_spine_len(mut e: &Expr) -> usize {
    let mut len = 0;
    while let Expr::Call(_, args) = e {
        match args.value.first() {
            Some(Argument::Arg(left)) => {
                e = left;
                len += 1;
            }
            _ => break,
        }
    }
    len
}

#[test]
fn long_operator_chain_lowers_on_the_default_stack() {
    let terms: Vec<String> = (0..1000).map(|i| format!("a{i}")).collect();
    let chain = terms.join(" + ");

    let program = lower(&format!("x = {chain};"));
    assert_eq!(program.len(), 1);

    let e = lower_expr(&format!("{chain};"));
    assert_eq!(left_spine_len(&e), 999);
}

#[test]
fn static_block_keeps_its_braces() {
    let program = lower("class K { static { init(); } }");
    let def = program[0].as_definition().expect("class definition");
    let class = def.as_class().expect("class kind");
    let [gast_core::ast::Field::FieldStmt(init)] = class.body.value.as_slice() else {
        panic!("expected one static block, got {:?}", class.body.value);
    };
    let Stmt::OtherStmtWithStmt(gast_core::ast::OtherStmtWithStmtOp::StaticInit, None, body) = init
    else {
        panic!("expected a static initializer, got {init:?}");
    };
    let Stmt::Block(block) = body.as_ref() else {
        panic!("expected a block, got {body:?}");
    };
    assert!(!block.open.is_fake());
    assert!(!block.close.is_fake());
    assert_eq!(block.open.str_of(), "{");
    assert_eq!(block.value.len(), 1);
}
