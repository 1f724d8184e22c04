// Generic AST model and traversal tests on hand-built trees

use gast_core::ast::*;
use gast_core::fold::Fold;
use gast_core::utils::{abstract_position_info, all_tokens, extract_tokens, range_of_any};
use gast_core::visit::{walk_expr, Visitor};
use gast_core::{dump, Result};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn tok_at(text: &str, charpos: usize) -> Token {
    Token::Origin(Location {
        str: text.to_string(),
        charpos,
        line: 1,
        column: charpos,
        file: Arc::from("t.js"),
    })
}

fn ident_at(name: &str, charpos: usize) -> Ident {
    Wrap::new(name.to_string(), tok_at(name, charpos))
}

/// `x = a + 1;` with every token shifted by `offset`.
fn assignment(offset: usize) -> Stmt {
    let sum = Expr::op_call(
        Operator::Plus,
        tok_at("+", offset + 6),
        vec![
            Expr::id(ident_at("a", offset + 4)),
            Expr::int(Some(1), tok_at("1", offset + 8)),
        ],
    );
    Stmt::expr(
        Expr::assign(Expr::id(ident_at("x", offset)), tok_at("=", offset + 2), sum),
        tok_at(";", offset + 9),
    )
}

#[derive(Default)]
struct IdentCollector {
    names: Vec<String>,
}

impl Visitor for IdentCollector {
    fn visit_ident(&mut self, ident: &Ident) {
        self.names.push(ident.value.clone());
    }
}

#[test]
fn test_visitor_reaches_escape_hatch_payloads() {
    let hidden = Expr::todo(
        "weird_node",
        vec![
            Any::E(Expr::id(ident_at("a", 0))),
            Any::Anys(vec![Any::I(ident_at("b", 2)), Any::T(Type::TyVar(ident_at("T", 4)))]),
        ],
    );
    let stmt = Stmt::other(OtherStmtOp::Todo("wrapper".into()), vec![Any::E(hidden)]);

    let mut collector = IdentCollector::default();
    collector.visit_any(&Any::S(stmt));
    assert_eq!(collector.names, vec!["a", "b", "T"]);
}

#[test]
fn test_visitor_override_can_skip_children() {
    struct CallsOnly {
        calls: usize,
        idents: usize,
    }
    impl Visitor for CallsOnly {
        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Call(..) = expr {
                self.calls += 1;
                return;
            }
            walk_expr(self, expr)
        }
        fn visit_ident(&mut self, _ident: &Ident) {
            self.idents += 1;
        }
    }

    let mut v = CallsOnly { calls: 0, idents: 0 };
    v.visit_any(&Any::S(assignment(0)));
    assert_eq!(v.calls, 1);
    // only `x`: the operands sit under the skipped call
    assert_eq!(v.idents, 1);
}

#[test]
fn test_extract_tokens_is_in_source_order() {
    let any = Any::S(assignment(0));
    let texts: Vec<_> = extract_tokens(&any)
        .iter()
        .map(|t| t.str_of().to_string())
        .collect();
    assert_eq!(texts, vec!["x", "=", "a", "+", "1", ";"]);

    // the fake parentheses of the operator call are traversed but not extracted
    let fakes = all_tokens(&any).iter().filter(|t| t.is_fake()).count();
    assert_eq!(fakes, 2);

    let (first, last) = range_of_any(&any).unwrap();
    assert_eq!(first.charpos, 0);
    assert_eq!(last.charpos, 9);
}

#[test]
fn test_abstraction_equates_shifted_trees() {
    let a = Any::S(assignment(0));
    let b = Any::S(assignment(17));
    assert_ne!(a, b);

    let abs_a = abstract_position_info(a);
    let abs_b = abstract_position_info(b);
    assert_eq!(abs_a, abs_b);
    assert!(extract_tokens(&abs_a).is_empty());

    // idempotent
    assert_eq!(abstract_position_info(abs_a.clone()), abs_a);
}

#[test]
fn test_abstraction_keeps_fake_tokens() {
    let any = Any::E(Expr::special(SpecialKind::This, Token::fake("this")));
    let abs = abstract_position_info(any.clone());
    assert_eq!(abs, any);
}

#[test]
fn test_abstraction_preserves_cell_aliasing() {
    let cell = IdInfoCell::new();
    cell.set_resolved(ResolvedName {
        kind: ResolvedKind::Local,
        sid: SId::fresh(),
    });
    let def_site = Pattern::PatId(ident_at("v", 0), cell.clone());
    let use_site = Expr::N(Name::Id(ident_at("v", 5), cell.clone()));
    let other_use = Expr::id(ident_at("w", 9));

    let abs = abstract_position_info(Any::Anys(vec![
        Any::P(def_site),
        Any::E(use_site),
        Any::E(other_use),
    ]));
    let Any::Anys(items) = abs else {
        panic!("expected a list");
    };
    let (Any::P(Pattern::PatId(_, c1)), Any::E(Expr::N(Name::Id(_, c2))), Any::E(Expr::N(n3))) =
        (&items[0], &items[1], &items[2])
    else {
        panic!("unexpected shape: {items:?}");
    };
    assert!(c1.ptr_eq(c2));
    assert!(!c1.ptr_eq(&cell));
    assert!(!c1.ptr_eq(n3.id_info()));
    assert_eq!(c1.resolved(), cell.resolved());

    // the new cell is independent from the old one
    c1.set_constness(Constness::NotCst);
    assert_eq!(cell.read().constness, None);
}

#[test]
fn test_fold_override_rewrites_identifiers() {
    struct Upper;
    impl Fold for Upper {
        fn fold_ident(&mut self, ident: Ident) -> Ident {
            ident.map(|s| s.to_uppercase())
        }
    }

    let folded = Upper.fold_any(Any::S(assignment(0)));
    let mut collector = IdentCollector::default();
    collector.visit_any(&folded);
    assert_eq!(collector.names, vec!["X", "A"]);
}

#[test]
fn test_holds_stmt() {
    let s = assignment(0);
    assert!(Any::S(s.clone()).holds_stmt());
    assert!(Any::Anys(vec![Any::Tk(Token::Abstract), Any::Ss(vec![s])]).holds_stmt());
    assert!(!Any::E(Expr::id(ident_at("a", 0))).holds_stmt());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "OtherStmt payload")]
fn test_other_stmt_rejects_statements() {
    let _ = Stmt::other(OtherStmtOp::Todo("bad".into()), vec![Any::S(assignment(0))]);
}

#[test]
fn test_json_dump() -> Result<()> {
    let any = Any::S(assignment(0));
    let json = dump::to_json(&any)?;
    assert!(json.contains("\"ExprStmt\""));
    assert_eq!(dump::from_json(&json)?, any);
    Ok(())
}

#[test]
fn test_type_array_depth() {
    let int = Type::builtin("int", tok_at("int", 0));
    let ty = Type::array(
        tok_at("[", 3),
        None,
        tok_at("]", 4),
        Type::array(tok_at("[", 5), None, tok_at("]", 6), int),
    );
    assert_eq!(ty.array_depth(), 2);
}

#[test]
fn test_try_finally_is_visited_and_folded() {
    // try x = a + 1; finally y = a + 1;
    let finally = Finally {
        tok: tok_at("finally", 14),
        body: assignment(22),
    };
    let stmt = Stmt::Try(
        tok_at("try", 0),
        Box::new(assignment(4)),
        Vec::new(),
        Some(Box::new(finally)),
    );

    struct Rename;
    impl Fold for Rename {
        fn fold_ident(&mut self, ident: Ident) -> Ident {
            ident.map(|s| format!("{s}2"))
        }
    }
    let folded = Rename.fold_any(Any::S(stmt));
    let Any::S(Stmt::Try(_, _, _, Some(fin))) = &folded else {
        panic!("expected a try with a finally block, got {folded:?}");
    };
    assert_eq!(fin.tok.str_of(), "finally");

    let mut collector = IdentCollector::default();
    collector.visit_any(&folded);
    assert_eq!(collector.names, vec!["x2", "a2", "x2", "a2"]);
    assert_eq!(extract_tokens(&folded).len(), 14);
}
