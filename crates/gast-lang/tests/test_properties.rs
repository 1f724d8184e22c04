// Properties every normalizer upholds, checked through the dispatch facade.

use gast_core::ast::{
    Any, Expr, ForHeader, Ident, Literal, OtherStmtOp, Parameter, Program, SpecialKind, Stmt,
    Type,
};
use gast_core::utils::{abstract_position_info, all_tokens, extract_tokens};
use gast_core::visit::Visitor;
use gast_core::{Language, Result};
use gast_lang::{normalize_source, parse_fragment};
use pretty_assertions::assert_eq;

const JAVA: &[&str] = &[
    "class A { int f(int x) { return x * 2; } }",
    "interface I<T> extends J { default void g() {} }",
    "enum E { A(1), B(2) { void h() {} }; E(int v) {} }",
    "record R(int a, String b) {}",
    "@interface Ann { int value() default 0; }",
    "class B { void m() { do { i--; } while (i > 0); switch (k) { case 1: break; default: } } }",
    "class C { Object o = new Object() { public String toString() { return \"c\"; } }; }",
    "module m.core { requires java.base; exports m.api; }",
];

const JAVASCRIPT: &[&str] = &[
    "function f(a, ...rest) { return a + rest.length; }",
    "const { a, b: [c] } = obj; let x = a ?? c;",
    "class K extends Base { static #n = 1; get v() { return this.#n; } }",
    "for (const [k, v] of Object.entries(o)) { if (!v) continue; }",
    "async function* g() { yield await p; }",
    "export default (x) => x?.y ?? `t${x}`;",
    "label: while (true) { try { throw e; } catch { break label; } finally {} }",
    "import def, * as ns from './m.js'; new.target; delete o[k]; void 0; typeof x;",
];

const PYTHON: &[&str] = &[
    "def f(a, /, b=1, *, c, **kw):\n    return a @ b\n",
    "async def g():\n    async with a as b:\n        async for x in y:\n            await x\n",
    "class C(B, metaclass=M):\n    @property\n    def v(self): return self._v\n",
    "x = {k: v for k, v in items if v}\ny = {*a, *b}\nz = (i for i in r)\n",
    "try:\n    pass\nexcept* ValueError as eg:\n    raise\n",
    "match p:\n    case {'k': v, **rest} if v:\n        pass\n    case Point(x, y=0) as q:\n        pass\n",
    "type Vec[T] = list[T]\nlambda *a, **k: (a, k)\n",
    "print(f\"{x!r:>{width}}\", sep='')\nassert x, 'msg'\nexec code\n",
];

fn all_samples() -> impl Iterator<Item = (Language, &'static str)> {
    let java = JAVA.iter().map(|src| (Language::Java, *src));
    let js = JAVASCRIPT.iter().map(|src| (Language::JavaScript, *src));
    let py = PYTHON.iter().map(|src| (Language::Python, *src));
    java.chain(js).chain(py)
}

#[derive(Default)]
struct Idents(Vec<String>);

impl Visitor for Idents {
    fn visit_ident(&mut self, ident: &Ident) {
        self.0.push(ident.value.clone());
    }
}

fn idents(program: Program) -> Vec<String> {
    let mut v = Idents::default();
    v.visit_any(&Any::Ss(program));
    v.0
}

#[test]
fn test_valid_input_always_normalizes() {
    for (lang, source) in all_samples() {
        if let Err(err) = normalize_source(lang, source, None) {
            panic!("{lang} sample failed: {err}\n{source}");
        }
    }
}

#[test]
fn test_tokens_point_back_into_the_source() -> Result<()> {
    for (lang, source) in all_samples() {
        let any = Any::Ss(normalize_source(lang, source, None)?);
        let tokens = extract_tokens(&any);
        assert!(!tokens.is_empty(), "{lang} sample has no tokens: {source}");
        let mut last = 0;
        for tok in &tokens {
            let loc = tok.location().expect("extracted tokens are origin tokens");
            assert!(loc.charpos >= last, "{lang} tokens out of order: {source}");
            assert_eq!(&source[loc.charpos..loc.end_charpos()], loc.str);
            last = loc.charpos;
        }
    }
    Ok(())
}

#[test]
fn test_abstraction_is_idempotent() -> Result<()> {
    for (lang, source) in all_samples() {
        let once = abstract_position_info(Any::Ss(normalize_source(lang, source, None)?));
        assert!(all_tokens(&once).iter().all(|tok| !tok.is_origin()));
        let twice = abstract_position_info(once.clone());
        assert_eq!(once, twice);
    }
    Ok(())
}

#[test]
fn test_abstraction_ignores_layout() -> Result<()> {
    let pairs = [
        (Language::Java, "class A{int f(){return 1+2;}}", "class A {\n  int f() {\n    return 1 + 2;\n  }\n}"),
        (Language::JavaScript, "f(a,b);", "f( a ,\n   b );"),
        (Language::Python, "x=[1,2]\n", "x = [ 1,\n      2 ]\n"),
    ];
    for (lang, a, b) in pairs {
        let a = Any::Ss(normalize_source(lang, a, None)?);
        let b = Any::Ss(normalize_source(lang, b, None)?);
        assert_ne!(a, b);
        assert_eq!(abstract_position_info(a), abstract_position_info(b));
    }
    Ok(())
}

#[test]
fn test_visitor_enters_escape_hatch_payloads() -> Result<()> {
    let program = normalize_source(Language::Python, "del alpha\n", None)?;
    assert!(matches!(&program[0], Stmt::OtherStmt(OtherStmtOp::Delete, _)));
    assert_eq!(idents(program), vec!["alpha"]);

    let program = normalize_source(Language::Java, "class A { Class<?> c = Beta.class; }", None)?;
    assert!(idents(program).iter().any(|id| id == "Beta"));
    Ok(())
}

#[test]
fn test_qualified_name_splits_at_last_dot() -> Result<()> {
    let program = normalize_source(Language::Java, "class A extends pkg.Sub.Cls {}", None)?;
    let class = program[0]
        .as_definition()
        .and_then(|def| def.as_class())
        .expect("class definition");
    let Type::TyN(name) = &class.extends[0] else {
        panic!("expected a named type, got {:?}", class.extends[0]);
    };
    assert_eq!(name.ident().value, "Cls");
    assert_eq!(name.segments(), vec!["pkg", "Sub", "Cls"]);
    Ok(())
}

#[test]
fn test_array_type_nests_per_dimension() -> Result<()> {
    let program = normalize_source(Language::Java, "int[][] x;", None)?;
    let var = program[0]
        .as_definition()
        .and_then(|def| def.as_variable())
        .expect("variable");
    let ty = var.ty.as_ref().expect("declared type");
    assert_eq!(ty.array_depth(), 2);
    let Type::TyArray(_, inner) = ty else {
        panic!("expected an array type, got {ty:?}");
    };
    let Type::TyArray(_, elem) = inner.as_ref() else {
        panic!("expected a nested array type, got {inner:?}");
    };
    assert!(matches!(elem.as_ref(), Type::TyBuiltin(b) if b.value == "int"));
    Ok(())
}

#[test]
fn test_javascript_for_in_is_for_each() -> Result<()> {
    let Any::S(Stmt::For(_, header, _)) = parse_fragment(Language::JavaScript, "for (x in xs) {}")? else {
        panic!("expected a for statement");
    };
    let ForHeader::Each(_, tok, Expr::N(coll)) = header else {
        panic!("expected a for-each header, got {header:?}");
    };
    assert_eq!(tok.str_of(), "in");
    assert_eq!(coll.ident().value, "xs");
    Ok(())
}

#[test]
fn test_javascript_function_end_to_end() -> Result<()> {
    let program = normalize_source(Language::JavaScript, "function f(a) { return a + 1; }", None)?;
    assert_eq!(program.len(), 1);
    let def = program[0].as_definition().expect("definition");
    assert_eq!(def.name(), "f");
    let func = def.as_function().expect("function");
    assert!(matches!(
        func.params.value.as_slice(),
        [Parameter::Classic(p)] if p.name.as_ref().is_some_and(|id| id.value == "a")
    ));

    let Stmt::Block(body) = func.body.as_ref() else {
        panic!("expected a block body");
    };
    let [Stmt::Return(_, Some(Expr::Call(callee, args)), _)] = body.value.as_slice() else {
        panic!("expected a single return, got {:?}", body.value);
    };
    assert!(matches!(
        callee.as_ref(),
        Expr::IdSpecial(w) if matches!(w.value, SpecialKind::Op(_))
    ));
    let [first, second] = args.value.as_slice() else {
        panic!("expected two operands");
    };
    assert!(matches!(first, gast_core::ast::Argument::Arg(Expr::N(n)) if n.ident().value == "a"));
    assert!(matches!(
        second,
        gast_core::ast::Argument::Arg(Expr::L(Literal::Int(w))) if w.value == Some(1)
    ));
    Ok(())
}
