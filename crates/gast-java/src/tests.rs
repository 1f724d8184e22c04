use gast_core::ast::{
    Any, Argument, Attribute, ClassKind, Definition, DefinitionKind, Directive, Expr, Field,
    FieldName, ForHeader, FunctionKind, Keyword, ModuleName, OtherArgOp, OtherExprOp,
    OtherStmtWithStmtOp, Pattern, Program, SpecialKind, Stmt, Type,
};
use gast_core::config::NormalizeConfig;
use gast_core::error::Error;
use gast_core::LanguageFrontend;
use pretty_assertions::assert_eq;

use crate::{normalize_fragment, normalize_with, JavaFrontend, JavaParser};

fn lower(source: &str) -> Program {
    let mut parser = JavaParser::new().expect("grammar should load");
    let tree = parser.parse_str(source).expect("parse should succeed");
    normalize_with(&tree, source, None, NormalizeConfig::strict()).expect("normalize should succeed")
}

fn lower_expr(source: &str) -> Expr {
    let mut parser = JavaParser::new().expect("grammar should load");
    let tree = parser.parse_str(source).expect("parse should succeed");
    match normalize_fragment(&tree, source).expect("normalize should succeed") {
        Any::E(e) => e,
        other => panic!("expected an expression, got {other:?}"),
    }
}

fn members(def: &Definition) -> Vec<&Definition> {
    def.as_class()
        .expect("class kind")
        .body
        .value
        .iter()
        .filter_map(|field| match field {
            Field::FieldStmt(stmt) => stmt.as_definition(),
            _ => None,
        })
        .collect()
}

fn segments(e: &Expr) -> Vec<&str> {
    match e {
        Expr::N(name) => name.segments(),
        other => panic!("expected a name, got {other:?}"),
    }
}

#[test]
fn qualified_superclass_splits_qualifier() {
    let program = lower("class A extends pkg.Sub.Cls {}");
    let class = program[0]
        .as_definition()
        .and_then(Definition::as_class)
        .expect("class definition");
    let Type::TyN(name) = &class.extends[0] else {
        panic!("expected a named type, got {:?}", class.extends[0]);
    };
    assert_eq!(name.ident().value, "Cls");
    let qualifier: Vec<_> = name
        .qualifier()
        .expect("qualifier")
        .iter()
        .map(|id| id.value.as_str())
        .collect();
    assert_eq!(qualifier, vec!["pkg", "Sub"]);
}

#[test]
fn array_dimensions_nest() {
    let program = lower("int[][] x; int y[] = new int[3][];");
    assert_eq!(program.len(), 2);

    let x = program[0].as_definition().expect("x");
    let x = x.as_variable().expect("variable");
    assert_eq!(x.ty.as_ref().map(Type::array_depth), Some(2));

    let y = program[1].as_definition().expect("y");
    let y = y.as_variable().expect("variable");
    assert_eq!(y.ty.as_ref().map(Type::array_depth), Some(1));

    let Some(Expr::Call(callee, args)) = &y.init else {
        panic!("expected an allocation, got {:?}", y.init);
    };
    assert!(matches!(callee.as_ref(), Expr::IdSpecial(w) if w.value == SpecialKind::New));
    let Argument::ArgType(ty @ Type::TyArray(dim, _)) = &args.value[0] else {
        panic!("expected the allocated type first, got {:?}", args.value[0]);
    };
    assert_eq!(ty.array_depth(), 2);
    assert!(dim.value.is_some());
}

#[test]
fn package_and_imports_are_directives() {
    let program = lower(
        "package a.b;\nimport java.util.List;\nimport java.io.*;\nimport static java.lang.Math.max;",
    );
    let dirs: Vec<&Directive> = program
        .iter()
        .map(|stmt| match stmt {
            Stmt::DirectiveStmt(dir) => dir.as_ref(),
            other => panic!("expected a directive, got {other:?}"),
        })
        .collect();

    let Directive::Package(_, pkg) = dirs[0] else {
        panic!("expected a package, got {:?}", dirs[0]);
    };
    assert_eq!(pkg.iter().map(|id| id.value.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);

    let Directive::ImportFrom(_, ModuleName::DottedName(module), name, None) = dirs[1] else {
        panic!("expected a single import, got {:?}", dirs[1]);
    };
    assert_eq!(module.len(), 2);
    assert_eq!(name.value, "List");

    let Directive::ImportAll(_, ModuleName::DottedName(module), star) = dirs[2] else {
        panic!("expected a wildcard import, got {:?}", dirs[2]);
    };
    assert_eq!(module.last().map(|id| id.value.as_str()), Some("io"));
    assert_eq!(star.str_of(), "*");

    assert!(matches!(dirs[3], Directive::ImportFrom(_, _, name, _) if name.value == "max"));
}

#[test]
fn enum_constants_become_entries() {
    let program = lower("enum Color { RED, GREEN(1); Color() {} Color(int v) {} }");
    let def = program[0].as_definition().expect("enum definition");
    let class = def.as_class().expect("class kind");
    assert_eq!(class.kind.value, ClassKind::EnumClass);

    let members = members(def);
    assert_eq!(members.len(), 4);
    assert!(matches!(
        &members[0].kind,
        DefinitionKind::EnumEntryDef(entry) if entry.args.is_none()
    ));
    assert!(matches!(
        &members[1].kind,
        DefinitionKind::EnumEntryDef(entry) if entry.args.as_ref().is_some_and(|a| a.value.len() == 1)
    ));
    assert!(members[2].entity.has_keyword(Keyword::Ctor));
}

#[test]
fn record_components_are_class_parameters() {
    let program = lower("record Point(int x, int y) {}");
    let class = program[0]
        .as_definition()
        .and_then(Definition::as_class)
        .expect("record definition");
    assert_eq!(class.kind.value, ClassKind::RecordClass);
    assert_eq!(class.params.len(), 2);
}

#[test]
fn annotations_and_modifiers_are_attributes() {
    let program = lower(
        "class A { @Deprecated @SuppressWarnings(value = \"x\") public static final int X = 1; }",
    );
    let def = program[0].as_definition().expect("class definition");
    let members = members(def);
    let attrs = &members[0].entity.attrs;
    assert_eq!(attrs.len(), 5);

    let Attribute::NamedAttr(_, name, args) = &attrs[0] else {
        panic!("expected an annotation, got {:?}", attrs[0]);
    };
    assert_eq!(name.ident().value, "Deprecated");
    assert!(args.value.is_empty());

    let Attribute::NamedAttr(_, _, args) = &attrs[1] else {
        panic!("expected an annotation, got {:?}", attrs[1]);
    };
    assert!(matches!(&args.value[0], Argument::ArgKwd(key, _) if key.value == "value"));

    assert!(members[0].entity.has_keyword(Keyword::Public));
    assert!(members[0].entity.has_keyword(Keyword::Static));
    assert!(members[0].entity.has_keyword(Keyword::Final));
}

#[test]
fn interface_methods_without_body_are_signatures() {
    let program = lower("interface Sized { int size(); default boolean empty() { return size() == 0; } }");
    let def = program[0].as_definition().expect("interface definition");
    assert_eq!(def.as_class().map(|c| c.kind.value.clone()), Some(ClassKind::Interface));

    let members = members(def);
    assert!(matches!(
        &members[0].kind,
        DefinitionKind::Signature(Type::TyFun(params, ret))
            if params.is_empty() && matches!(ret.as_ref(), Type::TyBuiltin(w) if w.value == "int")
    ));
    let func = members[1].as_function().expect("default method");
    assert_eq!(func.kind.value, FunctionKind::Method);
    assert!(members[1].entity.has_keyword(Keyword::Default));
}

#[test]
fn synchronized_wraps_its_body() {
    let program = lower("synchronized (lock) { work(); }");
    let Stmt::OtherStmtWithStmt(OtherStmtWithStmtOp::Synchronized, Some(lock), body) = &program[0]
    else {
        panic!("expected a synchronized block, got {:?}", program[0]);
    };
    assert_eq!(segments(lock), vec!["lock"]);
    assert!(matches!(body.as_ref(), Stmt::Block(b) if b.value.len() == 1));
}

#[test]
fn try_with_resources_wraps_the_try() {
    let program = lower(
        "try (InputStream in = open()) { read(in); } catch (IOException | RuntimeException e) {}",
    );
    let Stmt::OtherStmtWithStmt(OtherStmtWithStmtOp::With, Some(resource), inner) = &program[0]
    else {
        panic!("expected a resource wrapper, got {:?}", program[0]);
    };
    let Expr::LetPattern(pat, _) = resource else {
        panic!("expected a binding resource, got {resource:?}");
    };
    assert_eq!(
        pat.bound_idents().iter().map(|id| id.value.as_str()).collect::<Vec<_>>(),
        vec!["in"]
    );

    let Stmt::Try(_, _, catches, None) = inner.as_ref() else {
        panic!("expected a try, got {inner:?}");
    };
    assert_eq!(catches.len(), 1);
    assert!(matches!(&catches[0].pat, Pattern::PatVar(Type::TyOr(..), Some(_))));
}

#[test]
fn explicit_constructor_call_targets_super() {
    let program = lower("class B extends A { B() { super(1); } }");
    let def = program[0].as_definition().expect("class definition");
    let ctor = members(def)[0].as_function().expect("constructor");
    let Stmt::Block(body) = ctor.body.as_ref() else {
        panic!("expected a block body");
    };
    let Stmt::ExprStmt(Expr::Call(callee, args), _) = &body.value[0] else {
        panic!("expected a call, got {:?}", body.value[0]);
    };
    assert!(matches!(callee.as_ref(), Expr::IdSpecial(w) if w.value == SpecialKind::Super));
    assert_eq!(args.value.len(), 1);
}

#[test]
fn instanceof_with_binding_carries_a_pattern() {
    let e = lower_expr("o instanceof String s;");
    let Expr::Call(callee, args) = &e else {
        panic!("expected a call, got {e:?}");
    };
    assert!(matches!(callee.as_ref(), Expr::IdSpecial(w) if w.value == SpecialKind::Instanceof));
    let Argument::ArgOther(OtherArgOp::Pattern, payload) = &args.value[1] else {
        panic!("expected a pattern argument, got {:?}", args.value[1]);
    };
    assert!(matches!(
        &payload[0],
        Any::P(Pattern::PatVar(Type::TyN(ty), Some((id, _)))) if ty.ident().value == "String" && id.value == "s"
    ));

    let plain = lower_expr("o instanceof String;");
    let Expr::Call(_, args) = &plain else {
        panic!("expected a call, got {plain:?}");
    };
    assert!(matches!(&args.value[1], Argument::ArgType(_)));
}

#[test]
fn method_references_and_class_literals() {
    let e = lower_expr("String::valueOf;");
    let Expr::OtherExpr(OtherExprOp::MethodRef, payload) = &e else {
        panic!("expected a method reference, got {e:?}");
    };
    assert!(matches!(payload.last(), Some(Any::I(id)) if id.value == "valueOf"));

    let e = lower_expr("Foo.class;");
    assert!(matches!(e, Expr::OtherExpr(OtherExprOp::ClassLiteral, _)));
}

#[test]
fn enhanced_for_binds_a_typed_variable() {
    let program = lower("for (String s : names) { use(s); }");
    let Stmt::For(_, ForHeader::Each(pat, tok, coll), _) = &program[0] else {
        panic!("expected a for-each, got {:?}", program[0]);
    };
    assert!(matches!(pat, Pattern::PatVar(_, Some((id, _))) if id.value == "s"));
    assert_eq!(tok.str_of(), ":");
    assert_eq!(segments(coll), vec!["names"]);
}

#[test]
fn identifier_chains_keep_a_dotted_receiver() {
    let e = lower_expr("a.b.c;");
    let Expr::DotAccess(obj, dot, FieldName::EN(field)) = &e else {
        panic!("expected a field access, got {e:?}");
    };
    assert_eq!(segments(obj), vec!["a", "b"]);
    assert_eq!(dot.str_of(), ".");
    assert_eq!(field.ident().value, "c");

    let call = lower_expr("a.b.run(1);");
    let Expr::Call(callee, _) = &call else {
        panic!("expected a call, got {call:?}");
    };
    let Expr::DotAccess(obj, _, FieldName::EN(method)) = callee.as_ref() else {
        panic!("expected a method access, got {callee:?}");
    };
    assert_eq!(segments(obj), vec!["a", "b"]);
    assert_eq!(method.ident().value, "run");

    let nested = lower_expr("f().x;");
    let Expr::DotAccess(obj, _, _) = &nested else {
        panic!("expected a field access, got {nested:?}");
    };
    assert!(matches!(obj.as_ref(), Expr::Call(..)));
}

#[test]
fn lambda_with_expression_body_returns_it() {
    let e = lower_expr("x -> x + 1;");
    let Expr::Lambda(func) = &e else {
        panic!("expected a lambda, got {e:?}");
    };
    assert_eq!(func.kind.value, FunctionKind::LambdaKind);
    assert_eq!(func.params.value.len(), 1);
    assert!(matches!(func.body.as_ref(), Stmt::Return(tok, Some(_), _) if tok.is_fake()));
}

#[test]
fn syntax_errors_fail_unless_lossy() {
    let source = "int x = ;";
    let mut parser = JavaParser::new().expect("grammar should load");
    let tree = parser.parse_str(source).expect("parse should succeed");

    let err = normalize_with(&tree, source, None, NormalizeConfig::strict()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));

    let lossy = NormalizeConfig::strict().with_lossy(true);
    assert!(normalize_with(&tree, source, None, lossy).is_ok());
}

#[test]
fn frontend_attaches_snapshot_on_request() {
    let config = NormalizeConfig::strict().with_snapshot(true);
    let result = JavaFrontend::with_config(config)
        .parse("x = 1;", None)
        .expect("frontend should succeed");
    assert_eq!(result.ast.len(), 1);
    let snapshot = result.snapshot.expect("snapshot");
    assert_eq!(snapshot.description, "java source <stdin>");
    assert!(snapshot
        .serialized
        .is_some_and(|sexp| sexp.starts_with("(program")));
}

#[test]
fn label_may_mark_an_empty_statement() {
    let program = lower("class A { void m() { label: ; } }");
    let class = program[0].as_definition().expect("class definition");
    let method = members(class)[0].as_function().expect("method");
    let Stmt::Block(body) = method.body.as_ref() else {
        panic!("expected a block body");
    };
    let Stmt::Label(label, inner) = &body.value[0] else {
        panic!("expected a labeled statement, got {:?}", body.value[0]);
    };
    assert_eq!(label.value, "label");
    assert!(matches!(
        inner.as_ref(),
        Stmt::OtherStmt(gast_core::ast::OtherStmtOp::Empty, payload) if payload.len() == 1
    ));
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

    let program = lower(&format!("class A {{ int x = {chain}; }}"));
    assert_eq!(program.len(), 1);

    let e = lower_expr(&format!("{chain};"));
    assert_eq!(left_spine_len(&e), 999);
}
