// Whole-file lowering of Java sources through the public API.

use gast_core::ast::{Any, Ident, Program, Stmt};
use gast_core::config::NormalizeConfig;
use gast_core::utils::{extract_tokens, range_of_any};
use gast_core::visit::{walk_stmt, Visitor};
use gast_core::Result;
use gast_java::{normalize_with, JavaParser};
use pretty_assertions::assert_eq;

const SAMPLE: &str = r#"
package com.example.cache;

import java.util.List;
import java.util.function.*;

public final class Store<K extends Comparable<K>, V> extends Base implements AutoCloseable {
    private static final int LIMIT = 16;
    private final List<V>[] buckets = new List[LIMIT];

    public Store(int size) {
        super(size);
    }

    @Override
    public synchronized V get(K key) throws Exception {
        outer:
        for (List<V> bucket : buckets) {
            for (int i = 0, j = bucket.size(); i < j; i++) {
                if (bucket.get(i) instanceof Named n && n.name().equals(key.toString())) {
                    break outer;
                }
            }
        }
        int slot = switch (key.hashCode() % 3) {
            case 0 -> 1;
            default -> {
                yield 2;
            }
        };
        try (var reader = open(slot)) {
            return reader.read();
        } catch (IllegalStateException e) {
            throw new RuntimeException("bad slot " + slot, e);
        } finally {
            Runnable r = () -> System.out.println(LIMIT);
            r.run();
        }
    }

    static {
        assert LIMIT > 0 : "limit";
    }
}

interface Named {
    String name();
}
"#;

fn lower(source: &str) -> Result<Program> {
    let mut parser = JavaParser::new()?;
    let tree = parser.parse_str(source)?;
    normalize_with(&tree, source, None, NormalizeConfig::strict())
}

#[derive(Default)]
struct Idents {
    names: Vec<String>,
    stmts: usize,
}

impl Visitor for Idents {
    fn visit_ident(&mut self, ident: &Ident) {
        self.names.push(ident.value.clone());
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.stmts += 1;
        walk_stmt(self, stmt);
    }
}

#[test]
fn test_sample_lowers_without_error() -> Result<()> {
    let program = lower(SAMPLE)?;
    // package, two imports, class, interface
    assert_eq!(program.len(), 5);
    Ok(())
}

#[test]
fn test_visitor_reaches_every_identifier() -> Result<()> {
    let program = lower(SAMPLE)?;
    let mut idents = Idents::default();
    idents.visit_any(&Any::Ss(program));
    for expected in ["Store", "buckets", "get", "key", "bucket", "n", "outer", "reader", "e", "r"] {
        assert!(
            idents.names.iter().any(|name| name == expected),
            "missing identifier {expected}"
        );
    }
    assert!(idents.stmts > 15);
    Ok(())
}

#[test]
fn test_tokens_are_in_source_order() -> Result<()> {
    let program = lower(SAMPLE)?;
    let any = Any::Ss(program);
    let tokens = extract_tokens(&any);
    let positions: Vec<usize> = tokens.iter().filter_map(|tok| tok.charpos()).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);

    let (first, last) = range_of_any(&any).expect("sample has tokens");
    assert_eq!(first.str, "package");
    assert_eq!(last.str, "}");
    Ok(())
}
