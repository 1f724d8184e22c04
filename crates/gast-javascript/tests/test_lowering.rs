// Whole-file lowering of JavaScript sources through the public API.

use gast_core::ast::{Any, Ident, Program, Stmt};
use gast_core::config::NormalizeConfig;
use gast_core::utils::{extract_tokens, range_of_any};
use gast_core::visit::{walk_stmt, Visitor};
use gast_core::Result;
use gast_javascript::{normalize_with, JsParser};
use pretty_assertions::assert_eq;

const SAMPLE: &str = r#"
import fs from "fs";
export class Cache extends Map {
  static #count = 0;
  get size() { return super.size; }
  async load(path, ...rest) {
    try {
      const { data = [] } = await fs.promises.readFile(path);
      for (const item of data) {
        if (item?.skip) continue;
        this.set(item.key, item);
      }
    } catch (err) {
      throw new Error(`failed: ${err.message}`);
    } finally {
      Cache.#count += 1;
    }
  }
}
label: while (true) { break label; }
switch (x) { case 1: y(); break; default: z(); }
do { i--; } while (i > 0);
with (obj) { a = b; }
debugger;
"#;

fn lower(source: &str) -> Result<Program> {
    let mut parser = JsParser::new()?;
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
    // import, class, export marker, label, switch, do, with, debugger
    assert_eq!(program.len(), 8);
    Ok(())
}

#[test]
fn test_visitor_reaches_every_identifier() -> Result<()> {
    let program = lower(SAMPLE)?;
    let mut idents = Idents::default();
    idents.visit_any(&Any::Ss(program));
    for expected in ["Cache", "load", "path", "rest", "data", "item", "err", "label", "obj", "b"] {
        assert!(
            idents.names.iter().any(|name| name == expected),
            "missing identifier {expected}"
        );
    }
    assert!(idents.stmts > 20);
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
    assert_eq!(first.str, "import");
    assert_eq!(last.str, ";");
    Ok(())
}
