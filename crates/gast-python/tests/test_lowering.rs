// Whole-module lowering of Python sources through the public API.

use gast_core::ast::{Any, Ident, Program, Stmt};
use gast_core::config::NormalizeConfig;
use gast_core::utils::{range_of_any, token_strings};
use gast_core::visit::{walk_stmt, Visitor};
use gast_core::Result;
use gast_python::{normalize_with, PyParser};
use pretty_assertions::assert_eq;

const SAMPLE: &str = r#"
from __future__ import annotations
import collections.abc as cabc
from .store import Bucket, LIMIT as limit

CACHE: dict[str, int] = {}


@dataclass(frozen=True)
class Entry(Bucket):
    key: str
    hits: int = 0

    def touch(self, *rest, **extra) -> Entry:
        global CACHE
        with lock as held, open(self.key) as fh:
            data = [line.strip() for line in fh if line]
        for i, line in enumerate(data):
            if i > limit:
                break
            elif line:
                continue
        else:
            pass
        try:
            total = sum(len(x) for x in data)
        except (KeyError, ValueError) as err:
            raise RuntimeError(f"bad {self.key!r}") from err
        finally:
            del data
        match total:
            case 0 | 1:
                return None
            case [first, *others]:
                return first
        return lambda n=1: total + n
"#;

fn lower(source: &str) -> Result<Program> {
    let mut parser = PyParser::new()?;
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
    // future import, import, two from-imports, annotated global, class
    assert_eq!(program.len(), 6);
    Ok(())
}

#[test]
fn test_visitor_reaches_every_identifier() -> Result<()> {
    let program = lower(SAMPLE)?;
    let mut idents = Idents::default();
    idents.visit_any(&Any::Ss(program));
    for expected in [
        "Entry", "touch", "rest", "extra", "CACHE", "held", "fh", "line", "err", "others", "n",
    ] {
        assert!(
            idents.names.iter().any(|name| name == expected),
            "missing identifier {expected}"
        );
    }
    assert!(idents.stmts > 15);
    Ok(())
}

#[test]
fn test_tokens_span_the_module() -> Result<()> {
    let program = lower(SAMPLE)?;
    let any = Any::Ss(program);
    let tokens = token_strings(&any);
    assert_eq!(tokens.first().map(String::as_str), Some("from"));

    let (first, last) = range_of_any(&any).expect("sample has tokens");
    assert_eq!(first.str, "from");
    assert_eq!(last.str, "n");
    assert!(first.charpos < last.charpos);
    Ok(())
}
