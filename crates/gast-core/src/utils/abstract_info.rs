use std::collections::HashMap;

use crate::ast::{Any, IdInfoCell, Token};
use crate::fold::{fold_id_info_contents, Fold};

/// Erases positions: every token becomes [`Token::abstracted`].
///
/// Identifier slots are copied into fresh cells. Occurrences that shared a
/// cell before share the corresponding new cell afterwards.
#[derive(Default)]
pub struct PositionEraser {
    // original cell kept alive so its address cannot be reused mid-fold
    cells: HashMap<usize, (IdInfoCell, IdInfoCell)>,
}

impl Fold for PositionEraser {
    fn fold_token(&mut self, tok: Token) -> Token {
        tok.abstracted()
    }

    fn fold_id_info(&mut self, info: IdInfoCell) -> IdInfoCell {
        if let Some((_, fresh)) = self.cells.get(&info.addr()) {
            return fresh.clone();
        }
        let fresh = IdInfoCell::new();
        let contents = info.get();
        self.cells.insert(info.addr(), (info, fresh.clone()));
        let folded = fold_id_info_contents(self, contents);
        *fresh.write() = folded;
        fresh
    }
}

/// Position-free copy of a node, for structural comparison.
pub fn abstract_position_info(any: Any) -> Any {
    PositionEraser::default().fold_any(any)
}
