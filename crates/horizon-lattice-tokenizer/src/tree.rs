//! Folding a flat token list into a tree.

use crate::token::{BlockStart, Token};

/// Fold flat tokens into nested blocks.
///
/// Each `BlockEnd` closes the innermost open block and is dropped. A
/// `BlockEnd` with no open block ends the current top-level run; the token
/// right after it is passed to `unmatched` and folding continues into the
/// same root list. Blocks still open at the end keep what was collected.
pub(crate) fn fold<'a, F>(tokens: Vec<Token<'a>>, mut unmatched: F) -> Vec<Token<'a>>
where
    F: FnMut(&Token<'a>),
{
    let mut root = Vec::new();
    let mut open: Vec<(BlockStart<'a>, Vec<Token<'a>>)> = Vec::new();
    let mut after_stray = false;

    for token in tokens {
        if std::mem::take(&mut after_stray) {
            unmatched(&token);
        }

        match token {
            Token::BlockEnd { .. } => match open.pop() {
                Some(block) => attach(&mut open, &mut root, block),
                None => after_stray = true,
            },
            Token::BlockStart(block) if block.children.is_none() => open.push((block, Vec::new())),
            other => match open.last_mut() {
                Some((_, children)) => children.push(other),
                None => root.push(other),
            },
        }
    }

    while let Some(block) = open.pop() {
        attach(&mut open, &mut root, block);
    }
    root
}

fn attach<'a>(
    open: &mut [(BlockStart<'a>, Vec<Token<'a>>)],
    root: &mut Vec<Token<'a>>,
    (mut block, children): (BlockStart<'a>, Vec<Token<'a>>),
) {
    block.children = Some(children);
    match open.last_mut() {
        Some((_, parent)) => parent.push(Token::BlockStart(block)),
        None => root.push(Token::BlockStart(block)),
    }
}
