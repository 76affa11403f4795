//! Compact text notation for trees: `a(b(d,e),c)`.
//!
//! Used for fixtures, tests, benchmarks and log output. A node is an
//! identifier optionally followed by a parenthesised, comma-separated list of
//! children. Identifiers are runs of ASCII alphanumerics, `_`, `-`, `.` and
//! `:`. Whitespace is ignored. [`Tree`]'s `Display` writes the same form.

use indextree::NodeId;

use crate::tree::Tree;

/// Errors from [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    /// A character that cannot appear here.
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Byte offset into the input.
        offset: usize,
    },

    /// Input ended in the middle of a tree.
    #[error("unexpected end of input")]
    UnexpectedEnd,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

/// Parse a tree. Blank input is an error; see [`parse_optional`].
pub fn parse(input: &str) -> Result<Tree<String>, NotationError> {
    parse_optional(input)?.ok_or(NotationError::UnexpectedEnd)
}

/// Parse a tree, treating blank input as the absent tree.
pub fn parse_optional(input: &str) -> Result<Option<Tree<String>>, NotationError> {
    let mut tree: Option<Tree<String>> = None;
    // Open parents; the innermost is last.
    let mut open: Vec<NodeId> = Vec::new();
    // The node just read, if the next token may open its child list.
    let mut last: Option<NodeId> = None;
    let mut expect_node = true;

    let mut chars = input.char_indices().peekable();
    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if is_ident_char(c) {
            if !expect_node {
                return Err(NotationError::Unexpected { found: c, offset });
            }
            let mut identity = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if !is_ident_char(c) {
                    break;
                }
                identity.push(c);
                chars.next();
            }
            let id = if let Some(tree) = tree.as_mut() {
                // A second top-level node has no open parent.
                let Some(&parent) = open.last() else {
                    return Err(NotationError::Unexpected { found: c, offset });
                };
                tree.add_child(parent, identity)
            } else {
                let new = Tree::new(identity);
                let root = new.root;
                tree = Some(new);
                root
            };
            last = Some(id);
            expect_node = false;
            continue;
        }

        chars.next();
        match c {
            '(' if !expect_node => match last.take() {
                Some(id) => {
                    open.push(id);
                    expect_node = true;
                }
                None => return Err(NotationError::Unexpected { found: c, offset }),
            },
            ',' if !expect_node && !open.is_empty() => {
                last = None;
                expect_node = true;
            }
            ')' if !expect_node && !open.is_empty() => {
                open.pop();
                last = None;
            }
            _ => return Err(NotationError::Unexpected { found: c, offset }),
        }
    }

    if !open.is_empty() || (expect_node && tree.is_some()) {
        return Err(NotationError::UnexpectedEnd);
    }
    Ok(tree)
}
