//! A reference consumer: replays an edit script against a copy of the old
//! tree and renders the result in notation.

#![allow(dead_code)]

use std::collections::HashMap;

use treedelta::{Direction, Operation, Order, Tree, TreeNode, notation, reconcile, traverse};

pub type Op = Operation<String>;

/// Reconcile `from` into `to`, replay the script and check the result.
pub fn assert_round_trip(from: &str, to: &str) -> Vec<Op> {
    let from_tree = notation::parse_optional(from).unwrap();
    let to_tree = notation::parse_optional(to).unwrap();
    let ops = reconcile(
        from_tree.as_ref().map(Tree::root),
        to_tree.as_ref().map(Tree::root),
    )
    .unwrap();

    let result = apply(from_tree.as_ref(), to_tree.as_ref(), &ops)
        .unwrap_or_else(|e| panic!("apply failed: {e}\nfrom: {from}\nto: {to}\nops: {ops:#?}"));
    let expected = to_tree.as_ref().map(Tree::to_string).unwrap_or_default();
    assert_eq!(
        result, expected,
        "round trip mismatch\nfrom: {from}\nto: {to}\nops: {ops:#?}"
    );
    ops
}

/// Mutable forest keyed by identity.
#[derive(Default)]
struct Forest {
    parent: HashMap<String, Option<String>>,
    children: HashMap<String, Vec<String>>,
}

impl Forest {
    fn load(tree: Option<&Tree<String>>) -> Self {
        let mut forest = Forest::default();
        for node in traverse(tree.map(Tree::root), Direction::LeftToRight, Order::Pre) {
            let identity = node.identity();
            forest
                .parent
                .insert(identity.clone(), node.parent().map(|p| p.identity()));
            forest
                .children
                .insert(identity, node.children().map(|c| c.identity()).collect());
        }
        forest
    }

    fn contains(&self, identity: &str) -> bool {
        self.parent.contains_key(identity)
    }

    fn insert(&mut self, identity: &str, parent: &str, position: usize) -> Result<(), String> {
        let siblings = self
            .children
            .get_mut(parent)
            .ok_or_else(|| format!("parent {parent} does not exist"))?;
        if position > siblings.len() {
            return Err(format!(
                "position {position} out of range under {parent} ({} children)",
                siblings.len()
            ));
        }
        siblings.insert(position, identity.to_string());
        self.parent
            .insert(identity.to_string(), Some(parent.to_string()));
        Ok(())
    }

    fn unlink(&mut self, identity: &str) {
        if let Some(Some(parent)) = self.parent.get(identity).cloned() {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|c| c != identity);
            }
            self.parent.insert(identity.to_string(), None);
        }
    }

    fn remove_subtree(&mut self, identity: &str) {
        let mut stack = vec![identity.to_string()];
        while let Some(id) = stack.pop() {
            self.parent.remove(&id);
            if let Some(children) = self.children.remove(&id) {
                stack.extend(children);
            }
        }
    }

    fn is_ancestor_or_self<'a>(&'a self, ancestor: &str, mut node: &'a str) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent.get(node) {
                Some(Some(parent)) => node = parent.as_str(),
                _ => return false,
            }
        }
    }

    /// Index of `identity` among its parent's children.
    fn position(&self, identity: &str) -> Option<usize> {
        let parent = self.parent.get(identity)?.as_ref()?;
        self.children[parent].iter().position(|c| c == identity)
    }

    /// Proper descendants of `identity`, parents first.
    fn descendants(&self, identity: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<String> = self.children[identity].iter().rev().cloned().collect();
        while let Some(id) = stack.pop() {
            stack.extend(self.children[&id].iter().rev().cloned());
            out.push(id);
        }
        out
    }

    fn render(&self, identity: &str, out: &mut String) {
        out.push_str(identity);
        let children = &self.children[identity];
        if !children.is_empty() {
            out.push('(');
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                self.render(child, out);
            }
            out.push(')');
        }
    }
}

/// Replay `ops` against `from`. `to` supplies the new descendants a `Create`
/// brings along, and the old descendants a `Delete` takes with it. Returns
/// the final tree in notation, or `""` when empty.
pub fn apply(
    from: Option<&Tree<String>>,
    to: Option<&Tree<String>>,
    ops: &[Op],
) -> Result<String, String> {
    let mut forest = Forest::load(from);
    let original = Forest::load(from);
    let desired = Forest::load(to);

    for op in ops {
        match op {
            Operation::Delete { identity } => {
                if !forest.contains(identity) {
                    return Err(format!("{op}: no such node"));
                }
                forest.unlink(identity);
                forest.remove_subtree(identity);
                // Old descendants that are gone from `to` go too, even when
                // their parent was detached to survive elsewhere.
                for gone in original.descendants(identity) {
                    if !desired.contains(&gone) && forest.contains(&gone) {
                        forest.unlink(&gone);
                        forest.remove_subtree(&gone);
                    }
                }
            }
            Operation::Detach { identity } => match forest.parent.get(identity) {
                Some(Some(_)) => forest.unlink(identity),
                Some(None) => return Err(format!("{op}: node has no parent")),
                None => return Err(format!("{op}: no such node")),
            },
            Operation::Create {
                identity,
                parent,
                position,
            } => {
                if forest.contains(identity) {
                    return Err(format!("{op}: node already exists"));
                }
                forest.parent.insert(identity.clone(), None);
                forest.children.insert(identity.clone(), Vec::new());
                if let Some(parent) = parent {
                    forest.insert(identity, parent, *position)?;
                }
                // New descendants arrive with their root, wherever they hang.
                for child in desired.descendants(identity) {
                    if original.contains(&child) {
                        continue;
                    }
                    let Some(Some(parent)) = desired.parent.get(&child).cloned() else {
                        return Err(format!("{op}: {child} has no parent in to"));
                    };
                    let target = desired.position(&child);
                    let siblings = forest
                        .children
                        .get(&parent)
                        .ok_or_else(|| format!("{op}: parent {parent} of {child} does not exist"))?;
                    let position = siblings
                        .iter()
                        .filter(|s| desired.position(s) < target)
                        .count();
                    forest.parent.insert(child.clone(), None);
                    forest.children.insert(child.clone(), Vec::new());
                    forest.insert(&child, &parent, position)?;
                }
            }
            Operation::Attach {
                identity,
                parent,
                position,
            } => {
                match forest.parent.get(identity) {
                    Some(None) => {}
                    Some(Some(_)) => return Err(format!("{op}: node is still attached")),
                    None => return Err(format!("{op}: no such node")),
                }
                if forest.is_ancestor_or_self(identity, parent) {
                    return Err(format!("{op}: would create a cycle"));
                }
                forest.insert(identity, parent, *position)?;
            }
        }
    }

    let roots: Vec<&String> = forest
        .parent
        .iter()
        .filter(|(_, parent)| parent.is_none())
        .map(|(identity, _)| identity)
        .collect();
    match roots.as_slice() {
        [] => Ok(String::new()),
        [root] => {
            let mut out = String::new();
            forest.render(root, &mut out);
            Ok(out)
        }
        _ => Err(format!("{} disconnected roots left: {roots:?}", roots.len())),
    }
}
