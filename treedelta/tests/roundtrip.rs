//! Roundtrip tests using datatest-stable.
//!
//! Each test case is a file in `tests/roundtrip-cases/` with format:
//! ```text
//! <from tree>
//! ===
//! <to tree>
//! ```
//!
//! Either side may be blank (the empty tree). The test verifies:
//! apply(from, reconcile(from, to)) == to

mod common;

use std::path::Path;

use treedelta::{Tree, notation, reconcile};

fn run_roundtrip_test(path: &Path) -> datatest_stable::Result<()> {
    facet_testhelpers::setup();

    let content = std::fs::read_to_string(path)?;
    let parts: Vec<&str> = content.split("\n===\n").collect();

    if parts.len() != 2 {
        return Err(format!(
            "Test file must have exactly one '===' separator, found {} parts",
            parts.len()
        )
        .into());
    }

    let from_text = parts[0].trim();
    let to_text = parts[1].trim();

    let from = notation::parse_optional(from_text).map_err(|e| format!("bad from tree: {e}"))?;
    let to = notation::parse_optional(to_text).map_err(|e| format!("bad to tree: {e}"))?;

    let ops = reconcile(from.as_ref().map(Tree::root), to.as_ref().map(Tree::root))
        .map_err(|e| format!("reconcile failed: {e}"))?;

    let result = common::apply(from.as_ref(), to.as_ref(), &ops)
        .map_err(|e| format!("apply failed: {e}"))?;
    let expected = to.as_ref().map(Tree::to_string).unwrap_or_default();

    if result != expected {
        let script: Vec<String> = ops.iter().map(ToString::to_string).collect();
        return Err(format!(
            "Roundtrip failed!\nFrom: {from_text}\nTo: {to_text}\nScript:\n  {}\nResult: {result}\nExpected: {expected}",
            script.join("\n  ")
        )
        .into());
    }

    Ok(())
}

datatest_stable::harness! {
    { test = run_roundtrip_test, root = "tests/roundtrip-cases", pattern = r".*\.tree$" },
}
