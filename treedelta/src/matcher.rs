//! Longest common subsequence over sibling identities.
//!
//! Children that belong to the common subsequence of their parent's old and
//! new child lists keep their place; every other shared child has to move.
//!
//! Tokens are unique within one sibling list, so once both lists are reduced
//! to the tokens they share they are permutations of each other. The common
//! subsequence is then the longest run of `from` tokens whose `to` positions
//! increase, which is found in `O(n log n)` instead of the quadratic table a
//! general LCS needs.

use core::hash::Hash;

use rapidhash::RapidHashMap as HashMap;
use smallvec::SmallVec;

/// Longest subsequence of tokens appearing in the same relative order in
/// both `from` and `to`, returned in that order.
///
/// Tokens present in only one list are ignored. When several subsequences
/// are equally long, the one keeping the tokens that come earliest in `from`
/// wins, so swapping `[f, g]` into `[g, f]` keeps `f` and moves `g`.
pub fn longest_common_subsequence<T>(from: &[T], to: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let to_positions: HashMap<&T, usize> = to
        .iter()
        .enumerate()
        .map(|(position, token)| (token, position))
        .collect();

    // Shared tokens in `from` order, tagged with their position in `to`.
    let shared: SmallVec<[(&T, usize); 16]> = from
        .iter()
        .filter_map(|token| to_positions.get(token).map(|&position| (token, position)))
        .collect();

    if shared.windows(2).all(|pair| pair[0].1 < pair[1].1) {
        return shared.iter().map(|&(token, _)| token.clone()).collect();
    }

    // run[i]: length of the longest increasing run starting at shared[i].
    // heads[k]: largest `to` position starting a run of length k + 1 among the
    // entries scanned so far. Strictly decreasing in k.
    let mut run = vec![0usize; shared.len()];
    let mut heads: Vec<usize> = Vec::new();
    for (i, &(_, position)) in shared.iter().enumerate().rev() {
        let k = heads.partition_point(|&head| head > position);
        if k == heads.len() {
            heads.push(position);
        } else {
            heads[k] = position;
        }
        run[i] = k + 1;
    }

    // Pick greedily front to back: the first entry that can still complete a
    // maximal run is the earliest possible choice.
    let mut need = heads.len();
    let mut last: Option<usize> = None;
    let mut kept = Vec::with_capacity(need);
    for (i, &(token, position)) in shared.iter().enumerate() {
        if need == 0 {
            break;
        }
        if run[i] == need && last.is_none_or(|last| position > last) {
            kept.push(token.clone());
            last = Some(position);
            need -= 1;
        }
    }
    kept
}
