// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Propagation order for hosts that emulate DOM dispatch.
//!
//! ## Overview
//!
//! The delegation runtime only sees events arriving at its root. A host that
//! delivers those events itself (for example the
//! [`scraper` adapter](crate::adapters)) needs the usual
//! capture → target → bubble order. These helpers derive it from parent links.

use alloc::vec::Vec;

use crate::types::{ParentLookup, Phase};

/// Reconstruct the root→target path for `target` by following parents.
///
/// The first element is the topmost ancestor reachable from `target`; the last
/// is `target` itself. Ancestry must be acyclic.
pub fn path_to_root<K: Clone>(target: K, parents: &impl ParentLookup<K>) -> Vec<K> {
    let mut out = Vec::new();
    let mut cur = target;
    loop {
        let parent = parents.parent_of(&cur);
        out.push(cur);
        match parent {
            Some(p) => cur = p,
            None => break,
        }
    }
    out.reverse();
    out
}

/// Order the dispatch steps for a root→target `path`.
///
/// Ancestors are visited outer→inner in [`Phase::Capture`], the target once in
/// [`Phase::Target`], and, when `bubbles` is set, the ancestors again
/// inner→outer in [`Phase::Bubble`]. An empty path yields no steps.
pub fn propagation_steps<K: Clone>(path: &[K], bubbles: bool) -> Vec<(Phase, K)> {
    let Some((target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(path.len() * 2);
    for n in ancestors {
        out.push((Phase::Capture, n.clone()));
    }
    out.push((Phase::Target, target.clone()));
    if bubbles {
        for n in ancestors.iter().rev() {
            out.push((Phase::Bubble, n.clone()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Parents;
    impl ParentLookup<u32> for Parents {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            match node {
                3 => Some(2),
                2 => Some(1),
                _ => None,
            }
        }
    }

    #[test]
    fn path_is_root_to_target() {
        assert_eq!(path_to_root(3, &Parents), vec![1, 2, 3]);
        assert_eq!(path_to_root(9, &Parents), vec![9]);
    }

    #[test]
    fn bubbling_steps() {
        let steps = propagation_steps(&[1, 2, 3], true);
        assert_eq!(
            steps,
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn non_bubbling_steps_stop_at_target() {
        let steps = propagation_steps(&[1, 2, 3], false);
        assert_eq!(
            steps,
            vec![(Phase::Capture, 1), (Phase::Capture, 2), (Phase::Target, 3)]
        );
    }

    #[test]
    fn singleton_and_empty_paths() {
        assert_eq!(propagation_steps(&[9], true), vec![(Phase::Target, 9)]);
        assert!(propagation_steps::<u32>(&[], true).is_empty());
    }
}
