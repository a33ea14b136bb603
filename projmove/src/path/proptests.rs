//! Property-based tests for path identity.

use super::identity::CanonicalPath;
use super::relationship::PathRelationship;
use super::relative::relative_path;
use proptest::prelude::*;
use std::path::{Path, PathBuf};

fn path_component_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,12}"
}

fn absolute_path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(path_component_strategy(), 1..8).prop_map(|parts| {
        let mut path = PathBuf::from("/");
        for part in parts {
            path.push(part);
        }
        path
    })
}

/// Respells a path with random case, doubled separators, `.` segments and a
/// trailing separator.
fn respell(path: &Path, upper: bool) -> String {
    let s = path.to_string_lossy();
    let cased = if upper { s.to_uppercase() } else { s.to_lowercase() };
    format!("{}/./", cased.replace('/', "//"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Identity ignores spelling differences
    #[test]
    fn identity_ignores_spelling(path in absolute_path_strategy(), upper in any::<bool>()) {
        let base = Path::new("/");
        let respelled = respell(&path, upper);
        prop_assert_eq!(
            CanonicalPath::with_base(&path, base),
            CanonicalPath::with_base(Path::new(&respelled), base)
        );
    }

    // Canonicalizing a canonical form is a no-op
    #[test]
    fn identity_idempotent(path in absolute_path_strategy()) {
        let base = Path::new("/");
        let once = CanonicalPath::with_base(&path, base);
        let twice = CanonicalPath::with_base(Path::new(once.as_str()), base);
        prop_assert_eq!(once, twice);
    }

    // `x/..` never changes identity
    #[test]
    fn parent_segment_cancels(path in absolute_path_strategy(), extra in path_component_strategy()) {
        let base = Path::new("/");
        let detour = path.join(&extra).join("..");
        prop_assert_eq!(
            CanonicalPath::with_base(&path, base),
            CanonicalPath::with_base(&detour, base)
        );
    }

    // Joining the relative expression back onto `from` lands on `to`
    #[test]
    fn relative_path_round_trips(from in absolute_path_strategy(), to in absolute_path_strategy()) {
        let rel = relative_path(&from, &to);
        let rejoined = CanonicalPath::with_base(Path::new(&rel), &from);
        prop_assert_eq!(rejoined, CanonicalPath::with_base(&to, Path::new("/")));
    }

    // Path relationship is reflexive
    #[test]
    fn path_relationship_reflexive(path in absolute_path_strategy()) {
        prop_assert_eq!(PathRelationship::between(&path, &path), PathRelationship::Same);
    }

    // Ancestor and descendant are mirror images
    #[test]
    fn relationship_symmetric(p1 in absolute_path_strategy(), p2 in absolute_path_strategy()) {
        let rel1 = PathRelationship::between(&p1, &p2);
        let rel2 = PathRelationship::between(&p2, &p1);
        match (rel1, rel2) {
            (PathRelationship::Ancestor, PathRelationship::Descendant)
            | (PathRelationship::Descendant, PathRelationship::Ancestor)
            | (PathRelationship::Same, PathRelationship::Same)
            | (PathRelationship::Unrelated, PathRelationship::Unrelated) => {}
            _ => prop_assert!(false, "Invalid relationship symmetry: {:?} vs {:?}", rel1, rel2),
        }
    }
}
