//! Property tests for the project containment and common-root laws.

use keeper_core::model::{Project, ProjectKind};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 0..4)
}

fn kind() -> impl Strategy<Value = ProjectKind> {
    prop_oneof![
        Just(ProjectKind::Todo),
        Just(ProjectKind::Checklist),
        Just(ProjectKind::Ref),
    ]
}

fn project_from(parts: &[String], kind: ProjectKind) -> Project {
    Project::new(parts.join("."), kind)
}

proptest! {
    #[test]
    fn containment_is_reflexive(parts in segments(), k in kind()) {
        let p = project_from(&parts, k);
        prop_assert!(p.contains(&p));
    }

    #[test]
    fn parent_contains_child_but_not_vice_versa(
        parts in prop::collection::vec(segment(), 1..4),
        extra in prop::collection::vec(segment(), 1..3),
        k in kind(),
    ) {
        let parent = project_from(&parts, k);
        let mut child_parts = parts.clone();
        child_parts.extend(extra);
        let child = project_from(&child_parts, k);

        prop_assert!(parent.contains(&child));
        prop_assert!(!child.contains(&parent));
    }

    #[test]
    fn extending_the_last_segment_breaks_containment(
        parts in prop::collection::vec(segment(), 1..4),
        suffix in "[a-z]{1,4}",
        k in kind(),
    ) {
        // 'gro' vs 'grocery': string prefix, not a segment prefix.
        let p = project_from(&parts, k);
        let mut longer_parts = parts.clone();
        if let Some(last) = longer_parts.last_mut() {
            last.push_str(&suffix);
        }
        let longer = project_from(&longer_parts, k);

        prop_assert!(!p.contains(&longer));
        prop_assert!(!longer.contains(&p));
    }

    #[test]
    fn null_contains_everything(parts in segments(), k in kind()) {
        let p = project_from(&parts, k);
        prop_assert!(Project::null().contains(&p));
        prop_assert!(!p.contains(&Project::null()));
    }

    #[test]
    fn kinds_never_mix(parts in prop::collection::vec(segment(), 0..4)) {
        let todo = project_from(&parts, ProjectKind::Todo);
        let checklist = project_from(&parts, ProjectKind::Checklist);
        prop_assert!(!todo.contains(&checklist));
        prop_assert!(!checklist.contains(&todo));
    }

    #[test]
    fn common_root_of_single_project_is_itself(parts in segments(), k in kind()) {
        let p = project_from(&parts, k);
        prop_assert_eq!(Project::common_root([&p]), p);
    }

    #[test]
    fn common_root_contains_every_input(
        base in segments(),
        extra_a in prop::collection::vec(segment(), 0..3),
        extra_b in prop::collection::vec(segment(), 0..3),
        k in kind(),
    ) {
        let mut parts_a = base.clone();
        parts_a.extend(extra_a);
        let mut parts_b = base;
        parts_b.extend(extra_b);
        let a = project_from(&parts_a, k);
        let b = project_from(&parts_b, k);

        let root = Project::common_root([&a, &b]);
        prop_assert!(root.contains(&a));
        prop_assert!(root.contains(&b));
    }

    #[test]
    fn common_root_of_mixed_kinds_is_null(parts in segments()) {
        let a = project_from(&parts, ProjectKind::Todo);
        let b = project_from(&parts, ProjectKind::Ref);
        prop_assert_eq!(Project::common_root([&a, &b]), Project::null());
    }

    #[test]
    fn truncate_never_exceeds_depth(parts in segments(), n in 0usize..6) {
        let p = project_from(&parts, ProjectKind::Todo);
        let truncated = p.truncate(n);
        prop_assert_eq!(truncated.depth(), n.min(p.depth()));
        prop_assert!(truncated.contains(&p));
    }
}
