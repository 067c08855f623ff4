//! End-to-end layout scenarios.
//!
//! Each test builds a small history in an `InMemorySource`, runs the engine
//! and checks rows, revnos, columns and the segments between rows.

use olive_layout::{
    layout, ColorScheme, GraphLayoutEngine, Interrupt, Layout, LayoutError, LayoutOptions,
    LineSegment, RowDecorator,
};
use olive_source::{
    Ancestry, InMemorySource, RevisionGraphSource, RevisionId, RevisionMeta, SourceError,
};

fn ids(names: &[&str]) -> Vec<RevisionId> {
    names.iter().map(|n| RevisionId::from(*n)).collect()
}

/// Helper: build a source from `(id, parents)` pairs.
fn source(edges: &[(&str, &[&str])]) -> InMemorySource {
    let mut source = InMemorySource::new();
    for (id, parents) in edges {
        source.add_revision(*id, ids(parents), None);
    }
    source
}

fn run(source: &InMemorySource, start: &str) -> Layout {
    layout(source, &RevisionId::from(start), LayoutOptions::default()).unwrap()
}

fn order(layout: &Layout) -> Vec<&str> {
    layout.rows.iter().map(|r| r.revision_id.as_str()).collect()
}

fn revnos(layout: &Layout) -> Vec<String> {
    layout.rows.iter().map(|r| r.revno.to_string()).collect()
}

fn seg(from: Option<usize>, to: Option<usize>, color: u32) -> LineSegment {
    LineSegment::new(from, to, color)
}

/// A mainline `a <- m1 <- ... <- m39 <- top` where `top` also merges `s`,
/// a child of `a`. The edge `s -> a` spans 40 rows.
fn long_merge() -> InMemorySource {
    let mut source = InMemorySource::new();
    source.add_revision("top", ids(&["m39", "s"]), None);
    source.add_revision("s", ids(&["a"]), None);
    for i in (1..=39).rev() {
        let parent = if i == 1 { "a".to_string() } else { format!("m{}", i - 1) };
        source.add_revision(format!("m{}", i), vec![RevisionId::new(parent)], None);
    }
    source.add_revision("a", vec![], None);
    source
}

#[test]
fn linear_history_is_one_column() {
    let src = source(&[("r3", &["r2"]), ("r2", &["r1"]), ("r1", &[])]);
    let layout = run(&src, "r3");

    assert_eq!(order(&layout), ["r3", "r2", "r1"]);
    assert_eq!(revnos(&layout), ["3", "2", "1"]);
    assert_eq!(layout.column_count, 1);
    assert!(layout.rows.iter().all(|r| r.node.column == 0 && r.node.color == 0));
    assert_eq!(layout.rows[0].lines, [seg(Some(0), Some(0), 0)]);
    assert_eq!(layout.rows[1].lines, [seg(Some(0), Some(0), 0)]);
    assert!(layout.rows[2].lines.is_empty());
}

#[test]
fn unmerged_fork_uses_two_columns() {
    let src = source(&[("r1", &[]), ("r2", &["r1"]), ("r3", &["r1"])]);
    let engine = GraphLayoutEngine::new(LayoutOptions::default()).unwrap();
    let layout = engine.layout_heads(&src, &ids(&["r2", "r3"])).unwrap();

    assert_eq!(layout.len(), 3);
    let r1 = layout.position("r1").unwrap();
    assert_eq!(r1, 2);
    let r2 = layout.row_of("r2").unwrap();
    let r3 = layout.row_of("r3").unwrap();
    assert_ne!(r2.node.column, r3.node.column);
    assert_eq!(r2.revno.to_string(), "2");
    assert_eq!(r3.revno.to_string(), "1.1.1");

    // Both lines arrive at r1's node.
    let r1_col = layout.rows[r1].node.column;
    let arriving = layout
        .in_lines(r1)
        .iter()
        .filter(|s| s.to == Some(r1_col))
        .count();
    assert_eq!(arriving, 2);
    assert_eq!(layout.row_of("r1").unwrap().children, ids(&["r3", "r2"]));
}

#[test]
fn merge_keeps_primary_on_mainline() {
    let src = source(&[
        ("r4", &["r2", "r3"]),
        ("r2", &["r1"]),
        ("r3", &["r1"]),
        ("r1", &[]),
    ]);
    let layout = run(&src, "r4");

    assert_eq!(order(&layout), ["r4", "r3", "r2", "r1"]);
    assert_eq!(revnos(&layout), ["3", "1.1.1", "2", "1"]);
    for id in ["r4", "r2", "r1"] {
        assert_eq!(layout.row_of(id).unwrap().node.column, 0, "{} off the mainline", id);
    }
    let r3 = layout.row_of("r3").unwrap();
    assert_eq!(r3.node.column, 1);
    assert_eq!(r3.merge_depth, 1);
    assert_eq!(r3.node.color, 2);
    // The merge edge leaves r4 towards column 1 in r3's colour.
    assert!(layout.rows[0].lines.contains(&seg(Some(0), Some(1), 2)));
}

#[test]
fn ghost_parent_is_a_terminal_stand_in() {
    let src = source(&[("b", &["a", "ghost"]), ("a", &[])]);
    let layout = run(&src, "b");

    assert_eq!(order(&layout), ["b", "ghost", "a"]);
    let ghost = layout.row_of("ghost").unwrap();
    assert!(ghost.ghost);
    assert!(ghost.parents.is_empty());
    assert!(ghost.lines.is_empty());
    assert_eq!(ghost.children, ids(&["b"]));
    assert_eq!(ghost.revno.to_string(), "1.1");
    assert!(!layout.row_of("a").unwrap().ghost);
}

#[test]
fn only_ghost_parents() {
    let src = source(&[("b", &["gone1", "gone2"])]);
    let layout = run(&src, "b");
    assert_eq!(layout.len(), 3);
    assert!(layout.rows[1..].iter().all(|r| r.ghost));
}

#[test]
fn long_edge_is_drawn_as_two_stubs() {
    let src = long_merge();
    let layout = run(&src, "top");
    assert_eq!(layout.len(), 42);

    let s = layout.position("s").unwrap();
    let a = layout.position("a").unwrap();
    assert_eq!((s, a), (1, 41));
    let s_col = layout.rows[s].node.column;
    assert_eq!(s_col, 1);

    // The mainline edge top -> m39 also passes through row s in column 0.
    assert_eq!(
        layout.rows[s].lines,
        [seg(Some(0), Some(0), 0), seg(Some(1), Some(1), 0)]
    );
    assert!(layout.rows[s + 1].lines.contains(&seg(Some(1), None, 0)));
    assert!(layout.rows[a - 2].lines.contains(&seg(None, Some(1), 0)));
    assert!(layout.rows[a - 1].lines.contains(&seg(Some(1), Some(0), 0)));
    // Nothing is drawn in between.
    for row in &layout.rows[s + 2..a - 2] {
        assert!(row.lines.iter().all(|l| l.from != Some(1) && l.to != Some(1)));
    }
    let stubs = layout.rows.iter().flat_map(|r| &r.lines).filter(|l| l.is_stub()).count();
    assert_eq!(stubs, 2);
}

#[test]
fn mainline_continuation_keeps_its_column_past_merge_stubs() {
    let src = source(&[
        ("r1", &["r2", "q", "p"]),
        ("r2", &["r3", "x", "p"]),
        ("q", &["r3"]),
        ("x", &["r3"]),
        ("p", &["r3"]),
        ("r3", &[]),
    ]);
    let opts = LayoutOptions::new().broken_line_length(Some(3));
    let layout = layout(&src, &RevisionId::from("r1"), opts).unwrap();
    assert_eq!(order(&layout), ["r1", "q", "r2", "x", "p", "r3"]);

    let r2 = layout.position("r2").unwrap();
    let r3 = layout.position("r3").unwrap();
    assert_eq!(layout.rows[r2].node.column, 0);
    for row in &layout.rows[r2..r3] {
        assert!(
            row.lines.contains(&seg(Some(0), Some(0), 0)),
            "row {} lost the mainline: {:?}",
            row.revision_id,
            row.lines
        );
    }
}

#[test]
fn disabling_broken_lines_draws_the_whole_edge() {
    let src = long_merge();
    let opts = LayoutOptions::new().broken_line_length(None);
    let layout = layout(&src, &RevisionId::from("top"), opts).unwrap();

    assert!(layout.rows.iter().flat_map(|r| &r.lines).all(|l| !l.is_stub()));
    for row in &layout.rows[2..40] {
        assert!(row.lines.contains(&seg(Some(1), Some(1), 0)));
    }
}

#[test]
fn truncation_keeps_a_stable_prefix() {
    let src = source(&[
        ("r4", &["r2", "r3"]),
        ("r2", &["r1"]),
        ("r3", &["r1"]),
        ("r1", &[]),
    ]);
    let full = run(&src, "r4");
    let opts = LayoutOptions::new().max_count(Some(2));
    let short = layout(&src, &RevisionId::from("r4"), opts).unwrap();

    assert_eq!(short.len(), 2);
    assert_eq!(revnos(&short), revnos(&full)[..2]);
    assert_eq!(order(&short), order(&full)[..2]);
    assert!(short.position("r2").is_none());
    // r3's parent was cut off: no edge, but the id is still listed.
    assert!(short.rows[1].lines.is_empty());
    assert_eq!(short.rows[1].parents, ids(&["r1"]));
}

#[test]
fn max_count_zero_is_empty() {
    let src = source(&[("a", &[])]);
    let opts = LayoutOptions::new().max_count(Some(0));
    let layout = layout(&src, &RevisionId::from("a"), opts).unwrap();
    assert!(layout.is_empty());
    assert_eq!(layout.column_count, 0);
}

#[test]
fn repeated_layouts_are_identical() {
    let src = long_merge();
    assert_eq!(run(&src, "top"), run(&src, "top"));
}

#[test]
fn index_matches_row_positions() {
    let src = long_merge();
    let layout = run(&src, "top");
    assert_eq!(layout.index.len(), layout.len());
    for (pos, row) in layout.iter().enumerate() {
        assert_eq!(layout.position(row.revision_id.as_str()), Some(pos));
    }
}

#[test]
fn unknown_start_is_no_such_revision() {
    let src = source(&[("a", &[])]);
    let err = layout(&src, &RevisionId::from("zzz"), LayoutOptions::default()).unwrap_err();
    assert!(matches!(err, LayoutError::NoSuchRevision(id) if id.as_str() == "zzz"));
}

#[test]
fn ghost_start_is_no_such_revision() {
    let mut ancestry = Ancestry::new();
    ancestry.insert(RevisionId::from("b"), ids(&["gone"]));
    let engine = GraphLayoutEngine::new(LayoutOptions::default()).unwrap();
    let err = engine.layout_ancestry(&ancestry, &ids(&["gone"])).unwrap_err();
    assert!(matches!(err, LayoutError::NoSuchRevision(_)));
}

#[test]
fn prefetched_ancestry_matches_source_layout() {
    let src = long_merge();
    let ancestry = src.get_ancestry(&RevisionId::from("top")).unwrap();
    let engine = GraphLayoutEngine::new(LayoutOptions::default()).unwrap();
    let from_ancestry = engine.layout_ancestry(&ancestry, &ids(&["top"])).unwrap();
    assert_eq!(from_ancestry, run(&src, "top"));
}

struct BrokenSource;

impl RevisionGraphSource for BrokenSource {
    fn get_ancestry(&self, _start: &RevisionId) -> Result<Ancestry, SourceError> {
        Err(SourceError::Io(std::io::Error::other("repository locked")))
    }

    fn get_revision(&self, _id: &RevisionId) -> Result<Option<RevisionMeta>, SourceError> {
        Ok(None)
    }
}

#[test]
fn source_failure_is_surfaced() {
    let err = layout(&BrokenSource, &RevisionId::from("a"), LayoutOptions::default()).unwrap_err();
    assert!(matches!(err, LayoutError::Source(SourceError::Io(_))));
    assert!(err.to_string().contains("repository locked"));
}

#[test]
fn cancelled_layout_returns_nothing() {
    let interrupt = Interrupt::new();
    let engine = GraphLayoutEngine::new(LayoutOptions::new().interrupt(interrupt.clone())).unwrap();
    let src = long_merge();

    assert!(engine.layout(&src, &RevisionId::from("top")).is_ok());
    interrupt.trigger();
    assert!(matches!(
        engine.layout(&src, &RevisionId::from("top")),
        Err(LayoutError::Cancelled)
    ));
    interrupt.reset();
    assert!(engine.layout(&src, &RevisionId::from("top")).is_ok());
}

#[test]
fn lineage_colours_follow_committers() {
    let mut src = InMemorySource::new();
    src.add_revision("r", vec![], Some(RevisionMeta::new("ann", "root", 0)));
    src.add_revision("x", ids(&["r"]), Some(RevisionMeta::new("ann", "x", 1)));
    src.add_revision("y", ids(&["r"]), Some(RevisionMeta::new("bob", "y", 2)));

    let opts = LayoutOptions::new().color_scheme(ColorScheme::Lineage);
    let engine = GraphLayoutEngine::new(opts).unwrap();
    let layout = engine.layout_heads(&src, &ids(&["x", "y"])).unwrap();

    let color = |id: &str| layout.row_of(id).unwrap().node.color;
    assert_eq!(color("r"), color("x"));
    assert_ne!(color("r"), color("y"));
    // Columns do not depend on the colour scheme.
    let plain = GraphLayoutEngine::new(LayoutOptions::default())
        .unwrap()
        .layout_heads(&src, &ids(&["x", "y"]))
        .unwrap();
    for row in &layout.rows {
        assert_eq!(row.node.column, plain.row_of(row.revision_id.as_str()).unwrap().node.column);
    }
}

#[test]
fn lineage_ignores_revisions_without_metadata() {
    // No committers known anywhere: the fork point cannot follow either child.
    let src = source(&[("r", &[]), ("x", &["r"]), ("y", &["r"])]);
    let opts = LayoutOptions::new().color_scheme(ColorScheme::Lineage);
    let engine = GraphLayoutEngine::new(opts).unwrap();
    let layout = engine.layout_heads(&src, &ids(&["x", "y"])).unwrap();

    let color = |id: &str| layout.row_of(id).unwrap().node.color;
    assert_ne!(color("r"), color("x"));
    assert_ne!(color("r"), color("y"));
    assert_ne!(color("x"), color("y"));
}

#[test]
fn decorator_attaches_metadata() {
    let mut src = InMemorySource::new();
    src.add_revision("b", ids(&["a", "gone"]), Some(RevisionMeta::new("ann", "merge\n\nbody", 10)));
    src.add_revision("a", vec![], None);
    let layout = run(&src, "b");

    let mut decorator = RowDecorator::new(&src);
    let b = decorator.decorate(layout.row_of("b").unwrap()).unwrap();
    assert_eq!(b.meta.as_ref().map(|m| m.summary()), Some("merge"));
    let gone = decorator.decorate(layout.row_of("gone").unwrap()).unwrap();
    assert!(gone.meta.is_none());
    let a = decorator.decorate(layout.row_of("a").unwrap()).unwrap();
    assert_eq!(a.meta, Some(RevisionMeta::default()));
    assert_eq!(decorator.cached_len(), 2);
}
