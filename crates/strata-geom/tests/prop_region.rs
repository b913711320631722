use proptest::prelude::*;
use strata_geom::{BlockPos, Region3, Side};

fn coord() -> impl Strategy<Value = i32> {
    -10_000i32..=10_000
}

fn arb_pos() -> impl Strategy<Value = BlockPos> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

fn arb_region() -> impl Strategy<Value = Region3> {
    (arb_pos(), arb_pos()).prop_map(|(a, b)| Region3::new(a.min(b), a.max(b)))
}

#[test]
fn empty_region_contains_nothing() {
    assert!(Region3::EMPTY.is_empty());
    assert!(!Region3::EMPTY.contains(BlockPos::ZERO));
    assert_eq!(Region3::EMPTY.expand(3), Region3::EMPTY);
    assert_eq!(format!("{}", Region3::EMPTY), "[empty]");
}

#[test]
fn around_covers_cube() {
    let r = Region3::around(BlockPos::new(5, 10, -3), 2);
    assert_eq!(r.min, BlockPos::new(3, 8, -5));
    assert_eq!(r.max, BlockPos::new(7, 12, -1));
    assert!(r.contains(BlockPos::new(7, 12, -1)));
    assert!(!r.contains(BlockPos::new(8, 12, -1)));
}

#[test]
fn sides_step_one_block_each() {
    let p = BlockPos::new(1, 2, 3);
    let mut seen: Vec<BlockPos> = Side::ALL.iter().map(|&s| p.step(s)).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 6);
    assert_eq!(p.step(Side::Bottom), BlockPos::new(1, 1, 3));
}

#[test]
fn offsets_saturate_at_the_integer_range() {
    let edge = BlockPos::new(i32::MAX, 0, i32::MIN);
    assert_eq!(edge.offset(1, 0, -1), edge);
    assert_eq!(edge.step(Side::Right), edge);
    let r = Region3::around(edge, 16);
    assert_eq!(r.max.x, i32::MAX);
    assert_eq!(r.min.z, i32::MIN);
    assert!(r.contains(edge));
    let grown = Region3::from_point(edge).expand(i32::MAX);
    assert_eq!(grown.min.x, 0);
    assert_eq!(grown.max.z, -1);
}

proptest! {
    // a region spanning two corners contains both of them
    #[test]
    fn corner_region_contains_corners(a in arb_pos(), b in arb_pos()) {
        let r = Region3::new(a.min(b), a.max(b));
        prop_assert_eq!(r, Region3::new(b.min(a), b.max(a)));
        prop_assert!(r.contains(a));
        prop_assert!(r.contains(b));
        prop_assert!(!r.is_empty());
    }

    // encompass grows to cover the point and never loses coverage
    #[test]
    fn encompass_is_monotonic(r in arb_region(), p in arb_pos(), q in arb_pos()) {
        let grown = r.encompass(p);
        prop_assert!(grown.contains(p));
        prop_assert!(grown.contains(r.min));
        prop_assert!(grown.contains(r.max));
        if r.contains(q) { prop_assert!(grown.contains(q)); }
        prop_assert_eq!(Region3::EMPTY.encompass(p), Region3::from_point(p));
    }

    // union is commutative and covers both inputs
    #[test]
    fn union_covers_both(a in arb_region(), b in arb_region()) {
        let u = a.union(b);
        prop_assert_eq!(u, b.union(a));
        prop_assert!(u.contains(a.min) && u.contains(a.max));
        prop_assert!(u.contains(b.min) && u.contains(b.max));
        prop_assert_eq!(a.union(Region3::EMPTY), a);
    }

    // intersection agrees with contains on both inputs
    #[test]
    fn intersect_agrees_with_contains(a in arb_region(), b in arb_region(), p in arb_pos()) {
        let i = a.intersect(b);
        prop_assert_eq!(i.contains(p), a.contains(p) && b.contains(p));
        prop_assert_eq!(a.intersects(&b), !i.is_empty());
    }

    // expand(n) then membership matches per-axis distance
    #[test]
    fn expand_matches_distance(p in arb_pos(), q in arb_pos(), n in 0i32..=20) {
        let r = Region3::from_point(p).expand(n);
        let d = (q.x - p.x).abs().max((q.y - p.y).abs()).max((q.z - p.z).abs());
        prop_assert_eq!(r.contains(q), d <= n);
    }
}
