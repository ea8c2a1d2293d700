use std::collections::HashSet;

use approx::assert_relative_eq;
use bsp_region::{BspTree, BuildConfig, ElementId, Node, SplitType};
use geometry::{Aabb, ray::Ray};
use glam::Vec2;
use proptest::prelude::*;

fn aabb(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Aabb {
    Aabb::new([min_x, min_y], [max_x, max_y]).unwrap()
}

fn brute_region(elements: &[Aabb], target: &Aabb) -> Vec<ElementId> {
    (0..)
        .map(ElementId)
        .zip(elements)
        .filter(|(_, aabb)| aabb.collides(target))
        .map(|(id, _)| id)
        .collect()
}

fn brute_point(elements: &[Aabb], point: Vec2) -> Vec<ElementId> {
    (0..)
        .map(ElementId)
        .zip(elements)
        .filter(|(_, aabb)| aabb.contains_point(point))
        .map(|(id, _)| id)
        .collect()
}

fn brute_ray(elements: &[Aabb], ray: &Ray) -> Option<(ElementId, f32)> {
    (0..)
        .map(ElementId)
        .zip(elements)
        .filter_map(|(id, aabb)| aabb.intersect_ray(ray).map(|t| (t, id)))
        .min()
        .map(|(t, id)| (id, t.into_inner()))
}

fn brute_closest(elements: &[Aabb], point: Vec2) -> Option<(ElementId, f64)> {
    (0..)
        .map(ElementId)
        .zip(elements)
        .map(|(id, aabb)| (aabb.dist2(point), id))
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(dist2, id)| (id, dist2))
}

#[test]
fn two_separated_boxes() {
    let first = aabb(0.0, 0.0, 1.0, 1.0);
    let second = aabb(5.0, 5.0, 6.0, 6.0);
    let tree = BspTree::build_with(vec![first, second], 1, 8).unwrap();

    let Node::Split(split, left, right) = tree.root() else {
        panic!("expected a split root");
    };
    assert_eq!(split.split_type, SplitType::Vertical);
    assert_eq!(left.as_ref(), &Node::Leaf(vec![ElementId(0)]));
    assert_eq!(right.as_ref(), &Node::Leaf(vec![ElementId(1)]));

    assert_eq!(tree.query_point(Vec2::new(0.5, 0.5)), vec![first]);
    assert_eq!(tree.query_point(Vec2::new(5.5, 5.5)), vec![second]);
    assert!(tree.query_point(Vec2::new(10.0, 10.0)).is_empty());
    assert!(tree.query_point(Vec2::new(3.0, 3.0)).is_empty());
}

#[test]
fn touching_boxes_overlap() {
    let left = aabb(0.0, 0.0, 1.0, 1.0);
    let right = aabb(1.0, 0.0, 2.0, 1.0);
    let corner = aabb(2.0, 1.0, 3.0, 2.0);
    let tree = BspTree::build_with(vec![left, right, corner], 1, 8).unwrap();

    assert_eq!(tree.query_region_ids(&left), vec![ElementId(0), ElementId(1)]);
    assert_eq!(tree.query_region_ids(&corner), vec![ElementId(1), ElementId(2)]);
    assert_eq!(tree.query_point(Vec2::new(2.0, 1.0)), vec![right, corner]);
}

#[test]
fn degenerate_boxes() {
    let point = aabb(3.0, 3.0, 3.0, 3.0);
    let segment = aabb(0.0, 2.0, 10.0, 2.0);
    let tree = BspTree::build_with(vec![point, segment, aabb(8.0, 8.0, 9.0, 9.0)], 1, 8).unwrap();

    assert_eq!(tree.query_point(Vec2::new(3.0, 3.0)), vec![point]);
    assert_eq!(tree.query_point(Vec2::new(7.0, 2.0)), vec![segment]);
    assert!(tree.query_point(Vec2::new(3.0, 3.000_1)).is_empty());

    let probe = aabb(2.0, 2.0, 3.0, 3.0);
    assert_eq!(tree.query_region(&probe), vec![point, segment]);
}

#[test]
fn duplicate_inputs_are_distinct_elements() {
    let shared = aabb(0.0, 0.0, 1.0, 1.0);
    let tree = BspTree::build_with(vec![shared, shared, aabb(4.0, 4.0, 5.0, 5.0)], 1, 8).unwrap();

    assert_eq!(tree.query_point_ids(Vec2::new(0.5, 0.5)), vec![
        ElementId(0),
        ElementId(1)
    ]);
}

#[test]
fn empty_tree_answers_nothing() {
    let tree = BspTree::build(Vec::new(), &BuildConfig::default()).unwrap();
    let everything = aabb(-1e30, -1e30, 1e30, 1e30);

    assert!(tree.query_region(&everything).is_empty());
    assert!(tree.query_point(Vec2::ZERO).is_empty());
    assert!(tree.get_closest(Vec2::ZERO).is_none());
    assert!(tree.candidates(&everything).next().is_none());
}

#[test]
fn known_ray_case() {
    let elements = vec![
        aabb(1.0, -0.5, 2.0, 0.5),
        aabb(3.0, -1.0, 4.0, 1.0),
        aabb(5.0, -0.5, 6.0, 0.5),
    ];
    let tree = BspTree::build_with(elements, 1, 8).unwrap();

    let ray = Ray::new(Vec2::ZERO, Vec2::X);
    let (id, _, t) = tree.first_ray_collision(&ray).unwrap();
    assert_eq!(id, ElementId(0));
    assert_relative_eq!(t.into_inner(), 1.0);

    let from_inside = Ray::new(Vec2::new(3.5, 0.0), Vec2::X);
    let (id, _, t) = tree.first_ray_collision(&from_inside).unwrap();
    assert_eq!(id, ElementId(1));
    assert_relative_eq!(t.into_inner(), 0.0);
}

#[test]
fn large_build_is_deterministic() {
    fastrand::seed(7);
    let elements = bsp_region::random_elements(5_000, 500.0);
    let config = BuildConfig::new(8, 24);

    let first = BspTree::build(elements.clone(), &config).unwrap();
    let second = BspTree::build(elements, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.dump().to_string(), second.dump().to_string());
}

fn coordinate() -> impl Strategy<Value = f32> {
    // whole numbers make touching and shared edges common
    prop_oneof![(-20i16..20).prop_map(f32::from), -20.0..20.0f32]
}

fn extent() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), (0i16..6).prop_map(f32::from), 0.0..6.0f32]
}

fn arb_aabb() -> impl Strategy<Value = Aabb> {
    (coordinate(), coordinate(), extent(), extent())
        .prop_map(|(x, y, w, h)| aabb(x, y, x + w, y + h))
}

fn arb_tree() -> impl Strategy<Value = (Vec<Aabb>, BspTree, BuildConfig)> {
    (prop::collection::vec(arb_aabb(), 0..120), 1usize..8, 0usize..12).prop_map(
        |(elements, leaf_capacity, max_depth)| {
            let config = BuildConfig::new(leaf_capacity, max_depth);
            let tree = BspTree::build(elements.clone(), &config).unwrap();
            (elements, tree, config)
        },
    )
}

fn arb_point() -> impl Strategy<Value = Vec2> {
    (coordinate(), coordinate()).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn region_matches_brute_force((elements, tree, _) in arb_tree(), target in arb_aabb()) {
        prop_assert_eq!(tree.query_region_ids(&target), brute_region(&elements, &target));
    }

    #[test]
    fn point_matches_brute_force((elements, tree, _) in arb_tree(), point in arb_point()) {
        prop_assert_eq!(tree.query_point_ids(point), brute_point(&elements, point));
    }

    #[test]
    fn every_box_finds_itself((elements, tree, _) in arb_tree()) {
        for (index, aabb) in elements.iter().enumerate() {
            let id = ElementId(u32::try_from(index).unwrap());
            prop_assert!(tree.query_region_ids(aabb).contains(&id));
            prop_assert!(tree.query_point_ids(aabb.mid()).contains(&id));
        }
    }

    #[test]
    fn leaves_cover_every_box((elements, tree, _) in arb_tree()) {
        let stored: HashSet<ElementId> = tree.leaves().flatten().copied().collect();
        prop_assert_eq!(stored.len(), elements.len());
    }

    #[test]
    fn oversized_leaves_are_reported((_, tree, config) in arb_tree()) {
        let oversized = tree
            .leaves()
            .filter(|leaf| leaf.len() > config.leaf_capacity)
            .count();
        let report = tree.report().unwrap();

        prop_assert_eq!(oversized, report.oversized_leaves());
        prop_assert!(tree.stats().depth <= config.max_depth);
    }

    #[test]
    fn candidates_are_unique((_, tree, _) in arb_tree(), target in arb_aabb()) {
        let ids: Vec<ElementId> = tree.candidates(&target).map(|(id, _)| id).collect();
        let unique: HashSet<ElementId> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn ray_matches_brute_force(
        (elements, tree, _) in arb_tree(),
        origin in arb_point(),
        direction in (-1.0..1.0f32, -1.0..1.0f32).prop_filter("non-zero direction", |(x, y)| x.abs() + y.abs() > 0.1),
    ) {
        let ray = Ray::new(origin, Vec2::new(direction.0, direction.1));

        let found = tree
            .first_ray_collision(&ray)
            .map(|(id, _, t)| (id, t.into_inner()));
        prop_assert_eq!(found, brute_ray(&elements, &ray));
    }

    #[test]
    fn axis_ray_matches_brute_force(
        (elements, tree, _) in arb_tree(),
        origin in arb_point(),
        direction in prop_oneof![Just(Vec2::X), Just(-Vec2::X), Just(Vec2::Y), Just(-Vec2::Y)],
    ) {
        let ray = Ray::new(origin, direction);

        let found = tree
            .first_ray_collision(&ray)
            .map(|(id, _, t)| (id, t.into_inner()));
        prop_assert_eq!(found, brute_ray(&elements, &ray));
    }

    #[test]
    fn closest_matches_brute_force((elements, tree, _) in arb_tree(), point in arb_point()) {
        let found = tree.get_closest(point).map(|(id, _, dist2)| (id, dist2));
        prop_assert_eq!(found, brute_closest(&elements, point));
    }

    #[test]
    fn segment_matches_brute_force((elements, tree, _) in arb_tree(), from in arb_point(), to in arb_point()) {
        let bounds = Aabb::new(from.min(to), from.max(to)).unwrap();
        let ray = Ray::from_points(from, to);

        let expected: Vec<ElementId> = (0..)
            .map(ElementId)
            .zip(&elements)
            .filter(|(_, aabb)| aabb.collides(&bounds))
            .filter(|(_, aabb)| {
                aabb.ray_interval(&ray)
                    .is_some_and(|(t_enter, t_exit)| t_enter <= 1.0 && t_exit >= 0.0)
            })
            .map(|(id, _)| id)
            .collect();

        prop_assert_eq!(tree.query_segment_ids(from, to), expected);
    }
}
