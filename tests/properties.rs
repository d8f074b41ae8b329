//! Cross-cutting guarantees: idempotence, stability, monotonicity, caching.

mod common;

use common::Library;
use megascans_materializer::host::{NodeTree, ROOT_COLLECTION};
use megascans_materializer::lod::evaluate;
use megascans_materializer::{
    AssetType, MapRole, Materializer, Mode, ResolutionTier, SceneDb, Status, TextureResolver,
    TreeRef,
};
use std::collections::BTreeSet;
use std::fs::File;
use std::time::{Duration, SystemTime};

fn full_library() -> Library {
    let mut library = Library::new();
    library.add(
        "a1",
        "Granite Rock",
        "3d",
        &["a1_LOD0.fbx", "a1_LOD1.fbx", "a1_LOD3.fbx", "a1_4K_Albedo.jpg", "a1_4K_Normal.jpg"],
    );
    library.add("p1", "Fern", "3dplant", &["Var1/LOD0.fbx", "Var2/LOD0.fbx", "p1_2K_Albedo.jpg"]);
    library.add("s1", "Red Brick", "surface", &["s1_4K_Albedo.jpg", "s1_4K_Opacity.jpg"]);
    library.add("b1", "Chips", "brush", &["b1_1K_Brush.jpg"]);
    library.add("d1", "Leak", "decal", &["d1_4K_Albedo.jpg"]);
    library.add("t1", "Leaves", "atlas", &["t1_4K_Albedo.jpg", "t1_4K_Translucency.jpg"]);
    library.add("i1", "Smudges", "imperfection", &["i1_4K_Roughness.jpg"]);
    library
}

fn host_scene() -> SceneDb {
    let mut scene = SceneDb::default();
    scene.ensure_material("Host");
    scene.editor = Some(TreeRef::Material("Host".to_string()));
    scene.add_brush("TexDraw");
    let cube = scene.add_mesh_object("Cube");
    scene.link_object(ROOT_COLLECTION, &cube);
    scene.selected_objects.push(cube);
    scene
}

#[test]
fn materializing_twice_equals_once() {
    let library = full_library();
    let cases = [
        ("a1", Mode::Import),
        ("p1", Mode::Plant),
        ("s1", Mode::Surface),
        ("b1", Mode::Brush),
        ("s1", Mode::SurfaceGroup),
        ("d1", Mode::DecalGroup),
        ("t1", Mode::AtlasGroup),
        ("i1", Mode::ImperfectionGroup),
    ];
    for (id, mode) in cases {
        let config = library.config().with_lod_group(true);
        let mut materializer = Materializer::new(config);
        let mut scene = host_scene();

        let first = materializer.materialize(&mut scene, id, mode);
        assert_eq!(first.status, Status::Info, "{} {}: {}", id, mode, first);
        let once = scene.clone();
        let second = materializer.materialize(&mut scene, id, mode);
        assert_ne!(second.status, Status::Cancelled, "{} {}: {}", id, mode, second);
        assert_eq!(scene, once, "{} {} changed the scene on rerun", id, mode);
    }
}

fn shape_of(tree: &NodeTree) -> (BTreeSet<String>, BTreeSet<(String, String, String, String)>) {
    let nodes = tree.nodes.iter().map(|n| n.name.clone()).collect();
    let links = tree
        .links
        .iter()
        .map(|l| {
            (
                l.from_node.clone(),
                l.from_socket.clone(),
                l.to_node.clone(),
                l.to_socket.clone(),
            )
        })
        .collect();
    (nodes, links)
}

#[test]
fn missing_texture_only_mutes_its_node() {
    let files = [
        "s1_4K_Albedo.jpg",
        "s1_4K_AO.jpg",
        "s1_4K_Roughness.jpg",
        "s1_4K_Metalness.jpg",
        "s1_4K_Opacity.jpg",
        "s1_4K_Normal.jpg",
        "s1_4K_Displacement.jpg",
    ];
    let mut complete = Library::new();
    complete.add("s1", "Red Brick", "surface", &files);
    let mut partial = Library::new();
    partial.add("s1", "Red Brick", "surface", &files[1..]);

    let mut full_scene = SceneDb::default();
    let report = Materializer::new(complete.config()).import_surface(&mut full_scene, "s1", false, false);
    assert_eq!(report.status, Status::Info);
    let mut partial_scene = SceneDb::default();
    let report = Materializer::new(partial.config()).import_surface(&mut partial_scene, "s1", false, false);
    assert_eq!(report.status, Status::Info);

    let full = &full_scene.materials["red_brick_s1"].node_tree;
    let missing = &partial_scene.materials["red_brick_s1"].node_tree;
    assert_eq!(shape_of(full), shape_of(missing));
    for node in &full.nodes {
        let other = missing.node(&node.name).unwrap();
        assert_eq!(node.mute != other.mute, node.name == "albedo", "{}", node.name);
        assert_eq!(node.inputs, other.inputs, "{}", node.name);
    }
}

#[test]
fn lod_switch_selects_coarsest_passed_threshold() {
    let mut library = Library::new();
    library.add(
        "a1",
        "Granite Rock",
        "3d",
        &["a1_LOD0.fbx", "a1_LOD1.fbx", "a1_LOD2.fbx", "a1_LOD5.fbx", "a1_4K_Albedo.jpg"],
    );
    let config = library.config().with_lods(&[0, 1, 2, 5]).with_lod_group(true);
    let mut materializer = Materializer::new(config);
    let mut scene = SceneDb::default();
    assert_eq!(materializer.import_asset(&mut scene, "a1").status, Status::Info);

    let modifier = scene.objects["a1_LOD0"].modifier("LODGroup").unwrap();
    let tree = &scene.node_groups[modifier.node_group.as_deref().unwrap()];
    let thresholds = [(1u8, 5.0f32), (2, 10.0), (5, 25.0)];
    for step in 0..120 {
        let distance = step as f32 * 0.25;
        let expected = thresholds
            .iter()
            .filter(|(_, t)| *t < distance)
            .last()
            .map(|(lod, _)| format!("a1_LOD{}", lod));
        assert_eq!(evaluate(tree, &modifier.inputs, distance), expected, "d = {}", distance);
    }
}

#[test]
fn tier_falls_back_to_available_file() {
    let mut library = Library::new();
    let dir = library.add("s1", "Red Brick", "surface", &["s1_2K_Albedo.jpg"]);
    let resolver = TextureResolver::new(ResolutionTier::K8);
    assert_eq!(resolver.resolve(&dir, MapRole::Albedo).as_deref(), Some("s1_2K_Albedo"));
    assert_eq!(
        ResolutionTier::K4.search_order(),
        [ResolutionTier::K4, ResolutionTier::K8, ResolutionTier::K2, ResolutionTier::K1]
    );
}

#[test]
fn touching_descriptor_rebuilds_index() {
    let mut library = Library::new();
    library.add("s1", "Red Brick", "surface", &["s1_2K_Albedo.jpg"]);
    let mut materializer = Materializer::new(library.config());
    let listing = materializer.list(AssetType::Surface, None, None, None, 1);
    assert_eq!(listing.total, 1);
    materializer.list(AssetType::Surface, None, None, Some("brick"), 1);
    assert_eq!(materializer.index_rebuilds(), 1);

    library.add("s2", "Wet Sand", "surface", &["s2_2K_Albedo.jpg"]);
    let path = library.write();
    let later = SystemTime::now() + Duration::from_secs(10);
    File::options().write(true).open(&path).unwrap().set_modified(later).unwrap();

    let listing = materializer.list(AssetType::Surface, None, None, None, 1);
    assert_eq!(listing.total, 2);
    assert_eq!(materializer.index_rebuilds(), 2);
    let found = materializer.list(AssetType::Surface, None, None, Some("SAND"), 1);
    assert_eq!(found.assets.len(), 1);
    assert_eq!(found.assets[0].id, "s2");
}

#[test]
fn one_conflicting_part_is_skipped_alone() {
    let mut library = Library::new();
    library.add(
        "c1",
        "Ruins",
        "3d",
        &[
            "c1_LOD0_a.fbx",
            "c1_LOD0_b.fbx",
            "c1_LOD0_c.fbx",
            "c1_LOD0_d.fbx",
            "c1_4K_Albedo.jpg",
        ],
    );
    let mut materializer = Materializer::new(library.config().with_lods(&[0]));
    let mut scene = SceneDb::default();
    scene.add_mesh_object("c1_LOD0_b");

    let report = materializer.import_asset(&mut scene, "c1");
    assert_eq!(report.status, Status::Info, "{}", report);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("c1_LOD0_b"));
    for part in ["a", "c", "d"] {
        let object = format!("c1_LOD0_{}", part);
        let mesh = scene.objects[&object].data.clone().unwrap();
        assert_eq!(scene.meshes[&mesh].materials[0].as_deref(), Some("ruins_c1"));
    }
    assert_eq!(scene.meshes_containing("c1_LOD0_b").len(), 1);
}

#[test]
fn listing_paginates_and_clamps() {
    let mut library = Library::new();
    for i in 0..5 {
        let id = format!("s{}", i);
        library.add(&id, "Tile", "surface", &[]);
    }
    let mut config = library.config();
    config.preview_limit = 2;
    let mut materializer = Materializer::new(config);

    let page = materializer.list(AssetType::Surface, Some("test"), Some("fixture"), None, 3);
    assert_eq!((page.page, page.total_pages, page.assets.len()), (3, 3, 1));
    let clamped = materializer.list(AssetType::Surface, None, None, None, 99);
    assert_eq!(clamped.page, 3);
    let empty = materializer.list(AssetType::Decal, None, None, None, 1);
    assert_eq!((empty.total, empty.total_pages), (0, 1));
    assert!(!empty.is_missing());
}
