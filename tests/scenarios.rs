//! End-to-end materialization scenarios against on-disk fixtures.

mod common;

use common::Library;
use megascans_materializer::host::{
    BlendMethod, NodeKind, SocketDirection, SocketType, SocketValue, ROOT_COLLECTION,
};
use megascans_materializer::lod::exposed_distances;
use megascans_materializer::{Materializer, SceneDb, Status, TreeRef};
use glam::Vec4;

#[test]
fn surface_as_material() {
    let mut library = Library::new();
    library.add(
        "abcd1234",
        "Red Brick",
        "surface",
        &[
            "abcd1234_4K_Albedo.jpg",
            "abcd1234_4K_Normal.jpg",
            "abcd1234_4K_Roughness.jpg",
        ],
    );
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();

    let report = materializer.import_surface(&mut scene, "abcd1234", false, false);
    assert_eq!(report.status, Status::Info, "{}", report);

    let material = &scene.materials["red_brick_abcd1234"];
    let tree = &material.node_tree;
    for present in ["albedo", "normal", "roughness"] {
        assert!(!tree.node(present).unwrap().mute, "{} muted", present);
    }
    for missing in ["ao", "opacity", "displacement"] {
        assert!(tree.node(missing).unwrap().mute, "{} not muted", missing);
    }

    let mix = tree.node("Mix AO").unwrap();
    assert_eq!(mix.property("blend_type"), Some("MULTIPLY"));
    assert_eq!(mix.input_default("Factor"), Some(&SocketValue::Float(1.0)));
    assert_eq!(mix.input_default("B"), Some(&SocketValue::Color(Vec4::ONE)));

    assert!(tree.has_link("Normal Map", "Normal", "Principled BSDF", "Normal"));
    assert!(tree.has_link("Displacement Map", "Displacement", "Material Output", "Displacement"));
    assert_eq!(material.blend_method, BlendMethod::Opaque);
    assert_eq!(scene.images["abcd1234_4K_Normal.jpg"].colorspace, "Non-Color");
    assert_eq!(scene.images["abcd1234_4K_Albedo.jpg"].colorspace, "sRGB");
}

#[test]
fn surface_applied_to_selection_and_marked() {
    let mut library = Library::new();
    library.add("s1", "Moss", "surface", &["s1_2K_Albedo.jpg"]);
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();
    let cube = scene.add_mesh_object("Cube");
    scene.selected_objects.push(cube.clone());

    let report = materializer.import_surface(&mut scene, "s1", true, true);
    assert_eq!(report.status, Status::Info);
    assert!(report.warnings.is_empty(), "{}", report);
    assert_eq!(scene.meshes["Cube"].materials[0].as_deref(), Some("moss_s1"));
    let mark = scene.materials["moss_s1"].asset.as_ref().unwrap();
    assert_eq!(mark.preview, Some(library.asset_dir("s1").join("s1_Preview.png")));
    assert_eq!(mark.tags, vec!["surface".to_string()]);
}

#[test]
fn asset_with_three_lods_and_lod_group() {
    let mut library = Library::new();
    library.add(
        "a1",
        "Granite Rock",
        "3d",
        &["a1_LOD0.fbx", "a1_LOD2.fbx", "a1_LOD4.fbx", "a1_4K_Albedo.jpg"],
    );
    let config = library.config().with_lods(&[0, 2, 4]).with_lod_group(true);
    let mut materializer = Materializer::new(config);
    let mut scene = SceneDb::default();

    let report = materializer.import_asset(&mut scene, "a1");
    assert_eq!(report.status, Status::Info, "{}", report);

    let collection = &scene.collections["granite_rock_a1"];
    assert_eq!(collection.objects.len(), 3);
    assert!(scene.is_child_collection(ROOT_COLLECTION, "granite_rock_a1"));
    let visible: Vec<&str> = collection
        .objects
        .iter()
        .filter(|o| scene.objects[*o].is_visible())
        .map(|o| o.as_str())
        .collect();
    assert_eq!(visible, vec!["a1_LOD0"]);

    assert_eq!(
        exposed_distances(&scene, "a1_LOD0"),
        vec![("LOD2 Distance".to_string(), 10.0), ("LOD4 Distance".to_string(), 20.0)]
    );
    for object in &collection.objects {
        let mesh = scene.objects[object].data.as_ref().unwrap();
        assert_eq!(scene.meshes[mesh].materials[0].as_deref(), Some("granite_rock_a1"));
    }
}

#[test]
fn plant_with_variants() {
    let mut library = Library::new();
    library.add(
        "p1",
        "Fern",
        "3dplant",
        &["Var1/LOD0.fbx", "Var2/LOD0.fbx", "p1_4K_Albedo.jpg", "p1_4K_Translucency.jpg"],
    );
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();

    let report = materializer.import_plant(&mut scene, "p1");
    assert_eq!(report.status, Status::Info, "{}", report);

    let canonical = &scene.collections["fern_p1"];
    assert_eq!(canonical.children, vec!["fern_p1_Var1", "fern_p1_Var2"]);
    let mut materials = Vec::new();
    for child in &canonical.children {
        let objects = &scene.collections[child].objects;
        assert_eq!(objects.len(), 1);
        let mesh = scene.objects[&objects[0]].data.clone().unwrap();
        materials.push(scene.meshes[&mesh].materials[0].clone());
    }
    assert_eq!(materials[0], materials[1]);
    assert_eq!(materials[0].as_deref(), Some("fern_p1"));
    let tree = &scene.materials["fern_p1"].node_tree;
    assert!(!tree.node("Mix Shader").unwrap().mute);
}

#[test]
fn plant_variants_get_one_lod_group_each() {
    let mut library = Library::new();
    library.add(
        "p1",
        "Fern",
        "3dplant",
        &[
            "Var1/LOD0.fbx",
            "Var1/LOD1.fbx",
            "Var2/LOD0.fbx",
            "Var2/LOD1.fbx",
            "p1_4K_Albedo.jpg",
        ],
    );
    let config = library.config().with_lods(&[0, 1]).with_lod_group(true);
    let mut materializer = Materializer::new(config);
    let mut scene = SceneDb::default();

    let report = materializer.import_plant(&mut scene, "p1");
    assert_eq!(report.status, Status::Info, "{}", report);

    assert_eq!(scene.collections["fern_p1"].children, vec!["fern_p1_Var1", "fern_p1_Var2"]);
    for variant in ["Var1", "Var2"] {
        let collection = format!("fern_p1_{}", variant);
        let base = format!("p1_{}_LOD0", variant);
        let coarse = format!("p1_{}_LOD1", variant);
        let mut objects = scene.collections[&collection].objects.clone();
        objects.sort();
        assert_eq!(objects, vec![base.clone(), coarse.clone()]);
        assert!(scene.node_groups.contains_key(&format!("{}_LODGroup", collection)));

        assert!(scene.objects[&base].is_visible());
        assert!(!scene.objects[&coarse].is_visible());
        assert_eq!(scene.objects[&coarse].parent.as_deref(), Some(base.as_str()));
        assert_eq!(
            exposed_distances(&scene, &base),
            vec![("LOD1 Distance".to_string(), 5.0)]
        );
    }
}

#[test]
fn atlas_group_exposes_translucency() {
    let mut library = Library::new();
    library.add(
        "t1",
        "Ivy Leaves",
        "atlas",
        &[
            "Textures/Atlas/t1_4K_Albedo.jpg",
            "Textures/Atlas/t1_4K_Opacity.jpg",
            "Textures/Atlas/t1_4K_Translucency.jpg",
        ],
    );
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();
    scene.ensure_material("T1");
    scene.editor = Some(TreeRef::Material("T1".to_string()));

    let report = materializer.add_atlas_group(&mut scene, "t1");
    assert_eq!(report.status, Status::Info, "{}", report);

    let group = &scene.node_groups["ivy_leaves_t1"];
    let outputs: Vec<&str> = group
        .interface
        .sockets(SocketDirection::Out)
        .into_iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(
        outputs,
        vec!["Base Color", "Metallic", "Roughness", "Alpha", "Normal", "Displacement", "Translucency"]
    );
    assert_eq!(
        group.interface.socket(SocketDirection::Out, "Translucency").unwrap().socket_type,
        SocketType::Color
    );
    assert!(group.interface.socket(SocketDirection::In, "Metallic").is_some());
    assert!(group.has_link("translucency", "Color", "Group Output", "Translucency"));
    assert!(group.has_link("opacity", "Color", "Group Output", "Alpha"));
    assert!(!group.node("translucency").unwrap().mute);
    assert!(group.node("normal").unwrap().mute);
    assert_eq!(scene.images["t1_4K_Translucency.jpg"].colorspace, "sRGB");

    let editor = &scene.materials["T1"].node_tree;
    assert_eq!(editor.nodes_of_kind(NodeKind::Group).count(), 1);
}

#[test]
fn brush_as_texture_mask() {
    let mut library = Library::new();
    library.add("b1", "Rock Chips", "brush", &["b1_4K_Brush.jpg"]);
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();
    scene.add_brush("TexDraw");

    let report = materializer.add_brush_texture(&mut scene, "b1", true, true);
    assert_eq!(report.status, Status::Info, "{}", report);

    let texture = &scene.textures["rock_chips_b1"];
    assert_eq!(texture.image.as_deref(), Some("b1_4K_Brush.jpg"));
    let brush = &scene.brushes["TexDraw"];
    assert_eq!(brush.mask_texture.as_deref(), Some("rock_chips_b1"));
    assert_eq!(brush.texture, None);
}

#[test]
fn brush_without_active_brush_warns() {
    let mut library = Library::new();
    library.add("b1", "Rock Chips", "brush", &["b1_4K_Brush.jpg"]);
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();

    let report = materializer.add_brush_texture(&mut scene, "b1", true, false);
    assert_eq!(report.status, Status::Info);
    assert_eq!(report.warnings.len(), 1);
    assert!(scene.textures.contains_key("rock_chips_b1"));
}

#[test]
fn repeated_surface_group_add() {
    let mut library = Library::new();
    library.add("g1", "Old Plaster", "surface", &["g1_4K_Albedo.jpg", "g1_4K_Normal.jpg"]);
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();
    scene.ensure_material("T1");
    scene.editor = Some(TreeRef::Material("T1".to_string()));

    let first = materializer.add_surface_group(&mut scene, "g1");
    assert_eq!(first.status, Status::Info, "{}", first);
    let after_first = scene.clone();

    let second = materializer.add_surface_group(&mut scene, "g1");
    assert_eq!(second.status, Status::Warning);
    assert_eq!(scene, after_first);

    assert_eq!(scene.node_groups.len(), 1);
    assert!(scene.node_groups.contains_key("old_plaster_g1"));
    let editor = &scene.materials["T1"].node_tree;
    assert_eq!(editor.nodes_of_kind(NodeKind::Group).count(), 1);
    assert!(editor.has_link("old_plaster_g1 UV", "UV", "old_plaster_g1", "Vector"));
}

#[test]
fn group_add_into_its_own_tree_is_refused() {
    let mut library = Library::new();
    library.add("g1", "Old Plaster", "surface", &["g1_4K_Albedo.jpg"]);
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();
    scene.ensure_material("T1");
    scene.editor = Some(TreeRef::Material("T1".to_string()));
    assert_eq!(materializer.add_surface_group(&mut scene, "g1").status, Status::Info);

    scene.editor = Some(TreeRef::NodeGroup("old_plaster_g1".to_string()));
    let before = scene.clone();
    let report = materializer.add_surface_group(&mut scene, "g1");
    assert_eq!(report.status, Status::Cancelled);
    assert_eq!(scene, before);

    scene.editor = None;
    assert_eq!(materializer.add_surface_group(&mut scene, "g1").status, Status::Cancelled);
}

#[test]
fn group_for_wrong_asset_type_is_refused() {
    let mut library = Library::new();
    library.add("d1", "Leak", "decal", &["d1_4K_Albedo.jpg", "d1_4K_Opacity.jpg"]);
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();
    scene.ensure_material("T1");
    scene.editor = Some(TreeRef::Material("T1".to_string()));

    assert_eq!(materializer.add_surface_group(&mut scene, "d1").status, Status::Cancelled);
    let report = materializer.add_decal_group(&mut scene, "d1");
    assert_eq!(report.status, Status::Info, "{}", report);
    let group = &scene.node_groups["leak_d1"];
    assert!(group.has_link("opacity", "Color", "Group Output", "Opacity"));
}

#[test]
fn missing_lod0_cancels_without_mutation() {
    let mut library = Library::new();
    library.add("m1", "Log", "3d", &["m1_LOD1.fbx", "m1_4K_Albedo.jpg"]);
    let config = library.config().with_lods(&[0, 1]);
    let mut materializer = Materializer::new(config);
    let mut scene = SceneDb::default();
    let before = scene.clone();

    let report = materializer.import_asset(&mut scene, "m1");
    assert_eq!(report.status, Status::Cancelled);
    assert_eq!(report.message, "LOD0 doesn't exist");
    assert!(!scene.collections.contains_key("log_m1"));
    assert!(scene.materials.is_empty());
    assert_eq!(scene, before);
}

#[test]
fn unknown_asset_is_cancelled() {
    let mut library = Library::new();
    library.add("s1", "Moss", "surface", &["s1_2K_Albedo.jpg"]);
    let mut materializer = Materializer::new(library.config());
    let mut scene = SceneDb::default();
    let report = materializer.import_surface(&mut scene, "nope", false, false);
    assert_eq!(report.status, Status::Cancelled);
    assert!(report.message.contains("nope"));
}
