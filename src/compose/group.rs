//! Reusable shader node groups and their placement in the open editor tree.

use super::{image_node, GraphShape, RoleImages};
use crate::error::{MaterializeError, Result};
use crate::graph::{GraphBuilder, NodeParams, PanelAttrs, SocketAttrs};
use crate::host::{
    unique_name, NodeKind, NodeTree, SceneDb, SocketDirection, SocketSubtype, SocketType,
    SocketValue, TreeRef,
};
use crate::types::MapRole;
use glam::Vec4;

/// Output sockets per shape, in interface order.
fn outputs(shape: GraphShape) -> &'static [(&'static str, SocketType)] {
    use SocketType::*;
    match shape {
        GraphShape::DecalGroup => &[
            ("Base Color", Color),
            ("Roughness", Float),
            ("Alpha", Float),
            ("Normal", Vector),
            ("Displacement", Vector),
            ("Opacity", Float),
        ],
        GraphShape::AtlasGroup => &[
            ("Base Color", Color),
            ("Metallic", Float),
            ("Roughness", Float),
            ("Alpha", Float),
            ("Normal", Vector),
            ("Displacement", Vector),
            ("Translucency", Color),
        ],
        GraphShape::ImperfectionGroup => &[("Roughness", Float), ("Gloss", Float), ("Mask", Float)],
        _ => &[
            ("Base Color", Color),
            ("Metallic", Float),
            ("Roughness", Float),
            ("Alpha", Float),
            ("Normal", Vector),
            ("Displacement", Vector),
        ],
    }
}

fn has_metallic(shape: GraphShape) -> bool {
    matches!(shape, GraphShape::SurfaceGroup | GraphShape::AtlasGroup)
}

fn float_input(description: &str, default: f32, min: f32, max: f32) -> SocketAttrs {
    SocketAttrs::new()
        .description(description)
        .default_value(SocketValue::Float(default))
        .range(min, max)
}

fn interface(builder: &GraphBuilder, tree: &mut NodeTree, shape: GraphShape) {
    builder.ensure_socket(
        tree,
        SocketDirection::In,
        "Vector",
        SocketType::Vector,
        &SocketAttrs::new().description("Texture coordinates").hide_value(),
        None,
    );
    if shape != GraphShape::ImperfectionGroup {
        if has_metallic(shape) {
            let surface = builder.ensure_panel(tree, "Surface", &PanelAttrs::default());
            builder.ensure_socket(
                tree,
                SocketDirection::In,
                "Metallic",
                SocketType::Float,
                &float_input("Metallic factor", 0.0, 0.0, 1.0).subtype(SocketSubtype::Factor),
                surface.as_deref(),
            );
        }
        let normal = builder.ensure_panel(tree, "Normal", &PanelAttrs::default());
        builder.ensure_socket(
            tree,
            SocketDirection::In,
            "Normal Strength",
            SocketType::Float,
            &float_input("Normal map strength", 1.0, 0.0, 10.0),
            normal.as_deref(),
        );
        let displacement = builder.ensure_panel(
            tree,
            "Displacement",
            &PanelAttrs {
                description: String::new(),
                default_closed: true,
            },
        );
        builder.ensure_socket(
            tree,
            SocketDirection::In,
            "Displacement Midlevel",
            SocketType::Float,
            &float_input("Height treated as no displacement", 0.5, 0.0, 1.0),
            displacement.as_deref(),
        );
        builder.ensure_socket(
            tree,
            SocketDirection::In,
            "Displacement Scale",
            SocketType::Float,
            &float_input("Displacement strength", 0.1, 0.0, 10.0),
            displacement.as_deref(),
        );
    }
    for (name, socket_type) in outputs(shape) {
        builder.ensure_socket(tree, SocketDirection::Out, name, *socket_type, &SocketAttrs::new(), None);
    }
}

pub(crate) fn build(builder: &GraphBuilder, tree: &mut NodeTree, shape: GraphShape, images: &RoleImages) {
    interface(builder, tree, shape);
    builder.ensure_node(tree, "Group Input", NodeKind::GroupInput, &NodeParams::at(-1500.0, 0.0));
    builder.ensure_node(tree, "Mapping", NodeKind::Mapping, &NodeParams::at(-1250.0, 0.0));
    builder.ensure_node(tree, "Group Output", NodeKind::GroupOutput, &NodeParams::at(400.0, 0.0));
    builder.link(tree, ("Group Input", "Vector"), ("Mapping", "Vector"));
    for (row, role) in shape.roles().iter().enumerate() {
        image_node(builder, tree, images, *role, row, ("Mapping", "Vector"));
    }

    if shape == GraphShape::ImperfectionGroup {
        for role in [MapRole::Roughness, MapRole::Gloss, MapRole::Mask] {
            builder.link(tree, (role.node_name(), "Color"), ("Group Output", role.suffix()));
        }
        return;
    }

    builder.ensure_node(tree, "Gamma", NodeKind::Gamma, &NodeParams::at(-600.0, 450.0));
    builder.ensure_node(
        tree,
        "Mix AO",
        NodeKind::Mix,
        &NodeParams::at(-400.0, 350.0)
            .label("Albedo x AO")
            .prop("data_type", "RGBA")
            .prop("blend_type", "MULTIPLY")
            .input("Factor", SocketValue::Float(1.0))
            .input("B", SocketValue::Color(Vec4::ONE)),
    );
    builder.ensure_node(tree, "Normal Map", NodeKind::NormalMap, &NodeParams::at(-400.0, -500.0));
    builder.ensure_node(tree, "Displacement Map", NodeKind::Displacement, &NodeParams::at(-400.0, -800.0));

    builder.link(tree, ("albedo", "Color"), ("Gamma", "Color"));
    builder.link(tree, ("Gamma", "Color"), ("Mix AO", "A"));
    builder.link(tree, ("ao", "Color"), ("Mix AO", "B"));
    builder.link(tree, ("Mix AO", "Result"), ("Group Output", "Base Color"));
    builder.link(tree, ("roughness", "Color"), ("Group Output", "Roughness"));
    builder.link(tree, ("normal", "Color"), ("Normal Map", "Color"));
    builder.link(tree, ("Group Input", "Normal Strength"), ("Normal Map", "Strength"));
    builder.link(tree, ("Normal Map", "Normal"), ("Group Output", "Normal"));
    builder.link(tree, ("displacement", "Color"), ("Displacement Map", "Height"));
    builder.link(tree, ("Group Input", "Displacement Midlevel"), ("Displacement Map", "Midlevel"));
    builder.link(tree, ("Group Input", "Displacement Scale"), ("Displacement Map", "Scale"));
    builder.link(tree, ("Displacement Map", "Displacement"), ("Group Output", "Displacement"));

    if has_metallic(shape) {
        builder.ensure_node(
            tree,
            "Metallic Factor",
            NodeKind::Math,
            &NodeParams::at(-400.0, 50.0).prop("operation", "MULTIPLY"),
        );
        builder.link(tree, ("metallic", "Color"), ("Metallic Factor", "Value"));
        builder.link(tree, ("Group Input", "Metallic"), ("Metallic Factor", "Value_001"));
        builder.link(tree, ("Metallic Factor", "Value"), ("Group Output", "Metallic"));
    }

    if shape == GraphShape::DecalGroup {
        builder.link(tree, ("albedo", "Alpha"), ("Group Output", "Alpha"));
        builder.link(tree, ("opacity", "Color"), ("Group Output", "Opacity"));
    } else {
        builder.link(tree, ("opacity", "Color"), ("Group Output", "Alpha"));
    }
    if shape == GraphShape::AtlasGroup {
        builder.link(tree, ("translucency", "Color"), ("Group Output", "Translucency"));
    }
}

/// Name of the texture coordinate node feeding a placed group.
pub fn uv_node_name(instance: &str) -> String {
    format!("{} UV", instance)
}

/// Check that `group` may be placed into the tree open in the editor.
///
/// Fails with `InvalidNodeTree` when no editor is open or placement would
/// nest the group in itself, and with `NameConflict` when the editor tree
/// already holds an instance of it.
pub fn check_placement(scene: &SceneDb, group: &str) -> Result<()> {
    let Some(editor) = &scene.editor else {
        return Err(MaterializeError::InvalidNodeTree("no node editor is open".into()));
    };
    let Some(target) = scene.tree(editor) else {
        return Err(MaterializeError::InvalidNodeTree(format!("editor tree {:?} not found", editor)));
    };
    if let TreeRef::NodeGroup(name) = editor {
        if name == group || group_contains(scene, group, name) {
            return Err(MaterializeError::InvalidNodeTree(format!(
                "{} cannot be placed inside itself",
                group
            )));
        }
    }
    if target
        .nodes_of_kind(NodeKind::Group)
        .any(|n| n.node_tree.as_deref() == Some(group))
    {
        return Err(MaterializeError::NameConflict(format!(
            "{} is already placed in {}",
            group, target.name
        )));
    }
    Ok(())
}

/// Whether `group` instances `needle`, directly or through nested groups.
fn group_contains(scene: &SceneDb, group: &str, needle: &str) -> bool {
    let mut stack = vec![group.to_string()];
    let mut seen = std::collections::HashSet::new();
    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        let Some(tree) = scene.node_groups.get(&current) else {
            continue;
        };
        for nested in tree.nodes_of_kind(NodeKind::Group).filter_map(|n| n.node_tree.clone()) {
            if nested == needle {
                return true;
            }
            stack.push(nested);
        }
    }
    false
}

/// Add an instance of `group` plus a UV coordinate node to the editor tree.
///
/// Returns the instance node name.
pub fn place_group_instance(scene: &mut SceneDb, builder: &GraphBuilder, group: &str) -> Result<String> {
    check_placement(scene, group)?;
    let group_tree = scene
        .node_groups
        .get(group)
        .cloned()
        .ok_or_else(|| MaterializeError::InvalidNodeTree(format!("node group {} not found", group)))?;
    let editor = scene
        .editor
        .clone()
        .ok_or_else(|| MaterializeError::InvalidNodeTree("no node editor is open".into()))?;
    let target = scene
        .tree_mut(&editor)
        .ok_or_else(|| MaterializeError::InvalidNodeTree(format!("editor tree {:?} not found", editor)))?;
    if target.kind != group_tree.kind {
        return Err(MaterializeError::InvalidNodeTree(format!(
            "{} is a {:?} group; {} is a {:?} tree",
            group, group_tree.kind, target.name, target.kind
        )));
    }

    let instance = unique_name(group, |n| target.node(n).is_some());
    let uv = uv_node_name(&instance);
    builder.ensure_group_instance(target, &instance, &group_tree, &NodeParams::at(0.0, 0.0).label(group));
    builder.ensure_node(target, &uv, NodeKind::TexCoord, &NodeParams::at(-250.0, 0.0));
    builder.link(target, (&uv, "UV"), (&instance, "Vector"));
    log::info!("Placed {} in {}", group, target.name);
    Ok(instance)
}
