//! Surface and plant materials.

use super::{image_node, is_present, GraphShape, RoleImages};
use crate::graph::{GraphBuilder, NodeParams};
use crate::host::{BlendMethod, Material, NodeKind, NodeTree, SocketValue};
use crate::types::MapRole;
use glam::Vec4;

pub(crate) fn build(builder: &GraphBuilder, material: &mut Material, shape: GraphShape, images: &RoleImages) {
    let tree = &mut material.node_tree;
    builder.ensure_node(tree, "Texture Coordinate", NodeKind::TexCoord, &NodeParams::at(-1500.0, 0.0));
    builder.ensure_node(tree, "Mapping", NodeKind::Mapping, &NodeParams::at(-1250.0, 0.0));
    builder.link(tree, ("Texture Coordinate", "UV"), ("Mapping", "Vector"));
    for (row, role) in shape.roles().iter().enumerate() {
        image_node(builder, tree, images, *role, row, ("Mapping", "Vector"));
    }

    shading_spine(builder, tree);
    if shape == GraphShape::PlantMaterial {
        translucency_branch(builder, tree, images);
    } else {
        builder.link(tree, ("Principled BSDF", "BSDF"), ("Material Output", "Surface"));
    }

    material.blend_method = if is_present(images, MapRole::Opacity) {
        BlendMethod::AlphaHashed
    } else {
        BlendMethod::Opaque
    };
}

/// Albedo/AO through Gamma and Mix into the principled shader, plus normal and displacement.
fn shading_spine(builder: &GraphBuilder, tree: &mut NodeTree) {
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
    builder.ensure_node(tree, "Principled BSDF", NodeKind::PrincipledBsdf, &NodeParams::at(0.0, 200.0));
    builder.ensure_node(tree, "Normal Map", NodeKind::NormalMap, &NodeParams::at(-400.0, -500.0));
    builder.ensure_node(
        tree,
        "Displacement Map",
        NodeKind::Displacement,
        &NodeParams::at(-400.0, -800.0)
            .input("Midlevel", SocketValue::Float(0.5))
            .input("Scale", SocketValue::Float(0.1)),
    );
    builder.ensure_node(tree, "Material Output", NodeKind::MaterialOutput, &NodeParams::at(500.0, 0.0));

    builder.link(tree, ("albedo", "Color"), ("Gamma", "Color"));
    builder.link(tree, ("Gamma", "Color"), ("Mix AO", "A"));
    builder.link(tree, ("ao", "Color"), ("Mix AO", "B"));
    builder.link(tree, ("Mix AO", "Result"), ("Principled BSDF", "Base Color"));
    builder.link(tree, ("roughness", "Color"), ("Principled BSDF", "Roughness"));
    builder.link(tree, ("metallic", "Color"), ("Principled BSDF", "Metallic"));
    builder.link(tree, ("opacity", "Color"), ("Principled BSDF", "Alpha"));
    builder.link(tree, ("normal", "Color"), ("Normal Map", "Color"));
    builder.link(tree, ("Normal Map", "Normal"), ("Principled BSDF", "Normal"));
    builder.link(tree, ("displacement", "Color"), ("Displacement Map", "Height"));
    builder.link(tree, ("Displacement Map", "Displacement"), ("Material Output", "Displacement"));
}

/// Translucent shader added to the principled one, mixed back in by opacity.
///
/// The Mix Shader is muted when no translucency map exists, which passes the
/// principled shader straight through.
fn translucency_branch(builder: &GraphBuilder, tree: &mut NodeTree, images: &RoleImages) {
    let has_translucency = is_present(images, MapRole::Translucency);
    builder.ensure_node(tree, "Translucent BSDF", NodeKind::TranslucentBsdf, &NodeParams::at(0.0, -400.0));
    builder.ensure_node(tree, "Add Shader", NodeKind::AddShader, &NodeParams::at(250.0, -250.0));
    builder.ensure_node(
        tree,
        "Mix Shader",
        NodeKind::MixShader,
        &NodeParams::at(350.0, 0.0).muted(!has_translucency),
    );

    builder.link(tree, ("translucency", "Color"), ("Translucent BSDF", "Color"));
    builder.link(tree, ("Normal Map", "Normal"), ("Translucent BSDF", "Normal"));
    builder.link(tree, ("Principled BSDF", "BSDF"), ("Add Shader", "Shader"));
    builder.link(tree, ("Translucent BSDF", "BSDF"), ("Add Shader", "Shader_001"));
    builder.link(tree, ("opacity", "Color"), ("Mix Shader", "Fac"));
    builder.link(tree, ("Principled BSDF", "BSDF"), ("Mix Shader", "Shader"));
    builder.link(tree, ("Add Shader", "Shader"), ("Mix Shader", "Shader_001"));
    builder.link(tree, ("Mix Shader", "Shader"), ("Material Output", "Surface"));
}
