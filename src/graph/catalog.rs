//! Static socket tables for every node kind the core creates.
//!
//! Socket layouts differ between host versions (the Mix node replaced MixRGB,
//! the Principled BSDF renamed inputs, the Switch node became single-typed).
//! Composers always use the newest socket names; [`socket_alias`] maps those
//! names back for older hosts.

use crate::host::{NodeKind, Socket, SocketType, SocketValue};
use crate::types::HostVersion;
use glam::{Vec3, Vec4};
use std::collections::BTreeMap;

fn float(name: &str, value: f32) -> Socket {
    Socket::new(name, SocketType::Float).with_default(SocketValue::Float(value))
}

fn color(name: &str, value: [f32; 4]) -> Socket {
    Socket::new(name, SocketType::Color).with_default(SocketValue::Color(Vec4::from_array(value)))
}

fn vector(name: &str, value: [f32; 3]) -> Socket {
    Socket::new(name, SocketType::Vector).with_default(SocketValue::Vector(Vec3::from_array(value)))
}

fn hidden_vector(name: &str) -> Socket {
    let mut socket = Socket::new(name, SocketType::Vector);
    socket.hide_value = true;
    socket
}

fn shader(name: &str) -> Socket {
    Socket::new(name, SocketType::Shader)
}

/// Socket type selected by a node's `input_type`/`data_type` property.
fn typed(props: &BTreeMap<String, String>, key: &str, fallback: SocketType) -> SocketType {
    match props.get(key).map(|s| s.as_str()) {
        Some("GEOMETRY") => SocketType::Geometry,
        Some("FLOAT") => SocketType::Float,
        Some("INT") => SocketType::Int,
        Some("BOOLEAN") => SocketType::Bool,
        Some("VECTOR") => SocketType::Vector,
        Some("RGBA") => SocketType::Color,
        Some("OBJECT") => SocketType::Object,
        _ => fallback,
    }
}

/// Default input and output sockets of a freshly created node.
///
/// Group input/output and group instance nodes return empty lists; their
/// sockets mirror a group interface and are synced by the builder.
pub fn node_sockets(
    kind: NodeKind,
    version: HostVersion,
    props: &BTreeMap<String, String>,
) -> (Vec<Socket>, Vec<Socket>) {
    match kind {
        NodeKind::Frame | NodeKind::GroupInput | NodeKind::GroupOutput | NodeKind::Group => {
            (Vec::new(), Vec::new())
        }
        NodeKind::TexCoord => (
            Vec::new(),
            ["Generated", "Normal", "UV", "Object", "Camera", "Window", "Reflection"]
                .iter()
                .map(|n| Socket::new(*n, SocketType::Vector))
                .collect(),
        ),
        NodeKind::Mapping => (
            vec![
                hidden_vector("Vector"),
                vector("Location", [0.0; 3]),
                vector("Rotation", [0.0; 3]),
                vector("Scale", [1.0; 3]),
            ],
            vec![Socket::new("Vector", SocketType::Vector)],
        ),
        NodeKind::ImageTexture => (
            vec![hidden_vector("Vector")],
            vec![
                color("Color", [0.0, 0.0, 0.0, 1.0]),
                float("Alpha", 0.0),
            ],
        ),
        NodeKind::Gamma => (
            vec![color("Color", [1.0; 4]), float("Gamma", 1.0)],
            vec![Socket::new("Color", SocketType::Color)],
        ),
        NodeKind::Mix => {
            if version.has_mix_node() {
                (
                    vec![
                        float("Factor", 0.5),
                        color("A", [0.5, 0.5, 0.5, 1.0]),
                        color("B", [0.5, 0.5, 0.5, 1.0]),
                    ],
                    vec![Socket::new("Result", SocketType::Color)],
                )
            } else {
                (
                    vec![
                        float("Fac", 0.5),
                        color("Color1", [0.5, 0.5, 0.5, 1.0]),
                        color("Color2", [0.5, 0.5, 0.5, 1.0]),
                    ],
                    vec![Socket::new("Color", SocketType::Color)],
                )
            }
        }
        NodeKind::Math => (
            vec![
                float("Value", 0.5),
                float("Value", 0.5).with_identifier("Value_001"),
                float("Value", 0.5).with_identifier("Value_002"),
            ],
            vec![Socket::new("Value", SocketType::Float)],
        ),
        NodeKind::PrincipledBsdf => {
            let (subsurface, specular, emission) = if version.has_principled_v2() {
                ("Subsurface Weight", "Specular IOR Level", "Emission Color")
            } else {
                ("Subsurface", "Specular", "Emission")
            };
            let ior = if version.has_principled_v2() { 1.5 } else { 1.45 };
            (
                vec![
                    color("Base Color", [0.8, 0.8, 0.8, 1.0]),
                    float("Metallic", 0.0),
                    float("Roughness", 0.5),
                    float("IOR", ior),
                    float("Alpha", 1.0),
                    hidden_vector("Normal"),
                    float(subsurface, 0.0),
                    float(specular, 0.5),
                    color(emission, [0.0, 0.0, 0.0, 1.0]),
                    float("Emission Strength", 0.0),
                ],
                vec![shader("BSDF")],
            )
        }
        NodeKind::TranslucentBsdf => (
            vec![color("Color", [0.8, 0.8, 0.8, 1.0]), hidden_vector("Normal")],
            vec![shader("BSDF")],
        ),
        NodeKind::AddShader => (
            vec![shader("Shader"), shader("Shader").with_identifier("Shader_001")],
            vec![shader("Shader")],
        ),
        NodeKind::MixShader => (
            vec![
                float("Fac", 0.5),
                shader("Shader"),
                shader("Shader").with_identifier("Shader_001"),
            ],
            vec![shader("Shader")],
        ),
        NodeKind::NormalMap => (
            vec![float("Strength", 1.0), color("Color", [0.5, 0.5, 1.0, 1.0])],
            vec![Socket::new("Normal", SocketType::Vector)],
        ),
        NodeKind::Displacement => (
            vec![
                float("Height", 0.0),
                float("Midlevel", 0.5),
                float("Scale", 1.0),
                hidden_vector("Normal"),
            ],
            vec![Socket::new("Displacement", SocketType::Vector)],
        ),
        NodeKind::MaterialOutput => (
            vec![
                shader("Surface"),
                shader("Volume"),
                hidden_vector("Displacement"),
            ],
            Vec::new(),
        ),
        NodeKind::SelfObject => (
            Vec::new(),
            vec![Socket::new("Self Object", SocketType::Object)],
        ),
        NodeKind::ActiveCamera => (
            Vec::new(),
            vec![Socket::new("Active Camera", SocketType::Object)],
        ),
        NodeKind::ObjectInfo => (
            vec![
                Socket::new("Object", SocketType::Object),
                Socket::new("As Instance", SocketType::Bool),
            ],
            vec![
                Socket::new("Location", SocketType::Vector),
                Socket::new("Rotation", SocketType::Vector),
                Socket::new("Scale", SocketType::Vector),
                Socket::new("Geometry", SocketType::Geometry),
            ],
        ),
        NodeKind::VectorMath => (
            vec![
                vector("Vector", [0.0; 3]),
                vector("Vector", [0.0; 3]).with_identifier("Vector_001"),
                vector("Vector", [0.0; 3]).with_identifier("Vector_002"),
                float("Scale", 1.0),
            ],
            vec![
                Socket::new("Vector", SocketType::Vector),
                Socket::new("Value", SocketType::Float),
            ],
        ),
        NodeKind::Compare => (
            vec![float("A", 0.0), float("B", 0.0), float("Epsilon", 0.001)],
            vec![Socket::new("Result", SocketType::Bool)],
        ),
        NodeKind::Switch => {
            let ty = typed(props, "input_type", SocketType::Geometry);
            if version.has_unified_switch() {
                (
                    vec![
                        Socket::new("Switch", SocketType::Bool),
                        Socket::new("False", ty),
                        Socket::new("True", ty),
                    ],
                    vec![Socket::new("Output", ty)],
                )
            } else {
                // Older hosts keep one socket pair per type; identifiers carry the type slot.
                let slot = legacy_switch_slot(ty);
                let switch_id = match ty {
                    SocketType::Float | SocketType::Int | SocketType::Bool => "Switch",
                    _ => "Switch_001",
                };
                (
                    vec![
                        Socket::new("Switch", SocketType::Bool).with_identifier(switch_id),
                        Socket::new("False", ty).with_identifier(format!("False{}", slot)),
                        Socket::new("True", ty).with_identifier(format!("True{}", slot)),
                    ],
                    vec![Socket::new("Output", ty).with_identifier(format!("Output{}", slot))],
                )
            }
        }
    }
}

fn legacy_switch_slot(ty: SocketType) -> &'static str {
    match ty {
        SocketType::Float => "",
        SocketType::Int => "_001",
        SocketType::Bool => "_002",
        SocketType::Vector => "_003",
        SocketType::Color => "_004",
        SocketType::String => "_005",
        SocketType::Geometry => "_006",
        SocketType::Object => "_007",
        SocketType::Shader => "",
    }
}

/// Translate a current socket name to the name used by `version`.
pub fn socket_alias<'a>(kind: NodeKind, name: &'a str, version: HostVersion) -> &'a str {
    match kind {
        NodeKind::Mix if !version.has_mix_node() => match name {
            "Factor" => "Fac",
            "A" => "Color1",
            "B" => "Color2",
            "Result" => "Color",
            other => other,
        },
        NodeKind::PrincipledBsdf if !version.has_principled_v2() => match name {
            "Subsurface Weight" => "Subsurface",
            "Specular IOR Level" => "Specular",
            "Emission Color" => "Emission",
            other => other,
        },
        _ => name,
    }
}
