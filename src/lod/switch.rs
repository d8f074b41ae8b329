//! Geometry node tree swapping LOD meshes by distance to the active camera.
//!
//! The tree is bound to the LOD0 object through a nodes modifier. Each present
//! level `i` adds a compare/switch pair; switches chain from the finest level
//! to the coarsest, so the output is the coarsest level whose threshold the
//! camera distance exceeds. Thresholds are not checked for monotonicity.

use crate::graph::{GraphBuilder, NodeParams, SocketAttrs};
use crate::host::{
    Modifier, Node, NodeKind, NodeTree, SceneDb, SocketDirection, SocketSubtype, SocketType,
    SocketValue, TreeKind,
};
use crate::config::MAX_LOD;
use std::collections::BTreeMap;

/// Suffix of LOD switch node groups.
pub const LOD_GROUP_SUFFIX: &str = "_LODGroup";

/// Name of the modifier binding the switch tree to LOD0.
pub const MODIFIER_NAME: &str = "LODGroup";

/// An imported object and the LOD level it represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LodObject {
    pub lod: u8,
    pub object: String,
}

impl LodObject {
    pub fn new(lod: u8, object: impl Into<String>) -> Self {
        Self {
            lod,
            object: object.into(),
        }
    }
}

/// Interface input holding the threshold of `lod`.
pub fn distance_input(lod: u8) -> String {
    format!("LOD{} Distance", lod)
}

/// Default threshold of `lod`.
pub fn default_distance(lod: u8) -> f32 {
    5.0 * lod as f32
}

/// Build (or update) the switch tree for the LOD objects of one collection.
///
/// Returns the tree name, or `None` when no LOD0 object is present.
pub fn build_lod_switch(
    scene: &mut SceneDb,
    builder: &GraphBuilder,
    collection: &str,
    lods: &[LodObject],
) -> Option<String> {
    let Some(base) = lods.iter().find(|l| l.lod == 0).map(|l| l.object.clone()) else {
        log::warn!("No LOD0 object in {}; skipping LOD group", collection);
        return None;
    };
    let mut present: BTreeMap<u8, String> = BTreeMap::new();
    for lod in lods.iter().filter(|l| l.lod > 0 && l.lod <= MAX_LOD) {
        present.entry(lod.lod).or_insert_with(|| lod.object.clone());
    }

    let tree_name = format!("{}{}", collection, LOD_GROUP_SUFFIX);
    let tree = scene.ensure_node_group(&tree_name, TreeKind::Geometry);
    build_tree(builder, tree, &present);

    for lod in lods.iter().filter(|l| l.lod > 0) {
        if let Some(object) = scene.objects.get_mut(&lod.object) {
            object.hide_viewport = true;
            object.hide_render = true;
            object.parent = Some(base.clone());
            object.modifiers.retain(|m| !is_lod_group_modifier(m));
        }
    }
    if let Some(object) = scene.objects.get_mut(&base) {
        object.hide_viewport = false;
        object.hide_render = false;
        let idx = match object.modifiers.iter().position(|m| m.name == MODIFIER_NAME) {
            Some(idx) => idx,
            None => {
                object.modifiers.push(Modifier {
                    name: MODIFIER_NAME.to_string(),
                    node_group: None,
                    inputs: BTreeMap::new(),
                });
                object.modifiers.len() - 1
            }
        };
        let modifier = &mut object.modifiers[idx];
        modifier.node_group = Some(tree_name.clone());
        for lod in 1..=MAX_LOD {
            let key = distance_input(lod);
            if present.contains_key(&lod) {
                modifier
                    .inputs
                    .entry(key)
                    .or_insert(SocketValue::Float(default_distance(lod)));
            } else {
                modifier.inputs.remove(&key);
            }
        }
    }

    log::info!(
        "LOD group {} switches {} levels above {}",
        tree_name,
        present.len(),
        base
    );
    Some(tree_name)
}

fn is_lod_group_modifier(modifier: &Modifier) -> bool {
    modifier.name == MODIFIER_NAME
        || modifier
            .node_group
            .as_deref()
            .map(|g| g.ends_with(LOD_GROUP_SUFFIX))
            .unwrap_or(false)
}

fn build_tree(builder: &GraphBuilder, tree: &mut NodeTree, present: &BTreeMap<u8, String>) {
    builder.ensure_socket(
        tree,
        SocketDirection::In,
        "Geometry",
        SocketType::Geometry,
        &SocketAttrs::new(),
        None,
    );
    for lod in 1..=MAX_LOD {
        let attrs = SocketAttrs::new()
            .description(format!("Camera distance above which LOD{} is shown", lod))
            .subtype(SocketSubtype::Distance)
            .default_value(SocketValue::Float(default_distance(lod)))
            .range(0.0, 100.0)
            .single_value()
            .hide_in_modifier(!present.contains_key(&lod));
        builder.ensure_socket(
            tree,
            SocketDirection::In,
            &distance_input(lod),
            SocketType::Float,
            &attrs,
            None,
        );
    }
    builder.ensure_socket(
        tree,
        SocketDirection::Out,
        "Geometry",
        SocketType::Geometry,
        &SocketAttrs::new(),
        None,
    );

    builder.ensure_node(tree, "Group Input", NodeKind::GroupInput, &NodeParams::at(-900.0, 0.0));
    builder.ensure_node(tree, "Self Object", NodeKind::SelfObject, &NodeParams::at(-1100.0, -300.0));
    builder.ensure_node(tree, "Self Info", NodeKind::ObjectInfo, &NodeParams::at(-900.0, -300.0));
    builder.ensure_node(tree, "Active Camera", NodeKind::ActiveCamera, &NodeParams::at(-1100.0, -550.0));
    builder.ensure_node(tree, "Camera Info", NodeKind::ObjectInfo, &NodeParams::at(-900.0, -550.0));
    builder.ensure_node(
        tree,
        "Distance",
        NodeKind::VectorMath,
        &NodeParams::at(-700.0, -400.0).prop("operation", "DISTANCE"),
    );
    builder.link(tree, ("Self Object", "Self Object"), ("Self Info", "Object"));
    builder.link(tree, ("Active Camera", "Active Camera"), ("Camera Info", "Object"));
    builder.link(tree, ("Self Info", "Location"), ("Distance", "Vector"));
    builder.link(tree, ("Camera Info", "Location"), ("Distance", "Vector_001"));

    let mut upstream = ("Group Input".to_string(), "Geometry".to_string());
    let mut column = 0.0;
    for lod in 1..=MAX_LOD {
        let compare = format!("Compare LOD{}", lod);
        let info = format!("LOD{} Info", lod);
        let switch = format!("Switch LOD{}", lod);
        let Some(object) = present.get(&lod) else {
            for name in [&compare, &info, &switch] {
                builder.remove_node(tree, name);
            }
            continue;
        };
        let x = -400.0 + column * 250.0;
        column += 1.0;
        builder.ensure_node(
            tree,
            &compare,
            NodeKind::Compare,
            &NodeParams::at(x, -250.0)
                .prop("data_type", "FLOAT")
                .prop("operation", "GREATER_THAN"),
        );
        builder.ensure_node(
            tree,
            &info,
            NodeKind::ObjectInfo,
            &NodeParams::at(x, 300.0).input("Object", SocketValue::Object(Some(object.clone()))),
        );
        builder.ensure_node(
            tree,
            &switch,
            NodeKind::Switch,
            &NodeParams::at(x, 0.0).prop("input_type", "GEOMETRY"),
        );
        builder.link(tree, ("Distance", "Value"), (&compare, "A"));
        builder.link(tree, ("Group Input", &distance_input(lod)), (&compare, "B"));
        builder.link(tree, (&compare, "Result"), (&switch, "Switch"));
        builder.link(tree, (&upstream.0, &upstream.1), (&switch, "False"));
        builder.link(tree, (&info, "Geometry"), (&switch, "True"));
        upstream = (switch, "Output".to_string());
    }

    builder.ensure_node(
        tree,
        "Group Output",
        NodeKind::GroupOutput,
        &NodeParams::at(-400.0 + column * 250.0, 0.0),
    );
    builder.link(tree, (&upstream.0, &upstream.1), ("Group Output", "Geometry"));
}

/// Distance inputs the modifier on `object` exposes, with their current values.
pub fn exposed_distances(scene: &SceneDb, object: &str) -> Vec<(String, f32)> {
    let Some(modifier) = scene.objects.get(object).and_then(|o| o.modifier(MODIFIER_NAME)) else {
        return Vec::new();
    };
    let Some(tree) = modifier.node_group.as_ref().and_then(|g| scene.node_groups.get(g)) else {
        return Vec::new();
    };
    tree.interface
        .sockets(SocketDirection::In)
        .into_iter()
        .filter(|s| s.socket_type == SocketType::Float && !s.hide_in_modifier)
        .map(|s| {
            let value = modifier
                .inputs
                .get(&s.name)
                .and_then(|v| v.as_float())
                .or_else(|| s.default.as_float())
                .unwrap_or(0.0);
            (s.name.clone(), value)
        })
        .collect()
}

/// Which object the switch tree outputs at camera `distance`.
///
/// `overrides` are modifier input values. Returns `None` when the modified
/// object's own geometry (LOD0) passes through.
pub fn evaluate(
    tree: &NodeTree,
    overrides: &BTreeMap<String, SocketValue>,
    distance: f32,
) -> Option<String> {
    let output = tree.nodes_of_kind(NodeKind::GroupOutput).next()?;
    let evaluator = Evaluator {
        tree,
        overrides,
        distance,
    };
    evaluator.geometry(&output.name, "Geometry")
}

struct Evaluator<'a> {
    tree: &'a NodeTree,
    overrides: &'a BTreeMap<String, SocketValue>,
    distance: f32,
}

impl<'a> Evaluator<'a> {
    /// Node and output socket identifier feeding `node.input`.
    fn source(&self, node: &str, input: &str) -> Option<(&'a Node, &'a str)> {
        let target = self.tree.node(node)?;
        let socket = target.socket(SocketDirection::In, input)?;
        let link = self.tree.link_into(node, &socket.identifier)?;
        let from = self.tree.node(&link.from_node)?;
        Some((from, link.from_socket.as_str()))
    }

    fn unlinked_default(&self, node: &str, input: &str) -> Option<&'a SocketValue> {
        self.tree.node(node)?.input_default(input)
    }

    fn geometry(&self, node: &str, input: &str) -> Option<String> {
        let (from, _) = self.source(node, input)?;
        match from.kind {
            NodeKind::Switch => {
                let branch = if self.boolean(&from.name, "Switch") { "True" } else { "False" };
                self.geometry(&from.name, branch)
            }
            NodeKind::ObjectInfo => match from.input_default("Object") {
                Some(SocketValue::Object(object)) => object.clone(),
                _ => None,
            },
            _ => None,
        }
    }

    fn boolean(&self, node: &str, input: &str) -> bool {
        let Some((from, _)) = self.source(node, input) else {
            return self
                .unlinked_default(node, input)
                .and_then(|v| v.as_float())
                .map(|v| v > 0.5)
                .unwrap_or(false);
        };
        if from.kind != NodeKind::Compare {
            return false;
        }
        let a = self.float(&from.name, "A");
        let b = self.float(&from.name, "B");
        match from.property("operation") {
            Some("GREATER_EQUAL") => a >= b,
            Some("LESS_THAN") => a < b,
            Some("LESS_EQUAL") => a <= b,
            _ => a > b,
        }
    }

    fn float(&self, node: &str, input: &str) -> f32 {
        let Some((from, socket)) = self.source(node, input) else {
            return self
                .unlinked_default(node, input)
                .and_then(|v| v.as_float())
                .unwrap_or(0.0);
        };
        match from.kind {
            NodeKind::VectorMath => self.distance,
            NodeKind::GroupInput => self
                .overrides
                .get(socket)
                .and_then(|v| v.as_float())
                .or_else(|| {
                    self.tree
                        .interface
                        .socket(SocketDirection::In, socket)
                        .and_then(|s| s.default.as_float())
                })
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }
}
