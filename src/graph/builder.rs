//! Declarative, idempotent node-tree builder.

use super::catalog::{node_sockets, socket_alias};
use crate::host::{
    InterfaceItem, Link, Node, NodeKind, NodeTree, Panel, Socket, SocketDirection, SocketSubtype,
    SocketType, SocketValue, TreeInterface,
};
use crate::types::HostVersion;
use glam::Vec2;

/// Desired final state of a node.
#[derive(Debug, Clone, Default)]
pub struct NodeParams {
    pub location: Vec2,
    pub label: Option<String>,
    /// Enclosing frame node; must already exist in the tree.
    pub parent: Option<String>,
    pub hide: bool,
    /// `None` leaves the mute flag untouched.
    pub mute: Option<bool>,
    pub properties: Vec<(String, String)>,
    /// Input default values, keyed by current socket name or identifier.
    pub inputs: Vec<(String, SocketValue)>,
    pub image: Option<String>,
    pub node_tree: Option<String>,
}

impl NodeParams {
    /// Params placing a node at `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            location: Vec2::new(x, y),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        self.parent = Some(frame.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    pub fn muted(mut self, mute: bool) -> Self {
        self.mute = Some(mute);
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    pub fn input(mut self, key: impl Into<String>, value: SocketValue) -> Self {
        self.inputs.push((key.into(), value));
        self
    }
}

/// Attributes of a group interface socket.
#[derive(Debug, Clone, Default)]
pub struct SocketAttrs {
    pub description: String,
    pub default_attribute_name: String,
    pub subtype: SocketSubtype,
    pub default: Option<SocketValue>,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub hide_value: bool,
    pub hide_in_modifier: bool,
    pub single_value: bool,
}

impl SocketAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn subtype(mut self, subtype: SocketSubtype) -> Self {
        self.subtype = subtype;
        self
    }

    pub fn default_value(mut self, value: SocketValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn hide_value(mut self) -> Self {
        self.hide_value = true;
        self
    }

    pub fn hide_in_modifier(mut self, hide: bool) -> Self {
        self.hide_in_modifier = hide;
        self
    }

    pub fn single_value(mut self) -> Self {
        self.single_value = true;
        self
    }
}

/// Attributes of an interface panel.
#[derive(Debug, Clone, Default)]
pub struct PanelAttrs {
    pub description: String,
    pub default_closed: bool,
}

/// Builds node trees against one host version.
///
/// Every call states the desired final shape; the builder diffs against what
/// the tree already holds, so repeating a sequence of calls is a no-op. The
/// builder never fails: bad requests are logged and skipped.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    version: HostVersion,
}

impl GraphBuilder {
    pub fn new(version: HostVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> HostVersion {
        self.version
    }

    /// Get or create the node `name`, then apply `params`.
    pub fn ensure_node<'t>(
        &self,
        tree: &'t mut NodeTree,
        name: &str,
        kind: NodeKind,
        params: &NodeParams,
    ) -> &'t mut Node {
        let idx = match tree.nodes.iter().position(|n| n.name == name) {
            Some(idx) if tree.nodes[idx].kind == kind => idx,
            Some(idx) => {
                log::warn!(
                    "Node {} in {} changed type; recreating as {:?}",
                    name,
                    tree.name,
                    kind
                );
                tree.links.retain(|l| l.from_node != name && l.to_node != name);
                tree.nodes.remove(idx);
                self.create_node(tree, name, kind)
            }
            None => self.create_node(tree, name, kind),
        };

        let frame_ok = match &params.parent {
            Some(frame) => {
                let exists = tree
                    .nodes
                    .iter()
                    .any(|n| &n.name == frame && n.kind == NodeKind::Frame);
                if !exists {
                    log::warn!("Frame {} not found in {}; node {} left unparented", frame, tree.name, name);
                }
                exists
            }
            None => true,
        };

        if matches!(kind, NodeKind::GroupInput | NodeKind::GroupOutput) {
            let interface = tree.interface.clone();
            sync_group_io(&mut tree.nodes[idx], &interface);
        }

        let version = self.version;
        let node = &mut tree.nodes[idx];
        node.location = params.location;
        if let Some(label) = &params.label {
            node.label = label.clone();
        }
        node.parent = if frame_ok { params.parent.clone() } else { None };
        node.hide = params.hide;
        if let Some(mute) = params.mute {
            node.mute = mute;
        }
        for (key, value) in &params.properties {
            node.properties.insert(key.clone(), value.clone());
        }
        refresh_typed_sockets(node, version);
        for (key, value) in &params.inputs {
            let key = socket_alias(kind, key, version);
            match node.socket_mut(SocketDirection::In, key) {
                Some(socket) => socket.default = value.clone(),
                None => log::warn!("Node {} has no input {}", node.name, key),
            }
        }
        if params.image.is_some() {
            node.image = params.image.clone();
        }
        if params.node_tree.is_some() {
            node.node_tree = params.node_tree.clone();
        }
        node
    }

    fn create_node(&self, tree: &mut NodeTree, name: &str, kind: NodeKind) -> usize {
        log::debug!("Creating node {} ({:?}) in {}", name, kind, tree.name);
        let mut node = Node::new(name, kind);
        let (inputs, outputs) = node_sockets(kind, self.version, &node.properties);
        node.inputs = inputs;
        node.outputs = outputs;
        tree.nodes.push(node);
        tree.nodes.len() - 1
    }

    /// Image node whose mute flag tracks whether its image was found.
    pub fn ensure_image_node<'t>(
        &self,
        tree: &'t mut NodeTree,
        name: &str,
        image: Option<&str>,
        params: NodeParams,
    ) -> &'t mut Node {
        let params = params.muted(image.is_none());
        let node = self.ensure_node(tree, name, NodeKind::ImageTexture, &params);
        node.image = image.map(str::to_string);
        if image.is_none() {
            log::debug!("Image node {} muted: no file", name);
        }
        node
    }

    /// Group instance node mirroring the interface of `group`.
    pub fn ensure_group_instance<'t>(
        &self,
        tree: &'t mut NodeTree,
        name: &str,
        group: &NodeTree,
        params: &NodeParams,
    ) -> &'t mut Node {
        let mut params = params.clone();
        params.node_tree = Some(group.name.clone());
        let inputs = params.inputs.clone();
        params.inputs.clear();
        let node = self.ensure_node(tree, name, NodeKind::Group, &params);
        node.inputs = mirror(group.interface.sockets(SocketDirection::In), &node.inputs);
        node.outputs = mirror(group.interface.sockets(SocketDirection::Out), &node.outputs);
        for (key, value) in inputs {
            if let Some(socket) = node.socket_mut(SocketDirection::In, &key) {
                socket.default = value;
            }
        }
        node
    }

    /// Get or create an interface socket, then apply `attrs`.
    ///
    /// On 4.0+ hosts the socket lives in the interface item tree and may sit
    /// in `panel`; on older hosts it goes to the flat input/output list and
    /// `panel` is ignored. Output sockets always hide their value.
    pub fn ensure_socket(
        &self,
        tree: &mut NodeTree,
        direction: SocketDirection,
        name: &str,
        socket_type: SocketType,
        attrs: &SocketAttrs,
        panel: Option<&str>,
    ) -> Socket {
        self.match_interface(tree);
        let panel = panel.filter(|p| {
            let found = tree.interface.panels().iter().any(|panel| panel.name == *p);
            if !found && self.version.has_interface_panels() {
                log::warn!("Panel {} not found in {}; socket {} placed at top level", p, tree.name, name);
            }
            found
        });

        let socket = match &mut tree.interface {
            TreeInterface::Legacy { inputs, outputs } => {
                let list = match direction {
                    SocketDirection::In => inputs,
                    SocketDirection::Out => outputs,
                };
                let idx = match list.iter().position(|s| s.name == name) {
                    Some(idx) => idx,
                    None => {
                        list.push(Socket::new(name, socket_type));
                        list.len() - 1
                    }
                };
                apply_socket_attrs(&mut list[idx], direction, socket_type, attrs, None);
                list[idx].clone()
            }
            TreeInterface::Items(items) => {
                let is_match = |item: &InterfaceItem| {
                    matches!(item, InterfaceItem::Socket { direction: d, socket } if *d == direction && socket.name == name)
                };
                if !items.iter().any(is_match) {
                    items.push(InterfaceItem::Socket {
                        direction,
                        socket: Socket::new(name, socket_type),
                    });
                }
                let mut socket = Socket::new(name, socket_type);
                for item in items.iter_mut() {
                    if let InterfaceItem::Socket { direction: d, socket: existing } = item {
                        if *d == direction && existing.name == name {
                            apply_socket_attrs(existing, direction, socket_type, attrs, panel);
                            socket = existing.clone();
                            break;
                        }
                    }
                }
                socket
            }
        };

        self.sync_group_nodes(tree);
        socket
    }

    /// Get or create an interface panel. Returns `None` on pre-4.0 hosts.
    pub fn ensure_panel(&self, tree: &mut NodeTree, name: &str, attrs: &PanelAttrs) -> Option<String> {
        if !self.version.has_interface_panels() {
            return None;
        }
        self.match_interface(tree);
        if let TreeInterface::Items(items) = &mut tree.interface {
            let panel = items.iter_mut().find_map(|item| match item {
                InterfaceItem::Panel(p) if p.name == name => Some(p),
                _ => None,
            });
            match panel {
                Some(panel) => {
                    panel.description = attrs.description.clone();
                    panel.default_closed = attrs.default_closed;
                }
                None => items.push(InterfaceItem::Panel(Panel {
                    name: name.to_string(),
                    description: attrs.description.clone(),
                    default_closed: attrs.default_closed,
                })),
            }
        }
        Some(name.to_string())
    }

    /// Link `from = (node, output)` to `to = (node, input)`.
    ///
    /// Existing identical links are kept; any other link into the same input
    /// is replaced. Type mismatches and cycles are refused. Returns whether
    /// the link is present afterwards.
    pub fn link(&self, tree: &mut NodeTree, from: (&str, &str), to: (&str, &str)) -> bool {
        let (from_node, from_key) = from;
        let (to_node, to_key) = to;

        let Some(source) = tree.node(from_node) else {
            log::warn!("Link source node {} missing in {}", from_node, tree.name);
            return false;
        };
        let Some(target) = tree.node(to_node) else {
            log::warn!("Link target node {} missing in {}", to_node, tree.name);
            return false;
        };
        let from_key = socket_alias(source.kind, from_key, self.version);
        let to_key = socket_alias(target.kind, to_key, self.version);
        let Some(out_socket) = source.socket(SocketDirection::Out, from_key) else {
            log::warn!("Node {} has no output {}", from_node, from_key);
            return false;
        };
        let Some(in_socket) = target.socket(SocketDirection::In, to_key) else {
            log::warn!("Node {} has no input {}", to_node, to_key);
            return false;
        };
        if !out_socket.socket_type.can_link_to(in_socket.socket_type) {
            log::warn!(
                "Refusing link {}:{} -> {}:{}: {:?} does not convert to {:?}",
                from_node,
                from_key,
                to_node,
                to_key,
                out_socket.socket_type,
                in_socket.socket_type
            );
            return false;
        }
        let link = Link {
            from_node: from_node.to_string(),
            from_socket: out_socket.identifier.clone(),
            to_node: to_node.to_string(),
            to_socket: in_socket.identifier.clone(),
        };

        if tree.links.contains(&link) {
            return true;
        }
        if from_node == to_node || tree.reaches(to_node, from_node) {
            log::warn!("Refusing link {} -> {} in {}: cycle", from_node, to_node, tree.name);
            return false;
        }
        tree.links
            .retain(|l| !(l.to_node == link.to_node && l.to_socket == link.to_socket));
        tree.links.push(link);
        true
    }

    /// Remove a node and every link touching it. Returns whether it existed.
    pub fn remove_node(&self, tree: &mut NodeTree, name: &str) -> bool {
        let before = tree.nodes.len();
        tree.nodes.retain(|n| n.name != name);
        if tree.nodes.len() == before {
            return false;
        }
        tree.links.retain(|l| l.from_node != name && l.to_node != name);
        log::debug!("Removed node {} from {}", name, tree.name);
        true
    }

    /// Bring the tree's interface representation in line with the host version.
    fn match_interface(&self, tree: &mut NodeTree) {
        let wants_items = self.version.has_interface_panels();
        let converted = match &tree.interface {
            TreeInterface::Legacy { inputs, outputs } if wants_items => {
                let items = inputs
                    .iter()
                    .map(|s| (SocketDirection::In, s))
                    .chain(outputs.iter().map(|s| (SocketDirection::Out, s)))
                    .map(|(direction, socket)| InterfaceItem::Socket {
                        direction,
                        socket: socket.clone(),
                    })
                    .collect();
                Some(TreeInterface::Items(items))
            }
            TreeInterface::Items(_) if !wants_items => {
                let strip = |s: &Socket| {
                    let mut s = s.clone();
                    s.panel = None;
                    s
                };
                Some(TreeInterface::Legacy {
                    inputs: tree.interface.sockets(SocketDirection::In).into_iter().map(strip).collect(),
                    outputs: tree.interface.sockets(SocketDirection::Out).into_iter().map(strip).collect(),
                })
            }
            _ => None,
        };
        if let Some(interface) = converted {
            log::debug!("Converting interface of {} for host {}", tree.name, self.version);
            tree.interface = interface;
        }
    }

    /// Refresh the sockets of group input/output nodes from the interface.
    fn sync_group_nodes(&self, tree: &mut NodeTree) {
        let interface = tree.interface.clone();
        for node in tree.nodes.iter_mut() {
            if matches!(node.kind, NodeKind::GroupInput | NodeKind::GroupOutput) {
                sync_group_io(node, &interface);
            }
        }
    }
}

fn apply_socket_attrs(
    socket: &mut Socket,
    direction: SocketDirection,
    socket_type: SocketType,
    attrs: &SocketAttrs,
    panel: Option<&str>,
) {
    if socket.socket_type != socket_type {
        socket.socket_type = socket_type;
        socket.default = socket_type.zero();
    }
    socket.description = attrs.description.clone();
    socket.default_attribute_name = attrs.default_attribute_name.clone();
    socket.subtype = attrs.subtype;
    if let Some(default) = &attrs.default {
        socket.default = default.clone();
    }
    socket.min = attrs.min;
    socket.max = attrs.max;
    socket.hide_value = attrs.hide_value || direction == SocketDirection::Out;
    socket.hide_in_modifier = attrs.hide_in_modifier;
    socket.single_value = attrs.single_value;
    socket.panel = panel.map(str::to_string);
}

/// Group Input exposes interface inputs as outputs; Group Output takes interface outputs as inputs.
fn sync_group_io(node: &mut Node, interface: &TreeInterface) {
    match node.kind {
        NodeKind::GroupInput => {
            node.outputs = mirror(interface.sockets(SocketDirection::In), &node.outputs);
        }
        NodeKind::GroupOutput => {
            node.inputs = mirror(interface.sockets(SocketDirection::Out), &node.inputs);
        }
        _ => {}
    }
}

/// Node-side copies of interface sockets, keeping per-node defaults already set.
fn mirror(interface: Vec<&Socket>, current: &[Socket]) -> Vec<Socket> {
    interface
        .into_iter()
        .map(|s| {
            let mut copy = s.clone();
            copy.identifier = s.name.clone();
            if let Some(existing) = current
                .iter()
                .find(|c| c.identifier == copy.identifier && c.socket_type == copy.socket_type)
            {
                copy.default = existing.default.clone();
            }
            copy
        })
        .collect()
}

/// Rebuild sockets whose type depends on a node property, keeping matching defaults.
fn refresh_typed_sockets(node: &mut Node, version: HostVersion) {
    if !matches!(node.kind, NodeKind::Switch) {
        return;
    }
    let (inputs, outputs) = node_sockets(node.kind, version, &node.properties);
    let signature = |sockets: &[Socket]| -> Vec<(String, SocketType)> {
        sockets
            .iter()
            .map(|s| (s.identifier.clone(), s.socket_type))
            .collect()
    };
    if signature(&inputs) == signature(&node.inputs) && signature(&outputs) == signature(&node.outputs) {
        return;
    }
    node.inputs = inputs;
    node.outputs = outputs;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TreeKind;
    use glam::Vec4;

    fn shader_tree(version: HostVersion) -> NodeTree {
        NodeTree::new("test", TreeKind::Shader, version)
    }

    #[test]
    fn test_ensure_node_is_idempotent() {
        let builder = GraphBuilder::new(HostVersion::default());
        let mut tree = shader_tree(builder.version());
        let params = NodeParams::at(-300.0, 0.0).input("Gamma", SocketValue::Float(2.2));

        builder.ensure_node(&mut tree, "Gamma", NodeKind::Gamma, &params);
        let once = tree.clone();
        builder.ensure_node(&mut tree, "Gamma", NodeKind::Gamma, &params);

        assert_eq!(tree, once);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(
            tree.node("Gamma").unwrap().input_default("Gamma"),
            Some(&SocketValue::Float(2.2))
        );
    }

    #[test]
    fn test_params_converge() {
        let builder = GraphBuilder::new(HostVersion::default());
        let mut tree = shader_tree(builder.version());
        builder.ensure_node(&mut tree, "Mix", NodeKind::Mix, &NodeParams::at(0.0, 0.0));
        builder.ensure_node(
            &mut tree,
            "Mix",
            NodeKind::Mix,
            &NodeParams::at(10.0, 20.0).prop("blend_type", "MULTIPLY"),
        );
        let node = tree.node("Mix").unwrap();
        assert_eq!(node.location, Vec2::new(10.0, 20.0));
        assert_eq!(node.property("blend_type"), Some("MULTIPLY"));
    }

    #[test]
    fn test_missing_frame_is_ignored() {
        let builder = GraphBuilder::new(HostVersion::default());
        let mut tree = shader_tree(builder.version());
        let node = builder.ensure_node(
            &mut tree,
            "Gamma",
            NodeKind::Gamma,
            &NodeParams::at(0.0, 0.0).in_frame("Textures"),
        );
        assert_eq!(node.parent, None);

        builder.ensure_node(&mut tree, "Textures", NodeKind::Frame, &NodeParams::default());
        let node = builder.ensure_node(
            &mut tree,
            "Gamma",
            NodeKind::Gamma,
            &NodeParams::at(0.0, 0.0).in_frame("Textures"),
        );
        assert_eq!(node.parent.as_deref(), Some("Textures"));
    }

    #[test]
    fn test_link_is_idempotent_and_replaces() {
        let builder = GraphBuilder::new(HostVersion::default());
        let mut tree = shader_tree(builder.version());
        builder.ensure_node(&mut tree, "a", NodeKind::ImageTexture, &NodeParams::default());
        builder.ensure_node(&mut tree, "b", NodeKind::ImageTexture, &NodeParams::default());
        builder.ensure_node(&mut tree, "Gamma", NodeKind::Gamma, &NodeParams::default());

        assert!(builder.link(&mut tree, ("a", "Color"), ("Gamma", "Color")));
        assert!(builder.link(&mut tree, ("a", "Color"), ("Gamma", "Color")));
        assert_eq!(tree.links.len(), 1);

        assert!(builder.link(&mut tree, ("b", "Color"), ("Gamma", "Color")));
        assert_eq!(tree.links.len(), 1);
        assert_eq!(tree.links[0].from_node, "b");
    }

    #[test]
    fn test_link_refuses_type_mismatch_and_cycles() {
        let builder = GraphBuilder::new(HostVersion::default());
        let mut tree = shader_tree(builder.version());
        builder.ensure_node(&mut tree, "BSDF", NodeKind::PrincipledBsdf, &NodeParams::default());
        builder.ensure_node(&mut tree, "G1", NodeKind::Gamma, &NodeParams::default());
        builder.ensure_node(&mut tree, "G2", NodeKind::Gamma, &NodeParams::default());

        assert!(!builder.link(&mut tree, ("BSDF", "BSDF"), ("G1", "Color")));
        assert!(builder.link(&mut tree, ("G1", "Color"), ("G2", "Color")));
        assert!(!builder.link(&mut tree, ("G2", "Color"), ("G1", "Color")));
        assert_eq!(tree.links.len(), 1);
    }

    #[test]
    fn test_link_uses_aliases_on_old_hosts() {
        let builder = GraphBuilder::new(HostVersion::new(3, 3, 0));
        let mut tree = shader_tree(builder.version());
        builder.ensure_node(
            &mut tree,
            "Mix",
            NodeKind::Mix,
            &NodeParams::default().input("B", SocketValue::Color(Vec4::ONE)),
        );
        builder.ensure_node(&mut tree, "albedo", NodeKind::ImageTexture, &NodeParams::default());
        assert!(builder.link(&mut tree, ("albedo", "Color"), ("Mix", "A")));
        assert_eq!(tree.links[0].to_socket, "Color1");
        assert_eq!(
            tree.node("Mix").unwrap().input_default("Color2"),
            Some(&SocketValue::Color(Vec4::ONE))
        );
    }

    #[test]
    fn test_ensure_image_node_mutes_missing() {
        let builder = GraphBuilder::new(HostVersion::default());
        let mut tree = shader_tree(builder.version());
        let node = builder.ensure_image_node(&mut tree, "ao", None, NodeParams::at(0.0, 0.0));
        assert!(node.mute);
        let node = builder.ensure_image_node(&mut tree, "ao", Some("4K_AO.jpg"), NodeParams::at(0.0, 0.0));
        assert!(!node.mute);
        assert_eq!(node.image.as_deref(), Some("4K_AO.jpg"));
    }

    #[test]
    fn test_sockets_and_panels_modern_host() {
        let builder = GraphBuilder::new(HostVersion::new(4, 1, 0));
        let mut tree = NodeTree::new("group", TreeKind::Shader, builder.version());
        builder.ensure_node(&mut tree, "Group Output", NodeKind::GroupOutput, &NodeParams::default());
        let panel = builder.ensure_panel(&mut tree, "Displacement", &PanelAttrs::default());
        assert_eq!(panel.as_deref(), Some("Displacement"));

        let attrs = SocketAttrs::new()
            .default_value(SocketValue::Float(0.5))
            .range(0.0, 1.0);
        let socket = builder.ensure_socket(
            &mut tree,
            SocketDirection::In,
            "Midlevel",
            SocketType::Float,
            &attrs,
            panel.as_deref(),
        );
        assert_eq!(socket.panel.as_deref(), Some("Displacement"));

        let out = builder.ensure_socket(
            &mut tree,
            SocketDirection::Out,
            "Roughness",
            SocketType::Float,
            &SocketAttrs::new(),
            None,
        );
        assert!(out.hide_value);

        let once = tree.clone();
        builder.ensure_panel(&mut tree, "Displacement", &PanelAttrs::default());
        builder.ensure_socket(&mut tree, SocketDirection::In, "Midlevel", SocketType::Float, &attrs, Some("Displacement"));
        assert_eq!(tree, once);

        let output_node = tree.node("Group Output").unwrap();
        assert_eq!(output_node.inputs.len(), 1);
        assert_eq!(output_node.inputs[0].name, "Roughness");
    }

    #[test]
    fn test_panels_are_noop_on_legacy_host() {
        let builder = GraphBuilder::new(HostVersion::new(3, 6, 0));
        let mut tree = NodeTree::new("group", TreeKind::Shader, builder.version());
        assert_eq!(builder.ensure_panel(&mut tree, "Displacement", &PanelAttrs::default()), None);
        let socket = builder.ensure_socket(
            &mut tree,
            SocketDirection::In,
            "Scale",
            SocketType::Float,
            &SocketAttrs::new(),
            Some("Displacement"),
        );
        assert_eq!(socket.panel, None);
        assert!(matches!(tree.interface, TreeInterface::Legacy { .. }));
        assert_eq!(tree.interface.sockets(SocketDirection::In).len(), 1);
    }

    #[test]
    fn test_legacy_interface_upgraded_on_modern_host() {
        let legacy = GraphBuilder::new(HostVersion::new(3, 6, 0));
        let mut tree = NodeTree::new("group", TreeKind::Shader, legacy.version());
        legacy.ensure_socket(&mut tree, SocketDirection::In, "Vector", SocketType::Vector, &SocketAttrs::new(), None);

        let modern = GraphBuilder::new(HostVersion::new(4, 0, 0));
        modern.ensure_socket(&mut tree, SocketDirection::In, "Vector", SocketType::Vector, &SocketAttrs::new(), None);
        assert!(matches!(tree.interface, TreeInterface::Items(_)));
        assert_eq!(tree.interface.sockets(SocketDirection::In).len(), 1);
    }
}
