//! Node trees: nodes, typed sockets, links and group interfaces.

use crate::types::HostVersion;
use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether a tree is a shader graph or a procedural geometry graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TreeKind {
    Shader,
    Geometry,
}

/// Socket direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SocketDirection {
    In,
    Out,
}

/// Socket data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SocketType {
    Geometry,
    Float,
    Int,
    Bool,
    Vector,
    Color,
    String,
    Object,
    Shader,
}

impl SocketType {
    /// Whether a link from `self` to `to` is legal.
    ///
    /// Numeric kinds convert implicitly; everything else must match exactly.
    pub fn can_link_to(self, to: SocketType) -> bool {
        if self == to {
            return true;
        }
        self.is_numeric() && to.is_numeric()
    }

    fn is_numeric(self) -> bool {
        matches!(
            self,
            SocketType::Float
                | SocketType::Int
                | SocketType::Bool
                | SocketType::Vector
                | SocketType::Color
        )
    }

    /// Host type identifier of an interface socket of this type.
    pub fn idname(self) -> &'static str {
        match self {
            SocketType::Geometry => "NodeSocketGeometry",
            SocketType::Float => "NodeSocketFloat",
            SocketType::Int => "NodeSocketInt",
            SocketType::Bool => "NodeSocketBool",
            SocketType::Vector => "NodeSocketVector",
            SocketType::Color => "NodeSocketColor",
            SocketType::String => "NodeSocketString",
            SocketType::Object => "NodeSocketObject",
            SocketType::Shader => "NodeSocketShader",
        }
    }

    /// Zero value for a socket of this type.
    pub fn zero(self) -> SocketValue {
        match self {
            SocketType::Float => SocketValue::Float(0.0),
            SocketType::Int => SocketValue::Int(0),
            SocketType::Bool => SocketValue::Bool(false),
            SocketType::Vector => SocketValue::Vector(Vec3::ZERO),
            SocketType::Color => SocketValue::Color(Vec4::new(0.0, 0.0, 0.0, 1.0)),
            SocketType::String => SocketValue::String(String::new()),
            SocketType::Object => SocketValue::Object(None),
            SocketType::Geometry | SocketType::Shader => SocketValue::None,
        }
    }
}

/// Socket UI subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SocketSubtype {
    #[default]
    None,
    Factor,
    Distance,
    Xyz,
    Translation,
}

/// A socket default value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SocketValue {
    None,
    Float(f32),
    Int(i32),
    Bool(bool),
    Vector(Vec3),
    Color(Vec4),
    String(String),
    Object(Option<String>),
}

impl SocketValue {
    /// The value as a float, if it is scalar.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            SocketValue::Float(v) => Some(*v),
            SocketValue::Int(v) => Some(*v as f32),
            SocketValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

/// A typed socket on a node or on a group interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Socket {
    /// Display name; not necessarily unique on a node.
    pub name: String,
    /// Unique key within one side of a node.
    pub identifier: String,
    pub socket_type: SocketType,
    pub subtype: SocketSubtype,
    pub default: SocketValue,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub description: String,
    pub default_attribute_name: String,
    pub hide_value: bool,
    pub hide_in_modifier: bool,
    pub single_value: bool,
    /// Interface panel holding this socket (4.0+ hosts only).
    pub panel: Option<String>,
    pub enabled: bool,
}

impl Socket {
    /// Create a socket whose identifier equals its name.
    pub fn new(name: impl Into<String>, socket_type: SocketType) -> Self {
        let name = name.into();
        Self {
            identifier: name.clone(),
            name,
            socket_type,
            subtype: SocketSubtype::None,
            default: socket_type.zero(),
            min: None,
            max: None,
            description: String::new(),
            default_attribute_name: String::new(),
            hide_value: false,
            hide_in_modifier: false,
            single_value: false,
            panel: None,
            enabled: true,
        }
    }

    /// Override the identifier (for nodes with repeated socket names).
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: SocketValue) -> Self {
        self.default = value;
        self
    }
}

/// A link from an output socket to an input socket, by node name and socket identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub from_node: String,
    pub from_socket: String,
    pub to_node: String,
    pub to_socket: String,
}

/// Closed set of node types the core creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Frame,
    GroupInput,
    GroupOutput,
    /// Instance of another node group.
    Group,
    TexCoord,
    Mapping,
    ImageTexture,
    Gamma,
    Mix,
    Math,
    PrincipledBsdf,
    TranslucentBsdf,
    AddShader,
    MixShader,
    NormalMap,
    Displacement,
    MaterialOutput,
    SelfObject,
    ActiveCamera,
    ObjectInfo,
    VectorMath,
    Compare,
    Switch,
}

impl NodeKind {
    /// Host type tag for this node kind.
    pub fn type_tag(&self, tree: TreeKind, version: HostVersion) -> &'static str {
        match self {
            NodeKind::Frame => "NodeFrame",
            NodeKind::GroupInput => "NodeGroupInput",
            NodeKind::GroupOutput => "NodeGroupOutput",
            NodeKind::Group => match tree {
                TreeKind::Shader => "ShaderNodeGroup",
                TreeKind::Geometry => "GeometryNodeGroup",
            },
            NodeKind::TexCoord => "ShaderNodeTexCoord",
            NodeKind::Mapping => "ShaderNodeMapping",
            NodeKind::ImageTexture => "ShaderNodeTexImage",
            NodeKind::Gamma => "ShaderNodeGamma",
            NodeKind::Mix => {
                if version.has_mix_node() {
                    "ShaderNodeMix"
                } else {
                    "ShaderNodeMixRGB"
                }
            }
            NodeKind::Math => "ShaderNodeMath",
            NodeKind::PrincipledBsdf => "ShaderNodeBsdfPrincipled",
            NodeKind::TranslucentBsdf => "ShaderNodeBsdfTranslucent",
            NodeKind::AddShader => "ShaderNodeAddShader",
            NodeKind::MixShader => "ShaderNodeMixShader",
            NodeKind::NormalMap => "ShaderNodeNormalMap",
            NodeKind::Displacement => "ShaderNodeDisplacement",
            NodeKind::MaterialOutput => "ShaderNodeOutputMaterial",
            NodeKind::SelfObject => "GeometryNodeSelfObject",
            NodeKind::ActiveCamera => "GeometryNodeInputActiveCamera",
            NodeKind::ObjectInfo => "GeometryNodeObjectInfo",
            NodeKind::VectorMath => "ShaderNodeVectorMath",
            NodeKind::Compare => "FunctionNodeCompare",
            NodeKind::Switch => "GeometryNodeSwitch",
        }
    }
}

/// A node inside a tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique within the enclosing tree.
    pub name: String,
    pub kind: NodeKind,
    pub label: String,
    pub location: Vec2,
    pub mute: bool,
    pub hide: bool,
    /// Enclosing frame node.
    pub parent: Option<String>,
    pub inputs: Vec<Socket>,
    pub outputs: Vec<Socket>,
    /// Enum-like node settings (operation, data_type, blend_type, ...).
    pub properties: BTreeMap<String, String>,
    /// Image datum for image texture nodes.
    pub image: Option<String>,
    /// Referenced node group for group instance nodes.
    pub node_tree: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: String::new(),
            location: Vec2::ZERO,
            mute: false,
            hide: false,
            parent: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            properties: BTreeMap::new(),
            image: None,
            node_tree: None,
        }
    }

    /// Find a socket by identifier, then by first enabled socket with that name.
    pub fn socket(&self, direction: SocketDirection, key: &str) -> Option<&Socket> {
        let sockets = self.sockets(direction);
        sockets
            .iter()
            .find(|s| s.identifier == key)
            .or_else(|| sockets.iter().find(|s| s.enabled && s.name == key))
    }

    /// Mutable variant of [`Node::socket`].
    pub fn socket_mut(&mut self, direction: SocketDirection, key: &str) -> Option<&mut Socket> {
        let sockets = match direction {
            SocketDirection::In => &mut self.inputs,
            SocketDirection::Out => &mut self.outputs,
        };
        if let Some(idx) = sockets.iter().position(|s| s.identifier == key) {
            return sockets.get_mut(idx);
        }
        sockets.iter_mut().find(|s| s.enabled && s.name == key)
    }

    /// Input sockets or output sockets.
    pub fn sockets(&self, direction: SocketDirection) -> &[Socket] {
        match direction {
            SocketDirection::In => &self.inputs,
            SocketDirection::Out => &self.outputs,
        }
    }

    /// Default value of an input, if present.
    pub fn input_default(&self, key: &str) -> Option<&SocketValue> {
        self.socket(SocketDirection::In, key).map(|s| &s.default)
    }

    /// Get a property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|s| s.as_str())
    }
}

/// A named cluster of sockets on a group interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub name: String,
    pub description: String,
    pub default_closed: bool,
}

/// One entry of a 4.0+ interface item tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InterfaceItem {
    Socket {
        direction: SocketDirection,
        socket: Socket,
    },
    Panel(Panel),
}

/// The input/output interface of a node group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TreeInterface {
    /// Pre-4.0 hosts: flat input and output lists, no panels.
    Legacy {
        inputs: Vec<Socket>,
        outputs: Vec<Socket>,
    },
    /// 4.0+ hosts: one ordered item tree of sockets and panels.
    Items(Vec<InterfaceItem>),
}

impl TreeInterface {
    /// An empty interface in the representation the host version uses.
    pub fn for_version(version: HostVersion) -> Self {
        if version.has_interface_panels() {
            TreeInterface::Items(Vec::new())
        } else {
            TreeInterface::Legacy {
                inputs: Vec::new(),
                outputs: Vec::new(),
            }
        }
    }

    /// Sockets of one direction in interface order.
    pub fn sockets(&self, direction: SocketDirection) -> Vec<&Socket> {
        match self {
            TreeInterface::Legacy { inputs, outputs } => match direction {
                SocketDirection::In => inputs.iter().collect(),
                SocketDirection::Out => outputs.iter().collect(),
            },
            TreeInterface::Items(items) => items
                .iter()
                .filter_map(|item| match item {
                    InterfaceItem::Socket { direction: d, socket } if *d == direction => {
                        Some(socket)
                    }
                    _ => None,
                })
                .collect(),
        }
    }

    /// Find an interface socket by name.
    pub fn socket(&self, direction: SocketDirection, name: &str) -> Option<&Socket> {
        self.sockets(direction).into_iter().find(|s| s.name == name)
    }

    /// Panels on the interface (always empty on pre-4.0 hosts).
    pub fn panels(&self) -> Vec<&Panel> {
        match self {
            TreeInterface::Legacy { .. } => Vec::new(),
            TreeInterface::Items(items) => items
                .iter()
                .filter_map(|item| match item {
                    InterfaceItem::Panel(panel) => Some(panel),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// A shader or geometry node tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTree {
    pub name: String,
    pub kind: TreeKind,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub interface: TreeInterface,
}

impl NodeTree {
    /// Create an empty tree with the interface representation of `version`.
    pub fn new(name: impl Into<String>, kind: TreeKind, version: HostVersion) -> Self {
        Self {
            name: name.into(),
            kind,
            nodes: Vec::new(),
            links: Vec::new(),
            interface: TreeInterface::for_version(version),
        }
    }

    /// Find a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Find a node by name (mutable).
    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// All nodes of a kind.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Whether a link between these endpoints exists.
    pub fn has_link(&self, from_node: &str, from_socket: &str, to_node: &str, to_socket: &str) -> bool {
        self.links.iter().any(|l| {
            l.from_node == from_node
                && l.from_socket == from_socket
                && l.to_node == to_node
                && l.to_socket == to_socket
        })
    }

    /// The link feeding an input socket, if any.
    pub fn link_into(&self, to_node: &str, to_socket: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.to_node == to_node && l.to_socket == to_socket)
    }

    /// Whether `to` is reachable from `from` following links downstream.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let mut stack = vec![from];
        let mut seen = std::collections::HashSet::new();
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            for link in self.links.iter().filter(|l| l.from_node == current) {
                stack.push(link.to_node.as_str());
            }
        }
        false
    }
}
