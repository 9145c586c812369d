use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::callback::{Handler, HandlerResult, Handlers};
use crate::props::Props;
use crate::shadow::Shadow;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a retained node, pushed on the native ID stack every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

macro_rules! node_kinds {
    ($($variant:ident => $($name:literal)|+),+ $(,)?) => {
        /// Widget kinds the renderer knows. Anything else renders its children only.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($variant,)+
            Unknown(String),
        }

        impl NodeKind {
            pub fn parse(name: &str) -> Self {
                match name {
                    $($($name)|+ => Self::$variant,)+
                    other => Self::Unknown(other.to_string()),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => node_kinds!(@first $($name)|+),)+
                    Self::Unknown(name) => name.as_str(),
                }
            }
        }
    };
    (@first $first:literal $(| $rest:literal)*) => {
        $first
    };
}

node_kinds! {
    Root => "root",
    Window => "window",
    DemoWindow => "demowindow",
    Child => "child",
    MenuBar => "menubar",
    MainMenuBar => "mainmenubar",
    Menu => "menu",
    MenuItem => "menuitem",
    Button => "button",
    Text => "text",
    Group => "group",
    TreeNode => "treenode" | "tree",
    TabBar => "tabbar",
    TabItem => "tabitem",
    Separator => "separator",
    SameLine => "sameline",
    Indent => "indent",
    CollapsingHeader => "collapsingheader",
    Table => "table",
    TableHeader => "tableheader",
    TableRow => "tablerow",
    TableCell => "tablecell",
    TableColumn => "tablecolumn",
    Rect => "rect",
    Circle => "circle",
    Checkbox => "checkbox",
    InputText => "inputtext",
    InputTextMultiline => "inputtextmultiline",
    InputFloat => "inputfloat",
    InputInt => "inputint",
    InputDouble => "inputdouble",
    InputScalar => "inputscalar",
    DragFloat => "dragfloat",
    DragInt => "dragint",
    Combo => "combo",
    ListBox => "listbox",
    Selectable => "selectable",
    RadioButton => "radiobutton",
    ColorEdit3 => "coloredit3",
    ColorEdit4 => "coloredit4",
    ColorButton => "colorbutton",
    SliderFloat => "sliderfloat",
    SliderInt => "sliderint",
    Image => "image",
    ImageButton => "imagebutton",
    PlotLines => "plotlines",
    PlotHistogram => "plothistogram",
    ProgressBar => "progressbar",
    Spacing => "spacing",
    Tooltip => "tooltip",
    Popup => "popup",
    PopupModal => "popupmodal",
    DockSpace => "dockspace",
}

impl From<&str> for NodeKind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NodeKind {
    /// The state record a node of this kind starts with.
    pub fn initial_shadow(&self) -> Shadow {
        match self {
            Self::Window => Shadow::Window(Default::default()),
            Self::DemoWindow
            | Self::MenuItem
            | Self::Checkbox
            | Self::Selectable
            | Self::RadioButton => Shadow::Bool(Default::default()),
            Self::SliderFloat | Self::DragFloat | Self::InputFloat => {
                Shadow::Float(Default::default())
            }
            Self::SliderInt | Self::DragInt | Self::InputInt | Self::Combo | Self::ListBox => {
                Shadow::Int(Default::default())
            }
            Self::InputDouble | Self::InputScalar => Shadow::Double(Default::default()),
            Self::InputText | Self::InputTextMultiline => Shadow::Text(Default::default()),
            Self::ColorEdit3 | Self::ColorEdit4 => Shadow::Color(Default::default()),
            Self::TreeNode => Shadow::TreeNode(Default::default()),
            Self::TabItem => Shadow::TabItem(Default::default()),
            Self::Popup => Shadow::Popup(Default::default()),
            Self::PopupModal => Shadow::PopupModal(Default::default()),
            _ => Shadow::Stateless,
        }
    }
}

/// State a container shares between its direct children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiblingState {
    /// Radio selections made by the user and not yet adopted by the caller.
    pub(crate) radio_pending: HashMap<String, Value>,
    /// Tab the user selected under a tab bar whose tabs are controlled.
    pub(crate) tab_pending: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub id: NodeId,
    pub text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            text: text.into(),
        }
    }
}

#[derive(Debug)]
pub enum Child {
    Node(TreeNode),
    Text(TextNode),
}

impl From<TreeNode> for Child {
    fn from(node: TreeNode) -> Self {
        Self::Node(node)
    }
}

impl From<TextNode> for Child {
    fn from(text: TextNode) -> Self {
        Self::Text(text)
    }
}

impl Child {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Node(node) => node.id,
            Self::Text(text) => text.id,
        }
    }
}

/// A retained node as committed by the reconciler.
#[derive(Debug)]
pub struct TreeNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub props: Props,
    pub handlers: Handlers,
    pub children: Vec<Child>,
    pub(crate) shadow: Shadow,
    pub(crate) scope: SiblingState,
}

impl TreeNode {
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        let kind = kind.into();
        Self {
            id: NodeId::next(),
            shadow: kind.initial_shadow(),
            kind,
            props: Props::new(),
            handlers: Handlers::default(),
            children: Vec::new(),
            scope: SiblingState::default(),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> HandlerResult + 'static,
    {
        self.handlers.insert(name, Handler::new(handler));
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(TextNode::new(text))
    }

    pub fn shadow(&self) -> &Shadow {
        &self.shadow
    }

    /// Concatenated text children, used as a label. Other children are reported and
    /// skipped.
    pub fn inline_text(&self) -> String {
        let mut label = String::new();
        for child in &self.children {
            match child {
                Child::Text(text) => label.push_str(&text.text),
                Child::Node(other) => tracing::warn!(
                    node = %self.id,
                    "<{}> only supports text children; ignoring <{}>",
                    self.kind,
                    other.kind
                ),
            }
        }
        label
    }

    /// `label` prop, else inline text, else `fallback`.
    pub(crate) fn label_or_inline(&self, fallback: &str) -> String {
        use crate::props::PropsExt;

        if let Some(label) = self.props.text("label") {
            return label;
        }

        let inline = self.inline_text();
        if inline.is_empty() {
            fallback.to_string()
        } else {
            inline
        }
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        if self.id == id {
            return Some(self);
        }

        find_in(&mut self.children, id)
    }
}

fn find_in(children: &mut [Child], id: NodeId) -> Option<&mut TreeNode> {
    children.iter_mut().find_map(|child| match child {
        Child::Node(node) => node.find_mut(id),
        Child::Text(_) => None,
    })
}

/// The committed tree: what the renderer walks once per frame.
#[derive(Debug, Default)]
pub struct RetainedTree {
    pub root_children: Vec<Child>,
    pub(crate) scope: SiblingState,
}

impl RetainedTree {
    pub fn new(root_children: Vec<Child>) -> Self {
        Self {
            root_children,
            scope: SiblingState::default(),
        }
    }

    pub fn push(&mut self, child: impl Into<Child>) {
        self.root_children.push(child.into());
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        find_in(&mut self.root_children, id)
    }
}
