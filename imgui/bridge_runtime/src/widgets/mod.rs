//! Per-kind widget routines and the recursive walk that dispatches to them.

mod containers;
mod display;
mod inputs;

use serde_json::Value;

use crate::callback::Callbacks;
use crate::cleanup::{CleanupStack, Teardown};
use crate::color::Rgba;
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::native::{NativeUi, StyleColor, Vec4};
use crate::props::{Props, PropsExt};
use crate::scratch::ScratchArena;
use crate::tree::{Child, NodeId, NodeKind, SiblingState, TextNode, TreeNode};

pub(crate) type RenderResult = Result<(), RenderError>;

/// Everything a widget routine touches during one `render_frame` call.
pub(crate) struct Frame<'a, U: NativeUi + ?Sized> {
    pub(crate) ui: &'a mut U,
    pub(crate) cleanup: &'a mut CleanupStack,
    pub(crate) scratch: &'a mut ScratchArena,
    pub(crate) config: &'a RendererConfig,
    pub(crate) callbacks: Callbacks<'a>,
    pub(crate) docking_warned: &'a mut bool,
}

impl<U: NativeUi + ?Sized> Frame<'_, U> {
    fn push_id(&mut self, id: NodeId) -> RenderResult {
        self.ui.push_id(id.0)?;
        self.cleanup.push(Teardown::PopId);
        Ok(())
    }

    pub(crate) fn defer(&mut self, teardown: Teardown) {
        self.cleanup.push(teardown);
    }

    /// Runs the innermost pending teardown now.
    pub(crate) fn close(&mut self) {
        self.cleanup.pop_one(&mut *self.ui);
    }

    pub(crate) fn unwind_to(&mut self, depth: usize) {
        self.cleanup.unwind_to(&mut *self.ui, depth);
    }
}

/// The container whose children are being rendered.
pub(crate) struct Parent<'s> {
    /// `None` for the top level of the tree.
    pub(crate) id: Option<NodeId>,
    pub(crate) siblings: &'s mut SiblingState,
}

/// Renders one child and runs every teardown it left behind, on success and on failure.
pub(crate) fn render_child<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    child: &mut Child,
    parent: &mut Parent<'_>,
) -> RenderResult {
    let depth = frame.cleanup.depth();
    let result = match child {
        Child::Text(text) => render_text_leaf(frame, text),
        Child::Node(node) => render_node(frame, node, parent),
    };
    frame.unwind_to(depth);
    result
}

fn render_text_leaf<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, text: &TextNode) -> RenderResult {
    frame.push_id(text.id)?;
    let [line] = frame.scratch.texts([text.text.as_str()]);
    frame.ui.text(line)?;
    Ok(())
}

fn render_node<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
    parent: &mut Parent<'_>,
) -> RenderResult {
    frame.push_id(node.id)?;
    dispatch(frame, node, parent).map_err(|err| err.within(node.id, &node.kind))
}

fn dispatch<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
    parent: &mut Parent<'_>,
) -> RenderResult {
    use NodeKind as K;

    match node.kind {
        K::Root => containers::root(frame, node),
        K::Window => containers::window(frame, node),
        K::DemoWindow => containers::demo_window(frame, node),
        K::Child => containers::child(frame, node),
        K::MenuBar => containers::menu_bar(frame, node),
        K::MainMenuBar => containers::main_menu_bar(frame, node),
        K::Menu => containers::menu(frame, node),
        K::Group => containers::group(frame, node),
        K::Indent => containers::indent(frame, node),
        K::CollapsingHeader => containers::collapsing_header(frame, node),
        K::TreeNode => containers::tree_node(frame, node),
        K::TabBar => containers::tab_bar(frame, node),
        K::TabItem => containers::tab_item(frame, node, parent),
        K::Table => containers::table(frame, node),
        K::TableHeader => containers::table_header(frame),
        K::TableRow => containers::table_row(frame, node),
        K::TableCell => containers::table_cell(frame, node),
        K::TableColumn => containers::table_column(frame, node),
        K::Tooltip => containers::tooltip(frame, node),
        K::Popup => containers::popup(frame, node),
        K::PopupModal => containers::popup_modal(frame, node),
        K::DockSpace => containers::dock_space(frame, node),

        K::Button => display::button(frame, node),
        K::Text => display::text(frame, node),
        K::Separator => display::separator(frame),
        K::SameLine => display::same_line(frame, node),
        K::Spacing => display::spacing(frame, node),
        K::Rect => display::rect(frame, node),
        K::Circle => display::circle(frame, node),
        K::ProgressBar => display::progress_bar(frame, node),
        K::ColorButton => display::color_button(frame, node),
        K::Image => display::image(frame, node),
        K::ImageButton => display::image_button(frame, node),
        K::PlotLines => display::plot(frame, node, display::Plot::Lines),
        K::PlotHistogram => display::plot(frame, node, display::Plot::Histogram),

        K::MenuItem => inputs::menu_item(frame, node),
        K::Checkbox => inputs::checkbox(frame, node),
        K::SliderFloat => inputs::slider_float(frame, node),
        K::SliderInt => inputs::slider_int(frame, node),
        K::DragFloat => inputs::drag_float(frame, node),
        K::DragInt => inputs::drag_int(frame, node),
        K::InputText => inputs::input_text(frame, node, inputs::TextLines::Single),
        K::InputTextMultiline => inputs::input_text(frame, node, inputs::TextLines::Multi),
        K::InputFloat => inputs::input_float(frame, node),
        K::InputInt => inputs::input_int(frame, node),
        K::InputDouble => inputs::input_double(frame, node),
        K::InputScalar => inputs::input_scalar(frame, node),
        K::Combo => inputs::item_list(frame, node, inputs::ItemList::Combo),
        K::ListBox => inputs::item_list(frame, node, inputs::ItemList::ListBox),
        K::Selectable => inputs::selectable(frame, node),
        K::RadioButton => inputs::radio_button(frame, node, parent),
        K::ColorEdit3 => inputs::color_edit(frame, node, false),
        K::ColorEdit4 => inputs::color_edit(frame, node, true),

        K::Unknown(_) => render_children(frame, node),
    }
}

/// Renders the children of `node` in order, with `node` as their parent scope.
pub(crate) fn render_children<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let TreeNode {
        id,
        children,
        scope,
        ..
    } = node;
    let mut parent = Parent {
        id: Some(*id),
        siblings: scope,
    };

    for child in children.iter_mut() {
        render_child(frame, child, &mut parent)?;
    }
    Ok(())
}

/// Concatenated text children, skipping anything else silently. Menus take their label
/// this way because their other children are menu items.
pub(crate) fn text_children(node: &TreeNode) -> String {
    node.children
        .iter()
        .filter_map(|child| match child {
            Child::Text(text) => Some(text.text.as_str()),
            Child::Node(_) => None,
        })
        .collect()
}

/// The `label` prop, or `fallback` when it is absent.
pub(crate) fn label_prop(props: &Props, fallback: &str) -> String {
    props.text("label").unwrap_or_else(|| fallback.to_string())
}

/// `key` as a color, or `fallback` when the prop is absent.
pub(crate) fn color_prop(props: &Props, key: &str, fallback: Rgba) -> Rgba {
    props.prop(key).map_or(fallback, Rgba::from_value)
}

/// Style color slots overridden by `style.backgroundColor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorFamily {
    Button,
    Frame,
    Header,
}

impl ColorFamily {
    fn slots(self) -> [StyleColor; 3] {
        match self {
            Self::Button => [
                StyleColor::Button,
                StyleColor::ButtonHovered,
                StyleColor::ButtonActive,
            ],
            Self::Frame => [
                StyleColor::FrameBg,
                StyleColor::FrameBgHovered,
                StyleColor::FrameBgActive,
            ],
            Self::Header => [
                StyleColor::Header,
                StyleColor::HeaderHovered,
                StyleColor::HeaderActive,
            ],
        }
    }
}

/// Pushes `style.backgroundColor` over the family's three state colors and `style.color`
/// over the text color. Whatever was pushed is popped by a single teardown, even when a
/// later push fails.
pub(crate) fn push_style_colors<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    props: &Props,
    family: ColorFamily,
) -> RenderResult {
    let mut colors: Vec<(StyleColor, Vec4)> = Vec::with_capacity(4);
    if let Some(background) = props.style_color("backgroundColor") {
        let color = Rgba::from_value(background).to_vec4();
        colors.extend(family.slots().map(|slot| (slot, color)));
    }
    if let Some(text) = props.style_color("color") {
        colors.push((StyleColor::Text, Rgba::from_value(text).to_vec4()));
    }

    let mut pushed = 0;
    let mut outcome = Ok(());
    for (slot, color) in colors {
        if let Err(err) = frame.ui.push_style_color(slot, color) {
            outcome = Err(err);
            break;
        }
        pushed += 1;
    }

    if pushed > 0 {
        frame.defer(Teardown::PopStyleColor(pushed));
    }
    outcome.map_err(RenderError::from)
}

/// `style.width` as the next item width.
pub(crate) fn push_style_item_width<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    props: &Props,
) -> RenderResult {
    if let Some(width) = props.style_number("width") {
        frame.ui.push_item_width(width)?;
        frame.defer(Teardown::PopItemWidth);
    }
    Ok(())
}

/// Arguments for a callback that reports a single value.
pub(crate) fn arg(value: impl Into<Value>) -> [Value; 1] {
    [value.into()]
}
