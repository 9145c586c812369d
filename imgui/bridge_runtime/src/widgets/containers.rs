//! Widgets that open a native scope and render their children inside it.

use serde_json::Value;

use super::{
    ColorFamily, Frame, Parent, RenderResult, push_style_colors, render_children, text_children,
};
use crate::cleanup::Teardown;
use crate::native::{
    Cond, NativeUi, StyleVar, TAB_ITEM_FLAGS_SET_SELECTED, TABLE_FLAGS_RESIZABLE,
    TREE_NODE_FLAGS_NO_TREE_PUSH_ON_OPEN, Vec2, window_flags,
};
use crate::props::{PropsExt, coerce_number, coerce_string, truthy};
use crate::tree::{Child, NodeKind, TreeNode};

const ROOT_FLAGS: i32 = window_flags::NO_DECORATION
    | window_flags::NO_MOVE
    | window_flags::NO_SAVED_SETTINGS
    | window_flags::NO_BRING_TO_FRONT_ON_FOCUS
    | window_flags::NO_BACKGROUND;

const WINDOW_FLAG_PROPS: [(&str, i32); 19] = [
    ("noTitleBar", window_flags::NO_TITLE_BAR),
    ("noResize", window_flags::NO_RESIZE),
    ("noMove", window_flags::NO_MOVE),
    ("noScrollbar", window_flags::NO_SCROLLBAR),
    ("noScrollWithMouse", window_flags::NO_SCROLL_WITH_MOUSE),
    ("noCollapse", window_flags::NO_COLLAPSE),
    ("alwaysAutoResize", window_flags::ALWAYS_AUTO_RESIZE),
    ("noBackground", window_flags::NO_BACKGROUND),
    ("noSavedSettings", window_flags::NO_SAVED_SETTINGS),
    ("noMouseInputs", window_flags::NO_MOUSE_INPUTS),
    ("horizontalScrollbar", window_flags::HORIZONTAL_SCROLLBAR),
    ("noFocusOnAppearing", window_flags::NO_FOCUS_ON_APPEARING),
    ("noBringToFrontOnFocus", window_flags::NO_BRING_TO_FRONT_ON_FOCUS),
    ("alwaysVerticalScrollbar", window_flags::ALWAYS_VERTICAL_SCROLLBAR),
    ("alwaysHorizontalScrollbar", window_flags::ALWAYS_HORIZONTAL_SCROLLBAR),
    ("alwaysUseWindowPadding", window_flags::ALWAYS_USE_WINDOW_PADDING),
    ("noNavInputs", window_flags::NO_NAV_INPUTS),
    ("noNavFocus", window_flags::NO_NAV_FOCUS),
    ("unsavedDocument", window_flags::UNSAVED_DOCUMENT),
];

const NO_PIVOT: Vec2 = [0.0, 0.0];

/// A non-empty string prop, else `fallback`.
fn name_prop(node: &TreeNode, key: &str, fallback: impl FnOnce() -> String) -> String {
    node.props
        .prop(key)
        .filter(|value| truthy(value))
        .map(coerce_string)
        .unwrap_or_else(fallback)
}

pub(super) fn root<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let viewport = frame.ui.main_viewport()?;
    frame.ui.set_next_window_pos(viewport.pos, Cond::Always, NO_PIVOT)?;
    frame.ui.set_next_window_size(viewport.size, Cond::Always)?;

    let [title] = frame.scratch.texts(["##Root"]);
    let visible = frame.ui.begin_window(title, None, ROOT_FLAGS)?;
    frame.defer(Teardown::EndWindow);

    if visible {
        render_children(frame, node)?;
    }
    Ok(())
}

pub(super) fn window<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let props = &node.props;
    let title = name_prop(node, "title", || "Window".to_string());

    let controls_pos = props.has("x") || props.has("y");
    let controls_size = props.has("width") || props.has("height");
    let defaults_pos = props.has("defaultX") || props.has("defaultY");
    let defaults_size = props.has("defaultWidth") || props.has("defaultHeight");
    if controls_pos && defaults_pos {
        tracing::warn!(node = %node.id, "window \"{title}\" has both x/y and defaultX/defaultY; using x/y");
    }
    if controls_size && defaults_size {
        tracing::warn!(
            node = %node.id,
            "window \"{title}\" has both width/height and defaultWidth/defaultHeight; using width/height"
        );
    }

    let pair = |x: &str, y: &str| [props.number(x, 0.0) as f32, props.number(y, 0.0) as f32];
    let state = node.shadow.window();

    let pos = controls_pos.then(|| {
        let value = pair("x", "y");
        state.pos.resolve(Some(value), || value)
    });
    match &pos {
        Some(resolved) if resolved.authoritative => {
            frame.ui.set_next_window_pos(resolved.value, Cond::Always, NO_PIVOT)?;
        }
        Some(_) => {}
        None if defaults_pos => {
            frame.ui.set_next_window_pos(pair("defaultX", "defaultY"), Cond::Once, NO_PIVOT)?;
        }
        None => {}
    }

    let size = controls_size.then(|| {
        let value = pair("width", "height");
        state.size.resolve(Some(value), || value)
    });
    match &size {
        Some(resolved) if resolved.authoritative => {
            let [width, height] = resolved.value;
            if width > 0.0 && height > 0.0 {
                frame.ui.set_next_window_size(resolved.value, Cond::Always)?;
            } else {
                tracing::warn!(
                    node = %node.id,
                    "window \"{title}\" has invalid size {width}x{height}; size must be positive"
                );
            }
        }
        Some(_) => {}
        None if defaults_size => {
            frame.ui.set_next_window_size(pair("defaultWidth", "defaultHeight"), Cond::Once)?;
        }
        None => {}
    }

    let mut flags = props.bits("flags");
    for (key, flag) in WINDOW_FLAG_PROPS {
        if props.flag(key) {
            flags |= flag;
        }
    }
    let has_menu_bar = node.children.iter().any(|child| {
        matches!(child, Child::Node(menu_bar) if menu_bar.kind == NodeKind::MenuBar)
    });
    if props.flag("menuBar") || has_menu_bar {
        flags |= window_flags::MENU_BAR;
    }

    let closable = node.handlers.contains("onClose");
    let mut open = true;
    let [title] = frame.scratch.texts([title.as_str()]);
    let visible = frame.ui.begin_window(title, closable.then_some(&mut open), flags)?;
    frame.defer(Teardown::EndWindow);

    if visible {
        let state = node.shadow.window();
        let mut changed = false;
        let mut reported_pos = pos.as_ref().map_or([0.0; 2], |resolved| resolved.value);
        let mut reported_size = size.as_ref().map_or([0.0; 2], |resolved| resolved.value);

        if let Some(resolved) = &pos {
            reported_pos = frame.ui.window_pos()?;
            changed |= state.pos.settle(resolved, reported_pos).is_some();
        }
        if let Some(resolved) = &size {
            reported_size = frame.ui.window_size()?;
            changed |= state.size.settle(resolved, reported_size).is_some();
        }

        if changed {
            let [x, y] = reported_pos;
            let [width, height] = reported_size;
            frame.callbacks.notify(
                &node.handlers,
                "onWindowState",
                &[x.into(), y.into(), width.into(), height.into()],
            );
        }

        render_children(frame, node)?;
    }

    frame.close();

    if closable && node.shadow.window().close.observe(open) {
        frame.callbacks.notify(&node.handlers, "onClose", &[]);
    }
    Ok(())
}

pub(super) fn demo_window<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let controlled = node.props.prop("open").map(truthy);
    let default_open = node.props.flag("defaultOpen");
    let shadow = node.shadow.boolean();
    let resolved = shadow.resolve(controlled, || default_open);

    let mut open = resolved.value;
    frame.ui.show_demo_window(&mut open)?;

    if let Some(open) = shadow.settle(&resolved, open) {
        frame.callbacks.fire(&node.handlers, "onChange", &super::arg(open));
    }
    if resolved.value && !open {
        frame.callbacks.notify(&node.handlers, "onClose", &[]);
    }
    Ok(())
}

pub(super) fn child<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let props = &node.props;
    let size = [
        props.number("width", 0.0) as f32,
        props.number("height", 0.0) as f32,
    ];

    let mut flags = 0;
    if props.flag("noScrollbar") {
        flags |= window_flags::NO_SCROLLBAR | window_flags::NO_SCROLL_WITH_MOUSE;
    }

    if props.flag("noPadding") {
        frame.ui.push_style_var_vec2(StyleVar::WindowPadding, [0.0, 0.0])?;
        frame.defer(Teardown::PopStyleVar(1));
    }

    let [id] = frame.scratch.texts(["Content"]);
    let visible = frame.ui.begin_child(id, size, flags)?;
    frame.defer(Teardown::EndChild);

    if visible {
        render_children(frame, node)?;
    }
    Ok(())
}

pub(super) fn menu_bar<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    if !frame.ui.begin_menu_bar()? {
        return Ok(());
    }
    frame.defer(Teardown::EndMenuBar);
    render_children(frame, node)
}

pub(super) fn main_menu_bar<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    if !frame.ui.begin_main_menu_bar()? {
        return Ok(());
    }
    frame.defer(Teardown::EndMainMenuBar);
    render_children(frame, node)
}

pub(super) fn menu<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let label = node.props.text("label").unwrap_or_else(|| {
        let inline = text_children(node);
        if inline.is_empty() { "Menu".to_string() } else { inline }
    });
    let enabled = node.props.prop("enabled") != Some(&Value::Bool(false));

    let [label] = frame.scratch.texts([label.as_str()]);
    if !frame.ui.begin_menu(label, enabled)? {
        return Ok(());
    }
    frame.defer(Teardown::EndMenu);
    render_children(frame, node)
}

pub(super) fn group<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    frame.ui.begin_group()?;
    frame.defer(Teardown::EndGroup);
    render_children(frame, node)
}

pub(super) fn indent<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    frame.ui.indent(0.0)?;
    frame.defer(Teardown::Unindent);
    render_children(frame, node)
}

pub(super) fn collapsing_header<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let title = name_prop(node, "title", || "Section".to_string());
    let [title] = frame.scratch.texts([title.as_str()]);
    if frame.ui.collapsing_header(title, 0)? {
        render_children(frame, node)?;
    }
    Ok(())
}

pub(super) fn tree_node<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let label = node.label_or_inline("Tree");
    push_style_colors(frame, &node.props, ColorFamily::Header)?;

    let props = &node.props;
    let flags = props.bits("flags");
    if let Some(open) = props.prop("open") {
        frame.ui.set_next_item_open(truthy(open), Cond::Always)?;
    } else if props.has("defaultOpen") {
        let state = node.shadow.tree_node();
        if !state.default_applied {
            frame.ui.set_next_item_open(props.flag("defaultOpen"), Cond::Once)?;
            state.default_applied = true;
        }
    }

    let id = props.text("id");
    let ([id, label], []) = frame.scratch.prepare([id.as_deref(), Some(label.as_str())], []);
    let opened = frame.ui.tree_node(id, label.unwrap_or_default(), flags)?;

    if frame.ui.is_item_toggled_open()? {
        frame.callbacks.notify(&node.handlers, "onToggle", &super::arg(opened));
    }

    if opened {
        if flags & TREE_NODE_FLAGS_NO_TREE_PUSH_ON_OPEN == 0 {
            frame.defer(Teardown::TreePop);
        }
        render_children(frame, node)?;
    }
    Ok(())
}

pub(super) fn tab_bar<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let id = node
        .props
        .text("id")
        .unwrap_or_else(|| format!("TabBar##{}", node.id));
    let flags = node.props.bits("flags");

    let [id] = frame.scratch.texts([id.as_str()]);
    if !frame.ui.begin_tab_bar(id, flags)? {
        return Ok(());
    }
    frame.defer(Teardown::EndTabBar);
    render_children(frame, node)
}

/// Tabs whose `selected` prop is controlled do not re-assert selection every frame:
/// only when the caller moves it, or when a user click is waiting in the parent's
/// pending slot for the caller to adopt.
pub(super) fn tab_item<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
    parent: &mut Parent<'_>,
) -> RenderResult {
    let label = node.label_or_inline("Tab");
    let props = &node.props;
    let tab_key = props
        .text("id")
        .unwrap_or_else(|| format!("{label}##{}", node.id));
    let controlled = props.has("selected");
    let selected = props.flag("selected");

    let frame_id = frame.ui.frame_count()?;
    let state = node.shadow.tab_item();
    if state.last_frame != Some(frame_id) {
        state.prev_active = state.was_active;
        state.last_frame = Some(frame_id);
    }
    let was_active = state.prev_active;

    let mut flags = props.bits("flags");
    if controlled {
        let mut select = selected && !was_active;
        let mut pending_match = false;
        if let Some(pending) = parent.siblings.tab_pending.as_deref() {
            if pending == tab_key {
                pending_match = true;
                select = true;
                if selected {
                    parent.siblings.tab_pending = None;
                }
            } else {
                select = false;
            }
        }

        if !pending_match && state.selection_suppressed {
            select = false;
        } else if pending_match && state.selection_suppressed && !selected {
            state.selection_suppressed = false;
        }

        if select {
            flags |= TAB_ITEM_FLAGS_SET_SELECTED;
        }
    } else if selected {
        flags |= TAB_ITEM_FLAGS_SET_SELECTED;
    } else if props.flag("defaultSelected") && !state.default_selected {
        flags |= TAB_ITEM_FLAGS_SET_SELECTED;
        state.default_selected = true;
    }

    let closable = node.handlers.contains("onClose");
    let mut open = true;
    let [label] = frame.scratch.texts([label.as_str()]);
    let active = frame.ui.begin_tab_item(label, closable.then_some(&mut open), flags)?;
    if active {
        frame.defer(Teardown::EndTabItem);
    }

    if closable && node.shadow.tab_item().close.observe(open) {
        frame.callbacks.notify(&node.handlers, "onClose", &[]);
    }

    let rendered = if active {
        if controlled && !was_active && !selected {
            parent.siblings.tab_pending = Some(tab_key);
        }
        if !was_active {
            frame.callbacks.fire(&node.handlers, "onSelect", &[]);
        }
        render_children(frame, node)
    } else {
        Ok(())
    };

    let state = node.shadow.tab_item();
    if controlled {
        if !active && was_active && selected {
            state.selection_suppressed = true;
        } else if state.selection_suppressed && (!selected || active) {
            state.selection_suppressed = false;
        }
    }
    state.was_active = active;

    rendered
}

pub(super) fn table<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let id = name_prop(node, "id", || "table".to_string());
    let columns = node.props.integer("columns", 1);
    if columns <= 0 {
        tracing::warn!(node = %node.id, "<table> requires a positive 'columns' prop, got {columns}; skipping table");
        return Ok(());
    }
    let flags = if node.props.has("flags") {
        node.props.bits("flags")
    } else {
        TABLE_FLAGS_RESIZABLE
    };

    let [id] = frame.scratch.texts([id.as_str()]);
    if !frame.ui.begin_table(id, columns, flags, [0.0, 0.0], 0.0)? {
        return Ok(());
    }
    frame.defer(Teardown::EndTable);
    render_children(frame, node)
}

pub(super) fn table_header<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>) -> RenderResult {
    frame.ui.table_headers_row()?;
    Ok(())
}

pub(super) fn table_row<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let flags = node.props.bits("flags");
    let min_height = node.props.number("minHeight", 0.0) as f32;
    frame.ui.table_next_row(flags, min_height)?;
    render_children(frame, node)
}

pub(super) fn table_cell<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    frame.ui.table_set_column_index(node.props.integer("index", 0))?;
    render_children(frame, node)
}

pub(super) fn table_column<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let label = name_prop(node, "label", String::new);
    let flags = node.props.bits("flags");
    let width = node.props.number("width", 0.0) as f32;

    let [label] = frame.scratch.texts([label.as_str()]);
    frame.ui.table_setup_column(label, flags, width)?;
    Ok(())
}

pub(super) fn tooltip<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let began = if node.props.flag("followItem") {
        frame.ui.begin_item_tooltip()?
    } else if node.props.flag("open") {
        frame.ui.begin_tooltip()?
    } else {
        false
    };

    if !began {
        return Ok(());
    }
    frame.defer(Teardown::EndTooltip);
    render_children(frame, node)
}

pub(super) fn popup<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let id = node
        .props
        .text("id")
        .unwrap_or_else(|| format!("Popup##{}", node.id));
    let flags = node.props.bits("flags");
    let open = node.props.prop("open");
    let state = node.shadow.popup();

    let [id_c] = frame.scratch.texts([id.as_str()]);
    match open {
        Some(Value::Bool(true)) => frame.ui.open_popup(id_c)?,
        None if node.props.flag("defaultOpen") && !state.opened_once => {
            frame.ui.open_popup(id_c)?;
            state.opened_once = true;
        }
        _ => {}
    }

    if open == Some(&Value::Bool(false)) {
        state.was_open = false;
        return Ok(());
    }

    if frame.ui.begin_popup(id_c, flags)? {
        frame.defer(Teardown::EndPopup);
        render_children(frame, node)?;
        frame.close();
    }

    let [id_c] = frame.scratch.texts([id.as_str()]);
    let open_now = frame.ui.is_popup_open(id_c)?;
    let was_open = std::mem::replace(&mut node.shadow.popup().was_open, open_now);
    if was_open && !open_now {
        frame.callbacks.notify(&node.handlers, "onClose", &[]);
    }
    Ok(())
}

/// Modals close three ways: the caller flips `open` to false, the user hits the close
/// button, or the native library closes it. `onClose` fires once per close, and a
/// controlled modal is not reopened until the caller has acknowledged the close.
pub(super) fn popup_modal<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let props = &node.props;
    let id = props
        .text("id")
        .unwrap_or_else(|| format!("PopupModal##{}", node.id));
    let flags = props.bits("flags");
    let controlled = props.has("open");
    let desired = props.flag("open");
    let closable = node.handlers.contains("onClose");

    let state = node.shadow.popup_modal();
    let was_open = state.was_open;
    let mut should_open = false;
    if controlled {
        if desired && !state.pending_close && !was_open {
            should_open = true;
        } else if !desired {
            state.pending_close = false;
        }
    } else if props.flag("defaultOpen") && !state.opened_once {
        should_open = true;
        state.opened_once = true;
    }

    let [id_c] = frame.scratch.texts([id.as_str()]);
    if should_open {
        frame.ui.open_popup(id_c)?;
    }

    let mut open = true;
    if frame
        .ui
        .begin_popup_modal(id_c, closable.then_some(&mut open), flags)?
    {
        frame.defer(Teardown::EndPopup);
        if controlled && !desired && was_open {
            frame.ui.close_current_popup()?;
        }
        render_children(frame, node)?;
        frame.close();
    }

    let [id_c] = frame.scratch.texts([id.as_str()]);
    let mut open_now = frame.ui.is_popup_open(id_c)?;
    if controlled && !desired && open_now {
        frame.ui.close_current_popup()?;
        open_now = false;
    }

    let state = node.shadow.popup_modal();
    let mut notify_close = false;
    if closable {
        if !open {
            if open_now {
                frame.ui.close_current_popup()?;
                open_now = false;
            }
            notify_close = !state.close_notified;
        } else {
            state.close_notified = false;
            if !controlled {
                state.pending_close = false;
            }
        }
    }
    if was_open && !open_now && closable && !state.close_notified {
        notify_close = true;
    }

    if notify_close {
        if controlled {
            state.pending_close = true;
        }
        state.close_notified = true;
        frame.callbacks.notify(&node.handlers, "onClose", &[]);
    }

    if open_now && controlled && desired {
        state.pending_close = false;
    }
    state.was_open = open_now;
    Ok(())
}

pub(super) fn dock_space<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    if !frame.ui.supports_docking() {
        if !*frame.docking_warned {
            tracing::warn!("<dockspace> requested but docking is not available in the native library");
            *frame.docking_warned = true;
        }
        return Ok(());
    }

    let props = &node.props;
    let flags = props.bits("flags");
    if props.flag("useViewport") {
        frame.ui.dock_space_over_viewport(flags)?;
        return Ok(());
    }

    let id = props
        .prop("id")
        .and_then(coerce_number)
        .filter(|id| id.is_finite())
        .map_or(node.id.0 as u32, |id| id as i64 as u32);
    let size = props.point("size", [0.0, 0.0]);
    frame.ui.dock_space(id, size, flags)?;
    Ok(())
}
