//! Output-only widgets and draw-list primitives. Buttons report clicks but hold no value.

use super::{
    ColorFamily, Frame, RenderResult, color_prop, push_style_colors, render_children,
};
use crate::color::Rgba;
use crate::native::{NativeUi, TextureId, Vec2};
use crate::props::{PropsExt, coerce_number, truthy};
use crate::tree::TreeNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Plot {
    Lines,
    Histogram,
}

fn size_props(node: &TreeNode, width: f64, height: f64) -> Vec2 {
    [
        node.props.number("width", width) as f32,
        node.props.number("height", height) as f32,
    ]
}

/// `min`/`max` where `max` must exceed `min`.
fn float_range(node: &TreeNode, default_max: f64) -> (f64, f64) {
    let min = node.props.number("min", 0.0);
    let max = node.props.number("max", default_max);
    if max > min {
        return (min, max);
    }
    tracing::warn!(node = %node.id, "invalid <{}> range: min={min}, max={max}; adjusting max", node.kind);
    (min, min + 1.0)
}

pub(super) fn button<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let mut label = node.inline_text();
    if label.is_empty() {
        label = "Button".to_string();
    }

    let mut size = size_props(node, 0.0, 0.0);
    if let Some(width) = node.props.style_number("width") {
        size[0] = width;
    }
    if let Some(height) = node.props.style_number("height") {
        size[1] = height;
    }
    push_style_colors(frame, &node.props, ColorFamily::Button)?;

    let [label] = frame.scratch.texts([label.as_str()]);
    if frame.ui.button(label, size)? {
        frame.callbacks.fire(&node.handlers, "onClick", &[]);
    }
    Ok(())
}

pub(super) fn text<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let content = node.inline_text();
    let props = &node.props;
    let color = props
        .style_color("color")
        .or_else(|| props.prop("color").filter(|color| truthy(color)))
        .map(Rgba::from_value);

    let [line] = frame.scratch.texts([content.as_str()]);
    if let Some(color) = color {
        frame.ui.text_colored(color.to_vec4(), line)?;
    } else if props.flag("disabled") {
        frame.ui.text_disabled(line)?;
    } else if props.flag("wrapped") {
        frame.ui.text_wrapped(line)?;
    } else {
        frame.ui.text(line)?;
    }
    Ok(())
}

pub(super) fn separator<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>) -> RenderResult {
    frame.ui.separator()?;
    Ok(())
}

pub(super) fn same_line<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let offset = node.props.number("offset", 0.0) as f32;
    let spacing = node.props.number("spacing", -1.0) as f32;
    frame.ui.same_line(offset, spacing)?;
    Ok(())
}

pub(super) fn spacing<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let count = node.props.integer("count", 1).max(1);
    for _ in 0..count {
        frame.ui.spacing()?;
    }
    render_children(frame, node)
}

/// Shapes are placed relative to the layout cursor and do not advance it.
pub(super) fn rect<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let props = &node.props;
    let offset = [props.number("x", 0.0) as f32, props.number("y", 0.0) as f32];
    let [width, height] = size_props(node, 100.0, 100.0);
    let filled = props.prop("filled").is_none_or(truthy);
    let color = props
        .prop("color")
        .map_or(Rgba::WHITE, Rgba::from_value)
        .to_packed();

    let [x, y] = frame.ui.cursor_screen_pos()?;
    let min = [x + offset[0], y + offset[1]];
    let max = [min[0] + width, min[1] + height];
    frame.ui.add_rect(min, max, color, filled)?;
    Ok(())
}

pub(super) fn circle<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let props = &node.props;
    let offset = [props.number("x", 50.0) as f32, props.number("y", 50.0) as f32];
    let radius = props.number("radius", 10.0) as f32;
    let segments = props.integer("segments", 12);
    let filled = props.prop("filled").is_none_or(truthy);
    let color = props
        .prop("color")
        .map_or(Rgba::WHITE, Rgba::from_value)
        .to_packed();

    let [x, y] = frame.ui.cursor_screen_pos()?;
    frame
        .ui
        .add_circle([x + offset[0], y + offset[1]], radius, color, segments, filled)?;
    Ok(())
}

pub(super) fn progress_bar<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let (min, max) = float_range(node, 1.0);
    let value = node.props.number("value", min);
    let fraction = (value - min) / (max - min);
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let size = size_props(node, -1.0, 0.0);
    let overlay = node.props.text("overlay");

    let ([overlay], []) = frame.scratch.prepare([overlay.as_deref()], []);
    frame.ui.progress_bar(fraction as f32, size, overlay)?;
    Ok(())
}

pub(super) fn color_button<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let props = &node.props;
    let label = props
        .text("label")
        .unwrap_or_else(|| "##ColorButton".to_string());
    let color = color_prop(props, "color", Rgba::WHITE).to_vec4();
    let flags = props.bits("flags");
    let size = size_props(node, 0.0, 0.0);

    let [label] = frame.scratch.texts([label.as_str()]);
    if frame.ui.color_button(label, color, flags, size)? {
        frame.callbacks.fire(&node.handlers, "onClick", &[]);
    }
    Ok(())
}

fn texture(node: &TreeNode) -> Option<TextureId> {
    let Some(raw) = node.props.prop("textureId") else {
        tracing::warn!(node = %node.id, "<{}> requires a textureId prop", node.kind);
        return None;
    };

    match coerce_number(raw) {
        Some(id) if id.is_finite() => Some(TextureId(id as usize)),
        _ => {
            tracing::warn!(node = %node.id, "<{}> textureId must be a finite number, got {raw}", node.kind);
            None
        }
    }
}

fn uv_props(node: &TreeNode) -> (Vec2, Vec2) {
    (
        node.props.point("uv0", [0.0, 0.0]),
        node.props.point("uv1", [1.0, 1.0]),
    )
}

pub(super) fn image<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let Some(texture) = texture(node) else {
        return Ok(());
    };
    let size = size_props(node, 0.0, 0.0);
    let (uv0, uv1) = uv_props(node);
    let tint = color_prop(&node.props, "tintColor", Rgba::WHITE).to_vec4();
    let border = color_prop(&node.props, "borderColor", Rgba::TRANSPARENT).to_vec4();

    frame.ui.image(texture, size, uv0, uv1, tint, border)?;
    render_children(frame, node)
}

pub(super) fn image_button<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    if !node.props.flag("id") {
        tracing::warn!(node = %node.id, "<imagebutton> requires an id prop");
        return Ok(());
    }
    let Some(texture) = texture(node) else {
        return Ok(());
    };
    let id = node.props.text("id").unwrap_or_default();
    let size = size_props(node, 0.0, 0.0);
    let (uv0, uv1) = uv_props(node);
    let background = color_prop(&node.props, "backgroundColor", Rgba::TRANSPARENT).to_vec4();
    let tint = color_prop(&node.props, "tintColor", Rgba::WHITE).to_vec4();

    let [id] = frame.scratch.texts([id.as_str()]);
    if frame
        .ui
        .image_button(id, texture, size, uv0, uv1, background, tint)?
    {
        frame.callbacks.fire(&node.handlers, "onClick", &[]);
    }
    render_children(frame, node)
}

pub(super) fn plot<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
    plot: Plot,
) -> RenderResult {
    let values = node.props.floats("values");
    if values.is_empty() {
        return Ok(());
    }

    let props = &node.props;
    let label = props.text("label").unwrap_or_default();
    let overlay = props.text("overlay");
    let scale_min = props.number_opt("scaleMin", 0.0).map_or(f32::MAX, |v| v as f32);
    let scale_max = props.number_opt("scaleMax", 0.0).map_or(f32::MAX, |v| v as f32);
    let size = size_props(node, 0.0, 0.0);

    let ([label, overlay], []) = frame
        .scratch
        .prepare([Some(label.as_str()), overlay.as_deref()], []);
    let label = label.unwrap_or_default();
    match plot {
        Plot::Lines => frame
            .ui
            .plot_lines(label, &values, overlay, scale_min, scale_max, size)?,
        Plot::Histogram => frame
            .ui
            .plot_histogram(label, &values, overlay, scale_min, scale_max, size)?,
    }
    Ok(())
}
