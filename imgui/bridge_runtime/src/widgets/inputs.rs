//! Widgets that hold a value. Each one resolves what to show through the node's
//! [`ValueShadow`](crate::shadow::ValueShadow), makes one native call with that value in
//! a scratch cell, and reports a settled difference through `onChange`.

use serde_json::Value;

use super::{
    ColorFamily, Frame, Parent, RenderResult, arg, label_prop, push_style_colors,
    push_style_item_width,
};
use crate::color::Rgba;
use crate::native::NativeUi;
use crate::props::{PropsExt, coerce_string, truthy};
use crate::scratch::{Scalar, ScalarKind};
use crate::shadow::{Mode, Resolved};
use crate::tree::TreeNode;
use crate::utf8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextLines {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemList {
    Combo,
    ListBox,
}

/// Slider labels come from a non-empty string prop only.
fn slider_label(node: &TreeNode) -> String {
    node.props
        .prop("label")
        .and_then(Value::as_str)
        .filter(|label| !label.is_empty())
        .unwrap_or("Slider")
        .to_string()
}

fn format_prop(node: &TreeNode, fallback: &str) -> String {
    node.props
        .text("format")
        .unwrap_or_else(|| fallback.to_string())
}

fn scalar_value(scalar: Scalar) -> Value {
    match scalar {
        Scalar::I32(v) => v.into(),
        Scalar::U32(v) => v.into(),
        Scalar::F32(v) => v.into(),
        Scalar::F64(v) => v.into(),
    }
}

pub(super) fn menu_item<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let label = node.label_or_inline("Item");
    let props = &node.props;
    let shortcut = props.text("shortcut").filter(|shortcut| !shortcut.is_empty());
    let enabled = props.prop("enabled") != Some(&Value::Bool(false));
    let toggles = node.handlers.contains("onChange")
        || props.has("defaultSelected")
        || props.flag("toggle");

    if !toggles {
        let selected = props.flag("selected");
        let ([label, shortcut], []) = frame
            .scratch
            .prepare([Some(label.as_str()), shortcut.as_deref()], []);
        if frame
            .ui
            .menu_item(label.unwrap_or_default(), shortcut, selected, enabled)?
        {
            frame.callbacks.fire(&node.handlers, "onSelect", &[]);
        }
        return Ok(());
    }

    let controlled = props.prop("selected").map(truthy);
    let default = props.flag("defaultSelected");
    let shadow = node.shadow.boolean();
    let resolved = shadow.resolve(controlled, || default);

    let mut selected = resolved.value;
    let ([label, shortcut], []) = frame
        .scratch
        .prepare([Some(label.as_str()), shortcut.as_deref()], []);
    let activated =
        frame
            .ui
            .menu_item_toggle(label.unwrap_or_default(), shortcut, &mut selected, enabled)?;

    let changed = shadow.settle(&resolved, selected).is_some();
    if activated || changed {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(selected));
    }
    if activated {
        frame.callbacks.fire(&node.handlers, "onSelect", &arg(selected));
    }
    Ok(())
}

pub(super) fn checkbox<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let label = node.label_or_inline("Checkbox");
    let controlled = node.props.prop("checked").map(truthy);
    let default = node.props.flag("defaultChecked");
    push_style_colors(frame, &node.props, ColorFamily::Frame)?;
    push_style_item_width(frame, &node.props)?;

    let shadow = node.shadow.boolean();
    let resolved = shadow.resolve(controlled, || default);
    let mut checked = resolved.value;
    let [label] = frame.scratch.texts([label.as_str()]);
    frame.ui.checkbox(label, &mut checked)?;

    if let Some(checked) = shadow.settle(&resolved, checked) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(checked));
    }
    Ok(())
}

pub(super) fn slider_float<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let label = slider_label(node);
    let props = &node.props;
    let min = props.number("min", 0.0);
    let mut max = props.number("max", 1.0);
    if !(max > min) {
        tracing::warn!(node = %node.id, "invalid <sliderfloat> range: min={min}, max={max}; adjusting max");
        max = min + 1.0;
    }
    let (min, max) = (min as f32, max as f32);
    let format = format_prop(node, "%.3f");
    let flags = props.bits("flags");

    let controlled = props
        .number_opt("value", f64::from(min))
        .map(|value| (value as f32).clamp(min, max));
    let default = (props.number("defaultValue", f64::from(min)) as f32).clamp(min, max);

    let shadow = node.shadow.float();
    let resolved = shadow.resolve(controlled, || default);
    let mut value = resolved.value;
    let [label, format] = frame.scratch.texts([label.as_str(), format.as_str()]);
    frame
        .ui
        .slider_float(label, &mut value, min, max, format, flags)?;

    if !value.is_finite() {
        return Ok(());
    }
    if let Some(value) = shadow.settle(&resolved, value.clamp(min, max)) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(value));
    }
    Ok(())
}

pub(super) fn slider_int<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let label = slider_label(node);
    let props = &node.props;
    let min = props.integer("min", 0);
    let mut max = props.integer("max", 100);
    if max < min {
        tracing::warn!(node = %node.id, "invalid <sliderint> range: min={min}, max={max}; adjusting max");
        max = min;
    }
    if max == min {
        max = min.saturating_add(1);
    }
    let format = format_prop(node, "%d");
    let flags = props.bits("flags");

    let controlled = props
        .integer_opt("value", min)
        .map(|value| value.clamp(min, max));
    let default = props.integer("defaultValue", min).clamp(min, max);

    let shadow = node.shadow.int();
    let resolved = shadow.resolve(controlled, || default);
    let mut value = resolved.value;
    let [label, format] = frame.scratch.texts([label.as_str(), format.as_str()]);
    frame
        .ui
        .slider_int(label, &mut value, min, max, format, flags)?;

    if let Some(value) = shadow.settle(&resolved, value.clamp(min, max)) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(value));
    }
    Ok(())
}

/// Drag ranges are handed to the native widget as given; `min == max` means unbounded.
pub(super) fn drag_float<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let label = label_prop(&node.props, "Drag");
    let props = &node.props;
    let speed = props.number("speed", 1.0) as f32;
    let min = props.number("min", 0.0) as f32;
    let max = props.number("max", 0.0) as f32;
    let format = format_prop(node, "%.3f");
    let flags = props.bits("flags");
    let controlled = props.number_opt("value", 0.0).map(|value| value as f32);
    let default = props.number("defaultValue", 0.0) as f32;

    let shadow = node.shadow.float();
    let resolved = shadow.resolve(controlled, || default);
    let mut value = resolved.value;
    let [label, format] = frame.scratch.texts([label.as_str(), format.as_str()]);
    frame
        .ui
        .drag_float(label, &mut value, speed, min, max, format, flags)?;

    if !value.is_finite() {
        return Ok(());
    }
    if let Some(value) = shadow.settle(&resolved, value) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(value));
    }
    Ok(())
}

pub(super) fn drag_int<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let label = label_prop(&node.props, "Drag");
    let props = &node.props;
    let speed = props.number("speed", 1.0) as f32;
    let min = props.integer("min", 0);
    let max = props.integer("max", 0);
    let format = format_prop(node, "%d");
    let flags = props.bits("flags");
    let controlled = props.integer_opt("value", 0);
    let default = props.integer("defaultValue", 0);

    let shadow = node.shadow.int();
    let resolved = shadow.resolve(controlled, || default);
    let mut value = resolved.value;
    let [label, format] = frame.scratch.texts([label.as_str(), format.as_str()]);
    frame
        .ui
        .drag_int(label, &mut value, speed, min, max, format, flags)?;

    if let Some(value) = shadow.settle(&resolved, value) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(value));
    }
    Ok(())
}

/// The shown text is cut to `maxLength` characters and then to whatever fits the
/// buffer, and the read-back is compared against that cut, not the full prop. The
/// buffer has room for more than `maxLength` characters, so edits are cut too.
pub(super) fn input_text<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
    lines: TextLines,
) -> RenderResult {
    let label = node.label_or_inline("Input");
    let props = &node.props;
    let default_chars = match lines {
        TextLines::Single => frame.config.text_capacity,
        TextLines::Multi => frame.config.multiline_capacity,
    };
    let max_chars = props
        .integer_opt("maxLength", default_chars.min(i32::MAX as usize) as i32)
        .map_or(default_chars, |chars| chars.max(1) as usize);
    let buffer_len = frame.config.text_buffer_len(max_chars);
    let hint = match lines {
        TextLines::Single => props.text("placeholder").filter(|hint| !hint.is_empty()),
        TextLines::Multi => None,
    };
    let size = [
        props.number("width", 0.0) as f32,
        props.number("height", 0.0) as f32,
    ];
    let flags = props.bits("flags");
    let controlled = props.prop("value").map(coerce_string);
    let default = props.prop("defaultValue").map(coerce_string).unwrap_or_default();

    let shadow = node.shadow.text();
    let resolved = shadow.resolve(controlled, || default);
    let shown = utf8::truncate_chars(&resolved.value, max_chars);

    let ([label, hint], [buffer]) = frame
        .scratch
        .prepare([Some(label.as_str()), hint.as_deref()], [buffer_len]);
    let label = label.unwrap_or_default();
    let written = utf8::encode_into(shown, buffer);
    let shown = Resolved {
        value: shown[..written].to_string(),
        ..resolved
    };

    match lines {
        TextLines::Single => frame.ui.input_text(label, hint, buffer, flags)?,
        TextLines::Multi => frame.ui.input_text_multiline(label, buffer, size, flags)?,
    };
    let read = utf8::decode(buffer);
    let read = utf8::truncate_chars(&read, max_chars).to_string();

    if let Some(text) = shadow.settle(&shown, read) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(text));
    }
    Ok(())
}

pub(super) fn input_float<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let label = label_prop(&node.props, "Input");
    let props = &node.props;
    let step = props.number("step", 0.0) as f32;
    let step_fast = props.number("stepFast", 0.0) as f32;
    let format = format_prop(node, "%.3f");
    let flags = props.bits("flags");
    let controlled = props.number_opt("value", 0.0).map(|value| value as f32);
    let default = props.number("defaultValue", 0.0) as f32;

    let shadow = node.shadow.float();
    let resolved = shadow.resolve(controlled, || default);
    let mut value = resolved.value;
    let [label, format] = frame.scratch.texts([label.as_str(), format.as_str()]);
    frame
        .ui
        .input_float(label, &mut value, step, step_fast, format, flags)?;

    if !value.is_finite() {
        return Ok(());
    }
    if let Some(value) = shadow.settle(&resolved, value) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(value));
    }
    Ok(())
}

pub(super) fn input_int<U: NativeUi + ?Sized>(frame: &mut Frame<'_, U>, node: &mut TreeNode) -> RenderResult {
    let label = label_prop(&node.props, "Input");
    let props = &node.props;
    let step = props.integer("step", 1);
    let step_fast = props.integer("stepFast", 100);
    let flags = props.bits("flags");
    let controlled = props.integer_opt("value", 0);
    let default = props.integer("defaultValue", 0);

    let shadow = node.shadow.int();
    let resolved = shadow.resolve(controlled, || default);
    let mut value = resolved.value;
    let [label] = frame.scratch.texts([label.as_str()]);
    frame
        .ui
        .input_int(label, &mut value, step, step_fast, flags)?;

    if let Some(value) = shadow.settle(&resolved, value) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(value));
    }
    Ok(())
}

pub(super) fn input_double<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let label = label_prop(&node.props, "Input");
    let props = &node.props;
    let step = props.number("step", 0.0);
    let step_fast = props.number("stepFast", 0.0);
    let format = format_prop(node, "%.6f");
    let flags = props.bits("flags");
    let controlled = props.number_opt("value", 0.0);
    let default = props.number("defaultValue", 0.0);

    let shadow = node.shadow.double();
    let resolved = shadow.resolve(controlled, || default);
    let mut value = resolved.value;
    let [label, format] = frame.scratch.texts([label.as_str(), format.as_str()]);
    frame
        .ui
        .input_double(label, &mut value, step, step_fast, format, flags)?;

    if !value.is_finite() {
        return Ok(());
    }
    if let Some(value) = shadow.settle(&resolved, value) {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(value));
    }
    Ok(())
}

/// Values are carried as `f64` between frames and converted to the data type at the
/// native boundary, so a prop like `2.7` on an integer input shows and compares as `2`.
pub(super) fn input_scalar<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let props = &node.props;
    let data_type = props.integer("dataType", 8);
    let Some(kind) = ScalarKind::from_data_type(data_type) else {
        tracing::warn!(node = %node.id, "<inputscalar> dataType {data_type} is not supported");
        return Ok(());
    };

    let to_scalar = |value: f64| Scalar::from_f64(kind, value);
    let normalize = |value: f64| to_scalar(value).map_or(value, Scalar::as_f64);
    let label = label_prop(props, "Input");
    let format = props.text("format");
    let flags = props.bits("flags");
    let step = props.number_opt("step", 0.0).and_then(to_scalar);
    let step_fast = props.number_opt("fastStep", 0.0).and_then(to_scalar);
    let controlled = props.number_opt("value", 0.0).map(normalize);
    let default = normalize(props.number("defaultValue", 0.0));

    let shadow = node.shadow.double();
    let resolved = shadow.resolve(controlled, || default);
    let Some(current) = to_scalar(resolved.value) else {
        return Ok(());
    };

    let cell = kind.size();
    let step_len = if step.is_some() { cell } else { 0 };
    let step_fast_len = if step_fast.is_some() { cell } else { 0 };
    let ([label, format], [data, step_buf, step_fast_buf]) = frame.scratch.prepare(
        [Some(label.as_str()), format.as_deref()],
        [cell, step_len, step_fast_len],
    );
    current.write(data);
    if let Some(step) = step {
        step.write(step_buf);
    }
    if let Some(step_fast) = step_fast {
        step_fast.write(step_fast_buf);
    }

    frame.ui.input_scalar(
        label.unwrap_or_default(),
        kind,
        data,
        step.is_some().then_some(&*step_buf),
        step_fast.is_some().then_some(&*step_fast_buf),
        format,
        flags,
    )?;

    let Some(read) = Scalar::read(kind, data) else {
        return Ok(());
    };
    if !read.as_f64().is_finite() {
        return Ok(());
    }
    if shadow.settle(&resolved, read.as_f64()).is_some() {
        frame.callbacks.fire(&node.handlers, "onChange", &[scalar_value(read)]);
    }
    Ok(())
}

pub(super) fn item_list<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
    list: ItemList,
) -> RenderResult {
    let props = &node.props;
    let items = props.strings("items");
    let (fallback, height_key) = match list {
        ItemList::Combo => ("Combo", "maxHeightItems"),
        ItemList::ListBox => ("List", "heightInItems"),
    };
    let label = label_prop(props, fallback);
    let height = props.integer(height_key, -1);

    let last = i32::try_from(items.len().saturating_sub(1)).unwrap_or(i32::MAX);
    let clamp = |index: i32| index.clamp(0, last);
    let controlled = props.integer_opt("selectedIndex", 0).map(clamp);
    let default = clamp(props.integer("defaultIndex", 0));

    let shadow = node.shadow.int();
    let resolved = shadow.resolve(controlled, || default);
    let mut current = clamp(resolved.value);
    let (label, names) = frame.scratch.text_list(&label, &items);
    match list {
        ItemList::Combo => frame.ui.combo(label, &mut current, &names, height)?,
        ItemList::ListBox => frame.ui.list_box(label, &mut current, &names, height)?,
    };

    if let Some(index) = shadow.settle(&resolved, clamp(current)) {
        let item = usize::try_from(index)
            .ok()
            .and_then(|index| items.get(index))
            .cloned()
            .unwrap_or_default();
        frame
            .callbacks
            .fire(&node.handlers, "onChange", &[index.into(), item.into()]);
    }
    Ok(())
}

pub(super) fn selectable<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
) -> RenderResult {
    let label = node.label_or_inline("Selectable");
    let props = &node.props;
    let size = [
        props
            .style_number("width")
            .unwrap_or_else(|| props.number("width", 0.0) as f32),
        props
            .style_number("height")
            .unwrap_or_else(|| props.number("height", 0.0) as f32),
    ];
    let flags = props.bits("flags");
    let controlled = props.prop("selected").map(truthy);
    let default = props.flag("defaultSelected");
    push_style_colors(frame, &node.props, ColorFamily::Header)?;

    let shadow = node.shadow.boolean();
    let resolved = shadow.resolve(controlled, || default);
    let mut selected = resolved.value;
    let [label] = frame.scratch.texts([label.as_str()]);
    let activated = frame.ui.selectable(label, &mut selected, flags, size)?;

    let changed = shadow.settle(&resolved, selected).is_some();
    if activated || changed {
        frame.callbacks.fire(&node.handlers, "onChange", &arg(selected));
    }
    Ok(())
}

/// Three modes: a group (`value` + `selectedValue`) whose pending selection lives on
/// the parent, a controlled `selected` flag, or an uncontrolled `defaultSelected`.
pub(super) fn radio_button<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
    parent: &mut Parent<'_>,
) -> RenderResult {
    let label = node.label_or_inline("Radio");
    push_style_colors(frame, &node.props, ColorFamily::Frame)?;
    let props = &node.props;
    let value = props.prop("value").cloned();

    if let (Some(value), Some(selected_value)) = (&value, props.prop("selectedValue")) {
        let group = match props.prop("groupId") {
            Some(group) => format!("gid:{}", coerce_string(group)),
            None => format!("parent:{}", parent.id.unwrap_or(node.id)),
        };
        let pending = &mut parent.siblings.radio_pending;
        let group_value = match pending.get(&group) {
            Some(staged) if staged == selected_value => pending.remove(&group),
            Some(staged) => Some(staged.clone()),
            None => None,
        }
        .unwrap_or_else(|| selected_value.clone());

        let [label] = frame.scratch.texts([label.as_str()]);
        if frame.ui.radio_button(label, group_value == *value)? {
            pending.insert(group, value.clone());
            frame.callbacks.fire(&node.handlers, "onChange", &[value.clone()]);
        }
        return Ok(());
    }

    let controlled = props.prop("selected").map(truthy);
    let default = props.flag("defaultSelected");
    let shadow = node.shadow.boolean();
    let resolved = shadow.resolve(controlled, || default);

    let [label] = frame.scratch.texts([label.as_str()]);
    if frame.ui.radio_button(label, resolved.value)? {
        let mode = if resolved.is_controlled() {
            Mode::Controlled
        } else {
            Mode::Uncontrolled
        };
        shadow.stage(mode, true);
        let reported = value.unwrap_or(Value::Bool(true));
        frame.callbacks.fire(&node.handlers, "onChange", &[reported]);
    }
    Ok(())
}

pub(super) fn color_edit<U: NativeUi + ?Sized>(
    frame: &mut Frame<'_, U>,
    node: &mut TreeNode,
    with_alpha: bool,
) -> RenderResult {
    let label = label_prop(&node.props, "Color");
    let props = &node.props;
    let flags = props.bits("flags");
    let controlled = props.prop("value").map(Rgba::from_value);
    let default = props
        .prop("defaultValue")
        .map_or(Rgba::WHITE, Rgba::from_value);

    let shadow = node.shadow.color();
    let resolved = shadow.resolve(controlled, || default);
    let [r, g, b, a] = resolved.value.to_vec4();
    let [label] = frame.scratch.texts([label.as_str()]);
    let read = if with_alpha {
        let mut color = [r, g, b, a];
        frame.ui.color_edit4(label, &mut color, flags)?;
        color
    } else {
        let mut color = [r, g, b];
        frame.ui.color_edit3(label, &mut color, flags)?;
        let [r, g, b] = color;
        [r, g, b, a]
    };

    if let Some(color) = shadow.settle(&resolved, Rgba::from_vec4(read)) {
        frame
            .callbacks
            .fire(&node.handlers, "onChange", &arg(color.to_value(with_alpha)));
    }
    Ok(())
}
