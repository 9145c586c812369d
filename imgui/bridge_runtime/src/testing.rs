//! Scripted `NativeUi` for tests: records every call, checks begin/end balance and
//! replays user input queued per widget label.

use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::CStr;

use crate::native::{
    Cond, NativeUi, StyleColor, StyleVar, SurfaceError, SurfaceResult, TREE_NODE_FLAGS_NO_TREE_PUSH_ON_OPEN,
    TAB_ITEM_FLAGS_SET_SELECTED, TextureId, Vec2, Vec4, Viewport,
};
use crate::scratch::{Scalar, ScalarKind};
use crate::utf8;

/// One user interaction, consumed by the next widget call with a matching label.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Input {
    Toggle,
    Float(f32),
    Int(i32),
    Double(f64),
    Text(String),
    Color([f32; 4]),
    Press,
    Close,
    Move(Vec2),
    Resize(Vec2),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct WindowRect {
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub calls: Vec<String>,
    pub violations: Vec<String>,
    pub windows: HashMap<String, WindowRect>,
    pub open_popups: HashSet<String>,
    pub docking: bool,
    pub frame: i32,
    pub viewport: Viewport,
    pub cursor: Vec2,
    scopes: Vec<&'static str>,
    failures: Vec<String>,
    inputs: HashMap<String, VecDeque<Input>>,
    next_pos: Option<(Vec2, Cond)>,
    next_size: Option<(Vec2, Cond)>,
    current_windows: Vec<String>,
    open_trees: HashMap<String, bool>,
    next_item_open: Option<(bool, Cond)>,
    last_toggled: bool,
    tab_bars: Vec<String>,
    selected_tabs: HashMap<String, String>,
    last_popup: Option<String>,
}

fn key(label: &CStr) -> String {
    label.to_string_lossy().into_owned()
}

impl RecordingSurface {
    /// Makes the next call named `call` fail.
    pub fn fail_on(&mut self, call: &str) {
        self.failures.push(call.to_string());
    }

    pub fn script(&mut self, label: &str, input: Input) {
        self.inputs
            .entry(label.to_string())
            .or_default()
            .push_back(input);
    }

    pub fn next_frame(&mut self) {
        self.frame += 1;
        self.calls.clear();
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls
            .iter()
            .filter(|recorded| {
                recorded.as_str() == call || recorded.starts_with(&format!("{call}("))
            })
            .count()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls.iter().any(|recorded| recorded == call)
    }

    pub fn assert_balanced(&self) {
        assert!(self.scopes.is_empty(), "unclosed scopes: {:?}", self.scopes);
        assert!(self.violations.is_empty(), "scope violations: {:?}", self.violations);
    }

    fn hit(&mut self, call: &'static str, detail: impl Into<String>) -> SurfaceResult<()> {
        if let Some(index) = self.failures.iter().position(|name| name == call) {
            self.failures.remove(index);
            return Err(SurfaceError::new(call, "injected failure"));
        }

        let detail = detail.into();
        if detail.is_empty() {
            self.calls.push(call.to_string());
        } else {
            self.calls.push(format!("{call}({detail})"));
        }
        Ok(())
    }

    fn open(&mut self, scope: &'static str) {
        self.scopes.push(scope);
    }

    fn close(&mut self, scope: &'static str) {
        match self.scopes.pop() {
            Some(top) if top == scope => {}
            Some(top) => {
                self.violations.push(format!("closed {scope} while {top} was open"));
                self.scopes.push(top);
            }
            None => self.violations.push(format!("closed {scope} with nothing open")),
        }
    }

    fn close_many(&mut self, scope: &'static str, count: u32) {
        for _ in 0..count {
            self.close(scope);
        }
    }

    fn input(&mut self, label: &str) -> Option<Input> {
        self.inputs.get_mut(label)?.pop_front()
    }

    fn pressed(&mut self, label: &str) -> bool {
        matches!(self.input(label), Some(Input::Press))
    }

    fn current_window(&self) -> WindowRect {
        self.current_windows
            .last()
            .and_then(|title| self.windows.get(title))
            .copied()
            .unwrap_or_default()
    }
}

impl NativeUi for RecordingSurface {
    fn push_id(&mut self, id: u64) -> SurfaceResult<()> {
        self.hit("push_id", id.to_string())?;
        self.open("id");
        Ok(())
    }

    fn pop_id(&mut self) -> SurfaceResult<()> {
        self.hit("pop_id", "")?;
        self.close("id");
        Ok(())
    }

    fn frame_count(&mut self) -> SurfaceResult<i32> {
        Ok(self.frame)
    }

    fn main_viewport(&mut self) -> SurfaceResult<Viewport> {
        self.hit("main_viewport", "")?;
        Ok(self.viewport)
    }

    fn set_next_window_pos(&mut self, pos: Vec2, cond: Cond, _pivot: Vec2) -> SurfaceResult<()> {
        self.hit("set_next_window_pos", format!("{pos:?}, {cond:?}"))?;
        self.next_pos = Some((pos, cond));
        Ok(())
    }

    fn set_next_window_size(&mut self, size: Vec2, cond: Cond) -> SurfaceResult<()> {
        self.hit("set_next_window_size", format!("{size:?}, {cond:?}"))?;
        self.next_size = Some((size, cond));
        Ok(())
    }

    fn begin_window(
        &mut self,
        title: &CStr,
        open: Option<&mut bool>,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let title = key(title);
        self.hit("begin_window", title.as_str())?;
        self.open("window");

        let existed = self.windows.contains_key(&title);
        let rect = self.windows.entry(title.clone()).or_default();
        if let Some((pos, cond)) = self.next_pos.take() {
            if cond == Cond::Always || !existed {
                rect.pos = pos;
            }
        }
        if let Some((size, cond)) = self.next_size.take() {
            if cond == Cond::Always || !existed {
                rect.size = size;
            }
        }

        let mut open = open;
        while let Some(input) = self.input(&title) {
            let rect = self.windows.entry(title.clone()).or_default();
            match input {
                Input::Move(pos) => rect.pos = pos,
                Input::Resize(size) => rect.size = size,
                Input::Close => {
                    if let Some(open) = open.as_deref_mut() {
                        *open = false;
                    }
                }
                _ => {}
            }
        }

        self.current_windows.push(title);
        Ok(true)
    }

    fn end_window(&mut self) -> SurfaceResult<()> {
        self.hit("end_window", "")?;
        self.close("window");
        self.current_windows.pop();
        Ok(())
    }

    fn window_pos(&mut self) -> SurfaceResult<Vec2> {
        Ok(self.current_window().pos)
    }

    fn window_size(&mut self) -> SurfaceResult<Vec2> {
        Ok(self.current_window().size)
    }

    fn show_demo_window(&mut self, open: &mut bool) -> SurfaceResult<()> {
        self.hit("show_demo_window", open.to_string())?;
        if matches!(self.input("Dear ImGui Demo"), Some(Input::Close)) {
            *open = false;
        }
        Ok(())
    }

    fn begin_child(&mut self, id: &CStr, _size: Vec2, _window_flags: i32) -> SurfaceResult<bool> {
        self.hit("begin_child", key(id))?;
        self.open("child");
        Ok(true)
    }

    fn end_child(&mut self) -> SurfaceResult<()> {
        self.hit("end_child", "")?;
        self.close("child");
        Ok(())
    }

    fn push_style_color(&mut self, slot: StyleColor, _color: Vec4) -> SurfaceResult<()> {
        self.hit("push_style_color", format!("{slot:?}"))?;
        self.open("style_color");
        Ok(())
    }

    fn pop_style_color(&mut self, count: u32) -> SurfaceResult<()> {
        self.hit("pop_style_color", count.to_string())?;
        self.close_many("style_color", count);
        Ok(())
    }

    fn push_style_var_vec2(&mut self, var: StyleVar, value: Vec2) -> SurfaceResult<()> {
        self.hit("push_style_var", format!("{var:?}, {value:?}"))?;
        self.open("style_var");
        Ok(())
    }

    fn pop_style_var(&mut self, count: u32) -> SurfaceResult<()> {
        self.hit("pop_style_var", count.to_string())?;
        self.close_many("style_var", count);
        Ok(())
    }

    fn push_item_width(&mut self, width: f32) -> SurfaceResult<()> {
        self.hit("push_item_width", width.to_string())?;
        self.open("item_width");
        Ok(())
    }

    fn pop_item_width(&mut self) -> SurfaceResult<()> {
        self.hit("pop_item_width", "")?;
        self.close("item_width");
        Ok(())
    }

    fn begin_menu_bar(&mut self) -> SurfaceResult<bool> {
        self.hit("begin_menu_bar", "")?;
        self.open("menu_bar");
        Ok(true)
    }

    fn end_menu_bar(&mut self) -> SurfaceResult<()> {
        self.hit("end_menu_bar", "")?;
        self.close("menu_bar");
        Ok(())
    }

    fn begin_main_menu_bar(&mut self) -> SurfaceResult<bool> {
        self.hit("begin_main_menu_bar", "")?;
        self.open("main_menu_bar");
        Ok(true)
    }

    fn end_main_menu_bar(&mut self) -> SurfaceResult<()> {
        self.hit("end_main_menu_bar", "")?;
        self.close("main_menu_bar");
        Ok(())
    }

    fn begin_menu(&mut self, label: &CStr, enabled: bool) -> SurfaceResult<bool> {
        self.hit("begin_menu", format!("{}, {enabled}", key(label)))?;
        self.open("menu");
        Ok(true)
    }

    fn end_menu(&mut self) -> SurfaceResult<()> {
        self.hit("end_menu", "")?;
        self.close("menu");
        Ok(())
    }

    fn menu_item(
        &mut self,
        label: &CStr,
        _shortcut: Option<&CStr>,
        selected: bool,
        _enabled: bool,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("menu_item", format!("{label}, {selected}"))?;
        Ok(self.pressed(&label))
    }

    fn menu_item_toggle(
        &mut self,
        label: &CStr,
        _shortcut: Option<&CStr>,
        selected: &mut bool,
        _enabled: bool,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("menu_item_toggle", format!("{label}, {selected}"))?;
        let pressed = self.pressed(&label);
        if pressed {
            *selected = !*selected;
        }
        Ok(pressed)
    }

    fn text(&mut self, text: &CStr) -> SurfaceResult<()> {
        self.hit("text", key(text))
    }

    fn text_colored(&mut self, color: Vec4, text: &CStr) -> SurfaceResult<()> {
        self.hit("text_colored", format!("{color:?}, {}", key(text)))
    }

    fn text_disabled(&mut self, text: &CStr) -> SurfaceResult<()> {
        self.hit("text_disabled", key(text))
    }

    fn text_wrapped(&mut self, text: &CStr) -> SurfaceResult<()> {
        self.hit("text_wrapped", key(text))
    }

    fn button(&mut self, label: &CStr, size: Vec2) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("button", format!("{label}, {size:?}"))?;
        Ok(self.pressed(&label))
    }

    fn separator(&mut self) -> SurfaceResult<()> {
        self.hit("separator", "")
    }

    fn same_line(&mut self, offset_from_start_x: f32, spacing: f32) -> SurfaceResult<()> {
        self.hit("same_line", format!("{offset_from_start_x}, {spacing}"))
    }

    fn spacing(&mut self) -> SurfaceResult<()> {
        self.hit("spacing", "")
    }

    fn begin_group(&mut self) -> SurfaceResult<()> {
        self.hit("begin_group", "")?;
        self.open("group");
        Ok(())
    }

    fn end_group(&mut self) -> SurfaceResult<()> {
        self.hit("end_group", "")?;
        self.close("group");
        Ok(())
    }

    fn indent(&mut self, _width: f32) -> SurfaceResult<()> {
        self.hit("indent", "")?;
        self.open("indent");
        Ok(())
    }

    fn unindent(&mut self, _width: f32) -> SurfaceResult<()> {
        self.hit("unindent", "")?;
        self.close("indent");
        Ok(())
    }

    fn collapsing_header(&mut self, label: &CStr, _flags: i32) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("collapsing_header", label.as_str())?;
        Ok(!matches!(self.input(&label), Some(Input::Toggle)))
    }

    fn begin_table(
        &mut self,
        id: &CStr,
        columns: i32,
        flags: i32,
        _outer_size: Vec2,
        _inner_width: f32,
    ) -> SurfaceResult<bool> {
        self.hit("begin_table", format!("{}, {columns}, {flags}", key(id)))?;
        self.open("table");
        Ok(true)
    }

    fn end_table(&mut self) -> SurfaceResult<()> {
        self.hit("end_table", "")?;
        self.close("table");
        Ok(())
    }

    fn table_next_row(&mut self, flags: i32, min_height: f32) -> SurfaceResult<()> {
        self.hit("table_next_row", format!("{flags}, {min_height}"))
    }

    fn table_set_column_index(&mut self, index: i32) -> SurfaceResult<bool> {
        self.hit("table_set_column_index", index.to_string())?;
        Ok(true)
    }

    fn table_setup_column(&mut self, label: &CStr, flags: i32, width: f32) -> SurfaceResult<()> {
        self.hit("table_setup_column", format!("{}, {flags}, {width}", key(label)))
    }

    fn table_headers_row(&mut self) -> SurfaceResult<()> {
        self.hit("table_headers_row", "")
    }

    fn cursor_screen_pos(&mut self) -> SurfaceResult<Vec2> {
        Ok(self.cursor)
    }

    fn add_rect(&mut self, min: Vec2, max: Vec2, color: u32, filled: bool) -> SurfaceResult<()> {
        self.hit("add_rect", format!("{min:?}, {max:?}, {color:#010X}, {filled}"))
    }

    fn add_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: u32,
        segments: i32,
        filled: bool,
    ) -> SurfaceResult<()> {
        self.hit(
            "add_circle",
            format!("{center:?}, {radius}, {color:#010X}, {segments}, {filled}"),
        )
    }

    fn checkbox(&mut self, label: &CStr, value: &mut bool) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("checkbox", format!("{label}, {value}"))?;
        if matches!(self.input(&label), Some(Input::Toggle | Input::Press)) {
            *value = !*value;
            return Ok(true);
        }
        Ok(false)
    }

    fn slider_float(
        &mut self,
        label: &CStr,
        value: &mut f32,
        min: f32,
        max: f32,
        _format: &CStr,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("slider_float", format!("{label}, {value}, {min}, {max}"))?;
        if let Some(Input::Float(next)) = self.input(&label) {
            *value = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn slider_int(
        &mut self,
        label: &CStr,
        value: &mut i32,
        min: i32,
        max: i32,
        _format: &CStr,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("slider_int", format!("{label}, {value}, {min}, {max}"))?;
        if let Some(Input::Int(next)) = self.input(&label) {
            *value = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn drag_float(
        &mut self,
        label: &CStr,
        value: &mut f32,
        speed: f32,
        min: f32,
        max: f32,
        _format: &CStr,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("drag_float", format!("{label}, {value}, {speed}, {min}, {max}"))?;
        if let Some(Input::Float(next)) = self.input(&label) {
            *value = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn drag_int(
        &mut self,
        label: &CStr,
        value: &mut i32,
        speed: f32,
        min: i32,
        max: i32,
        _format: &CStr,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("drag_int", format!("{label}, {value}, {speed}, {min}, {max}"))?;
        if let Some(Input::Int(next)) = self.input(&label) {
            *value = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn input_text(
        &mut self,
        label: &CStr,
        hint: Option<&CStr>,
        buf: &mut [u8],
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        let hint = hint.map(key).unwrap_or_default();
        self.hit(
            "input_text",
            format!("{label}, {:?}, {hint}, {}", utf8::decode(buf), buf.len()),
        )?;
        if let Some(Input::Text(text)) = self.input(&label) {
            utf8::encode_into(&text, buf);
            return Ok(true);
        }
        Ok(false)
    }

    fn input_text_multiline(
        &mut self,
        label: &CStr,
        buf: &mut [u8],
        _size: Vec2,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit(
            "input_text_multiline",
            format!("{label}, {:?}, {}", utf8::decode(buf), buf.len()),
        )?;
        if let Some(Input::Text(text)) = self.input(&label) {
            utf8::encode_into(&text, buf);
            return Ok(true);
        }
        Ok(false)
    }

    fn input_float(
        &mut self,
        label: &CStr,
        value: &mut f32,
        step: f32,
        step_fast: f32,
        _format: &CStr,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("input_float", format!("{label}, {value}, {step}, {step_fast}"))?;
        if let Some(Input::Float(next)) = self.input(&label) {
            *value = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn input_int(
        &mut self,
        label: &CStr,
        value: &mut i32,
        step: i32,
        step_fast: i32,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("input_int", format!("{label}, {value}, {step}, {step_fast}"))?;
        if let Some(Input::Int(next)) = self.input(&label) {
            *value = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn input_double(
        &mut self,
        label: &CStr,
        value: &mut f64,
        step: f64,
        step_fast: f64,
        _format: &CStr,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("input_double", format!("{label}, {value}, {step}, {step_fast}"))?;
        if let Some(Input::Double(next)) = self.input(&label) {
            *value = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn input_scalar(
        &mut self,
        label: &CStr,
        kind: ScalarKind,
        data: &mut [u8],
        step: Option<&[u8]>,
        _step_fast: Option<&[u8]>,
        _format: Option<&CStr>,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        let current = Scalar::read(kind, data).map(Scalar::as_f64);
        let step = step.and_then(|step| Scalar::read(kind, step)).map(Scalar::as_f64);
        self.hit(
            "input_scalar",
            format!("{label}, {kind:?}, {current:?}, {step:?}"),
        )?;
        if let Some(Input::Double(next)) = self.input(&label) {
            if let Some(scalar) = Scalar::from_f64(kind, next) {
                scalar.write(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn combo(
        &mut self,
        label: &CStr,
        current: &mut i32,
        items: &[&CStr],
        _popup_max_height_in_items: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        let names: Vec<String> = items.iter().copied().map(key).collect();
        self.hit("combo", format!("{label}, {current}, {names:?}"))?;
        if let Some(Input::Int(next)) = self.input(&label) {
            *current = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn list_box(
        &mut self,
        label: &CStr,
        current: &mut i32,
        items: &[&CStr],
        _height_in_items: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        let names: Vec<String> = items.iter().copied().map(key).collect();
        self.hit("list_box", format!("{label}, {current}, {names:?}"))?;
        if let Some(Input::Int(next)) = self.input(&label) {
            *current = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn selectable(
        &mut self,
        label: &CStr,
        selected: &mut bool,
        _flags: i32,
        _size: Vec2,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("selectable", format!("{label}, {selected}"))?;
        if self.pressed(&label) {
            *selected = !*selected;
            return Ok(true);
        }
        Ok(false)
    }

    fn radio_button(&mut self, label: &CStr, active: bool) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("radio_button", format!("{label}, {active}"))?;
        Ok(self.pressed(&label))
    }

    fn color_edit3(&mut self, label: &CStr, color: &mut [f32; 3], _flags: i32) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("color_edit3", format!("{label}, {color:?}"))?;
        if let Some(Input::Color([r, g, b, _])) = self.input(&label) {
            *color = [r, g, b];
            return Ok(true);
        }
        Ok(false)
    }

    fn color_edit4(&mut self, label: &CStr, color: &mut [f32; 4], _flags: i32) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("color_edit4", format!("{label}, {color:?}"))?;
        if let Some(Input::Color(next)) = self.input(&label) {
            *color = next;
            return Ok(true);
        }
        Ok(false)
    }

    fn color_button(
        &mut self,
        label: &CStr,
        color: Vec4,
        _flags: i32,
        _size: Vec2,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        self.hit("color_button", format!("{label}, {color:?}"))?;
        Ok(self.pressed(&label))
    }

    fn progress_bar(
        &mut self,
        fraction: f32,
        size: Vec2,
        overlay: Option<&CStr>,
    ) -> SurfaceResult<()> {
        let overlay = overlay.map(key).unwrap_or_default();
        self.hit("progress_bar", format!("{fraction}, {size:?}, {overlay}"))
    }

    fn set_next_item_open(&mut self, open: bool, cond: Cond) -> SurfaceResult<()> {
        self.hit("set_next_item_open", format!("{open}, {cond:?}"))?;
        self.next_item_open = Some((open, cond));
        Ok(())
    }

    fn tree_node(&mut self, id: Option<&CStr>, label: &CStr, flags: i32) -> SurfaceResult<bool> {
        let label = key(label);
        let id = id.map(key).unwrap_or_else(|| label.clone());
        self.hit("tree_node", label.as_str())?;

        let seen = self.open_trees.contains_key(&id);
        let open = self.open_trees.entry(id).or_insert(false);
        if let Some((next, cond)) = self.next_item_open.take() {
            if cond == Cond::Always || !seen {
                *open = next;
            }
        }

        self.last_toggled = false;
        if matches!(self.inputs.get_mut(&label).and_then(VecDeque::pop_front), Some(Input::Toggle)) {
            *open = !*open;
            self.last_toggled = true;
        }

        let open = *open;
        if open && flags & TREE_NODE_FLAGS_NO_TREE_PUSH_ON_OPEN == 0 {
            self.open("tree");
        }
        Ok(open)
    }

    fn is_item_toggled_open(&mut self) -> SurfaceResult<bool> {
        Ok(std::mem::take(&mut self.last_toggled))
    }

    fn tree_pop(&mut self) -> SurfaceResult<()> {
        self.hit("tree_pop", "")?;
        self.close("tree");
        Ok(())
    }

    fn begin_tab_bar(&mut self, id: &CStr, _flags: i32) -> SurfaceResult<bool> {
        let id = key(id);
        self.hit("begin_tab_bar", id.as_str())?;
        self.open("tab_bar");
        self.tab_bars.push(id);
        Ok(true)
    }

    fn end_tab_bar(&mut self) -> SurfaceResult<()> {
        self.hit("end_tab_bar", "")?;
        self.close("tab_bar");
        self.tab_bars.pop();
        Ok(())
    }

    fn begin_tab_item(
        &mut self,
        label: &CStr,
        open: Option<&mut bool>,
        flags: i32,
    ) -> SurfaceResult<bool> {
        let label = key(label);
        let set_selected = flags & TAB_ITEM_FLAGS_SET_SELECTED != 0;
        self.hit("begin_tab_item", format!("{label}, {set_selected}"))?;

        let bar = self.tab_bars.last().cloned().unwrap_or_default();
        match self.input(&label) {
            Some(Input::Close) => {
                if let Some(open) = open {
                    *open = false;
                }
            }
            Some(Input::Press) => {
                self.selected_tabs.insert(bar.clone(), label.clone());
            }
            _ => {}
        }
        if set_selected {
            self.selected_tabs.insert(bar.clone(), label.clone());
        }

        let selected = self.selected_tabs.entry(bar).or_insert_with(|| label.clone());
        let active = *selected == label;
        if active {
            self.open("tab_item");
        }
        Ok(active)
    }

    fn end_tab_item(&mut self) -> SurfaceResult<()> {
        self.hit("end_tab_item", "")?;
        self.close("tab_item");
        Ok(())
    }

    fn image(
        &mut self,
        texture: TextureId,
        size: Vec2,
        uv0: Vec2,
        uv1: Vec2,
        _tint: Vec4,
        _border: Vec4,
    ) -> SurfaceResult<()> {
        self.hit("image", format!("{}, {size:?}, {uv0:?}, {uv1:?}", texture.0))
    }

    fn image_button(
        &mut self,
        id: &CStr,
        texture: TextureId,
        size: Vec2,
        _uv0: Vec2,
        _uv1: Vec2,
        _background: Vec4,
        _tint: Vec4,
    ) -> SurfaceResult<bool> {
        let id = key(id);
        self.hit("image_button", format!("{id}, {}, {size:?}", texture.0))?;
        Ok(self.pressed(&id))
    }

    fn plot_lines(
        &mut self,
        label: &CStr,
        values: &[f32],
        _overlay: Option<&CStr>,
        _scale_min: f32,
        _scale_max: f32,
        _size: Vec2,
    ) -> SurfaceResult<()> {
        self.hit("plot_lines", format!("{}, {values:?}", key(label)))
    }

    fn plot_histogram(
        &mut self,
        label: &CStr,
        values: &[f32],
        _overlay: Option<&CStr>,
        _scale_min: f32,
        _scale_max: f32,
        _size: Vec2,
    ) -> SurfaceResult<()> {
        self.hit("plot_histogram", format!("{}, {values:?}", key(label)))
    }

    fn begin_tooltip(&mut self) -> SurfaceResult<bool> {
        self.hit("begin_tooltip", "")?;
        self.open("tooltip");
        Ok(true)
    }

    fn begin_item_tooltip(&mut self) -> SurfaceResult<bool> {
        self.hit("begin_item_tooltip", "")?;
        self.open("tooltip");
        Ok(true)
    }

    fn end_tooltip(&mut self) -> SurfaceResult<()> {
        self.hit("end_tooltip", "")?;
        self.close("tooltip");
        Ok(())
    }

    fn open_popup(&mut self, id: &CStr) -> SurfaceResult<()> {
        let id = key(id);
        self.hit("open_popup", id.as_str())?;
        self.open_popups.insert(id);
        Ok(())
    }

    fn begin_popup(&mut self, id: &CStr, _flags: i32) -> SurfaceResult<bool> {
        let id = key(id);
        self.hit("begin_popup", id.as_str())?;
        if matches!(self.input(&id), Some(Input::Close)) {
            self.open_popups.remove(&id);
        }
        if !self.open_popups.contains(&id) {
            return Ok(false);
        }
        self.open("popup");
        self.last_popup = Some(id);
        Ok(true)
    }

    fn begin_popup_modal(
        &mut self,
        id: &CStr,
        open: Option<&mut bool>,
        _flags: i32,
    ) -> SurfaceResult<bool> {
        let id = key(id);
        self.hit("begin_popup_modal", id.as_str())?;
        if !self.open_popups.contains(&id) {
            return Ok(false);
        }
        if matches!(self.input(&id), Some(Input::Close)) {
            if let Some(open) = open {
                *open = false;
            }
        }
        self.open("popup");
        self.last_popup = Some(id);
        Ok(true)
    }

    fn end_popup(&mut self) -> SurfaceResult<()> {
        self.hit("end_popup", "")?;
        self.close("popup");
        Ok(())
    }

    fn close_current_popup(&mut self) -> SurfaceResult<()> {
        self.hit("close_current_popup", "")?;
        if let Some(id) = self.last_popup.take() {
            self.open_popups.remove(&id);
        }
        Ok(())
    }

    fn is_popup_open(&mut self, id: &CStr) -> SurfaceResult<bool> {
        Ok(self.open_popups.contains(&key(id)))
    }

    fn supports_docking(&self) -> bool {
        self.docking
    }

    fn dock_space(&mut self, id: u32, size: Vec2, flags: i32) -> SurfaceResult<()> {
        if !self.docking {
            return Err(SurfaceError::new("dock_space", "docking is not available"));
        }
        self.hit("dock_space", format!("{id}, {size:?}, {flags}"))
    }

    fn dock_space_over_viewport(&mut self, flags: i32) -> SurfaceResult<()> {
        if !self.docking {
            return Err(SurfaceError::new(
                "dock_space_over_viewport",
                "docking is not available",
            ));
        }
        self.hit("dock_space_over_viewport", flags.to_string())
    }
}
