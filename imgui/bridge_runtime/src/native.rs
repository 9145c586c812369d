use std::ffi::CStr;
use thiserror::Error;

use crate::scratch::ScalarKind;

pub type Vec2 = [f32; 2];
pub type Vec4 = [f32; 4];

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// A native call that failed. Failures are structural: they unwind the node being
/// rendered and surface from `Renderer::render_frame`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("native call `{call}` failed: {message}")]
pub struct SurfaceError {
    pub call: &'static str,
    pub message: String,
}

impl SurfaceError {
    pub fn new(call: &'static str, message: impl Into<String>) -> Self {
        Self {
            call,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Always,
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleColor {
    Text,
    Button,
    ButtonHovered,
    ButtonActive,
    FrameBg,
    FrameBgHovered,
    FrameBgActive,
    Header,
    HeaderHovered,
    HeaderActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleVar {
    WindowPadding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub pos: Vec2,
    pub size: Vec2,
}

pub mod window_flags {
    pub const NO_TITLE_BAR: i32 = 1 << 0;
    pub const NO_RESIZE: i32 = 1 << 1;
    pub const NO_MOVE: i32 = 1 << 2;
    pub const NO_SCROLLBAR: i32 = 1 << 3;
    pub const NO_SCROLL_WITH_MOUSE: i32 = 1 << 4;
    pub const NO_COLLAPSE: i32 = 1 << 5;
    pub const ALWAYS_AUTO_RESIZE: i32 = 1 << 6;
    pub const NO_BACKGROUND: i32 = 1 << 7;
    pub const NO_SAVED_SETTINGS: i32 = 1 << 8;
    pub const NO_MOUSE_INPUTS: i32 = 1 << 9;
    pub const MENU_BAR: i32 = 1 << 10;
    pub const HORIZONTAL_SCROLLBAR: i32 = 1 << 11;
    pub const NO_FOCUS_ON_APPEARING: i32 = 1 << 12;
    pub const NO_BRING_TO_FRONT_ON_FOCUS: i32 = 1 << 13;
    pub const ALWAYS_VERTICAL_SCROLLBAR: i32 = 1 << 14;
    pub const ALWAYS_HORIZONTAL_SCROLLBAR: i32 = 1 << 15;
    pub const ALWAYS_USE_WINDOW_PADDING: i32 = 1 << 16;
    pub const NO_NAV_INPUTS: i32 = 1 << 18;
    pub const NO_NAV_FOCUS: i32 = 1 << 19;
    pub const UNSAVED_DOCUMENT: i32 = 1 << 20;
    pub const NO_DECORATION: i32 = NO_TITLE_BAR | NO_RESIZE | NO_SCROLLBAR | NO_COLLAPSE;
}

pub const TABLE_FLAGS_RESIZABLE: i32 = 1 << 0;
pub const TREE_NODE_FLAGS_NO_TREE_PUSH_ON_OPEN: i32 = 1 << 3;
pub const TAB_ITEM_FLAGS_SET_SELECTED: i32 = 1 << 1;

/// The immediate-mode GUI library, as seen from the renderer.
///
/// Calls come in strict begin/end pairs. A `begin_*` that reports `false` must not be
/// followed by its `end_*`, except `begin_window` and `begin_child`, which are always
/// closed. Every call may fail; a failure aborts the node that issued it.
pub trait NativeUi {
    fn push_id(&mut self, id: u64) -> SurfaceResult<()>;
    fn pop_id(&mut self) -> SurfaceResult<()>;
    fn frame_count(&mut self) -> SurfaceResult<i32>;

    fn main_viewport(&mut self) -> SurfaceResult<Viewport>;
    fn set_next_window_pos(&mut self, pos: Vec2, cond: Cond, pivot: Vec2) -> SurfaceResult<()>;
    fn set_next_window_size(&mut self, size: Vec2, cond: Cond) -> SurfaceResult<()>;
    fn begin_window(
        &mut self,
        title: &CStr,
        open: Option<&mut bool>,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn end_window(&mut self) -> SurfaceResult<()>;
    fn window_pos(&mut self) -> SurfaceResult<Vec2>;
    fn window_size(&mut self) -> SurfaceResult<Vec2>;
    fn show_demo_window(&mut self, open: &mut bool) -> SurfaceResult<()>;
    fn begin_child(&mut self, id: &CStr, size: Vec2, window_flags: i32) -> SurfaceResult<bool>;
    fn end_child(&mut self) -> SurfaceResult<()>;

    fn push_style_color(&mut self, slot: StyleColor, color: Vec4) -> SurfaceResult<()>;
    fn pop_style_color(&mut self, count: u32) -> SurfaceResult<()>;
    fn push_style_var_vec2(&mut self, var: StyleVar, value: Vec2) -> SurfaceResult<()>;
    fn pop_style_var(&mut self, count: u32) -> SurfaceResult<()>;
    fn push_item_width(&mut self, width: f32) -> SurfaceResult<()>;
    fn pop_item_width(&mut self) -> SurfaceResult<()>;

    fn begin_menu_bar(&mut self) -> SurfaceResult<bool>;
    fn end_menu_bar(&mut self) -> SurfaceResult<()>;
    fn begin_main_menu_bar(&mut self) -> SurfaceResult<bool>;
    fn end_main_menu_bar(&mut self) -> SurfaceResult<()>;
    fn begin_menu(&mut self, label: &CStr, enabled: bool) -> SurfaceResult<bool>;
    fn end_menu(&mut self) -> SurfaceResult<()>;
    fn menu_item(
        &mut self,
        label: &CStr,
        shortcut: Option<&CStr>,
        selected: bool,
        enabled: bool,
    ) -> SurfaceResult<bool>;
    fn menu_item_toggle(
        &mut self,
        label: &CStr,
        shortcut: Option<&CStr>,
        selected: &mut bool,
        enabled: bool,
    ) -> SurfaceResult<bool>;

    fn text(&mut self, text: &CStr) -> SurfaceResult<()>;
    fn text_colored(&mut self, color: Vec4, text: &CStr) -> SurfaceResult<()>;
    fn text_disabled(&mut self, text: &CStr) -> SurfaceResult<()>;
    fn text_wrapped(&mut self, text: &CStr) -> SurfaceResult<()>;
    fn button(&mut self, label: &CStr, size: Vec2) -> SurfaceResult<bool>;
    fn separator(&mut self) -> SurfaceResult<()>;
    fn same_line(&mut self, offset_from_start_x: f32, spacing: f32) -> SurfaceResult<()>;
    fn spacing(&mut self) -> SurfaceResult<()>;
    fn begin_group(&mut self) -> SurfaceResult<()>;
    fn end_group(&mut self) -> SurfaceResult<()>;
    fn indent(&mut self, width: f32) -> SurfaceResult<()>;
    fn unindent(&mut self, width: f32) -> SurfaceResult<()>;
    fn collapsing_header(&mut self, label: &CStr, flags: i32) -> SurfaceResult<bool>;

    fn begin_table(
        &mut self,
        id: &CStr,
        columns: i32,
        flags: i32,
        outer_size: Vec2,
        inner_width: f32,
    ) -> SurfaceResult<bool>;
    fn end_table(&mut self) -> SurfaceResult<()>;
    fn table_next_row(&mut self, flags: i32, min_height: f32) -> SurfaceResult<()>;
    fn table_set_column_index(&mut self, index: i32) -> SurfaceResult<bool>;
    fn table_setup_column(&mut self, label: &CStr, flags: i32, width: f32) -> SurfaceResult<()>;
    fn table_headers_row(&mut self) -> SurfaceResult<()>;

    fn cursor_screen_pos(&mut self) -> SurfaceResult<Vec2>;
    fn add_rect(&mut self, min: Vec2, max: Vec2, color: u32, filled: bool) -> SurfaceResult<()>;
    fn add_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: u32,
        segments: i32,
        filled: bool,
    ) -> SurfaceResult<()>;

    fn checkbox(&mut self, label: &CStr, value: &mut bool) -> SurfaceResult<bool>;
    fn slider_float(
        &mut self,
        label: &CStr,
        value: &mut f32,
        min: f32,
        max: f32,
        format: &CStr,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn slider_int(
        &mut self,
        label: &CStr,
        value: &mut i32,
        min: i32,
        max: i32,
        format: &CStr,
        flags: i32,
    ) -> SurfaceResult<bool>;
    #[allow(clippy::too_many_arguments)]
    fn drag_float(
        &mut self,
        label: &CStr,
        value: &mut f32,
        speed: f32,
        min: f32,
        max: f32,
        format: &CStr,
        flags: i32,
    ) -> SurfaceResult<bool>;
    #[allow(clippy::too_many_arguments)]
    fn drag_int(
        &mut self,
        label: &CStr,
        value: &mut i32,
        speed: f32,
        min: i32,
        max: i32,
        format: &CStr,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn input_text(
        &mut self,
        label: &CStr,
        hint: Option<&CStr>,
        buf: &mut [u8],
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn input_text_multiline(
        &mut self,
        label: &CStr,
        buf: &mut [u8],
        size: Vec2,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn input_float(
        &mut self,
        label: &CStr,
        value: &mut f32,
        step: f32,
        step_fast: f32,
        format: &CStr,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn input_int(
        &mut self,
        label: &CStr,
        value: &mut i32,
        step: i32,
        step_fast: i32,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn input_double(
        &mut self,
        label: &CStr,
        value: &mut f64,
        step: f64,
        step_fast: f64,
        format: &CStr,
        flags: i32,
    ) -> SurfaceResult<bool>;
    /// `data`, `step` and `step_fast` hold one value of `kind` in native byte order.
    #[allow(clippy::too_many_arguments)]
    fn input_scalar(
        &mut self,
        label: &CStr,
        kind: ScalarKind,
        data: &mut [u8],
        step: Option<&[u8]>,
        step_fast: Option<&[u8]>,
        format: Option<&CStr>,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn combo(
        &mut self,
        label: &CStr,
        current: &mut i32,
        items: &[&CStr],
        popup_max_height_in_items: i32,
    ) -> SurfaceResult<bool>;
    fn list_box(
        &mut self,
        label: &CStr,
        current: &mut i32,
        items: &[&CStr],
        height_in_items: i32,
    ) -> SurfaceResult<bool>;
    fn selectable(
        &mut self,
        label: &CStr,
        selected: &mut bool,
        flags: i32,
        size: Vec2,
    ) -> SurfaceResult<bool>;
    fn radio_button(&mut self, label: &CStr, active: bool) -> SurfaceResult<bool>;
    fn color_edit3(&mut self, label: &CStr, color: &mut [f32; 3], flags: i32)
    -> SurfaceResult<bool>;
    fn color_edit4(&mut self, label: &CStr, color: &mut [f32; 4], flags: i32)
    -> SurfaceResult<bool>;
    fn color_button(
        &mut self,
        label: &CStr,
        color: Vec4,
        flags: i32,
        size: Vec2,
    ) -> SurfaceResult<bool>;
    fn progress_bar(
        &mut self,
        fraction: f32,
        size: Vec2,
        overlay: Option<&CStr>,
    ) -> SurfaceResult<()>;

    fn set_next_item_open(&mut self, open: bool, cond: Cond) -> SurfaceResult<()>;
    fn tree_node(&mut self, id: Option<&CStr>, label: &CStr, flags: i32) -> SurfaceResult<bool>;
    fn is_item_toggled_open(&mut self) -> SurfaceResult<bool>;
    fn tree_pop(&mut self) -> SurfaceResult<()>;

    fn begin_tab_bar(&mut self, id: &CStr, flags: i32) -> SurfaceResult<bool>;
    fn end_tab_bar(&mut self) -> SurfaceResult<()>;
    fn begin_tab_item(
        &mut self,
        label: &CStr,
        open: Option<&mut bool>,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn end_tab_item(&mut self) -> SurfaceResult<()>;

    #[allow(clippy::too_many_arguments)]
    fn image(
        &mut self,
        texture: TextureId,
        size: Vec2,
        uv0: Vec2,
        uv1: Vec2,
        tint: Vec4,
        border: Vec4,
    ) -> SurfaceResult<()>;
    #[allow(clippy::too_many_arguments)]
    fn image_button(
        &mut self,
        id: &CStr,
        texture: TextureId,
        size: Vec2,
        uv0: Vec2,
        uv1: Vec2,
        background: Vec4,
        tint: Vec4,
    ) -> SurfaceResult<bool>;
    #[allow(clippy::too_many_arguments)]
    fn plot_lines(
        &mut self,
        label: &CStr,
        values: &[f32],
        overlay: Option<&CStr>,
        scale_min: f32,
        scale_max: f32,
        size: Vec2,
    ) -> SurfaceResult<()>;
    #[allow(clippy::too_many_arguments)]
    fn plot_histogram(
        &mut self,
        label: &CStr,
        values: &[f32],
        overlay: Option<&CStr>,
        scale_min: f32,
        scale_max: f32,
        size: Vec2,
    ) -> SurfaceResult<()>;

    fn begin_tooltip(&mut self) -> SurfaceResult<bool>;
    fn begin_item_tooltip(&mut self) -> SurfaceResult<bool>;
    fn end_tooltip(&mut self) -> SurfaceResult<()>;

    fn open_popup(&mut self, id: &CStr) -> SurfaceResult<()>;
    fn begin_popup(&mut self, id: &CStr, flags: i32) -> SurfaceResult<bool>;
    fn begin_popup_modal(
        &mut self,
        id: &CStr,
        open: Option<&mut bool>,
        flags: i32,
    ) -> SurfaceResult<bool>;
    fn end_popup(&mut self) -> SurfaceResult<()>;
    fn close_current_popup(&mut self) -> SurfaceResult<()>;
    fn is_popup_open(&mut self, id: &CStr) -> SurfaceResult<bool>;

    /// Docking is an optional build feature of the native library.
    fn supports_docking(&self) -> bool {
        false
    }

    fn dock_space(&mut self, _id: u32, _size: Vec2, _flags: i32) -> SurfaceResult<()> {
        Err(SurfaceError::new("dock_space", "docking is not available"))
    }

    fn dock_space_over_viewport(&mut self, _flags: i32) -> SurfaceResult<()> {
        Err(SurfaceError::new(
            "dock_space_over_viewport",
            "docking is not available",
        ))
    }
}
