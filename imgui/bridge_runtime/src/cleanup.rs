use crate::native::{NativeUi, SurfaceResult};

/// A pending native teardown call, recorded when the matching begin/push succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    PopId,
    EndWindow,
    EndChild,
    PopStyleColor(u32),
    PopStyleVar(u32),
    PopItemWidth,
    EndMenuBar,
    EndMainMenuBar,
    EndMenu,
    EndGroup,
    Unindent,
    EndTable,
    TreePop,
    EndTabBar,
    EndTabItem,
    EndTooltip,
    EndPopup,
}

impl Teardown {
    pub fn run<U: NativeUi + ?Sized>(self, ui: &mut U) -> SurfaceResult<()> {
        match self {
            Self::PopId => ui.pop_id(),
            Self::EndWindow => ui.end_window(),
            Self::EndChild => ui.end_child(),
            Self::PopStyleColor(count) => ui.pop_style_color(count),
            Self::PopStyleVar(count) => ui.pop_style_var(count),
            Self::PopItemWidth => ui.pop_item_width(),
            Self::EndMenuBar => ui.end_menu_bar(),
            Self::EndMainMenuBar => ui.end_main_menu_bar(),
            Self::EndMenu => ui.end_menu(),
            Self::EndGroup => ui.end_group(),
            Self::Unindent => ui.unindent(0.0),
            Self::EndTable => ui.end_table(),
            Self::TreePop => ui.tree_pop(),
            Self::EndTabBar => ui.end_tab_bar(),
            Self::EndTabItem => ui.end_tab_item(),
            Self::EndTooltip => ui.end_tooltip(),
            Self::EndPopup => ui.end_popup(),
        }
    }
}

/// LIFO record of teardown calls owed to the native library.
///
/// A failing teardown is logged and dropped; it never aborts the frame.
#[derive(Debug, Default)]
pub struct CleanupStack {
    pending: Vec<Teardown>,
}

impl CleanupStack {
    pub fn depth(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn push(&mut self, teardown: Teardown) {
        self.pending.push(teardown);
    }

    /// Runs the most recently pushed teardown. Returns `false` on an empty stack.
    pub fn pop_one<U: NativeUi + ?Sized>(&mut self, ui: &mut U) -> bool {
        let Some(teardown) = self.pending.pop() else {
            return false;
        };

        if let Err(err) = teardown.run(ui) {
            tracing::error!(?teardown, "error running cleanup: {err}");
        }

        true
    }

    /// Pops until exactly `depth` teardowns remain.
    pub fn unwind_to<U: NativeUi + ?Sized>(&mut self, ui: &mut U, depth: usize) {
        while self.pending.len() > depth {
            self.pop_one(ui);
        }
    }

    /// Drains whatever a previous frame left behind so native begin/end balance holds.
    pub fn ensure_reset<U: NativeUi + ?Sized>(&mut self, ui: &mut U) {
        if !self.pending.is_empty() {
            tracing::error!(
                depth = self.pending.len(),
                "cleanup stack not empty before render; forcing cleanup"
            );
            self.unwind_to(ui, 0);
        }
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> &[Teardown] {
        &self.pending
    }
}
