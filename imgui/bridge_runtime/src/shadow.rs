//! Per-node state that survives between frames.
//!
//! Every interactive widget runs its value through [`ValueShadow`]: the caller either
//! controls the value through a prop, or leaves it to a fallback the node owns.

use crate::color::Rgba;
use crate::native::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Controlled,
    Uncontrolled,
}

/// What to show this frame, decided before the native call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    /// The value was just pushed into the widget; the read-back of this frame is
    /// not treated as user input.
    pub authoritative: bool,
    pub mode: Mode,
}

impl<T> Resolved<T> {
    pub fn is_controlled(&self) -> bool {
        self.mode == Mode::Controlled
    }
}

/// Controlled/uncontrolled reconciliation for one value.
///
/// Controlled: a caller value that differs from `last_written` is written and wins.
/// Otherwise the native read-back is compared with what was shown; a difference is
/// staged as `pending_echo` and reported. The echo stays on screen until the caller
/// either adopts it or supplies a value other than `last_written`.
///
/// Uncontrolled: `fallback` is seeded once from the default and then follows the
/// read-back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueShadow<T> {
    last_written: Option<T>,
    fallback: Option<T>,
    pending_echo: Option<T>,
}

impl<T: Clone + PartialEq> ValueShadow<T> {
    pub fn resolve(&mut self, controlled: Option<T>, default: impl FnOnce() -> T) -> Resolved<T> {
        let Some(value) = controlled else {
            self.last_written = None;
            self.pending_echo = None;
            return match &self.fallback {
                Some(fallback) => Resolved {
                    value: fallback.clone(),
                    authoritative: false,
                    mode: Mode::Uncontrolled,
                },
                None => {
                    let seeded = default();
                    self.fallback = Some(seeded.clone());
                    Resolved {
                        value: seeded,
                        authoritative: true,
                        mode: Mode::Uncontrolled,
                    }
                }
            };
        };

        if let Some(echo) = self.pending_echo.take() {
            if echo == value {
                self.last_written = Some(value.clone());
                return Resolved {
                    value,
                    authoritative: false,
                    mode: Mode::Controlled,
                };
            }

            if self.last_written.as_ref() == Some(&value) {
                self.pending_echo = Some(echo.clone());
                return Resolved {
                    value: echo,
                    authoritative: false,
                    mode: Mode::Controlled,
                };
            }
        }

        let authoritative = self.last_written.as_ref() != Some(&value);
        if authoritative {
            self.last_written = Some(value.clone());
        }

        Resolved {
            value,
            authoritative,
            mode: Mode::Controlled,
        }
    }

    /// Feeds back what the widget holds after the native call. Returns the new value
    /// when it counts as a user change.
    pub fn settle(&mut self, resolved: &Resolved<T>, read: T) -> Option<T> {
        if read == resolved.value {
            return None;
        }

        match resolved.mode {
            Mode::Controlled if resolved.authoritative => None,
            Mode::Controlled => {
                self.pending_echo = Some(read.clone());
                Some(read)
            }
            Mode::Uncontrolled => {
                self.fallback = Some(read.clone());
                Some(read)
            }
        }
    }

    /// Records a user change for widgets that report presses instead of values.
    pub fn stage(&mut self, mode: Mode, value: T) {
        match mode {
            Mode::Controlled => self.pending_echo = Some(value),
            Mode::Uncontrolled => self.fallback = Some(value),
        }
    }

    pub fn last_written(&self) -> Option<&T> {
        self.last_written.as_ref()
    }

    pub fn fallback(&self) -> Option<&T> {
        self.fallback.as_ref()
    }

    pub fn pending_echo(&self) -> Option<&T> {
        self.pending_echo.as_ref()
    }
}

/// Reports a close slot that reads closed exactly once until it reads open again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseLatch {
    fired: bool,
}

impl CloseLatch {
    pub fn observe(&mut self, open: bool) -> bool {
        if open {
            self.fired = false;
            return false;
        }

        !std::mem::replace(&mut self.fired, true)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowState {
    pub pos: ValueShadow<Vec2>,
    pub size: ValueShadow<Vec2>,
    pub close: CloseLatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNodeState {
    /// `defaultOpen` has been handed to the native tree node.
    pub default_applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabItemState {
    pub last_frame: Option<i32>,
    pub prev_active: bool,
    pub was_active: bool,
    pub selection_suppressed: bool,
    pub default_selected: bool,
    pub close: CloseLatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupState {
    pub opened_once: bool,
    pub was_open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupModalState {
    pub opened_once: bool,
    pub was_open: bool,
    pub pending_close: bool,
    pub close_notified: bool,
}

/// The typed state record of a node, chosen from its kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Shadow {
    #[default]
    Stateless,
    Window(WindowState),
    Bool(ValueShadow<bool>),
    Float(ValueShadow<f32>),
    Int(ValueShadow<i32>),
    Double(ValueShadow<f64>),
    Text(ValueShadow<String>),
    Color(ValueShadow<Rgba>),
    TreeNode(TreeNodeState),
    TabItem(TabItemState),
    Popup(PopupState),
    PopupModal(PopupModalState),
}

macro_rules! shadow_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&mut self) -> &mut $ty {
            if !matches!(self, Self::$variant(_)) {
                *self = Self::$variant(<$ty>::default());
            }

            match self {
                Self::$variant(state) => state,
                _ => unreachable!(concat!("shadow was just set to ", stringify!($variant))),
            }
        }
    };
}

impl Shadow {
    shadow_accessor!(window, Window, WindowState);
    shadow_accessor!(boolean, Bool, ValueShadow<bool>);
    shadow_accessor!(float, Float, ValueShadow<f32>);
    shadow_accessor!(int, Int, ValueShadow<i32>);
    shadow_accessor!(double, Double, ValueShadow<f64>);
    shadow_accessor!(text, Text, ValueShadow<String>);
    shadow_accessor!(color, Color, ValueShadow<Rgba>);
    shadow_accessor!(tree_node, TreeNode, TreeNodeState);
    shadow_accessor!(tab_item, TabItem, TabItemState);
    shadow_accessor!(popup, Popup, PopupState);
    shadow_accessor!(popup_modal, PopupModal, PopupModalState);
}
