use std::ffi::CStr;
use std::mem;

use crate::utf8;

/// Primitive kinds the arena hands out buffers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    I32,
    U32,
    F32,
    F64,
    Ptr,
}

impl ScalarKind {
    pub const fn size(self) -> usize {
        match self {
            Self::Bool => 1,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
            Self::Ptr => mem::size_of::<usize>(),
        }
    }

    pub const fn from_data_type(tag: i32) -> Option<Self> {
        match tag {
            4 => Some(Self::I32),
            5 => Some(Self::U32),
            8 => Some(Self::F32),
            9 => Some(Self::F64),
            _ => None,
        }
    }
}

/// One numeric value stored in a scalar buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
}

impl Scalar {
    /// Converts a validated number into `kind`. Integers truncate toward zero,
    /// negative numbers saturate to zero for `U32`.
    pub fn from_f64(kind: ScalarKind, value: f64) -> Option<Self> {
        match kind {
            ScalarKind::I32 => Some(Self::I32(value as i32)),
            ScalarKind::U32 => Some(Self::U32(value.max(0.0) as u32)),
            ScalarKind::F32 => Some(Self::F32(value as f32)),
            ScalarKind::F64 => Some(Self::F64(value)),
            ScalarKind::Bool | ScalarKind::Ptr => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::I32(v) => f64::from(v),
            Self::U32(v) => f64::from(v),
            Self::F32(v) => f64::from(v),
            Self::F64(v) => v,
        }
    }

    /// Writes the value in native byte order at the start of `buf`.
    pub fn write(self, buf: &mut [u8]) {
        match self {
            Self::I32(v) => buf[..4].copy_from_slice(&v.to_ne_bytes()),
            Self::U32(v) => buf[..4].copy_from_slice(&v.to_ne_bytes()),
            Self::F32(v) => buf[..4].copy_from_slice(&v.to_ne_bytes()),
            Self::F64(v) => buf[..8].copy_from_slice(&v.to_ne_bytes()),
        }
    }

    pub fn read(kind: ScalarKind, buf: &[u8]) -> Option<Self> {
        let word = |n: usize| buf.get(..n);
        match kind {
            ScalarKind::I32 => word(4)?.try_into().ok().map(i32::from_ne_bytes).map(Self::I32),
            ScalarKind::U32 => word(4)?.try_into().ok().map(u32::from_ne_bytes).map(Self::U32),
            ScalarKind::F32 => word(4)?.try_into().ok().map(f32::from_ne_bytes).map(Self::F32),
            ScalarKind::F64 => word(8)?.try_into().ok().map(f64::from_ne_bytes).map(Self::F64),
            ScalarKind::Bool | ScalarKind::Ptr => None,
        }
    }
}

/// Frame-lifetime byte pool for everything handed across the native boundary:
/// NUL-terminated labels, editable text buffers, scalar cells and item lists.
///
/// Each `prepare` call reuses the same storage, and every buffer it returns borrows
/// the arena, so a buffer cannot outlive the native call it was prepared for.
#[derive(Debug, Default)]
pub struct ScratchArena {
    bytes: Vec<u8>,
    frame_bytes: usize,
    peak_frame_bytes: usize,
}

impl ScratchArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Lays out `texts` as C strings followed by zeroed byte buffers of the requested
    /// lengths. Text is cut at its first interior NUL.
    pub fn prepare<'a, const N: usize, const M: usize>(
        &'a mut self,
        texts: [Option<&str>; N],
        buffers: [usize; M],
    ) -> ([Option<&'a CStr>; N], [&'a mut [u8]; M]) {
        let texts = texts.map(|text| text.map(utf8::until_nul));
        let text_bytes: usize = texts.iter().flatten().map(|text| text.len() + 1).sum();
        let total = text_bytes + buffers.iter().sum::<usize>();
        self.claim(total);

        let mut rest: &'a mut [u8] = &mut self.bytes[..];
        let strings = texts.map(|text| {
            text.map(|text| {
                let (head, tail) = mem::take(&mut rest).split_at_mut(text.len() + 1);
                rest = tail;
                head[..text.len()].copy_from_slice(text.as_bytes());
                as_cstr(head)
            })
        });
        let cells = buffers.map(|len| {
            let (head, tail) = mem::take(&mut rest).split_at_mut(len);
            rest = tail;
            head
        });

        (strings, cells)
    }

    /// C strings only.
    pub fn texts<'a, const N: usize>(&'a mut self, texts: [&str; N]) -> [&'a CStr; N] {
        let (strings, []) = self.prepare(texts.map(Some), []);
        strings.map(Option::unwrap_or_default)
    }

    /// A label plus the pointer list for a combo or list box.
    pub fn text_list<'a>(&'a mut self, label: &str, items: &[String]) -> (&'a CStr, Vec<&'a CStr>) {
        let label = utf8::until_nul(label);
        let items: Vec<&str> = items.iter().map(|item| utf8::until_nul(item)).collect();
        let total = label.len() + 1 + items.iter().map(|item| item.len() + 1).sum::<usize>();
        self.claim(total);
        self.frame_bytes += items.len() * ScalarKind::Ptr.size();
        self.peak_frame_bytes = self.peak_frame_bytes.max(self.frame_bytes);

        let mut rest: &'a mut [u8] = &mut self.bytes[..];
        let mut take = |text: &str| {
            let (head, tail) = mem::take(&mut rest).split_at_mut(text.len() + 1);
            rest = tail;
            head[..text.len()].copy_from_slice(text.as_bytes());
            as_cstr(head)
        };

        let label = take(label);
        let items = items.into_iter().map(take).collect();
        (label, items)
    }

    /// Bytes handed out since the last reset.
    pub fn frame_bytes(&self) -> usize {
        self.frame_bytes
    }

    pub fn peak_frame_bytes(&self) -> usize {
        self.peak_frame_bytes
    }

    /// Ends the frame. Storage is kept for the next one.
    pub fn reset(&mut self) {
        self.bytes.clear();
        self.frame_bytes = 0;
    }

    fn claim(&mut self, total: usize) {
        self.bytes.clear();
        self.bytes.resize(total, 0);
        self.frame_bytes += total;
        self.peak_frame_bytes = self.peak_frame_bytes.max(self.frame_bytes);
    }
}

fn as_cstr(bytes: &[u8]) -> &CStr {
    CStr::from_bytes_until_nul(bytes).unwrap_or_default()
}
