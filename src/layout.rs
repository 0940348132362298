//! Resize-driven layout for the three shell surfaces.
//!
//! The layout is a deterministic function of the current window size with no
//! state of its own: a fixed 50-unit tab bar band at the bottom, and both
//! content surfaces stacked at the origin with identical bounds. Content
//! surfaces are sized the same whether or not they are visible, so switching
//! the visible surface never needs a layout recompute.

/// The fixed height of the tab bar band, in physical pixels.
pub const TABBAR_HEIGHT: u32 = 50;

/// Surface bounds within the window's client area.
///
/// `y` is signed: on windows shorter than two tab-bar bands the tab bar's
/// origin goes negative, matching the host-runtime convention of clamping
/// nothing and letting out-of-view surfaces simply not render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Bounds for all three surfaces at a given window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellLayout {
    pub content: SurfaceRect,
    pub tabbar: SurfaceRect,
}

impl ShellLayout {
    /// Compute surface bounds for a window of `width` x `height`.
    ///
    /// The tab bar occupies the band ending one tab-bar height above the
    /// window bottom; both content surfaces fill the area above it. Content
    /// height saturates at zero for very short windows.
    pub fn compute(width: u32, height: u32) -> Self {
        let views_height = height.saturating_sub(TABBAR_HEIGHT);

        ShellLayout {
            tabbar: SurfaceRect {
                x: 0,
                y: views_height as i32 - TABBAR_HEIGHT as i32,
                width,
                height: TABBAR_HEIGHT,
            },
            content: SurfaceRect {
                x: 0,
                y: 0,
                width,
                height: views_height.saturating_sub(TABBAR_HEIGHT),
            },
        }
    }
}
