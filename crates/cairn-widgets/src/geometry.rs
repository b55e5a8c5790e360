//! Anchor-relative popup placement with overflow correction.
//!
//! [`resolve`] is a pure function: the same anchor, viewport, content size
//! and preference always give a structurally equal [`Resolved`], so callers
//! can compare against the last applied style and skip redundant updates.
//!
//! All inset values are distances from the viewport's own edges, the way a
//! fixed-position overlay is laid out. [`popup_area`](crate::overlay::popup_area)
//! turns them back into an absolute [`Rect`].

use std::fmt;
use std::str::FromStr;

use ratatui::layout::{Rect, Size};

use crate::error::Error;

/// One edge of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Where popup content appears relative to its anchor.
///
/// The first word is the side of the anchor the content grows from, the
/// second the anchor edge it lines up with: `BottomLeft` opens below the
/// anchor, left edges aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    TopLeft,
    TopRight,
    #[default]
    BottomLeft,
    BottomRight,
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
}

impl Placement {
    /// Every placement.
    pub const ALL: [Placement; 8] = [
        Placement::TopLeft,
        Placement::TopRight,
        Placement::BottomLeft,
        Placement::BottomRight,
        Placement::LeftTop,
        Placement::LeftBottom,
        Placement::RightTop,
        Placement::RightBottom,
    ];

    /// `(grow, align)` sides.
    pub fn sides(self) -> (Side, Side) {
        use Side::*;
        match self {
            Placement::TopLeft => (Top, Left),
            Placement::TopRight => (Top, Right),
            Placement::BottomLeft => (Bottom, Left),
            Placement::BottomRight => (Bottom, Right),
            Placement::LeftTop => (Left, Top),
            Placement::LeftBottom => (Left, Bottom),
            Placement::RightTop => (Right, Top),
            Placement::RightBottom => (Right, Bottom),
        }
    }

    fn from_sides(grow: Side, align: Side) -> Option<Self> {
        Placement::ALL
            .into_iter()
            .find(|p| p.sides() == (grow, align))
    }

    /// The side of the anchor the content grows from.
    pub fn grow(self) -> Side {
        self.sides().0
    }

    /// The anchor edge the content is aligned with.
    pub fn align(self) -> Side {
        self.sides().1
    }

    /// `bottom-*` becomes `top-*`; other placements are unchanged.
    pub fn flip_to_top(self) -> Self {
        match self.sides() {
            (Side::Bottom, align) => Placement::from_sides(Side::Top, align).unwrap_or(self),
            _ => self,
        }
    }

    /// `*-left` becomes `*-right`; other placements are unchanged.
    pub fn align_right(self) -> Self {
        match self.sides() {
            (grow, Side::Left) => Placement::from_sides(grow, Side::Right).unwrap_or(self),
            _ => self,
        }
    }

    /// The kebab-case name, e.g. `bottom-left`.
    pub fn as_str(self) -> &'static str {
        match self {
            Placement::TopLeft => "top-left",
            Placement::TopRight => "top-right",
            Placement::BottomLeft => "bottom-left",
            Placement::BottomRight => "bottom-right",
            Placement::LeftTop => "left-top",
            Placement::LeftBottom => "left-bottom",
            Placement::RightTop => "right-top",
            Placement::RightBottom => "right-bottom",
        }
    }
}

impl FromStr for Placement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Placement::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownPlacement(s.to_owned()))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed distance or `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Length {
    #[default]
    Auto,
    Fixed(u16),
}

impl Length {
    /// The fixed value, if any.
    pub fn fixed(self) -> Option<u16> {
        match self {
            Length::Auto => None,
            Length::Fixed(v) => Some(v),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Auto => f.write_str("auto"),
            Length::Fixed(v) => write!(f, "{v}"),
        }
    }
}

/// Distances of the content box from each viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inset {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl fmt::Display for Inset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Computed style for popup content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopupStyle {
    pub inset: Inset,
    pub z_index: u32,
    /// The anchor's width.
    pub min_width: u16,
    /// Room up to the viewport edge the content grows towards, less the
    /// margin.
    pub max_width: u16,
    /// Capped only when a `bottom-*` placement does not fit.
    pub height: Length,
}

/// Output of [`resolve`]: the placement actually used and its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub placement: Placement,
    pub style: PopupStyle,
}

/// Place content of natural size `content` next to `anchor` inside
/// `viewport`.
///
/// `anchor` is the visible part of the anchor (its intersection with the
/// viewport), in the same coordinate space as `viewport`.
///
/// Corrections, in order:
///
/// 1. A `bottom-*` placement whose content is taller than the room below
///    flips to `top-*` when there is more room above, with the height
///    capped to that room. Otherwise it stays and the height is capped to
///    the room below. `top-*` placements are assumed to fit.
/// 2. A `*-left` placement whose content would cross the right edge becomes
///    `*-right`.
pub fn resolve(
    anchor: Rect,
    viewport: Rect,
    content: Size,
    preferred: Placement,
    margin: u16,
    z_index: u32,
) -> Resolved {
    let margin = i32::from(margin);
    let vw = i32::from(viewport.width);
    let vh = i32::from(viewport.height);
    let top = i32::from(anchor.y) - i32::from(viewport.y);
    let left = i32::from(anchor.x) - i32::from(viewport.x);
    let bottom = top + i32::from(anchor.height);
    let right = left + i32::from(anchor.width);

    let top_margin = top - margin;
    let bottom_margin = vh - bottom - margin;

    let mut placement = preferred;
    let mut height = None;

    if placement.grow() == Side::Bottom && i32::from(content.height) > bottom_margin {
        if top_margin > bottom_margin {
            placement = placement.flip_to_top();
            height = Some(top_margin);
        } else {
            height = Some(bottom_margin);
        }
    }

    if placement.align() == Side::Left && left + i32::from(content.width) > vw - margin {
        placement = placement.align_right();
    }

    let (grow, align) = placement.sides();
    let fixed = |value: i32| Length::Fixed(clamp(value));
    let inset = Inset {
        top: match (grow, align) {
            (Side::Bottom, _) => fixed(bottom),
            (_, Side::Top) => fixed(top),
            _ => Length::Auto,
        },
        right: match (grow, align) {
            (Side::Left, _) => fixed(vw - left),
            (_, Side::Right) => fixed(vw - right),
            _ => Length::Auto,
        },
        bottom: match (grow, align) {
            (Side::Top, _) => fixed(vh - top),
            (_, Side::Bottom) => fixed(vh - bottom),
            _ => Length::Auto,
        },
        left: match (grow, align) {
            (Side::Right, _) => fixed(right),
            (_, Side::Left) => fixed(left),
            _ => Length::Auto,
        },
    };

    let max_width = if align == Side::Left {
        vw - left - margin
    } else {
        right - margin
    };

    Resolved {
        placement,
        style: PopupStyle {
            inset,
            z_index,
            min_width: anchor.width,
            max_width: clamp(max_width),
            height: match height {
                Some(h) if h > 0 => Length::Fixed(clamp(h)),
                _ => Length::Auto,
            },
        },
    }
}

fn clamp(v: i32) -> u16 {
    v.clamp(0, i32::from(u16::MAX)) as u16
}
