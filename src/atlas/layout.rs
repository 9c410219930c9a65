//! Declarative atlas layout.
//!
//! The atlas dimensions, the family list and every fragment rectangle are a
//! contract with the upstream art. They are declared here as one static
//! table and validated once at startup, so a typo in the table or an unknown
//! family fails before any output is written.

use crate::error::{QmError, Result};

/// A pixel rectangle in the source atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Fixed per-paste transform applied to the cropped piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    None,
    Rotate90,
    Rotate180,
    Rotate270,
    FlipHorizontal,
    FlipVertical,
}

impl Transform {
    /// Size of a `(w, h)` piece after the transform.
    pub fn apply_size(&self, w: u32, h: u32) -> (u32, u32) {
        match self {
            Transform::Rotate90 | Transform::Rotate270 => (h, w),
            _ => (w, h),
        }
    }
}

/// One source rectangle pasted onto a fragment canvas.
#[derive(Debug, Clone, Copy)]
pub struct Paste {
    pub src: Rect,
    pub dest: (u32, u32),
    pub transform: Transform,
}

impl Paste {
    pub const fn at(src: Rect, dest: (u32, u32)) -> Self {
        Self {
            src,
            dest,
            transform: Transform::None,
        }
    }

    pub const fn with(src: Rect, dest: (u32, u32), transform: Transform) -> Self {
        Self {
            src,
            dest,
            transform,
        }
    }
}

/// One named output image built from the atlas.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    /// Output filename suffix (`{family}_{suffix}.png`).
    pub suffix: &'static str,
    /// Output canvas size; uncovered pixels stay transparent.
    pub canvas: (u32, u32),
    pub pastes: &'static [Paste],
    /// Families this fragment applies to; `None` means all of them.
    pub families: Option<&'static [&'static str]>,
}

impl Fragment {
    pub fn applies_to(&self, family: &str) -> bool {
        match self.families {
            None => true,
            Some(families) => families.contains(&family),
        }
    }
}

/// The complete layout contract for one atlas format.
#[derive(Debug, Clone, Copy)]
pub struct AtlasLayout {
    /// Expected source dimensions. Assumed, not verified, at split time.
    pub atlas: (u32, u32),
    pub families: &'static [&'static str],
    pub fragments: &'static [Fragment],
}

/// The shipped layout: a 128x64 composite per family.
///
/// The six body faces sit in two rows of 16x16 cells; the back face is
/// stored upside down and the right face is stored as mirrored left-side
/// art. The backpack is stitched from the shell and flap strips. Only the
/// dyeable families carry the colour overlay plate.
pub const LAYOUT: AtlasLayout = AtlasLayout {
    atlas: (128, 64),
    families: &["normal", "advanced", "white"],
    fragments: &[
        Fragment {
            suffix: "top",
            canvas: (16, 16),
            pastes: &[Paste::at(Rect::new(16, 0, 16, 16), (0, 0))],
            families: None,
        },
        Fragment {
            suffix: "bottom",
            canvas: (16, 16),
            pastes: &[Paste::at(Rect::new(32, 0, 16, 16), (0, 0))],
            families: None,
        },
        Fragment {
            suffix: "front",
            canvas: (16, 16),
            pastes: &[Paste::at(Rect::new(0, 16, 16, 16), (0, 0))],
            families: None,
        },
        Fragment {
            suffix: "back",
            canvas: (16, 16),
            pastes: &[Paste::with(
                Rect::new(16, 16, 16, 16),
                (0, 0),
                Transform::Rotate180,
            )],
            families: None,
        },
        Fragment {
            suffix: "left",
            canvas: (16, 16),
            pastes: &[Paste::at(Rect::new(32, 16, 16, 16), (0, 0))],
            families: None,
        },
        Fragment {
            suffix: "right",
            canvas: (16, 16),
            pastes: &[Paste::with(
                Rect::new(48, 16, 16, 16),
                (0, 0),
                Transform::FlipHorizontal,
            )],
            families: None,
        },
        Fragment {
            suffix: "backpack",
            canvas: (24, 24),
            pastes: &[
                Paste::at(Rect::new(64, 0, 24, 16), (0, 0)),
                Paste::at(Rect::new(64, 16, 24, 8), (0, 16)),
            ],
            families: None,
        },
        Fragment {
            suffix: "overlay",
            canvas: (32, 32),
            pastes: &[Paste::at(Rect::new(96, 0, 32, 32), (0, 0))],
            families: Some(&["normal", "advanced"]),
        },
    ],
};

impl AtlasLayout {
    pub fn is_family(&self, name: &str) -> bool {
        self.families.contains(&name)
    }

    /// Fragments applicable to one family, in declaration order.
    pub fn fragments_for<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a Fragment> {
        self.fragments.iter().filter(move |f| f.applies_to(family))
    }

    /// Check the whole table for internal consistency.
    pub fn validate(&self) -> Result<()> {
        let (aw, ah) = self.atlas;

        for fragment in self.fragments {
            let (cw, ch) = fragment.canvas;
            if fragment.suffix.is_empty() || cw == 0 || ch == 0 {
                return Err(layout_error(format!(
                    "Fragment '{}' has an empty name or canvas",
                    fragment.suffix
                )));
            }

            let duplicates = self
                .fragments
                .iter()
                .filter(|f| f.suffix == fragment.suffix)
                .count();
            if duplicates != 1 {
                return Err(layout_error(format!(
                    "Fragment suffix '{}' is declared {} times",
                    fragment.suffix, duplicates
                )));
            }

            for paste in fragment.pastes {
                let src = paste.src;
                if src.x + src.w > aw || src.y + src.h > ah {
                    return Err(layout_error(format!(
                        "Fragment '{}' reads outside the {}x{} atlas",
                        fragment.suffix, aw, ah
                    )));
                }

                let (pw, ph) = paste.transform.apply_size(src.w, src.h);
                let (dx, dy) = paste.dest;
                if dx + pw > cw || dy + ph > ch {
                    return Err(layout_error(format!(
                        "Fragment '{}' pastes outside its {}x{} canvas",
                        fragment.suffix, cw, ch
                    )));
                }
            }

            if let Some(families) = fragment.families {
                for family in families {
                    if !self.is_family(family) {
                        return Err(layout_error(format!(
                            "Fragment '{}' names unknown family '{}'",
                            fragment.suffix, family
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn layout_error(message: String) -> QmError {
    QmError::Layout {
        message,
        help: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_layout_is_valid() {
        LAYOUT.validate().unwrap();
    }

    #[test]
    fn overlay_is_skipped_for_plain_family() {
        let with: Vec<&str> = LAYOUT.fragments_for("normal").map(|f| f.suffix).collect();
        let without: Vec<&str> = LAYOUT.fragments_for("white").map(|f| f.suffix).collect();

        assert!(with.contains(&"overlay"));
        assert!(!without.contains(&"overlay"));
        assert_eq!(with.len(), without.len() + 1);
    }

    #[test]
    fn rotation_swaps_paste_size() {
        assert_eq!(Transform::Rotate90.apply_size(4, 2), (2, 4));
        assert_eq!(Transform::Rotate270.apply_size(4, 2), (2, 4));
        assert_eq!(Transform::Rotate180.apply_size(4, 2), (4, 2));
        assert_eq!(Transform::FlipHorizontal.apply_size(4, 2), (4, 2));
    }

    #[test]
    fn out_of_atlas_paste_is_rejected() {
        static BAD: AtlasLayout = AtlasLayout {
            atlas: (32, 32),
            families: &["a"],
            fragments: &[Fragment {
                suffix: "huge",
                canvas: (64, 64),
                pastes: &[Paste::at(Rect::new(16, 16, 32, 32), (0, 0))],
                families: None,
            }],
        };
        assert!(BAD.validate().is_err());
    }

    #[test]
    fn out_of_canvas_paste_is_rejected() {
        static BAD: AtlasLayout = AtlasLayout {
            atlas: (64, 64),
            families: &["a"],
            fragments: &[Fragment {
                suffix: "cramped",
                canvas: (8, 8),
                pastes: &[Paste::at(Rect::new(0, 0, 16, 16), (0, 0))],
                families: None,
            }],
        };
        assert!(BAD.validate().is_err());
    }

    #[test]
    fn rotated_paste_bounds_use_transformed_size() {
        // 16x8 piece rotated 90 degrees needs an 8x16 slot.
        static ROTATED: AtlasLayout = AtlasLayout {
            atlas: (64, 64),
            families: &["a"],
            fragments: &[Fragment {
                suffix: "tall",
                canvas: (8, 16),
                pastes: &[Paste::with(
                    Rect::new(0, 0, 16, 8),
                    (0, 0),
                    Transform::Rotate90,
                )],
                families: None,
            }],
        };
        ROTATED.validate().unwrap();
    }

    #[test]
    fn unknown_family_in_fragment_is_rejected() {
        static BAD: AtlasLayout = AtlasLayout {
            atlas: (64, 64),
            families: &["a"],
            fragments: &[Fragment {
                suffix: "ghost",
                canvas: (8, 8),
                pastes: &[Paste::at(Rect::new(0, 0, 8, 8), (0, 0))],
                families: Some(&["b"]),
            }],
        };
        assert!(BAD.validate().is_err());
    }
}
