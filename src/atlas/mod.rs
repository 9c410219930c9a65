//! Texture atlas splitting.
//!
//! Crops the fixed fragment rectangles out of a family's composite image and
//! pastes them onto transparent canvases of the declared sizes. The source's
//! actual dimensions are a contract with the upstream art and are not
//! verified; crops that fall outside a smaller source simply leave the
//! uncovered canvas transparent.

pub mod layout;

use image::{imageops, RgbaImage};

pub use layout::{AtlasLayout, Fragment, Paste, Rect, Transform, LAYOUT};

use crate::error::{QmError, Result};

/// Split one atlas image into its named fragments.
///
/// Returns `(output name, image)` pairs in fragment declaration order. The
/// family must be declared in the layout; anything else fails before any
/// work is done.
pub fn split_atlas(source: &RgbaImage, family: &str) -> Result<Vec<(String, RgbaImage)>> {
    if !LAYOUT.is_family(family) {
        return Err(QmError::Layout {
            message: format!("Unknown atlas family '{}'", family),
            help: Some(format!("Known families: {}", LAYOUT.families.join(", "))),
        });
    }

    let mut outputs = Vec::new();

    for fragment in LAYOUT.fragments_for(family) {
        let (w, h) = fragment.canvas;
        let mut canvas = RgbaImage::new(w, h);

        for paste in fragment.pastes {
            let piece = crop_clamped(source, paste.src);
            if piece.width() == 0 || piece.height() == 0 {
                continue;
            }
            let piece = apply_transform(piece, paste.transform);
            let (dx, dy) = paste.dest;
            imageops::replace(&mut canvas, &piece, i64::from(dx), i64::from(dy));
        }

        outputs.push((format!("{}_{}", family, fragment.suffix), canvas));
    }

    Ok(outputs)
}

/// Crop a rectangle, clamped to the source bounds.
fn crop_clamped(source: &RgbaImage, rect: Rect) -> RgbaImage {
    let x = rect.x.min(source.width());
    let y = rect.y.min(source.height());
    let w = rect.w.min(source.width() - x);
    let h = rect.h.min(source.height() - y);
    imageops::crop_imm(source, x, y, w, h).to_image()
}

fn apply_transform(piece: RgbaImage, transform: Transform) -> RgbaImage {
    match transform {
        Transform::None => piece,
        Transform::Rotate90 => imageops::rotate90(&piece),
        Transform::Rotate180 => imageops::rotate180(&piece),
        Transform::Rotate270 => imageops::rotate270(&piece),
        Transform::FlipHorizontal => imageops::flip_horizontal(&piece),
        Transform::FlipVertical => imageops::flip_vertical(&piece),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn full_atlas() -> RgbaImage {
        let (w, h) = LAYOUT.atlas;
        RgbaImage::from_pixel(w, h, RED)
    }

    fn names(outputs: &[(String, RgbaImage)]) -> Vec<&str> {
        outputs.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn output_set_matches_declared_fragments() {
        let outputs = split_atlas(&full_atlas(), "normal").unwrap();
        assert_eq!(
            names(&outputs),
            vec![
                "normal_top",
                "normal_bottom",
                "normal_front",
                "normal_back",
                "normal_left",
                "normal_right",
                "normal_backpack",
                "normal_overlay",
            ]
        );
    }

    #[test]
    fn exception_family_skips_overlay() {
        let outputs = split_atlas(&full_atlas(), "white").unwrap();
        assert!(!names(&outputs).contains(&"white_overlay"));
        assert_eq!(outputs.len(), 7);
    }

    #[test]
    fn unknown_family_fails_fast() {
        assert!(split_atlas(&full_atlas(), "chartreuse").is_err());
    }

    #[test]
    fn output_dimensions_equal_declared_canvases() {
        let outputs = split_atlas(&full_atlas(), "advanced").unwrap();
        for (name, img) in &outputs {
            let fragment = LAYOUT
                .fragments
                .iter()
                .find(|f| name.ends_with(f.suffix))
                .unwrap();
            assert_eq!((img.width(), img.height()), fragment.canvas, "{}", name);
        }
    }

    #[test]
    fn undersized_source_leaves_canvas_transparent() {
        // An 8x8 source sits entirely outside every declared rectangle, so
        // each output is a fully transparent canvas of the declared size.
        let small = RgbaImage::from_pixel(8, 8, RED);
        let outputs = split_atlas(&small, "white").unwrap();

        for (name, img) in &outputs {
            assert_eq!(
                img.get_pixel(img.width() - 1, img.height() - 1),
                &CLEAR,
                "{}",
                name
            );
        }

        // The top fragment reads from (16, 0), entirely outside the source.
        let (_, top) = &outputs[0];
        assert!(top.pixels().all(|p| p == &CLEAR));
    }

    #[test]
    fn backpack_is_composited_from_both_strips() {
        let mut atlas = full_atlas();
        // Shell strip red (already), flap strip blue.
        for y in 16..24 {
            for x in 64..88 {
                atlas.put_pixel(x, y, BLUE);
            }
        }

        let outputs = split_atlas(&atlas, "white").unwrap();
        let (_, backpack) = outputs
            .iter()
            .find(|(n, _)| n == "white_backpack")
            .unwrap();

        assert_eq!((backpack.width(), backpack.height()), (24, 24));
        assert_eq!(backpack.get_pixel(0, 0), &RED); // shell
        assert_eq!(backpack.get_pixel(0, 16), &BLUE); // flap
        assert_eq!(backpack.get_pixel(23, 23), &BLUE);
    }

    #[test]
    fn right_face_is_mirrored() {
        let mut atlas = full_atlas();
        // Mark the top-left pixel of the stored right-face cell.
        atlas.put_pixel(48, 16, BLUE);

        let outputs = split_atlas(&atlas, "white").unwrap();
        let (_, right) = outputs.iter().find(|(n, _)| n == "white_right").unwrap();

        // Mirrored horizontally: lands in the top-right corner.
        assert_eq!(right.get_pixel(15, 0), &BLUE);
        assert_eq!(right.get_pixel(0, 0), &RED);
    }

    #[test]
    fn back_face_is_rotated_half_turn() {
        let mut atlas = full_atlas();
        // Mark the top-left pixel of the stored back-face cell.
        atlas.put_pixel(16, 16, BLUE);

        let outputs = split_atlas(&atlas, "white").unwrap();
        let (_, back) = outputs.iter().find(|(n, _)| n == "white_back").unwrap();

        // Half turn: lands in the bottom-right corner.
        assert_eq!(back.get_pixel(15, 15), &BLUE);
    }
}
