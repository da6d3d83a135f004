use palette::{Srgb, Srgba};

// ---------------------------------------------------------------------------
// Qualitative category palette
// ---------------------------------------------------------------------------

/// The 20-colour "tab20" qualitative palette as (r, g, b).
const TAB20: [(u8, u8, u8); 20] = [
    (31, 119, 180),
    (174, 199, 232),
    (255, 127, 14),
    (255, 187, 120),
    (44, 160, 44),
    (152, 223, 138),
    (214, 39, 40),
    (255, 152, 150),
    (148, 103, 189),
    (197, 176, 213),
    (140, 86, 75),
    (196, 156, 148),
    (227, 119, 194),
    (247, 182, 210),
    (127, 127, 127),
    (199, 199, 199),
    (188, 189, 34),
    (219, 219, 141),
    (23, 190, 207),
    (158, 218, 229),
];

pub fn black() -> Srgba<u8> {
    Srgba::new(0, 0, 0, 255)
}

/// Colour of the `index`-th chart entry; wraps after 20 entries.
pub fn category_color(index: usize) -> Srgba<u8> {
    let (r, g, b) = TAB20[index % TAB20.len()];
    Srgba::new(r, g, b, 255)
}

/// Same colour with its alpha replaced by `alpha` in `[0, 1]`.
pub fn with_alpha(color: Srgba<u8>, alpha: f32) -> Srgba<u8> {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Srgba::new(color.red, color.green, color.blue, a)
}

/// Components scaled to `[0, 1]`, as PDF operators expect them.
pub fn unit_rgb(color: Srgba<u8>) -> (f32, f32, f32) {
    let rgb: Srgb<f32> = color.color.into_format();
    (rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_after_twenty() {
        assert_eq!(category_color(20), category_color(0));
        assert_eq!(category_color(21), category_color(1));
        assert_ne!(category_color(0), category_color(1));
        assert_eq!(category_color(12).alpha, 255);
    }

    #[test]
    fn unit_rgb_scales_components() {
        let (r, g, b) = unit_rgb(black());
        assert_eq!((r, g, b), (0.0, 0.0, 0.0));
        let (r, _, _) = unit_rgb(category_color(2));
        assert!((r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn alpha_is_replaced() {
        assert_eq!(with_alpha(black(), 0.5).alpha, 128);
    }
}
