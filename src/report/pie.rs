use std::f64::consts::PI;

use super::scene::{HAlign, Point, Scene, Stroke, TextItem, VAlign};
use crate::category::Category;
use crate::color;

/// 6.4 × 4.8 in.
pub const PAGE: (f64, f64) = (460.8, 345.6);

const LABEL_SIZE: f64 = 8.0;
const PCT_SIZE: f64 = 7.0;
const LABEL_DISTANCE: f64 = 1.0;
const PCT_DISTANCE: f64 = 0.6;
/// Angular step of the polygonal arc approximation, in degrees.
const ARC_STEP: f64 = 2.0;

/// Lay out a pie chart of `entries`: one wedge per entry, counter-clockwise
/// from 3 o'clock, labels and percentages rotated to the slice angle, and a
/// colour legend on the right.
pub fn pie_chart(entries: &[(Category, f64)]) -> Scene {
    let (width, height) = PAGE;
    let mut scene = Scene::new(width, height);

    let center = Point::new(width * 0.38, height / 2.0);
    let radius = height * 0.32;
    let total: f64 = entries.iter().map(|e| e.1.max(0.0)).sum();

    if total <= 0.0 {
        let outline = arc(center, radius, 0.0, 360.0);
        scene.polygon(
            outline,
            None,
            Some(Stroke {
                color: color::black(),
                width: 0.8,
            }),
        );
    } else {
        let mut start = 0.0;
        for (i, &(category, rate)) in entries.iter().enumerate() {
            let frac = rate.max(0.0) / total;
            let sweep = 360.0 * frac;
            if sweep > 0.0 {
                let mut points = vec![center];
                points.extend(arc(center, radius, start, start + sweep));
                scene.polygon(points, Some(color::category_color(i)), None);
            }

            let mid = start + sweep / 2.0;
            let (rotation, halign) = label_rotation(mid);
            scene.text(
                TextItem::new(polar(center, radius * LABEL_DISTANCE, mid), category.label(), LABEL_SIZE)
                    .rotated(rotation)
                    .align(halign, VAlign::Center),
            );
            scene.text(
                TextItem::new(
                    polar(center, radius * PCT_DISTANCE, mid),
                    format!("{:.1}%", frac * 100.0),
                    PCT_SIZE,
                )
                .rotated(rotation)
                .align(HAlign::Center, VAlign::Center),
            );

            start += sweep;
        }
    }

    legend(&mut scene, entries);
    scene
}

/// Text rotation for a label at angle `mid` (degrees): along the radius,
/// flipped on the left half so it never reads upside down.
fn label_rotation(mid: f64) -> (f64, HAlign) {
    if (mid * PI / 180.0).cos() > 0.0 {
        (mid, HAlign::Left)
    } else {
        (mid + 180.0, HAlign::Right)
    }
}

fn legend(scene: &mut Scene, entries: &[(Category, f64)]) {
    let (width, height) = PAGE;
    let x = width * 0.78;
    let row = 14.0;
    let top = (height - row * entries.len() as f64) / 2.0;

    for (i, (category, _)) in entries.iter().enumerate() {
        let y = top + row * i as f64;
        let swatch = vec![
            Point::new(x, y),
            Point::new(x + 10.0, y),
            Point::new(x + 10.0, y + 8.0),
            Point::new(x, y + 8.0),
        ];
        scene.polygon(swatch, Some(color::category_color(i)), None);
        scene.text(
            TextItem::new(Point::new(x + 14.0, y + 4.0), category.label(), LABEL_SIZE)
                .align(HAlign::Left, VAlign::Center),
        );
    }
}

/// Point at `angle` degrees counter-clockwise from 3 o'clock.
fn polar(center: Point, r: f64, angle: f64) -> Point {
    let (sin, cos) = angle.to_radians().sin_cos();
    Point::new(center.x + r * cos, center.y - r * sin)
}

fn arc(center: Point, r: f64, from: f64, to: f64) -> Vec<Point> {
    let steps = ((to - from) / ARC_STEP).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|k| polar(center, r, from + (to - from) * k as f64 / steps as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::scene::Shape;

    fn wedges(scene: &Scene) -> usize {
        scene
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Polygon { points, fill: Some(_), .. } if points.len() > 4))
            .count()
    }

    #[test]
    fn one_wedge_per_nonzero_entry() {
        let entries = [
            (Category::SingleMu, 100.0),
            (Category::MultiMu, 50.0),
            (Category::Jet, 0.0),
            (Category::ZeroBias, 50.0),
        ];
        let scene = pie_chart(&entries);
        assert_eq!(wedges(&scene), 3);

        let texts: Vec<&str> = scene.texts().map(|t| t.content.as_str()).collect();
        assert!(texts.contains(&"SingleMu"));
        assert!(texts.contains(&"50.0%"));
        assert!(texts.contains(&"25.0%"));
        assert!(texts.contains(&"0.0%"));
    }

    #[test]
    fn left_half_labels_are_flipped() {
        assert_eq!(label_rotation(45.0), (45.0, HAlign::Left));
        assert_eq!(label_rotation(135.0), (315.0, HAlign::Right));
        assert_eq!(label_rotation(300.0), (300.0, HAlign::Left));
    }

    #[test]
    fn all_zero_draws_only_the_outline() {
        let entries: Vec<(Category, f64)> = Category::PHYSICS.iter().map(|&c| (c, 0.0)).collect();
        let scene = pie_chart(&entries);
        assert_eq!(wedges(&scene), 0);
        // legend only
        assert_eq!(scene.texts().count(), 12);
    }

    #[test]
    fn every_entry_gets_a_wedge() {
        let entries: Vec<(Category, f64)> = Category::ALL.iter().map(|&c| (c, 1.0)).collect();
        let scene = pie_chart(&entries);
        assert_eq!(wedges(&scene), 13);
    }
}
