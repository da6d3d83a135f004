use super::font::text_width;
use super::scene::{HAlign, Point, Scene, Stroke, TextItem, VAlign};
use crate::category::Category;
use crate::color;

/// 10 × 5 in.
pub const PAGE: (f64, f64) = (720.0, 360.0);

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 130.0;
const MARGIN_TOP: f64 = 52.0;
const MARGIN_BOTTOM: f64 = 30.0;
const BAR_FILL: f64 = 0.8;
const TEXT_SIZE: f64 = 9.0;
const TITLE_SIZE: f64 = 12.0;

/// Horizontal bar chart of `entries`, first entry at the bottom.
///
/// Bars are outlines only. Each bar carries its share of the plotted total
/// and its absolute rate; the title quotes `total_rate_khz`.
pub fn bar_chart(entries: &[(Category, f64)], total_rate_khz: f64) -> Scene {
    let (width, height) = PAGE;
    let mut scene = Scene::new(width, height);

    let plot_left = MARGIN_LEFT;
    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = height - MARGIN_BOTTOM;

    let total: f64 = entries.iter().map(|e| e.1).sum();
    let max = entries.iter().map(|e| e.1).fold(0.0, f64::max);
    let x_scale = if max > 0.0 { plot_width / max } else { 0.0 };
    let slot = (plot_bottom - plot_top) / entries.len().max(1) as f64;

    let edge = Stroke {
        color: color::with_alpha(color::black(), 0.5),
        width: 1.0,
    };

    for (i, &(category, rate)) in entries.iter().enumerate() {
        let y_mid = plot_bottom - (i as f64 + 0.5) * slot;
        let half = slot * BAR_FILL / 2.0;
        let x_end = plot_left + rate.max(0.0) * x_scale;

        scene.polygon(
            vec![
                Point::new(plot_left, y_mid - half),
                Point::new(x_end, y_mid - half),
                Point::new(x_end, y_mid + half),
                Point::new(plot_left, y_mid + half),
            ],
            None,
            Some(edge),
        );

        scene.text(
            TextItem::new(Point::new(plot_left - 5.0, y_mid), category.label(), TEXT_SIZE)
                .align(HAlign::Right, VAlign::Center),
        );

        let pct = if total > 0.0 { rate / total * 100.0 } else { 0.0 };
        let pct_text = format!("{pct:.1}%");
        let hz_x = x_end + 3.0 + text_width(&pct_text, TEXT_SIZE) + 8.0;
        scene.text(
            TextItem::new(Point::new(x_end + 3.0, y_mid), pct_text, TEXT_SIZE)
                .align(HAlign::Left, VAlign::Center)
                .bold(),
        );
        scene.text(
            TextItem::new(Point::new(hz_x, y_mid), format!("{rate:.1} Hz"), TEXT_SIZE)
                .align(HAlign::Left, VAlign::Center),
        );
    }

    scene.text(
        TextItem::new(Point::new(width / 2.0, 10.0), "L1 Rates for Seed Categories", TITLE_SIZE)
            .align(HAlign::Center, VAlign::Top),
    );
    scene.text(
        TextItem::new(
            Point::new(width / 2.0, 10.0 + TITLE_SIZE * 1.3),
            format!("(Total rate: {total_rate_khz:.2} kHz)"),
            TITLE_SIZE,
        )
        .align(HAlign::Center, VAlign::Top),
    );
    scene.text(
        TextItem::new(Point::new(14.0, (plot_top + plot_bottom) / 2.0), "Seeds", TEXT_SIZE + 1.0)
            .rotated(90.0)
            .align(HAlign::Center, VAlign::Center),
    );
    scene.text(
        TextItem::new(
            Point::new(plot_left + plot_width / 2.0, height - 10.0),
            "Rates of Seeds",
            TEXT_SIZE + 1.0,
        )
        .align(HAlign::Center, VAlign::Bottom),
    );

    scene
}
