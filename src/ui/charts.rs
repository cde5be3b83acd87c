use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{
    self, vec2, Align2, Color32, FontId, Painter, Pos2, RichText, Sense, Shape, Stroke, StrokeKind,
    Ui,
};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, Points};

use trade_dash::data::aggregate::{
    BubbleGroups, CountEntry, CrossCounts, GroupMean, HierarchyNode, TopRanking,
};
use trade_dash::data::dashboard::{ChartViews, DashboardOutcome, NO_DATA_MESSAGE};
use trade_dash::data::model::Column;
use trade_dash::layout::{self, Rect};

use crate::color::{label_color, ColorScale};
use crate::state::AppState;
use crate::ui::table;

const CHART_HEIGHT: f32 = 320.0;
const MAX_BUBBLE_RADIUS: f64 = 30.0;
/// Bubbles are drawn in this many size classes per series.
const BUBBLE_SIZE_CLASSES: usize = 8;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the dashboard in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("Imports and Exports Dashboard");
    ui.separator();

    if state.sample.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view transactions  (File → Open…)");
        });
        return;
    }

    let views = match &state.outcome {
        DashboardOutcome::Ready(views) => views,
        DashboardOutcome::NoData => {
            let warning = Color32::from_rgb(0xd9, 0x8c, 0x00);
            ui.label(RichText::new(NO_DATA_MESSAGE).color(warning));
            return;
        }
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            charts(ui, state, views);
        });
}

fn charts(ui: &mut Ui, state: &AppState, views: &ChartViews) {
    ui.columns(2, |cols| {
        section(&mut cols[0], "Percentage of Import and Export Transactions");
        transaction_pie(&mut cols[0], state, &views.transaction_types);

        section(&mut cols[1], "Transactions by Category");
        category_bars(&mut cols[1], state, &views.category_direction);
    });

    section(ui, "Customer-wise Highest Import/Export Transactions");
    customer_bars(ui, state, &views.top_customers);

    section(ui, "Treemap: Transaction Value by Payment Terms and Category");
    treemap(ui, &views.payment_category);

    section(ui, "Bubble Chart: Transaction Value by Category and Shipping Method");
    bubble_chart(ui, state, &views.shipping_bubbles);

    section(ui, "Sunburst Chart: Hierarchical View of Transactions");
    sunburst(ui, &views.category_country_direction);

    section(ui, "Line Chart: Average Value of Transactions by Category");
    mean_line(ui, &views.category_means);

    section(ui, "Filtered Transactions");
    table::transactions_table(ui, state);
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.label(RichText::new(title).heading().strong());
}

/// Axis formatter showing `labels[i]` at integer position `i`.
fn label_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

/// Point at `turn` on a circle, starting at 12 o'clock, counter-clockwise.
fn polar(center: Pos2, radius: f32, turn: f64) -> Pos2 {
    let angle = TAU / 4.0 + turn as f32 * TAU;
    center + vec2(angle.cos(), -angle.sin()) * radius
}

/// Inverse of [`polar`]: radius and turn of `pos`.
fn to_polar(center: Pos2, pos: Pos2) -> (f32, f64) {
    let d = pos - center;
    let angle = (-d.y).atan2(d.x);
    let turn = ((angle - TAU / 4.0) / TAU).rem_euclid(1.0);
    (d.length(), turn as f64)
}

/// Fill the ring segment between `inner` and `outer` radii.
fn annular_sector(
    painter: &Painter,
    center: Pos2,
    (inner, outer): (f32, f32),
    (start, end): (f64, f64),
    fill: Color32,
) {
    let steps = (((end - start) * 96.0).ceil() as usize).max(1);
    for i in 0..steps {
        let a = start + (end - start) * i as f64 / steps as f64;
        let b = start + (end - start) * (i + 1) as f64 / steps as f64;
        let quad = if inner <= 0.0 {
            vec![center, polar(center, outer, a), polar(center, outer, b)]
        } else {
            vec![
                polar(center, inner, a),
                polar(center, outer, a),
                polar(center, outer, b),
                polar(center, inner, b),
            ]
        };
        painter.add(Shape::convex_polygon(quad, fill, Stroke::NONE));
    }
    let edge = Stroke::new(1.0, Color32::WHITE);
    painter.line_segment([polar(center, inner, start), polar(center, outer, start)], edge);
}

fn transaction_pie(ui: &mut Ui, state: &AppState, counts: &[CountEntry]) {
    let size = vec2(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let radius = rect.width().min(rect.height()) * 0.4;
    let center = rect.center();

    let values: Vec<f64> = counts.iter().map(|c| c.count as f64).collect();
    let spans = layout::partition(&values);

    for (entry, &(start, end)) in counts.iter().zip(&spans) {
        let fill = state.color(Column::ImportExport, &entry.label);
        annular_sector(&painter, center, (0.0, radius), (start, end), fill);

        let mid = (start + end) / 2.0;
        painter.text(
            polar(center, radius * 0.6, mid),
            Align2::CENTER_CENTER,
            format!("{:.1}%", entry.share * 100.0),
            FontId::proportional(13.0),
            label_color(fill),
        );
        painter.text(
            polar(center, radius * 1.15, mid),
            Align2::CENTER_CENTER,
            &entry.label,
            FontId::proportional(13.0),
            ui.visuals().text_color(),
        );
    }
}

// ---------------------------------------------------------------------------
// Stacked bars
// ---------------------------------------------------------------------------

/// Draw `charts` stacked on each other, in order.
fn show_stacked(plot: Plot, ui: &mut Ui, charts: Vec<BarChart>) {
    let mut stacked: Vec<BarChart> = Vec::with_capacity(charts.len());
    for chart in charts {
        let chart = {
            let below: Vec<&BarChart> = stacked.iter().collect();
            chart.stack_on(&below)
        };
        stacked.push(chart);
    }
    plot.show(ui, |plot_ui| {
        for chart in stacked {
            plot_ui.bar_chart(chart);
        }
    });
}

fn category_bars(ui: &mut Ui, state: &AppState, table: &CrossCounts) {
    let charts: Vec<BarChart> = table
        .columns
        .iter()
        .map(|direction| {
            let bars = table
                .rows
                .iter()
                .enumerate()
                .map(|(i, category)| {
                    Bar::new(i as f64, table.get(category, direction) as f64)
                        .name(format!("{category} / {direction}"))
                        .width(0.6)
                })
                .collect();
            BarChart::new(bars)
                .name(direction)
                .color(state.color(Column::ImportExport, direction))
        })
        .collect();

    let plot = Plot::new("category_bars")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Category")
        .y_axis_label("Number of Transactions")
        .x_axis_formatter(label_formatter(table.rows.clone()))
        .allow_scroll(false);
    show_stacked(plot, ui, charts);
}

fn customer_bars(ui: &mut Ui, state: &AppState, ranking: &TopRanking) {
    let charts: Vec<BarChart> = ranking
        .breakdown
        .iter()
        .map(|direction| {
            let bars = ranking
                .entries
                .iter()
                .enumerate()
                .map(|(i, entity)| {
                    let value = entity.by_breakdown.get(direction).copied().unwrap_or(0.0);
                    Bar::new(i as f64, value)
                        .name(format!("{} / {direction}", entity.label))
                        .width(0.7)
                })
                .collect();
            BarChart::new(bars)
                .name(direction)
                .color(state.color(Column::ImportExport, direction))
        })
        .collect();

    let labels = ranking.entries.iter().map(|e| e.label.clone()).collect();
    let plot = Plot::new("customer_bars")
        .height(CHART_HEIGHT * 1.2)
        .legend(Legend::default())
        .x_axis_label("Customer")
        .y_axis_label("Transaction Value (in USD)")
        .x_axis_formatter(label_formatter(labels))
        .allow_scroll(false);
    show_stacked(plot, ui, charts);
}

// ---------------------------------------------------------------------------
// Treemap
// ---------------------------------------------------------------------------

fn to_screen(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        Pos2::new(rect.x as f32, rect.y as f32),
        vec2(rect.width as f32, rect.height as f32),
    )
}

fn treemap(ui: &mut Ui, root: &HierarchyNode) {
    let size = vec2(ui.available_width(), CHART_HEIGHT * 1.6);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let bounds = response.rect;
    let scale = ColorScale::red_blue();
    let max_leaf = max_leaf_value(root);

    let tiles = layout::treemap(
        root,
        Rect::new(
            bounds.min.x as f64,
            bounds.min.y as f64,
            bounds.width() as f64,
            bounds.height() as f64,
        ),
        3.0,
    );

    let mut hovered = None;
    for tile in &tiles {
        let rect = to_screen(tile.rect);
        if tile.is_leaf() {
            let fill = scale.color_for(tile.node.value, max_leaf);
            painter.rect_filled(rect, 0.0, fill);
            if rect.width() > 40.0 && rect.height() > 16.0 {
                painter
                    .with_clip_rect(rect)
                    .text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        &tile.node.label,
                        FontId::proportional(12.0),
                        label_color(fill),
                    );
            }
        } else {
            painter.rect_filled(rect, 0.0, ui.visuals().faint_bg_color);
            painter.with_clip_rect(rect).text(
                rect.left_top() + vec2(4.0, 2.0),
                Align2::LEFT_TOP,
                &tile.node.label,
                FontId::proportional(11.0),
                ui.visuals().strong_text_color(),
            );
        }
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::WHITE), StrokeKind::Inside);

        if response.hover_pos().is_some_and(|p| rect.contains(p)) {
            hovered = Some(tile);
        }
    }

    if let Some(tile) = hovered {
        response.on_hover_text_at_pointer(format!(
            "{}\nValue: {:.2}",
            tile.path.join(" / "),
            tile.node.value
        ));
    }
}

fn max_leaf_value(node: &HierarchyNode) -> f64 {
    if node.children.is_empty() {
        return node.value;
    }
    node.children
        .iter()
        .map(max_leaf_value)
        .fold(0.0, f64::max)
}

// ---------------------------------------------------------------------------
// Bubble
// ---------------------------------------------------------------------------

fn bubble_chart(ui: &mut Ui, state: &AppState, groups: &BubbleGroups) {
    let plot = Plot::new("bubble_chart")
        .height(CHART_HEIGHT * 1.6)
        .legend(Legend::default())
        .x_axis_label("Shipping_Method")
        .y_axis_label("Value")
        .x_axis_formatter(label_formatter(groups.x_labels.clone()));

    plot.show(ui, |plot_ui| {
        for series in &groups.series {
            let color = state.color(Column::Category, &series.label);

            // One Points item per size class keeps the item count bounded.
            let mut classes: Vec<Vec<[f64; 2]>> = vec![Vec::new(); BUBBLE_SIZE_CLASSES];
            for point in &series.points {
                let Some(x) = groups.x_position(&point.x_label) else {
                    continue;
                };
                let fraction = layout::bubble_radius(point.value, groups.max_value, 1.0);
                let class = ((fraction * BUBBLE_SIZE_CLASSES as f64).ceil() as usize)
                    .clamp(1, BUBBLE_SIZE_CLASSES)
                    - 1;
                classes[class].push([x as f64, point.value]);
            }

            for (class, points) in classes.into_iter().enumerate() {
                if points.is_empty() {
                    continue;
                }
                let radius = MAX_BUBBLE_RADIUS * (class + 1) as f64 / BUBBLE_SIZE_CLASSES as f64;
                plot_ui.points(
                    Points::new(points)
                        .name(&series.label)
                        .color(color.gamma_multiply(0.6))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius as f32),
                );
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Sunburst
// ---------------------------------------------------------------------------

fn sunburst(ui: &mut Ui, root: &HierarchyNode) {
    let size = vec2(ui.available_width(), CHART_HEIGHT * 1.4);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let rings = root.depth().max(1) as f32;
    let ring_width = rect.width().min(rect.height()) * 0.48 / rings;
    let scale = ColorScale::blues();

    let sectors = layout::sunburst(root);
    let max_by_depth = |depth: usize| {
        sectors
            .iter()
            .filter(|s| s.depth() == depth)
            .map(|s| s.node.value)
            .fold(0.0, f64::max)
    };

    for sector in &sectors {
        let depth = sector.depth() as f32;
        let radii = ((depth - 1.0) * ring_width, depth * ring_width);
        let fill = scale.color_for(sector.node.value, max_by_depth(sector.depth()));
        annular_sector(&painter, center, radii, (sector.start, sector.end), fill);

        let arc_len = sector.sweep() as f32 * TAU * (radii.0 + radii.1) / 2.0;
        if arc_len > 30.0 {
            painter.text(
                polar(center, (radii.0 + radii.1) / 2.0, (sector.start + sector.end) / 2.0),
                Align2::CENTER_CENTER,
                &sector.node.label,
                FontId::proportional(10.0),
                label_color(fill),
            );
        }
    }

    if let Some(pos) = response.hover_pos() {
        let (r, turn) = to_polar(center, pos);
        let depth = (r / ring_width).floor() as usize + 1;
        let hit = sectors
            .iter()
            .find(|s| s.depth() == depth && (s.start..s.end).contains(&turn));
        if let Some(sector) = hit {
            response.on_hover_text_at_pointer(format!(
                "{}\nValue: {:.2}",
                sector.path.join(" / "),
                sector.node.value
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

fn mean_line(ui: &mut Ui, means: &[GroupMean]) {
    let points: Vec<[f64; 2]> = means
        .iter()
        .enumerate()
        .map(|(i, m)| [i as f64, m.mean])
        .collect();
    let labels = means.iter().map(|m| m.label.clone()).collect();

    Plot::new("mean_line")
        .height(CHART_HEIGHT)
        .x_axis_label("Category")
        .y_axis_label("Average Transaction Value (in USD)")
        .x_axis_formatter(label_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points.clone())
                    .name("Average value")
                    .color(Color32::from_rgb(0x1f, 0x77, 0xb4))
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(points)
                    .color(Color32::from_rgb(0x1f, 0x77, 0xb4))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(4.0),
            );
        });
}
