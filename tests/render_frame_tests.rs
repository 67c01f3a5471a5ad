use series_sketch::core::{LinearScale, ScaleAxis, Viewport};
use series_sketch::render::{
    Color, LinePrimitive, MarkerPrimitive, NullRenderer, RenderFrame, Renderer, SERIES_PALETTE,
    SeriesStroke, TextHAlign, TextPrimitive, series_color,
};

#[test]
fn vertical_scale_grows_upward() {
    let viewport = Viewport::new(1000, 600);
    let scale = LinearScale::new(0.0, 100.0, ScaleAxis::Vertical).expect("valid scale");

    assert_eq!(scale.domain_to_pixel(0.0, viewport).expect("bottom"), 600.0);
    assert_eq!(scale.domain_to_pixel(100.0, viewport).expect("top"), 0.0);
    let recovered = scale
        .pixel_to_domain(scale.domain_to_pixel(42.5, viewport).expect("to pixel"), viewport)
        .expect("from pixel");
    assert!((recovered - 42.5).abs() <= 1e-9);
    assert!(
        scale
            .domain_to_pixel(1.0, Viewport::new(0, 0))
            .is_err()
    );
    assert!(LinearScale::new(5.0, 5.0, ScaleAxis::Horizontal).is_err());
}

#[test]
fn frame_validation_rejects_bad_geometry() {
    let viewport = Viewport::new(800, 400);
    let blue = series_color(0).color;

    let frame = RenderFrame::new(viewport)
        .with_line(LinePrimitive::new(0.0, 0.0, 10.0, 10.0, 1.0, blue))
        .with_marker(MarkerPrimitive::new(5.0, 5.0, 3.0, blue))
        .with_text(TextPrimitive::new(
            "load",
            700.0,
            20.0,
            12.0,
            blue,
            TextHAlign::Right,
        ));
    frame.validate().expect("valid frame");
    assert!(!frame.is_empty());
    assert!(RenderFrame::new(viewport).is_empty());

    let bad_marker = RenderFrame::new(viewport).with_marker(MarkerPrimitive::new(1.0, 1.0, 0.0, blue));
    assert!(bad_marker.validate().is_err());
    let bad_line = RenderFrame::new(viewport)
        .with_line(LinePrimitive::new(f64::NAN, 0.0, 1.0, 1.0, 1.0, blue));
    assert!(bad_line.validate().is_err());
    let bad_color = RenderFrame::new(viewport).with_line(LinePrimitive::new(
        0.0,
        0.0,
        1.0,
        1.0,
        1.0,
        Color::rgba(1.2, 0.0, 0.0, 1.0),
    ));
    assert!(bad_color.validate().is_err());
}

#[test]
fn null_renderer_counts_primitives_of_the_last_frame() {
    let mut renderer = NullRenderer::default();
    let color = series_color(3).color;
    let frame = RenderFrame::new(Viewport::new(100, 100))
        .with_line(LinePrimitive::new(0.0, 0.0, 1.0, 1.0, 1.0, color))
        .with_line(LinePrimitive::new(1.0, 1.0, 2.0, 2.0, 1.0, color));

    renderer.render(&frame).expect("render");
    renderer
        .render(&RenderFrame::new(Viewport::new(100, 100)))
        .expect("render empty");

    assert_eq!(renderer.frames_rendered, 2);
    assert_eq!(renderer.last_line_count, 0);
}

#[test]
fn palette_wraps_after_nine_series() {
    assert_eq!(SERIES_PALETTE.len(), 9);
    assert_eq!(series_color(9), series_color(0));
    assert_eq!(series_color(3).name, "purple");
    assert_eq!(series_color(10).name, "green");
}

#[test]
fn polylines_break_at_missing_points() {
    let stroke = SeriesStroke {
        line_width: 2.0,
        marker_radius: 3.0,
        color: series_color(0).color,
    };
    let frame = RenderFrame::new(Viewport::new(400, 200)).with_polyline(
        &[
            Some((0.0, 10.0)),
            Some((10.0, 20.0)),
            None,
            Some((30.0, 40.0)),
            Some((40.0, 50.0)),
        ],
        stroke,
    );

    assert_eq!(frame.markers.len(), 4);
    assert_eq!(frame.lines.len(), 2);
    assert_eq!(frame.lines[1].x1, 30.0);
    frame.validate().expect("valid frame");
}

#[test]
fn rules_and_legend_are_placed_from_the_viewport() {
    let frame = RenderFrame::new(Viewport::new(400, 200))
        .with_vertical_rule(25.0, 1.0, series_color(1).color)
        .with_legend(
            [("a", series_color(0).color), ("b", series_color(1).color)],
            12.0,
            8.0,
        );

    assert_eq!(frame.lines[0].y1, 0.0);
    assert_eq!(frame.lines[0].y2, 200.0);
    assert_eq!(frame.texts.len(), 2);
    assert_eq!(frame.texts[1].text, "b");
    assert_eq!(frame.texts[1].x, 392.0);
    assert_eq!(frame.texts[1].y, 32.0);
    assert_eq!(frame.texts[1].h_align, TextHAlign::Right);
    assert_eq!(frame.primitive_count(), 3);
}
