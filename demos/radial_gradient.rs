use std::sync::Arc;

use tiny_gradient::*;

fn main() {
    let mut pixmap = Pixmap::new(1000, 1000).unwrap();

    let now = std::time::Instant::now();

    let stops = StopTable::evenly_spaced(&[
        ColorU8::from_rgba(50, 127, 150, 255),
        ColorU8::from_rgba(220, 140, 75, 255),
        ColorU8::from_rgba(40, 40, 40, 255),
    ])
    .unwrap();

    let mapper: Arc<dyn UnitMapper> = Arc::new(DiscreteMapper::new(12));
    let mut shader = RadialGradient::new(
        Point::from_xy(500.0, 500.0),
        200.0,
        stops,
        TileMode::Repeat,
        Some(mapper),
        Transform::from_row(1.0, 0.3, 0.0, 0.7, 0.0, 100.0),
    )
    .unwrap();

    let paint = Paint {
        alpha: 220,
        dither: false,
    };
    shader
        .bind(PixelFormat::Rgba8888, &paint, Transform::identity())
        .unwrap();

    pixmap.shade(&mut shader);

    println!("Rendered in {:.2}ms", now.elapsed().as_micros() as f64 / 1000.0);

    pixmap.save_png("image.png").unwrap();
}
