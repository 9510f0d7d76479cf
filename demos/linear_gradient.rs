use tiny_gradient::*;

fn main() {
    let mut pixmap = Pixmap::new(1000, 1000).unwrap();

    let now = std::time::Instant::now();

    let stops = StopTable::new(
        &[
            ColorU8::from_rgba(50, 127, 150, 200),
            ColorU8::from_rgba(220, 140, 75, 180),
            ColorU8::from_rgba(40, 180, 55, 255),
        ],
        Some(&[0.0, 0.6, 1.0]),
    )
    .unwrap();

    let mut shader = LinearGradient::new(
        Point::from_xy(100.0, 100.0),
        Point::from_xy(500.0, 500.0),
        stops,
        TileMode::Mirror,
        None,
        Transform::identity(),
    )
    .unwrap();

    pixmap.shade(&mut shader);

    println!("Rendered in {:.2}ms", now.elapsed().as_micros() as f64 / 1000.0);

    pixmap.save_png("image.png").unwrap();
}
