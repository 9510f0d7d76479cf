use tiny_gradient::*;

fn main() {
    let (width, height) = (1000, 200);
    let mut pixmap = Pixmap::new(width, height).unwrap();

    let stops = StopTable::evenly_spaced(&[
        ColorU8::from_rgba(20, 20, 60, 255),
        ColorU8::from_rgba(60, 70, 120, 255),
    ])
    .unwrap();

    let mut shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(width as f32, 0.0),
        stops,
        TileMode::Clamp,
        None,
        Transform::identity(),
    )
    .unwrap();

    let paint = Paint {
        alpha: 255,
        dither: true,
    };
    shader
        .bind(PixelFormat::Rgb565, &paint, Transform::identity())
        .unwrap();

    if !shader.flags().has_span16 {
        eprintln!("Error: the gradient can't be rendered into RGB565.");
        std::process::exit(1);
    }

    let now = std::time::Instant::now();

    // A shallow ramp makes 565 banding visible. The top half is dithered,
    // the bottom half uses only the even pixels' colors.
    let mut row = vec![0u16; width as usize];
    for (y, dst) in pixmap.pixels_mut().chunks_mut(width as usize).enumerate() {
        let y = y as i32;
        if y < height as i32 / 2 {
            shader.shade_span16(0, y, &mut row);
        } else {
            shader.shade_span16(0, 0, &mut row);
            for i in (1..row.len()).step_by(2) {
                row[i] = row[i - 1];
            }
        }

        for (d, c) in dst.iter_mut().zip(row.iter()) {
            let (r, g, b) = unpack_rgb16(*c);
            *d = PremultipliedColorU8::from_rgba(r, g, b, ALPHA_U8_OPAQUE).unwrap();
        }
    }

    println!("Rendered in {:.2}ms", now.elapsed().as_micros() as f64 / 1000.0);

    pixmap.save_png("image.png").unwrap();
}
