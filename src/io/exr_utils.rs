/* Copyright 2020 @TwoCookingMice */

use crate::core::error::OutputError;
use crate::math::bitmap::Bitmap;
use crate::math::energy::Energy;

use exr::prelude::{read_first_rgba_layer_from_file, write_rgb_file};

// Read a linear RGB EXR image from file
pub fn read_exr_from_file(file_path: &str) -> Result<Bitmap, OutputError> {
    log::info!("Starting reading OpenEXR image from: {}.", file_path);

    let image = read_first_rgba_layer_from_file(
        file_path,
        |resolution, _| Bitmap::new(resolution.width(), resolution.height()),
        |bitmap: &mut Bitmap, position, (r, g, b, _a): (f32, f32, f32, f32)| {
            bitmap[(position.x(), position.y())] = Energy::new(r, g, b);
        },
    )?;

    let bitmap = image.layer_data.channel_data.pixels;
    log::info!("OpenEXR loaded, width = {}, height = {}.", bitmap.width(), bitmap.height());
    Ok(bitmap)
}

// Write a linear RGB EXR image to file
pub fn write_exr_to_file(bitmap: &Bitmap, file_path: &str) -> Result<(), OutputError> {
    log::info!("Starting writing openexr images: {}.", file_path);

    let width = bitmap.width();
    write_rgb_file(file_path, width, bitmap.height(), |x, y| {
        let e = &bitmap[(x, y)];
        (e[0], e[1], e[2])
    })?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}
