use image::imageops::FilterType;

use crate::Result;

/// NHWC pixel rows for a single image, each channel scaled to `[0, 1]`.
pub type Tensor = Vec<Vec<[f32; 3]>>;

pub fn image_to_tensor(bytes: &[u8], input_size: u32) -> Result<Tensor> {
	let decoded = image::load_from_memory(bytes)?;
	let resized = decoded.resize_exact(input_size, input_size, FilterType::Triangle);
	let rgb = resized.to_rgb8();
	let mut rows = Vec::with_capacity(input_size as usize);

	for y in 0..input_size {
		let mut row = Vec::with_capacity(input_size as usize);

		for x in 0..input_size {
			let pixel = rgb.get_pixel(x, y);

			row.push([
				f32::from(pixel[0]) / 255.0,
				f32::from(pixel[1]) / 255.0,
				f32::from(pixel[2]) / 255.0,
			]);
		}

		rows.push(row);
	}

	Ok(rows)
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

	use super::*;
	use crate::Error;

	fn encode_png(image: DynamicImage) -> Vec<u8> {
		let mut buf = Vec::new();

		image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).expect("encode failed");

		buf
	}

	#[test]
	fn resizes_and_scales_to_unit_range() {
		let png = encode_png(DynamicImage::ImageRgb8(RgbImage::from_pixel(
			10,
			6,
			Rgb([255, 0, 255]),
		)));
		let tensor = image_to_tensor(&png, 224).expect("preprocess failed");

		assert_eq!(tensor.len(), 224);
		assert!(tensor.iter().all(|row| row.len() == 224));
		assert_eq!(tensor[0][0], [1.0, 0.0, 1.0]);
		assert_eq!(tensor[223][223], [1.0, 0.0, 1.0]);
	}

	#[test]
	fn grayscale_is_expanded_to_rgb() {
		let png = encode_png(DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([0]))));
		let tensor = image_to_tensor(&png, 8).expect("preprocess failed");

		assert_eq!(tensor[3][5], [0.0, 0.0, 0.0]);
	}

	#[test]
	fn garbage_bytes_are_bad_input() {
		let err = image_to_tensor(b"definitely not an image", 224).expect_err("Expected error.");

		assert!(matches!(err, Error::Image(_)));
		assert!(err.is_bad_input());
	}
}
