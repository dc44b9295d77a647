use image::imageops::FilterType;
use image::RgbImage;
use ndarray::Array4;

use super::ClassifierError;

/// Spatial resolution the network was trained at.
pub const INPUT_SIZE: u32 = 224;

/// Per-channel normalisation used at training time (ImageNet statistics).
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode an uploaded image and turn it into the network input tensor.
///
/// Steps: decode (JPEG/PNG) -> RGB -> resize to 224x224 (triangle/bilinear)
/// -> scale to [0, 1] -> normalise per channel -> NCHW `[1, 3, 224, 224]`.
pub fn preprocess(image_bytes: &[u8]) -> Result<Array4<f32>, ClassifierError> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| ClassifierError::ImageDecode(e.to_string()))?;

    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(ClassifierError::ImageDecode("image has no pixels".into()));
    }

    Ok(to_tensor(&rgb))
}

/// Resize and normalise an already decoded RGB image.
pub fn to_tensor(rgb: &RgbImage) -> Array4<f32> {
    let resized = if rgb.dimensions() == (INPUT_SIZE, INPUT_SIZE) {
        rgb.clone()
    } else {
        image::imageops::resize(rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
    };

    let side = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, side, side));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            let unit = f32::from(pixel[c]) / 255.0;
            tensor[[0, c, y as usize, x as usize]] = (unit - CHANNEL_MEAN[c]) / CHANNEL_STD[c];
        }
    }
    tensor
}
