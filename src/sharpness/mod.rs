//! Photo sharpness screening.
//!
//! Classifies a candidate accident-scene photo as usably sharp or blurry
//! using the variance of the 4-neighbor Laplacian over a downscaled
//! grayscale copy. Low variance in the edge response means a smooth,
//! likely out-of-focus image.
//!
//! A photo that cannot be decoded or analyzed never produces an error:
//! the boundary maps it to a neutral non-blurry result so a failed
//! quality check can never block claim submission.

pub mod cache;

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

/// Laplacian variance below this is considered blurry.
pub const BLUR_THRESHOLD: f64 = 100.0;

/// Longer image edge is scaled down to at most this before analysis.
pub const ANALYSIS_MAX_EDGE: u32 = 200;

pub const MSG_BLURRY: &str = "Photo appears blurry. Try again with steadier hands.";
pub const MSG_ACCEPTABLE: &str = "Photo quality is acceptable but could be clearer.";
pub const MSG_SHARP: &str = "Great photo! Clear and sharp.";
pub const MSG_UNANALYZABLE: &str = "Unable to analyze";

#[derive(Debug, Clone, Copy)]
pub struct SharpnessConfig {
    /// Variance threshold separating blurry from sharp.
    pub threshold: f64,
    /// Analysis resolution cap in pixels.
    pub max_edge: u32,
}

impl Default for SharpnessConfig {
    fn default() -> Self {
        Self {
            threshold: BLUR_THRESHOLD,
            max_edge: ANALYSIS_MAX_EDGE,
        }
    }
}

/// Verdict returned to the caller for one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharpnessResult {
    pub is_blurry: bool,
    /// 0-100, saturating at 100.
    pub score: u8,
    pub message: String,
}

/// Raw analysis outcome, before the fail-open mapping at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Analysis {
    Analyzed { variance: f64 },
    Unanalyzable,
}

impl Analysis {
    /// Maps the analysis to the caller-facing verdict.
    ///
    /// `Unanalyzable` becomes a neutral non-blurry result: the check is
    /// advisory and must not stand between the user and submission.
    pub fn into_result(self, config: &SharpnessConfig) -> SharpnessResult {
        match self {
            Analysis::Unanalyzable => SharpnessResult {
                is_blurry: false,
                score: 100,
                message: MSG_UNANALYZABLE.to_string(),
            },
            Analysis::Analyzed { variance } => {
                let is_blurry = variance < config.threshold;
                let score = ((variance / config.threshold) * 100.0).round().min(100.0) as u8;
                SharpnessResult {
                    is_blurry,
                    score,
                    message: select_message(is_blurry, score).to_string(),
                }
            }
        }
    }
}

/// Feedback text for a verdict. A blurry verdict always wins; otherwise
/// the score decides between "acceptable" and "great".
pub fn select_message(is_blurry: bool, score: u8) -> &'static str {
    if is_blurry {
        MSG_BLURRY
    } else if score < 60 {
        MSG_ACCEPTABLE
    } else {
        MSG_SHARP
    }
}

/// Variance of the 4-neighbor Laplacian over all interior pixels.
///
/// Returns `None` when the image has no interior (either dimension < 3).
pub fn laplacian_variance(gray: &[f64], width: usize, height: usize) -> Option<f64> {
    debug_assert_eq!(gray.len(), width * height);

    if width < 3 || height < 3 {
        return None;
    }

    let mut sum = 0.0;
    let mut count = 0u64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y * width + x;
            // Kernel: [0,1,0],[1,-4,1],[0,1,0]
            let lap = gray[idx - width] + gray[idx - 1] + gray[idx + 1] + gray[idx + width]
                - 4.0 * gray[idx];
            sum += lap * lap;
            count += 1;
        }
    }

    Some(sum / count as f64)
}

/// Analyzes a decoded image: downscale, grayscale, Laplacian variance.
pub fn evaluate_image(img: &DynamicImage, config: &SharpnessConfig) -> Analysis {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Analysis::Unanalyzable;
    }

    let max_edge = config.max_edge as f64;
    // Never upscale: images already under the cap are analyzed at native
    // resolution (upscaling would synthesize edges and bias the variance).
    let scale = (max_edge / width as f64)
        .min(max_edge / height as f64)
        .min(1.0);

    let scaled;
    let rgb = if scale < 1.0 {
        let sw = ((width as f64 * scale).round() as u32).max(1);
        let sh = ((height as f64 * scale).round() as u32).max(1);
        scaled = img.resize_exact(sw, sh, FilterType::Triangle);
        scaled.to_rgb8()
    } else {
        img.to_rgb8()
    };

    // Standard-weighted luminance; alpha is ignored.
    let gray: Vec<f64> = rgb
        .pixels()
        .map(|p| 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64)
        .collect();

    match laplacian_variance(&gray, rgb.width() as usize, rgb.height() as usize) {
        Some(variance) => Analysis::Analyzed { variance },
        None => Analysis::Unanalyzable,
    }
}

/// Decodes raw image bytes and evaluates sharpness.
///
/// Fails open: undecodable input yields the neutral "Unable to analyze"
/// result rather than an error.
pub fn evaluate_bytes(bytes: &[u8], config: &SharpnessConfig) -> SharpnessResult {
    match image::load_from_memory(bytes) {
        Ok(img) => evaluate_image(&img, config).into_result(config),
        Err(_) => Analysis::Unanalyzable.into_result(config),
    }
}

/// Evaluates one photo off the async runtime's blocking pool.
///
/// `id` is a caller-supplied correlation id echoed back with the result so
/// in-flight analyses for different photo slots can be tracked independently.
pub async fn analyze_photo(bytes: Vec<u8>, id: u64, config: SharpnessConfig) -> (u64, SharpnessResult) {
    let result = tokio::task::spawn_blocking(move || evaluate_bytes(&bytes, &config))
        .await
        .unwrap_or_else(|_| Analysis::Unanalyzable.into_result(&config));
    (id, result)
}

/// Runs any number of analyses concurrently, keyed by correlation id.
///
/// Each analysis owns its decode buffer; there is no shared state between
/// them. Results come back sorted by id.
pub async fn analyze_many(
    photos: Vec<(u64, Vec<u8>)>,
    config: SharpnessConfig,
) -> Vec<(u64, SharpnessResult)> {
    let mut set = JoinSet::new();
    for (id, bytes) in photos {
        set.spawn(analyze_photo(bytes, id, config));
    }

    let mut results = Vec::new();
    while let Some(joined) = set.join_next().await {
        if let Ok(pair) = joined {
            results.push(pair);
        }
    }
    results.sort_by_key(|(id, _)| *id);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    fn uniform(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value; 3])))
    }

    #[test]
    fn test_checkerboard_is_sharp() {
        let config = SharpnessConfig::default();
        let result = evaluate_image(&checkerboard(800, 600), &config).into_result(&config);
        assert!(!result.is_blurry);
        assert_eq!(result.score, 100);
        assert_eq!(result.message, MSG_SHARP);
    }

    #[test]
    fn test_uniform_is_blurry() {
        let config = SharpnessConfig::default();
        let analysis = evaluate_image(&uniform(800, 600, 128), &config);
        match analysis {
            Analysis::Analyzed { variance } => assert_eq!(variance, 0.0),
            Analysis::Unanalyzable => panic!("uniform image should be analyzable"),
        }
        let result = analysis.into_result(&config);
        assert!(result.is_blurry);
        assert_eq!(result.score, 0);
        assert_eq!(result.message, MSG_BLURRY);
    }

    #[test]
    fn test_deterministic() {
        let config = SharpnessConfig::default();
        let img = checkerboard(64, 48);
        let a = evaluate_image(&img, &config).into_result(&config);
        let b = evaluate_image(&img, &config).into_result(&config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_saturates() {
        let config = SharpnessConfig::default();
        for variance in [0.0, 50.0, 99.9, 100.0, 250.0, 1e9] {
            let result = Analysis::Analyzed { variance }.into_result(&config);
            assert!(result.score <= 100, "variance {} gave {}", variance, result.score);
        }
    }

    #[test]
    fn test_threshold_consistency() {
        let config = SharpnessConfig::default();
        for variance in [0.0, 12.5, 99.4, 100.0, 101.0, 400.0] {
            let result = Analysis::Analyzed { variance }.into_result(&config);
            assert_eq!(result.is_blurry, variance < config.threshold);
            let expected = ((variance / config.threshold) * 100.0).round().min(100.0) as u8;
            assert_eq!(result.score, expected);
        }
    }

    #[test]
    fn test_blurry_at_rounding_boundary() {
        // A variance just under the threshold rounds up to a full score,
        // but the blurry flag comes from the raw comparison.
        let config = SharpnessConfig::default();
        let result = Analysis::Analyzed { variance: 99.7 }.into_result(&config);
        assert!(result.is_blurry);
        assert_eq!(result.score, 100);
        assert_eq!(result.message, MSG_BLURRY);
    }

    #[test]
    fn test_message_score_coupling() {
        // Blurry wins regardless of score.
        assert_eq!(select_message(true, 0), MSG_BLURRY);
        assert_eq!(select_message(true, 59), MSG_BLURRY);
        assert_eq!(select_message(true, 99), MSG_BLURRY);

        // Not blurry: the acceptable text iff score < 60.
        assert_eq!(select_message(false, 0), MSG_ACCEPTABLE);
        assert_eq!(select_message(false, 59), MSG_ACCEPTABLE);
        assert_eq!(select_message(false, 60), MSG_SHARP);
        assert_eq!(select_message(false, 100), MSG_SHARP);

        let config = SharpnessConfig::default();
        let blurry = Analysis::Analyzed { variance: 40.0 }.into_result(&config);
        assert_eq!(blurry.message, MSG_BLURRY);

        let great = Analysis::Analyzed { variance: 500.0 }.into_result(&config);
        assert!(!great.is_blurry);
        assert_eq!(great.message, MSG_SHARP);
    }

    #[test]
    fn test_fail_open_on_garbage() {
        let config = SharpnessConfig::default();
        for bytes in [&b""[..], &b"not an image"[..], &[0xFF, 0xD8, 0x00][..]] {
            let result = evaluate_bytes(bytes, &config);
            assert!(!result.is_blurry);
            assert_eq!(result.score, 100);
            assert_eq!(result.message, MSG_UNANALYZABLE);
        }
    }

    #[test]
    fn test_no_interior_is_unanalyzable() {
        let config = SharpnessConfig::default();
        assert_eq!(
            evaluate_image(&uniform(2, 2, 10), &config),
            Analysis::Unanalyzable
        );
        assert_eq!(
            evaluate_image(&uniform(1, 200, 10), &config),
            Analysis::Unanalyzable
        );
    }

    #[test]
    fn test_laplacian_variance_flat() {
        let gray = vec![77.0; 25];
        assert_eq!(laplacian_variance(&gray, 5, 5), Some(0.0));
    }

    #[test]
    fn test_laplacian_variance_single_spike() {
        // 3x3 with a single bright center: only interior pixel sees
        // L = 4*0 - 4*100 = -400, variance = 160000.
        let mut gray = vec![0.0; 9];
        gray[4] = 100.0;
        assert_eq!(laplacian_variance(&gray, 3, 3), Some(160_000.0));
    }

    #[tokio::test]
    async fn test_analyze_many_keyed_by_id() {
        let config = SharpnessConfig::default();
        let mut buf = Vec::new();
        let img = checkerboard(32, 32);
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();

        let photos = vec![(3, buf.clone()), (1, b"garbage".to_vec()), (2, buf)];
        let results = analyze_many(photos, config).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 1);
        assert_eq!(results[0].1.message, MSG_UNANALYZABLE);
        assert_eq!(results[1].0, 2);
        assert!(!results[1].1.is_blurry);
        assert_eq!(results[2].0, 3);
    }
}
