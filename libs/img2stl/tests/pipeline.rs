use approx::assert_relative_eq;
use config::ConversionConfig;
use glam::DVec3;
use img2stl::stl::stored_normal;
use img2stl::{convert, convert_into, read_binary_stl, ConvertError, PixelBuffer};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn solid(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |_, _| BLACK).unwrap()
}

#[test]
fn single_pixel_becomes_a_closed_box() {
    let pixels = solid(1, 1);
    let cfg = ConversionConfig::default().with_width_mm(5.0);
    let conversion = convert(&pixels, &cfg).unwrap();
    assert_eq!(conversion.report.triangle_count, 12);
    assert_eq!(conversion.stl.len(), 84 + 50 * 12);

    let model = read_binary_stl(&conversion.stl).unwrap();
    let (min, max) = model.bounding_box().unwrap();
    assert_eq!(min, DVec3::ZERO);
    assert_eq!(max, DVec3::new(5.0, 5.0, 2.0));
}

#[test]
fn adjacent_pixels_share_a_wall() {
    let conversion = convert(&solid(2, 1), &ConversionConfig::default()).unwrap();
    assert_eq!(conversion.report.triangle_count, 20);
}

#[test]
fn stored_normals_match_winding() {
    let pixels = PixelBuffer::from_fn(4, 4, |x, y| if (x + y) % 3 == 0 { BLACK } else { WHITE })
        .unwrap();
    let conversion = convert(&pixels, &ConversionConfig::default().with_width_mm(8.0)).unwrap();
    let model = read_binary_stl(&conversion.stl).unwrap();
    for (i, triangle) in model.triangles.iter().enumerate() {
        let stored = stored_normal(&conversion.stl, i).unwrap();
        let computed = triangle.normal();
        assert_relative_eq!(stored.x, computed.x, epsilon = 1e-6);
        assert_relative_eq!(stored.y, computed.y, epsilon = 1e-6);
        assert_relative_eq!(stored.z, computed.z, epsilon = 1e-6);
        assert_relative_eq!(stored.length(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn header_carries_the_name() {
    let cfg = ConversionConfig::default().with_name("badge");
    let conversion = convert(&solid(1, 1), &cfg).unwrap();
    assert_eq!(&conversion.stl[..5], b"badge");
    assert!(conversion.stl[5..80].iter().all(|&b| b == 0));
}

// =============================================================================
// EMPTY RESULT
// =============================================================================

#[test]
fn zero_threshold_is_an_empty_result() {
    let mut sink = Vec::new();
    let cfg = ConversionConfig::default().with_threshold(0);
    let err = convert_into(&solid(3, 3), &cfg, &mut sink).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::EmptyResult {
            width: 3,
            height: 3,
            threshold: 0,
            resampled: false
        }
    ));
    // no 84-byte stub is written
    assert!(sink.is_empty());
}

#[test]
fn transparent_image_is_an_empty_result() {
    let pixels = PixelBuffer::from_fn(6, 2, |_, _| CLEAR).unwrap();
    let err = convert(&pixels, &ConversionConfig::default().with_threshold(255)).unwrap_err();
    assert!(err.to_string().contains("No foreground region detected"));
}

#[test]
fn resampling_can_miss_all_ink() {
    // srcX/srcY sample 0 and 5 only; the ink at (1, 1) is skipped
    let pixels = PixelBuffer::from_fn(10, 10, |x, y| if (x, y) == (1, 1) { BLACK } else { WHITE })
        .unwrap();
    let err = convert(&pixels, &ConversionConfig::default().with_max_px(2)).unwrap_err();
    assert!(matches!(err, ConvertError::EmptyResult { resampled: true, .. }));
}

// =============================================================================
// SCALE AND DETERMINISM
// =============================================================================

#[test]
fn physical_size_survives_resampling() {
    let pixels = solid(300, 150);
    let full = ConversionConfig::default().with_width_mm(60.0);
    let reduced = full.clone().with_max_px(50);

    for cfg in [full, reduced] {
        let conversion = convert(&pixels, &cfg).unwrap();
        assert_relative_eq!(conversion.report.width_mm, 60.0);
        assert_relative_eq!(conversion.report.height_mm, 30.0);

        let model = read_binary_stl(&conversion.stl).unwrap();
        let (min, max) = model.bounding_box().unwrap();
        assert_relative_eq!(min.x, 0.0);
        assert_relative_eq!(max.x, 60.0, max_relative = 1e-6);
        assert_relative_eq!(max.y, 30.0, max_relative = 1e-6);
    }
}

/// Thin images round their short side hard; the long side must still keep
/// its length and neither axis may drift by more than half a cell.
#[test]
fn thin_images_keep_their_size_after_resampling() {
    let cases = [
        (3, 1000, ConversionConfig::default()),
        (3, 1000, ConversionConfig::default().with_height_mm(100.0)),
        (1000, 3, ConversionConfig::default().with_height_mm(3.0)),
        (1000, 3, ConversionConfig::default().with_width_mm(250.0)),
    ];

    for (width, height, cfg) in cases {
        let conversion = convert(&solid(width, height), &cfg).unwrap();
        let report = &conversion.report;
        assert!(report.resampled);
        assert_eq!(report.mask_width.max(report.mask_height), 400);

        let model = read_binary_stl(&conversion.stl).unwrap();
        let (min, max) = model.bounding_box().unwrap();
        let size = max - min;
        let half_cell = report.effective_scale_mm_per_cell / 2.0;
        let tolerance = half_cell + 1e-4 * report.width_mm.max(report.height_mm);

        assert!(
            (size.x - report.width_mm).abs() <= tolerance,
            "{width}x{height}: geometry width {} vs report {}",
            size.x,
            report.width_mm
        );
        assert!(
            (size.y - report.height_mm).abs() <= tolerance,
            "{width}x{height}: geometry height {} vs report {}",
            size.y,
            report.height_mm
        );

        let (long_geometry, long_report) = if width > height {
            (size.x, report.width_mm)
        } else {
            (size.y, report.height_mm)
        };
        assert_relative_eq!(long_geometry, long_report, max_relative = 1e-6);
    }
}

#[test]
fn output_is_deterministic_and_parallel_safe() {
    let pixels = PixelBuffer::from_fn(90, 70, |x, y| {
        if (x * 7 + y * 13) % 5 < 2 {
            BLACK
        } else {
            WHITE
        }
    })
    .unwrap();
    let cfg = ConversionConfig::default().with_height_mm(35.0);
    let first = convert(&pixels, &cfg).unwrap();
    let second = convert(&pixels, &cfg).unwrap();
    let parallel = convert(&pixels, &cfg.clone().with_parallel(true)).unwrap();
    assert_eq!(first.stl, second.stl);
    assert_eq!(first.stl, parallel.stl);
}

#[test]
fn malformed_pixels_are_invalid_input() {
    let err = PixelBuffer::new(3, 3, vec![0; 10]).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidInput { .. }));
}
