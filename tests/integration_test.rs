//! Integration tests for the complete regionize pipeline
//!
//! These tests validate the end-to-end workflow including:
//! - Output naming and format
//! - Mask contents for known images
//! - Error kinds and the no-partial-output guarantee
//! - Agreement between merge strategies and parallel/sequential paths

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regionizer::{regionize_file, MergeStrategy, RegionizeError, Regionizer, RegionizerConfig};
use std::path::{Path, PathBuf};

fn write_png(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Image made of a few flat colors with sharp edges and some gradients
fn random_blocks(rng: &mut StdRng, width: u32, height: u32) -> RgbImage {
    let palette = [
        [0u8, 0, 0],
        [255, 255, 255],
        [200, 30, 30],
        [202, 31, 29],
        [30, 30, 200],
    ];
    RgbImage::from_fn(width, height, |_, _| {
        Rgb(palette[rng.random_range(0..palette.len())])
    })
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_writes_mask_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut img = RgbImage::from_pixel(4, 3, Rgb([240, 240, 240]));
    img.put_pixel(3, 0, Rgb([0, 0, 0]));
    let input = write_png(dir.path(), "sample.png", &img);

    let written = regionize_file(&input, &RegionizerConfig::default()).unwrap();

    assert_eq!(written, dir.path().join("sample_regionized.png"));
    let mask = image::open(&written).unwrap().to_rgb8();
    assert_eq!(mask.dimensions(), (4, 3));
    // The dark corner and its left and lower neighbours
    assert_eq!(mask.get_pixel(3, 0).0, [0, 0, 0]);
    assert_eq!(mask.get_pixel(2, 0).0, [0, 0, 0]);
    assert_eq!(mask.get_pixel(3, 1).0, [0, 0, 0]);
    assert_eq!(mask.get_pixel(0, 2).0, [255, 255, 255]);
    assert_eq!(mask.get_pixel(0, 0).0, [255, 255, 255]);
    assert!(mask.pixels().all(|p| p.0 == [0, 0, 0] || p.0 == [255, 255, 255]));
}

#[test]
fn test_uniform_image_gives_white_mask() {
    let dir = tempfile::tempdir().unwrap();
    let img = RgbImage::from_pixel(5, 5, Rgb([17, 99, 180]));
    let input = write_png(dir.path(), "flat.png", &img);

    let written = regionize_file(&input, &RegionizerConfig::default()).unwrap();
    let mask = image::open(&written).unwrap().to_rgb8();
    assert!(mask.pixels().all(|p| p.0 == [255, 255, 255]));
}

#[test]
fn test_frame_edges_reproduces_legacy_framing() {
    let dir = tempfile::tempdir().unwrap();
    let img = RgbImage::from_pixel(3, 3, Rgb([120, 120, 120]));
    let input = write_png(dir.path(), "flat.png", &img);

    let config = RegionizerConfig {
        frame_edges: true,
        ..RegionizerConfig::default()
    };
    let written = regionize_file(&input, &config).unwrap();
    let mask = image::open(&written).unwrap().to_rgb8();

    for i in 0..3 {
        assert_eq!(mask.get_pixel(i, 0).0, [0, 0, 0]);
        assert_eq!(mask.get_pixel(0, i).0, [0, 0, 0]);
    }
    assert_eq!(mask.get_pixel(1, 1).0, [255, 255, 255]);
}

#[test]
fn test_custom_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(dir.path(), "a.png", &RgbImage::new(2, 2));
    let config = RegionizerConfig {
        output_suffix: "_mask".to_string(),
        ..RegionizerConfig::default()
    };

    let written = regionize_file(&input, &config).unwrap();
    assert_eq!(written, dir.path().join("a_mask.png"));
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let input = write_png(dir.path(), "noise.png", &random_blocks(&mut rng, 16, 12));

    let written = regionize_file(&input, &RegionizerConfig::default()).unwrap();
    let first = std::fs::read(&written).unwrap();
    regionize_file(&input, &RegionizerConfig::default()).unwrap();
    let second = std::fs::read(&written).unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let result = regionize_file(&dir.path().join("nope.png"), &RegionizerConfig::default());

    assert!(matches!(result, Err(RegionizeError::InputNotFound { .. })));
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn test_path_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("noext");
    std::fs::write(&input, b"whatever").unwrap();

    let result = regionize_file(&input, &RegionizerConfig::default());
    assert!(matches!(result, Err(RegionizeError::MalformedPath { .. })));
    assert_eq!(dir_entries(dir.path()), vec!["noext".to_string()]);
}

#[test]
fn test_undecodable_input_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"this is not an image at all").unwrap();

    let result = regionize_file(&input, &RegionizerConfig::default());
    assert!(matches!(result, Err(RegionizeError::UnsupportedFormat { .. })));
    assert_eq!(dir_entries(dir.path()), vec!["broken.png".to_string()]);
}

#[test]
fn test_truncated_input_is_a_decode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let input = write_png(dir.path(), "cut.png", &random_blocks(&mut rng, 64, 64));
    let bytes = std::fs::read(&input).unwrap();
    std::fs::write(&input, &bytes[..bytes.len() / 2]).unwrap();

    let result = regionize_file(&input, &RegionizerConfig::default());
    let error = result.unwrap_err();
    assert!(matches!(error, RegionizeError::UnsupportedFormat { .. }));
    assert_eq!(error.exit_code(), 3);
    assert_eq!(dir_entries(dir.path()), vec!["cut.png".to_string()]);
}

#[test]
fn test_extension_without_rgb8_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.hdr");
    image::Rgb32FImage::from_pixel(4, 4, Rgb([0.5, 0.25, 0.1]))
        .save(&input)
        .unwrap();

    let result = regionize_file(&input, &RegionizerConfig::default());
    assert!(matches!(result, Err(RegionizeError::UnsupportedFormat { .. })));
    assert_eq!(dir_entries(dir.path()), vec!["scene.hdr".to_string()]);
}

#[test]
fn test_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("picture.notanimage");
    std::fs::write(&input, b"data").unwrap();

    let result = regionize_file(&input, &RegionizerConfig::default());
    assert!(matches!(result, Err(RegionizeError::UnsupportedFormat { .. })));
}

#[test]
fn test_invalid_config_rejected_before_io() {
    let config = RegionizerConfig::default().with_threshold(f64::NAN);
    let result = regionize_file(Path::new("irrelevant.png"), &config);
    assert!(matches!(result, Err(RegionizeError::InvalidParameter { .. })));
}

// ============================================================================
// Differential checks
// ============================================================================

#[test]
fn test_strategies_and_parallelism_agree() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..20 {
        let width = rng.random_range(1..12);
        let height = rng.random_range(1..12);
        let img = random_blocks(&mut rng, width, height);

        let reference = Regionizer::new(
            RegionizerConfig::default()
                .with_merge_strategy(MergeStrategy::MemberList)
                .with_parallel(false),
        )
        .unwrap();
        let (reference_state, reference_result) = reference.segment(&img);

        for (strategy, parallel) in [
            (MergeStrategy::DisjointSet, false),
            (MergeStrategy::MemberList, true),
            (MergeStrategy::DisjointSet, true),
        ] {
            let candidate = Regionizer::new(
                RegionizerConfig::default()
                    .with_merge_strategy(strategy)
                    .with_parallel(parallel),
            )
            .unwrap();
            let (state, result) = candidate.segment(&img);

            assert_eq!(state.lookup(), reference_state.lookup());
            assert_eq!(result.borders, reference_result.borders);
            assert_eq!(result.stats, reference_result.stats);
            assert!(state.is_consistent());
        }
    }
}

#[test]
fn test_general_properties_on_random_images() {
    let mut rng = StdRng::seed_from_u64(7);
    let regionizer = Regionizer::new(RegionizerConfig::default()).unwrap();

    for _ in 0..20 {
        let width = rng.random_range(1..16);
        let height = rng.random_range(1..16);
        let img = random_blocks(&mut rng, width, height);
        let result = regionizer.run(&img).unwrap();
        let pixels = (width * height) as usize;

        assert!(result.stats.border_pixels <= 2 * pixels);
        assert!(result.stats.final_regions <= result.stats.initial_regions);
        assert_eq!(
            result.stats.final_regions,
            result.stats.initial_regions - result.stats.merges
        );
        // Same input, same flags
        assert_eq!(regionizer.run(&img).unwrap().borders, result.borders);
    }
}
