mod common;

use common::synthetic_image::{dot, random_image};
use nalgebra::DMatrix;
use super_resolution::model::{
    AdditiveNoiseModule, DegradationOperator, DownsamplingModule, ImageModel, MotionModule,
    MotionSequence, MotionShift, PsfBlurModule,
};
use super_resolution::{ImageData, ImageSize};

const TOL: f64 = 1e-12;

// 4 rows x 6 columns
const SMALL_TEST_IMAGE: [f64; 24] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, //
    7.0, 8.0, 9.0, 0.0, 1.0, 2.0, //
    9.0, 7.0, 5.0, 4.0, 2.0, 1.0, //
    2.0, 4.0, 6.0, 8.0, 0.0, 1.0,
];
const SMALL_TEST_IMAGE_SIZE: ImageSize = ImageSize::new(6, 4);

fn motion() -> MotionModule {
    MotionModule::new(MotionSequence::new(vec![
        MotionShift::new(0.0, 0.0),
        MotionShift::new(0.3, -1.7),
        MotionShift::new(2.0, 1.0),
    ]))
}

fn all_operators() -> Vec<DegradationOperator> {
    vec![
        AdditiveNoiseModule::with_seed(4.0, 3).unwrap().into(),
        PsfBlurModule::new(3, 1.0).unwrap().into(),
        PsfBlurModule::new(5, 0.8).unwrap().into(),
        DownsamplingModule::new(2).unwrap().into(),
        DownsamplingModule::new(3).unwrap().into(),
        motion().into(),
    ]
}

fn assert_matrix_close(a: &DMatrix<f64>, b: &DMatrix<f64>, context: &str) {
    assert_eq!(a.shape(), b.shape(), "{context}: shapes differ");
    let diff = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max);
    assert!(diff < TOL, "{context}: max abs difference {diff:e}");
}

#[test]
fn downsampling_matrix_selects_block_origins() {
    let module = DegradationOperator::from(DownsamplingModule::new(2).unwrap());
    let matrix = module.operator_matrix(SMALL_TEST_IMAGE_SIZE, 0);

    // 24 pixels in high-res input, 6 (= 24 / 2*2) pixels in downsampled output.
    let mut expected = DMatrix::zeros(6, 24);
    for (row, col) in [(0, 0), (1, 2), (2, 4), (3, 12), (4, 14), (5, 16)] {
        expected[(row, col)] = 1.0;
    }
    assert_eq!(matrix, expected);

    let vectorized = nalgebra::DVector::from_column_slice(&SMALL_TEST_IMAGE);
    let downsampled = &matrix * vectorized;
    assert_eq!(downsampled.as_slice(), &[1.0, 3.0, 5.0, 9.0, 5.0, 2.0]);
}

#[test]
fn downsampling_apply_matches_matrix_example() {
    let module = DownsamplingModule::new(2).unwrap();
    let mut image = ImageData::from_raw(&SMALL_TEST_IMAGE, SMALL_TEST_IMAGE_SIZE, 1).unwrap();
    module.apply(&mut image);
    assert_eq!(image.size(), ImageSize::new(3, 2));
    assert_eq!(image.to_vec(), vec![1.0, 3.0, 5.0, 9.0, 5.0, 2.0]);
}

#[test]
fn every_operator_transpose_matches_matrix_transpose() {
    let sizes = [
        ImageSize::new(6, 4),
        ImageSize::new(5, 5),
        ImageSize::new(7, 3),
        ImageSize::new(1, 1),
    ];
    for op in all_operators() {
        for &size in &sizes {
            for index in 0..3 {
                let forward = op.operator_matrix(size, index);
                let transpose = op.transpose_matrix(size, index);
                assert_matrix_close(
                    &transpose,
                    &forward.transpose(),
                    &format!("{} size={size} frame={index}", op.name()),
                );
            }
        }
    }
}

#[test]
fn operator_matrix_reproduces_forward_pass() {
    let size = ImageSize::new(7, 5);
    let image = random_image(size, 1, 21);
    for op in all_operators() {
        if let DegradationOperator::AdditiveNoise(_) = op {
            continue;
        }
        let matrix = op.operator_matrix(size, 1);
        let mut applied = image.clone();
        op.apply(&mut applied, 1);
        let expected = &matrix * nalgebra::DVector::from_column_slice(image.channel_data(0));
        let diff = expected
            .iter()
            .zip(applied.channel_data(0))
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(diff < 1e-9, "{}: max abs difference {diff:e}", op.name());
    }
}

#[test]
fn blur_is_self_adjoint() {
    let blur = PsfBlurModule::new(5, 1.3).unwrap();
    let image = random_image(ImageSize::new(9, 7), 3, 5);

    let mut forward = image.clone();
    blur.apply(&mut forward);
    let mut transposed = image.clone();
    blur.apply_transpose(&mut transposed);
    assert_eq!(forward, transposed);

    let matrix = DegradationOperator::from(blur).operator_matrix(ImageSize::new(6, 4), 0);
    assert_matrix_close(&matrix, &matrix.transpose(), "blur matrix symmetry");
}

#[test]
fn model_transpose_runs_operator_adjoints_in_reverse() {
    let hr = ImageSize::new(10, 8);
    let motion = motion();
    let blur = PsfBlurModule::new(3, 0.9).unwrap();
    let down = DownsamplingModule::new(2).unwrap();
    let model = ImageModel::default()
        .with_operator(motion.clone())
        .with_operator(blur.clone())
        .with_operator(down);

    let lr = model.output_size(hr);
    let residual = random_image(lr, 2, 17);

    let mut via_model = residual.clone();
    model.apply_transpose(&mut via_model, 1, hr);

    let mut manual = residual.clone();
    down.apply_transpose(&mut manual, hr);
    blur.apply_transpose(&mut manual);
    motion.apply_transpose(&mut manual, 1);

    assert_eq!(via_model.size(), hr);
    assert_eq!(via_model, manual);
}

#[test]
fn model_matrices_are_transposes() {
    let model = ImageModel::default()
        .with_operator(motion())
        .with_operator(PsfBlurModule::new(3, 1.0).unwrap())
        .with_operator(DownsamplingModule::new(2).unwrap())
        .with_operator(AdditiveNoiseModule::with_seed(2.0, 9).unwrap());
    for &size in &[ImageSize::new(6, 4), ImageSize::new(7, 5)] {
        for index in 0..3 {
            let forward = model.operator_matrix(size, index);
            let transpose = model.transpose_matrix(size, index);
            assert_eq!(forward.shape(), (model.output_size(size).pixel_count(), size.pixel_count()));
            assert_matrix_close(
                &transpose,
                &forward.transpose(),
                &format!("model size={size} frame={index}"),
            );
        }
    }
}

#[test]
fn dot_product_identity_holds_on_larger_images() {
    // <A x, y> == <x, Aᵀ y> without materialising A
    let hr = ImageSize::new(33, 26);
    let model = ImageModel::default()
        .with_operator(motion())
        .with_operator(PsfBlurModule::new(7, 1.5).unwrap())
        .with_operator(DownsamplingModule::new(3).unwrap());
    let lr = model.output_size(hr);
    let x = random_image(hr, 2, 1);
    let y = random_image(lr, 2, 2);

    for index in 0..3 {
        let mut ax = x.clone();
        model.apply(&mut ax, index);
        let mut aty = y.clone();
        model.apply_transpose(&mut aty, index, hr);

        let lhs = dot(&ax.to_vec(), &y.to_vec());
        let rhs = dot(&x.to_vec(), &aty.to_vec());
        assert!(
            (lhs - rhs).abs() <= 1e-9 * lhs.abs().max(1.0),
            "frame {index}: <Ax,y>={lhs} <x,Aty>={rhs}"
        );
    }
}
