use crate::image::ImageData;
use crate::types::ImageSize;
use nalgebra::DMatrix;

/// Materialise a single-channel linear image map as a dense matrix.
///
/// Column `j` is `f` applied to the unit image with a one at pixel `j`
/// (row-major), so the result is `(out_size pixels × in_size pixels)`.
///
/// Panics when `f` does not produce an image of `out_size`.
pub fn probe_matrix<F>(in_size: ImageSize, out_size: ImageSize, f: F) -> DMatrix<f64>
where
    F: Fn(&mut ImageData),
{
    let cols = in_size.pixel_count();
    let rows = out_size.pixel_count();
    let mut matrix = DMatrix::zeros(rows, cols);
    for j in 0..cols {
        let mut basis = ImageData::zeros(in_size, 1);
        basis.channel_data_mut(0)[j] = 1.0;
        f(&mut basis);
        assert_eq!(
            basis.size(),
            out_size,
            "probe_matrix: map produced the wrong size for column {j}"
        );
        for (i, &v) in basis.channel_data(0).iter().enumerate() {
            matrix[(i, j)] = v;
        }
    }
    matrix
}
