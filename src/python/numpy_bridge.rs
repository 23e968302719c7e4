//! Conversions between numpy arrays and engine types.

use nalgebra::DMatrix;
use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

use crate::core::error::RaptorError;

/// Convert numpy array to Vec<f64>.
pub fn numpy_to_vec_f64(arr: PyReadonlyArray1<f64>) -> PyResult<Vec<f64>> {
    let slice = arr.as_slice().map_err(|e| RaptorError::PythonError {
        message: e.to_string(),
    })?;
    Ok(slice.to_vec())
}

/// Convert a 2-D numpy array to a matrix.
pub fn numpy_to_matrix(arr: PyReadonlyArray2<f64>) -> DMatrix<f64> {
    let view = arr.as_array();
    let (rows, cols) = view.dim();
    DMatrix::from_fn(rows, cols, |i, j| view[[i, j]])
}

/// Convert Vec<f64> to numpy array.
pub fn vec_to_numpy_f64<'py>(py: Python<'py>, vec: Vec<f64>) -> &'py PyArray1<f64> {
    PyArray1::from_vec(py, vec)
}

/// Convert a matrix to a 2-D numpy array.
pub fn matrix_to_numpy<'py>(py: Python<'py>, matrix: &DMatrix<f64>) -> &'py PyArray2<f64> {
    Array2::from_shape_fn(matrix.shape(), |(i, j)| matrix[(i, j)]).into_pyarray(py)
}
