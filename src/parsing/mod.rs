use ndarray::Array2;

pub mod idx;
pub mod mnist;

/// Features and one-hot targets, ready to be fed to a model
pub struct Dataset {
    pub data: Array2<f64>,
    pub target: Array2<f64>,
}
