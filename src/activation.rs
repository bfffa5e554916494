use ndarray::{Array, ArrayBase, Data, Dimension};

/// Elementwise activation functions available to the neuron.
///
/// Only [`Activation::Sigmoid`] is used by the trained model; [`Activation::Relu`]
/// completes the library surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Sigmoid,
    Relu,
}

impl Activation {
    pub fn apply<S, D>(self, x: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::Relu => relu(x),
        }
    }

    pub fn derivative<S, D>(self, x: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        match self {
            Activation::Sigmoid => sigmoid_derivative(x),
            Activation::Relu => relu_derivative(x),
        }
    }
}

fn logistic(value: f64) -> f64 {
    // exp(-x) saturates to +inf for very negative x, which still yields 0.0
    1.0 / (1.0 + (-value).exp())
}

pub fn sigmoid<S, D>(x: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(logistic)
}

pub fn sigmoid_derivative<S, D>(x: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|value| {
        let s = logistic(value);
        s * (1.0 - s)
    })
}

pub fn relu<S, D>(x: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|value| value.max(0.0))
}

pub fn relu_derivative<S, D>(x: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|value| if value > 0.0 { 1.0 } else { 0.0 })
}
