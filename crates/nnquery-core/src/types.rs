use nnquery_expr::VariableId;
use serde::{Deserialize, Serialize};

/// Row-major n-dimensional array.
///
/// Networks expose their inputs and outputs as arrays of variables; callers
/// supply and receive values in the same layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shaped<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

/// Array of network variables.
pub type VarArray = Shaped<VariableId>;

/// Array of concrete values.
pub type ValueArray = Shaped<f64>;

/// Array shape errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Shape and data length disagree.
    LengthMismatch { shape: Vec<usize>, len: usize },
    /// A contiguous block would run past the last representable variable.
    VariableRangeOverflow { first: VariableId, shape: Vec<usize> },
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::LengthMismatch { shape, len } => write!(
                f,
                "shape {:?} holds {} elements but {} were given",
                shape,
                shape.iter().product::<usize>(),
                len
            ),
            ShapeError::VariableRangeOverflow { first, shape } => write!(
                f,
                "shape {:?} starting at {} exceeds the variable id range",
                shape, first
            ),
        }
    }
}

impl std::error::Error for ShapeError {}

impl<T> Shaped<T> {
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, ShapeError> {
        if shape.iter().product::<usize>() != data.len() {
            return Err(ShapeError::LengthMismatch {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// One-dimensional array.
    pub fn vector(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Elements in row-major order.
    pub fn flat(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_flat(self) -> Vec<T> {
        self.data
    }

    /// Same shape, elements transformed.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Shaped<U> {
        Shaped {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Same shape, elements transformed by a fallible function.
    pub fn try_map<U, E>(&self, f: impl FnMut(&T) -> Result<U, E>) -> Result<Shaped<U>, E> {
        Ok(Shaped {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

impl VarArray {
    /// Contiguous variables `first..first + product(shape)`.
    pub fn contiguous(first: VariableId, shape: Vec<usize>) -> Result<Self, ShapeError> {
        let overflow = || ShapeError::VariableRangeOverflow {
            first,
            shape: shape.clone(),
        };
        let count = u32::try_from(shape.iter().product::<usize>()).map_err(|_| overflow())?;
        let data = (0..count)
            .map(|i| first.shifted(i).ok_or_else(overflow))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { shape, data })
    }
}
