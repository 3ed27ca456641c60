use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// One argument of a tunable operator call, reduced to what affects its
/// schedule search space.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentDescriptor {
    Tensor { shape: Vec<i64>, dtype: String },
    Int(i64),
    /// Stored as the IEEE-754 bit pattern so signatures stay hashable.
    Float(u64),
    Str(String),
    Bool(bool),
    Tuple(Vec<ArgumentDescriptor>),
    None,
}

impl ArgumentDescriptor {
    pub fn tensor(shape: impl Into<Vec<i64>>, dtype: impl Into<String>) -> Self {
        Self::Tensor {
            shape: shape.into(),
            dtype: dtype.into(),
        }
    }

    pub fn float(value: f64) -> Self {
        Self::Float(value.to_bits())
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

impl Display for ArgumentDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tensor { shape, dtype } => write!(f, "tensor({shape:?}, {dtype})"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Self::None => write!(f, "none"),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentSignature(pub Vec<ArgumentDescriptor>);

impl ArgumentSignature {
    pub fn new(arguments: impl IntoIterator<Item = ArgumentDescriptor>) -> Self {
        Self(arguments.into_iter().collect())
    }

    pub fn arguments(&self) -> &[ArgumentDescriptor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shapes of every tensor argument, in argument order.
    pub fn tensor_shapes(&self) -> impl Iterator<Item = &[i64]> {
        self.0.iter().filter_map(|argument| match argument {
            ArgumentDescriptor::Tensor { shape, .. } => Some(shape.as_slice()),
            _ => None,
        })
    }
}

impl Display for ArgumentSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ArgumentDescriptor::Tuple(self.0.clone()))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct InvocationRecord {
    pub operator: String,
    pub signature: ArgumentSignature,
}

impl InvocationRecord {
    pub fn new(operator: impl Into<String>, signature: ArgumentSignature) -> Self {
        Self {
            operator: operator.into(),
            signature,
        }
    }
}
