use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{CoreError, CoreErrorKind, CoreResult};
use crate::registry;

/// Restricts tracing to a set of tunable operator names.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct OperatorFilter {
    operators: BTreeSet<String>,
}

impl OperatorFilter {
    pub fn new<I, S>(operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operators: operators.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a filter from graph-level operator names such as `nn.conv2d`,
    /// expanding each to the tunable operators it lowers to.
    pub fn from_graph_ops<I, S>(graph_ops: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut operators = BTreeSet::new();
        for graph_op in graph_ops {
            let graph_op = graph_op.as_ref();
            let tunable = registry::tunable_operators_for(graph_op);
            if tunable.is_empty() {
                return Err(CoreError {
                    operator: Some(graph_op.to_string()),
                    program: None,
                    kind: CoreErrorKind::InvalidInput,
                    message: format!("graph operator '{graph_op}' has no tunable implementation"),
                });
            }
            operators.extend(tunable.into_iter().map(|descriptor| descriptor.name.to_string()));
        }
        Ok(Self { operators })
    }

    pub fn accepts(&self, operator: &str) -> bool {
        self.operators.contains(operator)
    }

    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.operators.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::OperatorFilter;
    use crate::models::CoreErrorKind;

    #[test]
    fn graph_conv2d_expands_to_every_conv_variant() {
        let filter = OperatorFilter::from_graph_ops(["nn.conv2d"]).unwrap();
        assert!(filter.accepts("conv2d_nchw"));
        assert!(filter.accepts("depthwise_conv2d_nchw"));
        assert!(filter.accepts("group_conv2d_nchw"));
        assert!(!filter.accepts("dense"));
    }

    #[test]
    fn unknown_graph_operator_is_rejected() {
        let error = OperatorFilter::from_graph_ops(["nn.relu"]).unwrap_err();
        assert_eq!(error.kind, CoreErrorKind::InvalidInput);
        assert_eq!(error.operator.as_deref(), Some("nn.relu"));
    }
}
