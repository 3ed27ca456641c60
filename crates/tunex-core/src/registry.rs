#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OperatorCategory {
    Convolution,
    TransposedConvolution,
    Dense,
    BatchMatmul,
    Bitserial,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OperatorDescriptor {
    pub name: &'static str,
    pub graph_ops: &'static [&'static str],
    pub category: OperatorCategory,
    /// Supported schedule templates; the first entry is the default.
    pub template_keys: &'static [&'static str],
}

const CONV2D_GRAPH_OPS: &[&str] = &["nn.conv2d"];
const DIRECT_TEMPLATE: &[&str] = &["direct"];
const CONV2D_TEMPLATES: &[&str] = &["direct", "winograd", "int8"];

const ALL_OPERATORS: [OperatorDescriptor; 10] = [
    OperatorDescriptor {
        name: "conv2d_nchw",
        graph_ops: CONV2D_GRAPH_OPS,
        category: OperatorCategory::Convolution,
        template_keys: CONV2D_TEMPLATES,
    },
    OperatorDescriptor {
        name: "conv2d_nhwc",
        graph_ops: CONV2D_GRAPH_OPS,
        category: OperatorCategory::Convolution,
        template_keys: DIRECT_TEMPLATE,
    },
    OperatorDescriptor {
        name: "depthwise_conv2d_nchw",
        graph_ops: CONV2D_GRAPH_OPS,
        category: OperatorCategory::Convolution,
        template_keys: DIRECT_TEMPLATE,
    },
    OperatorDescriptor {
        name: "group_conv2d_nchw",
        graph_ops: CONV2D_GRAPH_OPS,
        category: OperatorCategory::Convolution,
        template_keys: DIRECT_TEMPLATE,
    },
    OperatorDescriptor {
        name: "conv2d_transpose_nchw",
        graph_ops: &["nn.conv2d_transpose"],
        category: OperatorCategory::TransposedConvolution,
        template_keys: DIRECT_TEMPLATE,
    },
    OperatorDescriptor {
        name: "conv3d_ncdhw",
        graph_ops: &["nn.conv3d"],
        category: OperatorCategory::Convolution,
        template_keys: &["direct", "winograd"],
    },
    OperatorDescriptor {
        name: "dense",
        graph_ops: &["nn.dense"],
        category: OperatorCategory::Dense,
        template_keys: &["direct", "pack"],
    },
    OperatorDescriptor {
        name: "batch_matmul",
        graph_ops: &["nn.batch_matmul"],
        category: OperatorCategory::BatchMatmul,
        template_keys: DIRECT_TEMPLATE,
    },
    OperatorDescriptor {
        name: "bitserial_conv2d_nchw",
        graph_ops: &["nn.bitserial_conv2d"],
        category: OperatorCategory::Bitserial,
        template_keys: DIRECT_TEMPLATE,
    },
    OperatorDescriptor {
        name: "bitserial_dense",
        graph_ops: &["nn.bitserial_dense"],
        category: OperatorCategory::Bitserial,
        template_keys: DIRECT_TEMPLATE,
    },
];

pub fn operators() -> &'static [OperatorDescriptor] {
    &ALL_OPERATORS
}

pub fn operator(name: &str) -> Option<&'static OperatorDescriptor> {
    ALL_OPERATORS.iter().find(|descriptor| descriptor.name == name)
}

pub fn tunable_operators_for(graph_op: &str) -> Vec<&'static OperatorDescriptor> {
    ALL_OPERATORS
        .iter()
        .filter(|descriptor| descriptor.graph_ops.contains(&graph_op))
        .collect()
}

pub fn default_template_key(name: &str) -> Option<&'static str> {
    operator(name).and_then(|descriptor| descriptor.template_keys.first().copied())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{default_template_key, operator, operators, tunable_operators_for};

    #[test]
    fn operator_names_are_unique() {
        let names: HashSet<_> = operators().iter().map(|descriptor| descriptor.name).collect();
        assert_eq!(names.len(), operators().len());
    }

    #[test]
    fn every_operator_has_a_default_template() {
        for descriptor in operators() {
            assert!(
                default_template_key(descriptor.name).is_some(),
                "{} has no template",
                descriptor.name
            );
            assert!(!descriptor.graph_ops.is_empty());
        }
    }

    #[test]
    fn lookup_by_graph_op() {
        let dense: Vec<_> = tunable_operators_for("nn.dense")
            .into_iter()
            .map(|descriptor| descriptor.name)
            .collect();
        assert_eq!(dense, vec!["dense"]);
        assert!(tunable_operators_for("nn.softmax").is_empty());
        assert!(operator("winograd").is_none());
    }
}
