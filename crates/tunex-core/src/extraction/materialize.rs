use crate::config::ExtractionOptions;
use crate::construction::TaskFactory;
use crate::extraction::SkippedInvocation;
use crate::models::{CoreError, CoreResult, InvocationRecord, Target, Task, TaskRequest};
use crate::registry;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Materialized {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedInvocation>,
}

/// Builds one task per record, in record order. Records whose shape the
/// factory rejects are skipped; any other factory error aborts.
pub fn materialize(
    records: &[InvocationRecord],
    target: &Target,
    factory: &dyn TaskFactory,
    options: &ExtractionOptions,
) -> CoreResult<Materialized> {
    let mut materialized = Materialized::default();

    for record in records {
        let template_key = options
            .template_key_for(&record.operator)
            .or_else(|| registry::default_template_key(&record.operator));
        let request = TaskRequest {
            operator: &record.operator,
            signature: &record.signature,
            target,
            template_key,
        };

        match factory.construct(&request) {
            Ok(task) => materialized.tasks.push(task),
            Err(error) if error.is_recoverable_shape_error() => {
                tracing::warn!(
                    operator = %record.operator,
                    signature = %record.signature,
                    reason = %error.message,
                    "invalid shape during task creation; skipping invocation"
                );
                materialized.skipped.push(SkippedInvocation {
                    record: record.clone(),
                    reason: error.message,
                });
            }
            Err(error) => return Err(attribute_operator(error, &record.operator)),
        }
    }

    Ok(materialized)
}

fn attribute_operator(error: CoreError, operator: &str) -> CoreError {
    CoreError {
        operator: error.operator.or_else(|| Some(operator.to_string())),
        program: error.program,
        kind: error.kind,
        message: error.message,
    }
}

#[cfg(test)]
mod tests {
    use super::materialize;
    use crate::config::ExtractionOptions;
    use crate::models::{
        ArgumentDescriptor, ArgumentSignature, CoreError, CoreErrorKind, CoreResult,
        InvocationRecord, Target, Task, TaskRequest,
    };

    fn record(operator: &str, batch: i64) -> InvocationRecord {
        InvocationRecord::new(
            operator,
            ArgumentSignature::new([ArgumentDescriptor::tensor([batch, 256], "float32")]),
        )
    }

    fn rejects_odd_batches(request: &TaskRequest<'_>) -> CoreResult<Task> {
        let batch = request
            .signature
            .tensor_shapes()
            .next()
            .and_then(|shape| shape.first().copied())
            .unwrap_or_default();
        if batch % 2 == 1 {
            return Err(CoreError::invalid_shape(request.operator, "odd batch"));
        }
        Ok(Task::from_request(request))
    }

    #[test]
    fn invalid_shapes_are_skipped_and_reported() {
        let records = vec![record("dense", 2), record("dense", 3), record("dense", 4)];
        let materialized = materialize(
            &records,
            &Target::new("llvm"),
            &rejects_odd_batches,
            &ExtractionOptions::default(),
        )
        .unwrap();

        assert_eq!(materialized.tasks.len(), 2);
        assert_eq!(materialized.skipped.len(), 1);
        assert_eq!(materialized.skipped[0].record, records[1]);
        assert_eq!(materialized.skipped[0].reason, "odd batch");
    }

    #[test]
    fn other_factory_errors_are_fatal_and_attributed() {
        let failing = |_: &TaskRequest<'_>| -> CoreResult<Task> {
            Err(CoreError::new(CoreErrorKind::ConstructionFailure, "template missing"))
        };
        let error = materialize(
            &[record("batch_matmul", 2)],
            &Target::new("llvm"),
            &failing,
            &ExtractionOptions::default(),
        )
        .unwrap_err();

        assert_eq!(error.kind, CoreErrorKind::ConstructionFailure);
        assert_eq!(error.operator.as_deref(), Some("batch_matmul"));
    }

    #[test]
    fn template_keys_prefer_overrides_then_registry_defaults() {
        let records = vec![
            record("conv2d_nchw", 2),
            record("dense", 2),
            record("custom_op", 2),
        ];
        let options = ExtractionOptions::default().with_template_key("conv2d_nchw", "winograd");
        let materialized = materialize(
            &records,
            &Target::new("cuda"),
            &rejects_odd_batches,
            &options,
        )
        .unwrap();

        let keys: Vec<_> = materialized
            .tasks
            .iter()
            .map(|task| task.template_key.as_deref())
            .collect();
        assert_eq!(keys, vec![Some("winograd"), Some("direct"), None]);
    }
}
