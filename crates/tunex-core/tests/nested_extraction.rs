use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tunex_core::TaskExtractor;
use tunex_core::construction::PassthroughTaskFactory;
use tunex_core::interception;
use tunex_core::lowering::{LoweringConfig, LoweringPipeline};
use tunex_core::models::{
    ArgumentDescriptor, ArgumentSignature, CoreErrorKind, CoreResult, Target, TargetPair,
};

struct DenseOnlyPipeline;

impl LoweringPipeline for DenseOnlyPipeline {
    type Program = ArgumentSignature;
    type Params = ();
    type Lowered = ();

    fn lower(
        &self,
        program: &ArgumentSignature,
        _targets: &TargetPair,
        _params: &(),
        _config: &LoweringConfig,
    ) -> CoreResult<()> {
        interception::dispatch("dense", program)?;
        Ok(())
    }

    fn clear_function_cache(&self) {}
}

/// Starts a second extraction from inside its own lowering pass.
struct ReentrantPipeline {
    inner: TaskExtractor<DenseOnlyPipeline>,
    nested_outcome: Mutex<Option<CoreResult<usize>>>,
}

impl LoweringPipeline for ReentrantPipeline {
    type Program = ArgumentSignature;
    type Params = ();
    type Lowered = ();

    fn lower(
        &self,
        program: &ArgumentSignature,
        _targets: &TargetPair,
        _params: &(),
        _config: &LoweringConfig,
    ) -> CoreResult<()> {
        interception::dispatch("batch_matmul", program)?;
        let nested = self
            .inner
            .extract_from_program(program, &(), &Target::new("llvm"), None, None)
            .map(|tasks| tasks.len());
        *self.nested_outcome.lock().unwrap() = Some(nested);
        Ok(())
    }

    fn clear_function_cache(&self) {}
}

fn signature() -> ArgumentSignature {
    ArgumentSignature::new([
        ArgumentDescriptor::tensor([2, 16, 32], "float32"),
        ArgumentDescriptor::tensor([2, 32, 16], "float32"),
    ])
}

#[test]
fn extraction_inside_a_lowering_pass_is_rejected_instead_of_blocking() {
    let pipeline = Arc::new(ReentrantPipeline {
        inner: TaskExtractor::new(Arc::new(DenseOnlyPipeline), Arc::new(PassthroughTaskFactory)),
        nested_outcome: Mutex::new(None),
    });
    let outer = TaskExtractor::new(pipeline.clone(), Arc::new(PassthroughTaskFactory));

    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        let result = outer.extract_from_program(&signature(), &(), &Target::new("llvm"), None, None);
        let _ = sender.send(result);
    });

    let tasks = receiver
        .recv_timeout(Duration::from_secs(10))
        .expect("outer extraction did not finish")
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "batch_matmul");

    let nested = pipeline.nested_outcome.lock().unwrap().take().unwrap();
    assert_eq!(nested.unwrap_err().kind, CoreErrorKind::AlreadyTracing);
}
