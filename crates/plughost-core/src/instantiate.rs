//! Constructor matching and invocation.
//!
//! Matching is exact: a constructor is selected when its parameter signature
//! equals the wanted signature in order and arity, compared by `TypeId`. The
//! wanted signature defaults to the runtime types of the argument values and
//! can be overridden explicitly.

use std::any::Any;
use std::rc::Rc;

use plughost_types::{signature_string, Args, InstantiateError, TypeKey};
use tracing::{debug, error};

use crate::module::CandidateType;

/// A successfully constructed, still-erased plugin instance.
///
/// Holds the concrete value; [`CandidateType::cast`] narrows it to a contract
/// object.
pub type Instance = Box<dyn Any>;

/// Construct one instance of `ty` from `args`.
///
/// `signature` overrides the args' inferred signature when given. A missing
/// constructor and a faulting factory are both expected conditions: they are
/// logged (DEBUG and ERROR respectively) and returned as explicit errors.
pub fn create_instance(
    ty: &CandidateType,
    args: &Args,
    signature: Option<&[TypeKey]>,
) -> Result<Instance, InstantiateError> {
    let wanted = signature.unwrap_or_else(|| args.signature());

    let Some(ctor) = ty.find_constructor(wanted) else {
        debug!(
            ty = ty.name(),
            signature = %signature_string(wanted),
            "no matching constructor"
        );
        return Err(InstantiateError::NoMatchingConstructor {
            type_name: ty.name(),
            signature: signature_string(wanted),
        });
    };

    match ctor.invoke(&args.view()) {
        Ok(instance) => Ok(instance),
        Err(fault) => {
            error!(ty = ty.name(), error = %fault, "constructor failed");
            Err(InstantiateError::ConstructionFailed {
                type_name: ty.name(),
                fault,
            })
        }
    }
}

/// Construct an instance for each type, dropping failures (already logged).
///
/// Each type is instantiated at most once per call and the result is a
/// materialized snapshot, paired with the candidate that produced each
/// instance so callers can upcast.
pub fn create_instances(
    types: &[Rc<CandidateType>],
    args: &Args,
    signature: Option<&[TypeKey]>,
) -> Vec<(Rc<CandidateType>, Instance)> {
    types
        .iter()
        .filter_map(|ty| {
            create_instance(ty, args, signature)
                .ok()
                .map(|instance| (Rc::clone(ty), instance))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::PluginType;
    use anyhow::anyhow;

    trait Sink {}

    struct FileSink {
        level: u32,
    }

    struct FussySink;

    impl Sink for FileSink {}
    impl Sink for FussySink {}

    fn file_sink() -> Rc<CandidateType> {
        Rc::new(
            PluginType::<FileSink>::new()
                .implements::<dyn Sink>(|value| value as Box<dyn Sink>)
                .nullary(|| FileSink { level: 0 })
                .constructor(vec![TypeKey::of::<u32>()], |args| {
                    Ok(FileSink {
                        level: *args.get::<u32>(0)?,
                    })
                })
                .finish(),
        )
    }

    fn fussy_sink() -> Rc<CandidateType> {
        Rc::new(
            PluginType::<FussySink>::new()
                .implements::<dyn Sink>(|value| value as Box<dyn Sink>)
                .nullary(|| FussySink)
                .constructor(vec![TypeKey::of::<u32>()], |_| {
                    Err(anyhow!("refusing to start"))
                })
                .finish(),
        )
    }

    #[test]
    fn exact_signature_selects_constructor() {
        let ty = file_sink();
        let args = Args::new().with(3u32);
        let instance = create_instance(&ty, &args, None).expect("construct");
        let sink = instance.downcast::<FileSink>().expect("concrete");
        assert_eq!(sink.level, 3);
    }

    #[test]
    fn mismatched_argument_type_yields_no_instance() {
        // Constructor takes (u32); args are ("x") - no match, by type.
        let ty = file_sink();
        let args = Args::new().with("x".to_string());
        let result = create_instance(&ty, &args, None);
        assert!(matches!(
            result,
            Err(InstantiateError::NoMatchingConstructor { .. })
        ));
    }

    #[test]
    fn arity_mismatch_yields_no_instance() {
        let ty = file_sink();
        let args = Args::new().with(1u32).with(2u32);
        assert!(matches!(
            create_instance(&ty, &args, None),
            Err(InstantiateError::NoMatchingConstructor { .. })
        ));
    }

    #[test]
    fn faulting_factory_is_contained() {
        let ty = fussy_sink();
        let args = Args::new().with(1u32);
        let err = create_instance(&ty, &args, None)
            .err()
            .expect("construction should fail");
        match err {
            InstantiateError::ConstructionFailed { type_name, fault } => {
                assert!(type_name.contains("FussySink"));
                assert!(fault.to_string().contains("refusing to start"));
            }
            other => panic!("expected ConstructionFailed, got {other}"),
        }
    }

    #[test]
    fn explicit_signature_overrides_inference() {
        // Inferred signature would be (u32); the override selects the
        // nullary constructor instead.
        let ty = file_sink();
        let args = Args::new().with(9u32);
        let instance = create_instance(&ty, &args, Some(&[])).expect("construct");
        let sink = instance.downcast::<FileSink>().expect("concrete");
        assert_eq!(sink.level, 0);
    }

    #[test]
    fn bulk_construction_drops_failures_and_keeps_successes() {
        let types = vec![file_sink(), fussy_sink()];
        let args = Args::new().with(5u32);
        let built = create_instances(&types, &args, None);
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].0.key(), TypeKey::of::<FileSink>());
    }

    #[test]
    fn bulk_construction_instantiates_each_type_once() {
        let types = vec![file_sink(), file_sink()];
        let args = Args::new();
        let built = create_instances(&types, &args, None);
        assert_eq!(built.len(), 2);
    }
}
