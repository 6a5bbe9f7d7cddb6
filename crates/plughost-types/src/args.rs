//! Constructor argument values and their type signatures.

use std::any::Any;

use anyhow::{anyhow, Result};

use crate::key::TypeKey;

/// Positional constructor arguments with an inferred type signature.
///
/// Each appended value records its concrete type, so the default signature
/// used for constructor matching is the runtime type of every argument in
/// order. Factories only borrow the values (through [`CtorArgs`]), which lets
/// one argument list drive any number of instantiations.
///
/// ```
/// use plughost_types::Args;
///
/// let args = Args::new().with(7u32).with("endpoint".to_string());
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.signature().len(), 2);
/// ```
#[derive(Default)]
pub struct Args {
    values: Vec<Box<dyn Any>>,
    signature: Vec<TypeKey>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, recording its concrete type in the signature.
    pub fn with<T: 'static>(mut self, value: T) -> Self {
        self.signature.push(TypeKey::of::<T>());
        self.values.push(Box::new(value));
        self
    }

    /// The inferred signature: the concrete type of each value, in order.
    pub fn signature(&self) -> &[TypeKey] {
        &self.signature
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrowed view handed to constructor factories.
    pub fn view(&self) -> CtorArgs<'_> {
        CtorArgs {
            values: &self.values,
        }
    }
}

/// Borrowed argument view a constructor factory reads from.
pub struct CtorArgs<'a> {
    values: &'a [Box<dyn Any>],
}

impl CtorArgs<'_> {
    /// Read the argument at `index` as a `T`.
    ///
    /// Returns an error if the position is out of bounds or holds a different
    /// type; factories propagate it with `?` and the engine reports it as a
    /// construction failure.
    pub fn get<T: 'static>(&self, index: usize) -> Result<&T> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| anyhow!("missing constructor argument at position {index}"))?;
        value.downcast_ref::<T>().ok_or_else(|| {
            anyhow!(
                "constructor argument {index} is not a {}",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_follows_value_order() {
        let args = Args::new().with(1u32).with("x".to_string()).with(true);
        let sig = args.signature();
        assert_eq!(sig.len(), 3);
        assert_eq!(sig[0], TypeKey::of::<u32>());
        assert_eq!(sig[1], TypeKey::of::<String>());
        assert_eq!(sig[2], TypeKey::of::<bool>());
    }

    #[test]
    fn view_reads_typed_values() {
        let args = Args::new().with(42u32).with("hello".to_string());
        let view = args.view();
        assert_eq!(*view.get::<u32>(0).unwrap(), 42);
        assert_eq!(view.get::<String>(1).unwrap(), "hello");
    }

    #[test]
    fn view_rejects_wrong_type_and_position() {
        let args = Args::new().with(42u32);
        let view = args.view();
        assert!(view.get::<String>(0).is_err());
        assert!(view.get::<u32>(1).is_err());
    }

    #[test]
    fn empty_args_have_empty_signature() {
        let args = Args::new();
        assert!(args.is_empty());
        assert!(args.signature().is_empty());
        assert!(args.view().is_empty());
    }
}
