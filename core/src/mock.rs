//! Swappable backing functions and the mock registry.
//!
//! # Design
//! Every overridable operation is a `Backing<Args, Out>` slot holding the
//! function currently wired to it. Tests can replace a slot two ways:
//!
//! - Typed: `service.get_fn.replace(|id: u64| ...)`. A wrong signature does
//!   not compile.
//! - By name: `register_service_method_mock(&client, "Driller.Get", mock)`.
//!   The `MockFn` carries a `Signature` and is checked against the slot at
//!   registration; a mismatch is an error and the old function stays wired.
//!
//! Model methods (`Save`, `Metrics`, ...) are mocked per `ServiceSpec` with
//! `register_model_method_mock`; every model initialized from that spec
//! afterwards picks the mock up in `Model::init`.
//!
//! Slots are guarded by an `RwLock`. A call clones the current handle under
//! the read lock and runs it after the lock is released, so a registration
//! never waits on an in-flight request.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::ModelMethod;
use crate::service::{Service, ServiceRoot};

/// A backing function. Arguments are passed as one tuple.
pub type BackingFn<Args, Out> = Arc<dyn Fn(Args) -> Out + Send + Sync>;

/// Conversion from a plain closure or fn item into a `BackingFn`.
///
/// Implemented for callables of up to six arguments; `Args` is the tuple of
/// their parameter types, so `|id: u64| ...` becomes a
/// `BackingFn<(u64,), _>`.
pub trait IntoBacking<Args, Out> {
    fn into_backing(self) -> BackingFn<Args, Out>;
}

macro_rules! impl_into_backing {
    ($($arg:ident),*) => {
        impl<F, Out, $($arg,)*> IntoBacking<($($arg,)*), Out> for F
        where
            F: Fn($($arg),*) -> Out + Send + Sync + 'static,
            Out: 'static,
            $($arg: 'static,)*
        {
            #[allow(non_snake_case)]
            fn into_backing(self) -> BackingFn<($($arg,)*), Out> {
                Arc::new(move |($($arg,)*)| (self)($($arg),*))
            }
        }
    };
}

impl_into_backing!();
impl_into_backing!(A1);
impl_into_backing!(A1, A2);
impl_into_backing!(A1, A2, A3);
impl_into_backing!(A1, A2, A3, A4);
impl_into_backing!(A1, A2, A3, A4, A5);
impl_into_backing!(A1, A2, A3, A4, A5, A6);

/// Runtime description of a backing function's type.
///
/// Two signatures are equal when their argument tuple and output types are
/// identical.
#[derive(Clone, Copy)]
pub struct Signature {
    type_id: TypeId,
    args: &'static str,
    output: &'static str,
}

impl Signature {
    pub fn of<Args: 'static, Out: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<BackingFn<Args, Out>>(),
            args: type_name::<Args>(),
            output: type_name::<Out>(),
        }
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Signature {}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // One-element tuples print as "(T,)".
        let args = match self.args.strip_suffix(",)") {
            Some(head) => format!("{head})"),
            None => self.args.to_string(),
        };
        write!(f, "fn{args} -> {}", self.output)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A type-erased replacement function together with its signature.
#[derive(Clone)]
pub struct MockFn {
    signature: Signature,
    func: Arc<dyn Any + Send + Sync>,
}

impl MockFn {
    pub fn new<Args, Out, F>(f: F) -> Self
    where
        Args: 'static,
        Out: 'static,
        F: IntoBacking<Args, Out>,
    {
        let backing: BackingFn<Args, Out> = f.into_backing();
        Self {
            signature: Signature::of::<Args, Out>(),
            func: Arc::new(backing),
        }
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Recover the typed function, or `None` if the signature differs.
    pub fn downcast<Args: 'static, Out: 'static>(&self) -> Option<BackingFn<Args, Out>> {
        (*self.func).downcast_ref::<BackingFn<Args, Out>>().cloned()
    }
}

impl fmt::Debug for MockFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockFn")
            .field("signature", &self.signature)
            .finish()
    }
}

/// A swappable slot for one service operation.
pub struct Backing<Args, Out> {
    current: RwLock<BackingFn<Args, Out>>,
}

impl<Args: 'static, Out: 'static> Backing<Args, Out> {
    pub fn new(f: impl IntoBacking<Args, Out>) -> Self {
        Self {
            current: RwLock::new(f.into_backing()),
        }
    }

    pub fn call(&self, args: Args) -> Out {
        let f = self.current();
        f(args)
    }

    /// The function wired right now.
    pub fn current(&self) -> BackingFn<Args, Out> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace(&self, f: impl IntoBacking<Args, Out>) {
        self.store(f.into_backing());
    }

    pub fn signature(&self) -> Signature {
        Signature::of::<Args, Out>()
    }

    fn store(&self, f: BackingFn<Args, Out>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = f;
    }
}

impl<Args: 'static, Out: 'static> fmt::Debug for Backing<Args, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backing")
            .field("signature", &self.signature())
            .finish()
    }
}

/// Object-safe view of a `Backing` slot, used for by-name registration.
pub trait Slot: Send + Sync {
    fn signature(&self) -> Signature;

    /// Wire `mock` into the slot. Fails without touching the slot when the
    /// signatures differ.
    fn install(&self, mock: &MockFn) -> Result<()>;
}

impl<Args: 'static, Out: 'static> Slot for Backing<Args, Out> {
    fn signature(&self) -> Signature {
        Backing::signature(self)
    }

    fn install(&self, mock: &MockFn) -> Result<()> {
        let f = mock
            .downcast::<Args, Out>()
            .ok_or_else(|| Error::SignatureMismatch {
                expected: Backing::signature(self),
                actual: mock.signature(),
            })?;
        self.store(f);
        Ok(())
    }
}

/// Replace the backing function of one service method, addressed as
/// `"Service.Method"` (e.g. `"Driller.Get"`).
///
/// The service is looked up on `root` first and then on its embedded client,
/// one level deep. Only the resolved service instance is affected.
pub fn register_service_method_mock<R>(root: &R, target: &str, mock: MockFn) -> Result<()>
where
    R: ServiceRoot + ?Sized,
{
    let (service_name, method) = match target.split('.').collect::<Vec<_>>()[..] {
        [service, method] => (service, method),
        _ => return Err(Error::InvalidMockTarget(target.to_string())),
    };

    let service = resolve_service(root, service_name)?;

    if !service.methods().contains(&method) {
        return Err(Error::MethodNotFound {
            service: service_name.to_string(),
            method: method.to_string(),
        });
    }

    let slot = service
        .backing(method)
        .ok_or_else(|| Error::NoBackingFunction {
            service: service_name.to_string(),
            method: method.to_string(),
        })?;

    if slot.signature() != mock.signature() {
        return Err(Error::SignatureMismatch {
            expected: slot.signature(),
            actual: mock.signature(),
        });
    }
    slot.install(&mock)?;

    debug!(target_method = target, "registered service method mock");
    Ok(())
}

/// Register a replacement for a model method on the service's spec.
///
/// Models initialized from the spec afterwards use `mock`; models that were
/// already initialized keep what they had.
pub fn register_model_method_mock<S>(service: &S, method: ModelMethod, mock: MockFn) -> Result<()>
where
    S: Service + ?Sized,
{
    service.register_model_mock(method, mock)
}

fn resolve_service<'a, R>(root: &'a R, name: &str) -> Result<&'a dyn Service>
where
    R: ServiceRoot + ?Sized,
{
    if let Some(service) = root.service(name) {
        return Ok(service);
    }
    root.embedded_client()
        .and_then(|client| client.service(name))
        .ok_or_else(|| Error::ServiceNotFound(name.to_string()))
}
