//! Service metadata and the capability every service exposes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::{Client, ClientCore};
use crate::error::{Error, Result};
use crate::http::HttpMethod;
use crate::mock::{BackingFn, IntoBacking, MockFn, Signature, Slot};
use crate::model::{Model, ModelMethod};

/// Descriptor of the model type a service produces.
#[derive(Clone, Copy)]
pub struct ModelType {
    name: &'static str,
    signature_of: fn(ModelMethod) -> Option<Signature>,
}

impl ModelType {
    pub fn of<M: Model>() -> Self {
        Self {
            name: M::NAME,
            signature_of: M::backing_signature,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature_of(&self, method: ModelMethod) -> Option<Signature> {
        (self.signature_of)(method)
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelType").field(&self.name).finish()
    }
}

/// Per-service metadata shared by the service and the models it produces.
///
/// Models keep only a weak reference; the service owns the spec.
pub struct ServiceSpec {
    name: &'static str,
    core: Arc<ClientCore>,
    payload_model: ModelType,
    model_mocks: RwLock<HashMap<ModelMethod, MockFn>>,
}

impl ServiceSpec {
    pub fn new(name: &'static str, core: Arc<ClientCore>, payload_model: ModelType) -> Arc<Self> {
        Arc::new(Self {
            name,
            core,
            payload_model,
            model_mocks: RwLock::new(HashMap::new()),
        })
    }

    /// Path segment of the resource, e.g. `"wells"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn core(&self) -> &Arc<ClientCore> {
        &self.core
    }

    pub fn payload_model(&self) -> ModelType {
        self.payload_model
    }

    /// Register `mock` for `method` on every model initialized from this
    /// spec from now on.
    ///
    /// The mock is checked against the payload model's backing signature
    /// here rather than when a model is initialized.
    pub fn register_model_mock(&self, method: ModelMethod, mock: MockFn) -> Result<()> {
        let expected = self
            .payload_model
            .signature_of(method)
            .ok_or_else(|| Error::MethodNotFound {
                service: self.payload_model.name.to_string(),
                method: method.name().to_string(),
            })?;
        if expected != mock.signature() {
            return Err(Error::SignatureMismatch {
                expected,
                actual: mock.signature(),
            });
        }

        self.model_mocks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method, mock);
        debug!(
            service = self.name,
            method = method.name(),
            "registered model method mock"
        );
        Ok(())
    }

    pub fn model_mock(&self, method: ModelMethod) -> Option<MockFn> {
        self.model_mocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&method)
            .cloned()
    }

    /// The function a model should wire for `method`: the registered mock if
    /// any, `default` otherwise.
    pub(crate) fn model_backing<Args: 'static, Out: 'static>(
        &self,
        method: ModelMethod,
        default: impl IntoBacking<Args, Out>,
    ) -> BackingFn<Args, Out> {
        self.model_mock(method)
            .and_then(|mock| mock.downcast::<Args, Out>())
            .unwrap_or_else(|| default.into_backing())
    }
}

impl fmt::Debug for ServiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSpec")
            .field("name", &self.name)
            .field("payload_model", &self.payload_model)
            .finish_non_exhaustive()
    }
}

/// What every service exposes to the mock registry.
pub trait Service: Send + Sync {
    fn spec(&self) -> &Arc<ServiceSpec>;

    /// Name of the service as addressed in mock targets, e.g. `"Well"`.
    fn name(&self) -> &'static str;

    /// Public method names, as addressed in mock targets.
    fn methods(&self) -> &'static [&'static str];

    /// The backing slot behind `method`, if it has one.
    fn backing(&self, method: &str) -> Option<&dyn Slot>;

    fn register_model_mock(&self, method: ModelMethod, mock: MockFn) -> Result<()> {
        self.spec().register_model_mock(method, mock)
    }
}

/// Anything that exposes services by name: the `Client`, or a caller's type
/// that wraps one.
pub trait ServiceRoot {
    fn service(&self, name: &str) -> Option<&dyn Service>;

    /// A client wrapped by this root, searched when `service` finds nothing.
    fn embedded_client(&self) -> Option<&Client> {
        None
    }
}

impl ServiceRoot for Client {
    fn service(&self, name: &str) -> Option<&dyn Service> {
        match name {
            "Well" => Some(&self.well),
            "Driller" => Some(&self.driller),
            "Permit" => Some(&self.permit),
            "Meter" => Some(&self.meter),
            "MeterReading" => Some(&self.meter_reading),
            "History" => Some(&self.history),
            _ => None,
        }
    }
}

pub(crate) fn not_implemented<T>() -> Result<T> {
    Err(Error::NotImplemented)
}

/// Fetch one model and bind it to `spec`.
pub(crate) fn fetch_model<M>(
    spec: &Arc<ServiceSpec>,
    method: HttpMethod,
    path: &str,
    body: Option<String>,
    expected: u16,
) -> Result<M>
where
    M: Model + DeserializeOwned,
{
    let url = spec.core().endpoint(path)?;
    let model: M = spec.core().fetch(method, &url, body, expected)?;
    Ok(model.init(spec))
}

/// Fetch a list of models and bind each to `spec`.
pub(crate) fn fetch_models<M>(
    spec: &Arc<ServiceSpec>,
    method: HttpMethod,
    path: &str,
    body: Option<String>,
    expected: u16,
) -> Result<Vec<M>>
where
    M: Model + DeserializeOwned,
{
    let url = spec.core().endpoint(path)?;
    let models: Vec<M> = spec.core().fetch(method, &url, body, expected)?;
    Ok(models.into_iter().map(|m| m.init(spec)).collect())
}
