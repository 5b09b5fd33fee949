//! Behaviour shared by every payload model.
//!
//! # Design
//! Models are decoded unbound: serde fills the data fields and leaves the
//! spec reference and backing functions empty. `Model::init` attaches a weak
//! reference to the producing `ServiceSpec` and wires each backing function,
//! preferring a mock registered on the spec over the default. Calling a model
//! method before `init` fails with `Error::Uninitialized`.

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mock::{BackingFn, Signature};
use crate::service::ServiceSpec;

/// Model operations that can be mocked through a service spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelMethod {
    Save,
    Update,
    Delete,
    Permits,
    Metrics,
}

impl ModelMethod {
    pub fn name(self) -> &'static str {
        match self {
            ModelMethod::Save => "Save",
            ModelMethod::Update => "Update",
            ModelMethod::Delete => "Delete",
            ModelMethod::Permits => "Permits",
            ModelMethod::Metrics => "Metrics",
        }
    }
}

impl fmt::Display for ModelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields every API resource carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBase {
    #[serde(default)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    spec: Weak<ServiceSpec>,
}

impl ModelBase {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// The spec this model was initialized from, while it is still alive.
    pub fn spec(&self) -> Option<Arc<ServiceSpec>> {
        self.spec.upgrade()
    }

    fn bind(&mut self, spec: &Arc<ServiceSpec>) {
        self.spec = Arc::downgrade(spec);
    }
}

/// A payload model produced by a service.
pub trait Model: Clone + Send + Sync + 'static {
    /// Type name used in diagnostics.
    const NAME: &'static str;

    fn base(&self) -> &ModelBase;

    fn base_mut(&mut self) -> &mut ModelBase;

    /// Signature of the backing function behind `method`, if this model has
    /// one.
    fn backing_signature(_method: ModelMethod) -> Option<Signature> {
        None
    }

    /// Wire backing functions for a model bound to `spec`.
    fn wire(&mut self, _spec: &Arc<ServiceSpec>) {}

    fn init(mut self, spec: &Arc<ServiceSpec>) -> Self {
        self.base_mut().bind(spec);
        self.wire(spec);
        self
    }

    fn id(&self) -> u64 {
        self.base().id
    }
}

/// A model's backing function; unbound until `init`.
pub(crate) struct ModelFn<Args, Out>(Option<BackingFn<Args, Result<Out>>>);

impl<Args, Out> ModelFn<Args, Out> {
    pub(crate) fn bind(f: BackingFn<Args, Result<Out>>) -> Self {
        Self(Some(f))
    }

    pub(crate) fn call(&self, method: ModelMethod, args: Args) -> Result<Out> {
        let f = self.0.as_ref().ok_or(Error::Uninitialized(method.name()))?;
        f(args)
    }
}

impl<Args, Out> Default for ModelFn<Args, Out> {
    fn default() -> Self {
        Self(None)
    }
}

impl<Args, Out> Clone for ModelFn<Args, Out> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Args, Out> fmt::Debug for ModelFn<Args, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("ModelFn(bound)"),
            None => f.write_str("ModelFn(unbound)"),
        }
    }
}

/// Upgrade a model's spec reference inside a default backing function.
pub(crate) fn live_spec(spec: &Weak<ServiceSpec>, name: &str) -> Result<Arc<ServiceSpec>> {
    spec.upgrade()
        .ok_or_else(|| Error::SpecReleased(name.to_string()))
}
