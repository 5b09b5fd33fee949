//! Blocking client for the Hydros water-well records API.
//!
//! # Overview
//! A `Client` owns one service per resource (wells, drillers, permits,
//! meters, meter readings, history). Services issue JSON requests through a
//! `Transport` and return typed models bound to the service that produced
//! them.
//!
//! # Design
//! - Every service operation is backed by a swappable `Backing` slot, so a
//!   test can replace `client.well.get_fn` with a closure, or register a
//!   `MockFn` by name through `register_service_method_mock`.
//! - Model methods (`WellModel::permits`, `PermitModel::metrics`, ...) are
//!   wired when the model is initialized from its `ServiceSpec`, picking up
//!   any mock registered on that spec with `register_model_method_mock`.
//! - The network stays behind `Transport`; the default is a blocking `ureq`
//!   agent and `set_transport` swaps it out.

pub mod client;
pub mod error;
pub mod http;
pub mod mock;
pub mod model;
pub mod models;
pub mod query;
pub mod service;
pub mod services;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::{set_access_token, set_host, set_timeout, set_transport, Client, ClientOption};
pub use error::{Error, RemoteError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mock::{register_model_method_mock, register_service_method_mock, Backing, MockFn, Signature};
pub use model::{Model, ModelBase, ModelMethod};
pub use service::{Service, ServiceRoot, ServiceSpec};
pub use transport::{Transport, UreqTransport};
