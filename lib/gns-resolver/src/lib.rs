/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod config;
pub use config::{BridgeNamePolicy, ResolverConfig, ResolverRuntimeConfig};

mod error;
pub use error::{
    ResolveError, ResolveLocalError, ResolveNotFoundError, ResolvePolicyError,
    ResolveProtocolError, ResolveServerError, ResolveTransportError,
};

mod stats;
pub use stats::{
    ResolverBackendSnapshot, ResolverBackendStats, ResolverLookupSnapshot, ResolverLookupStats,
    ResolverSnapshot, ResolverStats,
};

mod label;
pub use label::{ServiceRegistry, ServiceSelector};

pub mod backend;

mod address;
mod bridge;
mod chain;
mod context;
mod dht;
mod dns;
mod fetch;
mod interpret;
mod lookup;
mod post;
mod revocation;
mod target;

pub use lookup::LocalOptions;

mod message;
pub use message::LookupResult;

mod handle;
pub use handle::{LookupJob, ResolverHandle};

mod runtime;

mod resolver;
pub use resolver::{Resolver, ResolverBuilder};
