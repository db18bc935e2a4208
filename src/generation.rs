//! Configuration generations.
//!
//! # Data Flow
//! ```text
//! ProxyConfig
//!     → destinations (one MemoryDestination per entry)
//!     → CodecManager (codec registry)
//!     → RouteFactory → route tree
//!     → RouterGeneration
//!     → RouterState::replace (atomic swap, old generation dropped by last reader)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::compression::{CodecConfig, CodecManager};
use crate::config::{load_route, ConfigError, ProxyConfig};
use crate::protocol::{McReply, McRequest};
use crate::routing::{
    route_handles, Destination, DestinationMap, MemoryDestination, RouteFactory, RouteHandlePtr,
};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Everything built from one configuration: route tree, codecs, destinations.
#[derive(Debug)]
pub struct RouterGeneration {
    id: u64,
    root: RouteHandlePtr,
    codecs: CodecManager,
    destinations: DestinationMap,
}

impl RouterGeneration {
    /// Build a generation from a validated configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ConfigError> {
        let destinations: DestinationMap = config
            .destinations
            .iter()
            .map(|d| {
                let dest: Arc<dyn Destination> = Arc::new(MemoryDestination::new(d.name.as_str()));
                (d.name.clone(), dest)
            })
            .collect();

        let codecs = CodecManager::from_configs(config.codecs.iter().map(CodecConfig::from))?;

        let route = load_route(config)?;
        let mut factory = RouteFactory::new(&destinations);
        if let Some(host_id) = config.host_id {
            factory = factory.with_host_id(host_id);
        }
        let root = factory.create(&route)?;

        let id = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            generation = id,
            destinations = destinations.len(),
            routes = route_handles(root.as_ref()).len(),
            "Router generation built"
        );

        Ok(Self {
            id,
            root,
            codecs,
            destinations,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Route a request through this generation's tree.
    pub fn route(&self, req: &McRequest) -> McReply {
        self.root.route(req)
    }

    pub fn root(&self) -> &RouteHandlePtr {
        &self.root
    }

    pub fn codecs(&self) -> &CodecManager {
        &self.codecs
    }

    pub fn destination(&self, name: &str) -> Option<&Arc<dyn Destination>> {
        self.destinations.get(name)
    }
}

/// Holder of the current generation; readers never block the swap.
#[derive(Debug)]
pub struct RouterState {
    current: ArcSwap<RouterGeneration>,
}

impl RouterState {
    pub fn new(generation: RouterGeneration) -> Self {
        Self {
            current: ArcSwap::from_pointee(generation),
        }
    }

    /// The generation in effect now.
    pub fn load(&self) -> Arc<RouterGeneration> {
        self.current.load_full()
    }

    /// Publish a new generation, returning the one it replaces.
    pub fn replace(&self, generation: RouterGeneration) -> Arc<RouterGeneration> {
        let id = generation.id;
        let old = self.current.swap(Arc::new(generation));
        tracing::info!(old = old.id, new = id, "Router generation replaced");
        old
    }

    /// Route a request through the current generation.
    pub fn route(&self, req: &McRequest) -> McReply {
        self.current.load().route(req)
    }
}
