//! In-memory store mapping route names to template pairs.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::SystemTime;

use crate::template::{validate, RawTemplate, TemplateError, TemplatePair};

/// Concurrent map of route name → registered template pair.
///
/// At most one pair exists per route at any instant. Registration validates
/// first, then installs; a rejected registration leaves the registry
/// untouched.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    routes: DashMap<String, Arc<TemplatePair>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            routes: DashMap::new(),
        }
    }

    /// Validate and install a template pair, replacing any existing pair
    /// for the route.
    ///
    /// The pair is fully constructed before insertion, so a concurrent
    /// lookup observes either the previous complete pair or the new one,
    /// never a request template from one registration paired with a
    /// response template from another.
    pub fn register(
        &self,
        route: &str,
        request: RawTemplate,
        response: RawTemplate,
    ) -> Result<(), TemplateError> {
        if route.is_empty() {
            return Err(TemplateError::EmptyRouteName);
        }
        validate(&request)?;
        validate(&response)?;

        let pair = Arc::new(TemplatePair {
            request,
            response,
            registered_at: SystemTime::now(),
        });
        let replaced = self.routes.insert(route.to_string(), pair).is_some();
        tracing::debug!(route = %route, replaced, "Template pair registered");
        Ok(())
    }

    /// Look up the pair registered for a route.
    pub fn lookup(&self, route: &str) -> Option<Arc<TemplatePair>> {
        self.routes.get(route).map(|entry| entry.value().clone())
    }

    /// Remove a route's pair. Returns false if the route was not registered.
    pub fn remove(&self, route: &str) -> bool {
        let removed = self.routes.remove(route).is_some();
        if removed {
            tracing::debug!(route = %route, "Template pair removed");
        }
        removed
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
