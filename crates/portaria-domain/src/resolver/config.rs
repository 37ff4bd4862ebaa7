//! Configuration for the auth resolver.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::routes::RouteTable;
use super::traits::OnboardingProbe;

/// Configuration for the auth resolver.
#[derive(Clone)]
pub struct ResolverConfig {
    /// Static route classification sets.
    pub route_table: RouteTable,
    /// Optional probe for the transient onboarding-in-progress marker.
    ///
    /// Supplied by the onboarding persistence layer. When absent, the
    /// in-progress state is never produced.
    pub onboarding_probe: Option<Arc<dyn OnboardingProbe>>,
    /// Evaluations slower than this emit a `tracing` warning.
    ///
    /// Resolution is pure table lookup and should finish in microseconds;
    /// crossing this threshold is an observability signal, never an error.
    pub slow_eval_threshold: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            route_table: RouteTable::default(),
            onboarding_probe: None,
            slow_eval_threshold: Duration::from_millis(5),
        }
    }
}

impl ResolverConfig {
    /// Sets the route table.
    pub fn with_route_table(mut self, route_table: RouteTable) -> Self {
        self.route_table = route_table;
        self
    }

    /// Sets the onboarding probe.
    pub fn with_onboarding_probe(mut self, probe: Arc<dyn OnboardingProbe>) -> Self {
        self.onboarding_probe = Some(probe);
        self
    }

    /// Sets the slow-evaluation warning threshold.
    pub fn with_slow_eval_threshold(mut self, threshold: Duration) -> Self {
        self.slow_eval_threshold = threshold;
        self
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("route_table", &self.route_table)
            .field("onboarding_probe", &self.onboarding_probe.is_some())
            .field("slow_eval_threshold", &self.slow_eval_threshold)
            .finish()
    }
}
