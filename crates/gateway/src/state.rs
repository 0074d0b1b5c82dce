use std::sync::Arc;

use tc_domain::config::Config;
use tc_upstream::aggregator::IdentityDataAggregator;
use tc_upstream::identity::InteractorResolver;

use crate::links::LinkStore;

/// Shared application state passed to all API handlers.
///
/// Deliberately small: the short-link store is the only cross-request
/// mutable state in the process. Card view-state is always per-request
/// (no shared "last known identity" anywhere).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Hash-addressed ephemeral short-link store.
    pub links: Arc<LinkStore>,
    /// Points + allowance aggregation for the MyState path.
    pub aggregator: Arc<IdentityDataAggregator>,
    /// Identity hub seam supplying interactor attributes.
    pub identity: Arc<dyn InteractorResolver>,
}
