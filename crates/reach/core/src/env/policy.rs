use crate::state::{AgentId, GridPos};

/// Decides which features the locator and the authority may act on.
///
/// A feature qualifies only when it belongs to the recognized category *and*
/// the instance is currently interactable by the asking agent.
pub trait FeaturePolicy<F>: Send + Sync {
    fn is_category(&self, feature: &F) -> bool;

    fn is_eligible(&self, agent: AgentId, feature: &F, position: GridPos) -> bool;

    fn qualifies(&self, agent: AgentId, feature: &F, position: GridPos) -> bool {
        self.is_category(feature) && self.is_eligible(agent, feature, position)
    }
}

/// Policy assembled from two plain predicates.
#[derive(Clone, Copy, Debug)]
pub struct PolicyFn<C, E> {
    category: C,
    eligible: E,
}

impl<C, E> PolicyFn<C, E> {
    pub const fn new(category: C, eligible: E) -> Self {
        Self { category, eligible }
    }
}

impl<F, C, E> FeaturePolicy<F> for PolicyFn<C, E>
where
    C: Fn(&F) -> bool + Send + Sync,
    E: Fn(AgentId, &F, GridPos) -> bool + Send + Sync,
{
    fn is_category(&self, feature: &F) -> bool {
        (self.category)(feature)
    }

    fn is_eligible(&self, agent: AgentId, feature: &F, position: GridPos) -> bool {
        (self.eligible)(agent, feature, position)
    }
}
