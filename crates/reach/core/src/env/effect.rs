use crate::state::{AgentId, InteractionTarget};

/// The externally owned "perform interaction" operation.
///
/// The core never inspects or awaits what the effect does; it only decides
/// whether and with which feature it is invoked.
pub trait InteractionEffect<F> {
    fn perform(&mut self, agent: AgentId, feature: &F, target: InteractionTarget);
}
