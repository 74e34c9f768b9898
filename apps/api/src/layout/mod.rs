// One-page layout: template rules, the height model and the greedy resolver.
// Pure and synchronous; callers on the async side go through spawn_blocking.

pub mod metrics;
pub mod resolver;
pub mod rules;
pub mod templates;
