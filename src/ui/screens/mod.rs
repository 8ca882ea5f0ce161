pub(crate) mod events;
pub(crate) mod plan;
pub(crate) mod plans;
pub(crate) mod simulate;
