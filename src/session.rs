pub(crate) mod demo;
pub(crate) mod input;
pub(crate) mod pipeline;
pub(crate) mod progress;
pub(crate) mod scheduler;
