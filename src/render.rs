pub(crate) mod backend;
pub(crate) mod compositor;
pub(crate) mod cpu;
pub(crate) mod target;
