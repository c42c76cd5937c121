pub(crate) mod camera;
pub(crate) mod controls;
pub(crate) mod geo;
pub(crate) mod model;
pub(crate) mod registry;
