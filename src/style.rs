pub(crate) mod color;
pub(crate) mod interchange;
pub(crate) mod model;
