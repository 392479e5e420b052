pub(crate) mod runner;
pub(crate) mod script;
