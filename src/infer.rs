pub(crate) mod heuristics;
