//! Cross-crate integration tests for the dacviz workspace live under `tests/`.
