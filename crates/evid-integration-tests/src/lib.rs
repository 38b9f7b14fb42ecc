//! This crate has no library — it exists solely to host cross-crate
//! integration tests under `tests/`.
