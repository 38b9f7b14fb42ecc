//! HTTP route handlers.

pub mod evidence;
