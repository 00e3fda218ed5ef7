//! Policy switches of a [`Router`](crate::Router).
//!
//! Every switch defaults to `true`. Missing fields fall back to the default
//! when the configuration is deserialized.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Redirect when the path only differs from a route by a trailing slash.
    pub redirect_trailing_slash: bool,

    /// Redirect to the cleaned, case-corrected spelling of a route.
    pub redirect_fixed_path: bool,

    /// Answer `405 Method Not Allowed` when another method has the path.
    pub handle_method_not_allowed: bool,

    /// Answer `OPTIONS` requests automatically with the `Allow` header.
    pub handle_options: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { redirect_trailing_slash: true, redirect_fixed_path: true, handle_method_not_allowed: true, handle_options: true }
    }
}
