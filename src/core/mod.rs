//! Core modules: the record model, the session store and the ambient
//! plumbing (errors, configuration, logging, rendering, bundled assets).

pub mod assets;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod store;
