// timeline: collect recent public activity across platforms into one document
//
// This is the library root. Each module corresponds to one stage of the
// fetch -> merge -> write pipeline, plus the shared model and config.

pub mod activity;
pub mod adapters;
pub mod config;
pub mod http;
pub mod output;
pub mod pipeline;
pub mod sink;
pub mod status;
pub mod text;
