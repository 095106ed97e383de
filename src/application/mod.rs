//! Application services: feed selection, rendering and site tooling.

pub mod clock;
pub mod error;
pub mod export;
pub mod llms;
pub mod navigation;
pub mod repos;
pub mod scaffold;
pub mod selection;
pub mod site;
pub mod syndication;
