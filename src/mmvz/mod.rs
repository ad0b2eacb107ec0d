pub mod axis;
pub mod chrome;
pub mod diff;
pub mod domain;
pub mod element;
pub mod interaction;
pub mod params;
pub mod reconciler;
pub mod regions;
pub mod scale;
pub mod view_state;
