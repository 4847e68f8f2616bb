pub mod bubbles;
pub mod panels;
pub mod selectors;
