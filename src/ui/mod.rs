/// UI widgets
pub mod grid_view;
