pub mod handlers;
pub mod header;
pub mod preview_area;
pub mod results;
pub mod scene;
pub mod sidebar;
pub mod utils;
