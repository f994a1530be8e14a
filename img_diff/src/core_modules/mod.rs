pub mod bounds;
pub mod decision;
pub mod diff_engine;
pub mod frame;
pub mod histogram;
pub mod pixel;
pub mod smart_pixel;
pub mod utils;
