pub mod html;
pub mod logging;

pub use html::{extract_img_urls, strip_tags};
pub use logging::truncate_text;
