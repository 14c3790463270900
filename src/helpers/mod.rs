mod load_dotenv;
mod time;

pub use load_dotenv::load_dotenv;
pub use time::{format_elapsed, now_iso};
