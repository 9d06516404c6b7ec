mod date;
mod extract;
mod fetch;
pub mod schema;

pub use date::{DateSource, PublishDate, parse_publish_date};
pub use extract::{EpisodeRecord, ProgramMetadata, extract_episodes, extract_program};
pub use fetch::{fetch_program, fetch_program_bytes, parse_program, program_json_url};
pub use schema::ProgramDocument;
