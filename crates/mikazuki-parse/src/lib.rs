pub mod descriptor;
pub mod parser;
pub mod tokenizer;

pub use descriptor::EpisodeDescriptor;
pub use parser::parse;
