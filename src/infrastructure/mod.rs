pub mod decoders;

pub use decoders::{default_decoders, DocumentDecoder};
