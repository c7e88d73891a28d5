pub mod extractor;
pub mod lookup;
pub mod transport;
