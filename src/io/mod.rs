pub mod fixture;

pub use fixture::{decode_record, encode_record, parse_cases, FixtureCase};
