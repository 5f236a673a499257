mod record_codec;

pub use record_codec::{decode, decode_payload, encode, encode_payload, frame, read_length_prefix};
