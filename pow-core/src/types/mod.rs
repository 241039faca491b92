/// Core value types shared by the consensus and storage modules
pub mod target;

pub use target::{
    decode_compact, encode_compact, encode_compact_signed, hash_to_u256, DecodedTarget,
    COMPACT_SIGN_BIT,
};
