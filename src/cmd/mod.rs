/// Directory conversion command.
pub mod batch;
/// `.res` to JSON command.
pub mod decode;
/// JSON to `.res` command.
pub mod encode;
/// Header and table summary command.
pub mod info;
/// Decode/encode byte comparison command.
pub mod roundtrip;
/// Shared CLI helpers.
pub mod util;
