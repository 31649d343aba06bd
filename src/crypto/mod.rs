mod common;
mod decryption;
mod encryption;

use common::*;
pub use decryption::decrypt;
pub use encryption::encrypt;
