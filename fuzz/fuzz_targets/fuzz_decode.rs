#![no_main]

use libfuzzer_sys::fuzz_target;
use zlib_lib::{self, Framing};

fuzz_target!(|data: &[u8]| {
    for framing in [Framing::Zlib, Framing::Gzip, Framing::Raw, Framing::Auto] {
        let _ = zlib_lib::decode(data, framing, false);
    }
});
