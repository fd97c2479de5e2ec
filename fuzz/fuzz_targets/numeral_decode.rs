//! Fuzz target for numeral text decoding
//!
//! Feeds arbitrary text to every decoder in every layout to find:
//! - Panics on malformed digits or odd lengths
//! - Overflows in chunk accumulation
//! - Encode/decode disagreement on accepted input
//!
//! The fuzzer should NEVER panic. Invalid text must come back as an error.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tessera_bignum::{BigInt, Case, Endianness, NumeralFormat, Radix};

#[derive(Debug, Arbitrary)]
struct DecodeInput {
    text: String,
    radix: u8,
    little_endian: bool,
    width: u8,
    pad: char,
}

fuzz_target!(|input: DecodeInput| {
    let radix = match input.radix % 3 {
        0 => Radix::Binary,
        1 => Radix::Decimal,
        _ => Radix::Hexadecimal,
    };
    let order = if input.little_endian { Endianness::Little } else { Endianness::Big };
    let format = NumeralFormat::default()
        .with_radix(radix)
        .with_order(order)
        .with_case(Case::Lower)
        .with_width(usize::from(input.width), input.pad);

    let Ok(value) = BigInt::from_text(&input.text, &format) else {
        return;
    };

    // Anything accepted must render and parse back to the same number
    let text = value.to_text(&format).expect("accepted value renders");
    if !input.pad.is_ascii_alphanumeric() {
        let again = BigInt::from_text(&text, &format).expect("rendered text parses");
        assert_eq!(again, value);
    }
});
