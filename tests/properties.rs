//! Property-based tests for the pack/unpack round trip and the layout rules.

use binstruct::{calcsize, pack, unpack, unpack_from, values, RawBytes, Struct, TypeCode, Value};
use proptest::prelude::*;

const INTEGER_CODES: &[char] = &['b', 'B', 'h', 'H', 'i', 'I', 'l', 'L', 'q', 'Q'];
const STANDARD_CODES: &[char] = &[
    'x', 'c', 'b', 'B', '?', 'h', 'H', 'i', 'I', 'l', 'L', 'q', 'Q', 'e', 'f', 'd', 's',
];

/// An integer code together with a value inside its range.
fn integer_field() -> impl Strategy<Value = (char, i128)> {
    prop::sample::select(INTEGER_CODES).prop_flat_map(|code| {
        let (min, max) = TypeCode::from_char(code)
            .and_then(TypeCode::integer_range)
            .unwrap();
        (Just(code), min..=max)
    })
}

/// Every byte-order marker, including none at all.
const MARKERS: &[&str] = &["", "@", "=", "<", ">", "!"];

fn byte_order_marker() -> impl Strategy<Value = &'static str> {
    prop::sample::select(MARKERS)
}

/// A float code together with a value it holds exactly.
fn float_field() -> impl Strategy<Value = (char, f64)> {
    prop_oneof![
        // Quarter steps up to 512 fit the 11-bit binary16 significand.
        (-2048i32..=2048).prop_map(|n| ('e', f64::from(n) * 0.25)),
        any::<f32>()
            .prop_filter("NaN", |x| !x.is_nan())
            .prop_map(|x| ('f', f64::from(x))),
        any::<f64>()
            .prop_filter("NaN", |x| !x.is_nan())
            .prop_map(|x| ('d', x)),
    ]
}

/// A format element of `<`-compatible code and a small repeat count.
fn element() -> impl Strategy<Value = String> {
    (prop::option::of(0..6usize), prop::sample::select(STANDARD_CODES)).prop_map(
        |(count, code)| match count {
            Some(n) => format!("{n}{code}"),
            None => code.to_string(),
        },
    )
}

proptest! {
    #[test]
    fn prop_integers_round_trip((code, n) in integer_field(), marker in byte_order_marker()) {
        let format = format!("{marker}{code}");
        let packed = pack(&format, &[Value::Int(n)]).unwrap();
        prop_assert_eq!(packed.len(), calcsize(&format).unwrap());
        prop_assert_eq!(unpack(&format, &packed).unwrap(), vec![Value::Int(n)]);
    }

    #[test]
    fn prop_big_endian_is_reversed_little_endian((code, n) in integer_field()) {
        let little = pack(&format!("<{code}"), &[Value::Int(n)]).unwrap();
        let mut big = pack(&format!(">{code}"), &[Value::Int(n)]).unwrap();
        big.reverse();
        prop_assert_eq!(&big, &little);
        big.reverse();
        prop_assert_eq!(big, pack(&format!("!{code}"), &[Value::Int(n)]).unwrap());
    }

    #[test]
    fn prop_big_endian_floats_are_reversed((code, x) in float_field()) {
        let little = pack(&format!("<{code}"), &values![x]).unwrap();
        let mut big = pack(&format!(">{code}"), &values![x]).unwrap();
        big.reverse();
        prop_assert_eq!(&big, &little);
        big.reverse();
        prop_assert_eq!(big, pack(&format!("!{code}"), &values![x]).unwrap());
    }

    #[test]
    fn prop_floats_round_trip((code, x) in float_field(), marker in byte_order_marker()) {
        let format = format!("{marker}{code}");
        let packed = pack(&format, &values![x]).unwrap();
        prop_assert_eq!(packed.len(), calcsize(&format).unwrap());
        prop_assert_eq!(unpack(&format, &packed).unwrap(), values![x]);
    }

    #[test]
    fn prop_chars_round_trip(byte in any::<u8>(), marker in byte_order_marker()) {
        let format = format!("{marker}c");
        let c = char::from(byte);
        prop_assert_eq!(pack(&format, &values![c]).unwrap(), vec![byte]);
        prop_assert_eq!(unpack(&format, &[byte]).unwrap(), values![c]);
    }

    #[test]
    fn prop_out_of_range_is_rejected((code, n) in integer_field(), delta in 1..1000i128) {
        let (min, max) = TypeCode::from_char(code).and_then(TypeCode::integer_range).unwrap();
        let format = format!("<{code}");
        let outside = if n % 2 == 0 { max + delta } else { min - delta };
        let rejected = matches!(
            pack(&format, &[Value::Int(outside)]),
            Err(binstruct::Error::OutOfRange { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn prop_doubles_round_trip(x in any::<f64>().prop_filter("NaN", |x| !x.is_nan())) {
        let packed = pack("<d", &values![x]).unwrap();
        let expected = x.to_le_bytes();
        prop_assert_eq!(packed.as_slice(), expected.as_slice());
        prop_assert_eq!(unpack("<d", &packed).unwrap(), values![x]);
    }

    #[test]
    fn prop_singles_round_trip(x in any::<f32>().prop_filter("NaN", |x| !x.is_nan())) {
        let packed = pack(">f", &values![x]).unwrap();
        let expected = x.to_be_bytes();
        prop_assert_eq!(packed.as_slice(), expected.as_slice());
        prop_assert_eq!(unpack(">f", &packed).unwrap(), values![x]);
    }

    #[test]
    fn prop_halves_round_trip(bits in any::<u16>().prop_filter("NaN", |h| h & 0x7c00 != 0x7c00 || h & 0x3ff == 0)) {
        let fields = unpack("<e", &bits.to_le_bytes()).unwrap();
        prop_assert_eq!(pack("<e", &fields).unwrap(), bits.to_le_bytes().to_vec());
    }

    #[test]
    fn prop_size_is_sum_of_elements(elements in prop::collection::vec(element(), 1..12)) {
        let total: usize = elements
            .iter()
            .map(|e| calcsize(&format!("<{e}")).unwrap())
            .sum();
        prop_assert_eq!(calcsize(&format!("<{}", elements.concat())).unwrap(), total);
        prop_assert_eq!(calcsize(&format!("> {}", elements.join(" "))).unwrap(), total);
    }

    #[test]
    fn prop_strings_are_cut_or_padded(bytes in prop::collection::vec(any::<u8>(), 0..40)) {
        let field = Struct::new("<16s").unwrap().strings(RawBytes);
        let packed = field.pack(&[Value::Bytes(bytes.clone())]).unwrap();
        let mut expected = bytes;
        expected.resize(16, 0);
        prop_assert_eq!(&packed, &expected);
        prop_assert_eq!(field.unpack(&packed).unwrap(), vec![Value::Bytes(expected)]);
    }

    #[test]
    fn prop_unpack_from_checks_bounds(
        buffer in prop::collection::vec(any::<u8>(), 0..32),
        offset in 0..40usize,
    ) {
        let result = unpack_from("<IH", &buffer, offset);
        if offset + 6 <= buffer.len() {
            prop_assert_eq!(result.map(|v| v.len()), Ok(2));
        } else {
            prop_assert!(result.is_err());
        }
    }
}
