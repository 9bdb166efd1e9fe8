//! Known-good MAVLink v2 frames, packed field by field and compared byte for byte.

use binstruct::{pack, unpack, values, Struct, Value};
use pretty_hex::PrettyHex;

mod util;
use util::trace_init;

fn check(format: &str, fields: &[Value], expected_hex: &str) {
    trace_init();
    let expected = hex::decode(expected_hex).unwrap();
    let packed = pack(format, fields).unwrap();
    println!("{format}:\n{}", packed.hex_dump());
    assert_eq!(packed, expected, "{format}");
    assert_eq!(unpack(format, &packed).unwrap(), fields, "{format}");
}

#[test]
fn heartbeat_body() {
    check(
        "<IBBBBBBB",
        &values![963497464u32, 17, 84, 151, 218, 29, 216, 27],
        "f8cd6d39115497da1dd81b",
    );
}

#[test]
fn data_transmission_handshake() {
    check(
        "<IHHHBBB",
        &values![963497464u32, 17443, 17547, 17651, 163, 230, 41],
        "f8cd6d3923448b44f344a3e629",
    );
}

#[test]
fn frame_header() {
    let msg_id: u32 = 130;
    let swapped = ((msg_id & 0xff) << 8) | ((msg_id >> 8) & 0xff);
    assert_eq!(swapped, 33280);

    let fields = values![253, 13, 0, 0, 40, 11, 10, swapped, msg_id >> 16];
    check("<BBBBBBBHB", &fields, "fd0d0000280b0a008200");

    let spaced = "<B B  BBBB\n            BHB";
    assert_eq!(
        pack(spaced, &fields).unwrap(),
        hex::decode("fd0d0000280b0a008200").unwrap()
    );
}

#[test]
fn file_transfer_payload() {
    trace_init();
    let payload: Vec<u8> = (206..=255).chain(0..=200).collect();
    assert_eq!(payload.len(), 251);

    let msg = Struct::new("<BBB251s").unwrap().strings(binstruct::RawBytes);
    let packed = msg.pack(&values![5, 72, 139, payload.clone()]).unwrap();

    let mut expected = vec![0x05, 0x48, 0x8b];
    expected.extend_from_slice(&payload);
    assert_eq!(packed, expected);
    assert_eq!(
        msg.unpack(&packed).unwrap(),
        values![5, 72, 139, payload]
    );
}

#[test]
fn sys_status_battery_remaining() {
    // 223 reinterpreted as a signed byte.
    let battery_remaining = 223u8 as i8;
    assert_eq!(battery_remaining, -33);
    check("<b", &values![battery_remaining], "df");
}

#[test]
fn aoa_ssa_timestamp() {
    check(
        "<Q",
        &values![93372036854775807u64],
        "ffffae705fb94b01",
    );
}

#[test]
fn header_then_body_in_one_buffer() {
    trace_init();
    let header = Struct::new("<BBBBBBBHB").unwrap();
    let body = Struct::new("<IHHHBBB").unwrap();
    let mut frame = vec![0u8; header.size() + body.size()];

    header
        .pack_into(&mut frame, 0, &values![253, 13, 0, 0, 40, 11, 10, 33280, 0])
        .unwrap();
    body.pack_into(
        &mut frame,
        header.size(),
        &values![963497464u32, 17443, 17547, 17651, 163, 230, 41],
    )
    .unwrap();

    assert_eq!(
        hex::encode(&frame),
        "fd0d0000280b0a008200f8cd6d3923448b44f344a3e629"
    );
    assert_eq!(
        body.unpack_from(&frame, header.size()).unwrap(),
        values![963497464u32, 17443, 17547, 17651, 163, 230, 41]
    );
}
