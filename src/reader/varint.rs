/// Append `value` as a variable length quantity.
///
/// Seven bits per byte, most significant group first, bit 7 set on every
/// byte but the last.
pub fn encode_varint(value: u32, out: &mut alloc::vec::Vec<u8>) {
    let mut shift = 28;
    while shift > 0 && value >> shift == 0 {
        shift -= 7;
    }
    while shift > 0 {
        out.push(((value >> shift) & 0x7F) as u8 | 0x80);
        shift -= 7;
    }
    out.push((value & 0x7F) as u8);
}
