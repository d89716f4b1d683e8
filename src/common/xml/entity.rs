/// Resolve the name of a general reference (`amp`, `#65`, `#x42`) to its
/// character.
pub fn resolve_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', b'x' | b'X', hex @ ..] => {
            let hex = std::str::from_utf8(hex).ok()?;
            char::from_u32(u32::from_str_radix(hex, 16).ok()?)
        },
        [b'#', decimal @ ..] => char::from_u32(atoi_simd::parse::<u32, false, false>(decimal).ok()?),
        _ => None,
    }
}
