use crate::crc::crc32;

pub(crate) struct Iend;

impl Iend {
    pub(crate) const TAG: &'static [u8; 4] = b"IEND";

    pub(crate) fn to_bytes(&self) -> [u8; 12] {
        let mut bytes = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0, 0, 0, 0];
        let crc = crc32(bytes[4..8].iter().copied()).to_be_bytes();
        bytes[8..].copy_from_slice(&crc);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_the_fixed_trailer() {
        let bytes = Iend.to_bytes();
        assert_eq!(
            bytes,
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xae, 0x42, 0x60, 0x82]
        );
    }
}
