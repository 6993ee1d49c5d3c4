const TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut i = 0;
        while i < 8 {
            c = if c & 1 != 0 { 0xedb8_8320 ^ (c >> 1) } else { c >> 1 };
            i += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
};

pub(crate) fn crc32<I: IntoIterator<Item = u8>>(data: I) -> u32 {
    let mut crc = 0xffff_ffff;
    for byte in data {
        let index = (crc ^ byte as u32) & 0xff;
        crc = TABLE[index as usize] ^ (crc >> 8);
    }
    crc ^ 0xffff_ffff
}
