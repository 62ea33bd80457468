/// Magic string at the start of every encoded stream.
pub const PROMESH_MAGIC: [u8; 4] = *b"PMC1";

pub const PROMESH_MAJOR_VERSION: u8 = 1;
pub const PROMESH_MINOR_VERSION: u8 = 0;
