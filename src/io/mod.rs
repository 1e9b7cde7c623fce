mod endian;
mod file_reader;

pub use endian::{
    padded, read_i32_be, read_i32_le, read_u16_be, read_u16_le, read_u32_be, read_u32_le,
};
pub use file_reader::{
    load, load_async, read, read_async, read_async_with_options, read_bytes, read_with_options,
    DEFAULT_CHUNK_SIZE,
};
