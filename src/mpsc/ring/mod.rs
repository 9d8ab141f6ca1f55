mod buffer;
mod buffer_impl;

pub use buffer::RingBuffer;
