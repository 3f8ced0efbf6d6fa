pub mod decode;
pub mod fft;
pub mod stats;
