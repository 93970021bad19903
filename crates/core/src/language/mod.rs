pub mod dictionary;
pub mod g2p;
pub mod neural;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod pack;
pub mod phonology;
pub mod segment;
pub mod symbols;
