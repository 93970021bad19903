//! ONNX Runtime backend for the neural G2P model.
//!
//! The packaged model takes `src` (int64, `[1, input_len]`) and returns
//! `scores` (float32, `[1, output_len, phoneme_count]`).

use std::sync::{Arc, Mutex};

use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};

use super::neural::G2pModel;

const INPUT_NAME: &str = "src";
const OUTPUT_NAME: &str = "scores";

fn inference_error(e: impl std::fmt::Display) -> Error {
    Error::Inference(e.to_string())
}

pub struct OnnxG2pModel {
    session: Mutex<Session>,
}

impl OnnxG2pModel {
    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        let session = Session::builder()
            .map_err(inference_error)?
            .with_intra_threads(1)
            .map_err(inference_error)?
            .commit_from_memory(bytes)
            .map_err(inference_error)?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Model factory for [`super::pack::load_shared`].
    pub fn factory(bytes: &[u8]) -> Result<Arc<dyn G2pModel>> {
        Ok(Arc::new(Self::from_memory(bytes)?))
    }
}

impl G2pModel for OnnxG2pModel {
    fn infer(&self, graphemes: &[i64]) -> Result<Vec<Vec<f32>>> {
        let input = Tensor::from_array(([1usize, graphemes.len()], graphemes.to_vec().into_boxed_slice()))
            .map_err(inference_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference("session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![INPUT_NAME => input])
            .map_err(inference_error)?;
        let (shape, data) = outputs[OUTPUT_NAME]
            .try_extract_tensor::<f32>()
            .map_err(inference_error)?;

        let vocab = shape.last().copied().unwrap_or(0);
        if vocab <= 0 {
            return Err(Error::Inference(format!("unexpected output shape {:?}", shape)));
        }
        Ok(data.chunks(vocab as usize).map(|row| row.to_vec()).collect())
    }
}
