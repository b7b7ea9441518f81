use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::source::types::SourceRaster;

pub trait SourceReader {
    fn read_source(&self, data: &[u8]) -> Result<SourceRaster>;
}
