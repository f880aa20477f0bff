//! Interactive analysis state.

use super::{error_level_analysis, AmplifyMode, ElaError, ElaOutput, ElaParams};
use crate::decode::DecodedImage;

/// The source image plus the current slider values.
///
/// A UI driver owns one of these and calls [`ElaSession::set_scale`] or
/// [`ElaSession::set_quality`] from its change notifications. Each call
/// stores the new value and returns a freshly rendered result.
#[derive(Debug, Clone)]
pub struct ElaSession {
    source: DecodedImage,
    params: ElaParams,
    mode: AmplifyMode,
}

impl ElaSession {
    pub fn new(source: DecodedImage, params: ElaParams, mode: AmplifyMode) -> Result<Self, ElaError> {
        params.validate()?;
        if source.is_empty() {
            return Err(ElaError::EmptyImage);
        }
        Ok(Self {
            source,
            params,
            mode,
        })
    }

    pub fn source(&self) -> &DecodedImage {
        &self.source
    }

    pub fn params(&self) -> ElaParams {
        self.params
    }

    pub fn mode(&self) -> AmplifyMode {
        self.mode
    }

    /// Run the analysis with the current values.
    pub fn render(&self) -> Result<ElaOutput, ElaError> {
        error_level_analysis(&self.source, self.params, self.mode)
    }

    /// Change the amplification and re-render.
    ///
    /// Out-of-range values are rejected and leave the session unchanged.
    pub fn set_scale(&mut self, scale: u8) -> Result<ElaOutput, ElaError> {
        self.update(ElaParams {
            scale,
            ..self.params
        })
    }

    /// Change the recompression quality and re-render.
    pub fn set_quality(&mut self, quality: u8) -> Result<ElaOutput, ElaError> {
        self.update(ElaParams {
            quality,
            ..self.params
        })
    }

    fn update(&mut self, params: ElaParams) -> Result<ElaOutput, ElaError> {
        params.validate()?;
        self.params = params;
        self.render()
    }
}
