use std::sync::{Arc, Mutex, PoisonError};

/// Full linear convolution: y[n] = Σ_k x[n−k]·h[k], length N + M − 1.
///
/// Direct form, O(N·M). An empty input contributes nothing, so the output is
/// all zeros; only two empty inputs give an empty output.
pub fn convolve(signal: &[f64], impulse_response: &[f64]) -> Vec<f64> {
    let len = (signal.len() + impulse_response.len()).saturating_sub(1);
    let mut output = vec![0.0; len];
    for (i, &x) in signal.iter().enumerate() {
        for (j, &h) in impulse_response.iter().enumerate() {
            output[i + j] += x * h;
        }
    }
    output
}

/// Overlap-add convolution engine.
///
/// Processes a signal in blocks, convolving with a hot-swappable impulse
/// response. Concatenating every block's output followed by [`flush`]
/// reproduces [`convolve`] on the whole signal.
///
/// [`flush`]: ConvolutionEngine::flush
pub struct ConvolutionEngine {
    /// Current impulse response (time domain).
    impulse_response: Arc<Mutex<Vec<f64>>>,
    /// Overlap buffer (tail from previous block).
    overlap: Vec<f64>,
}

impl ConvolutionEngine {
    pub fn new(impulse_response: Vec<f64>) -> Self {
        Self {
            impulse_response: Arc::new(Mutex::new(impulse_response)),
            overlap: Vec::new(),
        }
    }

    /// Get a handle to the impulse response for hot-swapping.
    pub fn ir_handle(&self) -> Arc<Mutex<Vec<f64>>> {
        Arc::clone(&self.impulse_response)
    }

    /// Replace the impulse response. The pending tail of the old response
    /// still plays out.
    pub fn swap_ir(&self, impulse_response: Vec<f64>) {
        *self
            .impulse_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = impulse_response;
    }

    /// Process a block of input samples; returns as many samples as were
    /// given.
    pub fn process(&mut self, input: &[f64]) -> Vec<f64> {
        let ir = self
            .impulse_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let mut convolved = convolve(input, &ir);
        if convolved.len() < input.len() {
            convolved.resize(input.len(), 0.0);
        }

        // Add overlap from previous block
        if self.overlap.len() > convolved.len() {
            convolved.resize(self.overlap.len(), 0.0);
        }
        for (c, o) in convolved.iter_mut().zip(&self.overlap) {
            *c += o;
        }

        // Split into output (block size samples) and new overlap
        self.overlap = convolved.split_off(input.len());
        convolved
    }

    /// Drain the remaining tail after the last block.
    pub fn flush(&mut self) -> Vec<f64> {
        std::mem::take(&mut self.overlap)
    }
}
