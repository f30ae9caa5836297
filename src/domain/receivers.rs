//! Fixed receivers sampling a field once per time step

use ndarray::{Array2, ArrayView1, ArrayView2};

/// Traces recorded at a fixed set of grid positions.
///
/// `traces()` is laid out `[receiver, step]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Receivers<P> {
    positions: Vec<P>,
    traces: Array2<f64>,
}

impl<P: Copy> Receivers<P> {
    pub fn new(positions: Vec<P>, nt: usize) -> Self {
        let traces = Array2::zeros((positions.len(), nt));
        Self { positions, traces }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[P] {
        &self.positions
    }

    /// Store `sample(position)` for every receiver at step `it`
    pub fn record(&mut self, it: usize, sample: impl Fn(P) -> f64) {
        for (r, &position) in self.positions.iter().enumerate() {
            self.traces[[r, it]] = sample(position);
        }
    }

    pub fn traces(&self) -> ArrayView2<'_, f64> {
        self.traces.view()
    }

    pub fn trace(&self, receiver: usize) -> ArrayView1<'_, f64> {
        self.traces.row(receiver)
    }

    pub fn into_traces(self) -> Array2<f64> {
        self.traces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let mut receivers = Receivers::new(vec![1usize, 3], 4);
        let field = [0.0, 10.0, 20.0, 30.0];
        receivers.record(2, |i| field[i]);

        assert_eq!(receivers.len(), 2);
        assert_eq!(receivers.trace(0)[2], 10.0);
        assert_eq!(receivers.trace(1)[2], 30.0);
        assert_eq!(receivers.trace(1)[0], 0.0);
        assert_eq!(receivers.traces().dim(), (2, 4));
    }

    #[test]
    fn test_empty() {
        let receivers: Receivers<(usize, usize)> = Receivers::new(Vec::new(), 10);
        assert!(receivers.is_empty());
        assert_eq!(receivers.into_traces().dim(), (0, 10));
    }
}
