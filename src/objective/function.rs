use super::ObjectiveTerm;
use super::ObjectiveDataTerm;
use std::ops::Range;

/// Sum of objective terms over one flat parameter buffer.
///
/// Each term sees its own sub-range of the buffer (e.g. a spectral channel
/// range of the HR estimate). [`compute`](Self::compute) zeroes the gradient
/// once and lets every term add into its slice.
pub struct ObjectiveFunction<'a> {
    num_parameters: usize,
    terms: Vec<(Range<usize>, Box<dyn ObjectiveTerm + 'a>)>,
}

impl<'a> ObjectiveFunction<'a> {
    pub fn new(num_parameters: usize) -> Self {
        Self {
            num_parameters,
            terms: Vec::new(),
        }
    }

    /// Register `term` over `range` of the parameter buffer.
    pub fn add_term(&mut self, range: Range<usize>, term: impl ObjectiveTerm + 'a) {
        assert!(
            range.end <= self.num_parameters,
            "term range {range:?} exceeds {} parameters",
            self.num_parameters
        );
        assert_eq!(
            range.len(),
            term.num_parameters(),
            "term range {range:?} does not match the term's parameter count"
        );
        self.terms.push((range, Box::new(term)));
    }

    /// Register a data term over the channels it covers.
    pub fn add_data_term(&mut self, term: ObjectiveDataTerm<'a>) {
        self.add_term(term.buffer_range(), term);
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Total cost of all terms; overwrites `gradient` with the total gradient.
    pub fn compute(&self, estimate: &[f64], mut gradient: Option<&mut [f64]>) -> f64 {
        assert_eq!(
            estimate.len(),
            self.num_parameters,
            "estimate holds {} values, expected {}",
            estimate.len(),
            self.num_parameters
        );
        if let Some(g) = gradient.as_deref_mut() {
            assert_eq!(g.len(), self.num_parameters, "gradient length mismatch");
            g.fill(0.0);
        }
        let mut total = 0.0;
        for (range, term) in &self.terms {
            let term_gradient = gradient.as_deref_mut().map(|g| &mut g[range.clone()]);
            total += term.compute(&estimate[range.clone()], term_gradient);
        }
        total
    }
}
