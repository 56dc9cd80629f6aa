// Types module - the feature vector contract
//
// Dimension and ordering are a hard contract with the scoring side: any
// classifier consuming this vector was fit against exactly this layout,
// so changing the order or the count is a breaking change.
//
// Layout, for each channel c in {left, right}:
//   [0..n)    cepstral coefficient means
//   [n..2n)   cepstral coefficient standard deviations
//   +0        RMS mean          +1  RMS std
//   +2        ZCR mean          +3  ZCR std
//   +4        centroid mean     +5  centroid std
//   +6..+10   correlation block: phase shift ms, peak, central std,
//             total variation (identical values in both channel blocks)
// with n = configured cepstral coefficient count.

use serde::Serialize;

/// Vector dimension for a given cepstral coefficient count
pub fn feature_dim(n_cepstra: usize) -> usize {
    2 * (2 * n_cepstra + 6 + 4)
}

/// Dimension under the default configuration (7 cepstral coefficients)
pub const FEATURE_DIM: usize = 48;

/// Ordered, fixed-dimension feature vector for one segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dim_matches_constant() {
        assert_eq!(feature_dim(7), FEATURE_DIM);
        assert_eq!(FEATURE_DIM, 48);
    }

    #[test]
    fn test_dim_scales_with_cepstra() {
        assert_eq!(feature_dim(13), 2 * (26 + 10));
    }
}
